//! Signing-configuration registry.
//!
//! Signing credentials live apart from the build descriptor, usually in a
//! file kept out of version control:
//!
//! ```kdl
//! signingConfig "upload" {
//!     storeFile "keystore/upload.jks"
//!     storePassword "${env.KEYSTORE_PASSWORD}"
//!     keyAlias "upload"
//!     keyPassword "${env.KEY_PASSWORD}"
//! }
//! ```

use crate::kdl_util::{children, require_string, set_once};
use crate::{ConfigError, ConfigResult};
use droidcfg_core::{Error as CoreError, Result as CoreResult, SigningConfig, SigningRegistry};
use kdl::{KdlDocument, KdlNode};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// In-memory signing registry, keyed by configuration name.
#[derive(Debug, Clone, Default)]
pub struct SigningConfigSet {
    configs: BTreeMap<String, SigningConfig>,
}

impl SigningConfigSet {
    /// A registry with no configurations at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the implicit `debug` configuration.
    pub fn with_debug() -> Self {
        let mut set = Self::empty();
        set.insert(SigningConfig::debug());
        set
    }

    /// Add or replace a configuration.
    pub fn insert(&mut self, config: SigningConfig) {
        self.configs.insert(config.name.clone(), config);
    }

    /// Parse `signingConfig` nodes on top of the implicit `debug` entry.
    ///
    /// A declared `debug` replaces the implicit one; declaring any other
    /// name twice is an error.
    pub fn parse(kdl: &str) -> ConfigResult<Self> {
        let doc: KdlDocument = kdl.parse()?;
        let mut set = Self::with_debug();
        let mut declared: Vec<String> = Vec::new();

        for node in doc.nodes() {
            if node.name().value() != "signingConfig" {
                warn!(node = node.name().value(), "Ignoring unknown signing registry node");
                continue;
            }

            let config = parse_signing_config(node)?;
            if declared.contains(&config.name) {
                return Err(ConfigError::Duplicate(format!(
                    "signing config '{}'",
                    config.name
                )));
            }
            declared.push(config.name.clone());
            set.insert(config);
        }

        debug!(count = declared.len(), "Parsed signing registry");
        Ok(set)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

fn parse_signing_config(node: &KdlNode) -> ConfigResult<SigningConfig> {
    let name = require_string(node, "signingConfig name")?;
    let mut config = SigningConfig::new(name.clone());

    for child in children(node) {
        let field = format!("signingConfig.{}.{}", name, child.name().value());
        let slot = match child.name().value() {
            "storeFile" => &mut config.store_file,
            "storePassword" => &mut config.store_password,
            "keyAlias" => &mut config.key_alias,
            "keyPassword" => &mut config.key_password,
            other => {
                warn!(config = %name, node = other, "Ignoring unknown signing setting");
                continue;
            }
        };
        set_once(slot, require_string(child, &field)?, &field)?;
    }

    Ok(config)
}

impl SigningRegistry for SigningConfigSet {
    fn get_by_name(&self, name: &str) -> CoreResult<SigningConfig> {
        self.configs
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("signing config '{}'", name)))
    }

    fn names(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_debug_is_implicit() {
        let set = SigningConfigSet::with_debug();
        let debug = set.get_by_name("debug").unwrap();
        assert_eq!(debug.key_alias.as_deref(), Some("androiddebugkey"));
        assert!(set.get_by_name("release").is_err());
    }

    #[test]
    fn test_empty_registry() {
        let set = SigningConfigSet::empty();
        assert!(set.is_empty());
        assert!(matches!(
            set.get_by_name("debug"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_registry() {
        let set = SigningConfigSet::parse(
            r#"
            signingConfig "upload" {
                storeFile "keystore/upload.jks"
                storePassword "${env.KEYSTORE_PASSWORD}"
                keyAlias "upload"
                keyPassword "${env.KEY_PASSWORD}"
            }
            "#,
        )
        .unwrap();

        assert_eq!(set.names(), vec!["debug", "upload"]);
        let upload = set.get_by_name("upload").unwrap();
        assert_eq!(upload.store_file.as_deref(), Some("keystore/upload.jks"));
        assert_eq!(
            upload.store_password.as_deref(),
            Some("${env.KEYSTORE_PASSWORD}")
        );
    }

    #[test]
    fn test_override_debug() {
        let set = SigningConfigSet::parse(
            r#"
            signingConfig "debug" {
                storeFile "ci/debug.keystore"
            }
            "#,
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get_by_name("debug").unwrap().store_file.as_deref(),
            Some("ci/debug.keystore")
        );
    }

    #[test]
    fn test_duplicate_config() {
        let err = SigningConfigSet::parse(
            r#"
            signingConfig "upload" { keyAlias "a"; }
            signingConfig "upload" { keyAlias "b"; }
            "#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_missing_name() {
        let err = SigningConfigSet::parse("signingConfig { keyAlias \"a\"; }").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }
}
