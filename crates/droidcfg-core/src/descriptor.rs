//! Build descriptor definitions.

use serde::{Deserialize, Serialize};

use crate::JavaVersion;
use crate::plugin::PluginDecl;

/// A field that is either a literal or text containing `${namespace.key}`
/// references into project metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue<T> {
    /// A value written directly in the descriptor. Parsed string literals
    /// never contain a reference; one built in code that does is written
    /// out verbatim and reads back as [`FieldValue::Expr`].
    Literal(T),
    /// Text with at least one reference, resolved before validation.
    Expr(String),
}

/// An Android application build descriptor, as parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDescriptor {
    /// Plugins in application order.
    pub plugins: Vec<PluginDecl>,
    /// Package namespace for generated R/BuildConfig classes.
    pub namespace: String,
    pub compile_sdk: FieldValue<u32>,
    pub min_sdk: FieldValue<u32>,
    pub target_sdk: FieldValue<u32>,
    pub source_compatibility: JavaVersion,
    pub target_compatibility: JavaVersion,
    /// `kotlinOptions.jvmTarget`, if declared.
    pub jvm_target: Option<JavaVersion>,
    pub application_id: FieldValue<String>,
    pub version_code: FieldValue<u32>,
    pub version_name: FieldValue<String>,
    /// Build types in declaration order.
    pub build_variants: Vec<BuildVariant>,
    /// Relative path to the Flutter module (`flutter { source }`).
    pub flutter_source: Option<String>,
}

impl ConfigDescriptor {
    /// Plugin ids in declaration order.
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id.as_str()).collect()
    }
}

/// A build type (variant) and its overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVariant {
    /// Variant name (e.g., "release").
    pub name: String,
    /// Name of the signing configuration in the registry.
    pub signing_config: Option<String>,
    pub application_id_suffix: Option<String>,
    pub version_name_suffix: Option<String>,
}

impl BuildVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signing_config: None,
            application_id_suffix: None,
            version_name_suffix: None,
        }
    }

    pub fn signed_with(mut self, signing_config: impl Into<String>) -> Self {
        self.signing_config = Some(signing_config.into());
        self
    }
}

/// A descriptor with every reference resolved. This is what gets
/// validated and handed to the build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDescriptor {
    pub plugins: Vec<PluginDecl>,
    pub namespace: String,
    pub compile_sdk: u32,
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub source_compatibility: JavaVersion,
    pub target_compatibility: JavaVersion,
    pub jvm_target: Option<JavaVersion>,
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
    pub build_variants: Vec<BuildVariant>,
    pub flutter_source: Option<String>,
}

impl ResolvedDescriptor {
    /// Look up a build variant by name.
    pub fn variant(&self, name: &str) -> Option<&BuildVariant> {
        self.build_variants.iter().find(|v| v.name == name)
    }

    /// Application id with the variant's suffix applied.
    pub fn application_id_for(&self, variant: &BuildVariant) -> String {
        match &variant.application_id_suffix {
            Some(suffix) => format!("{}{}", self.application_id, suffix),
            None => self.application_id.clone(),
        }
    }

    /// Version name with the variant's suffix applied.
    pub fn version_name_for(&self, variant: &BuildVariant) -> String {
        match &variant.version_name_suffix {
            Some(suffix) => format!("{}{}", self.version_name, suffix),
            None => self.version_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> ResolvedDescriptor {
        ResolvedDescriptor {
            plugins: vec![],
            namespace: "com.example.app".to_string(),
            compile_sdk: 36,
            min_sdk: 21,
            target_sdk: 36,
            source_compatibility: JavaVersion::VERSION_11,
            target_compatibility: JavaVersion::VERSION_11,
            jvm_target: None,
            application_id: "com.example.app".to_string(),
            version_code: 7,
            version_name: "1.4.0".to_string(),
            build_variants: vec![BuildVariant::new("release").signed_with("release")],
            flutter_source: None,
        }
    }

    #[test]
    fn test_variant_suffixes() {
        let desc = resolved();
        let mut debug = BuildVariant::new("debug");
        debug.application_id_suffix = Some(".debug".to_string());
        debug.version_name_suffix = Some("-dev".to_string());

        assert_eq!(desc.application_id_for(&debug), "com.example.app.debug");
        assert_eq!(desc.version_name_for(&debug), "1.4.0-dev");

        let release = desc.variant("release").unwrap();
        assert_eq!(desc.application_id_for(release), "com.example.app");
        assert_eq!(release.signing_config.as_deref(), Some("release"));
    }
}
