//! Signing configuration abstraction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

/// A named credential set used to sign a build artifact.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    pub name: String,
    pub store_file: Option<String>,
    #[serde(skip_serializing)]
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    #[serde(skip_serializing)]
    pub key_password: Option<String>,
}

impl SigningConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            store_password: None,
            key_alias: None,
            key_password: None,
        }
    }

    /// The implicit debug configuration every Android project has.
    pub fn debug() -> Self {
        Self {
            name: "debug".to_string(),
            store_file: Some("~/.android/debug.keystore".to_string()),
            store_password: Some("android".to_string()),
            key_alias: Some("androiddebugkey".to_string()),
            key_password: Some("android".to_string()),
        }
    }
}

// Passwords never reach logs.
impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("SigningConfig")
            .field("name", &self.name)
            .field("store_file", &self.store_file)
            .field("store_password", &redact(&self.store_password))
            .field("key_alias", &self.key_alias)
            .field("key_password", &redact(&self.key_password))
            .finish()
    }
}

/// Trait for signing-configuration registries.
pub trait SigningRegistry: Send + Sync {
    /// Get a signing configuration by name.
    fn get_by_name(&self, name: &str) -> Result<SigningConfig>;

    /// Names of all registered configurations.
    fn names(&self) -> Vec<String>;
}
