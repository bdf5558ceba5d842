//! Build plugin declarations and the resolver abstraction.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A Gradle plugin identifier (e.g., `com.android.application`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A plugin as declared in the `plugins` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDecl {
    pub id: PluginId,
    pub version: Option<String>,
}

impl PluginDecl {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PluginId::new(id),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// At least one of `any_of` must already be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub any_of: Vec<PluginId>,
}

impl Requirement {
    pub fn one(id: impl Into<String>) -> Self {
        Self {
            any_of: vec![PluginId::new(id)],
        }
    }

    pub fn any<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_of: ids.into_iter().map(PluginId::new).collect(),
        }
    }
}

/// What a resolver knows about a plugin implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    /// Canonical id (aliases resolve to this).
    pub id: PluginId,
    /// Plugins that must be applied before this one.
    pub requires: Vec<Requirement>,
    /// Plugins that, when declared at all, must come before this one.
    pub after: Vec<PluginId>,
}

/// Trait for locating build-step implementations by plugin id.
pub trait PluginResolver: Send + Sync {
    /// Resolve a plugin id (or alias) to its implementation spec.
    fn resolve(&self, id: &PluginId) -> Result<PluginSpec>;
}
