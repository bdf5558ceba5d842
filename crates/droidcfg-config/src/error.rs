//! Descriptor loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("malformed {field}: {message}")]
    Malformed { field: String, message: String },

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error(
        "invalid SDK range: expected minSdk ({min_sdk}) <= targetSdk ({target_sdk}) <= compileSdk ({compile_sdk})"
    )]
    SdkRange {
        min_sdk: u32,
        target_sdk: u32,
        compile_sdk: u32,
    },

    #[error("plugin '{plugin}' must be applied after {requires}")]
    PluginOrder { plugin: String, requires: String },

    #[error("unresolved reference ${{{name}}}: {reason}")]
    UnresolvedReference { name: String, reason: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`ConfigError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad syntax, missing or mistyped fields.
    Parse,
    /// The input is well formed but breaks a descriptor invariant.
    Validation,
    /// A reference could not be resolved through project metadata.
    UnresolvedReference,
    /// A signing configuration or plugin does not exist.
    NotFound,
    Io,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Parse(_)
            | ConfigError::MissingField(_)
            | ConfigError::Malformed { .. }
            | ConfigError::Duplicate(_) => ErrorKind::Parse,
            ConfigError::InvalidValue { .. }
            | ConfigError::SdkRange { .. }
            | ConfigError::PluginOrder { .. } => ErrorKind::Validation,
            ConfigError::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            ConfigError::NotFound { .. } => ErrorKind::NotFound,
            ConfigError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Malformed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ConfigError::MissingField("namespace".into()).kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            ConfigError::SdkRange {
                min_sdk: 31,
                target_sdk: 30,
                compile_sdk: 30
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ConfigError::NotFound {
                kind: "signing config",
                name: "release".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_unresolved_message() {
        let err = ConfigError::UnresolvedReference {
            name: "flutter.versionCode".into(),
            reason: "unknown key".into(),
        };
        assert_eq!(
            err.to_string(),
            "unresolved reference ${flutter.versionCode}: unknown key"
        );
    }
}
