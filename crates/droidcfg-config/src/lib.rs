//! KDL build descriptor handling for droidcfg.
//!
//! This crate handles:
//! - Descriptor parsing and serialization (build.kdl)
//! - Reference resolution against project metadata
//! - Validation against a signing-configuration registry
//! - Plugin ordering against a plugin catalog

pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod plugins;
pub mod signing;
pub mod validate;
pub mod variables;

mod kdl_util;

pub use descriptor::{format_source, parse_descriptor, to_kdl};
pub use error::{ConfigError, ConfigResult, ErrorKind};
pub use metadata::{ProjectMetadata, ProjectMetadataBuilder};
pub use plugins::{PluginCatalog, apply_plugins};
pub use signing::SigningConfigSet;
pub use validate::validate;
pub use variables::{resolve_descriptor, resolve_variable};

use droidcfg_core::{MetadataProvider, ResolvedDescriptor, SigningRegistry};
use std::path::Path;
use tracing::{debug, info};

/// Default descriptor location relative to a Flutter project root.
pub const DEFAULT_DESCRIPTOR_PATH: &str = "android/app/build.kdl";

/// Parse, resolve and validate a descriptor in one step.
///
/// Nothing is returned unless every step succeeds.
pub fn load(
    source: &str,
    metadata: Option<&dyn MetadataProvider>,
    signing: &dyn SigningRegistry,
) -> ConfigResult<ResolvedDescriptor> {
    let descriptor = parse_descriptor(source)?;
    debug!(namespace = %descriptor.namespace, plugins = ?descriptor.plugin_ids(), "Parsed descriptor");

    let resolved = resolve_descriptor(&descriptor, metadata)?;
    validate(&resolved, signing)?;

    info!(
        application_id = %resolved.application_id,
        version_code = resolved.version_code,
        version_name = %resolved.version_name,
        "Descriptor loaded"
    );
    Ok(resolved)
}

/// Read a descriptor file and [`load`] it.
pub fn load_file(
    path: impl AsRef<Path>,
    metadata: Option<&dyn MetadataProvider>,
    signing: &dyn SigningRegistry,
) -> ConfigResult<ResolvedDescriptor> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading descriptor");
    let source = std::fs::read_to_string(path)?;
    load(&source, metadata, signing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const APP: &str = r#"
        plugins {
            id "com.android.application"
            id "kotlin-android"
            id "dev.flutter.flutter-gradle-plugin"
        }

        android {
            namespace "com.example.routex"
            compileSdk 36

            compileOptions {
                sourceCompatibility "VERSION_11"
                targetCompatibility "VERSION_11"
            }

            kotlinOptions {
                jvmTarget "11"
            }

            defaultConfig {
                applicationId "com.example.routex"
                minSdk "${flutter.minSdkVersion}"
                targetSdk 36
                versionCode "${flutter.versionCode}"
                versionName "${flutter.versionName}"
            }

            buildTypes {
                release {
                    signingConfig "debug"
                }
            }
        }

        flutter {
            source "../.."
        }
    "#;

    #[test]
    fn test_load_flutter_app() {
        let metadata = ProjectMetadata::builder().with_flutter_defaults().build();
        let registry = SigningConfigSet::with_debug();

        let resolved = load(APP, Some(&metadata), &registry).unwrap();
        assert_eq!(resolved.min_sdk, 21);
        assert_eq!(resolved.target_sdk, 36);
        assert_eq!(resolved.compile_sdk, 36);
        assert_eq!(resolved.version_code, 1);
        assert_eq!(resolved.version_name, "1.0");
        assert_eq!(resolved.flutter_source.as_deref(), Some("../.."));
    }

    #[test]
    fn test_plugin_order_survives_handoff() {
        let metadata = ProjectMetadata::builder().with_flutter_defaults().build();
        let registry = SigningConfigSet::with_debug();

        let resolved = load(APP, Some(&metadata), &registry).unwrap();
        let applied = apply_plugins(&resolved.plugins, &PluginCatalog::android()).unwrap();

        let declared: Vec<&str> = resolved.plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            declared,
            vec![
                "com.android.application",
                "kotlin-android",
                "dev.flutter.flutter-gradle-plugin"
            ]
        );
        let canonical: Vec<&str> = applied.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            canonical,
            vec![
                "com.android.application",
                "org.jetbrains.kotlin.android",
                "dev.flutter.flutter-gradle-plugin"
            ]
        );
    }

    #[test]
    fn test_load_without_provider_fails() {
        let registry = SigningConfigSet::with_debug();
        let err = load(APP, None, &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
    }

    #[test]
    fn test_load_missing_signing_config() {
        let metadata = ProjectMetadata::builder().with_flutter_defaults().build();
        let registry = SigningConfigSet::empty();

        let err = load(APP, Some(&metadata), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(APP.as_bytes()).unwrap();

        let metadata = ProjectMetadata::builder()
            .with_flutter_defaults()
            .with("flutter.versionCode", "12")
            .build();
        let resolved = load_file(file.path(), Some(&metadata), &SigningConfigSet::with_debug()).unwrap();
        assert_eq!(resolved.version_code, 12);
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file(
            "/definitely/not/here/build.kdl",
            None,
            &SigningConfigSet::with_debug(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
