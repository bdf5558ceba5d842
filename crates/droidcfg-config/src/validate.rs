//! Descriptor validation.
//!
//! Runs after references are resolved. Checks stop at the first
//! violation; nothing is handed off unless all of them pass.

use crate::{ConfigError, ConfigResult};
use droidcfg_core::{Error as CoreError, ResolvedDescriptor, SigningRegistry};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Largest versionCode Google Play accepts.
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

// Java package style: at least two dot-separated segments
static PACKAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*(?:\.[a-zA-Z][a-zA-Z0-9_]*)+$").unwrap()
});

/// Validate a resolved descriptor against the signing registry.
pub fn validate(descriptor: &ResolvedDescriptor, signing: &dyn SigningRegistry) -> ConfigResult<()> {
    check_sdk_range(descriptor)?;
    check_java_levels(descriptor)?;
    check_identity(descriptor)?;
    check_version(descriptor)?;
    check_signing_references(descriptor, signing)?;

    debug!(namespace = %descriptor.namespace, "Descriptor validated");
    Ok(())
}

fn check_sdk_range(d: &ResolvedDescriptor) -> ConfigResult<()> {
    if d.min_sdk == 0 {
        return Err(ConfigError::invalid("minSdk", "must be at least 1"));
    }
    if d.min_sdk <= d.target_sdk && d.target_sdk <= d.compile_sdk {
        return Ok(());
    }
    Err(ConfigError::SdkRange {
        min_sdk: d.min_sdk,
        target_sdk: d.target_sdk,
        compile_sdk: d.compile_sdk,
    })
}

fn check_java_levels(d: &ResolvedDescriptor) -> ConfigResult<()> {
    for (field, level) in [
        ("sourceCompatibility", d.source_compatibility),
        ("targetCompatibility", d.target_compatibility),
    ] {
        if !level.is_supported() {
            return Err(ConfigError::invalid(
                field,
                format!("{} is not a supported Java level", level),
            ));
        }
    }

    if d.source_compatibility > d.target_compatibility {
        return Err(ConfigError::invalid(
            "compileOptions",
            format!(
                "sourceCompatibility {} is newer than targetCompatibility {}",
                d.source_compatibility, d.target_compatibility
            ),
        ));
    }

    if let Some(jvm_target) = d.jvm_target {
        if jvm_target != d.target_compatibility {
            return Err(ConfigError::invalid(
                "kotlinOptions.jvmTarget",
                format!(
                    "jvmTarget {} does not match targetCompatibility {}",
                    jvm_target.jvm_target(),
                    d.target_compatibility
                ),
            ));
        }
    }

    Ok(())
}

fn check_package_name(field: &str, value: &str) -> ConfigResult<()> {
    if PACKAGE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("'{}' is not a valid package name", value),
        ))
    }
}

fn check_identity(d: &ResolvedDescriptor) -> ConfigResult<()> {
    check_package_name("namespace", &d.namespace)?;
    check_package_name("applicationId", &d.application_id)?;

    for variant in &d.build_variants {
        if variant.application_id_suffix.is_some() {
            check_package_name(
                &format!("buildTypes.{}.applicationIdSuffix", variant.name),
                &d.application_id_for(variant),
            )?;
        }
    }
    Ok(())
}

fn check_version(d: &ResolvedDescriptor) -> ConfigResult<()> {
    if d.version_code == 0 || d.version_code > MAX_VERSION_CODE {
        return Err(ConfigError::invalid(
            "versionCode",
            format!("{} is outside 1..={}", d.version_code, MAX_VERSION_CODE),
        ));
    }
    if d.version_name.trim().is_empty() {
        return Err(ConfigError::invalid("versionName", "must not be empty"));
    }
    Ok(())
}

fn check_signing_references(
    d: &ResolvedDescriptor,
    signing: &dyn SigningRegistry,
) -> ConfigResult<()> {
    for variant in &d.build_variants {
        let Some(name) = &variant.signing_config else {
            continue;
        };
        match signing.get_by_name(name) {
            Ok(config) => debug!(variant = %variant.name, signing = ?config, "Signing config found"),
            Err(CoreError::NotFound(_)) => {
                debug!(variant = %variant.name, missing = %name, known = ?signing.names(), "Signing config not registered");
                return Err(ConfigError::NotFound {
                    kind: "signing config",
                    name: name.clone(),
                });
            }
            Err(e) => {
                return Err(ConfigError::invalid(
                    format!("buildTypes.{}.signingConfig", variant.name),
                    e.to_string(),
                ));
            }
        }
    }
    Ok(())
}
