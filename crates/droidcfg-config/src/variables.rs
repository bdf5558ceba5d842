//! Reference resolution for build descriptors.
//!
//! Descriptor values may reference project metadata:
//! - `${flutter.minSdkVersion}` - Minimum SDK chosen by the Flutter toolchain
//! - `${flutter.versionCode}` - Build number from `local.properties`
//! - `${flutter.versionName}` - Build name from `local.properties`
//! - `${env.VAR_NAME}` - Environment variable (when the provider carries them)
//!
//! Unlike free-form interpolation, every reference must resolve: an
//! unknown key is an error, never left in place.

use crate::{ConfigError, ConfigResult};
use droidcfg_core::{ConfigDescriptor, FieldValue, MetadataProvider, ResolvedDescriptor};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// Regex for matching ${...} references, dotted keys of any depth
static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\}").unwrap()
});

/// Whether `input` contains at least one `${...}` reference.
pub fn contains_reference(input: &str) -> bool {
    VAR_REGEX.is_match(input)
}

/// Resolve a single reference name through the metadata provider.
pub fn resolve_variable(
    name: &str,
    provider: Option<&dyn MetadataProvider>,
) -> ConfigResult<String> {
    let Some(provider) = provider else {
        return Err(ConfigError::UnresolvedReference {
            name: name.to_string(),
            reason: "no project-metadata provider".to_string(),
        });
    };

    provider
        .get(name)
        .ok_or_else(|| ConfigError::UnresolvedReference {
            name: name.to_string(),
            reason: "unknown key".to_string(),
        })
}

/// Replace every reference in `input`, failing on the first unresolved one.
pub fn interpolate(input: &str, provider: Option<&dyn MetadataProvider>) -> ConfigResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for caps in VAR_REGEX.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        output.push_str(&input[last..whole.start()]);
        output.push_str(&resolve_variable(&caps[1], provider)?);
        last = whole.end();
    }
    output.push_str(&input[last..]);

    Ok(output)
}

fn resolve_string(
    field: &str,
    value: &FieldValue<String>,
    provider: Option<&dyn MetadataProvider>,
) -> ConfigResult<String> {
    match value {
        FieldValue::Literal(s) => Ok(s.clone()),
        FieldValue::Expr(expr) => {
            let resolved = interpolate(expr, provider)?;
            debug!(field, expr = %expr, value = %resolved, "Resolved reference");
            Ok(resolved)
        }
    }
}

fn resolve_int(
    field: &str,
    value: &FieldValue<u32>,
    provider: Option<&dyn MetadataProvider>,
) -> ConfigResult<u32> {
    match value {
        FieldValue::Literal(n) => Ok(*n),
        FieldValue::Expr(expr) => {
            let resolved = interpolate(expr, provider)?;
            debug!(field, expr = %expr, value = %resolved, "Resolved reference");
            resolved.trim().parse::<u32>().map_err(|_| {
                ConfigError::invalid(
                    field,
                    format!("'{}' resolved to '{}', expected an integer", expr, resolved),
                )
            })
        }
    }
}

/// Resolve every reference field of a parsed descriptor.
pub fn resolve_descriptor(
    descriptor: &ConfigDescriptor,
    provider: Option<&dyn MetadataProvider>,
) -> ConfigResult<ResolvedDescriptor> {
    Ok(ResolvedDescriptor {
        plugins: descriptor.plugins.clone(),
        namespace: descriptor.namespace.clone(),
        compile_sdk: resolve_int("compileSdk", &descriptor.compile_sdk, provider)?,
        min_sdk: resolve_int("minSdk", &descriptor.min_sdk, provider)?,
        target_sdk: resolve_int("targetSdk", &descriptor.target_sdk, provider)?,
        source_compatibility: descriptor.source_compatibility,
        target_compatibility: descriptor.target_compatibility,
        jvm_target: descriptor.jvm_target,
        application_id: resolve_string("applicationId", &descriptor.application_id, provider)?,
        version_code: resolve_int("versionCode", &descriptor.version_code, provider)?,
        version_name: resolve_string("versionName", &descriptor.version_name, provider)?,
        build_variants: descriptor.build_variants.clone(),
        flutter_source: descriptor.flutter_source.clone(),
    })
}
