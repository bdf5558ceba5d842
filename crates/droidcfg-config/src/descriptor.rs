//! Build descriptor parsing and serialization.
//!
//! The descriptor mirrors the shape of an Android app module's Gradle
//! script:
//!
//! ```kdl
//! plugins {
//!     id "com.android.application"
//!     id "dev.flutter.flutter-gradle-plugin" version="1.0.0"
//! }
//!
//! android {
//!     namespace "com.example.app"
//!     compileSdk 36
//!     compileOptions {
//!         sourceCompatibility "VERSION_11"
//!         targetCompatibility "VERSION_11"
//!     }
//!     defaultConfig {
//!         applicationId "com.example.app"
//!         minSdk "${flutter.minSdkVersion}"
//!         targetSdk 36
//!         versionCode "${flutter.versionCode}"
//!         versionName "${flutter.versionName}"
//!     }
//!     buildTypes {
//!         release {
//!             signingConfig "debug"
//!         }
//!     }
//! }
//! ```

use crate::kdl_util::{
    block, children, first_arg, get_first_string_arg, get_string_prop, leaf, require_string,
    set_once,
};
use crate::variables::contains_reference;
use crate::{ConfigError, ConfigResult};
use droidcfg_core::{BuildVariant, ConfigDescriptor, FieldValue, JavaVersion, PluginDecl};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use tracing::warn;

/// Parse a build descriptor from KDL text.
pub fn parse_descriptor(kdl: &str) -> ConfigResult<ConfigDescriptor> {
    let doc: KdlDocument = kdl.parse()?;
    descriptor_from_document(&doc)
}

/// Reformat descriptor source in place, keeping comments and nodes the
/// descriptor model does not carry. The source must parse as a descriptor.
pub fn format_source(kdl: &str) -> ConfigResult<String> {
    let mut doc: KdlDocument = kdl.parse()?;
    descriptor_from_document(&doc)?;
    doc.autoformat();
    Ok(doc.to_string())
}

fn descriptor_from_document(doc: &KdlDocument) -> ConfigResult<ConfigDescriptor> {
    let mut plugins: Option<Vec<PluginDecl>> = None;
    let mut android: Option<AndroidBlock> = None;
    let mut flutter_source = None;

    for node in doc.nodes() {
        match node.name().value() {
            "plugins" => set_once(&mut plugins, parse_plugins(node)?, "plugins")?,
            "android" => set_once(&mut android, parse_android(node)?, "android")?,
            "flutter" => {
                for child in children(node) {
                    match child.name().value() {
                        "source" => {
                            set_once(
                                &mut flutter_source,
                                require_string(child, "flutter.source")?,
                                "flutter.source",
                            )?;
                        }
                        other => warn!(node = other, "Ignoring unknown flutter setting"),
                    }
                }
            }
            other => warn!(node = other, "Ignoring unknown top-level node"),
        }
    }

    let android = android.ok_or_else(|| ConfigError::MissingField("android".to_string()))?;

    Ok(ConfigDescriptor {
        plugins: plugins.unwrap_or_default(),
        namespace: android.namespace,
        compile_sdk: android.compile_sdk,
        min_sdk: android.min_sdk,
        target_sdk: android.target_sdk,
        source_compatibility: android.source_compatibility,
        target_compatibility: android.target_compatibility,
        jvm_target: android.jvm_target,
        application_id: android.application_id,
        version_code: android.version_code,
        version_name: android.version_name,
        build_variants: android.build_variants,
        flutter_source,
    })
}

struct AndroidBlock {
    namespace: String,
    compile_sdk: FieldValue<u32>,
    min_sdk: FieldValue<u32>,
    target_sdk: FieldValue<u32>,
    source_compatibility: JavaVersion,
    target_compatibility: JavaVersion,
    jvm_target: Option<JavaVersion>,
    application_id: FieldValue<String>,
    version_code: FieldValue<u32>,
    version_name: FieldValue<String>,
    build_variants: Vec<BuildVariant>,
}

fn parse_plugins(node: &KdlNode) -> ConfigResult<Vec<PluginDecl>> {
    let mut plugins: Vec<PluginDecl> = Vec::new();

    for child in children(node) {
        if child.name().value() != "id" {
            return Err(ConfigError::malformed(
                "plugins",
                format!("expected `id`, found `{}`", child.name().value()),
            ));
        }

        let id = require_string(child, "plugin id")?;
        if plugins.iter().any(|p| p.id.as_str() == id) {
            return Err(ConfigError::Duplicate(format!("plugin '{}'", id)));
        }

        let mut plugin = PluginDecl::new(id);
        plugin.version = get_string_prop(child, "version");
        plugins.push(plugin);
    }

    Ok(plugins)
}

fn parse_android(node: &KdlNode) -> ConfigResult<AndroidBlock> {
    let mut namespace = None;
    let mut compile_sdk = None;
    let mut compile_options = None;
    let mut jvm_target = None;
    let mut default_config = None;
    let mut build_variants = None;

    for child in children(node) {
        match child.name().value() {
            "namespace" => {
                let value = require_string(child, "namespace")?;
                if contains_reference(&value) {
                    return Err(ConfigError::malformed(
                        "namespace",
                        format!("references are not allowed here, got \"{}\"", value),
                    ));
                }
                set_once(&mut namespace, value, "namespace")?
            }
            "compileSdk" => set_once(&mut compile_sdk, int_field(child, "compileSdk")?, "compileSdk")?,
            "compileOptions" => set_once(
                &mut compile_options,
                parse_compile_options(child)?,
                "compileOptions",
            )?,
            "kotlinOptions" => {
                for opt in children(child) {
                    match opt.name().value() {
                        "jvmTarget" => set_once(
                            &mut jvm_target,
                            java_field(opt, "kotlinOptions.jvmTarget")?,
                            "kotlinOptions.jvmTarget",
                        )?,
                        other => warn!(node = other, "Ignoring unknown kotlinOptions setting"),
                    }
                }
            }
            "defaultConfig" => set_once(
                &mut default_config,
                parse_default_config(child)?,
                "defaultConfig",
            )?,
            "buildTypes" => set_once(&mut build_variants, parse_build_types(child)?, "buildTypes")?,
            other => warn!(node = other, "Ignoring unknown android setting"),
        }
    }

    let (source_compatibility, target_compatibility) = compile_options
        .ok_or_else(|| ConfigError::MissingField("android.compileOptions".to_string()))?;
    let defaults = default_config
        .ok_or_else(|| ConfigError::MissingField("android.defaultConfig".to_string()))?;

    Ok(AndroidBlock {
        namespace: namespace
            .ok_or_else(|| ConfigError::MissingField("android.namespace".to_string()))?,
        compile_sdk: compile_sdk
            .ok_or_else(|| ConfigError::MissingField("android.compileSdk".to_string()))?,
        min_sdk: defaults.min_sdk,
        target_sdk: defaults.target_sdk,
        source_compatibility,
        target_compatibility,
        jvm_target,
        application_id: defaults.application_id,
        version_code: defaults.version_code,
        version_name: defaults.version_name,
        build_variants: build_variants.unwrap_or_default(),
    })
}

fn parse_compile_options(node: &KdlNode) -> ConfigResult<(JavaVersion, JavaVersion)> {
    let mut source = None;
    let mut target = None;

    for child in children(node) {
        match child.name().value() {
            "sourceCompatibility" => set_once(
                &mut source,
                java_field(child, "sourceCompatibility")?,
                "sourceCompatibility",
            )?,
            "targetCompatibility" => set_once(
                &mut target,
                java_field(child, "targetCompatibility")?,
                "targetCompatibility",
            )?,
            other => warn!(node = other, "Ignoring unknown compileOptions setting"),
        }
    }

    Ok((
        source.ok_or_else(|| {
            ConfigError::MissingField("compileOptions.sourceCompatibility".to_string())
        })?,
        target.ok_or_else(|| {
            ConfigError::MissingField("compileOptions.targetCompatibility".to_string())
        })?,
    ))
}

struct DefaultConfig {
    application_id: FieldValue<String>,
    min_sdk: FieldValue<u32>,
    target_sdk: FieldValue<u32>,
    version_code: FieldValue<u32>,
    version_name: FieldValue<String>,
}

fn parse_default_config(node: &KdlNode) -> ConfigResult<DefaultConfig> {
    let mut application_id = None;
    let mut min_sdk = None;
    let mut target_sdk = None;
    let mut version_code = None;
    let mut version_name = None;

    for child in children(node) {
        match child.name().value() {
            "applicationId" => set_once(
                &mut application_id,
                string_field(child, "applicationId")?,
                "applicationId",
            )?,
            "minSdk" => set_once(&mut min_sdk, int_field(child, "minSdk")?, "minSdk")?,
            "targetSdk" => set_once(&mut target_sdk, int_field(child, "targetSdk")?, "targetSdk")?,
            "versionCode" => set_once(
                &mut version_code,
                int_field(child, "versionCode")?,
                "versionCode",
            )?,
            "versionName" => set_once(
                &mut version_name,
                string_field(child, "versionName")?,
                "versionName",
            )?,
            other => warn!(node = other, "Ignoring unknown defaultConfig setting"),
        }
    }

    let missing = |field: &str| ConfigError::MissingField(format!("defaultConfig.{}", field));

    Ok(DefaultConfig {
        application_id: application_id.ok_or_else(|| missing("applicationId"))?,
        min_sdk: min_sdk.ok_or_else(|| missing("minSdk"))?,
        target_sdk: target_sdk.ok_or_else(|| missing("targetSdk"))?,
        version_code: version_code.ok_or_else(|| missing("versionCode"))?,
        version_name: version_name.ok_or_else(|| missing("versionName"))?,
    })
}

fn parse_build_types(node: &KdlNode) -> ConfigResult<Vec<BuildVariant>> {
    let mut variants: Vec<BuildVariant> = Vec::new();

    for child in children(node) {
        let name = child.name().value();
        if variants.iter().any(|v| v.name == name) {
            return Err(ConfigError::Duplicate(format!("build type '{}'", name)));
        }

        let mut variant = BuildVariant::new(name);
        for setting in children(child) {
            let field = format!("buildTypes.{}.{}", name, setting.name().value());
            match setting.name().value() {
                "signingConfig" => set_once(
                    &mut variant.signing_config,
                    require_string(setting, &field)?,
                    &field,
                )?,
                "applicationIdSuffix" => set_once(
                    &mut variant.application_id_suffix,
                    require_string(setting, &field)?,
                    &field,
                )?,
                "versionNameSuffix" => set_once(
                    &mut variant.version_name_suffix,
                    require_string(setting, &field)?,
                    &field,
                )?,
                other => warn!(variant = name, node = other, "Ignoring unknown build type setting"),
            }
        }
        variants.push(variant);
    }

    Ok(variants)
}

/// An integer literal, or a string holding at least one reference.
fn int_field(node: &KdlNode, field: &str) -> ConfigResult<FieldValue<u32>> {
    let value = first_arg(node).ok_or_else(|| ConfigError::malformed(field, "missing value"))?;

    if let Some(n) = value.as_integer() {
        return u32::try_from(n)
            .map(FieldValue::Literal)
            .map_err(|_| ConfigError::malformed(field, format!("{} is out of range", n)));
    }

    match value.as_string() {
        Some(s) if contains_reference(s) => Ok(FieldValue::Expr(s.to_string())),
        Some(s) => Err(ConfigError::malformed(
            field,
            format!("expected an integer or ${{reference}}, got \"{}\"", s),
        )),
        None => Err(ConfigError::malformed(
            field,
            format!("expected an integer, got {:?}", value),
        )),
    }
}

fn string_field(node: &KdlNode, field: &str) -> ConfigResult<FieldValue<String>> {
    let s = require_string(node, field)?;
    if contains_reference(&s) {
        Ok(FieldValue::Expr(s))
    } else {
        Ok(FieldValue::Literal(s))
    }
}

fn java_field(node: &KdlNode, field: &str) -> ConfigResult<JavaVersion> {
    let raw = match get_first_string_arg(node) {
        Some(s) => s,
        // `jvmTarget 11` / `sourceCompatibility 17`
        None => match first_arg(node).and_then(|v| v.as_integer()) {
            Some(n) => n.to_string(),
            None => return Err(ConfigError::malformed(field, "expected a Java version")),
        },
    };
    raw.parse()
        .map_err(|e: droidcfg_core::Error| ConfigError::malformed(field, e.to_string()))
}

fn int_value(value: &FieldValue<u32>) -> KdlValue {
    match value {
        FieldValue::Literal(n) => KdlValue::Integer((*n).into()),
        FieldValue::Expr(expr) => KdlValue::String(expr.clone()),
    }
}

// A literal containing `${...}` is written as-is and reads back as an Expr.
fn string_value(value: &FieldValue<String>) -> KdlValue {
    match value {
        FieldValue::Literal(s) | FieldValue::Expr(s) => KdlValue::String(s.clone()),
    }
}

fn str_value(s: &str) -> KdlValue {
    KdlValue::String(s.to_string())
}

/// Build the canonical KDL document for a descriptor.
pub fn to_document(descriptor: &ConfigDescriptor) -> KdlDocument {
    let mut doc = KdlDocument::new();

    let plugin_nodes = descriptor
        .plugins
        .iter()
        .map(|plugin| {
            let mut node = leaf("id", str_value(plugin.id.as_str()));
            if let Some(version) = &plugin.version {
                node.entries_mut()
                    .push(KdlEntry::new_prop("version", str_value(version)));
            }
            node
        })
        .collect();
    doc.nodes_mut().push(block("plugins", plugin_nodes));

    let mut android = vec![
        leaf("namespace", str_value(&descriptor.namespace)),
        leaf("compileSdk", int_value(&descriptor.compile_sdk)),
        block(
            "compileOptions",
            vec![
                leaf(
                    "sourceCompatibility",
                    str_value(&descriptor.source_compatibility.to_string()),
                ),
                leaf(
                    "targetCompatibility",
                    str_value(&descriptor.target_compatibility.to_string()),
                ),
            ],
        ),
    ];

    if let Some(jvm_target) = descriptor.jvm_target {
        android.push(block(
            "kotlinOptions",
            vec![leaf("jvmTarget", str_value(&jvm_target.jvm_target()))],
        ));
    }

    android.push(block(
        "defaultConfig",
        vec![
            leaf("applicationId", string_value(&descriptor.application_id)),
            leaf("minSdk", int_value(&descriptor.min_sdk)),
            leaf("targetSdk", int_value(&descriptor.target_sdk)),
            leaf("versionCode", int_value(&descriptor.version_code)),
            leaf("versionName", string_value(&descriptor.version_name)),
        ],
    ));

    if !descriptor.build_variants.is_empty() {
        let variants = descriptor
            .build_variants
            .iter()
            .map(|variant| {
                let mut settings = Vec::new();
                if let Some(name) = &variant.signing_config {
                    settings.push(leaf("signingConfig", str_value(name)));
                }
                if let Some(suffix) = &variant.application_id_suffix {
                    settings.push(leaf("applicationIdSuffix", str_value(suffix)));
                }
                if let Some(suffix) = &variant.version_name_suffix {
                    settings.push(leaf("versionNameSuffix", str_value(suffix)));
                }
                block(&variant.name, settings)
            })
            .collect();
        android.push(block("buildTypes", variants));
    }

    doc.nodes_mut().push(block("android", android));

    if let Some(source) = &descriptor.flutter_source {
        doc.nodes_mut()
            .push(block("flutter", vec![leaf("source", str_value(source))]));
    }

    doc.autoformat();
    doc
}

/// Serialize a descriptor to canonical KDL text.
///
/// Only what the descriptor models is written: comments and unknown
/// nodes of the source are not carried. Use [`format_source`] to tidy a
/// file without losing them.
pub fn to_kdl(descriptor: &ConfigDescriptor) -> String {
    to_document(descriptor).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const ROUTEX: &str = r#"
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

    fn minimal(android_body: &str) -> String {
        format!(
            r#"
            android {{
                namespace "com.example.app"
                compileOptions {{
                    sourceCompatibility "VERSION_17"
                    targetCompatibility "VERSION_17"
                }}
                {}
            }}
            "#,
            android_body
        )
    }

    const DEFAULT_CONFIG: &str = r#"
        defaultConfig {
            applicationId "com.example.app"
            minSdk 21
            targetSdk 34
            versionCode 3
            versionName "1.0.2"
        }
    "#;

    #[test]
    fn test_parse_flutter_app() {
        let desc = parse_descriptor(ROUTEX).unwrap();

        assert_eq!(desc.namespace, "com.example.routex");
        assert_eq!(desc.compile_sdk, FieldValue::Literal(36));
        assert_eq!(
            desc.min_sdk,
            FieldValue::Expr("${flutter.minSdkVersion}".to_string())
        );
        assert_eq!(desc.target_sdk, FieldValue::Literal(36));
        assert_eq!(desc.source_compatibility, JavaVersion::VERSION_11);
        assert_eq!(desc.target_compatibility, JavaVersion::VERSION_11);
        assert_eq!(desc.jvm_target, Some(JavaVersion::VERSION_11));
        assert_eq!(
            desc.application_id,
            FieldValue::Literal("com.example.routex".to_string())
        );
        assert_eq!(
            desc.build_variants[0].signing_config.as_deref(),
            Some("debug")
        );
        assert_eq!(desc.flutter_source.as_deref(), Some("../.."));
    }

    #[test]
    fn test_plugin_order_preserved() {
        let kdl = minimal(DEFAULT_CONFIG).replace(
            "android {",
            r#"plugins {
                id "c.third"
                id "a.first"
                id "b.second" version="2.0"
            }
            android {"#,
        );

        let desc = parse_descriptor(&kdl).unwrap();
        assert_eq!(desc.plugin_ids(), vec!["c.third", "a.first", "b.second"]);
        assert_eq!(desc.plugins[2].version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_round_trip() {
        let desc = parse_descriptor(ROUTEX).unwrap();
        let text = to_kdl(&desc);
        let reparsed = parse_descriptor(&text).unwrap();
        assert_eq!(desc, reparsed);
    }

    #[test]
    fn test_round_trip_with_variant_overrides() {
        let kdl = minimal(&format!(
            r#"
            compileSdk 34
            {}
            buildTypes {{
                debug {{
                    applicationIdSuffix ".debug"
                    versionNameSuffix "-dev"
                }}
                release {{
                    signingConfig "upload"
                }}
            }}
            "#,
            DEFAULT_CONFIG
        ));

        let desc = parse_descriptor(&kdl).unwrap();
        assert_eq!(desc.build_variants.len(), 2);
        assert_eq!(desc.build_variants[0].name, "debug");
        assert_eq!(desc.build_variants[0].signing_config, None);

        let reparsed = parse_descriptor(&to_kdl(&desc)).unwrap();
        assert_eq!(desc, reparsed);
        assert!(reparsed.flutter_source.is_none());
        assert!(reparsed.jvm_target.is_none());
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_descriptor("android { namespace \"unterminated }").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_android_block() {
        let err = parse_descriptor("plugins { id \"com.android.application\"; }").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "android"));
    }

    #[test]
    fn test_missing_compile_sdk() {
        let err = parse_descriptor(&minimal(DEFAULT_CONFIG)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "android.compileSdk"));
    }

    #[test]
    fn test_missing_version_name() {
        let kdl = minimal(
            r#"
            compileSdk 34
            defaultConfig {
                applicationId "com.example.app"
                minSdk 21
                targetSdk 34
                versionCode 3
            }
            "#,
        );
        let err = parse_descriptor(&kdl).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField(ref f) if f == "defaultConfig.versionName")
        );
    }

    #[test]
    fn test_non_integer_sdk() {
        let kdl = minimal(&format!("compileSdk \"thirty-six\"\n{}", DEFAULT_CONFIG));
        let err = parse_descriptor(&kdl).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, ConfigError::Malformed { ref field, .. } if field == "compileSdk"));
    }

    #[test]
    fn test_negative_sdk() {
        let kdl = minimal(&format!("compileSdk -1\n{}", DEFAULT_CONFIG));
        let err = parse_descriptor(&kdl).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_bad_java_version() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                compileSdk 34
                compileOptions {
                    sourceCompatibility "VERSION_ELEVEN"
                    targetCompatibility "VERSION_11"
                }
            }
        "#;
        let err = parse_descriptor(kdl).unwrap_err();
        assert!(
            matches!(err, ConfigError::Malformed { ref field, .. } if field == "sourceCompatibility")
        );
    }

    #[test]
    fn test_integer_java_version() {
        let kdl = minimal(&format!(
            "compileSdk 34\nkotlinOptions {{ jvmTarget 17; }}\n{}",
            DEFAULT_CONFIG
        ));
        let desc = parse_descriptor(&kdl).unwrap();
        assert_eq!(desc.jvm_target, Some(JavaVersion::VERSION_17));
    }

    #[test]
    fn test_duplicate_plugin() {
        let kdl = minimal(DEFAULT_CONFIG).replace(
            "android {",
            r#"plugins {
                id "com.android.application"
                id "com.android.application"
            }
            android {"#,
        );
        let err = parse_descriptor(&kdl).unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate(_)));
    }

    #[test]
    fn test_duplicate_field() {
        let kdl = minimal(&format!("compileSdk 34\ncompileSdk 35\n{}", DEFAULT_CONFIG));
        let err = parse_descriptor(&kdl).unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate(ref f) if f == "compileSdk"));
    }

    #[test]
    fn test_duplicate_build_type() {
        let kdl = minimal(&format!(
            r#"
            compileSdk 34
            {}
            buildTypes {{
                release {{ signingConfig "a"; }}
                release {{ signingConfig "b"; }}
            }}
            "#,
            DEFAULT_CONFIG
        ));
        let err = parse_descriptor(&kdl).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_unknown_nodes_are_ignored() {
        let kdl = minimal(&format!(
            "compileSdk 34\nndkVersion \"27.0.12077973\"\n{}",
            DEFAULT_CONFIG
        ))
        .replace("android {", "dependencies { }\nandroid {");
        let desc = parse_descriptor(&kdl).unwrap();
        assert_eq!(desc.compile_sdk, FieldValue::Literal(34));
    }

    #[test]
    fn test_reference_namespace_rejected() {
        let kdl = minimal(&format!("compileSdk 34\n{}", DEFAULT_CONFIG))
            .replace("namespace \"com.example.app\"", "namespace \"${flutter.ns}\"");
        let err = parse_descriptor(&kdl).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(matches!(err, ConfigError::Malformed { ref field, .. } if field == "namespace"));
    }

    #[test]
    fn test_constructed_literal_with_reference_reads_back_as_expr() {
        let mut desc = parse_descriptor(ROUTEX).unwrap();
        desc.version_name = FieldValue::Literal("${flutter.versionName}-rc".to_string());

        let reparsed = parse_descriptor(&to_kdl(&desc)).unwrap();
        assert_eq!(
            reparsed.version_name,
            FieldValue::Expr("${flutter.versionName}-rc".to_string())
        );
    }

    #[test]
    fn test_format_source_keeps_comments_and_unknown_nodes() {
        let kdl = ROUTEX
            .replace(
                "id \"dev.flutter.flutter-gradle-plugin\"",
                "// must stay after the Android and Kotlin plugins\n            id \"dev.flutter.flutter-gradle-plugin\"",
            )
            .replace("compileSdk 36", "compileSdk 36\n            ndkVersion \"27.0.12077973\"");

        let formatted = format_source(&kdl).unwrap();
        assert!(formatted.contains("must stay after the Android and Kotlin plugins"));
        assert!(formatted.contains("ndkVersion"));
        assert!(formatted.contains("27.0.12077973"));
        assert_eq!(parse_descriptor(&formatted).unwrap(), parse_descriptor(&kdl).unwrap());
    }

    #[test]
    fn test_format_source_rejects_invalid_descriptor() {
        let err = format_source("plugins { id \"com.android.application\"; }").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }
}
