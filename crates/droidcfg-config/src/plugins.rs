//! Plugin catalog and ordered plugin application.

use crate::{ConfigError, ConfigResult};
use droidcfg_core::{
    Error as CoreError, PluginDecl, PluginId, PluginResolver, PluginSpec, Requirement,
    Result as CoreResult,
};
use std::collections::HashMap;
use tracing::debug;

pub const ANDROID_APPLICATION: &str = "com.android.application";
pub const ANDROID_LIBRARY: &str = "com.android.library";
pub const KOTLIN_ANDROID: &str = "org.jetbrains.kotlin.android";
pub const FLUTTER_GRADLE: &str = "dev.flutter.flutter-gradle-plugin";
pub const GOOGLE_SERVICES: &str = "com.google.gms.google-services";

/// A static table of known plugins and their prerequisites.
#[derive(Debug, Clone, Default)]
pub struct PluginCatalog {
    specs: HashMap<PluginId, PluginSpec>,
    aliases: HashMap<PluginId, PluginId>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plugins a Flutter Android app module normally applies.
    pub fn android() -> Self {
        let android_any = || Requirement::any([ANDROID_APPLICATION, ANDROID_LIBRARY]);

        let mut catalog = Self::new();
        catalog.register(PluginSpec {
            id: PluginId::new(ANDROID_APPLICATION),
            requires: vec![],
            after: vec![],
        });
        catalog.register(PluginSpec {
            id: PluginId::new(ANDROID_LIBRARY),
            requires: vec![],
            after: vec![],
        });
        catalog.register(PluginSpec {
            id: PluginId::new(KOTLIN_ANDROID),
            requires: vec![android_any()],
            after: vec![],
        });
        catalog.alias("kotlin-android", KOTLIN_ANDROID);
        catalog.register(PluginSpec {
            id: PluginId::new(FLUTTER_GRADLE),
            requires: vec![android_any()],
            after: vec![PluginId::new(KOTLIN_ANDROID)],
        });
        catalog.register(PluginSpec {
            id: PluginId::new(GOOGLE_SERVICES),
            requires: vec![Requirement::one(ANDROID_APPLICATION)],
            after: vec![],
        });
        catalog
    }

    pub fn register(&mut self, spec: PluginSpec) {
        self.specs.insert(spec.id.clone(), spec);
    }

    /// Make `alias` resolve to the plugin registered as `canonical`.
    pub fn alias(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(PluginId::new(alias), PluginId::new(canonical));
    }

    fn canonical<'a>(&'a self, id: &'a PluginId) -> &'a PluginId {
        self.aliases.get(id).unwrap_or(id)
    }
}

impl PluginResolver for PluginCatalog {
    fn resolve(&self, id: &PluginId) -> CoreResult<PluginSpec> {
        self.specs
            .get(self.canonical(id))
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("plugin '{}'", id)))
    }
}

/// Resolve and apply plugins strictly in declaration order.
///
/// Returns the resolved specs in the same order. Fails on the first
/// unknown plugin or the first plugin whose prerequisites are not yet
/// applied.
pub fn apply_plugins(
    plugins: &[PluginDecl],
    resolver: &dyn PluginResolver,
) -> ConfigResult<Vec<PluginSpec>> {
    let specs = plugins
        .iter()
        .map(|decl| {
            resolver.resolve(&decl.id).map_err(|e| match e {
                CoreError::NotFound(_) => ConfigError::NotFound {
                    kind: "plugin",
                    name: decl.id.to_string(),
                },
                other => ConfigError::invalid(format!("plugin '{}'", decl.id), other.to_string()),
            })
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    let mut applied: Vec<&PluginId> = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        for requirement in &spec.requires {
            if !requirement.any_of.iter().any(|r| applied.contains(&r)) {
                return Err(ConfigError::PluginOrder {
                    plugin: plugins[index].id.to_string(),
                    requires: describe(&requirement.any_of),
                });
            }
        }

        let declared_later = &specs[index + 1..];
        for earlier in &spec.after {
            if declared_later.iter().any(|s| &s.id == earlier) {
                return Err(ConfigError::PluginOrder {
                    plugin: plugins[index].id.to_string(),
                    requires: format!("'{}'", earlier),
                });
            }
        }

        debug!(plugin = %spec.id, position = index, "Applied plugin");
        applied.push(&spec.id);
    }

    Ok(specs)
}

fn describe(ids: &[PluginId]) -> String {
    ids.iter()
        .map(|id| format!("'{}'", id))
        .collect::<Vec<_>>()
        .join(" or ")
}
