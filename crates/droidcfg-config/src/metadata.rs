//! Project metadata: the values descriptor references resolve against.
//!
//! Keys are dotted (`flutter.versionCode`). Values come from, in the usual
//! order of precedence:
//! - explicit overrides (`--build-name 1.2.3+4`)
//! - `local.properties` written by the Flutter tool
//! - Flutter toolchain defaults
//!
//! `env.NAME` keys resolve from captured environment variables.

use crate::{ConfigError, ConfigResult};
use droidcfg_core::MetadataProvider;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Values the Flutter Gradle plugin supplies when nothing overrides them.
pub const FLUTTER_DEFAULTS: [(&str, &str); 5] = [
    ("flutter.minSdkVersion", "21"),
    ("flutter.compileSdkVersion", "36"),
    ("flutter.targetSdkVersion", "36"),
    ("flutter.versionCode", "1"),
    ("flutter.versionName", "1.0"),
];

/// In-memory project-metadata provider.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    values: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl ProjectMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ProjectMetadataBuilder {
        ProjectMetadataBuilder::new()
    }

    /// Load a Java `.properties` file such as `android/local.properties`.
    pub fn from_properties_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let mut metadata = Self::new();
        metadata.merge_properties_file(path)?;
        Ok(metadata)
    }

    pub fn merge_properties_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let count = self.merge_properties(&text);
        debug!(path = %path.display(), count, "Loaded properties");
        Ok(())
    }

    /// Merge `key=value` lines, overriding existing keys. Returns the number
    /// of entries read.
    pub fn merge_properties(&mut self, text: &str) -> usize {
        let mut count = 0;
        for line in logical_lines(text) {
            if let Some((key, value)) = parse_property_line(&line) {
                self.values.insert(key, value);
                count += 1;
            }
        }
        count
    }

    /// Fill in Flutter toolchain defaults for keys that are still unset.
    pub fn apply_flutter_defaults(&mut self) {
        for (key, value) in FLUTTER_DEFAULTS {
            self.values
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Apply a Flutter build name such as `1.2.3+4`: the part before `+`
    /// becomes `flutter.versionName`, the part after `flutter.versionCode`.
    pub fn apply_build_name(&mut self, build_name: &str) -> ConfigResult<()> {
        let (name, code) = match build_name.split_once('+') {
            Some((name, code)) => (name, Some(code)),
            None => (build_name, None),
        };

        if name.is_empty() {
            return Err(ConfigError::invalid(
                "build name",
                format!("'{}' has an empty version name", build_name),
            ));
        }

        if let Some(code) = code {
            let code: u32 = code.parse().map_err(|_| {
                ConfigError::invalid(
                    "build name",
                    format!("'{}' has a non-numeric build number", build_name),
                )
            })?;
            self.values
                .insert("flutter.versionCode".to_string(), code.to_string());
        }
        self.values
            .insert("flutter.versionName".to_string(), name.to_string());
        Ok(())
    }

    /// Capture the current process environment for `env.*` lookups.
    pub fn populate_env(&mut self) {
        for (key, value) in std::env::vars() {
            self.env.insert(key, value);
        }
    }

    /// All non-environment keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

impl MetadataProvider for ProjectMetadata {
    fn get(&self, key: &str) -> Option<String> {
        match key.strip_prefix("env.") {
            Some(var) => self.env.get(var).cloned(),
            None => self.values.get(key).cloned(),
        }
    }
}

// Joins physical lines ending in an odd number of backslashes with the
// next one, dropping the continuation line's leading whitespace.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let piece = match &pending {
            Some(_) => raw.trim_start(),
            None => {
                let trimmed = raw.trim_start();
                if trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                raw
            }
        };

        let trailing = piece.chars().rev().take_while(|c| *c == '\\').count();
        let continues = trailing % 2 == 1;
        let body = if continues {
            &piece[..piece.len() - 1]
        } else {
            piece
        };

        let line = pending.get_or_insert_with(String::new);
        line.push_str(body);
        if !continues {
            if let Some(line) = pending.take() {
                lines.push(line);
            }
        }
    }
    if let Some(line) = pending {
        lines.push(line);
    }
    lines
}

fn parse_property_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }

    // The key ends at the first unescaped `=`, `:` or whitespace.
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = idx;
            break;
        }
    }

    let key = unescape(&line[..key_end]);
    if key.is_empty() {
        return None;
    }

    let rest = line[key_end..].trim_start();
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim_start();
    Some((key, unescape(rest)))
}

// Windows paths in local.properties come escaped (C\:\\src\\flutter).
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Builder for creating ProjectMetadata.
pub struct ProjectMetadataBuilder {
    metadata: ProjectMetadata,
}

impl ProjectMetadataBuilder {
    pub fn new() -> Self {
        Self {
            metadata: ProjectMetadata::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.values.insert(key.into(), value.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.env.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, text: &str) -> Self {
        self.metadata.merge_properties(text);
        self
    }

    pub fn with_flutter_defaults(mut self) -> Self {
        self.metadata.apply_flutter_defaults();
        self
    }

    pub fn build(self) -> ProjectMetadata {
        self.metadata
    }
}

impl Default for ProjectMetadataBuilder {
    fn default() -> Self {
        Self::new()
    }
}
