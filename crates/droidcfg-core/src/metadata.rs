//! Project-metadata provider abstraction.

/// Source of externally resolved values such as `flutter.versionCode`.
pub trait MetadataProvider: Send + Sync {
    /// Get the value for a dotted key, or `None` if unknown.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S> MetadataProvider for std::collections::HashMap<String, String, S>
where
    S: std::hash::BuildHasher + Send + Sync,
{
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}
