use std::collections::BTreeSet;

/// A skill as listed in the central registry (`marketplace.json`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub version: Option<u64>,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    /// Relative source directory, when the registry records one
    pub source: Option<String>,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            category: None,
            tags: BTreeSet::new(),
            source: None,
        }
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }
}
