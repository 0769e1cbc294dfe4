//! Central skill registry (`marketplace.json`)
//!
//! The registry is loaded once per run into an immutable snapshot that the
//! cross-reference checker borrows.

use crate::error::{AuditError, Result};
use serde::Deserialize;
use serde_json::Value;
use skillaudit_types::RegistryEntry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Registry file locations probed under the corpus root, in order
pub const DEFAULT_LOCATIONS: &[&str] = &["marketplace.json", ".claude-plugin/marketplace.json"];

/// Plugin marketplace form: `{"name": "...", "plugins": [{"name": "...", ...}]}`
#[derive(Debug, Deserialize)]
struct MarketplaceFile {
    plugins: Vec<PluginRecord>,
}

/// Map form: `{"skill-name": {"version": 1, ...}}`
type MapFile = BTreeMap<String, EntryRecord>;

#[derive(Debug, Deserialize)]
struct PluginRecord {
    name: String,
    #[serde(flatten)]
    entry: EntryRecord,
}

#[derive(Debug, Default, Deserialize)]
struct EntryRecord {
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    source: Option<String>,
}

impl EntryRecord {
    fn into_entry(self, name: String) -> RegistryEntry {
        RegistryEntry {
            name,
            version: self.version,
            category: self.category,
            tags: self.tags.into_iter().collect(),
            source: self.source,
        }
    }
}

/// Immutable snapshot of the registry, keyed by skill name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    /// Registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from entries; later duplicates replace earlier ones
    pub fn from_entries(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            if let Some(previous) = map.insert(entry.name.clone(), entry) {
                warn!("Registry lists '{}' more than once; keeping the last entry", previous.name);
            }
        }
        Self { entries: map }
    }

    /// Parse registry JSON. `path` is only used for error messages.
    ///
    /// The shape is picked from a top-level `plugins` array, then the text is
    /// parsed again as that shape so errors carry a line and column.
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        let malformed = |source: serde_json::Error| AuditError::RegistryMalformed {
            path: path.to_path_buf(),
            source,
        };

        let value: Value = serde_json::from_str(json).map_err(malformed)?;
        let is_marketplace = value
            .as_object()
            .and_then(|obj| obj.get("plugins"))
            .is_some_and(Value::is_array);

        let registry = if is_marketplace {
            let file: MarketplaceFile = serde_json::from_str(json).map_err(malformed)?;
            Self::from_entries(
                file.plugins
                    .into_iter()
                    .map(|plugin| plugin.entry.into_entry(plugin.name)),
            )
        } else {
            let map: MapFile = serde_json::from_str(json).map_err(malformed)?;
            Self::from_entries(map.into_iter().map(|(name, record)| record.into_entry(name)))
        };

        Ok(registry)
    }

    /// Read and parse a registry file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| AuditError::RegistryUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_json(&json, path)?;
        info!("Loaded {} registry entries from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Entry for a skill name
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// All entries sorted by name
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First default registry location that exists under `root`
pub fn locate(root: &Path) -> Option<PathBuf> {
    DEFAULT_LOCATIONS
        .iter()
        .map(|relative| root.join(relative))
        .find(|candidate| {
            let found = candidate.is_file();
            debug!("Registry candidate {:?}: {}", candidate, if found { "found" } else { "absent" });
            found
        })
}
