//! Top-level history registry and its JSON persistence

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::{self, AttributeHistory, ClassHistory, EntityHistory, MethodHistory, StructureEntityVersion};

/// Store file format version, bumped on incompatible layout changes.
pub const STORE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access history store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed history store: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported history store format {found}, expected {expected}")]
    Format { found: u32, expected: u32 },
}

/// Histories of every top-level type seen in one analyzed component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStore {
    classes: BTreeMap<String, ClassHistory>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a top-level type sighting.
    pub fn upsert_class(&mut self, version: StructureEntityVersion) -> StructureEntityVersion {
        history::upsert(&mut self.classes, version)
    }

    pub fn classes(&self) -> &BTreeMap<String, ClassHistory> {
        &self.classes
    }

    pub fn class_mut(&mut self, unique_name: &str) -> Option<&mut ClassHistory> {
        self.classes.get_mut(unique_name)
    }

    /// Find a type history at any nesting level.
    pub fn find_class(&self, unique_name: &str) -> Option<&ClassHistory> {
        self.classes.values().find_map(|c| c.find_class(unique_name))
    }

    pub fn find_method(&self, unique_name: &str) -> Option<&MethodHistory> {
        self.classes.values().find_map(|c| c.find_method(unique_name))
    }

    pub fn find_attribute(&self, unique_name: &str) -> Option<&AttributeHistory> {
        self.classes.values().find_map(|c| c.find_attribute(unique_name))
    }

    /// Total number of histories, nested ones included.
    pub fn history_count(&self) -> usize {
        self.classes.values().map(ClassHistory::history_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Largest number of versions recorded for any top-level type.
    pub fn revision_count(&self) -> usize {
        self.classes
            .values()
            .map(|c| c.version_count())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    format_version: u32,
    saved_at: String,
    store: HistoryStore,
}

/// Write `store` to `path` as pretty JSON, creating parent directories.
pub fn save_store(store: &HistoryStore, path: &Path) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let file = StoreFile {
        format_version: STORE_FORMAT_VERSION,
        saved_at: chrono::Utc::now().to_rfc3339(),
        store: store.clone(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json).map_err(io_err)?;

    tracing::debug!("History store saved: {}", path.display());
    Ok(())
}

/// Read a store written by [`save_store`]. A missing file yields `None`.
pub fn load_store(path: &Path) -> Result<Option<HistoryStore>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: StoreFile = serde_json::from_str(&json)?;
    if file.format_version != STORE_FORMAT_VERSION {
        return Err(StoreError::Format {
            found: file.format_version,
            expected: STORE_FORMAT_VERSION,
        });
    }

    tracing::debug!("History store loaded from {} (saved {})", path.display(), file.saved_at);
    Ok(Some(file.store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityType, ModifierSet};
    use tempfile::TempDir;

    fn class_version(name: &str, label: &str) -> StructureEntityVersion {
        StructureEntityVersion::with_version(EntityType::Class, name, ModifierSet::PUBLIC, label)
    }

    #[test]
    fn test_upsert_class_merges_by_name() {
        let mut store = HistoryStore::new();
        store.upsert_class(class_version("pkg.A", "v1"));
        store.upsert_class(class_version("pkg.B", "v1"));
        store.upsert_class(class_version("pkg.A", "v2"));

        assert_eq!(store.classes().len(), 2);
        assert_eq!(store.classes()["pkg.A"].version_count(), 2);
        assert_eq!(store.revision_count(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/histories.json");

        let mut store = HistoryStore::new();
        store.upsert_class(class_version("pkg.A", "v1"));
        store
            .class_mut("pkg.A")
            .unwrap()
            .upsert_attribute(StructureEntityVersion::new(
                EntityType::Field,
                "pkg.A.count",
                ModifierSet::PRIVATE,
            ));

        save_store(&store, &path).unwrap();
        let loaded = load_store(&path).unwrap().unwrap();
        assert_eq!(loaded, store);
        assert!(loaded.find_attribute("pkg.A.count").is_some());
    }

    #[test]
    fn test_load_missing_store() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_store(&temp_dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"format_version": 99, "saved_at": "now", "store": {"classes": {}}}"#,
        )
        .unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format { found: 99, .. }));
    }

    #[test]
    fn test_rejects_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"format_version": 1, "saved_at": "now", "store": {"classes": {"pkg.A": {"versions": []}}}}"#,
        )
        .unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
        assert!(err.to_string().contains("history has no versions"));
    }
}
