//! Per-declaration revision histories
//!
//! A [`ClassHistory`] owns the histories of its methods, attributes and inner
//! classes, keyed by qualified name. Histories are append-only: a sighting of
//! a name already present in the matching map appends a version, any other
//! sighting creates a new history seeded with that version.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::model::{EntityType, ModifierSet};

/// One declaration as it appeared at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEntityVersion {
    pub kind: EntityType,
    pub unique_name: String,
    pub modifiers: ModifierSet,
    /// Caller-supplied revision identifier, absent for positional tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl StructureEntityVersion {
    pub fn new(kind: EntityType, unique_name: impl Into<String>, modifiers: ModifierSet) -> Self {
        StructureEntityVersion {
            kind,
            unique_name: unique_name.into(),
            modifiers,
            version: None,
        }
    }

    pub fn with_version(
        kind: EntityType,
        unique_name: impl Into<String>,
        modifiers: ModifierSet,
        version: impl Into<String>,
    ) -> Self {
        StructureEntityVersion {
            version: Some(version.into()),
            ..Self::new(kind, unique_name, modifiers)
        }
    }
}

/// Common behaviour of class, method and attribute histories.
pub trait EntityHistory {
    /// Start a history from its first sighting.
    fn create(first: StructureEntityVersion) -> Self
    where
        Self: Sized;

    /// All versions, oldest first. Never empty.
    fn versions(&self) -> &[StructureEntityVersion];

    /// Append a later sighting of the same entity.
    fn add_version(&mut self, version: StructureEntityVersion);

    /// Identity of the history: the unique name of its first version.
    fn unique_name(&self) -> &str {
        &self.versions()[0].unique_name
    }

    fn kind(&self) -> EntityType {
        self.versions()[0].kind
    }

    fn latest(&self) -> &StructureEntityVersion {
        let versions = self.versions();
        &versions[versions.len() - 1]
    }

    fn version_count(&self) -> usize {
        self.versions().len()
    }
}

/// Deserialize a version list, rejecting the empty list no history can have.
fn non_empty_versions<'de, D>(deserializer: D) -> Result<Vec<StructureEntityVersion>, D::Error>
where
    D: Deserializer<'de>,
{
    let versions = Vec::<StructureEntityVersion>::deserialize(deserializer)?;
    if versions.is_empty() {
        return Err(serde::de::Error::custom("history has no versions"));
    }
    Ok(versions)
}

fn check_same_entity(first: &StructureEntityVersion, next: &StructureEntityVersion) {
    debug_assert_eq!(first.unique_name, next.unique_name, "history identity mismatch");
    debug_assert_eq!(first.kind, next.kind, "history kind mismatch for {}", first.unique_name);
}

macro_rules! leaf_history {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(deserialize_with = "non_empty_versions")]
            versions: Vec<StructureEntityVersion>,
        }

        impl EntityHistory for $name {
            fn create(first: StructureEntityVersion) -> Self {
                $name { versions: vec![first] }
            }

            fn versions(&self) -> &[StructureEntityVersion] {
                &self.versions
            }

            fn add_version(&mut self, version: StructureEntityVersion) {
                check_same_entity(&self.versions[0], &version);
                self.versions.push(version);
            }
        }
    };
}

leaf_history!(
    /// Revision history of one method or constructor.
    MethodHistory
);

leaf_history!(
    /// Revision history of one field.
    AttributeHistory
);

/// Revision history of one type, plus the histories of everything it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHistory {
    #[serde(deserialize_with = "non_empty_versions")]
    versions: Vec<StructureEntityVersion>,
    #[serde(default)]
    method_histories: BTreeMap<String, MethodHistory>,
    #[serde(default)]
    attribute_histories: BTreeMap<String, AttributeHistory>,
    #[serde(default)]
    inner_class_histories: BTreeMap<String, ClassHistory>,
}

impl EntityHistory for ClassHistory {
    fn create(first: StructureEntityVersion) -> Self {
        ClassHistory {
            versions: vec![first],
            method_histories: BTreeMap::new(),
            attribute_histories: BTreeMap::new(),
            inner_class_histories: BTreeMap::new(),
        }
    }

    fn versions(&self) -> &[StructureEntityVersion] {
        &self.versions
    }

    fn add_version(&mut self, version: StructureEntityVersion) {
        check_same_entity(&self.versions[0], &version);
        self.versions.push(version);
    }
}

impl ClassHistory {
    pub fn new(first: StructureEntityVersion) -> Self {
        <Self as EntityHistory>::create(first)
    }

    pub fn method_histories(&self) -> &BTreeMap<String, MethodHistory> {
        &self.method_histories
    }

    pub fn attribute_histories(&self) -> &BTreeMap<String, AttributeHistory> {
        &self.attribute_histories
    }

    pub fn inner_class_histories(&self) -> &BTreeMap<String, ClassHistory> {
        &self.inner_class_histories
    }

    pub fn inner_class_mut(&mut self, unique_name: &str) -> Option<&mut ClassHistory> {
        self.inner_class_histories.get_mut(unique_name)
    }

    /// Record a method sighting in this class.
    pub fn upsert_method(&mut self, version: StructureEntityVersion) -> StructureEntityVersion {
        upsert(&mut self.method_histories, version)
    }

    /// Record a field sighting in this class.
    pub fn upsert_attribute(&mut self, version: StructureEntityVersion) -> StructureEntityVersion {
        upsert(&mut self.attribute_histories, version)
    }

    /// Record an inner type sighting in this class.
    pub fn upsert_inner_class(&mut self, version: StructureEntityVersion) -> StructureEntityVersion {
        upsert(&mut self.inner_class_histories, version)
    }

    /// Find the history of this type or any type nested in it.
    pub fn find_class(&self, unique_name: &str) -> Option<&ClassHistory> {
        if self.unique_name() == unique_name {
            return Some(self);
        }
        self.inner_class_histories
            .values()
            .find_map(|inner| inner.find_class(unique_name))
    }

    /// Find a method history declared here or in any nested type.
    pub fn find_method(&self, unique_name: &str) -> Option<&MethodHistory> {
        self.method_histories.get(unique_name).or_else(|| {
            self.inner_class_histories
                .values()
                .find_map(|inner| inner.find_method(unique_name))
        })
    }

    /// Find an attribute history declared here or in any nested type.
    pub fn find_attribute(&self, unique_name: &str) -> Option<&AttributeHistory> {
        self.attribute_histories.get(unique_name).or_else(|| {
            self.inner_class_histories
                .values()
                .find_map(|inner| inner.find_attribute(unique_name))
        })
    }

    /// Number of histories in this subtree, this one included.
    pub fn history_count(&self) -> usize {
        1 + self.method_histories.len()
            + self.attribute_histories.len()
            + self
                .inner_class_histories
                .values()
                .map(ClassHistory::history_count)
                .sum::<usize>()
    }
}

/// Append to the history named by `version`, or create it.
pub(crate) fn upsert<H: EntityHistory>(
    histories: &mut BTreeMap<String, H>,
    version: StructureEntityVersion,
) -> StructureEntityVersion {
    let snapshot = version.clone();
    match histories.get_mut(&version.unique_name) {
        Some(history) => {
            history.add_version(version);
            debug!(
                name = %snapshot.unique_name,
                versions = history.version_count(),
                "appended version to existing history"
            );
        }
        None => {
            debug!(name = %snapshot.unique_name, kind = %snapshot.kind, "created history");
            histories.insert(snapshot.unique_name.clone(), H::create(version));
        }
    }
    snapshot
}
