//! Language-independent seam between a front end and the history model

use crate::history::{ClassHistory, StructureEntityVersion};
use crate::model::{EntityType, SourceCodeEntity};
use crate::tree::DeclarationNode;

/// Operations a language front end provides over its structure nodes.
///
/// A structure node is a declaration (type, method or field) already
/// identified by the front end's structure builder. Implementations borrow
/// their parsed compilation, hence the lifetime on the node type.
pub trait AstHelper {
    type StructureNode<'a>
    where
        Self: 'a;

    /// The compilation unit root and every declaration beneath it.
    fn structure_tree(&self) -> Self::StructureNode<'_>;

    /// Canonical kind of a structure node.
    fn entity_type(&self, node: &Self::StructureNode<'_>) -> EntityType;

    /// Identity, modifiers and extent of a structure node.
    fn source_code_entity(&self, node: &Self::StructureNode<'_>) -> SourceCodeEntity;

    /// Declaration tree rooted at `node`, labelled with its qualified name.
    fn declaration_tree(&self, node: &Self::StructureNode<'_>) -> DeclarationNode;

    /// Declaration tree whose root is labelled `qualified_name` instead.
    fn declaration_tree_with_name(
        &self,
        node: &Self::StructureNode<'_>,
        qualified_name: &str,
    ) -> DeclarationNode;

    /// Statement tree of a method body; `None` for anything without a body.
    fn method_body_tree(&self, node: &Self::StructureNode<'_>) -> Option<DeclarationNode>;

    /// Snapshot tracked by position only.
    fn snapshot(&self, node: &Self::StructureNode<'_>) -> StructureEntityVersion {
        let entity = self.source_code_entity(node);
        StructureEntityVersion::new(entity.kind(), entity.unique_name(), entity.modifiers())
    }

    /// Snapshot carrying a revision label.
    fn snapshot_with_version(
        &self,
        node: &Self::StructureNode<'_>,
        version: &str,
    ) -> StructureEntityVersion {
        let entity = self.source_code_entity(node);
        StructureEntityVersion::with_version(
            entity.kind(),
            entity.unique_name(),
            entity.modifiers(),
            version,
        )
    }

    fn snapshot_at(
        &self,
        node: &Self::StructureNode<'_>,
        version: Option<&str>,
    ) -> StructureEntityVersion {
        match version {
            Some(label) => self.snapshot_with_version(node, label),
            None => self.snapshot(node),
        }
    }

    /// Record a method of `history`'s type at one revision.
    fn record_method(
        &self,
        history: &mut ClassHistory,
        node: &Self::StructureNode<'_>,
        version: Option<&str>,
    ) -> StructureEntityVersion {
        history.upsert_method(self.snapshot_at(node, version))
    }

    /// Record a field of `history`'s type at one revision.
    fn record_field(
        &self,
        history: &mut ClassHistory,
        node: &Self::StructureNode<'_>,
        version: Option<&str>,
    ) -> StructureEntityVersion {
        history.upsert_attribute(self.snapshot_at(node, version))
    }

    /// Record an inner type of `history`'s type at one revision.
    fn record_inner_class(
        &self,
        history: &mut ClassHistory,
        node: &Self::StructureNode<'_>,
        version: Option<&str>,
    ) -> StructureEntityVersion {
        history.upsert_inner_class(self.snapshot_at(node, version))
    }
}
