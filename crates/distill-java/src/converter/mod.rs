//! Structural node converter: Java syntax to canonical declaration trees

mod body;
mod declaration;

pub use body::BodyConverter;
pub use declaration::DeclarationConverter;

use distill_core::{DeclarationNode, EntityType, ModifierSet, SourceCodeEntity, SourceRange};
use tree_sitter::Node;

use crate::config::HelperConfig;
use crate::modifiers::extract_modifiers;
use crate::range::{self, node_range};
use crate::structure::JavaStructureNode;

/// Identity, canonical modifiers and extent of a structure node.
pub fn structure_entity(
    node: &JavaStructureNode<'_>,
    source: &str,
    config: &HelperConfig,
) -> SourceCodeEntity {
    let declaration = node.declaration();
    SourceCodeEntity::new(
        node.qualified_name(),
        declaration.entity_type(),
        extract_modifiers(&declaration),
        range::extract(&declaration, source, config.javadoc_in_range),
    )
}

/// Root of a declaration or body tree. `label` names the root only; the
/// attached entity always carries the node's qualified name.
pub(crate) fn root_node(
    node: &JavaStructureNode<'_>,
    label: &str,
    source: &str,
    config: &HelperConfig,
) -> DeclarationNode {
    let entity = structure_entity(node, source, config);
    DeclarationNode::new(entity.kind(), label).with_entity(entity)
}

/// A sub-node; its entity repeats label and kind with no modifiers.
pub(crate) fn part(
    kind: EntityType,
    label: impl Into<String>,
    range: SourceRange,
) -> DeclarationNode {
    let label = label.into();
    let entity = SourceCodeEntity::new(label.clone(), kind, ModifierSet::empty(), range);
    DeclarationNode::new(kind, label).with_entity(entity)
}

/// A sub-node covering exactly `node`.
pub(crate) fn part_at(
    kind: EntityType,
    label: impl Into<String>,
    node: Node<'_>,
) -> DeclarationNode {
    part(kind, label, node_range(node))
}

pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Source text of `node` as a label: line breaks and the indentation around
/// them collapse to one space, so reformatting keeps labels stable.
pub(crate) fn label_text(node: Node<'_>, source: &str) -> String {
    normalize(node.utf8_text(source.as_bytes()).unwrap_or_default())
}

pub(crate) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        let line = if i == 0 { line.trim_end() } else { line.trim() };
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(line);
    }
    out.trim().to_string()
}
