//! Canonical declaration trees, the unit a differencing stage compares

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::model::{EntityType, SourceCodeEntity};

/// One node of a declaration or method-body tree.
///
/// Children are owned and kept in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationNode {
    kind: EntityType,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity: Option<SourceCodeEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<DeclarationNode>,
}

impl DeclarationNode {
    pub fn new(kind: EntityType, label: impl Into<String>) -> Self {
        DeclarationNode {
            kind,
            label: label.into(),
            entity: None,
            children: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: SourceCodeEntity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn kind(&self) -> EntityType {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entity(&self) -> Option<&SourceCodeEntity> {
        self.entity.as_ref()
    }

    pub fn children(&self) -> &[DeclarationNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_entity(&mut self, entity: SourceCodeEntity) {
        self.entity = Some(entity);
    }

    pub fn add_child(&mut self, child: DeclarationNode) {
        self.children.push(child);
    }

    /// First direct child with the given label.
    pub fn child(&self, label: &str) -> Option<&DeclarationNode> {
        self.children.iter().find(|c| c.label == label)
    }

    /// First direct child of the given kind.
    pub fn child_of_kind(&self, kind: EntityType) -> Option<&DeclarationNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Direct children of the given kind, in order.
    pub fn children_of_kind(&self, kind: EntityType) -> impl Iterator<Item = &DeclarationNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(DeclarationNode::size).sum::<usize>()
    }

    /// Pre-order traversal of this subtree.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Indented `Kind: label` listing, two spaces per level. Empty labels
    /// print the kind alone.
    pub fn render(&self) -> String {
        fn write_node(out: &mut String, node: &DeclarationNode, depth: usize) {
            let indent = "  ".repeat(depth);
            if node.label.is_empty() {
                let _ = writeln!(out, "{indent}{:?}", node.kind);
            } else {
                let _ = writeln!(out, "{indent}{:?}: {}", node.kind, node.label);
            }
            for child in &node.children {
                write_node(out, child, depth + 1);
            }
        }

        let mut out = String::new();
        write_node(&mut out, self, 0);
        out
    }
}

/// Pre-order iterator returned by [`DeclarationNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a DeclarationNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DeclarationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModifierSet, SourceRange};

    fn sample() -> DeclarationNode {
        let mut root = DeclarationNode::new(EntityType::Class, "pkg.A");
        let mut modifiers = DeclarationNode::new(EntityType::Modifiers, "");
        modifiers.add_child(DeclarationNode::new(EntityType::Modifier, "public"));
        root.add_child(modifiers);
        root.add_child(DeclarationNode::new(EntityType::Method, "pkg.A.foo()"));
        root
    }

    #[test]
    fn test_preorder_descendants() {
        let root = sample();
        let labels: Vec<_> = root.descendants().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["pkg.A", "", "public", "pkg.A.foo()"]);
        assert_eq!(root.size(), 4);
    }

    #[test]
    fn test_child_lookup() {
        let root = sample();
        assert_eq!(root.child("pkg.A.foo()").map(|n| n.kind()), Some(EntityType::Method));
        assert!(root.child_of_kind(EntityType::Modifiers).is_some());
        assert!(root.child("missing").is_none());
    }

    #[test]
    fn test_render() {
        let root = sample();
        insta::assert_snapshot!(root.render(), @r"
        Class: pkg.A
          Modifiers
            Modifier: public
          Method: pkg.A.foo()
        ");
    }

    #[test]
    fn test_entity_round_trips_through_json() {
        let entity = SourceCodeEntity::new(
            "pkg.A",
            EntityType::Class,
            ModifierSet::PUBLIC,
            SourceRange::new(0, 10),
        );
        let node = DeclarationNode::new(EntityType::Class, "pkg.A").with_entity(entity.clone());
        let json = serde_json::to_string(&node).unwrap();
        let back: DeclarationNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entity(), Some(&entity));
        assert!(back.is_leaf());
    }
}
