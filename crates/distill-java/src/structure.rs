//! Structure tree builder
//!
//! Finds the declarations of a compilation unit (types, methods, fields and
//! inner types) and names them. Everything downstream, from declaration trees
//! to history recording, starts from a `JavaStructureNode`.

use std::fmt;

use tree_sitter::Node;

use crate::classify::{self, Declaration};
use crate::config::SignatureStyle;
use crate::naming;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    CompilationUnit,
    Type,
    Method,
    Field,
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureKind::CompilationUnit => "compilation unit",
            StructureKind::Type => "type",
            StructureKind::Method => "method",
            StructureKind::Field => "field",
        };
        f.write_str(name)
    }
}

/// A declaration found by the structure builder.
///
/// Field nodes point at the whole field declaration; `declarator` selects
/// the variable this node stands for.
#[derive(Debug, Clone)]
pub struct JavaStructureNode<'tree> {
    kind: StructureKind,
    name: String,
    qualified_name: String,
    node: Node<'tree>,
    declarator: Option<Node<'tree>>,
    children: Vec<JavaStructureNode<'tree>>,
}

impl<'tree> JavaStructureNode<'tree> {
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Simple name; method signature for methods; package for the unit.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn node(&self) -> Node<'tree> {
        self.node
    }

    pub fn declarator(&self) -> Option<Node<'tree>> {
        self.declarator
    }

    pub fn children(&self) -> &[JavaStructureNode<'tree>] {
        &self.children
    }

    pub fn declaration(&self) -> Declaration<'tree> {
        Declaration::classify(self.node)
    }

    /// Children of one kind, in source order.
    pub fn children_of_kind(
        &self,
        kind: StructureKind,
    ) -> impl Iterator<Item = &JavaStructureNode<'tree>> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// This node and everything below it, pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &JavaStructureNode<'tree>> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// The declaration with exactly this qualified name, at any depth.
    pub fn find(&self, qualified_name: &str) -> Option<&JavaStructureNode<'tree>> {
        self.iter().find(|n| n.qualified_name == qualified_name)
    }

    /// One line per declaration, indented by nesting depth.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let shown = if self.qualified_name.is_empty() {
            "<default package>"
        } else {
            &self.qualified_name
        };
        out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), self.kind, shown));
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

/// Builds `JavaStructureNode`s from a parsed compilation unit.
#[derive(Debug, Clone, Copy)]
pub struct StructureBuilder<'s> {
    source: &'s str,
    style: SignatureStyle,
}

impl<'s> StructureBuilder<'s> {
    pub fn new(source: &'s str, style: SignatureStyle) -> Self {
        Self { source, style }
    }

    /// The compilation unit and every declaration beneath it.
    pub fn build<'tree>(&self, root: Node<'tree>) -> JavaStructureNode<'tree> {
        let package = naming::package_name(root, self.source);

        let mut cursor = root.walk();
        let types: Vec<_> = root
            .named_children(&mut cursor)
            .filter(|child| classify::TYPE_DECLARATIONS.contains(&child.kind()))
            .collect();
        let children = types
            .into_iter()
            .map(|node| self.type_node(node, &package))
            .collect();

        JavaStructureNode {
            kind: StructureKind::CompilationUnit,
            name: package.clone(),
            qualified_name: package,
            node: root,
            declarator: None,
            children,
        }
    }

    fn type_node<'tree>(&self, node: Node<'tree>, parent: &str) -> JavaStructureNode<'tree> {
        let name = naming::simple_name(node, self.source).to_string();
        let qualified_name = naming::qualify(parent, &name);
        let children = self.members(node, &qualified_name);
        JavaStructureNode {
            kind: StructureKind::Type,
            name,
            qualified_name,
            node,
            declarator: None,
            children,
        }
    }

    /// Member declarations of a type node, in source order, named under
    /// `owner`. Initializer blocks declare nothing and are skipped.
    pub fn members<'tree>(&self, type_node: Node<'tree>, owner: &str) -> Vec<JavaStructureNode<'tree>> {
        let mut members = Vec::new();
        for node in member_nodes(type_node) {
            match Declaration::classify(node) {
                Declaration::Type(node) => members.push(self.type_node(node, owner)),
                Declaration::Method(node) => {
                    let name = naming::method_signature(node, self.source, self.style);
                    members.push(JavaStructureNode {
                        kind: StructureKind::Method,
                        qualified_name: naming::qualify(owner, &name),
                        name,
                        node,
                        declarator: None,
                        children: Vec::new(),
                    });
                }
                Declaration::Field(node) => {
                    for (name, declarator) in naming::field_variables(node, self.source) {
                        members.push(JavaStructureNode {
                            kind: StructureKind::Field,
                            qualified_name: naming::qualify(owner, &name),
                            name,
                            node,
                            declarator,
                            children: Vec::new(),
                        });
                    }
                }
                Declaration::Other(_) => {}
            }
        }
        members
    }
}

/// Syntax nodes directly inside a type body, flattening the declarations
/// section that follows enum constants.
pub fn member_nodes(type_node: Node<'_>) -> Vec<Node<'_>> {
    let Some(body) = type_node.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        if child.kind() == "enum_body_declarations" {
            let mut inner = child.walk();
            nodes.extend(child.named_children(&mut inner));
        } else {
            nodes.push(child);
        }
    }
    nodes
}
