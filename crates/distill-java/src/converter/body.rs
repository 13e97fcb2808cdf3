//! Method body trees: one node per statement, nested the way the source is

use distill_core::{DeclarationNode, EntityType, SourceRange};
use tree_sitter::Node;

use super::{label_text, named_children, normalize, part, part_at, root_node};
use crate::classify::{self, classify};
use crate::comments::Comment;
use crate::config::HelperConfig;
use crate::naming;
use crate::range::node_range;
use crate::structure::{JavaStructureNode, StructureKind};

pub struct BodyConverter<'a> {
    source: &'a str,
    config: &'a HelperConfig,
    comments: &'a [Comment],
}

impl<'a> BodyConverter<'a> {
    /// `comments` is the cleaned comment list of the compilation unit; only
    /// comments found in it become nodes.
    pub fn new(source: &'a str, config: &'a HelperConfig, comments: &'a [Comment]) -> Self {
        Self {
            source,
            config,
            comments,
        }
    }

    /// Statement tree of a method's body. `None` unless `node` is a method
    /// with a body.
    pub fn convert(&self, node: &JavaStructureNode<'_>) -> Option<DeclarationNode> {
        if node.kind() != StructureKind::Method {
            return None;
        }
        let body = node.node().child_by_field_name("body")?;

        let mut root = root_node(node, node.qualified_name(), self.source, self.config);
        self.visit_block(body, &mut root);
        tracing::debug!(
            "Converted body of {} into {} nodes",
            node.qualified_name(),
            root.size()
        );
        Some(root)
    }

    fn visit_block(&self, block: Node<'_>, parent: &mut DeclarationNode) {
        for child in named_children(block) {
            if let Some(node) = self.convert_child(child) {
                parent.add_child(node);
            }
        }
    }

    /// A block contributes its statements; a single statement contributes itself.
    fn visit_body(&self, body: Node<'_>, parent: &mut DeclarationNode) {
        if body.kind() == "block" {
            self.visit_block(body, parent);
        } else if let Some(node) = self.convert_child(body) {
            parent.add_child(node);
        }
    }

    fn convert_child(&self, node: Node<'_>) -> Option<DeclarationNode> {
        match node.kind() {
            "line_comment" | "block_comment" => self.comment(node),
            _ => Some(self.statement(node)),
        }
    }

    fn comment(&self, node: Node<'_>) -> Option<DeclarationNode> {
        if !self.config.include_comments {
            return None;
        }
        let range = node_range(node);
        let comment = self.comments.iter().find(|c| c.range == range)?;
        Some(part(comment.kind.entity_type(), normalize(&comment.text), range))
    }

    fn statement(&self, node: Node<'_>) -> DeclarationNode {
        match node.kind() {
            "block" => {
                let mut block = part_at(EntityType::Block, "", node);
                self.visit_block(node, &mut block);
                block
            }
            "if_statement" => self.if_statement(node),
            "while_statement" | "do_statement" => {
                let condition = self.condition(node.child_by_field_name("condition"));
                let mut stmt = part_at(classify(node), condition, node);
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_body(body, &mut stmt);
                }
                stmt
            }
            "for_statement" => {
                let condition = node
                    .child_by_field_name("condition")
                    .map(|c| label_text(c, self.source))
                    .unwrap_or_default();
                let mut stmt = part_at(EntityType::ForStatement, condition, node);
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_body(body, &mut stmt);
                }
                stmt
            }
            "enhanced_for_statement" => {
                let field = |name: &str| {
                    node.child_by_field_name(name)
                        .map(|n| label_text(n, self.source))
                        .unwrap_or_default()
                };
                let label = format!("{} {} : {}", field("type"), field("name"), field("value"));
                let mut stmt = part_at(EntityType::ForeachStatement, label, node);
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_body(body, &mut stmt);
                }
                stmt
            }
            "switch_expression" => self.switch_statement(node),
            "try_statement" | "try_with_resources_statement" => self.try_statement(node),
            "synchronized_statement" => {
                let lock = named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "parenthesized_expression");
                let mut stmt = part_at(EntityType::SynchronizedStatement, self.condition(lock), node);
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_block(body, &mut stmt);
                }
                stmt
            }
            "labeled_statement" => {
                let children = named_children(node);
                let label = children
                    .iter()
                    .find(|c| c.kind() == "identifier")
                    .map(|c| label_text(*c, self.source))
                    .unwrap_or_default();
                let mut stmt = part_at(EntityType::LabeledStatement, label, node);
                for inner in children.into_iter().filter(|c| c.kind() != "identifier") {
                    if let Some(child) = self.convert_child(inner) {
                        stmt.add_child(child);
                    }
                }
                stmt
            }
            "explicit_constructor_invocation" => {
                let kind = match node.child_by_field_name("constructor").map(|c| c.kind()) {
                    Some("super") => EntityType::SuperConstructorInvocation,
                    _ => EntityType::ConstructorInvocation,
                };
                part_at(kind, self.statement_text(node), node)
            }
            kind if classify::TYPE_DECLARATIONS.contains(&kind) => part_at(
                EntityType::TypeDeclarationStatement,
                naming::simple_name(node, self.source),
                node,
            ),
            _ => {
                let kind = match classify(node) {
                    kind if kind.is_statement() => kind,
                    _ => EntityType::Unknown,
                };
                part_at(kind, self.statement_text(node), node)
            }
        }
    }

    fn if_statement(&self, node: Node<'_>) -> DeclarationNode {
        let condition = self.condition(node.child_by_field_name("condition"));
        let mut stmt = part_at(EntityType::IfStatement, condition.clone(), node);

        if let Some(then) = node.child_by_field_name("consequence") {
            let mut branch = part_at(EntityType::ThenStatement, condition.clone(), then);
            self.visit_body(then, &mut branch);
            stmt.add_child(branch);
        }
        if let Some(otherwise) = node.child_by_field_name("alternative") {
            let mut branch = part_at(EntityType::ElseStatement, condition, otherwise);
            self.visit_body(otherwise, &mut branch);
            stmt.add_child(branch);
        }
        stmt
    }

    /// Case labels and the statements under them, all as direct children.
    fn switch_statement(&self, node: Node<'_>) -> DeclarationNode {
        let condition = self.condition(node.child_by_field_name("condition"));
        let mut stmt = part_at(EntityType::SwitchStatement, condition, node);
        let Some(block) = node.child_by_field_name("body") else {
            return stmt;
        };

        for group in named_children(block) {
            if !matches!(group.kind(), "switch_block_statement_group" | "switch_rule") {
                if let Some(child) = self.convert_child(group) {
                    stmt.add_child(child);
                }
                continue;
            }
            for child in named_children(group) {
                match child.kind() {
                    "switch_label" => stmt.add_child(part_at(
                        EntityType::SwitchCase,
                        label_text(child, self.source),
                        child,
                    )),
                    "block" if group.kind() == "switch_rule" => self.visit_block(child, &mut stmt),
                    _ => {
                        if let Some(converted) = self.convert_child(child) {
                            stmt.add_child(converted);
                        }
                    }
                }
            }
        }
        stmt
    }

    fn try_statement(&self, node: Node<'_>) -> DeclarationNode {
        let resources = node
            .child_by_field_name("resources")
            .map(|r| strip_parens(&label_text(r, self.source)))
            .unwrap_or_default();
        let mut stmt = part_at(EntityType::TryStatement, resources, node);

        if let Some(body) = node.child_by_field_name("body") {
            let mut group = part_at(EntityType::Body, "", body);
            self.visit_block(body, &mut group);
            stmt.add_child(group);
        }

        let children = named_children(node);
        let catches: Vec<_> = children
            .iter()
            .copied()
            .filter(|c| c.kind() == "catch_clause")
            .collect();
        if let (Some(first), Some(last)) = (catches.first(), catches.last()) {
            let range = SourceRange::new(first.start_byte(), last.end_byte());
            let mut group = part(EntityType::CatchClauses, "", range);
            for catch in &catches {
                let mut clause = part_at(EntityType::CatchClause, self.caught_type(*catch), *catch);
                if let Some(body) = catch.child_by_field_name("body") {
                    self.visit_block(body, &mut clause);
                }
                group.add_child(clause);
            }
            stmt.add_child(group);
        }

        if let Some(finally) = children.iter().find(|c| c.kind() == "finally_clause") {
            let mut group = part_at(EntityType::Finally, "", *finally);
            if let Some(block) = named_children(*finally).into_iter().find(|c| c.kind() == "block") {
                self.visit_block(block, &mut group);
            }
            stmt.add_child(group);
        }
        stmt
    }

    fn caught_type(&self, catch: Node<'_>) -> String {
        named_children(catch)
            .into_iter()
            .find(|c| c.kind() == "catch_formal_parameter")
            .and_then(|param| {
                named_children(param)
                    .into_iter()
                    .find(|c| c.kind() == "catch_type")
            })
            .map(|ty| label_text(ty, self.source))
            .unwrap_or_default()
    }

    /// A parenthesized condition without its outer parentheses.
    fn condition(&self, node: Option<Node<'_>>) -> String {
        node.map(|n| strip_parens(&label_text(n, self.source)))
            .unwrap_or_default()
    }

    /// Statement text without the terminating `;`.
    fn statement_text(&self, node: Node<'_>) -> String {
        let text = label_text(node, self.source);
        text.strip_suffix(';').map(str::trim_end).unwrap_or(&text).to_string()
    }
}

fn strip_parens(text: &str) -> String {
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(text)
        .to_string()
}
