//! Comment collector and cleaner
//!
//! Tree-sitter keeps comments as extra nodes wherever they occur. The
//! collector gathers them in source order; the cleaner drops the ones that
//! carry no text (empty comments, separator rules like `// ------`).

use std::sync::LazyLock;

use distill_core::{EntityType, SourceRange};
use regex::Regex;
use tree_sitter::Node;

use crate::range::node_range;

static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//+|^/\*+|\*+/$|(?m)^\s*\*+/?").unwrap());

static SEPARATOR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-=_*#~+/.]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    Javadoc,
}

impl CommentKind {
    pub fn entity_type(self) -> EntityType {
        match self {
            CommentKind::Line => EntityType::LineComment,
            CommentKind::Block => EntityType::BlockComment,
            CommentKind::Javadoc => EntityType::JavadocComment,
        }
    }
}

/// One comment of a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub range: SourceRange,
    pub text: String,
}

impl Comment {
    fn from_node(node: Node<'_>, source: &str) -> Option<Self> {
        let text = node.utf8_text(source.as_bytes()).ok()?;
        let kind = match node.kind() {
            "line_comment" => CommentKind::Line,
            "block_comment" if text.starts_with("/**") && text != "/**/" => CommentKind::Javadoc,
            "block_comment" => CommentKind::Block,
            _ => return None,
        };
        Some(Comment {
            kind,
            range: node_range(node),
            text: text.to_string(),
        })
    }

    /// Comment text without `//`, `/*`, `*/` and leading `*` on each line.
    pub fn content(&self) -> String {
        DELIMITERS.replace_all(&self.text, "").trim().to_string()
    }

    /// Whether the comment says nothing: empty or separator characters only.
    pub fn is_noise(&self) -> bool {
        SEPARATOR_ONLY.is_match(&self.content())
    }
}

/// Every comment under `root`, in source order.
pub fn collect_comments(root: Node<'_>, source: &str) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut cursor = root.walk();
    let mut descend = true;

    loop {
        let node = cursor.node();
        if descend {
            if matches!(node.kind(), "line_comment" | "block_comment") {
                comments.extend(Comment::from_node(node, source));
            }
            if cursor.goto_first_child() {
                continue;
            }
        }
        if cursor.goto_next_sibling() {
            descend = true;
        } else if cursor.goto_parent() {
            descend = false;
        } else {
            break;
        }
    }

    tracing::debug!("Collected {} comments", comments.len());
    comments
}

/// Drop noise comments, keeping source order.
pub fn clean_comments(comments: Vec<Comment>) -> Vec<Comment> {
    let before = comments.len();
    let cleaned: Vec<_> = comments.into_iter().filter(|c| !c.is_noise()).collect();
    if cleaned.len() != before {
        tracing::debug!("Dropped {} noise comments", before - cleaned.len());
    }
    cleaned
}
