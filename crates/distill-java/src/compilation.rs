//! One parsed revision of one Java source file

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::FrontendError;

/// The tree-sitter Java grammar.
pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// Source text together with its concrete syntax tree.
pub struct JavaCompilation {
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for JavaCompilation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaCompilation")
            .field("source_len", &self.source.len())
            .field("has_errors", &self.has_errors())
            .finish()
    }
}

impl JavaCompilation {
    /// Parse `source` on the calling thread.
    pub fn parse(source: impl Into<String>) -> Result<Self, FrontendError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser.set_language(&java_language())?;
        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| FrontendError::ParseFailed(format!("{} bytes of source", source.len())))?;
        Ok(Self::from_parts(source, tree))
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8.
    pub fn parse_bytes(content: &[u8]) -> Result<Self, FrontendError> {
        let source = std::str::from_utf8(content)?;
        Self::parse(source)
    }

    /// Wrap a tree produced elsewhere, e.g. by the parser pool.
    pub fn from_parts(source: String, tree: Tree) -> Self {
        let compilation = JavaCompilation { source, tree };
        if compilation.has_errors() {
            tracing::warn!("Java source contains syntax errors; recovered tree is used as is");
        }
        compilation
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Source text of `node`, empty if the node does not map onto valid UTF-8.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}
