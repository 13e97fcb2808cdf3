//! Source range extractor

use distill_core::SourceRange;
use tree_sitter::Node;

use crate::classify::Declaration;

/// Canonical `[start, end)` extent of a classified node.
///
/// Declarations cover their whole text: a type through its closing brace, a
/// method through its body (or the `;` ending a bodyless signature), a field
/// through its initializer and `;`. With `javadoc_in_range`, a Javadoc
/// comment directly above a declaration is part of it. Any other node spans
/// exactly its own text.
pub fn extract(declaration: &Declaration<'_>, source: &str, javadoc_in_range: bool) -> SourceRange {
    match *declaration {
        Declaration::Type(node) => {
            SourceRange::new(declaration_start(node, source, javadoc_in_range), node.end_byte())
        }
        Declaration::Method(node) => {
            let end = match node.child_by_field_name("body") {
                Some(body) => body.end_byte().max(node.end_byte()),
                None => signature_end(node),
            };
            SourceRange::new(declaration_start(node, source, javadoc_in_range), end)
        }
        Declaration::Field(node) => {
            SourceRange::new(declaration_start(node, source, javadoc_in_range), node.end_byte())
        }
        Declaration::Other(node) => node_range(node),
    }
}

/// The node's own extent.
pub fn node_range(node: Node<'_>) -> SourceRange {
    SourceRange::new(node.start_byte(), node.end_byte())
}

/// End of a bodyless method: its terminating `;`, or the last token of the
/// signature when the source omits it.
fn signature_end(node: Node<'_>) -> usize {
    node.end_byte()
}

fn declaration_start(node: Node<'_>, source: &str, javadoc_in_range: bool) -> usize {
    if !javadoc_in_range {
        return node.start_byte();
    }
    match node.prev_sibling() {
        Some(prev) if is_javadoc(prev, source) && only_whitespace_between(prev, node, source) => {
            prev.start_byte()
        }
        _ => node.start_byte(),
    }
}

fn is_javadoc(node: Node<'_>, source: &str) -> bool {
    node.kind() == "block_comment"
        && source
            .get(node.start_byte()..node.end_byte())
            .is_some_and(|text| text.starts_with("/**") && text != "/**/")
}

fn only_whitespace_between(before: Node<'_>, after: Node<'_>, source: &str) -> bool {
    source
        .get(before.end_byte()..after.start_byte())
        .is_some_and(|gap| gap.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilation::JavaCompilation;

    fn members(compilation: &JavaCompilation) -> Vec<Node<'_>> {
        let class = compilation.root().named_child(0).unwrap();
        let body = class.child_by_field_name("body").unwrap();
        let mut cursor = body.walk();
        let nodes: Vec<_> = body
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "block_comment" && n.kind() != "line_comment")
            .collect();
        nodes
    }

    #[test]
    fn test_method_with_body_covers_body() {
        let source = "class A {\n  int f() {\n    return 1;\n  }\n}";
        let compilation = JavaCompilation::parse(source).unwrap();
        let method = members(&compilation)[0];
        let body = method.child_by_field_name("body").unwrap();

        let range = extract(&Declaration::classify(method), source, true);
        assert!(range.end >= body.end_byte());
        assert_eq!(range.slice(source), Some("int f() {\n    return 1;\n  }"));
    }

    #[test]
    fn test_bodyless_method_ends_with_signature() {
        let source = "abstract class A { abstract void f(int x); }";
        let compilation = JavaCompilation::parse(source).unwrap();
        let method = members(&compilation)[0];

        let range = extract(&Declaration::classify(method), source, true);
        assert_eq!(range.end, method.end_byte());
        assert_eq!(range.slice(source), Some("abstract void f(int x);"));
    }

    #[test]
    fn test_field_includes_initializer() {
        let source = "class A { private int x = compute(1, 2); }";
        let compilation = JavaCompilation::parse(source).unwrap();
        let field = members(&compilation)[0];

        let range = extract(&Declaration::classify(field), source, true);
        assert_eq!(range.slice(source), Some("private int x = compute(1, 2);"));
    }

    #[test]
    fn test_javadoc_extends_declaration_start() {
        let source = "class A {\n  /** Docs. */\n  void f() {}\n  // note\n  void g() {}\n}";
        let compilation = JavaCompilation::parse(source).unwrap();
        let methods = members(&compilation);

        let documented = extract(&Declaration::classify(methods[0]), source, true);
        assert_eq!(documented.slice(source), Some("/** Docs. */\n  void f() {}"));

        let plain = extract(&Declaration::classify(methods[0]), source, false);
        assert_eq!(plain.slice(source), Some("void f() {}"));

        let line_commented = extract(&Declaration::classify(methods[1]), source, true);
        assert_eq!(line_commented.slice(source), Some("void g() {}"));
    }

    #[test]
    fn test_type_covers_nested_members() {
        let source = "public class A { class B { void f() {} } }";
        let compilation = JavaCompilation::parse(source).unwrap();
        let class = compilation.root().named_child(0).unwrap();

        let range = extract(&Declaration::classify(class), source, true);
        assert_eq!(range.start, 0);
        assert_eq!(range.end, source.len());
    }

    #[test]
    fn test_other_nodes_use_own_extent() {
        let source = "class A { int x = 1 + 2; }";
        let compilation = JavaCompilation::parse(source).unwrap();
        let field = members(&compilation)[0];
        let declarator = field.child_by_field_name("declarator").unwrap();
        let value = declarator.child_by_field_name("value").unwrap();

        let range = extract(&Declaration::classify(value), source, true);
        assert_eq!(range.slice(source), Some("1 + 2"));
    }
}
