//! Qualified names and the method signature scheme

use tree_sitter::Node;

use crate::config::SignatureStyle;

/// Dotted package name of a compilation unit; empty for the default package.
pub fn package_name(root: Node<'_>, source: &str) -> String {
    let mut cursor = root.walk();
    let package = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == "package_declaration");
    let Some(package) = package else {
        return String::new();
    };

    let mut cursor = package.walk();
    let name = package
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"));
    name.map(|n| strip_whitespace(text(n, source)))
        .unwrap_or_default()
}

/// `parent.simple`, or just `simple` at the top of the default package.
pub fn qualify(parent: &str, simple: &str) -> String {
    if parent.is_empty() {
        simple.to_string()
    } else {
        format!("{parent}.{simple}")
    }
}

/// The `name` field of a declaration.
pub fn simple_name<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.child_by_field_name("name")
        .map(|name| text(name, source))
        .unwrap_or_default()
}

/// Method part of a qualified name: `name(T1,T2)` or `name()`.
///
/// Constructors are named after their type. Compact record constructors take
/// the record header's component types.
pub fn method_signature(node: Node<'_>, source: &str, style: SignatureStyle) -> String {
    let name = simple_name(node, source);
    match style {
        SignatureStyle::NameOnly => format!("{name}()"),
        SignatureStyle::ErasedParameters => {
            let types = signature_parameters(node)
                .map(|params| parameter_types(params, source))
                .unwrap_or_default();
            format!("{name}({})", types.join(","))
        }
    }
}

/// The parameter list that determines a method's signature.
fn signature_parameters(node: Node<'_>) -> Option<Node<'_>> {
    if node.kind() == "compact_constructor_declaration" {
        let record = node.parent()?.parent()?;
        return record.child_by_field_name("parameters");
    }
    node.child_by_field_name("parameters")
}

/// Erased types of every parameter in a `formal_parameters` node.
/// The receiver parameter is not part of the signature.
pub fn parameter_types(params: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| match param.kind() {
            "formal_parameter" => {
                let ty = param.child_by_field_name("type")?;
                let dims = param
                    .child_by_field_name("dimensions")
                    .map(|d| strip_whitespace(text(d, source)))
                    .unwrap_or_default();
                Some(format!("{}{dims}", erase_type(text(ty, source))))
            }
            "spread_parameter" => {
                let ty = spread_type(param)?;
                Some(format!("{}[]", erase_type(text(ty, source))))
            }
            _ => None,
        })
        .collect()
}

/// The element type of a varargs parameter.
pub fn spread_type(param: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = param.walk();
    let ty = param
        .named_children(&mut cursor)
        .find(|child| !matches!(child.kind(), "modifiers" | "variable_declarator"));
    ty
}

/// Erase a written type: drop type arguments and annotations, then all
/// whitespace. `java.util.Map<K, List<V>> []` becomes `java.util.Map[]`.
pub fn erase_type(written: &str) -> String {
    let mut erased = String::with_capacity(written.len());
    let mut depth = 0usize;
    let mut chars = written.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '@' if depth == 0 => skip_annotation(&mut chars),
            c if depth == 0 && !c.is_whitespace() => erased.push(c),
            _ => {}
        }
    }
    erased
}

fn skip_annotation(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars
        .peek()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
    {
        chars.next();
    }
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    if chars.peek() == Some(&'(') {
        let mut parens = 0usize;
        for c in chars.by_ref() {
            match c {
                '(' => parens += 1,
                ')' => {
                    parens -= 1;
                    if parens == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Declared variables of a field-like declaration with their names.
///
/// A field declaration yields one entry per declarator; an enum constant
/// yields itself with no declarator.
pub fn field_variables<'tree>(
    node: Node<'tree>,
    source: &str,
) -> Vec<(String, Option<Node<'tree>>)> {
    if node.kind() == "enum_constant" {
        return vec![(simple_name(node, source).to_string(), None)];
    }
    let mut cursor = node.walk();
    node.children_by_field_name("declarator", &mut cursor)
        .map(|declarator| (simple_name(declarator, source).to_string(), Some(declarator)))
        .collect()
}

pub(crate) fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
