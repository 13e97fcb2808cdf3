//! Node-kind classifier: tree-sitter Java node kinds to canonical kinds

use distill_core::EntityType;
use tree_sitter::Node;

/// Node kinds that declare a type.
pub const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Node kinds that declare a method-like member.
pub const METHOD_DECLARATIONS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "compact_constructor_declaration",
    "annotation_type_element_declaration",
];

/// Node kinds that declare a field-like member.
pub const FIELD_DECLARATIONS: &[&str] = &["field_declaration", "constant_declaration", "enum_constant"];

/// Map a concrete syntax node to its canonical kind.
///
/// Anything not listed here is `Unknown`; callers still get a well-formed node.
pub fn classify(node: Node<'_>) -> EntityType {
    let kind = node.kind();
    if TYPE_DECLARATIONS.contains(&kind) {
        return EntityType::Class;
    }
    if METHOD_DECLARATIONS.contains(&kind) {
        return EntityType::Method;
    }
    if FIELD_DECLARATIONS.contains(&kind) {
        return EntityType::Field;
    }

    match kind {
        "program" => EntityType::CompilationUnit,

        "modifiers" => EntityType::Modifiers,
        "marker_annotation" | "annotation" => EntityType::Annotation,
        "type_parameters" => EntityType::TypeParameters,
        "type_parameter" => EntityType::TypeParameter,
        "superclass" => EntityType::SuperType,
        "super_interfaces" | "extends_interfaces" => EntityType::SuperInterfaceTypes,
        "formal_parameters" => EntityType::Parameters,
        "formal_parameter" | "spread_parameter" => EntityType::Parameter,
        "throws" => EntityType::ThrownExceptions,

        "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
            EntityType::PrimitiveType
        }
        "type_identifier" => EntityType::SimpleType,
        "scoped_type_identifier" => EntityType::QualifiedType,
        "generic_type" => EntityType::ParameterizedType,
        "array_type" => EntityType::ArrayType,

        "block" | "constructor_body" => EntityType::Block,
        "expression_statement" => EntityType::ExpressionStatement,
        "local_variable_declaration" => EntityType::VariableDeclarationStatement,
        "if_statement" => EntityType::IfStatement,
        "for_statement" => EntityType::ForStatement,
        "enhanced_for_statement" => EntityType::ForeachStatement,
        "while_statement" => EntityType::WhileStatement,
        "do_statement" => EntityType::DoStatement,
        "switch_expression" => EntityType::SwitchStatement,
        "switch_label" => EntityType::SwitchCase,
        "break_statement" => EntityType::BreakStatement,
        "continue_statement" => EntityType::ContinueStatement,
        "return_statement" => EntityType::ReturnStatement,
        "throw_statement" => EntityType::ThrowStatement,
        "try_statement" | "try_with_resources_statement" => EntityType::TryStatement,
        "catch_clause" => EntityType::CatchClause,
        "finally_clause" => EntityType::Finally,
        "synchronized_statement" => EntityType::SynchronizedStatement,
        "labeled_statement" => EntityType::LabeledStatement,
        "assert_statement" => EntityType::AssertStatement,
        "yield_statement" => EntityType::YieldStatement,
        "explicit_constructor_invocation" => EntityType::ConstructorInvocation,

        "line_comment" => EntityType::LineComment,
        "block_comment" => EntityType::BlockComment,

        _ => EntityType::Unknown,
    }
}

/// A syntax node tagged with the declaration category it was classified as.
///
/// Range extraction, modifier extraction and conversion match on this
/// instead of re-inspecting node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'tree> {
    Type(Node<'tree>),
    Method(Node<'tree>),
    Field(Node<'tree>),
    Other(Node<'tree>),
}

impl<'tree> Declaration<'tree> {
    pub fn classify(node: Node<'tree>) -> Self {
        match classify(node) {
            EntityType::Class => Declaration::Type(node),
            EntityType::Method => Declaration::Method(node),
            EntityType::Field => Declaration::Field(node),
            _ => Declaration::Other(node),
        }
    }

    pub fn node(&self) -> Node<'tree> {
        match *self {
            Declaration::Type(node)
            | Declaration::Method(node)
            | Declaration::Field(node)
            | Declaration::Other(node) => node,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Declaration::Type(_) => EntityType::Class,
            Declaration::Method(_) => EntityType::Method,
            Declaration::Field(_) => EntityType::Field,
            Declaration::Other(node) => classify(*node),
        }
    }

    pub fn is_declaration(&self) -> bool {
        !matches!(self, Declaration::Other(_))
    }
}
