//! Declaration trees: a type, method or field and the parts it declares

use distill_core::{DeclarationNode, EntityType, SourceRange};
use tree_sitter::Node;

use super::{label_text, named_children, part, part_at, root_node};
use crate::classify::classify;
use crate::config::HelperConfig;
use crate::modifiers::{AccessFlags, modifiers_node};
use crate::naming;
use crate::structure::{JavaStructureNode, StructureKind};

pub struct DeclarationConverter<'a> {
    source: &'a str,
    config: &'a HelperConfig,
}

impl<'a> DeclarationConverter<'a> {
    pub fn new(source: &'a str, config: &'a HelperConfig) -> Self {
        Self { source, config }
    }

    pub fn convert(&self, node: &JavaStructureNode<'_>) -> DeclarationNode {
        self.convert_with_name(node, node.qualified_name())
    }

    /// Convert `node`, labelling the root `qualified_name`. Members of a type
    /// keep their own names.
    pub fn convert_with_name(&self, node: &JavaStructureNode<'_>, qualified_name: &str) -> DeclarationNode {
        let mut root = root_node(node, qualified_name, self.source, self.config);
        let syntax = node.node();
        let anchor = syntax.start_byte();

        match node.kind() {
            StructureKind::CompilationUnit => {
                for child in node.children() {
                    root.add_child(self.convert(child));
                }
            }
            StructureKind::Type => {
                self.visit_type(syntax, anchor, &mut root);
                for member in node.children() {
                    root.add_child(self.convert(member));
                }
            }
            StructureKind::Method => self.visit_method(syntax, anchor, &mut root),
            StructureKind::Field => self.visit_field(syntax, node.declarator(), anchor, &mut root),
        }

        tracing::debug!(
            "Converted {} {} into {} nodes",
            node.kind(),
            qualified_name,
            root.size()
        );
        root
    }

    fn visit_type(&self, node: Node<'_>, anchor: usize, parent: &mut DeclarationNode) {
        parent.add_child(self.modifiers(node, anchor));
        parent.add_child(self.type_parameters(node, anchor));

        if let Some(superclass) = node.child_by_field_name("superclass") {
            let mut group = part_at(EntityType::SuperType, "", superclass);
            for ty in named_children(superclass) {
                group.add_child(self.type_reference(ty));
            }
            parent.add_child(group);
        }

        parent.add_child(self.super_interfaces(node, anchor));

        if node.kind() == "record_declaration" {
            parent.add_child(self.parameters(node.child_by_field_name("parameters"), anchor));
        }
    }

    fn visit_method(&self, node: Node<'_>, anchor: usize, parent: &mut DeclarationNode) {
        parent.add_child(self.modifiers(node, anchor));
        parent.add_child(self.type_parameters(node, anchor));

        // Constructors have no `type` field.
        if let Some(ty) = node.child_by_field_name("type") {
            let mut group = part_at(EntityType::ReturnType, "", ty);
            group.add_child(self.type_reference(ty));
            parent.add_child(group);
        }

        parent.add_child(self.parameters(node.child_by_field_name("parameters"), anchor));
        parent.add_child(self.thrown_exceptions(node, anchor));
    }

    fn visit_field(
        &self,
        node: Node<'_>,
        declarator: Option<Node<'_>>,
        anchor: usize,
        parent: &mut DeclarationNode,
    ) {
        parent.add_child(self.modifiers(node, anchor));

        if let Some(ty) = node.child_by_field_name("type") {
            let dims = declarator.and_then(|d| d.child_by_field_name("dimensions"));
            let mut group = part_at(EntityType::FieldType, "", ty);
            group.add_child(self.typed(ty, dims));
            parent.add_child(group);
        }

        let initializer = match declarator {
            Some(declarator) => declarator.child_by_field_name("value"),
            None => node.child_by_field_name("arguments"),
        };
        if let Some(value) = initializer {
            parent.add_child(part_at(EntityType::Initializer, label_text(value, self.source), value));
        }
    }

    fn modifiers(&self, node: Node<'_>, anchor: usize) -> DeclarationNode {
        let Some(modifiers) = modifiers_node(node) else {
            return part(EntityType::Modifiers, "", SourceRange::empty_at(anchor));
        };

        let mut group = part_at(EntityType::Modifiers, "", modifiers);
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if AccessFlags::for_keyword(child.kind()).is_some() {
                group.add_child(part_at(EntityType::Modifier, child.kind(), child));
            } else if matches!(child.kind(), "annotation" | "marker_annotation") {
                group.add_child(part_at(EntityType::Annotation, label_text(child, self.source), child));
            }
        }
        group
    }

    fn type_parameters(&self, node: Node<'_>, anchor: usize) -> DeclarationNode {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return part(EntityType::TypeParameters, "", SourceRange::empty_at(anchor));
        };

        let mut group = part_at(EntityType::TypeParameters, "", params);
        for param in named_children(params) {
            if param.kind() == "type_parameter" {
                group.add_child(part_at(EntityType::TypeParameter, label_text(param, self.source), param));
            }
        }
        group
    }

    fn super_interfaces(&self, node: Node<'_>, anchor: usize) -> DeclarationNode {
        let clause = named_children(node)
            .into_iter()
            .find(|child| matches!(child.kind(), "super_interfaces" | "extends_interfaces"));
        let Some(clause) = clause else {
            return part(EntityType::SuperInterfaceTypes, "", SourceRange::empty_at(anchor));
        };

        let mut group = part_at(EntityType::SuperInterfaceTypes, "", clause);
        for list in named_children(clause) {
            for ty in named_children(list) {
                group.add_child(self.type_reference(ty));
            }
        }
        group
    }

    fn parameters(&self, params: Option<Node<'_>>, anchor: usize) -> DeclarationNode {
        let Some(params) = params else {
            return part(EntityType::Parameters, "", SourceRange::empty_at(anchor));
        };

        let mut group = part_at(EntityType::Parameters, "", params);
        for param in named_children(params) {
            match param.kind() {
                "formal_parameter" => {
                    let mut node =
                        part_at(EntityType::Parameter, naming::simple_name(param, self.source), param);
                    if let Some(ty) = param.child_by_field_name("type") {
                        node.add_child(self.typed(ty, param.child_by_field_name("dimensions")));
                    }
                    group.add_child(node);
                }
                "spread_parameter" => {
                    let name = named_children(param)
                        .into_iter()
                        .find(|child| child.kind() == "variable_declarator")
                        .map(|declarator| naming::simple_name(declarator, self.source))
                        .unwrap_or_default();
                    let mut node = part_at(EntityType::Parameter, name, param);
                    if let Some(ty) = naming::spread_type(param) {
                        let label = format!("{}...", label_text(ty, self.source));
                        node.add_child(part_at(EntityType::ArrayType, label, ty));
                    }
                    group.add_child(node);
                }
                _ => {}
            }
        }
        group
    }

    fn thrown_exceptions(&self, node: Node<'_>, anchor: usize) -> DeclarationNode {
        let throws = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "throws");
        let Some(throws) = throws else {
            return part(EntityType::ThrownExceptions, "", SourceRange::empty_at(anchor));
        };

        let mut group = part_at(EntityType::ThrownExceptions, "", throws);
        for ty in named_children(throws) {
            group.add_child(self.type_reference(ty));
        }
        group
    }

    /// A type reference, widened to an array type by C-style `dims` written
    /// after the variable name.
    fn typed(&self, ty: Node<'_>, dims: Option<Node<'_>>) -> DeclarationNode {
        match dims {
            Some(dims) => {
                let label = format!(
                    "{}{}",
                    label_text(ty, self.source),
                    label_text(dims, self.source)
                );
                part(
                    EntityType::ArrayType,
                    label,
                    SourceRange::new(ty.start_byte(), dims.end_byte()),
                )
            }
            None => self.type_reference(ty),
        }
    }

    fn type_reference(&self, node: Node<'_>) -> DeclarationNode {
        let kind = match classify(node) {
            kind @ (EntityType::PrimitiveType
            | EntityType::SimpleType
            | EntityType::QualifiedType
            | EntityType::ParameterizedType
            | EntityType::ArrayType) => kind,
            _ => EntityType::Unknown,
        };
        part_at(kind, label_text(node, self.source), node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilation::JavaCompilation;
    use crate::config::SignatureStyle;
    use crate::structure::StructureBuilder;
    use distill_core::ModifierSet;

    const SOURCE: &str = r#"package pkg;

public class A<T> extends Base implements Runnable, java.io.Serializable {
    @Deprecated
    protected final int count = 0;

    public <R> R map(List<T> items, int... extra) throws IOException {
        return null;
    }
}
"#;

    fn convert(source: &str, qualified_name: &str) -> DeclarationNode {
        let config = HelperConfig::default();
        let compilation = JavaCompilation::parse(source).unwrap();
        let unit = StructureBuilder::new(source, SignatureStyle::ErasedParameters).build(compilation.root());
        let node = unit.find(qualified_name).unwrap();
        DeclarationConverter::new(source, &config).convert(node)
    }

    #[test]
    fn test_class_tree() {
        let tree = convert(SOURCE, "pkg.A");
        insta::assert_snapshot!(tree.render(), @r"
        Class: pkg.A
          Modifiers
            Modifier: public
          TypeParameters
            TypeParameter: T
          SuperType
            SimpleType: Base
          SuperInterfaceTypes
            SimpleType: Runnable
            QualifiedType: java.io.Serializable
          Field: pkg.A.count
            Modifiers
              Annotation: @Deprecated
              Modifier: protected
              Modifier: final
            FieldType
              PrimitiveType: int
            Initializer: 0
          Method: pkg.A.map(List,int[])
            Modifiers
              Modifier: public
            TypeParameters
              TypeParameter: R
            ReturnType
              SimpleType: R
            Parameters
              Parameter: items
                ParameterizedType: List<T>
              Parameter: extra
                ArrayType: int...
            ThrownExceptions
              SimpleType: IOException
        ");
    }

    #[test]
    fn test_root_entity() {
        let tree = convert(SOURCE, "pkg.A.count");
        let entity = tree.entity().unwrap();
        assert_eq!(entity.unique_name(), "pkg.A.count");
        assert_eq!(entity.kind(), EntityType::Field);
        assert_eq!(entity.modifiers(), ModifierSet::PROTECTED | ModifierSet::FINAL);
        assert_eq!(
            entity.range().slice(SOURCE),
            Some("@Deprecated\n    protected final int count = 0;")
        );
    }

    #[test]
    fn test_sub_nodes_carry_entities() {
        let tree = convert(SOURCE, "pkg.A.map(List,int[])");
        for node in tree.descendants().skip(1) {
            let entity = node.entity().unwrap();
            assert_eq!(entity.unique_name(), node.label());
            assert_eq!(entity.kind(), node.kind());
            assert!(entity.modifiers().is_empty());
        }
        let params = tree.child_of_kind(EntityType::Parameters).unwrap();
        let items = params.child("items").unwrap();
        assert_eq!(
            items.entity().unwrap().range().slice(SOURCE),
            Some("List<T> items")
        );
    }

    #[test]
    fn test_constructor_has_no_return_type() {
        let source = "class A { A(int[] xs) throws Exception {} }";
        let tree = convert(source, "A.A(int[])");
        let kinds: Vec<_> = tree.children().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EntityType::Modifiers,
                EntityType::TypeParameters,
                EntityType::Parameters,
                EntityType::ThrownExceptions,
            ]
        );
        let empty = tree.child_of_kind(EntityType::Modifiers).unwrap();
        assert!(empty.is_leaf());
        assert!(empty.entity().unwrap().range().is_empty());
    }

    #[test]
    fn test_declarators_convert_separately() {
        let source = "class A { int a, b[] = {1}; }";
        let a = convert(source, "A.a");
        let b = convert(source, "A.b");

        assert!(a.child_of_kind(EntityType::Initializer).is_none());
        let b_type = b.child_of_kind(EntityType::FieldType).unwrap();
        assert_eq!(b_type.children()[0].kind(), EntityType::ArrayType);
        assert_eq!(b_type.children()[0].label(), "int[]");
        assert_eq!(b.child_of_kind(EntityType::Initializer).unwrap().label(), "{1}");
    }

    #[test]
    fn test_interface_and_enum() {
        let source = "interface I extends J, K {} enum E implements I { ONE(1); E(int v) {} }";
        let interface = convert(source, "I");
        let supers = interface.child_of_kind(EntityType::SuperInterfaceTypes).unwrap();
        let labels: Vec<_> = supers.children().iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["J", "K"]);
        assert!(interface.child_of_kind(EntityType::SuperType).is_none());

        let one = convert(source, "E.ONE");
        assert_eq!(one.kind(), EntityType::Field);
        assert_eq!(one.child_of_kind(EntityType::Initializer).unwrap().label(), "(1)");
    }

    #[test]
    fn test_name_override() {
        let config = HelperConfig::default();
        let compilation = JavaCompilation::parse(SOURCE).unwrap();
        let unit = StructureBuilder::new(SOURCE, SignatureStyle::ErasedParameters).build(compilation.root());
        let node = unit.find("pkg.A.count").unwrap();
        let tree = DeclarationConverter::new(SOURCE, &config).convert_with_name(node, "renamed");
        assert_eq!(tree.label(), "renamed");
        assert_eq!(tree.entity().unwrap().unique_name(), "pkg.A.count");
    }
}
