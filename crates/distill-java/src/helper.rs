//! `AstHelper` for one Java compilation unit

use distill_core::{
    AstHelper, ClassHistory, DeclarationNode, EntityType, HistoryStore, SourceCodeEntity,
};

use crate::comments::{Comment, clean_comments, collect_comments};
use crate::compilation::JavaCompilation;
use crate::config::HelperConfig;
use crate::converter::{BodyConverter, DeclarationConverter, structure_entity};
use crate::error::FrontendError;
use crate::structure::{JavaStructureNode, StructureBuilder, StructureKind};

/// Front-end helper over one parsed revision of one Java file.
///
/// Owns the compilation and its cleaned comments; structure nodes borrow
/// from it.
#[derive(Debug)]
pub struct JavaAstHelper {
    compilation: JavaCompilation,
    comments: Vec<Comment>,
    config: HelperConfig,
}

impl JavaAstHelper {
    pub fn new(compilation: JavaCompilation, config: HelperConfig) -> Self {
        let comments = clean_comments(collect_comments(compilation.root(), compilation.source()));
        Self {
            compilation,
            comments,
            config,
        }
    }

    pub fn from_source(source: impl Into<String>, config: HelperConfig) -> Result<Self, FrontendError> {
        Ok(Self::new(JavaCompilation::parse(source)?, config))
    }

    pub fn compilation(&self) -> &JavaCompilation {
        &self.compilation
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    /// Record every type of the compilation unit into `store` at one
    /// revision: top-level types in the store, their members and inner
    /// types in the type's history. Returns the number of snapshots taken.
    pub fn record_compilation_unit(&self, store: &mut HistoryStore, version: Option<&str>) -> usize {
        let unit = self.structure_tree();
        let mut recorded = 0;

        for ty in unit.children_of_kind(StructureKind::Type) {
            let snapshot = store.upsert_class(self.snapshot_at(ty, version));
            recorded += 1;
            if let Some(history) = store.class_mut(&snapshot.unique_name) {
                recorded += self.record_members(history, ty, version);
            }
        }

        tracing::debug!("Recorded {} snapshots at version {:?}", recorded, version);
        recorded
    }

    /// Record the members of `ty` into its own history, recursing into inner
    /// types.
    pub fn record_members(
        &self,
        history: &mut ClassHistory,
        ty: &JavaStructureNode<'_>,
        version: Option<&str>,
    ) -> usize {
        let mut recorded = 0;
        for member in ty.children() {
            match member.kind() {
                StructureKind::Method => {
                    self.record_method(history, member, version);
                    recorded += 1;
                }
                StructureKind::Field => {
                    self.record_field(history, member, version);
                    recorded += 1;
                }
                StructureKind::Type => {
                    let snapshot = self.record_inner_class(history, member, version);
                    recorded += 1;
                    if let Some(inner) = history.inner_class_mut(&snapshot.unique_name) {
                        recorded += self.record_members(inner, member, version);
                    }
                }
                StructureKind::CompilationUnit => {}
            }
        }
        recorded
    }
}

impl AstHelper for JavaAstHelper {
    type StructureNode<'a> = JavaStructureNode<'a>;

    fn structure_tree(&self) -> JavaStructureNode<'_> {
        StructureBuilder::new(self.compilation.source(), self.config.signature_style)
            .build(self.compilation.root())
    }

    fn entity_type(&self, node: &JavaStructureNode<'_>) -> EntityType {
        node.declaration().entity_type()
    }

    fn source_code_entity(&self, node: &JavaStructureNode<'_>) -> SourceCodeEntity {
        structure_entity(node, self.compilation.source(), &self.config)
    }

    fn declaration_tree(&self, node: &JavaStructureNode<'_>) -> DeclarationNode {
        DeclarationConverter::new(self.compilation.source(), &self.config).convert(node)
    }

    fn declaration_tree_with_name(
        &self,
        node: &JavaStructureNode<'_>,
        qualified_name: &str,
    ) -> DeclarationNode {
        DeclarationConverter::new(self.compilation.source(), &self.config)
            .convert_with_name(node, qualified_name)
    }

    fn method_body_tree(&self, node: &JavaStructureNode<'_>) -> Option<DeclarationNode> {
        BodyConverter::new(self.compilation.source(), &self.config, &self.comments).convert(node)
    }
}
