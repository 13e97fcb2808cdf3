//! Distill Core: canonical declaration model, declaration trees and revision histories

pub mod model;
pub mod tree;
pub mod history;
pub mod store;
pub mod helper;


pub use model::{EntityType, ModifierSet, SourceCodeEntity, SourceRange};
pub use tree::DeclarationNode;
pub use history::{AttributeHistory, ClassHistory, EntityHistory, MethodHistory, StructureEntityVersion};
pub use store::{HistoryStore, StoreError, STORE_FORMAT_VERSION, save_store, load_store};
pub use helper::AstHelper;
