//! Java front end: parsing, structure trees, declaration trees and history recording

pub mod classify;
pub mod comments;
pub mod compilation;
pub mod config;
pub mod converter;
pub mod error;
pub mod helper;
pub mod modifiers;
pub mod naming;
pub mod parser_pool;
pub mod range;
pub mod structure;


pub use classify::Declaration;
pub use comments::{Comment, CommentKind};
pub use compilation::JavaCompilation;
pub use config::{HelperConfig, SignatureStyle, CONFIG_FILE};
pub use error::{ConfigError, FrontendError};
pub use helper::JavaAstHelper;
pub use modifiers::AccessFlags;
pub use parser_pool::{ParseRequest, ParseResult, ParserPool, create_parser_pool};
pub use structure::{JavaStructureNode, StructureKind};
