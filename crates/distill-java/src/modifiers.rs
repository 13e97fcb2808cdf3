//! Modifier canonicalizer
//!
//! The front end encodes modifiers the way class files do, as JVM access
//! flag bits read off a declaration's `modifiers` node. Canonicalization keeps
//! the four flags the model tracks and drops everything else.

use distill_core::ModifierSet;
use tree_sitter::Node;

use crate::classify::Declaration;

/// Front-end modifier encoding: JVM access flag bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(pub u32);

impl AccessFlags {
    pub const PUBLIC: u32 = 0x0001;
    pub const PRIVATE: u32 = 0x0002;
    pub const PROTECTED: u32 = 0x0004;
    pub const STATIC: u32 = 0x0008;
    pub const FINAL: u32 = 0x0010;
    pub const SYNCHRONIZED: u32 = 0x0020;
    pub const VOLATILE: u32 = 0x0040;
    pub const TRANSIENT: u32 = 0x0080;
    pub const NATIVE: u32 = 0x0100;
    pub const ABSTRACT: u32 = 0x0400;
    pub const STRICT: u32 = 0x0800;
    // Source-only modifiers with no class-file flag.
    pub const DEFAULT: u32 = 0x0001_0000;
    pub const SEALED: u32 = 0x0002_0000;
    pub const NON_SEALED: u32 = 0x0004_0000;

    pub fn has(self, flag: u32) -> bool {
        self.0 & flag != 0
    }

    /// Flag for a modifier keyword, if it is one.
    pub fn for_keyword(keyword: &str) -> Option<u32> {
        let flag = match keyword {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "synchronized" => Self::SYNCHRONIZED,
            "volatile" => Self::VOLATILE,
            "transient" => Self::TRANSIENT,
            "native" => Self::NATIVE,
            "abstract" => Self::ABSTRACT,
            "strictfp" => Self::STRICT,
            "default" => Self::DEFAULT,
            "sealed" => Self::SEALED,
            "non-sealed" => Self::NON_SEALED,
            _ => return None,
        };
        Some(flag)
    }
}

/// The `modifiers` child of a declaration node, if it has one.
pub fn modifiers_node<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "modifiers");
    found
}

/// Raw access flags of a declaration.
///
/// `None` for node kinds that cannot carry modifiers; declarations written
/// without any modifier yield empty flags.
pub fn modifier_bits(declaration: &Declaration<'_>) -> Option<AccessFlags> {
    let node = match declaration {
        Declaration::Type(node) | Declaration::Method(node) | Declaration::Field(node) => *node,
        Declaration::Other(_) => return None,
    };

    let Some(modifiers) = modifiers_node(node) else {
        return Some(AccessFlags::default());
    };

    let mut bits = 0;
    let mut cursor = modifiers.walk();
    for child in modifiers.children(&mut cursor) {
        if let Some(flag) = AccessFlags::for_keyword(child.kind()) {
            bits |= flag;
        }
    }
    Some(AccessFlags(bits))
}

/// Map front-end flags onto the canonical set. Unknown bits are dropped.
pub fn canonicalize(flags: AccessFlags) -> ModifierSet {
    let mut modifiers = ModifierSet::empty();
    if flags.has(AccessFlags::FINAL) {
        modifiers |= ModifierSet::FINAL;
    }
    if flags.has(AccessFlags::PUBLIC) {
        modifiers |= ModifierSet::PUBLIC;
    }
    if flags.has(AccessFlags::PROTECTED) {
        modifiers |= ModifierSet::PROTECTED;
    }
    if flags.has(AccessFlags::PRIVATE) {
        modifiers |= ModifierSet::PRIVATE;
    }
    modifiers
}

/// Canonical modifiers of any classified node; empty for non-declarations.
pub fn extract_modifiers(declaration: &Declaration<'_>) -> ModifierSet {
    modifier_bits(declaration)
        .map(canonicalize)
        .unwrap_or_default()
}
