//! Core data structures for canonical declaration entities

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Discriminates what kind of program construct a node or entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    // ── Declarations ────────────────────────────────────────
    CompilationUnit,
    Class,
    Method,
    Field,

    // ── Declaration parts ───────────────────────────────────
    Modifiers,
    Modifier,
    Annotation,
    TypeParameters,
    TypeParameter,
    SuperType,
    SuperInterfaceTypes,
    ReturnType,
    Parameters,
    Parameter,
    ThrownExceptions,
    FieldType,
    Initializer,

    // ── Type references ─────────────────────────────────────
    PrimitiveType,
    SimpleType,
    QualifiedType,
    ParameterizedType,
    ArrayType,

    // ── Statements ──────────────────────────────────────────
    Block,
    ExpressionStatement,
    VariableDeclarationStatement,
    IfStatement,
    ThenStatement,
    ElseStatement,
    ForStatement,
    ForeachStatement,
    WhileStatement,
    DoStatement,
    SwitchStatement,
    SwitchCase,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    Body,
    CatchClauses,
    CatchClause,
    Finally,
    SynchronizedStatement,
    LabeledStatement,
    AssertStatement,
    YieldStatement,
    ConstructorInvocation,
    SuperConstructorInvocation,
    TypeDeclarationStatement,

    // ── Comments ────────────────────────────────────────────
    LineComment,
    BlockComment,
    JavadocComment,

    // ── Fallback ────────────────────────────────────────────
    Unknown,
}

impl EntityType {
    /// Type, method or field: the kinds that carry modifiers and histories.
    pub fn is_declaration(self) -> bool {
        matches!(self, EntityType::Class | EntityType::Method | EntityType::Field)
    }

    pub fn is_type(self) -> bool {
        self == EntityType::Class
    }

    pub fn is_method(self) -> bool {
        self == EntityType::Method
    }

    pub fn is_field(self) -> bool {
        self == EntityType::Field
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            EntityType::LineComment | EntityType::BlockComment | EntityType::JavadocComment
        )
    }

    /// Kinds produced for statements inside a method body.
    pub fn is_statement(self) -> bool {
        use EntityType::*;
        matches!(
            self,
            Block
                | ExpressionStatement
                | VariableDeclarationStatement
                | IfStatement
                | ThenStatement
                | ElseStatement
                | ForStatement
                | ForeachStatement
                | WhileStatement
                | DoStatement
                | SwitchStatement
                | SwitchCase
                | BreakStatement
                | ContinueStatement
                | ReturnStatement
                | ThrowStatement
                | TryStatement
                | Body
                | CatchClauses
                | CatchClause
                | Finally
                | SynchronizedStatement
                | LabeledStatement
                | AssertStatement
                | YieldStatement
                | ConstructorInvocation
                | SuperConstructorInvocation
                | TypeDeclarationStatement
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Half-open `[start, end)` byte range into the source text of one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    /// Build a range; an `end` before `start` is clamped to `start`.
    pub fn new(start: usize, end: usize) -> Self {
        SourceRange {
            start,
            end: end.max(start),
        }
    }

    /// Zero-length range anchored at `offset`.
    pub fn empty_at(offset: usize) -> Self {
        SourceRange {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies completely inside this range.
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text this range covers, if it is in bounds for `source`.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Front-end independent visibility and finality flags.
///
/// Package (default) visibility is the absence of all three visibility bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const FINAL: ModifierSet = ModifierSet(0x01);
    pub const PUBLIC: ModifierSet = ModifierSet(0x02);
    pub const PROTECTED: ModifierSet = ModifierSet(0x04);
    pub const PRIVATE: ModifierSet = ModifierSet(0x08);

    const ALL: ModifierSet = ModifierSet(0x0f);

    const NAMED: [(ModifierSet, &'static str); 4] = [
        (ModifierSet::PUBLIC, "public"),
        (ModifierSet::PROTECTED, "protected"),
        (ModifierSet::PRIVATE, "private"),
        (ModifierSet::FINAL, "final"),
    ];

    pub const fn empty() -> Self {
        ModifierSet(0)
    }

    /// Rebuild from raw bits, dropping anything outside the four known flags.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        ModifierSet(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: ModifierSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ModifierSet) {
        self.0 |= other.0;
    }

    pub const fn union(self, other: ModifierSet) -> Self {
        ModifierSet(self.0 | other.0)
    }

    /// Whether none of public, protected or private is set.
    pub const fn is_package_private(self) -> bool {
        self.0 & (Self::PUBLIC.0 | Self::PROTECTED.0 | Self::PRIVATE.0) == 0
    }

    /// Source keywords for the flags present, visibility first.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for ModifierSet {
    type Output = ModifierSet;

    fn bitor(self, rhs: ModifierSet) -> ModifierSet {
        self.union(rhs)
    }
}

impl BitOrAssign for ModifierSet {
    fn bitor_assign(&mut self, rhs: ModifierSet) {
        self.insert(rhs);
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.names().join(", "))
    }
}

impl fmt::Debug for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModifierSet{self}")
    }
}

/// Identity, kind, modifiers and extent of one construct at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCodeEntity {
    unique_name: String,
    kind: EntityType,
    modifiers: ModifierSet,
    range: SourceRange,
}

impl SourceCodeEntity {
    pub fn new(
        unique_name: impl Into<String>,
        kind: EntityType,
        modifiers: ModifierSet,
        range: SourceRange,
    ) -> Self {
        SourceCodeEntity {
            unique_name: unique_name.into(),
            kind,
            modifiers,
            range,
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn kind(&self) -> EntityType {
        self.kind
    }

    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    pub fn range(&self) -> SourceRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_names_order() {
        let set = ModifierSet::FINAL | ModifierSet::PUBLIC;
        assert_eq!(set.names(), vec!["public", "final"]);
        assert_eq!(set.to_string(), "{public, final}");
        assert_eq!(ModifierSet::empty().to_string(), "{}");
    }

    #[test]
    fn test_modifier_truncation() {
        let set = ModifierSet::from_bits_truncate(0xff);
        assert_eq!(set.bits(), 0x0f);
        assert!(set.contains(ModifierSet::PRIVATE));
    }

    #[test]
    fn test_package_private() {
        assert!(ModifierSet::empty().is_package_private());
        assert!(ModifierSet::FINAL.is_package_private());
        assert!(!ModifierSet::PROTECTED.is_package_private());
    }

    #[test]
    fn test_range_clamps_and_slices() {
        let source = "class A {}";
        let range = SourceRange::new(0, 5);
        assert_eq!(range.slice(source), Some("class"));
        assert_eq!(range.len(), 5);
        assert!(range.contains(&SourceRange::new(1, 3)));
        assert!(!range.contains(&SourceRange::new(4, 6)));
        assert!(SourceRange::empty_at(3).is_empty());

        let inverted = SourceRange::new(7, 4);
        assert_eq!(inverted, SourceRange::empty_at(7));
        assert_eq!(inverted.slice(source), Some(""));
    }

    #[test]
    fn test_entity_type_predicates() {
        assert!(EntityType::Method.is_declaration());
        assert!(!EntityType::Modifiers.is_declaration());
        assert!(EntityType::IfStatement.is_statement());
        assert!(EntityType::JavadocComment.is_comment());
        assert!(!EntityType::Unknown.is_statement());
    }
}
