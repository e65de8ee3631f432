//! The symbol model: a named declaration with a kind and a type identity.

use crate::types::TypeId;

/// A single named declaration. Immutable once created; owned by exactly one
/// scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The declared name.
    pub name: String,
    /// What kind of declaration this is.
    pub kind: SymbolKind,
    /// The interned type of the declaration. For methods this is the
    /// signature type, for everything else the declared type.
    pub ty: TypeId,
    /// The source line of the declaration, for error attribution.
    pub line: u32,
}

/// The kind of a declared symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A class declaration, living in the global scope.
    Class,
    /// An instance field of a class.
    Field,
    /// An instance method, dispatched through the receiver.
    VirtualMethod,
    /// A class-level method. Library methods also use this kind.
    StaticMethod,
    /// A formal parameter of a method.
    Parameter,
    /// A local variable declared in a method body or block.
    LocalVariable,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, ty: TypeId, line: u32) -> Self {
        Self { name: name.into(), kind, ty, line }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Field => write!(f, "field"),
            SymbolKind::VirtualMethod => write!(f, "virtual method"),
            SymbolKind::StaticMethod => write!(f, "static method"),
            SymbolKind::Parameter => write!(f, "parameter"),
            SymbolKind::LocalVariable => write!(f, "local variable"),
        }
    }
}
