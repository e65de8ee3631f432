use crate::symbol::SymbolKind;
use miette::Diagnostic;
use thiserror::Error;

/// Errors detected while constructing the symbol-table hierarchy.
///
/// All of these are recoverable: the builder records the diagnostic and
/// keeps processing the rest of the tree, so one run surfaces as many
/// independent errors as possible. None of them stops construction.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Two symbols with the same name were inserted into the same scope.
    /// The earlier declaration is retained; the later one is rejected.
    /// Shadowing a name from an *enclosing* scope is not a conflict.
    #[error("line {line}: duplicate declaration of {kind} `{name}` in {scope}")]
    #[diagnostic(code(opal_resolve::duplicate_declaration))]
    DuplicateDeclaration {
        /// The re-declared name.
        name: String,
        /// The kind of the rejected (later) declaration.
        kind: SymbolKind,
        /// Description of the scope the collision happened in, e.g.
        /// `class Foo` or `a statement block`.
        scope: String,
        /// Source line of the rejected declaration.
        line: u32,
    },

    /// A class declares a superclass name that matches no registered class.
    /// The class's scope parent falls back to the global scope so other
    /// classes can still be processed.
    #[error("line {line}: class `{class}` extends unknown class `{superclass}`")]
    #[diagnostic(code(opal_resolve::unresolved_superclass))]
    UnresolvedSuperclass {
        /// The class with the bad `extends` clause.
        class: String,
        /// The name that did not resolve.
        superclass: String,
        /// Source line of the class declaration.
        line: u32,
    },

    /// A class participates in an inheritance cycle (e.g. `A extends B`
    /// and `B extends A`). Reported once per class on the cycle; each such
    /// class's scope parent falls back to the global scope, keeping the
    /// parent chain finite.
    #[error("line {line}: class `{class}` is part of an inheritance cycle")]
    #[diagnostic(code(opal_resolve::inheritance_cycle))]
    InheritanceCycle {
        /// A class on the cycle.
        class: String,
        /// Source line of the class declaration.
        line: u32,
    },
}

impl ResolveError {
    /// The source line the diagnostic points at.
    pub fn line(&self) -> u32 {
        match self {
            ResolveError::DuplicateDeclaration { line, .. } => *line,
            ResolveError::UnresolvedSuperclass { line, .. } => *line,
            ResolveError::InheritanceCycle { line, .. } => *line,
        }
    }
}
