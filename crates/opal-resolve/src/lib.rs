//! Symbol table and scope construction for the Opal compiler.
//!
//! This crate is the semantic front-end's first pass: it walks a parsed
//! [`opal_syntax::Program`] and builds the hierarchy of lexical scopes
//! (global, class, method, and statement-block) that type checking and code
//! generation resolve names against, along with the type table interning
//! every type the program mentions.
//!
//! The entry point is [`build_symbol_tables`], which returns a
//! [`Resolution`]: the scope arena rooted at the global scope, the type
//! table, and the diagnostics recorded during construction. Construction is
//! deterministic and never aborts on a recoverable error, so a single run
//! reports every duplicate declaration and unresolved superclass it finds.

pub mod builder;
pub mod error;
pub mod scopes;
pub mod symbol;
pub mod types;

pub use builder::{build_symbol_tables, Resolution};
pub use error::ResolveError;
pub use scopes::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbol::{Symbol, SymbolKind};
pub use types::{TypeId, TypeTable, UnknownClass};
