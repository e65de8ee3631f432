//! Syntax tree definitions for the Opal language.
//!
//! This crate is a plain data model: the parser (or a test harness) produces
//! these nodes, and the semantic phases consume them. Every node carries the
//! 1-based source line it was declared on, which downstream phases use for
//! error attribution.

pub mod ast;

pub use ast::{
    ClassDecl, Expr, ExprKind, FieldDecl, FormalParam, MethodDecl, MethodKind,
    PrimitiveKind, Program, Stmt, StmtKind, TypeExpr,
};
