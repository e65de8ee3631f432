pub mod expr;
pub mod items;
pub mod stmt;
pub mod types;

pub use expr::{BinaryOp, Expr, ExprKind};
pub use items::{ClassDecl, FieldDecl, FormalParam, MethodDecl, MethodKind, Program};
pub use stmt::{Stmt, StmtKind};
pub use types::{PrimitiveKind, TypeExpr};
