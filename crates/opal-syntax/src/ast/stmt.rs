use super::expr::Expr;
use super::types::TypeExpr;

/// A statement, tagged with the source line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

/// The kind of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A local variable declaration, e.g. `int x = 3;`.
    LocalDecl {
        name: String,
        ty: TypeExpr,
        init: Option<Expr>,
    },
    /// A braced statement block, `{ ... }`.
    Block(Vec<Stmt>),
    /// An `if` statement. Branches are single statements; a braced branch
    /// is a `Block`.
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// A `while` loop. The body is a single statement, same as an `if`
    /// branch.
    While { cond: Expr, body: Box<Stmt> },
    /// An assignment to a variable or field.
    Assign { target: String, value: Expr },
    /// An expression statement consisting of a call.
    Call(Expr),
    /// A `return` statement, with an optional value.
    Return(Option<Expr>),
    /// A `break` statement.
    Break,
    /// A `continue` statement.
    Continue,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: u32) -> Self {
        Self { kind, line }
    }
}
