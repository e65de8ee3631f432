use super::stmt::Stmt;
use super::types::TypeExpr;

/// Root node of a parsed Opal source unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Name of the source unit (typically the file name without extension).
    pub name: String,
    /// All classes, in declaration order.
    pub classes: Vec<ClassDecl>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    /// Name of the superclass, if the class declares one. Resolution to an
    /// actual class happens in the semantic phase; a class may name a
    /// superclass declared later in the file.
    pub superclass: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDecl>,
    /// Methods in declaration order.
    pub methods: Vec<MethodDecl>,
    pub line: u32,
}

/// A field declaration inside a class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub line: u32,
}

/// A method declaration inside a class.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub kind: MethodKind,
    pub return_type: TypeExpr,
    /// Formal parameters in declaration order.
    pub formals: Vec<FormalParam>,
    /// Method body statements in source order. Always empty for
    /// `MethodKind::Library` methods.
    pub body: Vec<Stmt>,
    pub line: u32,
}

/// The dispatch/storage flavor of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// An instance method, dispatched through the receiver's class.
    Virtual,
    /// A class-level method with no receiver.
    Static,
    /// A bodiless intrinsic provided by the runtime library.
    Library,
}

/// A formal parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParam {
    pub name: String,
    pub ty: TypeExpr,
    pub line: u32,
}

impl Program {
    pub fn new(name: impl Into<String>, classes: Vec<ClassDecl>) -> Self {
        Self { name: name.into(), classes }
    }
}
