/// A type annotation as written in the source.
///
/// This is the *syntactic* form only; the resolver interns it into a stable
/// type identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A built-in primitive type.
    Primitive(PrimitiveKind),
    /// A reference to a class by name, with the line of the reference.
    Named(String, u32),
}

/// The primitive types of the Opal language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// The integer type.
    Int,
    /// The boolean type.
    Bool,
    /// The string type.
    Str,
    /// The void type, only valid as a method return type.
    Void,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>, line: u32) -> Self {
        TypeExpr::Named(name.into(), line)
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimitiveKind::Int => write!(f, "int"),
            PrimitiveKind::Bool => write!(f, "bool"),
            PrimitiveKind::Str => write!(f, "string"),
            PrimitiveKind::Void => write!(f, "void"),
        }
    }
}
