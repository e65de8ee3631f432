//! The type table: an interning registry for every distinct type in a
//! program.
//!
//! Three families of types are interned:
//! - primitive types, deduplicated by kind;
//! - class types, which are *nominal*: every class declaration gets a fresh
//!   identity even if another class with the same name exists;
//! - method signatures (return type plus ordered parameter types),
//!   deduplicated structurally so method symbols carry a comparable type
//!   like any other symbol.
//!
//! The table additionally records the single-parent inheritance edge between
//! class identities; an edge may later be cleared when the chain it closes
//! turns out to be cyclic. A `TypeId`, once returned, is a stable handle
//! whose meaning never changes.

use fxhash::FxHashMap;
use opal_syntax::PrimitiveKind;
use thiserror::Error;

/// An interned, stable identity for a primitive type, class type, or method
/// signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// The interned structure behind a `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeDesc {
    Primitive(PrimitiveKind),
    Class { name: String },
    Method { ret: TypeId, params: Vec<TypeId> },
}

/// Error returned by [`TypeTable::set_superclass`] when the named superclass
/// was never registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown class `{0}`")]
pub struct UnknownClass(pub String);

/// The interning registry. TypeIds are assigned densely in interning order,
/// so for a fixed input program the assignment is deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    descs: Vec<TypeDesc>,
    primitives: FxHashMap<PrimitiveKind, TypeId>,
    /// First registration of a class name wins; later same-name classes
    /// still get fresh ids but do not replace the mapping.
    classes_by_name: FxHashMap<String, TypeId>,
    methods: FxHashMap<(TypeId, Vec<TypeId>), TypeId>,
    superclass: FxHashMap<TypeId, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, desc: TypeDesc) -> TypeId {
        let id = TypeId(self.descs.len() as u32);
        self.descs.push(desc);
        id
    }

    /// Intern a primitive type. Idempotent: the same kind always yields the
    /// same id.
    pub fn intern_primitive(&mut self, kind: PrimitiveKind) -> TypeId {
        if let Some(&id) = self.primitives.get(&kind) {
            return id;
        }
        let id = self.push(TypeDesc::Primitive(kind));
        self.primitives.insert(kind, id);
        id
    }

    /// Intern a class type. Called once per class declaration; always
    /// returns a fresh id, since class identity is nominal. Duplicate class
    /// names are a caller-level error and are not deduplicated here.
    pub fn intern_class(&mut self, name: &str) -> TypeId {
        let id = self.push(TypeDesc::Class { name: name.to_string() });
        self.classes_by_name.entry(name.to_string()).or_insert(id);
        id
    }

    /// Intern a method signature, deduplicated structurally.
    pub fn intern_method(&mut self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        let key = (ret, params);
        if let Some(&id) = self.methods.get(&key) {
            return id;
        }
        let (ret, params) = key;
        let id = self.push(TypeDesc::Method { ret, params: params.clone() });
        self.methods.insert((ret, params), id);
        id
    }

    /// Record the inheritance edge from `class_id` to the class registered
    /// under `superclass_name`. On failure the table is left untouched.
    pub fn set_superclass(
        &mut self,
        class_id: TypeId,
        superclass_name: &str,
    ) -> Result<TypeId, UnknownClass> {
        let super_id = self
            .class_id(superclass_name)
            .ok_or_else(|| UnknownClass(superclass_name.to_string()))?;
        self.superclass.insert(class_id, super_id);
        Ok(super_id)
    }

    /// Remove the inheritance edge recorded for `class_id`, if any. Used
    /// when a recorded edge turns out to close an inheritance cycle and the
    /// chain is broken back to no-superclass.
    pub fn clear_superclass(&mut self, class_id: TypeId) {
        self.superclass.remove(&class_id);
    }

    /// The id of the first-registered class with this name, if any.
    pub fn class_id(&self, name: &str) -> Option<TypeId> {
        self.classes_by_name.get(name).copied()
    }

    /// The recorded superclass of a class id, if an edge was set.
    pub fn superclass_of(&self, class_id: TypeId) -> Option<TypeId> {
        self.superclass.get(&class_id).copied()
    }

    pub fn is_class(&self, id: TypeId) -> bool {
        matches!(self.descs.get(id.0 as usize), Some(TypeDesc::Class { .. }))
    }

    /// Human-readable rendering of a type, used in diagnostics and the
    /// scope-tree printer. Method signatures render as
    /// `{p1, p2 -> ret}`.
    pub fn describe(&self, id: TypeId) -> String {
        match &self.descs[id.0 as usize] {
            TypeDesc::Primitive(kind) => kind.to_string(),
            TypeDesc::Class { name } => name.clone(),
            TypeDesc::Method { ret, params } => {
                let params = params
                    .iter()
                    .map(|p| self.describe(*p))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{} -> {}}}", params, self.describe(*ret))
            }
        }
    }

    /// Number of interned types. Exposed so callers can assert stability of
    /// id assignment across runs.
    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_interning_is_idempotent() {
        let mut table = TypeTable::new();
        let a = table.intern_primitive(PrimitiveKind::Int);
        let b = table.intern_primitive(PrimitiveKind::Int);
        assert_eq!(a, b);

        let c = table.intern_primitive(PrimitiveKind::Bool);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn class_interning_is_nominal() {
        let mut table = TypeTable::new();
        let first = table.intern_class("Foo");
        let second = table.intern_class("Foo");
        assert_ne!(first, second);
        // The name map keeps the first registration.
        assert_eq!(table.class_id("Foo"), Some(first));
    }

    #[test]
    fn method_signatures_dedup_structurally() {
        let mut table = TypeTable::new();
        let int = table.intern_primitive(PrimitiveKind::Int);
        let void = table.intern_primitive(PrimitiveKind::Void);

        let a = table.intern_method(void, vec![int, int]);
        let b = table.intern_method(void, vec![int, int]);
        assert_eq!(a, b);

        let c = table.intern_method(void, vec![int]);
        assert_ne!(a, c);
        assert_eq!(table.describe(a), "{int, int -> void}");
    }

    #[test]
    fn set_superclass_records_edge() {
        let mut table = TypeTable::new();
        let base = table.intern_class("Base");
        let derived = table.intern_class("Derived");

        assert_eq!(table.set_superclass(derived, "Base"), Ok(base));
        assert_eq!(table.superclass_of(derived), Some(base));
        assert_eq!(table.superclass_of(base), None);
    }

    #[test]
    fn clear_superclass_removes_the_edge() {
        let mut table = TypeTable::new();
        let base = table.intern_class("Base");
        let derived = table.intern_class("Derived");

        table.set_superclass(derived, "Base").unwrap();
        assert_eq!(table.superclass_of(derived), Some(base));

        table.clear_superclass(derived);
        assert_eq!(table.superclass_of(derived), None);
        // Clearing an absent edge is a no-op.
        table.clear_superclass(base);
        assert_eq!(table.superclass_of(base), None);
    }

    #[test]
    fn set_superclass_rejects_unknown_name() {
        let mut table = TypeTable::new();
        let c = table.intern_class("C");
        let err = table.set_superclass(c, "Ghost").unwrap_err();
        assert_eq!(err, UnknownClass("Ghost".to_string()));
        // Failure leaves the table untouched.
        assert_eq!(table.superclass_of(c), None);
    }
}
