//! The scope arena: every lexical scope of a program, owned in one place
//! and wired together by index.
//!
//! Scopes reference each other only by [`ScopeId`], so the parent
//! back-reference needed for upward name resolution never creates cyclic
//! ownership. Symbols are kept in insertion order (a `Vec`) with a hash
//! index alongside for same-scope collision checks; no ordering is ever
//! taken from a hash map, which keeps construction fully deterministic.

use fxhash::FxHashMap;

use crate::symbol::Symbol;
use crate::types::TypeTable;

/// Index of a scope inside a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

/// The four scope kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The program root; its symbols are the declared classes.
    Global,
    /// One per class; holds fields and methods. Its parent is the
    /// superclass's scope if the class has one, else the global scope.
    Class,
    /// One per method; holds the formal parameters and the method body's
    /// top-level locals.
    Method,
    /// One per braced statement block; holds the locals declared directly
    /// in it.
    Block,
}

/// A single lexical scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The scope's name: the class/method name, the program name for the
    /// global scope, empty for anonymous blocks.
    pub name: String,
    symbols: Vec<Symbol>,
    index: FxHashMap<String, usize>,
    children: Vec<ScopeId>,
    parent: Option<ScopeId>,
}

impl Scope {
    /// The symbols of this scope, in insertion (= declaration) order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Nested scopes, in attachment (= source) order.
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// The lexically enclosing scope, once wired.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Look a name up in this scope only.
    pub fn local(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }
}

/// Arena owning every scope of a program.
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty, detached scope.
    pub fn new_scope(&mut self, kind: ScopeKind, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            name: name.into(),
            symbols: Vec::new(),
            index: FxHashMap::default(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Insert a symbol into a scope. A name already present in that exact
    /// scope is a conflict: the earlier symbol is retained and the rejected
    /// one is handed back so the caller can report it. Shadowing a name
    /// from an enclosing scope is always allowed.
    pub fn insert(&mut self, id: ScopeId, symbol: Symbol) -> Result<(), Symbol> {
        let scope = &mut self.scopes[id.0];
        if scope.index.contains_key(&symbol.name) {
            return Err(symbol);
        }
        scope.index.insert(symbol.name.clone(), scope.symbols.len());
        scope.symbols.push(symbol);
        Ok(())
    }

    /// Append a child scope in call order. Does not set the child's parent
    /// link; that happens in [`ScopeTree::set_parent`] or
    /// [`ScopeTree::finalize_parent_links`].
    pub fn add_child(&mut self, parent: ScopeId, child: ScopeId) {
        self.scopes[parent.0].children.push(child);
    }

    /// Wire a child's parent back-reference. Used for class scopes (in the
    /// linkage phase) and method scopes (when attached to their class).
    pub fn set_parent(&mut self, child: ScopeId, parent: ScopeId) {
        self.scopes[child.0].parent = Some(parent);
    }

    /// Walk the subtree under `root` and set every descendant's parent to
    /// its immediate encloser. Runs once per method, after that method's
    /// whole scope subtree has been built: blocks can be discovered before
    /// their final position in the tree is confirmed, so their links are
    /// only wired here.
    pub fn finalize_parent_links(&mut self, root: ScopeId) {
        let children = self.scopes[root.0].children.clone();
        for child in children {
            self.scopes[child.0].parent = Some(root);
            self.finalize_parent_links(child);
        }
    }

    /// Resolve a name by walking from `scope` up the parent chain. Returns
    /// the first match, so an inner declaration shadows an outer one. For
    /// class scopes this walk is also how inherited fields and methods
    /// become visible, since a subclass's parent is its superclass's scope.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(symbol) = scope.local(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// Description of a scope for diagnostics, e.g. `class Foo` or
    /// `a statement block`.
    pub fn describe(&self, id: ScopeId) -> String {
        let scope = &self.scopes[id.0];
        match scope.kind {
            ScopeKind::Global => "the global scope".to_string(),
            ScopeKind::Class => format!("class {}", scope.name),
            ScopeKind::Method => format!("method {}", scope.name),
            ScopeKind::Block => "a statement block".to_string(),
        }
    }

    /// Number of scopes in the arena.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Render the subtree under `root` as an indented listing, one line per
    /// scope header and per symbol. Used by tests and by later phases when
    /// dumping tables.
    pub fn render(&self, root: ScopeId, types: &TypeTable) -> String {
        let mut out = String::new();
        self.render_into(root, types, 0, &mut out);
        out
    }

    fn render_into(&self, id: ScopeId, types: &TypeTable, depth: usize, out: &mut String) {
        use std::fmt::Write;

        let scope = &self.scopes[id.0];
        let pad = "  ".repeat(depth);
        let header = match scope.kind {
            ScopeKind::Global => format!("global {}", scope.name),
            ScopeKind::Class => format!("class {}", scope.name),
            ScopeKind::Method => format!("method {}", scope.name),
            ScopeKind::Block => "block".to_string(),
        };
        let _ = writeln!(out, "{pad}{header}");
        for symbol in &scope.symbols {
            let _ = writeln!(
                out,
                "{pad}  {}: {} {}",
                symbol.kind,
                types.describe(symbol.ty),
                symbol.name
            );
        }
        for &child in &scope.children {
            self.render_into(child, types, depth + 1, out);
        }
    }
}
