//! The scope-building traversal: a single pass over the syntax tree that
//! produces the full scope hierarchy and populates the type table.
//!
//! Class handling is two-phase. The registration phase interns every class
//! type and inserts every class symbol into the global scope before any
//! class body is processed, so forward references between classes resolve
//! regardless of declaration order. Only then are the class bodies built,
//! and only after *that* does the linkage phase wire each class scope's
//! parent to its superclass's scope (or the global scope) and record the
//! inheritance edge in the type table, so a subclass's parent is always an
//! already fully-populated scope.
//!
//! Construction never aborts: duplicate declarations and unresolved
//! superclasses are recorded as diagnostics and the traversal keeps going,
//! so one run reports as many independent errors as possible.

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, trace};
use opal_syntax::{
    ClassDecl, MethodDecl, MethodKind, Program, Stmt, StmtKind, TypeExpr,
};

use crate::error::ResolveError;
use crate::scopes::{ScopeId, ScopeKind, ScopeTree};
use crate::symbol::{Symbol, SymbolKind};
use crate::types::{TypeId, TypeTable};

/// The product of scope construction: the scope arena rooted at the global
/// scope, the populated type table, and every diagnostic recorded along the
/// way, in detection order.
///
/// After construction these structures are read-only; later phases share
/// them freely for lookups.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub scopes: ScopeTree,
    /// The global scope; its symbols are the declared classes and its
    /// children are the class scopes, one per class in declaration order.
    pub global: ScopeId,
    pub types: TypeTable,
    pub diagnostics: Vec<ResolveError>,
}

impl Resolution {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Render the whole scope tree as an indented listing.
    pub fn render(&self) -> String {
        self.scopes.render(self.global, &self.types)
    }
}

/// Build the symbol-table hierarchy and type table for a program.
///
/// A pure function of the input tree: two runs over the same program
/// produce identical scope shapes, symbol orderings, and type-id
/// assignments.
pub fn build_symbol_tables(program: &Program) -> Resolution {
    Builder::default().run(program)
}

#[derive(Default)]
struct Builder {
    scopes: ScopeTree,
    types: TypeTable,
    diagnostics: Vec<ResolveError>,
}

/// What a single statement contributes to its enclosing scope: symbols to
/// insert and block scopes to attach, each in source order.
#[derive(Default)]
struct StmtOutcome {
    symbols: Vec<Symbol>,
    blocks: Vec<ScopeId>,
}

impl StmtOutcome {
    fn merge(&mut self, other: StmtOutcome) {
        self.symbols.extend(other.symbols);
        self.blocks.extend(other.blocks);
    }
}

impl Builder {
    fn run(mut self, program: &Program) -> Resolution {
        let global = self.scopes.new_scope(ScopeKind::Global, program.name.clone());

        // Registration phase, name sweep: every class type is interned and
        // every class symbol exists in the global scope before any class
        // body is visited, so a method in an early class can reference a
        // class declared later.
        debug!("registering {} classes", program.classes.len());
        let mut class_ids = Vec::with_capacity(program.classes.len());
        for class in &program.classes {
            let class_ty = self.types.intern_class(&class.name);
            self.insert_or_report(
                global,
                Symbol::new(&class.name, SymbolKind::Class, class_ty, class.line),
            );
            class_ids.push(class_ty);
        }

        // Registration phase, body sweep: build each class's full scope
        // (fields, methods, method bodies). Superclass links are not wired
        // yet. The first scope registered under a name wins the name map,
        // mirroring the type table's name handling.
        let mut scope_for_class: FxHashMap<&str, ScopeId> = FxHashMap::default();
        let mut class_scopes = Vec::with_capacity(program.classes.len());
        for class in &program.classes {
            let class_scope = self.build_class(class);
            self.scopes.add_child(global, class_scope);
            scope_for_class.entry(&class.name).or_insert(class_scope);
            class_scopes.push(class_scope);
        }

        // Linkage phase: wire each class scope's parent and record the
        // inheritance edge. A class naming an unregistered superclass gets
        // one diagnostic and falls back to the global scope so downstream
        // construction is unaffected.
        debug!("linking superclass scopes");
        for (idx, class) in program.classes.iter().enumerate() {
            let class_scope = class_scopes[idx];
            let parent = match &class.superclass {
                // Only a name registered by a class *declaration* in phase 1
                // qualifies; a nominal id interned on demand for a stray
                // type reference has no scope behind it.
                Some(super_name) => match scope_for_class.get(super_name.as_str()) {
                    Some(&super_scope) => {
                        let linked = self.types.set_superclass(class_ids[idx], super_name);
                        debug_assert!(linked.is_ok(), "phase 1 interned every declared name");
                        super_scope
                    }
                    None => {
                        self.diagnostics.push(ResolveError::UnresolvedSuperclass {
                            class: class.name.clone(),
                            superclass: super_name.clone(),
                            line: class.line,
                        });
                        global
                    }
                },
                None => global,
            };
            self.scopes.set_parent(class_scope, parent);
        }

        self.check_inheritance_cycles(program, &class_ids, &class_scopes, global);

        debug!(
            "built {} scopes, {} types, {} diagnostics",
            self.scopes.len(),
            self.types.len(),
            self.diagnostics.len()
        );
        Resolution {
            scopes: self.scopes,
            global,
            types: self.types,
            diagnostics: self.diagnostics,
        }
    }

    /// Build a class scope: field symbols first, then per method its symbol
    /// and its method scope, all in declaration order. Fields never get a
    /// child scope of their own.
    fn build_class(&mut self, class: &ClassDecl) -> ScopeId {
        trace!("building class scope for `{}`", class.name);
        let class_scope = self.scopes.new_scope(ScopeKind::Class, &class.name);

        for field in &class.fields {
            let ty = self.intern_type(&field.ty);
            self.insert_or_report(
                class_scope,
                Symbol::new(&field.name, SymbolKind::Field, ty, field.line),
            );
        }

        for method in &class.methods {
            // Library methods are dispatched statically; they share the
            // static symbol kind.
            let kind = match method.kind {
                MethodKind::Virtual => SymbolKind::VirtualMethod,
                MethodKind::Static | MethodKind::Library => SymbolKind::StaticMethod,
            };
            let sig = self.method_signature(method);
            let method_scope = self.build_method(method);
            self.scopes.add_child(class_scope, method_scope);
            self.scopes.set_parent(method_scope, class_scope);
            self.insert_or_report(
                class_scope,
                Symbol::new(&method.name, kind, sig, method.line),
            );
        }

        class_scope
    }

    /// Build a method scope: formal parameters in order, then the statement
    /// pass run directly against the method scope, so the body's top-level
    /// locals live in the method scope itself rather than a wrapper block.
    /// Parent links of the block subtree are wired last, once the whole
    /// subtree exists.
    fn build_method(&mut self, method: &MethodDecl) -> ScopeId {
        trace!("building method scope for `{}`", method.name);
        let method_scope = self.scopes.new_scope(ScopeKind::Method, &method.name);

        for formal in &method.formals {
            let ty = self.intern_type(&formal.ty);
            self.insert_or_report(
                method_scope,
                Symbol::new(&formal.name, SymbolKind::Parameter, ty, formal.line),
            );
        }

        self.visit_statements(method_scope, &method.body);
        self.scopes.finalize_parent_links(method_scope);
        method_scope
    }

    /// The statement-list pass: visit each statement and combine its
    /// outcome into the target scope, scanning left to right. Symbols are
    /// inserted and child scopes attached in source order; statements that
    /// produce neither are skipped.
    fn visit_statements(&mut self, target: ScopeId, stmts: &[Stmt]) {
        for stmt in stmts {
            let outcome = self.visit_stmt(stmt);
            for symbol in outcome.symbols {
                self.insert_or_report(target, symbol);
            }
            for block in outcome.blocks {
                self.scopes.add_child(target, block);
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> StmtOutcome {
        let mut outcome = StmtOutcome::default();
        match &stmt.kind {
            StmtKind::LocalDecl { name, ty, .. } => {
                // A local declaration yields one symbol and opens no scope.
                let ty = self.intern_type(ty);
                outcome
                    .symbols
                    .push(Symbol::new(name, SymbolKind::LocalVariable, ty, stmt.line));
            }
            StmtKind::Block(stmts) => {
                // A block yields exactly one fresh scope; its own statement
                // list is processed into that scope, not the target.
                let block = self.scopes.new_scope(ScopeKind::Block, "");
                self.visit_statements(block, stmts);
                outcome.blocks.push(block);
            }
            StmtKind::If { then_branch, else_branch, .. } => {
                // The `if` itself wraps no scope: a block branch contributes
                // its one block scope, so two block branches yield two
                // sibling scopes in the enclosing scope. A non-block branch
                // contributes whatever it produces itself.
                outcome.merge(self.visit_stmt(then_branch));
                if let Some(else_branch) = else_branch {
                    outcome.merge(self.visit_stmt(else_branch));
                }
            }
            StmtKind::While { body, .. } => {
                // Same rule as a single `if` branch.
                outcome.merge(self.visit_stmt(body));
            }
            StmtKind::Assign { .. }
            | StmtKind::Call(_)
            | StmtKind::Return(_)
            | StmtKind::Break
            | StmtKind::Continue => {}
        }
        outcome
    }

    /// Insert a symbol, converting a same-scope collision into a
    /// duplicate-declaration diagnostic. The earlier symbol stays.
    fn insert_or_report(&mut self, target: ScopeId, symbol: Symbol) {
        if let Err(rejected) = self.scopes.insert(target, symbol) {
            self.diagnostics.push(ResolveError::DuplicateDeclaration {
                scope: self.scopes.describe(target),
                name: rejected.name,
                kind: rejected.kind,
                line: rejected.line,
            });
        }
    }

    /// Intern the type of a declaration. Named types resolve to the
    /// registered class of that name; a name no class declares still gets a
    /// stable nominal id here (whether such a type is *valid* is the type
    /// checker's concern, not table construction's).
    fn intern_type(&mut self, ty: &TypeExpr) -> TypeId {
        match ty {
            TypeExpr::Primitive(kind) => self.types.intern_primitive(*kind),
            TypeExpr::Named(name, _) => match self.types.class_id(name) {
                Some(id) => id,
                None => self.types.intern_class(name),
            },
        }
    }

    fn method_signature(&mut self, method: &MethodDecl) -> TypeId {
        let ret = self.intern_type(&method.return_type);
        let params = method
            .formals
            .iter()
            .map(|f| self.intern_type(&f.ty))
            .collect();
        self.types.intern_method(ret, params)
    }

    /// Detect inheritance cycles after linkage. Each class scope's parent
    /// chain is walked once; a chain that revisits a scope already on the
    /// current walk is a cycle. Every class on a cycle gets one diagnostic,
    /// its scope parent is reset to the global scope, and its type-table
    /// superclass edge is cleared, so both the scope chain and
    /// [`TypeTable::superclass_of`] chains terminate.
    fn check_inheritance_cycles(
        &mut self,
        program: &Program,
        class_ids: &[TypeId],
        class_scopes: &[ScopeId],
        global: ScopeId,
    ) {
        let mut settled: FxHashSet<ScopeId> = FxHashSet::default();
        let mut cyclic: Vec<ScopeId> = Vec::new();

        for &start in class_scopes {
            let mut path = Vec::new();
            let mut current = start;
            loop {
                if current == global || settled.contains(&current) {
                    break;
                }
                if let Some(pos) = path.iter().position(|&s| s == current) {
                    // Everything from the first revisit onward is on the
                    // cycle; earlier path entries merely lead into it.
                    for &member in &path[pos..] {
                        if !cyclic.contains(&member) {
                            cyclic.push(member);
                        }
                    }
                    break;
                }
                path.push(current);
                current = match self.scopes.get(current).parent() {
                    Some(parent) => parent,
                    None => break,
                };
            }
            for visited in path {
                settled.insert(visited);
            }
        }

        for (idx, class) in program.classes.iter().enumerate() {
            let scope = class_scopes[idx];
            if cyclic.contains(&scope) {
                self.diagnostics.push(ResolveError::InheritanceCycle {
                    class: class.name.clone(),
                    line: class.line,
                });
                self.scopes.set_parent(scope, global);
                self.types.clear_superclass(class_ids[idx]);
            }
        }
    }
}
