use opal_resolve::{build_symbol_tables, ResolveError, SymbolKind};
use opal_syntax::{
    ClassDecl, FieldDecl, FormalParam, MethodDecl, MethodKind, PrimitiveKind, Program, Stmt,
    StmtKind, TypeExpr,
};

fn int() -> TypeExpr {
    TypeExpr::Primitive(PrimitiveKind::Int)
}

fn local(name: &str, line: u32) -> Stmt {
    Stmt::new(
        StmtKind::LocalDecl { name: name.to_string(), ty: int(), init: None },
        line,
    )
}

fn block(stmts: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::new(StmtKind::Block(stmts), line)
}

fn method(name: &str, formals: Vec<FormalParam>, body: Vec<Stmt>, line: u32) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        kind: MethodKind::Virtual,
        return_type: TypeExpr::Primitive(PrimitiveKind::Void),
        formals,
        body,
        line,
    }
}

fn formal(name: &str, line: u32) -> FormalParam {
    FormalParam { name: name.to_string(), ty: int(), line }
}

fn class(name: &str, superclass: Option<&str>, fields: Vec<FieldDecl>, methods: Vec<MethodDecl>, line: u32) -> ClassDecl {
    ClassDecl {
        name: name.to_string(),
        superclass: superclass.map(str::to_string),
        fields,
        methods,
        line,
    }
}

#[test]
fn duplicate_field_is_reported_and_first_kept() {
    let program = Program::new(
        "Main",
        vec![class(
            "C",
            None,
            vec![
                FieldDecl { name: "x".to_string(), ty: int(), line: 2 },
                FieldDecl {
                    name: "x".to_string(),
                    ty: TypeExpr::Primitive(PrimitiveKind::Bool),
                    line: 3,
                },
            ],
            vec![],
            1,
        )],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(resolution.diagnostics.len(), 1);
    match &resolution.diagnostics[0] {
        ResolveError::DuplicateDeclaration { name, kind, scope, line } => {
            assert_eq!(name, "x");
            assert_eq!(*kind, SymbolKind::Field);
            assert_eq!(scope, "class C");
            assert_eq!(*line, 3);
        }
        other => panic!("expected duplicate declaration, got {other:?}"),
    }

    // The earlier declaration survives with its own type.
    let class_scope = resolution.scopes.get(resolution.global).children()[0];
    let x = resolution.scopes.get(class_scope).local("x").unwrap();
    assert_eq!(resolution.types.describe(x.ty), "int");
}

#[test]
fn parameter_reused_as_local_in_method_scope_collides() {
    // Top-level locals live in the method scope itself, so a local reusing
    // a parameter name is a same-scope conflict.
    let program = Program::new(
        "Main",
        vec![class(
            "C",
            None,
            vec![],
            vec![method("run", vec![formal("x", 2)], vec![local("x", 3)], 2)],
            1,
        )],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(resolution.diagnostics.len(), 1);
    match &resolution.diagnostics[0] {
        ResolveError::DuplicateDeclaration { name, kind, line, .. } => {
            assert_eq!(name, "x");
            assert_eq!(*kind, SymbolKind::LocalVariable);
            assert_eq!(*line, 3);
        }
        other => panic!("expected duplicate declaration, got {other:?}"),
    }
}

#[test]
fn shadowing_enclosing_scope_is_allowed() {
    // The same reuse inside a nested block shadows instead of colliding.
    let program = Program::new(
        "Main",
        vec![class(
            "C",
            None,
            vec![],
            vec![method(
                "run",
                vec![formal("x", 2)],
                vec![block(vec![local("x", 4)], 3)],
                2,
            )],
            1,
        )],
    );

    let resolution = build_symbol_tables(&program);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn duplicate_locals_in_same_block_are_rejected() {
    let program = Program::new(
        "Main",
        vec![class(
            "C",
            None,
            vec![],
            vec![method(
                "run",
                vec![],
                vec![block(vec![local("a", 3), local("a", 4)], 2)],
                2,
            )],
            1,
        )],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].line(), 4);
    assert_eq!(
        resolution.diagnostics[0].to_string(),
        "line 4: duplicate declaration of local variable `a` in a statement block"
    );
}

#[test]
fn unresolved_superclass_falls_back_to_global() {
    let program = Program::new(
        "Main",
        vec![class("C", Some("Ghost"), vec![], vec![], 3)],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveError::UnresolvedSuperclass {
            class: "C".to_string(),
            superclass: "Ghost".to_string(),
            line: 3,
        }]
    );

    let class_scope = resolution.scopes.get(resolution.global).children()[0];
    assert_eq!(resolution.scopes.get(class_scope).parent(), Some(resolution.global));
    // No inheritance edge was recorded.
    let c = resolution.types.class_id("C").unwrap();
    assert_eq!(resolution.types.superclass_of(c), None);
}

#[test]
fn stray_type_reference_does_not_register_a_superclass() {
    // `Ghost` appears as a field type somewhere, which interns a nominal id
    // for it, but no class declaration registers it, so extending it is
    // still an unresolved superclass.
    let program = Program::new(
        "Main",
        vec![
            class(
                "Holder",
                None,
                vec![FieldDecl { name: "g".to_string(), ty: TypeExpr::named("Ghost", 2), line: 2 }],
                vec![],
                1,
            ),
            class("C", Some("Ghost"), vec![], vec![], 4),
        ],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveError::UnresolvedSuperclass {
            class: "C".to_string(),
            superclass: "Ghost".to_string(),
            line: 4,
        }]
    );
    let c_scope = resolution.scopes.get(resolution.global).children()[1];
    assert_eq!(resolution.scopes.get(c_scope).parent(), Some(resolution.global));
}

#[test]
fn duplicate_class_name_reported_once_with_distinct_scopes() {
    let program = Program::new(
        "Main",
        vec![
            class("Foo", None, vec![FieldDecl { name: "a".to_string(), ty: int(), line: 2 }], vec![], 1),
            class("Foo", None, vec![FieldDecl { name: "b".to_string(), ty: int(), line: 5 }], vec![], 4),
        ],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(resolution.diagnostics.len(), 1);
    match &resolution.diagnostics[0] {
        ResolveError::DuplicateDeclaration { name, kind, scope, line } => {
            assert_eq!(name, "Foo");
            assert_eq!(*kind, SymbolKind::Class);
            assert_eq!(scope, "the global scope");
            assert_eq!(*line, 4);
        }
        other => panic!("expected duplicate declaration, got {other:?}"),
    }

    // Sibling independence: both class scopes were still built.
    let global = resolution.scopes.get(resolution.global);
    assert_eq!(global.symbols().len(), 1);
    assert_eq!(global.children().len(), 2);
    assert!(resolution.scopes.get(global.children()[0]).local("a").is_some());
    assert!(resolution.scopes.get(global.children()[1]).local("b").is_some());
}

#[test]
fn errors_in_one_class_leave_siblings_untouched() {
    let program = Program::new(
        "Main",
        vec![
            class("Broken", Some("Ghost"), vec![], vec![], 1),
            class("Fine", None, vec![FieldDecl { name: "ok".to_string(), ty: int(), line: 4 }], vec![], 3),
        ],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(resolution.diagnostics.len(), 1);

    let fine_scope = resolution.scopes.get(resolution.global).children()[1];
    assert!(resolution.scopes.get(fine_scope).local("ok").is_some());
    assert_eq!(resolution.scopes.get(fine_scope).parent(), Some(resolution.global));
}

#[test]
fn inheritance_cycle_reported_per_class_and_broken() {
    let program = Program::new(
        "Main",
        vec![
            class("A", Some("B"), vec![], vec![], 1),
            class("B", Some("A"), vec![], vec![], 2),
        ],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(
        resolution.diagnostics,
        vec![
            ResolveError::InheritanceCycle { class: "A".to_string(), line: 1 },
            ResolveError::InheritanceCycle { class: "B".to_string(), line: 2 },
        ]
    );

    // Both parents fall back to the global scope, keeping every parent
    // chain finite.
    for &scope in resolution.scopes.get(resolution.global).children() {
        assert_eq!(resolution.scopes.get(scope).parent(), Some(resolution.global));
    }

    // The type table agrees: no inheritance edge survives for either
    // class, so a superclass walk terminates too.
    let a = resolution.types.class_id("A").unwrap();
    let b = resolution.types.class_id("B").unwrap();
    assert_eq!(resolution.types.superclass_of(a), None);
    assert_eq!(resolution.types.superclass_of(b), None);
}

#[test]
fn self_inheritance_is_a_cycle() {
    let program = Program::new(
        "Main",
        vec![class("A", Some("A"), vec![], vec![], 1)],
    );

    let resolution = build_symbol_tables(&program);
    assert_eq!(
        resolution.diagnostics,
        vec![ResolveError::InheritanceCycle { class: "A".to_string(), line: 1 }]
    );
    let scope = resolution.scopes.get(resolution.global).children()[0];
    assert_eq!(resolution.scopes.get(scope).parent(), Some(resolution.global));
    let a = resolution.types.class_id("A").unwrap();
    assert_eq!(resolution.types.superclass_of(a), None);
}

#[test]
fn class_below_a_cycle_is_not_blamed() {
    let program = Program::new(
        "Main",
        vec![
            class("A", Some("B"), vec![], vec![], 1),
            class("B", Some("A"), vec![], vec![], 2),
            class("C", Some("A"), vec![], vec![], 3),
        ],
    );

    let resolution = build_symbol_tables(&program);
    // Only the two classes on the cycle are reported; C merely inherits
    // from one of them and stays linked to A's scope.
    assert_eq!(resolution.diagnostics.len(), 2);
    assert!(resolution
        .diagnostics
        .iter()
        .all(|d| matches!(d, ResolveError::InheritanceCycle { class, .. } if class != "C")));

    let children = resolution.scopes.get(resolution.global).children().to_vec();
    let a_scope = children[0];
    let c_scope = children[2];
    assert_eq!(resolution.scopes.get(c_scope).parent(), Some(a_scope));

    // C keeps its inheritance edge; only the cycle members lose theirs.
    let a = resolution.types.class_id("A").unwrap();
    let c = resolution.types.class_id("C").unwrap();
    assert_eq!(resolution.types.superclass_of(c), Some(a));
    assert_eq!(resolution.types.superclass_of(a), None);
}
