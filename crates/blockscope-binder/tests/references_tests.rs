//! Tests for reference classification and chained lookup.

mod common;

use blockscope_ast::NodeKind;
use blockscope_binder::{DeclKind, Resolution, build_scopes, resolve_references};
use common::*;

#[test]
fn shadowing_resolves_to_the_inner_binding() {
    // let x = 1; { let x = 2; log(x); }
    let analysis = analyze(program(vec![
        var_decl("let", "x", Some(lit("1"))),
        block(vec![
            var_decl("let", "x", Some(lit("2"))),
            expr_stmt(call(ident("log"), vec![ident("x")])),
        ]),
    ]));

    let resolutions = analysis.resolutions_of("x");
    assert_eq!(resolutions.len(), 1, "only the call argument is a reference");
    let binding = analysis.binding_of(resolutions[0]);
    let block_id = analysis.scope_with_node_kind(NodeKind::BlockStatement);
    assert_eq!(binding.scope, block_id);
}

#[test]
fn innermost_binding_wins_across_three_levels() {
    // let n; { let n; { let n; use(n); } }
    let analysis = analyze(program(vec![
        var_decl("let", "n", None),
        block(vec![
            var_decl("let", "n", None),
            block(vec![
                var_decl("let", "n", None),
                expr_stmt(call(ident("use"), vec![ident("n")])),
            ]),
        ]),
    ]));

    let resolutions = analysis.resolutions_of("n");
    assert_eq!(resolutions.len(), 1);
    let binding = analysis.binding_of(resolutions[0]);
    // Scopes are created in pre-order, so blocks[1] is the inner one.
    let blocks = analysis.scopes_with_node_kind(NodeKind::BlockStatement);
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        analysis.scopes.get_scope(blocks[1]).unwrap().parent,
        Some(blocks[0])
    );
    assert_eq!(binding.scope, blocks[1]);
}

#[test]
fn function_self_name_is_not_a_reference_but_calls_resolve() {
    // function f() { f(); }
    let analysis = analyze(program(vec![func_decl(
        "f",
        vec![],
        vec![expr_stmt(call(ident("f"), vec![]))],
    )]));

    let resolutions = analysis.resolutions_of("f");
    assert_eq!(resolutions.len(), 1, "only the call site references f");
    let binding = analysis.binding_of(resolutions[0]);
    assert_eq!(binding.kind, DeclKind::Fun);
    assert_eq!(binding.scope, analysis.scopes.root());
}

#[test]
fn undeclared_names_resolve_to_unresolved() {
    // console.log(x);
    let analysis = analyze(program(vec![expr_stmt(call(
        member(ident("console"), ident("log"), false),
        vec![ident("x")],
    ))]));

    assert_eq!(
        analysis.resolutions_of("console"),
        vec![Resolution::Unresolved]
    );
    assert_eq!(analysis.resolutions_of("x"), vec![Resolution::Unresolved]);
    // The property side of console.log never enters resolution.
    assert!(analysis.resolutions_of("log").is_empty());
}

#[test]
fn member_property_is_never_a_reference() {
    // var obj; obj.prop;
    let analysis = analyze(program(vec![
        var_decl("var", "obj", None),
        expr_stmt(member(ident("obj"), ident("prop"), false)),
    ]));
    assert!(analysis.resolutions_of("prop").is_empty());
    let obj = analysis.resolutions_of("obj");
    assert_eq!(obj.len(), 1);
    assert_eq!(analysis.binding_of(obj[0]).kind, DeclKind::Var);
}

#[test]
fn computed_member_property_is_also_excluded() {
    // a[b]: the property side is excluded regardless of `computed`.
    let analysis = analyze(program(vec![
        var_decl("var", "a", None),
        var_decl("var", "b", None),
        expr_stmt(member(ident("a"), ident("b"), true)),
    ]));
    assert!(analysis.resolutions_of("b").is_empty());
}

#[test]
fn object_literal_keys_are_excluded_but_values_resolve() {
    // var v; ({k: v});
    let analysis = analyze(program(vec![
        var_decl("var", "v", None),
        expr_stmt(object(vec![property("k", ident("v"))])),
    ]));
    assert!(analysis.resolutions_of("k").is_empty());
    assert_eq!(analysis.resolutions_of("v").len(), 1);
}

#[test]
fn shorthand_property_name_is_excluded() {
    // var x; ({x});
    let analysis = analyze(program(vec![
        var_decl("var", "x", None),
        expr_stmt(object(vec![shorthand_property("x")])),
    ]));
    assert!(analysis.resolutions_of("x").is_empty());
}

#[test]
fn statement_labels_are_excluded_but_jump_labels_resolve_as_references() {
    // outer: { break outer; }
    let analysis = analyze(program(vec![labeled(
        "outer",
        block(vec![brk(Some("outer"))]),
    )]));
    // The label definition is excluded; the break operand is classified as
    // a reference and finds no binding (labels are not bindings).
    assert_eq!(
        analysis.resolutions_of("outer"),
        vec![Resolution::Unresolved]
    );
}

#[test]
fn catch_parameter_is_excluded_and_body_uses_are_unresolved() {
    // try {} catch (e) { log(e); }
    let analysis = analyze(program(vec![try_catch(
        "e",
        vec![expr_stmt(call(ident("log"), vec![ident("e")]))],
    )]));
    // The catch param itself is excluded; the use in the body is a
    // reference, and with catch params unscoped it resolves to nothing.
    assert_eq!(analysis.resolutions_of("e"), vec![Resolution::Unresolved]);
}

#[test]
fn parameters_resolve_from_the_function_body() {
    let analysis = analyze(program(vec![func_decl(
        "f",
        vec!["a"],
        vec![ret(Some(ident("a")))],
    )]));
    let resolutions = analysis.resolutions_of("a");
    assert_eq!(resolutions.len(), 1, "the param list identifier is excluded");
    let binding = analysis.binding_of(resolutions[0]);
    assert_eq!(binding.kind, DeclKind::Param);
}

#[test]
fn var_hoisting_resolves_uses_before_the_declaration() {
    // function f() { use(x); var x = 1; }
    let analysis = analyze(program(vec![func_decl(
        "f",
        vec![],
        vec![
            expr_stmt(call(ident("use"), vec![ident("x")])),
            var_decl("var", "x", Some(lit("1"))),
        ],
    )]));
    let resolutions = analysis.resolutions_of("x");
    assert_eq!(resolutions.len(), 1);
    let binding = analysis.binding_of(resolutions[0]);
    assert_eq!(binding.kind, DeclKind::Var);
    let func_id = analysis.scope_with_node_kind(NodeKind::FunctionDeclaration);
    assert_eq!(binding.scope, func_id);
}

#[test]
fn declarator_initializers_are_references() {
    // var x = y; x is a declaration, y is a reference.
    let analysis = analyze(program(vec![var_decl("var", "x", Some(ident("y")))]));
    assert!(analysis.resolutions_of("x").is_empty());
    assert_eq!(analysis.resolutions_of("y"), vec![Resolution::Unresolved]);
}

#[test]
fn both_passes_are_idempotent_over_the_same_tree() {
    let source = program(vec![
        var_decl("let", "x", Some(lit("1"))),
        func_decl(
            "f",
            vec!["a"],
            vec![
                block(vec![var_decl("let", "x", Some(lit("2")))]),
                ret(Some(ident("x"))),
            ],
        ),
        expr_stmt(call(ident("f"), vec![ident("x")])),
    ]);
    let analysis = analyze(source);

    let scopes_again = build_scopes(&analysis.arena, analysis.root).expect("rebuild failed");
    let resolutions_again =
        resolve_references(&analysis.arena, analysis.root, &scopes_again);

    assert_eq!(analysis.scopes.scope_count(), scopes_again.scope_count());
    assert_eq!(analysis.scopes.binding_count(), scopes_again.binding_count());

    let shape = |tree: &blockscope_binder::ScopeTree| {
        tree.scopes()
            .map(|(_, scope)| (scope.kind, scope.node, scope.parent))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&analysis.scopes), shape(&scopes_again));

    let outcomes = |resolutions: &blockscope_binder::Resolutions| {
        let mut entries: Vec<_> = resolutions.iter().collect();
        entries.sort_by_key(|(idx, _)| *idx);
        entries
    };
    assert_eq!(
        outcomes(&analysis.resolutions),
        outcomes(&resolutions_again)
    );
}
