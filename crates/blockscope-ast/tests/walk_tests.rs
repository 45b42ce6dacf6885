//! Tests for pre-order traversal over the arena.

use blockscope_ast::{
    NodeArena, NodeIndex, NodeKind, NodeList, for_each_child, preorder, try_preorder,
};

/// `var x = 1; use(x);` built directly through the arena API.
fn sample_program(arena: &mut NodeArena) -> NodeIndex {
    let x = arena.add_identifier("x", 4, 5);
    let one = arena.add_literal("1".to_string(), 8, 9);
    let declarator = arena.add_variable_declarator(x, one, 4, 9);
    let decl = arena.add_variable_declaration(0, NodeList::new(vec![declarator]), 0, 10);

    let callee = arena.add_identifier("use", 11, 14);
    let arg = arena.add_identifier("x", 15, 16);
    let call = arena.add_call(NodeKind::CallExpression, callee, NodeList::new(vec![arg]), 11, 17);
    let stmt = arena.add_expr_statement(NodeKind::ExpressionStatement, call, 11, 18);

    arena.add_program(NodeList::new(vec![decl, stmt]), 0, 18)
}

#[test]
fn preorder_visits_parents_first_in_source_order() {
    let mut arena = NodeArena::new();
    let root = sample_program(&mut arena);

    let mut kinds = Vec::new();
    preorder(&arena, root, &mut |_idx, node| kinds.push(node.kind));

    assert_eq!(
        kinds,
        vec![
            NodeKind::Program,
            NodeKind::VariableDeclaration,
            NodeKind::VariableDeclarator,
            NodeKind::Identifier, // x (declarator name)
            NodeKind::Literal,
            NodeKind::ExpressionStatement,
            NodeKind::CallExpression,
            NodeKind::Identifier, // use
            NodeKind::Identifier, // x (argument)
        ]
    );
}

#[test]
fn preorder_visits_every_node_exactly_once() {
    let mut arena = NodeArena::new();
    let root = sample_program(&mut arena);

    let mut seen = vec![0u32; arena.len()];
    preorder(&arena, root, &mut |idx, _node| seen[idx.0 as usize] += 1);
    assert!(seen.iter().all(|&count| count == 1));
}

#[test]
fn for_each_child_skips_absent_children() {
    let mut arena = NodeArena::new();
    // `return;` has no argument.
    let ret = arena.add_expr_statement(NodeKind::ReturnStatement, NodeIndex::NONE, 0, 7);

    let mut children = Vec::new();
    for_each_child(&arena, ret, &mut |child| children.push(child));
    assert!(children.is_empty());
}

#[test]
fn try_preorder_stops_at_first_error() {
    let mut arena = NodeArena::new();
    let root = sample_program(&mut arena);

    let mut visited = 0;
    let result = try_preorder(&arena, root, &mut |_idx, node| {
        visited += 1;
        if node.kind == NodeKind::VariableDeclarator {
            Err("stop")
        } else {
            Ok(())
        }
    });
    assert_eq!(result, Err("stop"));
    assert_eq!(visited, 3); // Program, VariableDeclaration, VariableDeclarator
}

#[test]
fn parents_chain_up_to_the_root() {
    let mut arena = NodeArena::new();
    let root = sample_program(&mut arena);

    let mut checked = 0;
    preorder(&arena, root, &mut |idx, _node| {
        if idx != root {
            let mut current = idx;
            while arena.parent_of(current).is_some() {
                current = arena.parent_of(current);
            }
            assert_eq!(current, root);
            checked += 1;
        }
    });
    assert_eq!(checked as usize, arena.len() - 1);
}
