//! Shared helpers: compact ESTree JSON builders and an analyze pipeline.

#![allow(dead_code)]

use blockscope_ast::{NodeArena, NodeIndex, NodeKind, lower_program};
use blockscope_binder::{
    BindError, Binding, Resolution, Resolutions, ScopeId, ScopeTree, build_scopes,
    resolve_references,
};
use blockscope_common::Atom;
use serde_json::{Value, json};

pub struct Analyzed {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub scopes: ScopeTree,
    pub resolutions: Resolutions,
}

/// Lower, build scopes, and resolve references; panics on any failure.
pub fn analyze(source: Value) -> Analyzed {
    let mut arena = NodeArena::new();
    let root = lower_program(&source, &mut arena).expect("lowering failed");
    let scopes = build_scopes(&arena, root).expect("scope build failed");
    let resolutions = resolve_references(&arena, root, &scopes);
    Analyzed {
        arena,
        root,
        scopes,
        resolutions,
    }
}

/// Lower and run only the builder pass, keeping its Result.
pub fn build(source: Value) -> (NodeArena, NodeIndex, Result<ScopeTree, BindError>) {
    let mut arena = NodeArena::new();
    let root = lower_program(&source, &mut arena).expect("lowering failed");
    let result = build_scopes(&arena, root);
    (arena, root, result)
}

impl Analyzed {
    pub fn atom(&self, name: &str) -> Atom {
        self.arena
            .interner()
            .get(name)
            .expect("name was never interned")
    }

    /// The single scope introduced by a node of the given kind.
    pub fn scope_with_node_kind(&self, kind: NodeKind) -> ScopeId {
        let mut found = self.scopes_with_node_kind(kind);
        assert_eq!(found.len(), 1, "expected exactly one {kind:?} scope");
        found.remove(0)
    }

    pub fn scopes_with_node_kind(&self, kind: NodeKind) -> Vec<ScopeId> {
        self.scopes
            .scopes()
            .filter(|(_, scope)| {
                self.arena.get(scope.node).map(|node| node.kind) == Some(kind)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Resolution outcomes for every reference named `name`, in node order.
    pub fn resolutions_of(&self, name: &str) -> Vec<Resolution> {
        let mut entries: Vec<(NodeIndex, Resolution)> = self
            .resolutions
            .iter()
            .filter(|(idx, _)| self.arena.identifier_text(*idx) == Some(name))
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);
        entries.into_iter().map(|(_, resolution)| resolution).collect()
    }

    /// The binding behind a resolution; panics on Unresolved.
    pub fn binding_of(&self, resolution: Resolution) -> &Binding {
        match resolution {
            Resolution::Binding(id) => self
                .scopes
                .get_binding(id)
                .expect("dangling binding id"),
            Resolution::Unresolved => panic!("expected a binding, got Unresolved"),
        }
    }
}

// ============================================================================
// ESTree JSON builders
// ============================================================================

pub fn program(body: Vec<Value>) -> Value {
    json!({"type": "Program", "body": body})
}

pub fn ident(name: &str) -> Value {
    json!({"type": "Identifier", "name": name})
}

pub fn lit(raw: &str) -> Value {
    json!({"type": "Literal", "raw": raw})
}

pub fn declarator(name: &str, init: Option<Value>) -> Value {
    json!({
        "type": "VariableDeclarator",
        "id": ident(name),
        "init": init.unwrap_or(Value::Null)
    })
}

pub fn var_decl(kind: &str, name: &str, init: Option<Value>) -> Value {
    json!({
        "type": "VariableDeclaration",
        "kind": kind,
        "declarations": [declarator(name, init)]
    })
}

pub fn block(body: Vec<Value>) -> Value {
    json!({"type": "BlockStatement", "body": body})
}

pub fn expr_stmt(expression: Value) -> Value {
    json!({"type": "ExpressionStatement", "expression": expression})
}

pub fn call(callee: Value, arguments: Vec<Value>) -> Value {
    json!({"type": "CallExpression", "callee": callee, "arguments": arguments})
}

pub fn func_decl(name: &str, params: Vec<&str>, body: Vec<Value>) -> Value {
    json!({
        "type": "FunctionDeclaration",
        "id": ident(name),
        "params": params.into_iter().map(ident).collect::<Vec<_>>(),
        "body": block(body)
    })
}

pub fn func_expr(name: Option<&str>, params: Vec<&str>, body: Vec<Value>) -> Value {
    json!({
        "type": "FunctionExpression",
        "id": name.map(ident).unwrap_or(Value::Null),
        "params": params.into_iter().map(ident).collect::<Vec<_>>(),
        "body": block(body)
    })
}

pub fn if_stmt(test: Value, consequent: Value) -> Value {
    json!({"type": "IfStatement", "test": test, "consequent": consequent, "alternate": null})
}

pub fn ret(argument: Option<Value>) -> Value {
    json!({"type": "ReturnStatement", "argument": argument.unwrap_or(Value::Null)})
}

pub fn member(object: Value, property: Value, computed: bool) -> Value {
    json!({
        "type": "MemberExpression",
        "object": object,
        "property": property,
        "computed": computed
    })
}

pub fn for_stmt(init: Value, body: Value) -> Value {
    json!({
        "type": "ForStatement",
        "init": init,
        "test": null,
        "update": null,
        "body": body
    })
}

pub fn for_in(left: Value, right: Value, body: Value) -> Value {
    json!({"type": "ForInStatement", "left": left, "right": right, "body": body})
}

pub fn labeled(label: &str, body: Value) -> Value {
    json!({"type": "LabeledStatement", "label": ident(label), "body": body})
}

pub fn brk(label: Option<&str>) -> Value {
    json!({"type": "BreakStatement", "label": label.map(ident).unwrap_or(Value::Null)})
}

pub fn try_catch(param: &str, catch_body: Vec<Value>) -> Value {
    json!({
        "type": "TryStatement",
        "block": block(vec![]),
        "handler": {
            "type": "CatchClause",
            "param": ident(param),
            "body": block(catch_body)
        },
        "finalizer": null
    })
}

pub fn object(properties: Vec<Value>) -> Value {
    json!({"type": "ObjectExpression", "properties": properties})
}

pub fn property(key: &str, value: Value) -> Value {
    json!({
        "type": "Property",
        "key": ident(key),
        "value": value,
        "shorthand": false,
        "computed": false,
        "kind": "init"
    })
}

pub fn shorthand_property(name: &str) -> Value {
    json!({
        "type": "Property",
        "key": ident(name),
        "value": ident(name),
        "shorthand": true,
        "computed": false,
        "kind": "init"
    })
}
