//! Lowering of ESTree JSON (esprima/acorn output) into the arena.
//!
//! The lowering is bottom-up and fail-fast: children are lowered before
//! their parent node is allocated (which installs parent links), and any
//! `type` tag outside the supported surface, or a missing required field,
//! aborts with a `LowerError` carrying the JSON path of the offending node.

use serde_json::{Map, Value};
use tracing::debug;

use crate::node::{NodeArena, NodeIndex, NodeKind, NodeList, node_flags};

/// Error produced while lowering an ESTree document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
    /// A `type` tag outside the supported ESTree surface, or a supported
    /// construct with an unsupported shape (e.g. a destructuring pattern
    /// where a plain identifier is required).
    UnsupportedSyntax { kind: String, path: String },
    /// A required field is absent or null.
    MissingField {
        field: &'static str,
        kind: String,
        path: String,
    },
    /// The JSON does not have the shape of an ESTree document at all.
    Malformed { message: String, path: String },
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerError::UnsupportedSyntax { kind, path } => {
                write!(f, "unsupported syntax `{kind}` at {path}")
            }
            LowerError::MissingField { field, kind, path } => {
                write!(f, "missing field `{field}` on `{kind}` at {path}")
            }
            LowerError::Malformed { message, path } => {
                write!(f, "malformed AST at {path}: {message}")
            }
        }
    }
}

impl std::error::Error for LowerError {}

/// Lower an ESTree `Program` document into `arena`, returning the root.
pub fn lower_program(value: &Value, arena: &mut NodeArena) -> Result<NodeIndex, LowerError> {
    let mut lowerer = Lowerer {
        arena,
        path: String::from("$"),
    };
    let root = lowerer.lower(value)?;
    match lowerer.arena.get(root).map(|node| node.kind) {
        Some(NodeKind::Program) => {
            debug!(nodes = lowerer.arena.len(), "lowered ESTree document");
            Ok(root)
        }
        other => Err(LowerError::Malformed {
            message: format!("root node is {other:?}, expected Program"),
            path: String::from("$"),
        }),
    }
}

struct Lowerer<'a> {
    arena: &'a mut NodeArena,
    path: String,
}

/// Non-null field access; ESTree encodes absent children as `null`.
fn field<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    match obj.get(name) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

/// `range: [pos, end]` byte offsets; zero when the parser omitted ranges.
fn span_of(obj: &Map<String, Value>) -> (u32, u32) {
    if let Some(range) = obj.get("range").and_then(Value::as_array)
        && let (Some(pos), Some(end)) = (
            range.first().and_then(Value::as_u64),
            range.get(1).and_then(Value::as_u64),
        )
    {
        return (pos as u32, end as u32);
    }
    (0, 0)
}

/// `loc.start` line/column; zero when the parser omitted locations.
fn loc_of(obj: &Map<String, Value>) -> (u32, u32) {
    if let Some(start) = obj
        .get("loc")
        .and_then(Value::as_object)
        .and_then(|loc| loc.get("start"))
        .and_then(Value::as_object)
    {
        let line = start.get("line").and_then(Value::as_u64).unwrap_or(0);
        let column = start.get("column").and_then(Value::as_u64).unwrap_or(0);
        return (line as u32, column as u32);
    }
    (0, 0)
}

fn type_of(value: &Value) -> Option<&str> {
    value.as_object()?.get("type")?.as_str()
}

impl Lowerer<'_> {
    fn lower(&mut self, value: &Value) -> Result<NodeIndex, LowerError> {
        let Some(obj) = value.as_object() else {
            return Err(self.malformed("node is not a JSON object"));
        };
        let Some(kind) = obj.get("type").and_then(Value::as_str) else {
            return Err(self.malformed("node has no `type` tag"));
        };
        let (pos, end) = span_of(obj);
        let idx = match kind {
            "Program" => {
                let body = self.lower_list(obj, kind, "body", false)?;
                self.arena.add_program(body, pos, end)
            }
            "Identifier" => {
                let Some(name) = obj.get("name").and_then(Value::as_str) else {
                    return Err(self.missing("name", kind));
                };
                self.arena.add_identifier(name, pos, end)
            }
            "Literal" => {
                let raw = match obj.get("raw").and_then(Value::as_str) {
                    Some(raw) => raw.to_string(),
                    None => obj.get("value").cloned().unwrap_or(Value::Null).to_string(),
                };
                self.arena.add_literal(raw, pos, end)
            }
            "FunctionDeclaration" | "FunctionExpression" => {
                let node_kind = if kind == "FunctionDeclaration" {
                    NodeKind::FunctionDeclaration
                } else {
                    NodeKind::FunctionExpression
                };
                // Names and parameters must be plain identifiers; patterns
                // are outside the supported surface.
                if let Some(id) = field(obj, "id") {
                    let id_type = type_of(id).unwrap_or("?");
                    if id_type != "Identifier" {
                        return Err(self.unsupported(id_type));
                    }
                }
                if let Some(params) = obj.get("params").and_then(Value::as_array) {
                    for param in params {
                        let param_type = type_of(param).unwrap_or("?");
                        if param_type != "Identifier" {
                            return Err(self.unsupported(param_type));
                        }
                    }
                }
                let name = self.lower_opt(obj, "id")?;
                let params = self.lower_list(obj, kind, "params", false)?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena.add_function(node_kind, name, params, body, pos, end)
            }
            "VariableDeclaration" => {
                let flags = match obj.get("kind").and_then(Value::as_str) {
                    Some("var") | None => 0,
                    Some("let") => node_flags::LET,
                    Some("const") => node_flags::CONST,
                    Some(other) => {
                        return Err(self.malformed(&format!("unknown declaration kind `{other}`")));
                    }
                };
                let declarations = self.lower_list(obj, kind, "declarations", false)?;
                self.arena
                    .add_variable_declaration(flags, declarations, pos, end)
            }
            "VariableDeclarator" => {
                if let Some(id) = field(obj, "id") {
                    let id_type = type_of(id).unwrap_or("?");
                    if id_type != "Identifier" {
                        return Err(self.unsupported(id_type));
                    }
                }
                let name = self.lower_req(obj, kind, "id")?;
                let initializer = self.lower_opt(obj, "init")?;
                self.arena.add_variable_declarator(name, initializer, pos, end)
            }
            "BlockStatement" => {
                let body = self.lower_list(obj, kind, "body", false)?;
                self.arena.add_block(body, pos, end)
            }
            "ExpressionStatement" => {
                let expression = self.lower_req(obj, kind, "expression")?;
                self.arena
                    .add_expr_statement(NodeKind::ExpressionStatement, expression, pos, end)
            }
            "ReturnStatement" => {
                let argument = self.lower_opt(obj, "argument")?;
                self.arena
                    .add_expr_statement(NodeKind::ReturnStatement, argument, pos, end)
            }
            "ThrowStatement" => {
                let argument = self.lower_req(obj, kind, "argument")?;
                self.arena
                    .add_expr_statement(NodeKind::ThrowStatement, argument, pos, end)
            }
            "IfStatement" => {
                let test = self.lower_req(obj, kind, "test")?;
                let consequent = self.lower_req(obj, kind, "consequent")?;
                let alternate = self.lower_opt(obj, "alternate")?;
                self.arena
                    .add_if(NodeKind::IfStatement, test, consequent, alternate, pos, end)
            }
            "ConditionalExpression" => {
                let test = self.lower_req(obj, kind, "test")?;
                let consequent = self.lower_req(obj, kind, "consequent")?;
                let alternate = self.lower_req(obj, kind, "alternate")?;
                self.arena.add_if(
                    NodeKind::ConditionalExpression,
                    test,
                    consequent,
                    alternate,
                    pos,
                    end,
                )
            }
            "ForStatement" => {
                let init = self.lower_opt(obj, "init")?;
                let test = self.lower_opt(obj, "test")?;
                let update = self.lower_opt(obj, "update")?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena.add_for(init, test, update, body, pos, end)
            }
            "ForInStatement" => {
                let left = self.lower_req(obj, kind, "left")?;
                let right = self.lower_req(obj, kind, "right")?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena.add_for_in(left, right, body, pos, end)
            }
            "WhileStatement" => {
                let test = self.lower_req(obj, kind, "test")?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena
                    .add_while(NodeKind::WhileStatement, test, body, pos, end)
            }
            "DoWhileStatement" => {
                let body = self.lower_req(obj, kind, "body")?;
                let test = self.lower_req(obj, kind, "test")?;
                self.arena
                    .add_while(NodeKind::DoWhileStatement, test, body, pos, end)
            }
            "LabeledStatement" => {
                let label = self.lower_req(obj, kind, "label")?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena.add_labeled(label, body, pos, end)
            }
            "BreakStatement" | "ContinueStatement" => {
                let node_kind = if kind == "BreakStatement" {
                    NodeKind::BreakStatement
                } else {
                    NodeKind::ContinueStatement
                };
                let label = self.lower_opt(obj, "label")?;
                self.arena.add_jump(node_kind, label, pos, end)
            }
            "TryStatement" => {
                let block = self.lower_req(obj, kind, "block")?;
                // Modern ESTree has a single `handler`; old esprima emitted a
                // `handlers` array.
                let handler = if field(obj, "handler").is_some() {
                    self.lower_req(obj, kind, "handler")?
                } else if let Some(first) = obj
                    .get("handlers")
                    .and_then(Value::as_array)
                    .and_then(|handlers| handlers.first())
                {
                    self.in_segment(".handlers[0]", |lowerer| lowerer.lower(first))?
                } else {
                    NodeIndex::NONE
                };
                let finalizer = self.lower_opt(obj, "finalizer")?;
                self.arena.add_try(block, handler, finalizer, pos, end)
            }
            "CatchClause" => {
                if let Some(param) = field(obj, "param") {
                    let param_type = type_of(param).unwrap_or("?");
                    if param_type != "Identifier" {
                        return Err(self.unsupported(param_type));
                    }
                }
                let param = self.lower_req(obj, kind, "param")?;
                let body = self.lower_req(obj, kind, "body")?;
                self.arena.add_catch(param, body, pos, end)
            }
            "SwitchStatement" => {
                let discriminant = self.lower_req(obj, kind, "discriminant")?;
                let cases = self.lower_list(obj, kind, "cases", false)?;
                self.arena.add_switch(discriminant, cases, pos, end)
            }
            "SwitchCase" => {
                let test = self.lower_opt(obj, "test")?;
                let statements = self.lower_list(obj, kind, "consequent", false)?;
                self.arena.add_case(test, statements, pos, end)
            }
            "CallExpression" | "NewExpression" => {
                let node_kind = if kind == "CallExpression" {
                    NodeKind::CallExpression
                } else {
                    NodeKind::NewExpression
                };
                let callee = self.lower_req(obj, kind, "callee")?;
                let arguments = if obj.get("arguments").is_some() {
                    self.lower_list(obj, kind, "arguments", false)?
                } else {
                    NodeList::default()
                };
                self.arena.add_call(node_kind, callee, arguments, pos, end)
            }
            "MemberExpression" => {
                let object = self.lower_req(obj, kind, "object")?;
                let property = self.lower_req(obj, kind, "property")?;
                let computed = obj
                    .get("computed")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                self.arena.add_member(object, property, computed, pos, end)
            }
            "ObjectExpression" => {
                let properties = self.lower_list(obj, kind, "properties", false)?;
                self.arena
                    .add_expr_list(NodeKind::ObjectExpression, properties, pos, end)
            }
            "Property" => {
                let shorthand = obj
                    .get("shorthand")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let computed = obj
                    .get("computed")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let key = self.lower_req(obj, kind, "key")?;
                // Shorthand `{x}` is one identifier serving as both key and
                // value; keep a single node for both slots.
                let value = if shorthand {
                    key
                } else {
                    self.lower_req(obj, kind, "value")?
                };
                self.arena
                    .add_property(key, value, shorthand, computed, pos, end)
            }
            "ArrayExpression" => {
                let elements = self.lower_list(obj, kind, "elements", true)?;
                self.arena
                    .add_expr_list(NodeKind::ArrayExpression, elements, pos, end)
            }
            "SequenceExpression" => {
                let expressions = self.lower_list(obj, kind, "expressions", false)?;
                self.arena
                    .add_expr_list(NodeKind::SequenceExpression, expressions, pos, end)
            }
            "BinaryExpression" | "LogicalExpression" | "AssignmentExpression" => {
                let node_kind = match kind {
                    "BinaryExpression" => NodeKind::BinaryExpression,
                    "LogicalExpression" => NodeKind::LogicalExpression,
                    _ => NodeKind::AssignmentExpression,
                };
                let Some(operator) = obj.get("operator").and_then(Value::as_str) else {
                    return Err(self.missing("operator", kind));
                };
                let operator = self.arena.intern(operator);
                let left = self.lower_req(obj, kind, "left")?;
                let right = self.lower_req(obj, kind, "right")?;
                self.arena.add_binary(node_kind, operator, left, right, pos, end)
            }
            "UnaryExpression" | "UpdateExpression" => {
                let node_kind = if kind == "UnaryExpression" {
                    NodeKind::UnaryExpression
                } else {
                    NodeKind::UpdateExpression
                };
                let Some(operator) = obj.get("operator").and_then(Value::as_str) else {
                    return Err(self.missing("operator", kind));
                };
                let operator = self.arena.intern(operator);
                let prefix = obj.get("prefix").and_then(Value::as_bool).unwrap_or(true);
                let operand = self.lower_req(obj, kind, "argument")?;
                self.arena
                    .add_unary(node_kind, operator, operand, prefix, pos, end)
            }
            "ThisExpression" => self.arena.add_plain(NodeKind::ThisExpression, pos, end),
            "EmptyStatement" => self.arena.add_plain(NodeKind::EmptyStatement, pos, end),
            "DebuggerStatement" => self.arena.add_plain(NodeKind::DebuggerStatement, pos, end),
            other => return Err(self.unsupported(other)),
        };
        let (line, column) = loc_of(obj);
        self.arena.set_position(idx, line, column);
        Ok(idx)
    }

    /// Lower a required child field.
    fn lower_req(
        &mut self,
        obj: &Map<String, Value>,
        kind: &str,
        name: &'static str,
    ) -> Result<NodeIndex, LowerError> {
        match field(obj, name) {
            Some(value) => {
                let segment = format!(".{name}");
                self.in_segment(&segment, |lowerer| lowerer.lower(value))
            }
            None => Err(self.missing(name, kind)),
        }
    }

    /// Lower an optional child field; absent or null becomes NONE.
    fn lower_opt(
        &mut self,
        obj: &Map<String, Value>,
        name: &'static str,
    ) -> Result<NodeIndex, LowerError> {
        match field(obj, name) {
            Some(value) => {
                let segment = format!(".{name}");
                self.in_segment(&segment, |lowerer| lowerer.lower(value))
            }
            None => Ok(NodeIndex::NONE),
        }
    }

    /// Lower an array field. With `keep_holes`, null elements become NONE
    /// entries (array elisions); otherwise null elements are rejected.
    fn lower_list(
        &mut self,
        obj: &Map<String, Value>,
        kind: &str,
        name: &'static str,
        keep_holes: bool,
    ) -> Result<NodeList, LowerError> {
        let Some(values) = obj.get(name).and_then(Value::as_array) else {
            return Err(self.missing(name, kind));
        };
        let mut nodes = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            if value.is_null() {
                if keep_holes {
                    nodes.push(NodeIndex::NONE);
                    continue;
                }
                return Err(self.malformed(&format!("null entry in `{name}[{i}]`")));
            }
            let segment = format!(".{name}[{i}]");
            let idx = self.in_segment(&segment, |lowerer| lowerer.lower(value))?;
            nodes.push(idx);
        }
        Ok(NodeList::new(nodes))
    }

    fn in_segment<T>(
        &mut self,
        segment: &str,
        f: impl FnOnce(&mut Self) -> Result<T, LowerError>,
    ) -> Result<T, LowerError> {
        let saved = self.path.len();
        self.path.push_str(segment);
        let result = f(self);
        self.path.truncate(saved);
        result
    }

    fn unsupported(&self, kind: &str) -> LowerError {
        LowerError::UnsupportedSyntax {
            kind: kind.to_string(),
            path: self.path.clone(),
        }
    }

    fn missing(&self, field: &'static str, kind: &str) -> LowerError {
        LowerError::MissingField {
            field,
            kind: kind.to_string(),
            path: self.path.clone(),
        }
    }

    fn malformed(&self, message: &str) -> LowerError {
        LowerError::Malformed {
            message: message.to_string(),
            path: self.path.clone(),
        }
    }
}
