//! NodeArena creation (`add_*`) and access (`get_*`) methods.
//!
//! Creation is bottom-up: children are always allocated before their parent,
//! and each `add_*` method installs the parent back-reference on its children.
//! By the time a root exists, every node below it is parent-linked.

use blockscope_common::Position;
use blockscope_common::interner::{Atom, Interner};

use super::node::*;

impl NodeArena {
    pub fn new() -> NodeArena {
        let mut arena = NodeArena::default();
        arena.interner.intern_common();
        arena
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a reference to the interner.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern a string through the arena's interner.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    // ============================================================================
    // Parent Mapping Helpers
    // ============================================================================

    /// Set the parent for a single child node.
    /// Called during node creation to maintain parent pointers.
    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if !child.is_none() {
            // Child indices are always valid here: we build bottom-up, so
            // children are created before parents.
            if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
                info.parent = parent;
            }
        }
    }

    /// Set the parent for a list of children.
    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    /// Record the line/column of a node's start (from ESTree `loc`).
    pub fn set_position(&mut self, idx: NodeIndex, line: u32, column: u32) {
        if let Some(info) = self.extended_info.get_mut(idx.0 as usize) {
            info.line = line;
            info.column = column;
        }
    }

    fn push_node(&mut self, kind: NodeKind, flags: u16, pos: u32, end: u32, data_index: u32) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            flags,
            pos,
            end,
            data_index,
        });
        self.extended_info.push(ExtendedNodeInfo::default());
        idx
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    pub fn add_identifier(&mut self, name: &str, pos: u32, end: u32) -> NodeIndex {
        let atom = self.interner.intern(name);
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(IdentifierData { atom });
        self.push_node(NodeKind::Identifier, 0, pos, end, data_index)
    }

    pub fn add_literal(&mut self, raw: String, pos: u32, end: u32) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(LiteralData { raw });
        self.push_node(NodeKind::Literal, 0, pos, end, data_index)
    }

    pub fn add_program(&mut self, statements: NodeList, pos: u32, end: u32) -> NodeIndex {
        let data_index = self.blocks.len() as u32;
        self.blocks.push(BlockData {
            statements: statements.clone(),
        });
        let idx = self.push_node(NodeKind::Program, 0, pos, end, data_index);
        self.set_parent_list(&statements, idx);
        idx
    }

    pub fn add_block(&mut self, statements: NodeList, pos: u32, end: u32) -> NodeIndex {
        let data_index = self.blocks.len() as u32;
        self.blocks.push(BlockData {
            statements: statements.clone(),
        });
        let idx = self.push_node(NodeKind::BlockStatement, 0, pos, end, data_index);
        self.set_parent_list(&statements, idx);
        idx
    }

    /// Add a function declaration or expression. `name` is NONE for
    /// anonymous function expressions.
    pub fn add_function(
        &mut self,
        kind: NodeKind,
        name: NodeIndex,
        params: NodeList,
        body: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(kind.is_function());
        let data_index = self.functions.len() as u32;
        self.functions.push(FunctionData {
            name,
            params: params.clone(),
            body,
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(name, idx);
        self.set_parent_list(&params, idx);
        self.set_parent(body, idx);
        idx
    }

    /// Add a `var`/`let`/`const` statement; the keyword is carried in
    /// `flags` (`node_flags::LET` / `node_flags::CONST`, neither = `var`).
    pub fn add_variable_declaration(
        &mut self,
        flags: u16,
        declarations: NodeList,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.variables.len() as u32;
        self.variables.push(VariableDeclarationData {
            declarations: declarations.clone(),
        });
        let idx = self.push_node(NodeKind::VariableDeclaration, flags, pos, end, data_index);
        self.set_parent_list(&declarations, idx);
        idx
    }

    pub fn add_variable_declarator(
        &mut self,
        name: NodeIndex,
        initializer: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.declarators.len() as u32;
        self.declarators.push(VariableDeclaratorData { name, initializer });
        let idx = self.push_node(NodeKind::VariableDeclarator, 0, pos, end, data_index);
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        idx
    }

    pub fn add_for(
        &mut self,
        initializer: NodeIndex,
        condition: NodeIndex,
        update: NodeIndex,
        body: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.loops.len() as u32;
        self.loops.push(LoopData {
            initializer,
            condition,
            update,
            body,
        });
        let idx = self.push_node(NodeKind::ForStatement, 0, pos, end, data_index);
        self.set_parent(initializer, idx);
        self.set_parent(condition, idx);
        self.set_parent(update, idx);
        self.set_parent(body, idx);
        idx
    }

    pub fn add_while(
        &mut self,
        kind: NodeKind,
        condition: NodeIndex,
        body: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::WhileStatement | NodeKind::DoWhileStatement
        ));
        let data_index = self.loops.len() as u32;
        self.loops.push(LoopData {
            initializer: NodeIndex::NONE,
            condition,
            update: NodeIndex::NONE,
            body,
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(condition, idx);
        self.set_parent(body, idx);
        idx
    }

    pub fn add_for_in(
        &mut self,
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.for_in.len() as u32;
        self.for_in.push(ForInData { left, right, body });
        let idx = self.push_node(NodeKind::ForInStatement, 0, pos, end, data_index);
        self.set_parent(left, idx);
        self.set_parent(right, idx);
        self.set_parent(body, idx);
        idx
    }

    /// Add an `if` statement or a conditional (ternary) expression.
    pub fn add_if(
        &mut self,
        kind: NodeKind,
        condition: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::IfStatement | NodeKind::ConditionalExpression
        ));
        let data_index = self.if_data.len() as u32;
        self.if_data.push(IfData {
            condition,
            consequent,
            alternate,
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(condition, idx);
        self.set_parent(consequent, idx);
        self.set_parent(alternate, idx);
        idx
    }

    /// Add a binary, logical, or assignment expression.
    pub fn add_binary(
        &mut self,
        kind: NodeKind,
        operator: Atom,
        left: NodeIndex,
        right: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::BinaryExpression
                | NodeKind::LogicalExpression
                | NodeKind::AssignmentExpression
        ));
        let data_index = self.binary_exprs.len() as u32;
        self.binary_exprs.push(BinaryExprData {
            operator,
            left,
            right,
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(left, idx);
        self.set_parent(right, idx);
        idx
    }

    /// Add a unary or update expression.
    pub fn add_unary(
        &mut self,
        kind: NodeKind,
        operator: Atom,
        operand: NodeIndex,
        prefix: bool,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::UnaryExpression | NodeKind::UpdateExpression
        ));
        let data_index = self.unary_exprs.len() as u32;
        self.unary_exprs.push(UnaryExprData {
            operator,
            operand,
            prefix,
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(operand, idx);
        idx
    }

    /// Add a call or `new` expression.
    pub fn add_call(
        &mut self,
        kind: NodeKind,
        callee: NodeIndex,
        arguments: NodeList,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::CallExpression | NodeKind::NewExpression
        ));
        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(CallExprData {
            callee,
            arguments: arguments.clone(),
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(callee, idx);
        self.set_parent_list(&arguments, idx);
        idx
    }

    pub fn add_member(
        &mut self,
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(AccessExprData {
            object,
            property,
            computed,
        });
        let idx = self.push_node(NodeKind::MemberExpression, 0, pos, end, data_index);
        self.set_parent(object, idx);
        self.set_parent(property, idx);
        idx
    }

    pub fn add_property(
        &mut self,
        key: NodeIndex,
        value: NodeIndex,
        shorthand: bool,
        computed: bool,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.properties.len() as u32;
        self.properties.push(PropertyData {
            key,
            value,
            shorthand,
            computed,
        });
        let idx = self.push_node(NodeKind::Property, 0, pos, end, data_index);
        self.set_parent(key, idx);
        self.set_parent(value, idx);
        idx
    }

    /// Add an object literal, array literal, or sequence expression.
    pub fn add_expr_list(
        &mut self,
        kind: NodeKind,
        elements: NodeList,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::ObjectExpression | NodeKind::ArrayExpression | NodeKind::SequenceExpression
        ));
        let data_index = self.expr_lists.len() as u32;
        self.expr_lists.push(ExprListData {
            elements: elements.clone(),
        });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent_list(&elements, idx);
        idx
    }

    /// Add an expression statement, `return`, or `throw`.
    pub fn add_expr_statement(
        &mut self,
        kind: NodeKind,
        expression: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::ExpressionStatement | NodeKind::ReturnStatement | NodeKind::ThrowStatement
        ));
        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(ExprStatementData { expression });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(expression, idx);
        idx
    }

    pub fn add_labeled(
        &mut self,
        label: NodeIndex,
        body: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.labeled_data.len() as u32;
        self.labeled_data.push(LabeledData { label, body });
        let idx = self.push_node(NodeKind::LabeledStatement, 0, pos, end, data_index);
        self.set_parent(label, idx);
        self.set_parent(body, idx);
        idx
    }

    /// Add a `break` or `continue`; `label` may be NONE.
    pub fn add_jump(&mut self, kind: NodeKind, label: NodeIndex, pos: u32, end: u32) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::BreakStatement | NodeKind::ContinueStatement
        ));
        let data_index = self.jump_data.len() as u32;
        self.jump_data.push(JumpData { label });
        let idx = self.push_node(kind, 0, pos, end, data_index);
        self.set_parent(label, idx);
        idx
    }

    pub fn add_try(
        &mut self,
        block: NodeIndex,
        handler: NodeIndex,
        finalizer: NodeIndex,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.try_data.len() as u32;
        self.try_data.push(TryData {
            block,
            handler,
            finalizer,
        });
        let idx = self.push_node(NodeKind::TryStatement, 0, pos, end, data_index);
        self.set_parent(block, idx);
        self.set_parent(handler, idx);
        self.set_parent(finalizer, idx);
        idx
    }

    pub fn add_catch(&mut self, param: NodeIndex, body: NodeIndex, pos: u32, end: u32) -> NodeIndex {
        let data_index = self.catch_clauses.len() as u32;
        self.catch_clauses.push(CatchData { param, body });
        let idx = self.push_node(NodeKind::CatchClause, 0, pos, end, data_index);
        self.set_parent(param, idx);
        self.set_parent(body, idx);
        idx
    }

    pub fn add_switch(
        &mut self,
        discriminant: NodeIndex,
        cases: NodeList,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.switch_data.len() as u32;
        self.switch_data.push(SwitchData {
            discriminant,
            cases: cases.clone(),
        });
        let idx = self.push_node(NodeKind::SwitchStatement, 0, pos, end, data_index);
        self.set_parent(discriminant, idx);
        self.set_parent_list(&cases, idx);
        idx
    }

    pub fn add_case(
        &mut self,
        test: NodeIndex,
        statements: NodeList,
        pos: u32,
        end: u32,
    ) -> NodeIndex {
        let data_index = self.case_clauses.len() as u32;
        self.case_clauses.push(CaseClauseData {
            test,
            statements: statements.clone(),
        });
        let idx = self.push_node(NodeKind::SwitchCase, 0, pos, end, data_index);
        self.set_parent(test, idx);
        self.set_parent_list(&statements, idx);
        idx
    }

    /// Add a node kind with no payload (`this`, `;`, `debugger`).
    pub fn add_plain(&mut self, kind: NodeKind, pos: u32, end: u32) -> NodeIndex {
        debug_assert!(matches!(
            kind,
            NodeKind::ThisExpression | NodeKind::EmptyStatement | NodeKind::DebuggerStatement
        ));
        self.push_node(kind, 0, pos, end, Node::NO_DATA)
    }

    // ============================================================================
    // Node Access Methods
    // ============================================================================

    /// Get a thin node by index.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get extended info for a node.
    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    /// Parent of a node; NONE for the root (or an invalid index).
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map(|info| info.parent)
            .unwrap_or(NodeIndex::NONE)
    }

    /// Line/column position of a node's start.
    #[inline]
    pub fn position_of(&self, index: NodeIndex) -> Position {
        self.get_extended(index)
            .map(|info| Position::new(info.line, info.column))
            .unwrap_or_default()
    }

    /// Get identifier data; None if the node is not an identifier.
    #[inline]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == NodeKind::Identifier {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Atom of an identifier node by index; None for non-identifiers.
    #[inline]
    pub fn identifier_atom(&self, index: NodeIndex) -> Option<Atom> {
        self.get(index)
            .and_then(|node| self.get_identifier(node))
            .map(|data| data.atom)
    }

    /// Text of an identifier node by index.
    #[inline]
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.identifier_atom(index)
            .map(|atom| self.interner.resolve(atom))
    }

    #[inline]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data() && node.kind == NodeKind::Literal {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_function(&self, node: &Node) -> Option<&FunctionData> {
        if node.has_data() && node.kind.is_function() {
            self.functions.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_variable_declaration(&self, node: &Node) -> Option<&VariableDeclarationData> {
        if node.has_data() && node.kind == NodeKind::VariableDeclaration {
            self.variables.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_declarator(&self, node: &Node) -> Option<&VariableDeclaratorData> {
        if node.has_data() && node.kind == NodeKind::VariableDeclarator {
            self.declarators.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Statement list of a `Program` or `BlockStatement`.
    #[inline]
    pub fn get_block(&self, node: &Node) -> Option<&BlockData> {
        if node.has_data()
            && matches!(node.kind, NodeKind::Program | NodeKind::BlockStatement)
        {
            self.blocks.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_loop(&self, node: &Node) -> Option<&LoopData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::ForStatement | NodeKind::WhileStatement | NodeKind::DoWhileStatement
            )
        {
            self.loops.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_for_in(&self, node: &Node) -> Option<&ForInData> {
        if node.has_data() && node.kind == NodeKind::ForInStatement {
            self.for_in.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_if(&self, node: &Node) -> Option<&IfData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::IfStatement | NodeKind::ConditionalExpression
            )
        {
            self.if_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_binary_expr(&self, node: &Node) -> Option<&BinaryExprData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::BinaryExpression
                    | NodeKind::LogicalExpression
                    | NodeKind::AssignmentExpression
            )
        {
            self.binary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_unary_expr(&self, node: &Node) -> Option<&UnaryExprData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::UnaryExpression | NodeKind::UpdateExpression
            )
        {
            self.unary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_call_expr(&self, node: &Node) -> Option<&CallExprData> {
        if node.has_data()
            && matches!(node.kind, NodeKind::CallExpression | NodeKind::NewExpression)
        {
            self.call_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_access_expr(&self, node: &Node) -> Option<&AccessExprData> {
        if node.has_data() && node.kind == NodeKind::MemberExpression {
            self.access_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_property(&self, node: &Node) -> Option<&PropertyData> {
        if node.has_data() && node.kind == NodeKind::Property {
            self.properties.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_expr_list(&self, node: &Node) -> Option<&ExprListData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::ObjectExpression
                    | NodeKind::ArrayExpression
                    | NodeKind::SequenceExpression
            )
        {
            self.expr_lists.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_expr_statement(&self, node: &Node) -> Option<&ExprStatementData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::ExpressionStatement
                    | NodeKind::ReturnStatement
                    | NodeKind::ThrowStatement
            )
        {
            self.expr_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_labeled(&self, node: &Node) -> Option<&LabeledData> {
        if node.has_data() && node.kind == NodeKind::LabeledStatement {
            self.labeled_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_jump(&self, node: &Node) -> Option<&JumpData> {
        if node.has_data()
            && matches!(
                node.kind,
                NodeKind::BreakStatement | NodeKind::ContinueStatement
            )
        {
            self.jump_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_try(&self, node: &Node) -> Option<&TryData> {
        if node.has_data() && node.kind == NodeKind::TryStatement {
            self.try_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_catch(&self, node: &Node) -> Option<&CatchData> {
        if node.has_data() && node.kind == NodeKind::CatchClause {
            self.catch_clauses.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_switch(&self, node: &Node) -> Option<&SwitchData> {
        if node.has_data() && node.kind == NodeKind::SwitchStatement {
            self.switch_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_case(&self, node: &Node) -> Option<&CaseClauseData> {
        if node.has_data() && node.kind == NodeKind::SwitchCase {
            self.case_clauses.get(node.data_index as usize)
        } else {
            None
        }
    }
}
