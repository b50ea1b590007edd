//! AST definitions
//!
//! The tree is stored as an arena: `Ast` owns every node, `NodeId` indexes
//! into it. Later phases keep `NodeId`s instead of references, so nothing
//! outside the arena ties its lifetime to the tree.

use crate::span::Span;
use crate::types::Type;

/// Index of a node inside an `Ast` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The closed set of node kinds the language has
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Program root: function definitions and top-level statements in source order
    Entry { items: Vec<NodeId> },
    /// Function definition with a parameter list and a body
    FctDef {
        name: String,
        param_lst: NodeId,
        body: NodeId,
    },
    /// Formal parameter list of a function definition
    ParamLst { params: Vec<NodeId> },
    /// One formal parameter
    Param { name: String, ty: Type },
    /// A statement sequence (function body)
    Logic { statements: Vec<NodeId> },
    /// The print builtin applied to one expression
    PrintCall { arg: NodeId },
    /// Call of a named function
    FctCall { callee: String, call_params: NodeId },
    /// Actual argument expressions of a call
    CallParams { args: Vec<NodeId> },
    /// Explicit return with optional value
    Return { value: Option<NodeId> },
    IntLiteral(i64),
    StringLiteral(String),
    VarRef { name: String },
}

#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: NodeKind,
    pub span: Span,
}

/// Arena holding a fully-built program tree
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNode { kind, span });
        id
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.nodes[id.0].span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Short name of a node's kind, for messages
    pub fn kind_name(&self, id: NodeId) -> &'static str {
        match &self.nodes[id.0].kind {
            NodeKind::Entry { .. } => "entry",
            NodeKind::FctDef { .. } => "function definition",
            NodeKind::ParamLst { .. } => "parameter list",
            NodeKind::Param { .. } => "parameter",
            NodeKind::Logic { .. } => "statement block",
            NodeKind::PrintCall { .. } => "print call",
            NodeKind::FctCall { .. } => "function call",
            NodeKind::CallParams { .. } => "call arguments",
            NodeKind::Return { .. } => "return",
            NodeKind::IntLiteral(_) => "integer literal",
            NodeKind::StringLiteral(_) => "string literal",
            NodeKind::VarRef { .. } => "variable reference",
        }
    }

    // Builder methods. The external parser collaborator constructs trees
    // through these; so do the tests.

    pub fn entry(&mut self, items: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Entry { items }, span)
    }

    pub fn fct_def(
        &mut self,
        name: impl Into<String>,
        param_lst: NodeId,
        body: NodeId,
        span: Span,
    ) -> NodeId {
        self.push(
            NodeKind::FctDef {
                name: name.into(),
                param_lst,
                body,
            },
            span,
        )
    }

    pub fn param_lst(&mut self, params: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::ParamLst { params }, span)
    }

    pub fn param(&mut self, name: impl Into<String>, ty: Type, span: Span) -> NodeId {
        self.push(
            NodeKind::Param {
                name: name.into(),
                ty,
            },
            span,
        )
    }

    pub fn logic(&mut self, statements: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Logic { statements }, span)
    }

    pub fn print_call(&mut self, arg: NodeId, span: Span) -> NodeId {
        self.push(NodeKind::PrintCall { arg }, span)
    }

    pub fn fct_call(
        &mut self,
        callee: impl Into<String>,
        call_params: NodeId,
        span: Span,
    ) -> NodeId {
        self.push(
            NodeKind::FctCall {
                callee: callee.into(),
                call_params,
            },
            span,
        )
    }

    pub fn call_params(&mut self, args: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::CallParams { args }, span)
    }

    pub fn return_stmt(&mut self, value: Option<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Return { value }, span)
    }

    pub fn int_literal(&mut self, value: i64, span: Span) -> NodeId {
        self.push(NodeKind::IntLiteral(value), span)
    }

    pub fn string_literal(&mut self, value: impl Into<String>, span: Span) -> NodeId {
        self.push(NodeKind::StringLiteral(value.into()), span)
    }

    pub fn var_ref(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.push(NodeKind::VarRef { name: name.into() }, span)
    }
}
