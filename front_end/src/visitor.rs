//! AST visitation protocol
//!
//! Consumers implement one callback per node kind; `visit_node` performs the
//! dispatch with an exhaustive match, so a new node kind cannot be added
//! without every visitor being updated.

use crate::ast::{Ast, NodeId, NodeKind};

/// Trait for AST visitors
pub trait AstVisitor {
    type Output;

    fn visit_entry(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_fct_def(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_param_lst(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_param(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_logic(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_print_call(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_fct_call(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_call_params(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_return(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_int_literal(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_string_literal(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
    fn visit_var_ref(&mut self, ast: &Ast, node: NodeId) -> Self::Output;
}

/// Dispatch a single node to the matching visitor callback
pub fn visit_node<V: AstVisitor>(visitor: &mut V, ast: &Ast, node: NodeId) -> V::Output {
    match &ast.node(node).kind {
        NodeKind::Entry { .. } => visitor.visit_entry(ast, node),
        NodeKind::FctDef { .. } => visitor.visit_fct_def(ast, node),
        NodeKind::ParamLst { .. } => visitor.visit_param_lst(ast, node),
        NodeKind::Param { .. } => visitor.visit_param(ast, node),
        NodeKind::Logic { .. } => visitor.visit_logic(ast, node),
        NodeKind::PrintCall { .. } => visitor.visit_print_call(ast, node),
        NodeKind::FctCall { .. } => visitor.visit_fct_call(ast, node),
        NodeKind::CallParams { .. } => visitor.visit_call_params(ast, node),
        NodeKind::Return { .. } => visitor.visit_return(ast, node),
        NodeKind::IntLiteral(_) => visitor.visit_int_literal(ast, node),
        NodeKind::StringLiteral(_) => visitor.visit_string_literal(ast, node),
        NodeKind::VarRef { .. } => visitor.visit_var_ref(ast, node),
    }
}
