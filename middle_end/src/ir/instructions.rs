//! IR instructions
//!
//! A closed set of operation kinds. Every variant keeps the `NodeId` of the
//! AST node it was lowered from, and knows how to execute itself against an
//! interpreter environment, render itself for the textual dump, and report
//! its source location.

use crate::interpreter::{InterpreterEnvironment, RuntimeError, Value};
use front_end::ast::{Ast, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Call of a registered function; `args` is the call-arguments AST node
    Call {
        callee: String,
        args: NodeId,
        node: NodeId,
    },
    /// Print of the value produced by evaluating `expr`
    Print { expr: NodeId, node: NodeId },
    /// Return from the current function with an optional value
    Ret { value: Option<NodeId>, node: NodeId },
}

impl Instruction {
    /// True iff this instruction ends a block's control flow
    pub fn is_terminator(&self) -> bool {
        matches!(self, Instruction::Ret { .. })
    }

    /// The AST node this instruction was lowered from
    pub fn node(&self) -> NodeId {
        match self {
            Instruction::Call { node, .. } => *node,
            Instruction::Print { node, .. } => *node,
            Instruction::Ret { node, .. } => *node,
        }
    }

    /// Canonical textual form, stable for a given IR
    pub fn render(&self, ast: &Ast) -> String {
        match self {
            Instruction::Call { callee, args, .. } => {
                format!("call {}({})", callee, render_call_args(ast, *args))
            }
            Instruction::Print { expr, .. } => {
                format!("print {}", render_expr(ast, *expr))
            }
            Instruction::Ret { value: Some(value), .. } => {
                format!("ret {}", render_expr(ast, *value))
            }
            Instruction::Ret { value: None, .. } => "ret".to_string(),
        }
    }

    /// `<source-location>: <short-description>` for traces
    pub fn locate(&self, ast: &Ast) -> String {
        let span = ast.span(self.node());
        let what = match self {
            Instruction::Call { callee, .. } => format!("call {}", callee),
            Instruction::Print { .. } => "print".to_string(),
            Instruction::Ret { .. } => "ret".to_string(),
        };
        format!("{}:{}: {}", span.start_line, span.start_column, what)
    }

    /// Perform the instruction's runtime effect and advance control
    pub fn execute(&self, env: &mut InterpreterEnvironment<'_>) -> Result<(), RuntimeError> {
        let ast = env.ast();
        match self {
            Instruction::Call { callee, args, node } => {
                // Advance the caller's cursor past the call first: the frame
                // then records the resume point for when the callee returns.
                env.advance_cursor();

                let mut values = Vec::new();
                for arg in call_arg_nodes(ast, *args) {
                    values.push(env.eval_expr(arg)?);
                }
                env.call_function(callee, values, Some(ast.span(*node).clone()))
            }
            Instruction::Print { expr, .. } => {
                let value = env.eval_expr(*expr)?;
                env.emit(&value);
                env.advance_cursor();
                Ok(())
            }
            Instruction::Ret { value, .. } => {
                let result = match value {
                    Some(value) => env.eval_expr(*value)?,
                    None => Value::Unit,
                };
                env.return_from_function(result);
                Ok(())
            }
        }
    }
}

/// The argument expression nodes of a `CallParams` node
pub(crate) fn call_arg_nodes(ast: &Ast, call_params: NodeId) -> Vec<NodeId> {
    match &ast.node(call_params).kind {
        NodeKind::CallParams { args } => args.clone(),
        other => panic!("expected call arguments node, found {:?}", other),
    }
}

fn render_call_args(ast: &Ast, call_params: NodeId) -> String {
    call_arg_nodes(ast, call_params)
        .into_iter()
        .map(|arg| render_expr(ast, arg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an expression subtree the way the dump shows operands
pub(crate) fn render_expr(ast: &Ast, node: NodeId) -> String {
    match &ast.node(node).kind {
        NodeKind::IntLiteral(value) => value.to_string(),
        NodeKind::StringLiteral(value) => format!("\"{}\"", value),
        NodeKind::VarRef { name } => name.clone(),
        NodeKind::FctCall {
            callee,
            call_params,
        } => format!("{}({})", callee, render_call_args(ast, *call_params)),
        _ => format!("<{}>", ast.kind_name(node)),
    }
}
