//! AST to IR lowering
//!
//! A single left-to-right, depth-first pass over the AST that builds one
//! `Module`. The generator implements the AST visitation protocol and keeps
//! a single insertion cursor: the currently active block of the function
//! being lowered. Violations of the cursor discipline are bugs in the
//! lowering sequence and abort immediately; everything a malformed-but-
//! plausible input can trigger is reported as a `LowerError` instead.

use crate::ir::instructions::{call_arg_nodes, Instruction};
use crate::ir::types::{BasicBlock, BlockId, Function, Module};
use front_end::ast::{Ast, NodeId, NodeKind};
use front_end::span::Span;
use front_end::types::Type;
use front_end::visitor::{self, AstVisitor};
use std::fmt;

/// Name of the implicit function holding top-level statements
pub const TOP_LEVEL_FUNCTION: &str = "main";

/// Result of lowering one expression, threaded between visit callbacks
///
/// `value` is the AST node whose runtime evaluation produces the
/// expression's value; it is unset for statements and void results.
#[derive(Debug, Clone, PartialEq)]
pub struct IrExprResult {
    pub value: Option<NodeId>,
    pub node: NodeId,
    pub ty: Option<Type>,
}

impl IrExprResult {
    pub fn new(value: Option<NodeId>, node: NodeId, ty: Option<Type>) -> Self {
        Self { value, node, ty }
    }

    pub fn no_value(node: NodeId) -> Self {
        Self::new(None, node, None)
    }
}

/// Recoverable lowering failures, each pointing at the offending source
#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    UndefinedFunction { name: String, span: Span },
    DuplicateFunction { name: String, span: Span },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    MisplacedNode { kind: &'static str, span: Span },
    DefAfterTopLevelCode { name: String, span: Span },
    UnreachableStatement { span: Span },
}

impl LowerError {
    pub fn span(&self) -> &Span {
        match self {
            LowerError::UndefinedFunction { span, .. } => span,
            LowerError::DuplicateFunction { span, .. } => span,
            LowerError::ArityMismatch { span, .. } => span,
            LowerError::MisplacedNode { span, .. } => span,
            LowerError::DefAfterTopLevelCode { span, .. } => span,
            LowerError::UnreachableStatement { span } => span,
        }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::UndefinedFunction { name, .. } => {
                write!(f, "call to undefined function `{}`", name)
            }
            LowerError::DuplicateFunction { name, .. } => {
                write!(f, "function `{}` is defined more than once", name)
            }
            LowerError::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "function `{}` expects {} argument(s), found {}",
                name, expected, found
            ),
            LowerError::MisplacedNode { kind, .. } => {
                write!(f, "{} is not allowed here", kind)
            }
            LowerError::DefAfterTopLevelCode { name, .. } => {
                write!(f, "function `{}` is defined after top-level code", name)
            }
            LowerError::UnreachableStatement { .. } => {
                write!(f, "unreachable statement after return")
            }
        }
    }
}

/// Lower a program AST into an IR module
pub fn lower(ast: &Ast, root: NodeId, module_name: &str) -> Result<Module, LowerError> {
    IrGenerator::new(module_name).generate(ast, root)
}

/// Single-pass lowering visitor
pub struct IrGenerator {
    /// The module under construction
    module: Module,

    /// Name of the function currently being lowered, if any
    current_function: Option<String>,

    /// The block new instructions are appended to, if any
    current_block: Option<BlockId>,

    /// Whether the implicit top-level function has been begun
    top_level_open: bool,
}

impl IrGenerator {
    pub fn new(module_name: &str) -> Self {
        Self {
            module: Module::new(module_name),
            current_function: None,
            current_block: None,
            top_level_open: false,
        }
    }

    /// Run the full lowering pass and hand back the finished module
    pub fn generate(mut self, ast: &Ast, root: NodeId) -> Result<Module, LowerError> {
        if !matches!(&ast.node(root).kind, NodeKind::Entry { .. }) {
            return Err(LowerError::MisplacedNode {
                kind: ast.kind_name(root),
                span: ast.span(root).clone(),
            });
        }

        visitor::visit_node(&mut self, ast, root)?;

        debug_assert!(self.current_block.is_none());
        debug_assert!(self.current_function.is_none());
        Ok(self.module)
    }

    fn current_function(&self) -> &Function {
        let name = self
            .current_function
            .as_deref()
            .expect("no function is being lowered");
        self.module
            .get_function(name)
            .unwrap_or_else(|| panic!("current function `{}` is not registered", name))
    }

    fn current_function_mut(&mut self) -> &mut Function {
        let name = self
            .current_function
            .clone()
            .expect("no function is being lowered");
        self.module
            .get_function_mut(&name)
            .unwrap_or_else(|| panic!("current function `{}` is not registered", name))
    }

    /// Move the insertion cursor to `target`
    ///
    /// Legal only when there is no active block yet, or the active block is
    /// empty or already terminated. Anything else is a broken lowering
    /// sequence.
    fn switch_to_block(&mut self, target: BlockId) {
        if let Some(current) = self.current_block {
            let block = self.current_function().block(current);
            assert!(
                block.is_empty() || block.is_terminated(),
                "switched away from unterminated block `{}`",
                block.label()
            );
        }
        self.current_block = Some(target);
    }

    /// Append an instruction at the insertion cursor
    fn push_to_current_block(&mut self, instruction: Instruction) {
        let block_id = self
            .current_block
            .expect("no active block to append instructions to");
        self.current_function_mut().block_mut(block_id).push(instruction);
    }

    fn current_block_terminated(&self) -> bool {
        self.current_block
            .is_some_and(|id| self.current_function().block(id).is_terminated())
    }

    /// Clear the insertion cursor after a function is fully lowered
    fn finalize_function(&mut self) {
        let block_id = self
            .current_block
            .expect("finalized a function without an active block");
        assert!(
            self.current_function().block(block_id).is_terminated(),
            "finalized a function whose active block `{}` is unterminated",
            self.current_function().block(block_id).label()
        );
        self.current_block = None;
    }

    /// Terminate the body, add the exit block, and leave the function
    fn finish_function(&mut self, node: NodeId) {
        if !self.current_block_terminated() {
            self.push_to_current_block(Instruction::Ret { value: None, node });
        }

        let exit = self.current_function_mut().add_block(BasicBlock::new("exit"));
        self.switch_to_block(exit);
        self.push_to_current_block(Instruction::Ret { value: None, node });

        self.finalize_function();
        self.current_function = None;
    }

    /// Begin the implicit top-level function if it is not open yet
    fn ensure_top_level(&mut self, span: &Span) -> Result<(), LowerError> {
        if self.top_level_open {
            return Ok(());
        }

        let mut function = Function::new(TOP_LEVEL_FUNCTION);
        let entry = function.add_block(BasicBlock::new("body"));
        function.set_entry(entry);
        self.module
            .register_function(function)
            .map_err(|_| LowerError::DuplicateFunction {
                name: TOP_LEVEL_FUNCTION.to_string(),
                span: span.clone(),
            })?;

        self.current_function = Some(TOP_LEVEL_FUNCTION.to_string());
        self.switch_to_block(entry);
        self.top_level_open = true;
        Ok(())
    }

    /// Validate an expression subtree without emitting instructions
    fn check_expr(&self, ast: &Ast, node: NodeId) -> Result<(), LowerError> {
        match &ast.node(node).kind {
            NodeKind::IntLiteral(_) | NodeKind::StringLiteral(_) | NodeKind::VarRef { .. } => {
                Ok(())
            }
            NodeKind::FctCall { .. } => self.check_call(ast, node),
            _ => Err(LowerError::MisplacedNode {
                kind: ast.kind_name(node),
                span: ast.span(node).clone(),
            }),
        }
    }

    /// Resolve a call target and validate its arguments
    ///
    /// The single forward pass means only already-registered functions
    /// resolve; an unknown name is a lookup failure for the caller, never a
    /// crash.
    fn check_call(&self, ast: &Ast, node: NodeId) -> Result<(), LowerError> {
        let NodeKind::FctCall {
            callee,
            call_params,
        } = &ast.node(node).kind
        else {
            panic!("call check on non-call node");
        };
        let span = ast.span(node);

        let Some(function) = self.module.get_function(callee) else {
            return Err(LowerError::UndefinedFunction {
                name: callee.clone(),
                span: span.clone(),
            });
        };

        let args = call_arg_nodes(ast, *call_params);
        if function.params().len() != args.len() {
            return Err(LowerError::ArityMismatch {
                name: callee.clone(),
                expected: function.params().len(),
                found: args.len(),
                span: span.clone(),
            });
        }

        for arg in args {
            self.check_expr(ast, arg)?;
        }
        Ok(())
    }

    /// Lower one statement in a statement sequence
    fn lower_statement(&mut self, ast: &Ast, stmt: NodeId) -> Result<IrExprResult, LowerError> {
        match &ast.node(stmt).kind {
            NodeKind::PrintCall { .. }
            | NodeKind::FctCall { .. }
            | NodeKind::Return { .. }
            | NodeKind::IntLiteral(_)
            | NodeKind::StringLiteral(_)
            | NodeKind::VarRef { .. } => {
                if self.current_block_terminated() {
                    return Err(LowerError::UnreachableStatement {
                        span: ast.span(stmt).clone(),
                    });
                }
                visitor::visit_node(self, ast, stmt)
            }
            _ => Err(LowerError::MisplacedNode {
                kind: ast.kind_name(stmt),
                span: ast.span(stmt).clone(),
            }),
        }
    }
}

impl AstVisitor for IrGenerator {
    type Output = Result<IrExprResult, LowerError>;

    fn visit_entry(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::Entry { items } = &ast.node(node).kind else {
            panic!("entry callback on non-entry node");
        };

        // Traversal starts and ends outside any function
        assert!(
            self.current_block.is_none(),
            "entry lowering started with an active block"
        );

        for item in items {
            match &ast.node(*item).kind {
                NodeKind::FctDef { name, .. } => {
                    if self.top_level_open {
                        return Err(LowerError::DefAfterTopLevelCode {
                            name: name.clone(),
                            span: ast.span(*item).clone(),
                        });
                    }
                    visitor::visit_node(self, ast, *item)?;
                }
                _ => {
                    self.ensure_top_level(ast.span(*item))?;
                    self.lower_statement(ast, *item)?;
                }
            }
        }

        if self.top_level_open {
            self.finish_function(node);
            self.top_level_open = false;
        }

        assert!(
            self.current_block.is_none(),
            "entry lowering finished with an active block"
        );
        Ok(IrExprResult::no_value(node))
    }

    fn visit_fct_def(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::FctDef {
            name,
            param_lst,
            body,
        } = &ast.node(node).kind
        else {
            panic!("function-definition callback on non-definition node");
        };
        let (param_lst, body) = (*param_lst, *body);

        assert!(
            self.current_block.is_none(),
            "function definition lowered while a block is active"
        );

        let mut function = Function::new(name.clone());
        let entry = function.add_block(BasicBlock::new("body"));
        function.set_entry(entry);

        // Register before lowering the body so recursive calls resolve
        self.module
            .register_function(function)
            .map_err(|_| LowerError::DuplicateFunction {
                name: name.clone(),
                span: ast.span(node).clone(),
            })?;
        self.current_function = Some(name.clone());

        visitor::visit_node(self, ast, param_lst)?;

        self.switch_to_block(entry);
        visitor::visit_node(self, ast, body)?;

        self.finish_function(node);
        Ok(IrExprResult::no_value(node))
    }

    fn visit_param_lst(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::ParamLst { params } = &ast.node(node).kind else {
            panic!("parameter-list callback on non-parameter-list node");
        };

        // One block per formal parameter, named by index in declaration order
        for (i, param) in params.iter().enumerate() {
            let block = self
                .current_function_mut()
                .add_block(BasicBlock::new(format!("param{}", i)));
            self.switch_to_block(block);
            visitor::visit_node(self, ast, *param)?;
        }

        Ok(IrExprResult::no_value(node))
    }

    fn visit_param(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::Param { name, ty } = &ast.node(node).kind else {
            panic!("parameter callback on non-parameter node");
        };

        let (name, ty) = (name.clone(), *ty);
        self.current_function_mut().add_param(name);
        Ok(IrExprResult::new(None, node, Some(ty)))
    }

    fn visit_logic(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::Logic { statements } = &ast.node(node).kind else {
            panic!("statement-block callback on non-block node");
        };

        for stmt in statements {
            self.lower_statement(ast, *stmt)?;
        }
        Ok(IrExprResult::no_value(node))
    }

    fn visit_print_call(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::PrintCall { arg } = &ast.node(node).kind else {
            panic!("print callback on non-print node");
        };
        let arg = *arg;

        self.check_expr(ast, arg)?;
        self.push_to_current_block(Instruction::Print { expr: arg, node });
        Ok(IrExprResult::no_value(node))
    }

    fn visit_fct_call(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::FctCall {
            callee,
            call_params,
        } = &ast.node(node).kind
        else {
            panic!("call callback on non-call node");
        };
        let (callee, call_params) = (callee.clone(), *call_params);

        self.check_call(ast, node)?;
        self.push_to_current_block(Instruction::Call {
            callee,
            args: call_params,
            node,
        });

        // The call expression's value is whatever running it produces
        Ok(IrExprResult::new(Some(node), node, None))
    }

    fn visit_call_params(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::CallParams { args } = &ast.node(node).kind else {
            panic!("call-arguments callback on non-arguments node");
        };

        for arg in args {
            self.check_expr(ast, *arg)?;
        }
        Ok(IrExprResult::no_value(node))
    }

    fn visit_return(&mut self, ast: &Ast, node: NodeId) -> Self::Output {
        let NodeKind::Return { value } = &ast.node(node).kind else {
            panic!("return callback on non-return node");
        };
        let value = *value;

        if let Some(value) = value {
            self.check_expr(ast, value)?;
        }
        self.push_to_current_block(Instruction::Ret { value, node });
        Ok(IrExprResult::no_value(node))
    }

    fn visit_int_literal(&mut self, _ast: &Ast, node: NodeId) -> Self::Output {
        Ok(IrExprResult::new(Some(node), node, Some(Type::Int)))
    }

    fn visit_string_literal(&mut self, _ast: &Ast, node: NodeId) -> Self::Output {
        Ok(IrExprResult::new(Some(node), node, Some(Type::Str)))
    }

    fn visit_var_ref(&mut self, _ast: &Ast, node: NodeId) -> Self::Output {
        Ok(IrExprResult::new(Some(node), node, None))
    }
}
