//! IR execution engine
//!
//! A call-stack-based, single-threaded walk over a module's instruction
//! stream. The explicit frame stack replaces the host's native call stack,
//! so call and return stay inspectable. Created per execution; once a run
//! finishes or faults the environment is done.

use crate::interpreter::values::Value;
use crate::ir::instructions::call_arg_nodes;
use crate::ir::types::{BlockId, Module};
use front_end::ast::{Ast, NodeId, NodeKind};
use front_end::span::Span;
use std::collections::HashMap;
use std::fmt;

/// Runtime failures the executed program can trigger
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UndefinedFunction {
        name: String,
        span: Option<Span>,
    },
    UndefinedVariable {
        name: String,
        span: Span,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Option<Span>,
    },
    NotAValue {
        kind: &'static str,
        span: Span,
    },
}

impl RuntimeError {
    pub fn span(&self) -> Option<&Span> {
        match self {
            RuntimeError::UndefinedFunction { span, .. } => span.as_ref(),
            RuntimeError::UndefinedVariable { span, .. } => Some(span),
            RuntimeError::ArityMismatch { span, .. } => span.as_ref(),
            RuntimeError::NotAValue { span, .. } => Some(span),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UndefinedFunction { name, .. } => {
                write!(f, "call to undefined function `{}`", name)
            }
            RuntimeError::UndefinedVariable { name, .. } => {
                write!(f, "variable `{}` is not bound", name)
            }
            RuntimeError::ArityMismatch {
                name,
                expected,
                found,
                ..
            } => write!(
                f,
                "function `{}` expects {} argument(s), found {}",
                name, expected, found
            ),
            RuntimeError::NotAValue { kind, .. } => {
                write!(f, "{} does not produce a value", kind)
            }
        }
    }
}

/// One activation: where we are in which function, plus local bindings
#[derive(Debug)]
pub struct StackFrame {
    function: String,
    block: BlockId,
    pc: usize,
    locals: HashMap<String, Value>,
}

impl StackFrame {
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn cursor(&self) -> (BlockId, usize) {
        (self.block, self.pc)
    }
}

/// Executes a module's functions against an AST
pub struct InterpreterEnvironment<'a> {
    ast: &'a Ast,
    module: &'a Module,
    frames: Vec<StackFrame>,
    output: Vec<String>,
    last_return: Option<Value>,
}

impl<'a> InterpreterEnvironment<'a> {
    pub fn new(ast: &'a Ast, module: &'a Module) -> Self {
        Self {
            ast,
            module,
            frames: Vec::new(),
            output: Vec::new(),
            last_return: None,
        }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    /// Everything the program printed, one entry per print, in order
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Run the named function to completion and return its result
    pub fn run(&mut self, function_name: &str) -> Result<Value, RuntimeError> {
        self.call_function(function_name, Vec::new(), None)?;

        while !self.frames.is_empty() {
            self.step()?;
        }

        Ok(self.last_return.take().unwrap_or(Value::Unit))
    }

    /// Execute the instruction at the current frame's cursor
    fn step(&mut self) -> Result<(), RuntimeError> {
        let module = self.module;
        let frame = self
            .frames
            .last()
            .expect("stepped with an empty frame stack");
        let function = module
            .get_function(&frame.function)
            .unwrap_or_else(|| panic!("frame refers to unknown function `{}`", frame.function));
        let block = function.block(frame.block);

        let Some(instruction) = block.instructions().get(frame.pc) else {
            panic!(
                "instruction cursor ran past the end of block `{}` in function `{}`",
                block.label(),
                frame.function
            );
        };

        instruction.clone().execute(self)
    }

    /// Keep executing until the frame stack is back at `depth`
    ///
    /// Used to drive a nested call that was pushed mid-expression.
    fn run_until_depth(&mut self, depth: usize) -> Result<(), RuntimeError> {
        while self.frames.len() > depth {
            self.step()?;
        }
        Ok(())
    }

    /// Push an activation frame for `function_name` at its entry block
    ///
    /// The caller's cursor has already been advanced past the call
    /// instruction, so it doubles as the recorded resume point.
    pub fn call_function(
        &mut self,
        function_name: &str,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> Result<(), RuntimeError> {
        let Some(function) = self.module.get_function(function_name) else {
            return Err(RuntimeError::UndefinedFunction {
                name: function_name.to_string(),
                span,
            });
        };

        if function.params().len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: function_name.to_string(),
                expected: function.params().len(),
                found: args.len(),
                span,
            });
        }

        let entry = function
            .entry()
            .unwrap_or_else(|| panic!("function `{}` has no entry block", function_name));

        let locals = function
            .params()
            .iter()
            .cloned()
            .zip(args)
            .collect::<HashMap<_, _>>();

        self.frames.push(StackFrame {
            function: function_name.to_string(),
            block: entry,
            pc: 0,
            locals,
        });
        Ok(())
    }

    /// Pop the current frame; the caller resumes at its recorded cursor
    pub fn return_from_function(&mut self, value: Value) {
        self.frames
            .pop()
            .expect("returned with an empty frame stack");
        self.last_return = Some(value);
    }

    /// Move the current frame's cursor to the next instruction
    pub(crate) fn advance_cursor(&mut self) {
        let frame = self
            .frames
            .last_mut()
            .expect("advanced the cursor with an empty frame stack");
        frame.pc += 1;
    }

    /// Record one line of program output
    pub(crate) fn emit(&mut self, value: &Value) {
        self.output.push(value.to_string());
    }

    /// Evaluate an expression subtree to a runtime value
    ///
    /// Literals and variable references read directly; a nested call pushes
    /// a frame and drives the explicit stack until that frame has popped
    /// again.
    pub fn eval_expr(&mut self, node: NodeId) -> Result<Value, RuntimeError> {
        let ast = self.ast;
        match &ast.node(node).kind {
            NodeKind::IntLiteral(value) => Ok(Value::Int(*value)),
            NodeKind::StringLiteral(value) => Ok(Value::Str(value.clone())),
            NodeKind::VarRef { name } => {
                let frame = self
                    .frames
                    .last()
                    .expect("evaluated a variable with an empty frame stack");
                frame
                    .locals
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        span: ast.span(node).clone(),
                    })
            }
            NodeKind::FctCall {
                callee,
                call_params,
            } => {
                let args = call_arg_nodes(ast, *call_params);

                let mut values = Vec::new();
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }

                let depth = self.frames.len();
                self.call_function(callee, values, Some(ast.span(node).clone()))?;
                self.run_until_depth(depth)?;

                Ok(self.last_return.take().unwrap_or(Value::Unit))
            }
            _ => Err(RuntimeError::NotAValue {
                kind: ast.kind_name(node),
                span: ast.span(node).clone(),
            }),
        }
    }
}
