//! Interpreter for IR code
//!
//! This module executes lowered modules directly, without any native
//! code generation.

mod environment;
mod values;


// Re-export main components
pub use environment::{InterpreterEnvironment, RuntimeError, StackFrame};
pub use values::Value;
