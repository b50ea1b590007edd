//! Textual IR dump
//!
//! Concatenates each instruction's rendering in block/function/module
//! order. The output is stable for a given module and AST, so golden-file
//! tests can diff it.

use crate::ir::types::{BasicBlock, Function, Module};
use front_end::ast::Ast;
use std::fmt::Write;

/// Dump a whole module
pub fn dump_module(module: &Module, ast: &Ast) -> String {
    let mut output = String::new();

    writeln!(&mut output, "module {} {{", module.name()).unwrap();
    for function in module.functions() {
        dump_function(function, ast, &mut output);
    }
    writeln!(&mut output, "}}").unwrap();

    output
}

/// Dump one function with its blocks in creation order
pub fn dump_function(function: &Function, ast: &Ast, output: &mut String) {
    writeln!(
        output,
        "fn {}({}) {{",
        function.name(),
        function.params().join(", ")
    )
    .unwrap();

    for block in function.blocks() {
        dump_block(block, ast, output);
    }

    writeln!(output, "}}").unwrap();
}

fn dump_block(block: &BasicBlock, ast: &Ast, output: &mut String) {
    writeln!(output, "  {}:", block.label()).unwrap();
    for instruction in block.instructions() {
        writeln!(output, "    {}", instruction.render(ast)).unwrap();
    }
}
