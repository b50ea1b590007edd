use front_end::ast::{Ast, NodeId};
use front_end::span::Span;
use front_end::types::Type;
use middle_end::diagnostics::{lower_error_to_diagnostic, runtime_error_to_diagnostic};
use middle_end::interpreter::InterpreterEnvironment;
use middle_end::ir::{dump_module, lower, TOP_LEVEL_FUNCTION};

/// Build the demo program the way the external parser collaborator would:
///
///     fn foo(x: int) {
///         print x
///     }
///
///     foo(1)
///     print "hello"
fn build_demo_program(ast: &mut Ast) -> NodeId {
    let param = ast.param("x", Type::Int, Span::point(1, 8));
    let params = ast.param_lst(vec![param], Span::point(1, 7));
    let arg = ast.var_ref("x", Span::point(2, 11));
    let print = ast.print_call(arg, Span::point(2, 5));
    let body = ast.logic(vec![print], Span::point(2, 1));
    let def = ast.fct_def("foo", params, body, Span::point(1, 1));

    let one = ast.int_literal(1, Span::point(5, 5));
    let call_args = ast.call_params(vec![one], Span::point(5, 4));
    let call = ast.fct_call("foo", call_args, Span::point(5, 1));

    let hello = ast.string_literal("hello", Span::point(6, 7));
    let print_hello = ast.print_call(hello, Span::point(6, 1));

    ast.entry(vec![def, call, print_hello], Span::point(1, 1))
}

fn main() -> Result<(), String> {
    println!("\n=== Starting lowering pipeline ===");

    // Step 1: AST construction - normally handed over by the parser
    println!("\n--- AST ---");
    let mut ast = Ast::new();
    let root = build_demo_program(&mut ast);
    println!("Built {} AST nodes", ast.len());

    // Step 2: IR Generation - lower the AST into a module
    println!("\n--- IR Generation ---");
    let module = lower(&ast, root, "demo")
        .map_err(|e| lower_error_to_diagnostic(&e).to_string())?;
    println!("{}", dump_module(&module, &ast));

    // Step 3: Execution - run the IR
    println!("--- Program Execution ---");
    let mut env = InterpreterEnvironment::new(&ast, &module);
    let result = env
        .run(TOP_LEVEL_FUNCTION)
        .map_err(|e| runtime_error_to_diagnostic(&e).to_string())?;

    for line in env.output() {
        println!("{}", line);
    }

    println!("\nExecution complete. Result: {}", result);

    Ok(())
}
