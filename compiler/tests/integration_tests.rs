use front_end::ast::{Ast, NodeId};
use front_end::diagnostics::DiagnosticReporter;
use front_end::span::Span;
use front_end::types::Type;
use middle_end::diagnostics::lower_error_to_diagnostic;
use middle_end::interpreter::{InterpreterEnvironment, Value};
use middle_end::ir::{dump_module, lower, LowerError, TOP_LEVEL_FUNCTION};

/// fn foo(x) { print x }
/// foo(1)
fn foo_then_call(ast: &mut Ast) -> NodeId {
    let param = ast.param("x", Type::Int, Span::point(1, 8));
    let params = ast.param_lst(vec![param], Span::point(1, 7));
    let arg = ast.var_ref("x", Span::point(2, 11));
    let print = ast.print_call(arg, Span::point(2, 5));
    let body = ast.logic(vec![print], Span::point(2, 1));
    let def = ast.fct_def("foo", params, body, Span::point(1, 1));

    let one = ast.int_literal(1, Span::point(4, 5));
    let call_args = ast.call_params(vec![one], Span::point(4, 4));
    let call = ast.fct_call("foo", call_args, Span::point(4, 1));

    ast.entry(vec![def, call], Span::point(1, 1))
}

#[test]
fn test_lower_dump_and_execute() {
    let mut ast = Ast::new();
    let root = foo_then_call(&mut ast);

    let module = lower(&ast, root, "demo").expect("lowering failed");

    let dump = dump_module(&module, &ast);
    assert!(dump.contains("call foo(1)"));
    assert!(dump.contains("print x"));

    let mut env = InterpreterEnvironment::new(&ast, &module);
    let result = env.run(TOP_LEVEL_FUNCTION).expect("execution failed");

    assert_eq!(env.output(), ["1"]);
    assert_eq!(result, Value::Unit);
}

#[test]
fn test_hello_program_end_to_end() {
    let mut ast = Ast::new();
    let hello = ast.string_literal("hello", Span::point(1, 7));
    let print = ast.print_call(hello, Span::point(1, 1));
    let root = ast.entry(vec![print], Span::point(1, 1));

    let module = lower(&ast, root, "demo").expect("lowering failed");

    // One implicit top-level function holding exactly the print
    assert_eq!(module.functions().len(), 1);
    let main = module.get_function(TOP_LEVEL_FUNCTION).unwrap();
    let body = main.block(main.entry().unwrap());
    assert_eq!(
        body.instructions()
            .iter()
            .filter(|i| !i.is_terminator())
            .count(),
        1
    );

    let mut env = InterpreterEnvironment::new(&ast, &module);
    env.run(TOP_LEVEL_FUNCTION).expect("execution failed");
    assert_eq!(env.output(), ["hello"]);
}

#[test]
fn test_call_before_definition_is_reported() {
    let mut ast = Ast::new();

    // fn a() { b() } -- b is defined later in source order
    let call_args = ast.call_params(vec![], Span::point(2, 6));
    let call = ast.fct_call("b", call_args, Span::point(2, 5));
    let a_params = ast.param_lst(vec![], Span::point(1, 5));
    let a_body = ast.logic(vec![call], Span::point(2, 1));
    let a_def = ast.fct_def("a", a_params, a_body, Span::point(1, 1));

    let b_params = ast.param_lst(vec![], Span::point(4, 5));
    let b_body = ast.logic(vec![], Span::point(4, 8));
    let b_def = ast.fct_def("b", b_params, b_body, Span::point(4, 1));

    let root = ast.entry(vec![a_def, b_def], Span::point(1, 1));

    let error = lower(&ast, root, "demo").expect_err("lowering should fail");
    assert!(matches!(error, LowerError::UndefinedFunction { .. }));

    let mut reporter = DiagnosticReporter::new();
    reporter.add(lower_error_to_diagnostic(&error));

    assert!(reporter.has_errors());
    let report = reporter.report();
    assert!(report.contains("undefined function `b`"));
    assert!(report.contains("2:5"));
}

#[test]
fn test_dump_stable_across_runs() {
    let mut first_ast = Ast::new();
    let first_root = foo_then_call(&mut first_ast);
    let first = lower(&first_ast, first_root, "demo").expect("lowering failed");

    let mut second_ast = Ast::new();
    let second_root = foo_then_call(&mut second_ast);
    let second = lower(&second_ast, second_root, "demo").expect("lowering failed");

    assert_eq!(
        dump_module(&first, &first_ast),
        dump_module(&second, &second_ast)
    );
}

#[test]
fn test_failed_lowering_produces_no_module() {
    let mut ast = Ast::new();

    // print inside a function body, then a call to a function that does
    // not exist -- the caller gets an error, not a half-built module
    let call_args = ast.call_params(vec![], Span::point(1, 9));
    let call = ast.fct_call("ghost", call_args, Span::point(1, 1));
    let root = ast.entry(vec![call], Span::point(1, 1));

    assert!(lower(&ast, root, "demo").is_err());
}
