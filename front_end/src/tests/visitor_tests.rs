use crate::ast::{Ast, NodeId, NodeKind};
use crate::span::Span;
use crate::types::Type;
use crate::visitor::{self, AstVisitor};

/// Counts how many nodes of each interesting kind the dispatcher reaches
struct KindCounter {
    entries: usize,
    fct_defs: usize,
    params: usize,
    prints: usize,
    calls: usize,
    literals: usize,
}

impl KindCounter {
    fn new() -> Self {
        Self {
            entries: 0,
            fct_defs: 0,
            params: 0,
            prints: 0,
            calls: 0,
            literals: 0,
        }
    }

    fn visit_children(&mut self, ast: &Ast, children: &[NodeId]) {
        for child in children {
            visitor::visit_node(self, ast, *child);
        }
    }
}

impl AstVisitor for KindCounter {
    type Output = ();

    fn visit_entry(&mut self, ast: &Ast, node: NodeId) {
        self.entries += 1;
        if let NodeKind::Entry { items } = &ast.node(node).kind {
            self.visit_children(ast, items);
        }
    }

    fn visit_fct_def(&mut self, ast: &Ast, node: NodeId) {
        self.fct_defs += 1;
        if let NodeKind::FctDef {
            param_lst, body, ..
        } = &ast.node(node).kind
        {
            let (param_lst, body) = (*param_lst, *body);
            visitor::visit_node(self, ast, param_lst);
            visitor::visit_node(self, ast, body);
        }
    }

    fn visit_param_lst(&mut self, ast: &Ast, node: NodeId) {
        if let NodeKind::ParamLst { params } = &ast.node(node).kind {
            self.visit_children(ast, params);
        }
    }

    fn visit_param(&mut self, _ast: &Ast, _node: NodeId) {
        self.params += 1;
    }

    fn visit_logic(&mut self, ast: &Ast, node: NodeId) {
        if let NodeKind::Logic { statements } = &ast.node(node).kind {
            self.visit_children(ast, statements);
        }
    }

    fn visit_print_call(&mut self, ast: &Ast, node: NodeId) {
        self.prints += 1;
        if let NodeKind::PrintCall { arg } = &ast.node(node).kind {
            let arg = *arg;
            visitor::visit_node(self, ast, arg);
        }
    }

    fn visit_fct_call(&mut self, ast: &Ast, node: NodeId) {
        self.calls += 1;
        if let NodeKind::FctCall { call_params, .. } = &ast.node(node).kind {
            let call_params = *call_params;
            visitor::visit_node(self, ast, call_params);
        }
    }

    fn visit_call_params(&mut self, ast: &Ast, node: NodeId) {
        if let NodeKind::CallParams { args } = &ast.node(node).kind {
            self.visit_children(ast, args);
        }
    }

    fn visit_return(&mut self, ast: &Ast, node: NodeId) {
        if let NodeKind::Return { value: Some(value) } = &ast.node(node).kind {
            let value = *value;
            visitor::visit_node(self, ast, value);
        }
    }

    fn visit_int_literal(&mut self, _ast: &Ast, _node: NodeId) {
        self.literals += 1;
    }

    fn visit_string_literal(&mut self, _ast: &Ast, _node: NodeId) {
        self.literals += 1;
    }

    fn visit_var_ref(&mut self, _ast: &Ast, _node: NodeId) {}
}

fn sample_program(ast: &mut Ast) -> NodeId {
    // fn foo(x) { print x }
    // foo(1)
    let param = ast.param("x", Type::Int, Span::point(1, 8));
    let params = ast.param_lst(vec![param], Span::point(1, 7));
    let arg = ast.var_ref("x", Span::point(2, 11));
    let print = ast.print_call(arg, Span::point(2, 5));
    let body = ast.logic(vec![print], Span::point(2, 1));
    let def = ast.fct_def("foo", params, body, Span::point(1, 1));

    let one = ast.int_literal(1, Span::point(4, 5));
    let call_params = ast.call_params(vec![one], Span::point(4, 4));
    let call = ast.fct_call("foo", call_params, Span::point(4, 1));

    ast.entry(vec![def, call], Span::point(1, 1))
}

#[test]
fn test_dispatch_reaches_every_node_once() {
    let mut ast = Ast::new();
    let root = sample_program(&mut ast);

    let mut counter = KindCounter::new();
    visitor::visit_node(&mut counter, &ast, root);

    assert_eq!(counter.entries, 1);
    assert_eq!(counter.fct_defs, 1);
    assert_eq!(counter.params, 1);
    assert_eq!(counter.prints, 1);
    assert_eq!(counter.calls, 1);
    assert_eq!(counter.literals, 1);
}

#[test]
fn test_dispatch_on_lone_expression() {
    let mut ast = Ast::new();
    let lit = ast.int_literal(9, Span::point(1, 1));

    let mut counter = KindCounter::new();
    visitor::visit_node(&mut counter, &ast, lit);

    assert_eq!(counter.literals, 1);
    assert_eq!(counter.entries, 0);
}
