//! Edge case tests for ferritec-par

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, ExprKind, Stmt, Visibility};
    use crate::parse;
    use ferritec_util::Handler;

    fn parse_ok(source: &str) -> crate::ast::ParsedFile {
        let handler = Handler::new();
        let file = parse(source, &handler);
        assert!(!handler.has_errors(), "unexpected parse errors in: {source}");
        file
    }

    #[test]
    fn empty_source_parses_to_empty_body() {
        let file = parse_ok("");
        assert!(file.body.is_empty());
    }

    #[test]
    fn whitespace_only_source() {
        let file = parse_ok("   \n\t  \n  ");
        assert!(file.body.is_empty());
    }

    #[test]
    fn module_and_imports_at_head() {
        let file = parse_ok("module geometry; import std::io; import std::math as m;");
        assert_eq!(file.module_name.unwrap().as_str(), "geometry");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[1].alias.unwrap().as_str(), "m");
    }

    #[test]
    fn let_with_type_and_value() {
        let file = parse_ok("let x: int32 = 5;");
        match &file.body[0] {
            Stmt::VariableDeclaration { name, ty, value, .. } => {
                assert_eq!(name.as_str(), "x");
                assert!(ty.is_some());
                assert!(value.is_some());
            }
            _ => panic!("expected variable declaration"),
        }
    }

    #[test]
    fn const_without_initializer_is_an_error() {
        let handler = Handler::new();
        let _ = parse("const x: int32;", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn missing_type_and_value_is_an_error() {
        let handler = Handler::new();
        let _ = parse("let x;", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn precedence_additive_vs_multiplicative() {
        let file = parse_ok("let x = 1 + 2 * 3;");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            match &v.kind {
                ExprKind::Binary { op: BinOp::Add, right, .. } => {
                    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
                }
                _ => panic!("expected top-level add"),
            }
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn exponent_is_right_associative() {
        let file = parse_ok("let x = a ^^ b ^^ c;");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            match &v.kind {
                ExprKind::Binary { op: BinOp::Exp, right, .. } => {
                    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Exp, .. }));
                }
                _ => panic!("expected exponent"),
            }
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn unary_minus_vs_binary_minus() {
        let file = parse_ok("let x = -a - b;");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            match &v.kind {
                ExprKind::Binary { left, op: BinOp::Sub, .. } => {
                    assert!(matches!(left.kind, ExprKind::Prefix { .. }));
                }
                _ => panic!("expected binary minus at top level"),
            }
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn function_call_and_index_chain() {
        let file = parse_ok("let x = a.b.c(1, 2)[3];");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            assert!(matches!(v.kind, ExprKind::Index { .. }));
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn aggregate_literal_suppressed_in_if_condition() {
        let file = parse_ok("if (x) { let y = 1; }");
        assert!(matches!(file.body[0], Stmt::If { .. }));
    }

    #[test]
    fn aggregate_instantiation_parses_fields() {
        let file = parse_ok("let p = Point { x = 1, y = 2 };");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            match &v.kind {
                ExprKind::AggregateInstantiation { name, fields, .. } => {
                    assert_eq!(name.as_str(), "Point");
                    assert_eq!(fields.len(), 2);
                }
                _ => panic!("expected aggregate instantiation"),
            }
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn duplicate_aggregate_fields_reported() {
        let handler = Handler::new();
        let _ = parse("let p = Point { x = 1, x = 2 };", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn function_declaration_with_params_and_return() {
        let file = parse_ok("func add(a: int32, b: int32) -> int32 { return a + b; }");
        match &file.body[0] {
            Stmt::FunctionDeclaration { name, params, return_type, .. } => {
                assert_eq!(name.as_str(), "add");
                assert_eq!(params.len(), 2);
                assert!(return_type.is_some());
            }
            _ => panic!("expected function declaration"),
        }
    }

    #[test]
    fn duplicate_parameters_reported() {
        let handler = Handler::new();
        let _ = parse("func f(a: int32, a: int32) {}", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn if_elif_else_chain() {
        let file = parse_ok("if (a) { } elif (b) { } else { }");
        match &file.body[0] {
            Stmt::If { elif_branches, else_branch, .. } => {
                assert_eq!(elif_branches.len(), 1);
                assert!(else_branch.is_some());
            }
            _ => panic!("expected if"),
        }
    }

    #[test]
    fn do_while_requires_trailing_semicolon() {
        let file = parse_ok("do { x = x + 1; } while (x < 10);");
        assert!(matches!(
            file.body[0],
            Stmt::WhileLoop { is_do_while: true, .. }
        ));
    }

    #[test]
    fn repeat_loop() {
        let file = parse_ok("repeat (5) { }");
        assert!(matches!(file.body[0], Stmt::RepeatLoop { .. }));
    }

    #[test]
    fn switch_with_default() {
        let file = parse_ok("switch (x) { case 1: break; default: break; }");
        match &file.body[0] {
            Stmt::Switch { cases, default, .. } => {
                assert_eq!(cases.len(), 1);
                assert!(default.is_some());
            }
            _ => panic!("expected switch"),
        }
    }

    #[test]
    fn aggregate_declaration_with_fields() {
        let file = parse_ok("aggregate Point { x: int32; y: int32; }");
        match &file.body[0] {
            Stmt::AggregateDeclaration { name, fields, .. } => {
                assert_eq!(name.as_str(), "Point");
                assert_eq!(fields.len(), 2);
            }
            _ => panic!("expected aggregate declaration"),
        }
    }

    #[test]
    fn enum_declaration_default_base_type() {
        let file = parse_ok("enum Color { Red, Green, Blue }");
        match &file.body[0] {
            Stmt::EnumDeclaration { values, .. } => {
                assert_eq!(values.len(), 3);
            }
            _ => panic!("expected enum declaration"),
        }
    }

    #[test]
    fn alias_declaration() {
        let file = parse_ok("alias int32 as MyInt;");
        match &file.body[0] {
            Stmt::Alias { name, .. } => assert_eq!(name.as_str(), "MyInt"),
            _ => panic!("expected alias"),
        }
    }

    #[test]
    fn visibility_qualified_function() {
        let file = parse_ok("public func f() {}");
        match &file.body[0] {
            Stmt::FunctionDeclaration { visibility, .. } => {
                assert_eq!(*visibility, Visibility::Public);
            }
            _ => panic!("expected function declaration"),
        }
    }

    #[test]
    fn pointer_and_array_types() {
        let file = parse_ok("let p: ptr int32 = 0 as ptr int32; let a: int32[3] = [1, 2, 3];");
        assert_eq!(file.body.len(), 2);
    }

    #[test]
    fn generic_function_call() {
        let file = parse_ok("let x = foo@[int32](1);");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            assert!(matches!(v.kind, ExprKind::FunctionCall { .. }));
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn for_is_reserved_but_reported() {
        let handler = Handler::new();
        let _ = parse("for (x) { }", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn blueprint_is_reserved_but_reported() {
        let handler = Handler::new();
        let _ = parse("blueprint Foo { }", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn module_not_at_head_is_reported() {
        let handler = Handler::new();
        let _ = parse("let x = 1; module foo;", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn empty_block_warns_not_errors() {
        let handler = Handler::new();
        let _ = parse("func f() {}", &handler);
        assert!(!handler.has_errors());
        assert!(handler.has_warnings());
    }

    #[test]
    fn compound_assignment() {
        let file = parse_ok("x += 1;");
        if let Stmt::ExpressionStatement(e) = &file.body[0] {
            assert!(matches!(
                e.kind,
                ExprKind::Assignment { op: Some(BinOp::Add), .. }
            ));
        } else {
            panic!("expected expression statement");
        }
    }

    #[test]
    fn scope_resolution() {
        let file = parse_ok("let x = Module::Item;");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            assert!(matches!(v.kind, ExprKind::ScopeResolution { .. }));
        } else {
            panic!("expected let");
        }
    }

    #[test]
    fn parser_recovers_after_error() {
        let handler = Handler::new();
        let file = parse("let ; let y = 2;", &handler);
        assert!(handler.has_errors());
        assert!(!file.body.is_empty());
    }

    #[test]
    fn unterminated_block_reports_error_not_panic() {
        let handler = Handler::new();
        let _ = parse("func main() { let x = 1;", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn nested_blocks() {
        let file = parse_ok(
            "func main() { if (a) { while (b) { repeat (c) { let x = 1; } } } }",
        );
        assert_eq!(file.body.len(), 1);
    }

    #[test]
    fn unbalanced_parens_reported() {
        let handler = Handler::new();
        let _ = parse("let x = foo((1, 2);", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn complex_expression_grouping() {
        let file = parse_ok("let x = (1 + 2) * (3 - 4) / (5 % 6);");
        if let Stmt::VariableDeclaration { value: Some(v), .. } = &file.body[0] {
            assert!(matches!(v.kind, ExprKind::Binary { op: BinOp::Div, .. }));
        } else {
            panic!("expected let");
        }
    }
}
