use taco_compiler::ast::{dump_ast, BinOp, CmpOp, Expr, LogicOp, Stmt, UnaryOp};
use taco_compiler::lexer::lex;
use taco_compiler::parser::{parse_program, Parsed};

fn parse(source: &str) -> Parsed {
    parse_program(&lex(source))
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let parsed = parse(source);
    assert!(
        parsed.errors.is_empty(),
        "unexpected errors: {:?}",
        parsed.errors
    );
    parsed.statements
}

/// Parses `x = <expr>;` and returns the expression.
fn expr(source: &str) -> Expr {
    let stmts = parse_ok(&format!("x = {};", source));
    match stmts.as_slice() {
        [Stmt::Assign { value, .. }] => value.clone(),
        other => panic!("expected a single assignment, got {:?}", other),
    }
}

fn id(name: &str) -> Box<Expr> {
    Box::new(Expr::Identifier(name.to_string()))
}

fn num(text: &str) -> Box<Expr> {
    Box::new(Expr::Number(text.to_string()))
}

#[test]
fn test_not_binds_tighter_than_and() {
    // !a && b  =>  (!a) && b
    assert_eq!(
        expr("!a && b"),
        Expr::LogicalOp {
            op: LogicOp::And,
            left: Box::new(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: id("a"),
            }),
            right: id("b"),
        }
    );
}

#[test]
fn test_not_binds_looser_than_comparison() {
    // !a < b  =>  !(a < b)
    assert_eq!(
        expr("!a < b"),
        Expr::UnaryOp {
            op: UnaryOp::Not,
            operand: Box::new(Expr::Comparison {
                op: CmpOp::Lt,
                left: id("a"),
                right: id("b"),
            }),
        }
    );
}

#[test]
fn test_double_not() {
    assert_eq!(
        expr("!!a"),
        Expr::UnaryOp {
            op: UnaryOp::Not,
            operand: Box::new(Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: id("a"),
            }),
        }
    );
}

#[test]
fn test_comparisons_chain_left() {
    assert_eq!(
        expr("a < b < c"),
        Expr::Comparison {
            op: CmpOp::Lt,
            left: Box::new(Expr::Comparison {
                op: CmpOp::Lt,
                left: id("a"),
                right: id("b"),
            }),
            right: id("c"),
        }
    );
}

#[test]
fn test_arithmetic_precedence_and_associativity() {
    // 10 - 5 + 3 * 2  =>  (10 - 5) + (3 * 2)
    assert_eq!(
        expr("10 - 5 + 3 * 2"),
        Expr::BinaryOp {
            op: BinOp::Add,
            left: Box::new(Expr::BinaryOp {
                op: BinOp::Sub,
                left: num("10"),
                right: num("5"),
            }),
            right: Box::new(Expr::BinaryOp {
                op: BinOp::Mul,
                left: num("3"),
                right: num("2"),
            }),
        }
    );
}

#[test]
fn test_or_binds_loosest() {
    // a || b && c  =>  a || (b && c)
    assert_eq!(
        expr("a || b && c"),
        Expr::LogicalOp {
            op: LogicOp::Or,
            left: id("a"),
            right: Box::new(Expr::LogicalOp {
                op: LogicOp::And,
                left: id("b"),
                right: id("c"),
            }),
        }
    );
}

#[test]
fn test_parentheses_and_unary_minus() {
    assert_eq!(
        expr("-(a + 1) % 3"),
        Expr::BinaryOp {
            op: BinOp::Mod,
            left: Box::new(Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::BinaryOp {
                    op: BinOp::Add,
                    left: id("a"),
                    right: num("1"),
                }),
            }),
            right: num("3"),
        }
    );
}

#[test]
fn test_boolean_literals() {
    assert_eq!(
        expr("true || false"),
        Expr::LogicalOp {
            op: LogicOp::Or,
            left: Box::new(Expr::Bool(true)),
            right: Box::new(Expr::Bool(false)),
        }
    );
}

#[test]
fn test_terminators_are_optional() {
    let stmts = parse_ok("x = 1 y = 2; print(x) print(y);");
    assert_eq!(stmts.len(), 4);
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let stmts = parse_ok("if (a) if (b) print(1); else print(2);");
    match stmts.as_slice() {
        [Stmt::If {
            then_branch,
            else_branch: None,
            ..
        }] => assert!(matches!(
            then_branch.as_ref(),
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        )),
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_for_header_parts_are_optional() {
    let stmts = parse_ok("for (;;) { print(1); }");
    assert!(matches!(
        stmts.as_slice(),
        [Stmt::For {
            init: None,
            condition: None,
            update: None,
            ..
        }]
    ));

    let stmts = parse_ok("for (i = 0; i < 3; i = i + 1) print(i);");
    match stmts.as_slice() {
        [Stmt::For {
            init: Some(init),
            condition: Some(_),
            update: Some(update),
            body,
        }] => {
            assert!(matches!(init.as_ref(), Stmt::Assign { target, .. } if target == "i"));
            assert!(matches!(update.as_ref(), Stmt::Assign { target, .. } if target == "i"));
            assert!(matches!(body.as_ref(), Stmt::Print(_)));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_missing_paren_resyncs_at_next_statement() {
    let parsed = parse("x = 1;\nprint(x;\ny = 2;");
    assert_eq!(parsed.statements.len(), 2);
    assert_eq!(parsed.errors.len(), 1);
    let error = &parsed.errors[0];
    assert_eq!(error.line, 2);
    assert_eq!(error.column, 8);
    assert!(error.message.contains("Expected ')'"), "{}", error.message);
    assert!(matches!(&parsed.statements[1], Stmt::Assign { target, .. } if target == "y"));
}

#[test]
fn test_one_malformed_statement_among_many() {
    let parsed = parse("a = 1; b = 2; c = ; d = 4; e = 5;");
    // `c = ;` fails at `;`, which is then skipped.
    assert_eq!(parsed.statements.len(), 4);
    assert_eq!(parsed.errors.len(), 1);
    assert!(parsed.errors[0].to_string().starts_with("line 1, column 19:"));
}

#[test]
fn test_errors_inside_block_keep_the_block() {
    let parsed = parse("{ x = 1; ) y = 3; }");
    assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
    match parsed.statements.as_slice() {
        [Stmt::Block(inner)] => assert_eq!(inner.len(), 2),
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_unclosed_block_reports_at_end_of_input() {
    let parsed = parse("{ x = 1;");
    assert!(parsed.statements.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert!(parsed.errors[0].message.contains("end of input"));
}

#[test]
fn test_empty_program() {
    let parsed = parse("  // nothing here\n");
    assert!(parsed.statements.is_empty());
    assert!(!parsed.has_errors());
}

#[test]
fn test_ast_dump() {
    let stmts = parse_ok("if (x > 0) { print(x); } else y = -x;");
    insta::assert_snapshot!(dump_ast(&stmts), @r###"
    If
      Condition
        Comparison: >
          Identifier: x
          Number: 0
      Then
        Block
          Print
            Identifier: x
      Else
        Assignment: y
          UnaryOp: -
            Identifier: x
    "###);
}
