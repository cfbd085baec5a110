//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Let and return statements, and both statement terminators
//! - Operator precedence and associativity
//! - Function literals, calls and `if` expressions
//! - Error reporting and recovery

use std::rc::Rc;

use super::parser::{parse, Parser, MAX_NESTING_DEPTH};
use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{IdentifierExpr, InfixOperator, NumberExpr},
        statements::{ExpressionStmt, LetStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

fn parse_source(source: &str) -> (Program, Vec<Error>) {
    let tokens = tokenize(source.to_string(), Some("test.do".to_string()));
    parse(tokens, Rc::new("test.do".to_string()))
}

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse_source(source);
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", source, errors);
    program
}

fn identifier(name: &str) -> Expr {
    Expr::Identifier(IdentifierExpr {
        name: name.to_string(),
    })
}

fn only_expression(program: &Program) -> &Expr {
    assert_eq!(program.statements.len(), 1, "program: {}", program);
    match &program.statements[0] {
        Stmt::Expression(ExpressionStmt { expression }) => expression,
        other => panic!("Expected an expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_let_statement() {
    let program = parse_ok("let x = 5;");

    assert_eq!(
        program.statements,
        vec![Stmt::Let(LetStmt {
            name: IdentifierExpr {
                name: "x".to_string()
            },
            value: Expr::Number(NumberExpr { value: 5.0 }),
        })]
    );
}

#[test]
fn test_newline_and_semicolon_terminate_alike() {
    let with_semicolon = parse_ok("let x = 5;");
    let with_newline = parse_ok("let x = 5\n");
    let at_end_of_input = parse_ok("let x = 5");

    assert_eq!(with_semicolon, with_newline);
    assert_eq!(with_semicolon, at_end_of_input);
}

#[test]
fn test_parse_return_statement() {
    let program = parse_ok("return x * 2;");

    assert!(matches!(program.statements[0], Stmt::Return(_)));
    assert_eq!(program.to_string(), "return (x * 2)");
}

#[test]
fn test_parse_function_literal() {
    let program = parse_ok("fn(x, y) { x + y }");

    let function = match only_expression(&program) {
        Expr::Function(function) => function,
        other => panic!("Expected a function literal, got {:?}", other),
    };

    let names: Vec<&str> = function
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect();
    assert_eq!(names, vec!["x", "y"]);

    assert_eq!(function.body.body.len(), 1);
    match &function.body.body[0] {
        Stmt::Expression(ExpressionStmt {
            expression: Expr::Infix(infix),
        }) => {
            assert_eq!(infix.operator, InfixOperator::Plus);
            assert_eq!(*infix.left, identifier("x"));
            assert_eq!(*infix.right, identifier("y"));
        }
        other => panic!("Expected an infix expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_function_literal_without_parameters() {
    let program = parse_ok("let noop = fn() { }");

    assert_eq!(program.to_string(), "let noop = fn() { }");
}

#[test]
fn test_parse_function_body_over_lines() {
    let program = parse_ok("let add = fn(a, b) {\n  let sum = a + b\n  return sum\n}\n");

    assert_eq!(
        program.to_string(),
        "let add = fn(a, b) { let sum = (a + b); return sum }"
    );
}

#[test]
fn test_parse_call_expression() {
    let program = parse_ok("add(five, ten);");

    let call = match only_expression(&program) {
        Expr::Call(call) => call,
        other => panic!("Expected a call, got {:?}", other),
    };

    assert_eq!(call.callee.name, "add");
    assert_eq!(call.arguments, vec![identifier("five"), identifier("ten")]);
}

#[test]
fn test_parse_call_without_arguments() {
    let program = parse_ok("now()");

    match only_expression(&program) {
        Expr::Call(call) => assert!(call.arguments.is_empty()),
        other => panic!("Expected a call, got {:?}", other),
    }
}

#[test]
fn test_parse_if_expression() {
    let program = parse_ok("if (x == 2) { y }");

    let if_expr = match only_expression(&program) {
        Expr::If(if_expr) => if_expr,
        other => panic!("Expected an if expression, got {:?}", other),
    };

    match if_expr.condition.as_ref() {
        Expr::Infix(infix) => {
            assert_eq!(infix.operator, InfixOperator::Equals);
            assert_eq!(*infix.left, identifier("x"));
            assert_eq!(*infix.right, Expr::Number(NumberExpr { value: 2.0 }));
        }
        other => panic!("Expected an infix condition, got {:?}", other),
    }
    assert_eq!(
        if_expr.consequence.body,
        vec![Stmt::Expression(ExpressionStmt {
            expression: identifier("y")
        })]
    );
    assert!(if_expr.alternative.is_none());
}

#[test]
fn test_parse_if_else_expression() {
    let program = parse_ok("let max = if (a > b) { a } else { b }");

    assert_eq!(
        program.to_string(),
        "let max = if (a > b) { a } else { b }"
    );
}

#[test]
fn test_else_may_follow_on_the_next_line() {
    let program = parse_ok("if (ok) {\n  1\n}\nelse {\n  2\n}\n");

    match only_expression(&program) {
        Expr::If(if_expr) => assert!(if_expr.alternative.is_some()),
        other => panic!("Expected an if expression, got {:?}", other),
    }
}

#[test]
fn test_else_if_is_rejected() {
    let (program, errors) = parse_source("if (a) { 1 } else if (b) { 2 }");

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::OpenCurly,
            found: TokenKind::If,
            token: "if".to_string(),
        }
    );
}

#[test]
fn test_operator_precedence() {
    let tests = [
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("1 * 2 + 3", "((1 * 2) + 3)"),
        ("-1 * 2", "((-1) * 2)"),
        ("!true", "(!true)"),
        ("!-a", "(!(-a))"),
        ("--a", "(-(-a))"),
        ("a - b - c", "((a - b) - c)"),
        ("a / b * c", "((a / b) * c)"),
        ("a + b % c", "(a + (b % c))"),
        ("a == b != c", "((a == b) != c)"),
        ("x <= y >= z", "((x <= y) >= z)"),
        ("1 < 2 == true", "((1 < 2) == true)"),
        ("1 + 2 < 3 + 4", "((1 + 2) < (3 + 4))"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("(1 + 2) * 3", "((1 + 2) * 3)"),
        ("-(a + b)", "(-(a + b))"),
        ("a + add(b * c, d) * e", "(a + (add((b * c), d) * e))"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("2.5 * 4", "(2.5 * 4)"),
    ];

    for (input, expected) in tests {
        let program = parse_ok(input);
        assert_eq!(program.to_string(), expected, "input: {}", input);
    }
}

#[test]
fn test_parse_strings_and_commands() {
    let program = parse_ok("let greeting = \"hi\\n\"\nlet files = `ls -la`\nfiles");

    assert_eq!(
        program.to_string(),
        "let greeting = \"hi\\n\"\nlet files = `ls -la`\nfiles"
    );
}

#[test]
fn test_parse_booleans() {
    let program = parse_ok("true != false");

    assert_eq!(program.to_string(), "(true != false)");
}

#[test]
fn test_parse_block_statement() {
    let program = parse_ok("{ let x = 1; x }");

    match &program.statements[0] {
        Stmt::Block(block) => assert_eq!(block.body.len(), 2),
        other => panic!("Expected a block statement, got {:?}", other),
    }
}

#[test]
fn test_empty_statements_are_skipped() {
    let (program, errors) = parse_source("\n\n;;  # only a comment\n");

    assert!(program.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_error_isolation() {
    let (program, errors) = parse_source("let = 5; let y = 10;");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
    assert_eq!(errors[0].get_position().0, 4);
    assert_eq!(program.to_string(), "let y = 10");
}

#[test]
fn test_unterminated_string_reports_one_error() {
    let tokens = tokenize("let x = \"abc".to_string(), None);
    let illegal = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Illegal)
        .count();
    assert_eq!(illegal, 1);

    let (program, errors) = parse(tokens, Rc::new("shell".to_string()));

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::IllegalToken {
            token: "\"abc".to_string()
        }
    );
}

#[test]
fn test_missing_prefix_rule() {
    let (_, errors) = parse_source("let x = ;");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "no expression-parsing rule for token `LINEEND`"
    );
}

#[test]
fn test_illegal_token_between_operands() {
    let (_, errors) = parse_source("1 @ 2");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::IllegalToken {
            token: "@".to_string()
        }
    );
}

#[test]
fn test_malformed_number_is_reported() {
    let (_, errors) = parse_source("let x = 1.2.3");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "IllegalToken");
}

#[test]
fn test_missing_terminator() {
    let (program, errors) = parse_source("let x = 5 6\nlet y = 1");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(program.to_string(), "let y = 1");
}

#[test]
fn test_if_requires_parenthesis() {
    let (_, errors) = parse_source("if x { y }");

    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("expected `(` after `if`"));
}

#[test]
fn test_unterminated_block() {
    let (program, errors) = parse_source("let f = fn(x) { x");

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error(), &ErrorImpl::UnterminatedBlock);
}

#[test]
fn test_unclosed_group() {
    let (_, errors) = parse_source("(1 + 2");

    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::CloseParen,
            found: TokenKind::EOF,
            token: "EOF".to_string(),
        }
    );
}

#[test]
fn test_trailing_commas_are_rejected() {
    let (_, errors) = parse_source("add(1, )");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("trailing comma in argument list"));

    let (_, errors) = parse_source("fn(x,) { x }");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("trailing comma in parameter list"));
}

#[test]
fn test_parameters_must_be_identifiers() {
    let (_, errors) = parse_source("fn(1) { }");

    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::Identifier,
            found: TokenKind::Number,
            token: "1".to_string(),
        }
    );
}

#[test]
fn test_function_requires_body() {
    let (_, errors) = parse_source("let f = fn(x) x");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
}

#[test]
fn test_error_inside_block_does_not_cascade() {
    let (program, errors) = parse_source("let f = fn() {\n  let = 1\n  2\n}\nlet z = 3");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let z = 3");
}

#[test]
fn test_every_failed_statement_is_reported() {
    let (program, errors) = parse_source("let = 1\nlet y = 2\nreturn )\nlet z = 3\n}");

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
    assert_eq!(
        errors[1].get_error(),
        &ErrorImpl::NoPrefixRule {
            kind: TokenKind::CloseParen
        }
    );
    assert_eq!(
        errors[2].get_error(),
        &ErrorImpl::NoPrefixRule {
            kind: TokenKind::CloseCurly
        }
    );
    assert_eq!(program.to_string(), "let y = 2\nlet z = 3");
}

#[test]
fn test_empty_token_stream() {
    let (program, errors) = parse(vec![], Rc::new("empty".to_string()));

    assert!(program.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn test_cursor_reads_eof_past_the_end() {
    let tokens = tokenize("x".to_string(), None);
    let mut parser = Parser::new(tokens, Rc::new("shell".to_string()));

    assert_eq!(parser.advance().kind, TokenKind::Identifier);
    assert_eq!(parser.advance().kind, TokenKind::EOF);
    assert_eq!(parser.advance().kind, TokenKind::EOF);
    assert_eq!(parser.current_token_kind(), TokenKind::EOF);
    assert_eq!(parser.peek_token().kind, TokenKind::EOF);
    assert!(!parser.has_tokens());
}

#[test]
fn test_deeply_nested_groups_are_rejected() {
    let source = format!("{}1{}", "(".repeat(3000), ")".repeat(3000));
    let (program, errors) = parse_source(&source);

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        }
    );
}

#[test]
fn test_deeply_nested_prefixes_and_blocks_are_rejected() {
    let (_, errors) = parse_source(&format!("{}1", "-".repeat(5000)));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "NestingTooDeep");

    let (_, errors) = parse_source(&"{".repeat(3000));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "NestingTooDeep");
}

#[test]
fn test_nesting_within_limit_parses() {
    let program = parse_ok(&format!("{}x{}", "(".repeat(100), ")".repeat(100)));
    assert_eq!(program.to_string(), "x");

    let program = parse_ok(&format!("{}{}", "{".repeat(50), "}".repeat(50)));
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_parsing_continues_after_nesting_error() {
    let source = format!("{}1{}\nlet y = 1", "(".repeat(500), ")".repeat(500));
    let (program, errors) = parse_source(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let y = 1");
}

#[test]
fn test_number_too_large_is_rejected() {
    let digits = "9".repeat(400);
    let (program, errors) = parse_source(&format!("let x = {}", digits));

    assert!(program.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::NumberParseError { token: digits }
    );
}

#[test]
fn test_recovery_skips_unclosed_argument_list() {
    let (program, errors) = parse_source("add(1,\n  2)\nlet y = 1");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::NoPrefixRule {
            kind: TokenKind::Semicolon
        }
    );
    assert_eq!(program.to_string(), "let y = 1");

    let (program, errors) = parse_source("add(1; 2)\nlet y = 1");
    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let y = 1");
}

#[test]
fn test_recovery_stops_at_next_statement_after_unclosed_group() {
    let (program, errors) = parse_source("let b = (3\nlet c = 4");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let c = 4");
}
