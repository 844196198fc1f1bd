// Integration tests for the scanner and parser

use cfront::parser::ast::*;
use cfront::{parse, scan, ParseError, TokenKind};

fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
    let (tokens, lex_errors) = scan(source);
    assert!(lex_errors.is_empty(), "lexical errors: {:?}", lex_errors);
    parse(&tokens)
}

fn main_body(program: &Program) -> &[Stmt] {
    let main = program.main.as_ref().expect("program should have main");
    &main.body.as_ref().expect("main should have a body").statements
}

#[test]
fn test_minimal_program_tokens() {
    let (tokens, errors) = scan("int main() { return 0; }");
    assert!(errors.is_empty());

    let summary: Vec<(TokenKind, &str)> = tokens
        .iter()
        .map(|t| (t.kind, t.text.as_str()))
        .collect();
    assert_eq!(
        summary,
        [
            (TokenKind::Keyword, "int"),
            (TokenKind::Keyword, "main"),
            (TokenKind::Delimiter, "("),
            (TokenKind::Delimiter, ")"),
            (TokenKind::Delimiter, "{"),
            (TokenKind::Keyword, "return"),
            (TokenKind::Number, "0"),
            (TokenKind::Delimiter, ";"),
            (TokenKind::Delimiter, "}"),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_minimal_program_ast() {
    let (program, errors) = parse_source("int main() { return 0; }");
    assert!(errors.is_empty(), "syntax errors: {:?}", errors);

    let main = program.main.as_ref().expect("main");
    assert_eq!(main.return_type, "int");
    assert!(main.params.is_empty());

    match main_body(&program) {
        [Stmt::Return {
            expr: Some(Expr::Number(value, _)),
            ..
        }] => assert_eq!(value, "0"),
        other => panic!("Expected a single return, got {:?}", other),
    }
}

#[test]
fn test_complete_program() {
    let source = r#"
        /* running total */
        int total = 0;
        int add(int a, int b);

        int main(void) {
            int values[4];
            int i;
            for (i = 0; i < 4; i++) {
                values[i] = add(i, 1) * 2;
            }
            do {
                total += values[--i];
            } while (i > 0);
            if (total >= 20 && !(total % 2)) {
                return total > 100 ? 1 : 0;
            } else {
                return -1;
            }
        }

        // defined after main
        int add(int a, int b) {
            return a + b;
        }
    "#;

    let (program, errors) = parse_source(source);
    assert!(errors.is_empty(), "syntax errors: {:?}", errors);

    assert_eq!(program.pre_main.len(), 2);
    assert_eq!(program.post_main.len(), 1);
    assert_eq!(main_body(&program).len(), 5);

    let names: Vec<&str> = program.functions().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["add", "main", "add"]);
    assert!(program.function("add").is_some_and(|f| f.is_prototype()));
}

#[test]
fn test_expression_precedence_in_program() {
    let (program, errors) = parse_source("int main() { x = 1 + 2 * 3; }");
    assert!(errors.is_empty());

    match main_body(&program) {
        [Stmt::Expression {
            expr: Some(Expr::Assign { rhs, .. }),
            ..
        }] => match rhs.as_ref() {
            Expr::Binary {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(right.as_ref(), Expr::Binary { op: BinOp::Mul, .. })),
            other => panic!("Expected addition, got {:?}", other),
        },
        other => panic!("Expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_dangling_else() {
    let (program, errors) = parse_source("int main() { if (a) if (b) x; else y; }");
    assert!(errors.is_empty());

    match main_body(&program) {
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
        other => panic!("Expected outer if without else, got {:?}", other),
    }
}

#[test]
fn test_recovery_inside_block() {
    let source = "int main() {\n    int a = 1;\n    a = * ;\n    a = 2;\n    return a;\n}";
    let (program, errors) = parse_source(source);

    assert_eq!(errors.len(), 1, "errors: {:?}", errors);
    assert_eq!(errors[0].location.line, 3);

    let body = main_body(&program);
    assert_eq!(body.len(), 3);
    assert!(matches!(body[0], Stmt::VarDecl { .. }));
    assert!(matches!(body[1], Stmt::Expression { .. }));
    assert!(matches!(body[2], Stmt::Return { .. }));
}

#[test]
fn test_missing_main_keeps_declarations() {
    let (program, errors) = parse_source("int x = 1;\nint f(void) { return x; }");

    assert!(program.main.is_none());
    assert_eq!(program.pre_main.len(), 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Program must contain a main function");
}

#[test]
fn test_diagnostic_formats() {
    let (tokens, lex_errors) = scan("int main() {\n  char c = 'ab';\n  x = $;\n}");
    let (_, parse_errors) = parse(&tokens);

    let lex: Vec<String> = lex_errors.iter().map(ToString::to_string).collect();
    assert_eq!(
        lex,
        [
            "Error at 2:12: Invalid character literal",
            "Error at 3:7: Unexpected character '$'",
        ]
    );

    assert_eq!(parse_errors.len(), 1);
    assert_eq!(
        parse_errors[0].to_string(),
        "Syntax error at 3:7 — Expected primary expression, got unknown '$'"
    );
}

#[test]
fn test_unterminated_string_is_single_error() {
    let (tokens, errors) = scan("\"abc");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "Error at 1:1: Unterminated string literal");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].text, "abc");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn test_deeply_parenthesized_return_is_reported() {
    let depth = 2000;
    let source = format!(
        "int main() {{ return {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let (program, errors) = parse_source(&source);

    assert_eq!(errors.len(), 1, "errors: {:?}", errors);
    assert_eq!(errors[0].message, "Nesting too deep");
    assert!(main_body(&program).is_empty());
}

#[test]
fn test_deeply_nested_blocks_are_reported() {
    let depth = 500;
    let source = format!(
        "int main() {{ {}x = 1;{} return 0; }}",
        "{".repeat(depth),
        "}".repeat(depth)
    );
    let (program, errors) = parse_source(&source);

    assert_eq!(errors[0].message, "Nesting too deep");
    assert!(program.main.is_some());
}

#[test]
fn test_comments_do_not_reach_parser() {
    let source = "// header\nint main() { /* inline */ return 0; } // trailer";
    let (tokens, _) = scan(source);
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Comment).count(), 3);

    let (program, errors) = parse(&tokens);
    assert!(errors.is_empty());
    assert_eq!(main_body(&program).len(), 1);
}
