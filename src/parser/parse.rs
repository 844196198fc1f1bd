//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! the token cursor, expectation helpers, panic-mode recovery, and the
//! program entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, cursor helpers, recovery, and coordination
//! - `declarations`: top-level and local declarations, the `main` anchor
//! - `statements`: control flow and blocks
//! - `expressions`: expressions with precedence climbing
//!
//! # Error handling
//!
//! Every rule returns [`ParseResult`]. A failed expectation records a
//! [`ParseError`] in the parser's error list and returns it as `Err`; the
//! error then propagates with `?` to the nearest recovery point (the block
//! statement loop or the top-level declaration loop), which skips ahead with
//! [`Parser::synchronize`] and carries on. Parsing therefore always produces a
//! [`Program`], and the error list says whether it is valid.

use crate::parser::ast::*;
use crate::parser::constants::{is_primitive_type, MAX_NESTING_DEPTH, STATEMENT_KEYWORDS};
use crate::parser::token::{Token, TokenKind};

/// Syntax error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Syntax error at {line}:{column} — {message}",
    line = .location.line,
    column = .location.column
)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Parse a token sequence into a [`Program`] plus every syntax error found.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.into_errors())
}

/// Recursive descent parser for the C subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) errors: Vec<ParseError>,
    /// Current nesting of statements and sub-expressions
    depth: usize,
    /// Returned by `lookahead` past the end of `tokens`
    eof: Token,
}

impl Parser {
    /// Create a parser over `tokens`. Comments and whitespace are dropped here,
    /// once.
    pub fn new(tokens: &[Token]) -> Self {
        let tokens: Vec<Token> = tokens
            .iter()
            .filter(|t| !t.is_trivia())
            .cloned()
            .collect();
        let eof_location = tokens
            .last()
            .map(|t| t.location)
            .unwrap_or_else(|| SourceLocation::new(1, 1));

        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
            depth: 0,
            eof: Token::eof(eof_location),
        }
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Program {
        let program = self.parse_translation_unit();

        tracing::debug!(
            pre_main = program.pre_main.len(),
            has_main = program.main.is_some(),
            post_main = program.post_main.len(),
            errors = self.errors.len(),
            "parse complete"
        );

        program
    }

    /// Syntax errors recorded so far
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    // ===== Cursor =====

    /// Token `offset` places ahead of the cursor, or a synthetic end-of-input
    /// token past the end.
    pub(crate) fn lookahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.position + offset).unwrap_or(&self.eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        self.lookahead(0)
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Advance past the current token and return it; `None` at the end.
    pub(crate) fn consume(&mut self) -> Option<Token> {
        if self.is_at_end() {
            return None;
        }
        let token = self.tokens[self.position].clone();
        self.position += 1;
        Some(token)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    // ===== Probes =====

    fn check(&self, kind: TokenKind, text: &str) -> bool {
        !self.is_at_end() && self.peek().is(kind, text)
    }

    pub(crate) fn check_keyword(&self, keyword: &str) -> bool {
        self.check(TokenKind::Keyword, keyword)
    }

    pub(crate) fn check_delimiter(&self, delimiter: char) -> bool {
        let mut buf = [0u8; 4];
        self.check(TokenKind::Delimiter, delimiter.encode_utf8(&mut buf))
    }

    pub(crate) fn check_operator(&self, op: &str) -> bool {
        self.check(TokenKind::Operator, op)
    }

    /// Map the current operator token through `lookup` without consuming it
    pub(crate) fn peek_operator<T>(&self, lookup: impl Fn(&str) -> Option<T>) -> Option<T> {
        let token = self.peek();
        if token.kind == TokenKind::Operator {
            lookup(&token.text)
        } else {
            None
        }
    }

    /// A declaration begins with a primitive type keyword
    pub(crate) fn is_declaration_start(&self) -> bool {
        self.is_type_keyword_at(0)
    }

    pub(crate) fn is_type_keyword_at(&self, offset: usize) -> bool {
        let token = self.lookahead(offset);
        token.kind == TokenKind::Keyword && is_primitive_type(&token.text)
    }

    /// Type keywords, then the `main` keyword, then `(`
    pub(crate) fn is_main_ahead(&self) -> bool {
        let mut offset = 0;
        while self.is_type_keyword_at(offset) {
            offset += 1;
        }

        offset > 0
            && self.lookahead(offset).is(TokenKind::Keyword, "main")
            && self.lookahead(offset + 1).is(TokenKind::Delimiter, "(")
    }

    // ===== Expectations =====

    /// Record a syntax error at `location` and hand it back as the failure
    /// signal.
    pub(crate) fn error_at(
        &mut self,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> ParseError {
        let error = ParseError {
            message: message.into(),
            location,
        };
        self.errors.push(error.clone());
        error
    }

    /// Record a syntax error at the current token
    pub(crate) fn error(&mut self, message: impl Into<String>) -> ParseError {
        let location = self.current_location();
        self.error_at(location, message)
    }

    fn expect(&mut self, kind: TokenKind, text: Option<&str>) -> ParseResult<Token> {
        let wanted = text.unwrap_or("any");

        if self.is_at_end() {
            return Err(self.error(format!("Expected {kind} '{wanted}', got end of input")));
        }

        let token = self.peek();
        if token.kind != kind || text.is_some_and(|t| token.text != t) {
            let message = format!("Expected {kind} '{wanted}', got {token}");
            return Err(self.error(message));
        }

        self.consume()
            .ok_or_else(|| self.error("Unexpected end of input"))
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Keyword, Some(keyword))
    }

    pub(crate) fn expect_delimiter(&mut self, delimiter: char) -> ParseResult<Token> {
        let mut buf = [0u8; 4];
        let text = delimiter.encode_utf8(&mut buf);
        self.expect(TokenKind::Delimiter, Some(text))
    }

    pub(crate) fn expect_operator(&mut self, op: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Operator, Some(op))
    }

    pub(crate) fn expect_identifier(&mut self) -> ParseResult<Token> {
        self.expect(TokenKind::Identifier, None)
    }

    /// Run `rule` one nesting level deeper. Past [`MAX_NESTING_DEPTH`] the
    /// rule is not entered and a syntax error is returned instead.
    pub(crate) fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("Nesting too deep"));
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // ===== Recovery =====

    /// Panic-mode recovery inside statement lists: skip to just past a `;`,
    /// or stop in front of a `}` or a control-flow keyword.
    pub(crate) fn synchronize(&mut self) {
        let start = self.position;

        while !self.is_at_end() {
            let token = self.peek();
            if token.is(TokenKind::Delimiter, ";") {
                self.consume();
                break;
            }
            if token.is(TokenKind::Delimiter, "}") {
                break;
            }
            if token.kind == TokenKind::Keyword
                && STATEMENT_KEYWORDS.contains(&token.text.as_str())
            {
                break;
            }
            self.consume();
        }

        tracing::debug!(
            skipped = self.position - start,
            at = ?self.current_location(),
            "synchronized statement"
        );
    }

    /// Recovery for the top-level loop: skip to the next declaration start at
    /// brace depth zero, or just past a `;` or `}` that leaves depth zero.
    /// A declaration start under the cursor is not consumed, so the caller
    /// must ensure the failed declaration made progress.
    pub(crate) fn synchronize_declaration(&mut self) {
        let start = self.position;
        let mut depth = 0usize;

        while !self.is_at_end() {
            if depth == 0 && self.is_declaration_start() {
                break;
            }

            let Some(token) = self.consume() else {
                break;
            };
            if token.kind != TokenKind::Delimiter {
                continue;
            }
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                ";" if depth == 0 => break,
                _ => {}
            }
        }

        tracing::debug!(
            skipped = self.position - start,
            at = ?self.current_location(),
            "synchronized declaration"
        );
    }
}
