//! Scanner (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. Scanning never stops early: malformed input is recorded as a
//! [`LexError`], a best-effort token is still emitted, and the sequence always
//! ends with exactly one [`TokenKind::Eof`].

use super::ast::SourceLocation;
use super::constants::{is_keyword, DELIMITERS, MULTI_CHAR_OPERATORS, SINGLE_CHAR_OPERATORS};
use super::token::{Token, TokenKind};

/// What went wrong while scanning
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated multi-line comment")]
    UnterminatedComment,
    #[error("Invalid character literal")]
    InvalidCharLiteral,
    #[error("Invalid number format")]
    InvalidNumber,
    #[error("Invalid exponent in number")]
    InvalidExponent,
}

/// Lexical error, positioned at the start of the offending token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Error at {line}:{column}: {kind}",
    line = .location.line,
    column = .location.column
)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

/// Scanner configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Emit each run of whitespace as a [`TokenKind::Whitespace`] token
    pub keep_whitespace: bool,
}

/// Scanner for C source code
pub struct Scanner {
    input: Vec<char>,
    position: usize,
    line: usize,
    line_start: usize,
    options: ScanOptions,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

/// Scan `source` with default options.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn scan(source: &str) -> (Vec<Token>, Vec<LexError>) {
    Scanner::new(source).scan()
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self::with_options(source, ScanOptions::default())
    }

    pub fn with_options(source: &str, options: ScanOptions) -> Self {
        Self {
            input: source.chars().collect(),
            position: 0,
            line: 1,
            line_start: 0,
            options,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn scan(mut self) -> (Vec<Token>, Vec<LexError>) {
        while let Some(ch) = self.peek() {
            let loc = self.current_location();
            if let Some(token) = self.next_token(ch, loc) {
                self.tokens.push(token);
            }
        }

        self.tokens.push(Token::eof(self.current_location()));

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scan complete"
        );

        (self.tokens, self.errors)
    }

    /// Scan one token starting at `ch`. Returns `None` for whitespace that is
    /// not being kept.
    fn next_token(&mut self, ch: char, loc: SourceLocation) -> Option<Token> {
        if ch.is_whitespace() {
            return self.whitespace(loc);
        }

        let token = match ch {
            '/' if self.peek_ahead(1) == Some('/') => self.line_comment(loc),
            '/' if self.peek_ahead(1) == Some('*') => self.block_comment(loc),
            c if c.is_alphabetic() || c == '_' => self.identifier_or_keyword(loc),
            c if c.is_ascii_digit() => self.number_literal(loc),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(loc)
            }
            '"' => self.string_literal(loc),
            '\'' => self.char_literal(loc),
            _ => match self.operator_or_delimiter(loc) {
                Some(token) => token,
                None => {
                    // Always advance past the offending character
                    self.advance();
                    self.error(LexErrorKind::UnexpectedCharacter(ch), loc);
                    Token::new(TokenKind::Unknown, ch.to_string(), loc)
                }
            },
        };

        Some(token)
    }

    fn whitespace(&mut self, loc: SourceLocation) -> Option<Token> {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }

        self.options
            .keep_whitespace
            .then(|| Token::new(TokenKind::Whitespace, self.text_from(start), loc))
    }

    /// Line comment (// ...), ending before the newline
    fn line_comment(&mut self, loc: SourceLocation) -> Token {
        let start = self.position;
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }

        let text = self.text_from(start);
        Token::new(TokenKind::Comment, text.trim_end_matches('\r'), loc)
    }

    /// Block comment (/* ... */)
    fn block_comment(&mut self, loc: SourceLocation) -> Token {
        let start = self.position;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        loop {
            match self.peek() {
                None => {
                    self.error(LexErrorKind::UnterminatedComment, loc);
                    break;
                }
                Some('*') if self.peek_ahead(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        Token::new(TokenKind::Comment, self.text_from(start), loc)
    }

    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Token {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = self.text_from(start);
        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, loc)
    }

    /// Numeric literal: digits, optional `.digits`, optional exponent
    fn number_literal(&mut self, loc: SourceLocation) -> Token {
        let start = self.position;
        self.skip_digits();

        if self.peek() == Some('.') {
            self.advance();
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.skip_digits();
            } else {
                self.error(LexErrorKind::InvalidNumber, loc);
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.skip_digits();
            } else {
                self.error(LexErrorKind::InvalidExponent, loc);
            }
        }

        Token::new(TokenKind::Number, self.text_from(start), loc)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// String literal. A raw newline or end of input before the closing quote
    /// leaves the partial value as the token text.
    fn string_literal(&mut self, loc: SourceLocation) -> Token {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString, loc);
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => value.push(unescape(escaped)),
                        None => {
                            self.error(LexErrorKind::UnterminatedString, loc);
                            break;
                        }
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Token::new(TokenKind::StringLiteral, value, loc)
    }

    /// Character literal: exactly one character or escape between quotes
    fn char_literal(&mut self, loc: SourceLocation) -> Token {
        self.advance(); // opening quote

        let value = match self.peek() {
            None | Some('\n') => {
                self.error(LexErrorKind::InvalidCharLiteral, loc);
                return Token::new(TokenKind::CharLiteral, "", loc);
            }
            Some('\'') => {
                // ''
                self.advance();
                self.error(LexErrorKind::InvalidCharLiteral, loc);
                return Token::new(TokenKind::CharLiteral, "", loc);
            }
            Some('\\') => {
                self.advance();
                match self.peek() {
                    Some(escaped) if escaped != '\n' => {
                        self.advance();
                        unescape(escaped)
                    }
                    _ => {
                        self.error(LexErrorKind::InvalidCharLiteral, loc);
                        return Token::new(TokenKind::CharLiteral, "", loc);
                    }
                }
            }
            Some(ch) => {
                self.advance();
                ch
            }
        };

        if self.peek() == Some('\'') {
            self.advance();
        } else {
            self.error(LexErrorKind::InvalidCharLiteral, loc);
            // Skip the rest of a multi-character literal on this line
            while self.peek().is_some_and(|c| c != '\'' && c != '\n') {
                self.advance();
            }
            if self.peek() == Some('\'') {
                self.advance();
            }
        }

        Token::new(TokenKind::CharLiteral, value.to_string(), loc)
    }

    /// Operators by longest match, then single-character operators, then
    /// delimiters.
    fn operator_or_delimiter(&mut self, loc: SourceLocation) -> Option<Token> {
        if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| self.looking_at(op)) {
            for _ in 0..op.len() {
                self.advance();
            }
            return Some(Token::new(TokenKind::Operator, *op, loc));
        }

        let ch = self.peek()?;
        let kind = if SINGLE_CHAR_OPERATORS.contains(&ch) {
            TokenKind::Operator
        } else if DELIMITERS.contains(&ch) {
            TokenKind::Delimiter
        } else {
            return None;
        };

        self.advance();
        Some(Token::new(kind, ch.to_string(), loc))
    }

    fn looking_at(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_ahead(i) == Some(c))
    }

    fn error(&mut self, kind: LexErrorKind, location: SourceLocation) {
        self.errors.push(LexError { kind, location });
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.line_start = self.position;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.position - self.line_start + 1)
    }
}

/// Resolve the character after a backslash. Unknown escapes pass the
/// character through unchanged.
fn unescape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0C',
        'v' => '\x0B',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        tokens.into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds_and_text("int main() { return 0; }");
        let expected = [
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
        ];

        assert_eq!(tokens.len(), expected.len());
        for ((kind, text), (want_kind, want_text)) in tokens.iter().zip(expected) {
            assert_eq!(*kind, want_kind);
            assert_eq!(text, want_text);
        }
    }

    #[test]
    fn test_operators() {
        let tokens = kinds_and_text("++ -- += -= == != && || <<= >>= -> << ,");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();

        assert_eq!(
            texts,
            ["++", "--", "+=", "-=", "==", "!=", "&&", "||", "<<=", ">>=", "->", "<<", ",", ""]
        );
        assert!(tokens[..13].iter().all(|(k, _)| *k == TokenKind::Operator));
    }

    #[test]
    fn test_longest_match_without_spaces() {
        let tokens = kinds_and_text("a<<=b>=c");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, ["a", "<<=", "b", ">=", "c", ""]);
    }

    #[test]
    fn test_comments_are_tokens() {
        let tokens = kinds_and_text("int x; // comment\nint y; /* block\ncomment */ int z;");

        assert_eq!(tokens[3], (TokenKind::Comment, "// comment".to_string()));
        assert_eq!(
            tokens[7],
            (TokenKind::Comment, "/* block\ncomment */".to_string())
        );
        assert_eq!(tokens[8], (TokenKind::Keyword, "int".to_string()));
    }

    #[test]
    fn test_positions() {
        let (tokens, _) = scan("int x;\n  y = 1;\n/* a\nb */ z");

        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[5].location, SourceLocation::new(2, 7));
        // block comment starts on line 3, the identifier after it is on line 4
        assert_eq!(tokens[7].location, SourceLocation::new(3, 1));
        assert_eq!(tokens[8].location, SourceLocation::new(4, 6));
    }

    #[test]
    fn test_string_literal() {
        let tokens = kinds_and_text(r#""hello\nworld\q""#);
        assert_eq!(
            tokens[0],
            (TokenKind::StringLiteral, "hello\nworldq".to_string())
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, errors) = scan("\"abc");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(errors[0].to_string(), "Error at 1:1: Unterminated string literal");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_string_stops_at_newline() {
        let (tokens, errors) = scan("\"abc\nx");

        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].location, SourceLocation::new(2, 1));
    }

    #[test]
    fn test_char_literals() {
        let tokens = kinds_and_text(r"'a' '\n' '\''");
        assert_eq!(tokens[0], (TokenKind::CharLiteral, "a".to_string()));
        assert_eq!(tokens[1], (TokenKind::CharLiteral, "\n".to_string()));
        assert_eq!(tokens[2], (TokenKind::CharLiteral, "'".to_string()));
    }

    #[test]
    fn test_invalid_char_literal_reports_once() {
        let (tokens, errors) = scan("'ab' x");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidCharLiteral);
        assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds_and_text("42 3.14 .5 1e10 2.5E-3");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, ["42", "3.14", ".5", "1e10", "2.5E-3", ""]);
        assert!(tokens[..5].iter().all(|(k, _)| *k == TokenKind::Number));
    }

    #[test]
    fn test_malformed_numbers() {
        let (tokens, errors) = scan("1. 2e+");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidNumber);
        assert_eq!(errors[1].kind, LexErrorKind::InvalidExponent);
        assert_eq!(tokens[0].text, "1.");
        assert_eq!(tokens[1].text, "2e+");
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = scan("a @ b");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Error at 1:3: Unexpected character '@'");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].text, "b");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, errors) = scan("x /* never closed");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedComment);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text, "/* never closed");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keep_whitespace() {
        let options = ScanOptions {
            keep_whitespace: true,
        };
        let (tokens, errors) = Scanner::with_options("a  \n b", options).scan();

        assert!(errors.is_empty());
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].text, "  \n ");
        assert_eq!(tokens[2].location, SourceLocation::new(2, 2));
    }

    #[test]
    fn test_empty_input() {
        let (tokens, errors) = scan("");
        assert!(errors.is_empty());
        assert_eq!(tokens, vec![Token::eof(SourceLocation::new(1, 1))]);
    }
}
