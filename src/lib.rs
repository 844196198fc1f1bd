//! # Introduction
//!
//! cfront is the front end of a compiler for a restricted subset of C: a
//! scanner that turns source text into tokens, and a recursive-descent parser
//! that turns tokens into an AST anchored on the program's `main` function.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Tokens → Parser → Program (+ diagnostics)
//! ```
//!
//! 1. [`scan`]: tokenises the source. Lexical problems are collected as
//!    [`LexError`]s; scanning always reaches the end of the input.
//! 2. [`parse`]: builds a [`Program`] from the tokens. Syntax problems are
//!    collected as [`ParseError`]s; the parser recovers at statement and
//!    declaration boundaries, so one mistake yields one diagnostic.
//!
//! ```
//! let (tokens, lex_errors) = cfront::scan("int main() { return 0; }");
//! let (program, parse_errors) = cfront::parse(&tokens);
//!
//! assert!(lex_errors.is_empty() && parse_errors.is_empty());
//! assert!(program.main.is_some());
//! ```

pub mod parser;

pub use parser::ast::Program;
pub use parser::parse::{parse, ParseError, Parser};
pub use parser::scanner::{scan, LexError, LexErrorKind, ScanOptions, Scanner};
pub use parser::token::{Token, TokenKind};
