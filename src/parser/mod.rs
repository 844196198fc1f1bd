//! C source code front end
//!
//! This module transforms C source text into an Abstract Syntax Tree (AST):
//! - [`scanner`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across the private
//!   `declarations`, `statements` and `expressions` rule modules
//! - [`ast`]: AST node definitions
//! - [`token`] and [`constants`]: the token model and its vocabulary tables
//!
//! # Supported C Subset
//!
//! - Types: the primitive type keywords, alone or combined (`unsigned long`),
//!   and fixed-size arrays
//! - Declarations: globals, prototypes, function definitions, exactly one `main`
//! - Statements: local declarations, `if`/`else`, `while`, `do-while`, `for`,
//!   `return`, `break`, `continue`, blocks, expression statements
//! - Expressions: assignment (plain and compound), ternary, logical, bitwise,
//!   relational, shift, arithmetic, prefix/postfix unary, calls, indexing,
//!   member access
//! - No preprocessor, structs, pointers in declarations, `switch` or `goto`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod constants;
mod declarations;
mod expressions;
pub mod parse;
pub mod scanner;
mod statements;
pub mod token;
