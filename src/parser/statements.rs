//! Statement parsing implementation
//!
//! This module handles parsing of all C statement types:
//!
//! - Local variable declarations: `int x = 42, y;`
//! - Control flow: `if`, `while`, `do-while`, `for`
//! - Jump statements: `return`, `break`, `continue`
//! - Blocks: `{ ... }`
//! - Expression statements and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl | if_stmt | while_stmt | do_while_stmt | for_stmt
//!             | return_stmt | break_stmt | continue_stmt | block | expr_stmt
//! if_stmt   ::= "if" "(" expr ")" statement ["else" statement]
//! while_stmt ::= "while" "(" expr ")" block
//! do_while_stmt ::= "do" block "while" "(" expr ")" ";"
//! for_stmt  ::= "for" "(" [type*] [expr] ";" [expr] ";" [expr] ")" block
//! ```
//!
//! Loop bodies must be braced. Blocks are the statement-level recovery
//! point: a malformed statement is reported once, skipped, and the rest of the
//! block still parses.

use crate::parser::ast::*;
use crate::parser::parse::{ParseResult, Parser};
use crate::parser::token::TokenKind;

impl Parser {
    /// Parse a block: `{` statement* `}`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let open = self.expect_delimiter('{')?;
        let mut statements = Vec::new();

        while !self.check_delimiter('}') && !self.is_at_end() {
            if let Some(stmt) = self.parse_block_item() {
                statements.push(stmt);
            }
        }

        // At end of input the missing '}' is reported but the statements
        // parsed so far are kept.
        if let Err(err) = self.expect_delimiter('}') {
            tracing::debug!(%err, "block closed by end of input");
        }

        Ok(Block {
            statements,
            location: open.location,
        })
    }

    /// One statement inside a block, recovering on failure
    fn parse_block_item(&mut self) -> Option<Stmt> {
        let start = self.position;

        match self.parse_statement() {
            Ok(stmt) => Some(stmt),
            Err(_) => {
                self.synchronize();
                if self.position == start {
                    self.consume();
                }
                None
            }
        }
    }

    /// Parse a statement
    pub fn parse_statement(&mut self) -> ParseResult<Stmt> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> ParseResult<Stmt> {
        if self.is_declaration_start() {
            return self.parse_local_declaration();
        }

        let loc = self.current_location();

        if self.check_delimiter(';') {
            self.consume();
            return Ok(Stmt::Expression {
                expr: None,
                location: loc,
            });
        }

        if self.check_delimiter('{') {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        if self.peek().kind == TokenKind::Keyword {
            let keyword = self.peek().text.clone();
            match keyword.as_str() {
                "if" => return self.parse_if_statement(),
                "while" => return self.parse_while_statement(),
                "do" => return self.parse_do_while_statement(),
                "for" => return self.parse_for_statement(),
                "return" => return self.parse_return_statement(),
                "break" => {
                    let keyword = self.expect_keyword("break")?;
                    self.expect_delimiter(';')?;
                    return Ok(Stmt::Break {
                        location: keyword.location,
                    });
                }
                "continue" => {
                    let keyword = self.expect_keyword("continue")?;
                    self.expect_delimiter(';')?;
                    return Ok(Stmt::Continue {
                        location: keyword.location,
                    });
                }
                _ => {}
            }
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.expect_delimiter(';')?;
        Ok(Stmt::Expression {
            expr: Some(expr),
            location: loc,
        })
    }

    /// Parse if statement; an `else` binds to the nearest `if`
    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect_keyword("if")?;

        self.expect_delimiter('(')?;
        let condition = self.parse_expression()?;
        self.expect_delimiter(')')?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.check_keyword("else") {
            self.consume();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: keyword.location,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect_keyword("while")?;

        self.expect_delimiter('(')?;
        let condition = self.parse_expression()?;
        self.expect_delimiter(')')?;

        let body = self.parse_loop_body()?;

        Ok(Stmt::While {
            condition,
            body,
            location: keyword.location,
        })
    }

    /// Parse do-while statement
    fn parse_do_while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect_keyword("do")?;

        let body = self.parse_loop_body()?;

        self.expect_keyword("while")?;
        self.expect_delimiter('(')?;
        let condition = self.parse_expression()?;
        self.expect_delimiter(')')?;
        self.expect_delimiter(';')?;

        Ok(Stmt::DoWhile {
            body,
            condition,
            location: keyword.location,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect_keyword("for")?;
        self.expect_delimiter('(')?;

        // Init: bare ';', or [type keywords] expression ';'
        let init_loc = self.current_location();
        let init = if self.check_delimiter(';') {
            self.consume();
            Stmt::Expression {
                expr: None,
                location: init_loc,
            }
        } else {
            while self.is_declaration_start() {
                self.consume();
            }
            let expr = self.parse_expression()?;
            self.expect_delimiter(';')?;
            Stmt::Expression {
                expr: Some(expr),
                location: init_loc,
            }
        };

        // Condition (optional)
        let condition = if self.check_delimiter(';') {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_delimiter(';')?;

        // Increment (optional)
        let increment = if self.check_delimiter(')') {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_delimiter(')')?;

        let body = self.parse_loop_body()?;

        Ok(Stmt::For {
            init: Box::new(init),
            condition,
            increment,
            body,
            location: keyword.location,
        })
    }

    /// Parse return statement
    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect_keyword("return")?;

        let expr = if self.check_delimiter(';') {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect_delimiter(';')?;

        Ok(Stmt::Return {
            expr,
            location: keyword.location,
        })
    }

    /// Loop bodies are always braced blocks
    fn parse_loop_body(&mut self) -> ParseResult<Box<Stmt>> {
        Ok(Box::new(Stmt::Block(self.parse_block()?)))
    }
}
