//! Expression parsing implementation
//!
//! This module handles parsing of C expressions using precedence climbing
//! for binary operators and recursive descent for other expression forms.
//!
//! # Precedence
//!
//! From lowest to highest binding power:
//!
//! ```text
//! assignment  = += -= *= /= %= &= |= ^= <<= >>=   (right-assoc)
//! ternary     ? :                                 (right-assoc)
//! logical-or  ||
//! logical-and &&
//! bitwise-or  |
//! bitwise-xor ^
//! bitwise-and &
//! equality    == !=
//! relational  < > <= >=
//! shift       << >>
//! additive    + -
//! multiplicative * / %
//! unary       + - ! ~ ++ -- & *                   (prefix)
//! postfix     [] () . -> ++ --
//! primary     literals, identifiers, ( expr )
//! ```
//!
//! Only tokens of [`TokenKind::Operator`] kind are treated as operators.
//!
//! All parsing methods are implemented on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseResult, Parser};
use crate::parser::token::TokenKind;

/// A rule for the next-tighter precedence level
type Rule = fn(&mut Parser) -> ParseResult<Expr>;

impl Parser {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_assignment)
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_ternary()?;

        let Some(op) = self.peek_operator(AssignOp::from_symbol) else {
            return Ok(lhs);
        };
        let location = self.current_location();
        self.consume();
        let rhs = self.nested(Self::parse_assignment)?;

        Ok(Expr::Assign {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            location,
        })
    }

    /// Parse ternary: condition ? true_expr : false_expr
    fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let condition = self.parse_logical_or()?;

        if !self.check_operator("?") {
            return Ok(condition);
        }

        let location = self.current_location();
        self.consume();
        let true_expr = self.parse_expression()?;
        self.expect_operator(":")?;
        let false_expr = self.nested(Self::parse_ternary)?;

        Ok(Expr::Ternary {
            condition: Box::new(condition),
            true_expr: Box::new(true_expr),
            false_expr: Box::new(false_expr),
            location,
        })
    }

    /// Shared loop for the left-associative binary levels. Only an operator
    /// token whose symbol is one of `ops` continues the loop.
    fn parse_left_assoc(&mut self, ops: &[BinOp], next: Rule) -> ParseResult<Expr> {
        let mut left = next(self)?;

        while let Some(op) = self
            .peek_operator(BinOp::from_symbol)
            .filter(|op| ops.contains(op))
        {
            let location = self.current_location();
            self.consume();
            let right = next(self)?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::Or], Self::parse_logical_and)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::And], Self::parse_bitwise_or)
    }

    /// Parse bitwise OR (|)
    fn parse_bitwise_or(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::BitOr], Self::parse_bitwise_xor)
    }

    /// Parse bitwise XOR (^)
    fn parse_bitwise_xor(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::BitXor], Self::parse_bitwise_and)
    }

    /// Parse bitwise AND (&)
    fn parse_bitwise_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::BitAnd], Self::parse_equality)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::Eq, BinOp::Ne], Self::parse_relational)
    }

    /// Parse relational (< > <= >=)
    fn parse_relational(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[BinOp::Lt, BinOp::Gt, BinOp::Le, BinOp::Ge],
            Self::parse_shift,
        )
    }

    /// Parse bitwise shift (<< >>)
    fn parse_shift(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::Shl, BinOp::Shr], Self::parse_additive)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::Add, BinOp::Sub], Self::parse_multiplicative)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[BinOp::Mul, BinOp::Div, BinOp::Mod], Self::parse_unary)
    }

    /// Parse prefix unary (+ - ! ~ ++ -- & *)
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let Some(op) = self.peek_operator(UnOp::from_symbol) else {
            return self.parse_postfix();
        };
        let location = self.current_location();
        self.consume();
        let operand = self.nested(Self::parse_unary)?;

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            prefix: true,
            location,
        })
    }

    /// Parse postfix ([] () . -> ++ --), left to right
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            let loc = self.current_location();

            if self.check_delimiter('[') {
                self.consume();
                let index = self.parse_expression()?;
                self.expect_delimiter(']')?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                    location: loc,
                };
            } else if self.check_delimiter('(') {
                self.consume();
                let args = self.parse_argument_list()?;
                self.expect_delimiter(')')?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    location: loc,
                };
            } else if self.check_operator(".") || self.check_operator("->") {
                let arrow = self.check_operator("->");
                self.consume();
                let member = self.expect_identifier()?;
                expr = Expr::Member {
                    target: Box::new(expr),
                    member: member.text,
                    arrow,
                    location: loc,
                };
            } else if self.check_operator("++") || self.check_operator("--") {
                let op = if self.check_operator("++") {
                    UnOp::Increment
                } else {
                    UnOp::Decrement
                };
                self.consume();
                expr = Expr::Unary {
                    op,
                    operand: Box::new(expr),
                    prefix: false,
                    location: loc,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: expr, expr, ... (possibly empty, up to the `)`)
    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check_delimiter(')') {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            if !self.check_operator(",") {
                break;
            }
            self.consume();
        }

        Ok(args)
    }

    /// Parse primary (literals, identifiers, parenthesized expressions)
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if self.check_delimiter('(') {
            self.consume();
            let expr = self.parse_expression()?;
            self.expect_delimiter(')')?;
            return Ok(expr);
        }

        let token = self.peek().clone();
        let loc = token.location;
        let expr = match token.kind {
            TokenKind::Number => Expr::Number(token.text, loc),
            TokenKind::StringLiteral => Expr::StringLiteral(token.text, loc),
            TokenKind::CharLiteral => {
                Expr::CharLiteral(token.text.chars().next().unwrap_or('\0'), loc)
            }
            TokenKind::Identifier => Expr::Identifier(token.text, loc),
            _ => {
                let message = format!("Expected primary expression, got {token}");
                return Err(self.error(message));
            }
        };

        self.consume();
        Ok(expr)
    }
}
