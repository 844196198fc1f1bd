//! Declaration parsing implementation
//!
//! This module handles parsing of declarations in C programs:
//!
//! - The translation unit, partitioned around `main`
//! - Function prototypes and definitions: `type name(params);` / `type name(params) { ... }`
//! - Variable declarator lists: `int a = 1, b[10], c;`
//! - Type specifiers: one or more primitive type keywords
//!
//! # Grammar
//!
//! ```text
//! program     ::= declaration* main_decl declaration*
//! declaration ::= type name ( "(" params ")" ( ";" | block ) | declarators ";" )
//! main_decl   ::= type "main" "(" ["void"] ")" block
//! declarators ::= declarator ("," identifier declarator)*
//! declarator  ::= ["[" number "]"] ["=" expression]
//! params      ::= "void" | [type [identifier] ("," type [identifier])*]
//! type        ::= primitive_type+
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::{ParseResult, Parser};
use crate::parser::token::{Token, TokenKind};

impl Parser {
    /// Parse the whole token stream. The first `main` definition splits the
    /// top-level declarations into the ones before it and the ones after it.
    pub(crate) fn parse_translation_unit(&mut self) -> Program {
        let mut program = Program::new();
        let mut main_seen = false;

        while !self.is_at_end() {
            if self.is_main_ahead() {
                main_seen = true;
                program.main = self.parse_main_or_recover();
                break;
            }
            if let Some(decls) = self.parse_top_level_item() {
                program.pre_main.extend(decls);
            }
        }

        if !main_seen {
            self.error("Program must contain a main function");
        }

        while !self.is_at_end() {
            if self.is_main_ahead() {
                let location = self.main_keyword_location();
                self.error_at(location, "Duplicate main function");
            }
            if let Some(decls) = self.parse_top_level_item() {
                program.post_main.extend(decls);
            }
        }

        program
    }

    /// One top-level declaration, recovering on failure
    fn parse_top_level_item(&mut self) -> Option<Vec<Decl>> {
        let start = self.position;

        let result = if self.is_declaration_start() {
            self.parse_top_level_declaration()
        } else {
            let message = format!("Expected declaration, got {}", self.peek());
            Err(self.error(message))
        };

        match result {
            Ok(decls) => Some(decls),
            Err(_) => {
                if self.position == start {
                    self.consume();
                }
                self.synchronize_declaration();
                None
            }
        }
    }

    fn parse_main_or_recover(&mut self) -> Option<FunctionDecl> {
        let start = self.position;

        match self.parse_main_declaration() {
            Ok(main) => Some(main),
            Err(_) => {
                if self.position == start {
                    self.consume();
                }
                self.synchronize_declaration();
                None
            }
        }
    }

    fn main_keyword_location(&self) -> SourceLocation {
        let mut offset = 0;
        while self.is_type_keyword_at(offset) {
            offset += 1;
        }
        self.lookahead(offset).location
    }

    /// Parse a top-level declaration: a function, or a list of variables
    /// sharing one type
    pub(crate) fn parse_top_level_declaration(&mut self) -> ParseResult<Vec<Decl>> {
        let type_name = self.parse_type_specifier()?;

        // A second `main` is parsed like any other function
        let name = if self.check_keyword("main") {
            self.expect_keyword("main")?
        } else {
            self.expect_identifier()?
        };

        if self.check_delimiter('(') {
            let function = self.parse_function_declaration(type_name, name)?;
            return Ok(vec![Decl::Function(function)]);
        }

        let decls = self.parse_variable_declarators(&type_name, name)?;
        Ok(decls.into_iter().map(Decl::Var).collect())
    }

    /// Parse the `main` definition: `type main ( [void] ) block`
    pub(crate) fn parse_main_declaration(&mut self) -> ParseResult<FunctionDecl> {
        let return_type = self.parse_type_specifier()?;
        let keyword = self.expect_keyword("main")?;

        tracing::trace!(
            line = keyword.line(),
            column = keyword.column(),
            "found main"
        );

        self.expect_delimiter('(')?;
        if self.check_keyword("void") && self.lookahead(1).is(TokenKind::Delimiter, ")") {
            self.consume();
        } else if !self.check_delimiter(')') {
            // Reported, then skipped so the body can still be parsed
            self.error("main must not declare parameters");
            while !self.is_at_end() && !self.check_delimiter(')') && !self.check_delimiter('{') {
                self.consume();
            }
        }
        self.expect_delimiter(')')?;

        let body = self.parse_block()?;

        Ok(FunctionDecl {
            return_type,
            name: keyword.text,
            params: Vec::new(),
            body: Some(body),
            location: keyword.location,
        })
    }

    /// Parse the rest of a function after its name: parameters, then either
    /// `;` (prototype) or a body
    pub(crate) fn parse_function_declaration(
        &mut self,
        return_type: String,
        name: Token,
    ) -> ParseResult<FunctionDecl> {
        self.expect_delimiter('(')?;
        let params = self.parse_parameter_list()?;
        self.expect_delimiter(')')?;

        let body = if self.check_delimiter(';') {
            self.consume();
            None
        } else if self.check_delimiter('{') {
            Some(self.parse_block()?)
        } else {
            // Kept as a prototype so the signature is not lost
            let message = format!(
                "Expected ';' or function body after declaration of '{}', got {}",
                name.text,
                self.peek()
            );
            self.error(message);
            None
        };

        Ok(FunctionDecl {
            return_type,
            name: name.text,
            params,
            body,
            location: name.location,
        })
    }

    /// Parse function parameter list; a lone `void` means no parameters
    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = Vec::new();

        if self.check_delimiter(')') {
            return Ok(params);
        }

        if self.check_keyword("void") && self.lookahead(1).is(TokenKind::Delimiter, ")") {
            self.consume();
            return Ok(params);
        }

        loop {
            let location = self.current_location();
            let type_name = self.parse_type_specifier()?;

            // Names are optional in prototypes
            let name = if self.peek().kind == TokenKind::Identifier {
                self.consume().map(|t| t.text)
            } else {
                None
            };

            params.push(Param {
                type_name,
                name,
                location,
            });

            if !self.check_operator(",") {
                break;
            }
            self.consume();
        }

        Ok(params)
    }

    /// Parse a local declaration statement: `type declarators ;`
    pub(crate) fn parse_local_declaration(&mut self) -> ParseResult<Stmt> {
        let location = self.current_location();
        let type_name = self.parse_type_specifier()?;
        let name = self.expect_identifier()?;
        let decls = self.parse_variable_declarators(&type_name, name)?;

        Ok(Stmt::VarDecl { decls, location })
    }

    /// Parse the declarator list after the first name, through the closing `;`
    fn parse_variable_declarators(
        &mut self,
        type_name: &str,
        first: Token,
    ) -> ParseResult<Vec<VarDecl>> {
        let mut decls = vec![self.parse_variable_declarator(type_name, first)?];

        while self.check_operator(",") {
            self.consume();
            let name = self.expect_identifier()?;
            decls.push(self.parse_variable_declarator(type_name, name)?);
        }

        self.expect_delimiter(';')?;
        Ok(decls)
    }

    fn parse_variable_declarator(
        &mut self,
        type_name: &str,
        name: Token,
    ) -> ParseResult<VarDecl> {
        let array_size = if self.check_delimiter('[') {
            self.consume();
            let size = self.parse_array_size()?;
            self.expect_delimiter(']')?;
            Some(size)
        } else {
            None
        };

        let init = if self.check_operator("=") {
            self.consume();
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(VarDecl {
            type_name: type_name.to_string(),
            name: name.text,
            array_size,
            init,
            location: name.location,
        })
    }

    /// Array dimensions must be a non-negative integer constant
    fn parse_array_size(&mut self) -> ParseResult<usize> {
        let token = self.peek().clone();

        if token.kind == TokenKind::Number {
            if let Ok(size) = token.text.parse::<usize>() {
                self.consume();
                return Ok(size);
            }
        }

        Err(self.error(format!("Expected constant array size, got {token}")))
    }

    /// Parse type specifier: one or more primitive type keywords, joined with
    /// single spaces (`unsigned long`)
    pub(crate) fn parse_type_specifier(&mut self) -> ParseResult<String> {
        let mut words = Vec::new();

        while self.is_declaration_start() {
            if let Some(token) = self.consume() {
                words.push(token.text);
            }
        }

        if words.is_empty() {
            let message = format!("Expected type specifier, got {}", self.peek());
            return Err(self.error(message));
        }

        Ok(words.join(" "))
    }
}
