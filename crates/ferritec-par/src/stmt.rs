//! Statement parsing: the statement dispatch table and each declared
//! statement shape.

use std::collections::HashSet;
use std::rc::Rc;

use ferritec_lex::token::TokenKind;
use ferritec_util::diagnostic::DiagnosticCode;
use ferritec_util::Symbol;

use crate::ast::{
    Block, ElifBranch, EnumValue, FieldDecl, Param, Stmt, Type, Visibility,
};
use crate::{bp, Parser};

impl<'a> Parser<'a> {
    /// Dispatch on the current token and parse one statement. Any token
    /// absent from the table falls through to an expression statement.
    pub(crate) fn parse_stmt(&mut self) -> Stmt {
        match self.peek_kind() {
            TokenKind::Let => self.parse_variable_decl(false),
            TokenKind::Const => self.parse_variable_decl(true),
            TokenKind::Func => self.parse_function_decl(Visibility::Private),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Repeat => self.parse_repeat(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let span = self.current_span();
                self.advance();
                self.expect(TokenKind::Semicolon, "expected ';' after 'break'");
                Stmt::Break(span)
            }
            TokenKind::Continue => {
                let span = self.current_span();
                self.advance();
                self.expect(TokenKind::Semicolon, "expected ';' after 'continue'");
                Stmt::Continue(span)
            }
            TokenKind::Aggregate => self.parse_aggregate_decl(Visibility::Private),
            TokenKind::Enum => self.parse_enum_decl(Visibility::Private),
            TokenKind::Alias => self.parse_alias_decl(Visibility::Private),
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.advance();
                Stmt::Empty(span)
            }
            TokenKind::Public | TokenKind::ReadOnly | TokenKind::Private => {
                let visibility = match self.peek_kind() {
                    TokenKind::Public => Visibility::Public,
                    TokenKind::ReadOnly => Visibility::ReadOnly,
                    _ => Visibility::Private,
                };
                self.advance();
                self.parse_visibility_qualified(visibility)
            }
            // `for` and `blueprint` are tokenized but have no bound
            // handler: reserved for a future grammar revision.
            TokenKind::For | TokenKind::Blueprint => {
                let span = self.current_span();
                self.report(
                    "this construct is reserved but not yet supported",
                    span,
                    DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN,
                );
                self.recover_to_statement_boundary();
                Stmt::Empty(span)
            }
            TokenKind::Module | TokenKind::Import => {
                // Only legal at the file head; `parse_file` handles
                // those. Reaching here means misplacement.
                let span = self.current_span();
                self.report(
                    "declaration must appear at the head of the file",
                    span,
                    DiagnosticCode::E_PARSER_MODULE_NOT_AT_HEAD,
                );
                self.advance();
                Stmt::Empty(span)
            }
            _ => {
                let span = self.current_span();
                let expr = self.parse_expr(bp::DEFAULT);
                if !self.parsing_block_precursor {
                    self.expect(TokenKind::Semicolon, "expected ';' after expression statement");
                }
                let _ = span;
                Stmt::ExpressionStatement(expr)
            }
        }
    }

    fn parse_visibility_qualified(&mut self, visibility: Visibility) -> Stmt {
        match self.peek_kind() {
            TokenKind::Func => self.parse_function_decl(visibility),
            TokenKind::Aggregate => self.parse_aggregate_decl(visibility),
            TokenKind::Enum => self.parse_enum_decl(visibility),
            TokenKind::Alias => self.parse_alias_decl(visibility),
            TokenKind::Let => self.parse_variable_decl_visibility(false, visibility),
            TokenKind::Const => self.parse_variable_decl_visibility(true, visibility),
            _ => self.parse_stmt(),
        }
    }

    fn recover_to_statement_boundary(&mut self) {
        while !matches!(self.peek_kind(), TokenKind::Semicolon | TokenKind::EndOfFile) {
            self.advance();
        }
        if self.peek_kind() == TokenKind::Semicolon {
            self.advance();
        }
    }

    // ---- variable / constant declarations -------------------------------

    fn parse_variable_decl(&mut self, constant: bool) -> Stmt {
        self.parse_variable_decl_visibility(constant, Visibility::Private)
    }

    fn parse_variable_decl_visibility(&mut self, constant: bool, visibility: Visibility) -> Stmt {
        let span = self.current_span();
        self.advance(); // `let` | `const`
        let mutable = if self.peek_kind() == TokenKind::Mut {
            self.advance();
            true
        } else {
            false
        };
        let name_tok = self.expect(TokenKind::Identifier, "expected identifier in variable declaration");

        let ty = if self.peek_kind() == TokenKind::Colon {
            self.advance();
            Some(self.parse_type())
        } else {
            None
        };

        let value = if self.peek_kind() == TokenKind::Eq {
            self.advance();
            Some(self.parse_expr(bp::ARROW))
        } else {
            None
        };

        if constant && value.is_none() {
            self.report(
                "'const' declaration requires an initializer",
                span,
                DiagnosticCode::E_PARSER_CONST_WITHOUT_INIT,
            );
        }
        if ty.is_none() && value.is_none() {
            self.report(
                "variable declaration needs a type or an initializer",
                span,
                DiagnosticCode::E_PARSER_MISSING_TYPE_OR_VALUE,
            );
        }

        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration");

        Stmt::VariableDeclaration {
            mutable,
            constant,
            name: name_tok.lexeme,
            visibility,
            value,
            ty,
            span,
        }
    }

    // ---- functions --------------------------------------------------------

    fn parse_function_decl(&mut self, visibility: Visibility) -> Stmt {
        let span = self.current_span();
        self.advance(); // `func`
        let name_tok = self.expect(TokenKind::Identifier, "expected function name");

        let generics = self.parse_optional_generic_params();

        self.expect(TokenKind::LParen, "expected '(' after function name");
        let mut params = Vec::new();
        let mut seen = HashSet::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                let pspan = self.current_span();
                let pname = self.expect(TokenKind::Identifier, "expected parameter name");
                self.expect(TokenKind::Colon, "expected ':' after parameter name");
                let mutable = if self.peek_kind() == TokenKind::Mut {
                    self.advance();
                    true
                } else {
                    false
                };
                let ty = self.parse_type();
                if !seen.insert(pname.lexeme) {
                    self.report(
                        format!("duplicate parameter '{}'", pname.lexeme.as_str()),
                        pspan,
                        DiagnosticCode::E_PARSER_DUPLICATE_DEF,
                    );
                }
                params.push(Param {
                    name: pname.lexeme,
                    ty,
                    mutable,
                    span: pspan,
                });
                if self.peek_kind() == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "expected ')' after parameter list");

        let return_type = if self.peek_kind() == TokenKind::Arrow {
            self.advance();
            Some(self.parse_type())
        } else {
            None
        };

        let body = self.parse_block();

        Stmt::FunctionDeclaration {
            name: name_tok.lexeme,
            generics,
            params,
            return_type,
            body,
            visibility,
            span,
        }
    }

    fn parse_optional_generic_params(&mut self) -> Vec<Symbol> {
        let mut generics = Vec::new();
        if self.peek_kind() == TokenKind::LBracket {
            self.advance();
            let mut seen = HashSet::new();
            if self.peek_kind() != TokenKind::RBracket {
                loop {
                    let span = self.current_span();
                    let tok = self.expect(TokenKind::Identifier, "expected generic parameter name");
                    if !seen.insert(tok.lexeme) {
                        self.report(
                            format!("duplicate generic parameter '{}'", tok.lexeme.as_str()),
                            span,
                            DiagnosticCode::E_PARSER_DUPLICATE_DEF,
                        );
                    }
                    generics.push(tok.lexeme);
                    if self.peek_kind() == TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RBracket, "expected ']' to close generic parameter list");
        }
        generics
    }

    // ---- blocks -----------------------------------------------------------

    pub(crate) fn parse_block(&mut self) -> Block {
        let span = self.current_span();
        self.expect(TokenKind::LBrace, "expected '{' to start block");
        let mut stmts = Vec::new();
        while self.peek_kind() != TokenKind::RBrace && self.peek_kind() != TokenKind::EndOfFile {
            stmts.push(self.parse_stmt());
        }
        self.expect(TokenKind::RBrace, "expected '}' to close block");
        if stmts.is_empty() {
            self.handler_warn_empty_block(span);
        }
        stmts
    }

    fn handler_warn_empty_block(&mut self, span: ferritec_util::Span) {
        self.handler
            .build_warning(span, "empty block")
            .code(DiagnosticCode::W_EMPTY_BLOCK)
            .emit(self.handler);
    }

    /// Parse a parenthesized condition with `parsing_block_precursor`
    /// set so a following `{` is read as a block, not an aggregate
    /// instantiation's `{`.
    fn parse_condition(&mut self) -> crate::ast::Expr {
        self.expect(TokenKind::LParen, "expected '(' before condition");
        let was = self.parsing_block_precursor;
        self.parsing_block_precursor = true;
        let cond = self.parse_expr(bp::DEFAULT);
        self.parsing_block_precursor = was;
        self.expect(TokenKind::RParen, "expected ')' after condition");
        cond
    }

    // ---- control flow -------------------------------------------------------

    fn parse_if(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `if`
        let condition = self.parse_condition();
        let then_branch = self.parse_block();

        let mut elif_branches = Vec::new();
        while self.peek_kind() == TokenKind::Elif {
            self.advance();
            let cond = self.parse_condition();
            let body = self.parse_block();
            elif_branches.push(ElifBranch { condition: cond, body });
        }

        let else_branch = if self.peek_kind() == TokenKind::Else {
            self.advance();
            Some(self.parse_block())
        } else {
            None
        };

        Stmt::If {
            condition,
            then_branch,
            elif_branches,
            else_branch,
            span,
        }
    }

    fn parse_while(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `while`
        let condition = self.parse_condition();
        let body = self.parse_block();
        Stmt::WhileLoop {
            condition,
            body,
            is_do_while: false,
            span,
        }
    }

    fn parse_do_while(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `do`
        let body = self.parse_block();
        self.expect(TokenKind::While, "expected 'while' after 'do' block");
        let condition = self.parse_condition();
        self.expect(TokenKind::Semicolon, "expected ';' after do-while condition");
        Stmt::WhileLoop {
            condition,
            body,
            is_do_while: true,
            span,
        }
    }

    fn parse_repeat(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `repeat`
        let count = self.parse_condition();
        let body = self.parse_block();
        Stmt::RepeatLoop { count, body, span }
    }

    fn parse_switch(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `switch`
        let discriminant = self.parse_condition();
        self.expect(TokenKind::LBrace, "expected '{' to start switch body");

        let mut cases = Vec::new();
        let mut default = None;
        while self.peek_kind() != TokenKind::RBrace && self.peek_kind() != TokenKind::EndOfFile {
            if self.peek_kind() == TokenKind::Case {
                self.advance();
                let value = self.parse_expr(bp::DEFAULT);
                self.expect(TokenKind::Colon, "expected ':' after case value");
                let mut body = Vec::new();
                while !matches!(
                    self.peek_kind(),
                    TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::EndOfFile
                ) {
                    body.push(self.parse_stmt());
                }
                cases.push(crate::ast::SwitchCase { value, body });
            } else if self.peek_kind() == TokenKind::Default {
                self.advance();
                self.expect(TokenKind::Colon, "expected ':' after 'default'");
                let mut body = Vec::new();
                while !matches!(
                    self.peek_kind(),
                    TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::EndOfFile
                ) {
                    body.push(self.parse_stmt());
                }
                default = Some(body);
            } else {
                self.error_expected_token("'case' or 'default'");
                self.advance();
            }
        }
        self.expect(TokenKind::RBrace, "expected '}' to close switch body");

        Stmt::Switch {
            discriminant,
            cases,
            default,
            span,
        }
    }

    fn parse_return(&mut self) -> Stmt {
        let span = self.current_span();
        self.advance(); // `return`
        let value = if self.peek_kind() != TokenKind::Semicolon {
            Some(self.parse_expr(bp::DEFAULT))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "expected ';' after return statement");
        Stmt::Return { value, span }
    }

    // ---- declarations --------------------------------------------------

    fn parse_aggregate_decl(&mut self, visibility: Visibility) -> Stmt {
        let span = self.current_span();
        self.advance(); // `aggregate`
        let name_tok = self.expect(TokenKind::Identifier, "expected aggregate name");
        let generics = self.parse_optional_generic_params();
        self.expect(TokenKind::LBrace, "expected '{' to start aggregate body");

        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        while self.peek_kind() != TokenKind::RBrace && self.peek_kind() != TokenKind::EndOfFile {
            if self.peek_kind() != TokenKind::Identifier {
                self.error_expected_token("a field name");
                self.advance();
                continue;
            }
            let fspan = self.current_span();
            let fname = self.expect(TokenKind::Identifier, "expected field name");
            self.expect(TokenKind::Colon, "expected ':' after field name");
            let ty = self.parse_type();
            self.expect(TokenKind::Semicolon, "expected ';' after field declaration");
            if !seen.insert(fname.lexeme) {
                self.report(
                    format!("duplicate field '{}'", fname.lexeme.as_str()),
                    fspan,
                    DiagnosticCode::E_PARSER_DUPLICATE_DEF,
                );
            }
            fields.push(FieldDecl {
                name: fname.lexeme,
                ty,
                span: fspan,
            });
        }
        self.expect(TokenKind::RBrace, "expected '}' to close aggregate body");

        Stmt::AggregateDeclaration {
            name: name_tok.lexeme,
            generics,
            fields,
            visibility,
            span,
        }
    }

    fn parse_enum_decl(&mut self, visibility: Visibility) -> Stmt {
        let span = self.current_span();
        self.advance(); // `enum`
        let name_tok = self.expect(TokenKind::Identifier, "expected enum name");

        let base_type = if self.peek_kind() == TokenKind::Colon {
            self.advance();
            self.parse_type()
        } else {
            Rc::new(Type::SymbolType {
                name: Symbol::intern("int32"),
                primitive: Some(crate::ast::Primitive::Int32),
            })
        };

        self.expect(TokenKind::LBrace, "expected '{' to start enum body");
        let mut values = Vec::new();
        let mut seen = HashSet::new();
        while self.peek_kind() != TokenKind::RBrace && self.peek_kind() != TokenKind::EndOfFile {
            if self.peek_kind() != TokenKind::Identifier {
                self.error_expected_token("an enum value name");
                self.advance();
                continue;
            }
            let vspan = self.current_span();
            let vname = self.expect(TokenKind::Identifier, "expected enum value name");
            let init = if self.peek_kind() == TokenKind::Eq {
                self.advance();
                Some(self.parse_expr(bp::ARROW))
            } else {
                None
            };
            if !seen.insert(vname.lexeme) {
                self.report(
                    format!("duplicate enum value '{}'", vname.lexeme.as_str()),
                    vspan,
                    DiagnosticCode::E_PARSER_DUPLICATE_DEF,
                );
            }
            values.push(EnumValue {
                name: vname.lexeme,
                init,
                span: vspan,
            });
            if self.peek_kind() == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "expected '}' to close enum body");

        Stmt::EnumDeclaration {
            name: name_tok.lexeme,
            base_type,
            values,
            visibility,
            span,
        }
    }

    fn parse_alias_decl(&mut self, visibility: Visibility) -> Stmt {
        let span = self.current_span();
        self.advance(); // `alias`
        let base = self.parse_type();
        self.expect(TokenKind::As, "expected 'as' after aliased type");
        let name_tok = self.expect(TokenKind::Identifier, "expected alias name");
        self.expect(TokenKind::Semicolon, "expected ';' after alias declaration");
        Stmt::Alias {
            base,
            name: name_tok.lexeme,
            visibility,
            span,
        }
    }
}
