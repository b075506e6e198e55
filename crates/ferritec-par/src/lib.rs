//! ferritec-par - Syntactic analysis for the language's front end.
//!
//! A Pratt (top-down operator precedence) parser: tokens flow in from
//! [`ferritec_lex::Lexer`], statements/expressions/types flow out as
//! the [`ast`] tree. Dispatch is table-driven — null-denotation (nud),
//! left-denotation (led), and statement handlers are matched on token
//! kind, with a parallel binding-power table governing how tightly
//! operators bind (see [`Parser::led_binding_power`]).
//!
//! Parse errors are local: on a mismatched token the parser emits a
//! diagnostic, sets `had_error`, and continues from the current token
//! so later statements still parse (error tolerance, per the front-end
//! specification's recovery model).

pub mod ast;
mod expr;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use ferritec_lex::token::{Token, TokenKind};
use ferritec_lex::Lexer;
use ferritec_util::diagnostic::DiagnosticCode;
use ferritec_util::{Handler, Span};

use ast::{Import, ParsedFile, Path};

/// Binding power levels from the front-end specification's precedence
/// ladder (higher binds tighter).
pub mod bp {
    pub const DEFAULT: u8 = 0;
    pub const ARROW: u8 = 1;
    pub const ASSIGNMENT: u8 = 2;
    pub const TYPE_CAST: u8 = 2;
    pub const LOGICAL_OR: u8 = 3;
    pub const LOGICAL_AND: u8 = 4;
    pub const BITWISE_OR: u8 = 5;
    pub const BITWISE_XOR: u8 = 6;
    pub const BITWISE_AND: u8 = 7;
    pub const EQUALITY: u8 = 8;
    pub const RELATIONAL: u8 = 9;
    pub const BITWISE_SHIFT: u8 = 10;
    pub const ADDITIVE: u8 = 11;
    pub const MULTIPLICATIVE: u8 = 12;
    pub const EXPONENTIAL: u8 = 13;
    pub const UNARY: u8 = 14;
    pub const POSTFIX: u8 = 15;
    pub const MEMBER: u8 = 16;
    pub const SCOPE_RESOLUTION: u8 = 17;
    pub const GENERIC: u8 = 17;
    pub const PRIMARY: u8 = 18;
}

/// The parser: owns a lexer and a one-token look-ahead (`current`), and
/// tracks the `parsing_block_precursor` flag used to disambiguate
/// aggregate-literal `{` from a following statement block.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    handler: &'a Handler,
    current: Token,
    prev_kind: Option<TokenKind>,
    had_error: bool,
    parsing_block_precursor: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        let mut lexer = Lexer::new(source, handler);
        let current = lexer.consume();
        Self {
            lexer,
            handler,
            current,
            prev_kind: None,
            had_error: false,
            parsing_block_precursor: false,
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error || self.lexer.had_error()
    }

    /// Parse an entire source file into a [`ParsedFile`]: an optional
    /// leading `module` declaration, a run of `import` declarations,
    /// then the top-level statement block.
    pub fn parse_file(&mut self) -> ParsedFile {
        let mut file = ParsedFile::default();

        if self.peek_kind() == TokenKind::Module {
            self.advance();
            let name_tok = self.expect(TokenKind::Identifier, "expected module name after 'module'");
            file.module_name = Some(name_tok.lexeme);
            self.expect(TokenKind::Semicolon, "expected ';' after module declaration");
        }

        while self.peek_kind() == TokenKind::Import {
            file.imports.push(self.parse_import());
        }

        while self.peek_kind() != TokenKind::EndOfFile {
            if self.peek_kind() == TokenKind::Module {
                let span = self.current_span();
                self.report(
                    "module declaration must appear at the head of the file",
                    span,
                    DiagnosticCode::E_PARSER_MODULE_NOT_AT_HEAD,
                );
                self.advance();
                continue;
            }
            file.body.push(self.parse_stmt());
        }

        file.block_comments = std::mem::take(&mut self.lexer.block_comments);
        file
    }

    fn parse_import(&mut self) -> Import {
        let start_span = self.current_span();
        self.advance(); // `import`
        let mut segments = Vec::new();
        loop {
            let tok = self.expect(TokenKind::Identifier, "expected identifier in import path");
            segments.push(tok.lexeme);
            if self.peek_kind() == TokenKind::ColonColon {
                self.advance();
            } else {
                break;
            }
        }
        let alias = if self.peek_kind() == TokenKind::As {
            self.advance();
            Some(
                self.expect(TokenKind::Identifier, "expected identifier after 'as'")
                    .lexeme,
            )
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "expected ';' after import declaration");
        Import {
            path: Path {
                segments,
                span: start_span,
            },
            alias,
        }
    }

    // ---- token stream plumbing ------------------------------------------

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.current.kind
    }

    pub(crate) fn current_span(&self) -> Span {
        Span::new(0, 0, self.current.line, self.current.column)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let old = self.current.clone();
        self.prev_kind = Some(old.kind);
        self.current = self.lexer.consume();
        old
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Token {
        if self.peek_kind() == kind {
            self.advance()
        } else {
            let span = self.current_span();
            self.report(message, span, DiagnosticCode::E_PARSER_EXPECTED_TOKEN);
            Token::new(kind, "", self.current.line, self.current.column)
        }
    }

    pub(crate) fn error_expected_token(&mut self, what: &str) {
        let span = self.current_span();
        self.report(
            format!("expected {what}"),
            span,
            DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN,
        );
    }

    pub(crate) fn report(&mut self, message: impl Into<String>, span: Span, code: DiagnosticCode) {
        self.had_error = true;
        self.handler.build_error(span, message).code(code).emit(self.handler);
    }

    /// True when the previous token leaves `+`/`-`/`&`/`*` in prefix
    /// (unary) position rather than infix (binary) position.
    pub(crate) fn in_unary_context(&self) -> bool {
        match self.prev_kind {
            None => true,
            Some(TokenKind::LParen) => true,
            Some(TokenKind::PlusPlus) | Some(TokenKind::MinusMinus) | Some(TokenKind::RBracket) => {
                false
            }
            Some(k) if k.is_operator() => true,
            _ => false,
        }
    }
}

/// Parse a complete source file, reporting diagnostics through `handler`.
pub fn parse(source: &str, handler: &Handler) -> ParsedFile {
    let mut parser = Parser::new(source, handler);
    parser.parse_file()
}
