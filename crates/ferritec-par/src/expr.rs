//! Expression parsing: the Pratt loop, its nud/led dispatch, and the
//! binding-power table from the precedence ladder.

use ferritec_lex::token::TokenKind;

use crate::ast::{BinOp, Expr, ExprKind, FieldInit, NumberValue, PostfixOp, UnOp};
use crate::{bp, Parser};

impl<'a> Parser<'a> {
    /// Parse an expression, stopping once the next token's binding
    /// power does not exceed `min_bp`.
    pub(crate) fn parse_expr(&mut self, min_bp: u8) -> Expr {
        let mut left = self.parse_nud();
        loop {
            let kind = self.peek_kind();
            // `{` only ever starts a led (aggregate instantiation) when
            // `left` is a bare identifier; otherwise it belongs to
            // whatever follows this expression (a block, usually) and
            // must not be treated as binding here, or the Pratt loop
            // would spin forever re-offering a token `parse_led` never
            // consumes.
            if kind == TokenKind::LBrace && !matches!(left.kind, ExprKind::Identifier(_)) {
                break;
            }
            let lbp = self.led_binding_power(kind);
            if lbp <= min_bp {
                break;
            }
            left = self.parse_led(left, lbp);
        }
        left
    }

    fn parse_nud(&mut self) -> Expr {
        let span = self.current_span();
        let kind = self.peek_kind();

        // Context-sensitive rewrite: +, -, &, * are lexed as their
        // binary forms; reinterpret as unary when nothing meaningful
        // precedes.
        if self.in_unary_context() {
            if let Some(op) = unary_op_for(kind) {
                self.advance();
                let right = self.parse_expr(bp::UNARY);
                return Expr::new(
                    ExprKind::Prefix {
                        op,
                        right: Box::new(right),
                    },
                    span,
                );
            }
        }

        match kind {
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral => {
                let tok = self.advance();
                let is_float = kind == TokenKind::FloatLiteral;
                let value = parse_number_literal(tok.lexeme.as_str(), is_float);
                Expr::new(ExprKind::NumberLiteral(value), span)
            }
            TokenKind::StrLiteral => {
                let tok = self.advance();
                Expr::new(ExprKind::StringLiteral(tok.lexeme), span)
            }
            TokenKind::CharLiteral => {
                let tok = self.advance();
                let c = tok.lexeme.as_str().chars().next().unwrap_or('\0');
                Expr::new(ExprKind::CharLiteral(c), span)
            }
            TokenKind::True => {
                self.advance();
                Expr::new(ExprKind::BoolLiteral(true), span)
            }
            TokenKind::False => {
                self.advance();
                Expr::new(ExprKind::BoolLiteral(false), span)
            }
            TokenKind::Identifier => {
                let tok = self.advance();
                Expr::new(ExprKind::Identifier(tok.lexeme), span)
            }
            TokenKind::LParen => {
                self.advance();
                let was_precursor = self.parsing_block_precursor;
                self.parsing_block_precursor = false;
                let inner = self.parse_expr(bp::DEFAULT);
                self.parsing_block_precursor = was_precursor;
                self.expect(TokenKind::RParen, "expected ')' to close parenthesized expression");
                inner
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while self.peek_kind() != TokenKind::RBracket
                    && self.peek_kind() != TokenKind::EndOfFile
                {
                    elements.push(self.parse_expr(bp::ARROW));
                    if self.peek_kind() == TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket, "expected ']' to close array literal");
                Expr::new(
                    ExprKind::ArrayLiteral {
                        elements,
                        element_type: None,
                        length: None,
                    },
                    span,
                )
            }
            TokenKind::Bang => {
                self.advance();
                let right = self.parse_expr(bp::UNARY);
                Expr::new(
                    ExprKind::Prefix {
                        op: UnOp::Not,
                        right: Box::new(right),
                    },
                    span,
                )
            }
            TokenKind::Tilde => {
                self.advance();
                let right = self.parse_expr(bp::UNARY);
                Expr::new(
                    ExprKind::Prefix {
                        op: UnOp::BitNot,
                        right: Box::new(right),
                    },
                    span,
                )
            }
            TokenKind::PlusPlus => {
                self.advance();
                let right = self.parse_expr(bp::UNARY);
                Expr::new(
                    ExprKind::Prefix {
                        op: UnOp::Increment,
                        right: Box::new(right),
                    },
                    span,
                )
            }
            TokenKind::MinusMinus => {
                self.advance();
                let right = self.parse_expr(bp::UNARY);
                Expr::new(
                    ExprKind::Prefix {
                        op: UnOp::Decrement,
                        right: Box::new(right),
                    },
                    span,
                )
            }
            _ => {
                self.error_expected_token("an expression");
                self.advance();
                Expr::new(ExprKind::Error, span)
            }
        }
    }

    fn parse_led(&mut self, left: Expr, lbp: u8) -> Expr {
        let span = self.current_span();
        let kind = self.peek_kind();

        if let Some(op) = binary_op_for(kind) {
            self.advance();
            // Exponentiation is right-associative: recurse at lbp - 1.
            let rbp = if kind == TokenKind::CaretCaret { lbp - 1 } else { lbp };
            let right = self.parse_expr(rbp);
            return Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        if let Some(op) = compound_assign_op_for(kind) {
            self.advance();
            let right = self.parse_expr(lbp - 1); // right-associative
            return Expr::new(
                ExprKind::Assignment {
                    target: Box::new(left),
                    op: Some(op),
                    value: Box::new(right),
                },
                span,
            );
        }

        match kind {
            TokenKind::Eq => {
                self.advance();
                let right = self.parse_expr(lbp - 1);
                Expr::new(
                    ExprKind::Assignment {
                        target: Box::new(left),
                        op: None,
                        value: Box::new(right),
                    },
                    span,
                )
            }
            TokenKind::LParen => {
                self.advance();
                let mut args = Vec::new();
                if self.peek_kind() != TokenKind::RParen {
                    loop {
                        args.push(self.parse_expr(bp::ARROW));
                        if self.peek_kind() == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen, "expected ')' to close call arguments");
                Expr::new(
                    ExprKind::FunctionCall {
                        callee: Box::new(left),
                        args,
                    },
                    span,
                )
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr(bp::DEFAULT);
                self.expect(TokenKind::RBracket, "expected ']' to close index expression");
                Expr::new(
                    ExprKind::Index {
                        container: Box::new(left),
                        index: Box::new(index),
                    },
                    span,
                )
            }
            TokenKind::LBrace if !self.parsing_block_precursor => {
                if let ExprKind::Identifier(name) = left.kind {
                    self.advance();
                    let mut fields = Vec::new();
                    let mut seen = std::collections::HashSet::new();
                    while self.peek_kind() != TokenKind::RBrace
                        && self.peek_kind() != TokenKind::EndOfFile
                    {
                        let field_tok =
                            self.expect(TokenKind::Identifier, "expected field name");
                        self.expect(TokenKind::Eq, "expected '=' after field name");
                        let value = self.parse_expr(bp::ARROW);
                        if !seen.insert(field_tok.lexeme) {
                            let dup_span = self.current_span();
                            self.report(
                                format!("duplicate field '{}' in aggregate instantiation", field_tok.lexeme.as_str()),
                                dup_span,
                                ferritec_util::diagnostic::DiagnosticCode::E_PARSER_DUPLICATE_DEF,
                            );
                        }
                        fields.push(FieldInit {
                            name: field_tok.lexeme,
                            value,
                        });
                        if self.peek_kind() == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    self.expect(TokenKind::RBrace, "expected '}' to close aggregate instantiation");
                    Expr::new(
                        ExprKind::AggregateInstantiation {
                            name,
                            type_args: Vec::new(),
                            fields,
                        },
                        span,
                    )
                } else {
                    left
                }
            }
            TokenKind::Dot => {
                self.advance();
                let prop = self.expect(TokenKind::Identifier, "expected field name after '.'");
                Expr::new(
                    ExprKind::MemberAccess {
                        object: Box::new(left),
                        property: prop.lexeme,
                    },
                    span,
                )
            }
            TokenKind::ColonColon => {
                self.advance();
                let elem = self.expect(TokenKind::Identifier, "expected identifier after '::'");
                Expr::new(
                    ExprKind::ScopeResolution {
                        scope: Box::new(left),
                        element: elem.lexeme,
                    },
                    span,
                )
            }
            TokenKind::At => {
                self.advance();
                self.expect(TokenKind::LBracket, "expected '[' after '@' in generic argument list");
                let mut args = Vec::new();
                if self.peek_kind() != TokenKind::RBracket {
                    loop {
                        args.push(self.parse_type());
                        if self.peek_kind() == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "expected ']' to close generic argument list");
                Expr::new(
                    ExprKind::Generic {
                        base: Box::new(left),
                        type_args: args,
                    },
                    span,
                )
            }
            TokenKind::As => {
                self.advance();
                let target = self.parse_type();
                Expr::new(
                    ExprKind::TypeCast {
                        value: Box::new(left),
                        target,
                    },
                    span,
                )
            }
            TokenKind::PlusPlus => {
                self.advance();
                Expr::new(
                    ExprKind::Postfix {
                        left: Box::new(left),
                        op: PostfixOp::Increment,
                    },
                    span,
                )
            }
            TokenKind::MinusMinus => {
                self.advance();
                Expr::new(
                    ExprKind::Postfix {
                        left: Box::new(left),
                        op: PostfixOp::Decrement,
                    },
                    span,
                )
            }
            _ => left,
        }
    }

    /// Left binding power for a token starting a led; 0 (never binds)
    /// for tokens with no led handler.
    pub(crate) fn led_binding_power(&self, kind: TokenKind) -> u8 {
        use TokenKind::*;
        match kind {
            Eq | PlusEq | MinusEq | StarEq | SlashEq | SlashSlashEq | PercentEq | CaretCaretEq
            | AmpEq | PipeEq | CaretEq | ShlEq | ShrEq => bp::ASSIGNMENT,
            As => bp::TYPE_CAST,
            PipePipe => bp::LOGICAL_OR,
            AmpAmp => bp::LOGICAL_AND,
            Pipe => bp::BITWISE_OR,
            Caret => bp::BITWISE_XOR,
            Amp => bp::BITWISE_AND,
            EqEq | NotEq => bp::EQUALITY,
            Lt | LtEq | Gt | GtEq => bp::RELATIONAL,
            Shl | Shr => bp::BITWISE_SHIFT,
            Plus | Minus => bp::ADDITIVE,
            Star | Slash | SlashSlash | Percent => bp::MULTIPLICATIVE,
            CaretCaret => bp::EXPONENTIAL,
            PlusPlus | MinusMinus => bp::POSTFIX,
            Dot => bp::MEMBER,
            ColonColon => bp::SCOPE_RESOLUTION,
            At => bp::GENERIC,
            LParen | LBracket => bp::POSTFIX,
            LBrace if !self.parsing_block_precursor => bp::POSTFIX,
            _ => bp::DEFAULT,
        }
    }
}

fn unary_op_for(kind: TokenKind) -> Option<UnOp> {
    Some(match kind {
        TokenKind::Plus => UnOp::Plus,
        TokenKind::Minus => UnOp::Minus,
        TokenKind::Amp => UnOp::AddressOf,
        TokenKind::Star => UnOp::Dereference,
        _ => return None,
    })
}

fn binary_op_for(kind: TokenKind) -> Option<BinOp> {
    use TokenKind::*;
    Some(match kind {
        Plus => BinOp::Add,
        Minus => BinOp::Sub,
        Star => BinOp::Mul,
        Slash => BinOp::Div,
        SlashSlash => BinOp::IntDiv,
        Percent => BinOp::Mod,
        CaretCaret => BinOp::Exp,
        EqEq => BinOp::Eq,
        NotEq => BinOp::NotEq,
        Lt => BinOp::Lt,
        LtEq => BinOp::LtEq,
        Gt => BinOp::Gt,
        GtEq => BinOp::GtEq,
        AmpAmp => BinOp::And,
        PipePipe => BinOp::Or,
        Amp => BinOp::BitAnd,
        Pipe => BinOp::BitOr,
        Caret => BinOp::BitXor,
        Shl => BinOp::Shl,
        Shr => BinOp::Shr,
        _ => return None,
    })
}

fn compound_assign_op_for(kind: TokenKind) -> Option<BinOp> {
    use TokenKind::*;
    Some(match kind {
        PlusEq => BinOp::Add,
        MinusEq => BinOp::Sub,
        StarEq => BinOp::Mul,
        SlashEq => BinOp::Div,
        SlashSlashEq => BinOp::IntDiv,
        PercentEq => BinOp::Mod,
        CaretCaretEq => BinOp::Exp,
        AmpEq => BinOp::BitAnd,
        PipeEq => BinOp::BitOr,
        CaretEq => BinOp::BitXor,
        ShlEq => BinOp::Shl,
        ShrEq => BinOp::Shr,
        _ => return None,
    })
}

/// Parse a numeric literal lexeme (with base prefix, digit separators,
/// and typed suffix already validated by the lexer) into a tagged value.
pub(crate) fn parse_number_literal(text: &str, is_float: bool) -> NumberValue {
    let lower = text.to_ascii_lowercase();
    let (mantissa, suffix) = split_suffix(&lower);

    let (base, digits) = if let Some(rest) = mantissa.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = mantissa.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = mantissa.strip_prefix("0o") {
        (8, rest)
    } else {
        (10, mantissa.as_str())
    };
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();

    let is_float = is_float || cleaned.contains('.') || (base == 10 && (cleaned.contains('e')));

    if is_float {
        let value: f64 = cleaned.parse().unwrap_or(0.0);
        return match suffix.as_deref() {
            Some("f32") => NumberValue::F32(value as f32),
            _ => NumberValue::F64(value),
        };
    }

    let value: u64 = u64::from_str_radix(&cleaned, base).unwrap_or(0);
    match suffix.as_deref() {
        Some("i8") => NumberValue::I8(value as i8),
        Some("i16") => NumberValue::I16(value as i16),
        Some("i32") => NumberValue::I32(value as i32),
        Some("i64") => NumberValue::I64(value as i64),
        Some("u8") => NumberValue::U8(value as u8),
        Some("u16") => NumberValue::U16(value as u16),
        Some("u32") => NumberValue::U32(value as u32),
        Some("u64") => NumberValue::U64(value),
        Some("f32") => NumberValue::F32(value as f32),
        Some("f64") => NumberValue::F64(value as f64),
        _ => NumberValue::I32(value as i32),
    }
}

fn split_suffix(lower: &str) -> (String, Option<String>) {
    for suffix in ["i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64"] {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            let mantissa = &lower[..lower.len() - suffix.len()];
            // Avoid stripping a trailing hex digit sequence that
            // happens to look like a suffix (e.g. `0xdeadbeefu8` is
            // legitimate; a bare `0xface` is not improperly split
            // since hex literals only reach here via a `0x` prefix
            // check performed by the caller after this split).
            return (mantissa.to_string(), Some(suffix.to_string()));
        }
    }
    (lower.to_string(), None)
}

