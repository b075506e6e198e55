//! Type parsing: mirrors expression parsing with its own small nud
//! table, plus `[` (array) and `@[...]` (generic) postfix forms.

use std::rc::Rc;

use ferritec_lex::token::TokenKind;

use crate::ast::{ArrayLength, NumberValue, Primitive, Type, TypeHandle};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_type(&mut self) -> TypeHandle {
        let mut ty = self.parse_type_nud();
        loop {
            match self.peek_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let length = if self.peek_kind() == TokenKind::RBracket {
                        None
                    } else {
                        let expr = self.parse_expr(0);
                        Some(match &expr.kind {
                            crate::ast::ExprKind::NumberLiteral(n) => {
                                ArrayLength::Literal(number_as_u64(n))
                            }
                            _ => ArrayLength::Expr(Rc::new(expr)),
                        })
                    };
                    self.expect(TokenKind::RBracket, "expected ']' after array length");
                    ty = Rc::new(Type::ArrayType { element: ty, length });
                }
                TokenKind::At => {
                    self.advance();
                    self.expect(TokenKind::LBracket, "expected '[' after '@' in generic type");
                    let args = self.parse_type_args();
                    let base = match ty.as_ref() {
                        Type::SymbolType { name, .. } => *name,
                        _ => ferritec_util::Symbol::intern("<generic>"),
                    };
                    ty = Rc::new(Type::GenericType { base, args });
                }
                _ => break,
            }
        }
        ty
    }

    fn parse_type_args(&mut self) -> Vec<TypeHandle> {
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
        self.expect(
            TokenKind::RBracket,
            "expected ']' to close generic argument list",
        );
        args
    }

    fn parse_type_nud(&mut self) -> TypeHandle {
        let kind = self.peek_kind();
        if let Some(primitive) = primitive_for(kind) {
            let tok = self.advance();
            return Rc::new(Type::SymbolType {
                name: tok.lexeme,
                primitive: Some(primitive),
            });
        }
        match kind {
            TokenKind::Identifier => {
                let tok = self.advance();
                Rc::new(Type::SymbolType {
                    name: tok.lexeme,
                    primitive: None,
                })
            }
            TokenKind::Ptr => {
                self.advance();
                let mutable = if self.peek_kind() == TokenKind::Mut {
                    self.advance();
                    true
                } else {
                    false
                };
                let pointee = self.parse_type();
                Rc::new(Type::PointerType { pointee, mutable })
            }
            TokenKind::Func => {
                self.advance();
                self.expect(TokenKind::LParen, "expected '(' after 'func' in function type");
                let mut params = Vec::new();
                if self.peek_kind() != TokenKind::RParen {
                    loop {
                        let mutable = if self.peek_kind() == TokenKind::Mut {
                            self.advance();
                            true
                        } else {
                            false
                        };
                        params.push((self.parse_type(), mutable));
                        if self.peek_kind() == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(
                    TokenKind::RParen,
                    "expected ')' to close function type parameters",
                );
                let ret = if self.peek_kind() == TokenKind::Arrow {
                    self.advance();
                    self.parse_type()
                } else {
                    Rc::new(Type::SymbolType {
                        name: ferritec_util::Symbol::intern("void"),
                        primitive: None,
                    })
                };
                Rc::new(Type::FunctionType { params, ret })
            }
            TokenKind::Aggregate => {
                self.advance();
                self.expect(
                    TokenKind::LBrace,
                    "expected '{' after 'aggregate' in anonymous aggregate type",
                );
                let mut fields = Vec::new();
                while self.peek_kind() != TokenKind::RBrace
                    && self.peek_kind() != TokenKind::EndOfFile
                {
                    fields.push((ferritec_util::Symbol::intern(""), self.parse_type()));
                    if self.peek_kind() == TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect(
                    TokenKind::RBrace,
                    "expected '}' to close anonymous aggregate type",
                );
                Rc::new(Type::AggregateType { fields })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type();
                self.expect(TokenKind::RParen, "expected ')' to close parenthesized type");
                inner
            }
            _ => {
                self.error_expected_token("a type");
                Rc::new(Type::Unknown)
            }
        }
    }
}

fn number_as_u64(n: &NumberValue) -> u64 {
    match *n {
        NumberValue::I8(v) => v.max(0) as u64,
        NumberValue::I16(v) => v.max(0) as u64,
        NumberValue::I32(v) => v.max(0) as u64,
        NumberValue::I64(v) => v.max(0) as u64,
        NumberValue::U8(v) => v as u64,
        NumberValue::U16(v) => v as u64,
        NumberValue::U32(v) => v as u64,
        NumberValue::U64(v) => v,
        NumberValue::F32(v) => v.max(0.0) as u64,
        NumberValue::F64(v) => v.max(0.0) as u64,
    }
}

fn primitive_for(kind: TokenKind) -> Option<Primitive> {
    Some(match kind {
        TokenKind::TyInt8 => Primitive::Int8,
        TokenKind::TyInt16 => Primitive::Int16,
        TokenKind::TyInt32 => Primitive::Int32,
        TokenKind::TyInt64 => Primitive::Int64,
        TokenKind::TyUInt8 => Primitive::UInt8,
        TokenKind::TyUInt16 => Primitive::UInt16,
        TokenKind::TyUInt32 => Primitive::UInt32,
        TokenKind::TyUInt64 => Primitive::UInt64,
        TokenKind::TyFloat32 => Primitive::Float32,
        TokenKind::TyFloat64 => Primitive::Float64,
        TokenKind::TyChar => Primitive::Char,
        TokenKind::TyBool => Primitive::Bool,
        TokenKind::TyString => Primitive::String,
        _ => return None,
    })
}
