//! Token kinds and the `Token` record produced by the lexer.
//!
//! The kind enumeration is partitioned into contiguous sub-ranges for
//! keywords and operators so that [`TokenKind::is_keyword`] and
//! [`TokenKind::is_operator`] are plain range checks rather than match
//! statements that need to be kept in sync by hand.

use ferritec_util::Symbol;

/// A single lexical token kind.
///
/// Variant order matters: the keyword kinds form one contiguous block
/// (`Let..=Alias`) and the operator kinds form another (`Plus..=At`).
/// Do not reorder variants without updating [`TokenKind::is_keyword`] /
/// [`TokenKind::is_operator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // ---- basic -------------------------------------------------------
    Identifier,
    StrLiteral,
    CharLiteral,
    IntegerLiteral,
    FloatLiteral,

    // ---- bracket tokens ------------------------------------------------
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // ---- punctuation ---------------------------------------------------
    Semicolon,
    Colon,
    Comma,

    EndOfFile,

    /// Used only on catastrophic misparses.
    Unknown,

    // ==== keyword kinds (contiguous: Let..=Alias) =======================
    Let,
    Const,
    Mut,
    Ptr,
    Private,
    ReadOnly,
    Public,

    TyInt8,
    TyInt16,
    TyInt32,
    TyInt64,
    TyUInt8,
    TyUInt16,
    TyUInt32,
    TyUInt64,
    TyFloat32,
    TyFloat64,
    TyChar,
    TyBool,
    TyString,

    True,
    False,

    If,
    Elif,
    Else,

    Switch,
    Case,
    Default,

    For,
    While,
    Repeat,
    Do,
    Break,
    Continue,

    Func,
    Lambda,
    Return,

    Import,
    Module,
    As,

    Aggregate,
    Enum,
    Blueprint,

    Alias,

    // ==== operator kinds (contiguous: Plus..=At) ========================
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    CaretCaret,
    PlusPlus,
    MinusMinus,

    // Synthesized by the parser from shared symbols in unary context.
    UnaryPlus,
    UnaryMinus,
    AddressOf,
    Dereference,

    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,

    AmpAmp,
    PipePipe,
    Bang,

    Amp,
    Pipe,
    Tilde,
    Caret,
    Shl,
    Shr,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    SlashSlashEq,
    PercentEq,
    CaretCaretEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    Dot,
    ColonColon,
    Eq,
    Arrow,
    DotDotDot,
    At,
}

impl TokenKind {
    /// True if this kind lies in the keyword sub-range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_lex::token::TokenKind;
    ///
    /// assert!(TokenKind::Let.is_keyword());
    /// assert!(!TokenKind::Plus.is_keyword());
    /// assert!(!TokenKind::Identifier.is_keyword());
    /// ```
    pub fn is_keyword(&self) -> bool {
        (*self as u8) >= TokenKind::Let as u8 && (*self as u8) <= TokenKind::Alias as u8
    }

    /// True if this kind lies in the operator sub-range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferritec_lex::token::TokenKind;
    ///
    /// assert!(TokenKind::Plus.is_operator());
    /// assert!(!TokenKind::Let.is_operator());
    /// ```
    pub fn is_operator(&self) -> bool {
        (*self as u8) >= TokenKind::Plus as u8 && (*self as u8) <= TokenKind::At as u8
    }
}

/// A lexical token: kind, lexeme text, source position, and an
/// invalid-recovery flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Interned lexeme text (the raw source slice, or the decoded value
    /// for identifiers/strings/chars).
    pub lexeme: Symbol,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 1-based column of the token's first character.
    pub column: u32,
    /// Set when this token is a best-effort recovery token for a
    /// malformed lexeme (unterminated string, bad escape, stray byte...).
    pub invalid: bool,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl AsRef<str>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: Symbol::intern(lexeme.as_ref()),
            line,
            column,
            invalid: false,
        }
    }

    pub fn invalid(kind: TokenKind, lexeme: impl AsRef<str>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: Symbol::intern(lexeme.as_ref()),
            line,
            column,
            invalid: true,
        }
    }
}

/// Look up the keyword kind for an identifier lexeme, if it is reserved.
///
/// # Examples
///
/// ```
/// use ferritec_lex::token::{keyword_from_str, TokenKind};
///
/// assert_eq!(keyword_from_str("let"), Some(TokenKind::Let));
/// assert_eq!(keyword_from_str("int32"), Some(TokenKind::TyInt32));
/// assert_eq!(keyword_from_str("foo"), None);
/// ```
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    Some(match s {
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "mut" => TokenKind::Mut,
        "ptr" => TokenKind::Ptr,
        "private" => TokenKind::Private,
        "readonly" => TokenKind::ReadOnly,
        "public" => TokenKind::Public,
        "int8" => TokenKind::TyInt8,
        "int16" => TokenKind::TyInt16,
        "int32" => TokenKind::TyInt32,
        "int64" => TokenKind::TyInt64,
        "uint8" => TokenKind::TyUInt8,
        "uint16" => TokenKind::TyUInt16,
        "uint32" => TokenKind::TyUInt32,
        "uint64" => TokenKind::TyUInt64,
        "float32" => TokenKind::TyFloat32,
        "float64" => TokenKind::TyFloat64,
        "char" => TokenKind::TyChar,
        "bool" => TokenKind::TyBool,
        "string" => TokenKind::TyString,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "repeat" => TokenKind::Repeat,
        "do" => TokenKind::Do,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "func" => TokenKind::Func,
        "lambda" => TokenKind::Lambda,
        "return" => TokenKind::Return,
        "import" => TokenKind::Import,
        "module" => TokenKind::Module,
        "as" => TokenKind::As,
        "aggregate" => TokenKind::Aggregate,
        "enum" => TokenKind::Enum,
        "blueprint" => TokenKind::Blueprint,
        "alias" => TokenKind::Alias,
        _ => return None,
    })
}
