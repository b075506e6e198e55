//! The lexer: a lazy token stream over a [`Reader`], implementing the
//! tokenization rules for numeric/string/char literals, identifiers and
//! keywords, comments, and maximal-munch operator scanning.

use ferritec_util::{Handler, Span};

use crate::reader::Reader;
use crate::token::{keyword_from_str, Token, TokenKind};
use crate::unicode::{is_ascii_ident_continue, is_ascii_ident_start, is_digit_in_base};

/// Lazily tokenizes source text, exposing a one-token look-ahead FIFO.
///
/// # Examples
///
/// ```
/// use ferritec_util::Handler;
/// use ferritec_lex::Lexer;
/// use ferritec_lex::token::TokenKind;
///
/// let mut handler = Handler::new();
/// let mut lexer = Lexer::new("let x = 5;", &mut handler);
/// assert_eq!(lexer.consume().kind, TokenKind::Let);
/// assert_eq!(lexer.consume().kind, TokenKind::Identifier);
/// ```
pub struct Lexer<'a> {
    reader: Reader<'a>,
    handler: &'a Handler,
    queue: std::collections::VecDeque<Token>,
    had_error: bool,
    had_critical_error: bool,
    /// Set once a consumed token (not merely a peeked one) was `EndOfFile`.
    eof_consumed: bool,
    /// Block comments retained verbatim for `ParsedFile::block_comments`.
    pub block_comments: Vec<(Span, String)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            reader: Reader::from_str(source),
            handler,
            queue: std::collections::VecDeque::new(),
            had_error: false,
            had_critical_error: false,
            eof_consumed: false,
            block_comments: Vec::new(),
        }
    }

    pub fn from_file(path: &std::path::Path, handler: &'a Handler) -> std::io::Result<Self> {
        Ok(Self {
            reader: Reader::from_file(path)?,
            handler,
            queue: std::collections::VecDeque::new(),
            had_error: false,
            had_critical_error: false,
            eof_consumed: false,
            block_comments: Vec::new(),
        })
    }

    /// Lex tokens as needed to return the head without removing it.
    pub fn peek(&mut self) -> &Token {
        if self.queue.is_empty() {
            let t = self.lex_one();
            self.queue.push_back(t);
        }
        self.queue.front().unwrap()
    }

    /// Return and remove the head, triggering more lexing when empty.
    pub fn consume(&mut self) -> Token {
        let t = if self.queue.is_empty() {
            self.lex_one()
        } else {
            self.queue.pop_front().unwrap()
        };
        if t.kind == TokenKind::EndOfFile {
            self.eof_consumed = true;
        }
        t
    }

    /// True only after `EndOfFile` has been produced and drained via
    /// [`Lexer::consume`]; merely [`Lexer::peek`]-ing it is not enough.
    pub fn done(&mut self) -> bool {
        self.eof_consumed
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_critical_error(&self) -> bool {
        self.had_critical_error
    }

    fn report(&mut self, message: impl Into<String>, line: u32, column: u32) {
        self.had_error = true;
        let span = Span::new(0, 0, line, column);
        self.handler.build_error(span, message).emit(self.handler);
    }

    /// Used for failures the spec designates critical (I/O, invalid
    /// source encoding) -- halts the phase rather than merely producing
    /// an invalid-recovery token.
    #[allow(dead_code)]
    fn report_critical(&mut self, message: impl Into<String>, line: u32, column: u32) {
        self.had_error = true;
        self.had_critical_error = true;
        let span = Span::new(0, 0, line, column);
        self.handler
            .build_error(span, message)
            .code(ferritec_util::diagnostic::DiagnosticCode::E_LEXER_IO_FAILURE)
            .emit(self.handler);
    }

    fn lex_one(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.reader.line();
        let column = self.reader.column();

        if self.reader.done() {
            return Token::new(TokenKind::EndOfFile, "", line, column);
        }

        let c = self.reader.peek(0);
        match c {
            '(' => self.single(TokenKind::LParen, line, column),
            ')' => self.single(TokenKind::RParen, line, column),
            '{' => self.single(TokenKind::LBrace, line, column),
            '}' => self.single(TokenKind::RBrace, line, column),
            '[' => self.single(TokenKind::LBracket, line, column),
            ']' => self.single(TokenKind::RBracket, line, column),
            ';' => self.single(TokenKind::Semicolon, line, column),
            ',' => self.single(TokenKind::Comma, line, column),
            '"' => self.lex_string(line, column),
            '\'' => self.lex_char(line, column),
            _ if c.is_ascii_digit() => self.lex_number(line, column),
            _ if is_ascii_ident_start(c) => self.lex_identifier(line, column),
            _ => self.lex_operator(line, column),
        }
    }

    fn single(&mut self, kind: TokenKind, line: u32, column: u32) -> Token {
        let c = self.reader.consume();
        Token::new(kind, c.to_string(), line, column)
    }

    // ---- whitespace & comments -----------------------------------------

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.reader.peek(0);
            if c.is_whitespace() {
                self.reader.consume();
                continue;
            }
            if c == '#' {
                while !self.reader.done() && self.reader.peek(0) != '\n' {
                    self.reader.consume();
                }
                continue;
            }
            if c == '/' && self.reader.peek(1) == '*' {
                self.skip_block_comment();
                continue;
            }
            break;
        }
    }

    fn skip_block_comment(&mut self) {
        let line = self.reader.line();
        let column = self.reader.column();
        self.reader.consume(); // '/'
        self.reader.consume(); // '*'
        let mut text = String::new();
        let mut depth = 1usize;
        loop {
            if self.reader.done() {
                self.report("unterminated block comment", line, column);
                break;
            }
            if self.reader.peek(0) == '/' && self.reader.peek(1) == '*' {
                text.push(self.reader.consume());
                text.push(self.reader.consume());
                depth += 1;
                continue;
            }
            if self.reader.peek(0) == '*' && self.reader.peek(1) == '/' {
                self.reader.consume();
                self.reader.consume();
                depth -= 1;
                if depth == 0 {
                    break;
                }
                text.push('*');
                text.push('/');
                continue;
            }
            text.push(self.reader.consume());
        }
        let span = Span::new(0, 0, line, column);
        self.block_comments.push((span, text));
    }

    // ---- identifiers / keywords -----------------------------------------

    fn lex_identifier(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        while is_ascii_ident_continue(self.reader.peek(0)) {
            text.push(self.reader.consume());
        }
        match keyword_from_str(&text) {
            Some(kind) => Token::new(kind, text, line, column),
            None => Token::new(TokenKind::Identifier, text, line, column),
        }
    }

    // ---- numbers ---------------------------------------------------------

    fn lex_number(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        let mut base = 10u32;
        let mut is_float = false;

        if self.reader.peek(0) == '0' && matches!(self.reader.peek(1), 'x' | 'X' | 'b' | 'B' | 'o' | 'O') {
            text.push(self.reader.consume());
            let prefix = self.reader.consume();
            text.push(prefix);
            base = match prefix {
                'x' | 'X' => 16,
                'b' | 'B' => 2,
                'o' | 'O' => 8,
                _ => unreachable!(),
            };
        }

        while is_digit_in_base(self.reader.peek(0), base) || self.reader.peek(0) == '_' {
            text.push(self.reader.consume());
        }

        if base == 10 && self.reader.peek(0) == '.' && self.reader.peek(1).is_ascii_digit() {
            is_float = true;
            text.push(self.reader.consume()); // '.'
            while self.reader.peek(0).is_ascii_digit() || self.reader.peek(0) == '_' {
                text.push(self.reader.consume());
            }
        } else if base == 16 && self.reader.peek(0) == '.' {
            is_float = true;
            text.push(self.reader.consume());
            while is_digit_in_base(self.reader.peek(0), 16) || self.reader.peek(0) == '_' {
                text.push(self.reader.consume());
            }
        }

        if base == 10 && matches!(self.reader.peek(0), 'e' | 'E') {
            is_float = true;
            text.push(self.reader.consume());
            if matches!(self.reader.peek(0), '+' | '-') {
                text.push(self.reader.consume());
            }
            while self.reader.peek(0).is_ascii_digit() {
                text.push(self.reader.consume());
            }
        } else if base == 16 && matches!(self.reader.peek(0), 'p' | 'P') {
            is_float = true;
            text.push(self.reader.consume());
            if matches!(self.reader.peek(0), '+' | '-') {
                text.push(self.reader.consume());
            }
            while self.reader.peek(0).is_ascii_digit() {
                text.push(self.reader.consume());
            }
        }

        // Optional typed suffix: iN/uN/fN.
        if matches!(self.reader.peek(0), 'i' | 'u' | 'I' | 'U') && !is_float {
            let save = text.len();
            let mut suffix = String::new();
            suffix.push(self.reader.peek(0));
            let mut probe = 1;
            while self.reader.peek(probe).is_ascii_digit() {
                suffix.push(self.reader.peek(probe));
                probe += 1;
            }
            if matches!(suffix.as_str(), "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64")
                || matches!(suffix.to_ascii_lowercase().as_str(), "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64")
            {
                for _ in 0..probe {
                    text.push(self.reader.consume());
                }
            }
            let _ = save;
        } else if matches!(self.reader.peek(0), 'f' | 'F') {
            let mut suffix = String::new();
            suffix.push(self.reader.peek(0));
            let mut probe = 1;
            while self.reader.peek(probe).is_ascii_digit() {
                suffix.push(self.reader.peek(probe));
                probe += 1;
            }
            if matches!(suffix.to_ascii_lowercase().as_str(), "f32" | "f64") {
                is_float = true;
                for _ in 0..probe {
                    text.push(self.reader.consume());
                }
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        Token::new(kind, text, line, column)
    }

    // ---- strings / chars ---------------------------------------------------

    fn lex_string(&mut self, line: u32, column: u32) -> Token {
        self.reader.consume(); // opening quote
        let mut value = String::new();
        let mut invalid = false;
        loop {
            if self.reader.done() {
                self.report("unterminated string literal", line, column);
                invalid = true;
                break;
            }
            let c = self.reader.peek(0);
            if c == '"' {
                self.reader.consume();
                break;
            }
            if c == '\n' {
                self.report("unterminated string literal", line, column);
                invalid = true;
                break;
            }
            if c == '\\' {
                self.reader.consume();
                if self.reader.peek(0) == '\n' {
                    // line continuation: swallow the newline, no char emitted.
                    self.reader.consume();
                    continue;
                }
                match self.lex_escape(line, column) {
                    Some(ch) => value.push(ch),
                    None => invalid = true,
                }
                continue;
            }
            value.push(self.reader.consume());
        }
        if invalid {
            Token::invalid(TokenKind::StrLiteral, value, line, column)
        } else {
            Token::new(TokenKind::StrLiteral, value, line, column)
        }
    }

    fn lex_char(&mut self, line: u32, column: u32) -> Token {
        self.reader.consume(); // opening quote
        let mut invalid = false;
        let ch = if self.reader.peek(0) == '\\' {
            self.reader.consume();
            match self.lex_escape(line, column) {
                Some(ch) => ch,
                None => {
                    invalid = true;
                    '\0'
                }
            }
        } else if self.reader.peek(0) == '\n' || self.reader.done() {
            self.report("unterminated character literal", line, column);
            invalid = true;
            '\0'
        } else {
            self.reader.consume()
        };
        if self.reader.peek(0) == '\'' {
            self.reader.consume();
        } else {
            self.report("character literal may only contain one character", line, column);
            invalid = true;
            while !self.reader.done() && self.reader.peek(0) != '\'' && self.reader.peek(0) != '\n' {
                self.reader.consume();
            }
            if self.reader.peek(0) == '\'' {
                self.reader.consume();
            }
        }
        let text = ch.to_string();
        if invalid {
            Token::invalid(TokenKind::CharLiteral, text, line, column)
        } else {
            Token::new(TokenKind::CharLiteral, text, line, column)
        }
    }

    fn lex_escape(&mut self, line: u32, column: u32) -> Option<char> {
        let c = self.reader.consume();
        match c {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            '0' => Some('\0'),
            'x' => {
                let hi = self.reader.consume();
                let lo = self.reader.consume();
                let hex: String = [hi, lo].into_iter().collect();
                match crate::unicode::parse_hex_byte(&hex) {
                    Some(b) => Some(b as char),
                    None => {
                        self.report("invalid \\x escape", line, column);
                        None
                    }
                }
            }
            'u' => self.lex_unicode_escape(4, line, column),
            'U' => self.lex_unicode_escape(8, line, column),
            other => {
                self.report(format!("invalid escape sequence '\\{other}'"), line, column);
                None
            }
        }
    }

    fn lex_unicode_escape(&mut self, digits: usize, line: u32, column: u32) -> Option<char> {
        let braced = self.reader.peek(0) == '{';
        if braced {
            self.reader.consume();
        }
        let mut hex = String::new();
        while self.reader.peek(0).is_ascii_hexdigit() && hex.len() < digits.max(8) {
            hex.push(self.reader.consume());
        }
        if braced && self.reader.peek(0) == '}' {
            self.reader.consume();
        }
        match crate::unicode::parse_hex_codepoint(&hex) {
            Some(cp) => match crate::unicode::codepoint_to_char(cp) {
                Some(c) => Some(c),
                None => {
                    self.report(format!("invalid unicode escape: surrogate or out-of-range codepoint U+{cp:X}"), line, column);
                    None
                }
            },
            None => {
                self.report("invalid unicode escape", line, column);
                None
            }
        }
    }

    // ---- operators ---------------------------------------------------------

    fn lex_operator(&mut self, line: u32, column: u32) -> Token {
        let c = self.reader.peek(0);
        let c1 = self.reader.peek(1);
        let c2 = self.reader.peek(2);

        macro_rules! take {
            ($n:expr, $kind:expr) => {{
                let mut s = String::new();
                for _ in 0..$n {
                    s.push(self.reader.consume());
                }
                return Token::new($kind, s, line, column);
            }};
        }

        match (c, c1, c2) {
            ('.', '.', '.') => take!(3, TokenKind::DotDotDot),
            ('/', '/', '=') => take!(3, TokenKind::SlashSlashEq),
            ('<', '<', '=') => take!(3, TokenKind::ShlEq),
            ('>', '>', '=') => take!(3, TokenKind::ShrEq),
            ('^', '^', '=') => take!(3, TokenKind::CaretCaretEq),
            _ => {}
        }

        match (c, c1) {
            ('/', '/') => take!(2, TokenKind::SlashSlash),
            ('^', '^') => take!(2, TokenKind::CaretCaret),
            ('+', '+') => take!(2, TokenKind::PlusPlus),
            ('-', '-') => take!(2, TokenKind::MinusMinus),
            ('&', '&') => take!(2, TokenKind::AmpAmp),
            ('|', '|') => take!(2, TokenKind::PipePipe),
            ('=', '=') => take!(2, TokenKind::EqEq),
            ('!', '=') => take!(2, TokenKind::NotEq),
            ('<', '=') => take!(2, TokenKind::LtEq),
            ('>', '=') => take!(2, TokenKind::GtEq),
            ('<', '<') => take!(2, TokenKind::Shl),
            ('>', '>') => take!(2, TokenKind::Shr),
            ('-', '>') => take!(2, TokenKind::Arrow),
            (':', ':') => take!(2, TokenKind::ColonColon),
            ('+', '=') => take!(2, TokenKind::PlusEq),
            ('-', '=') => take!(2, TokenKind::MinusEq),
            ('*', '=') => take!(2, TokenKind::StarEq),
            ('/', '=') => take!(2, TokenKind::SlashEq),
            ('%', '=') => take!(2, TokenKind::PercentEq),
            ('&', '=') => take!(2, TokenKind::AmpEq),
            ('|', '=') => take!(2, TokenKind::PipeEq),
            ('^', '=') => take!(2, TokenKind::CaretEq),
            _ => {}
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '=' => TokenKind::Eq,
            '!' => TokenKind::Bang,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '~' => TokenKind::Tilde,
            '^' => TokenKind::Caret,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            _ => {
                self.report(format!("unexpected character '{c}'"), line, column);
                let s = self.reader.consume().to_string();
                return Token::invalid(TokenKind::Unknown, s, line, column);
            }
        };
        take!(1, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        let mut out = Vec::new();
        loop {
            let t = lexer.consume();
            let is_eof = t.kind == TokenKind::EndOfFile;
            out.push(t);
            if is_eof {
                break;
            }
        }
        out
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("let x = 5;"),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::IntegerLiteral,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn hex_binary_octal_literals() {
        let toks = lex_all("0xFF 0b1010 0o33");
        assert_eq!(toks[0].lexeme.as_str(), "0xFF");
        assert_eq!(toks[1].lexeme.as_str(), "0b1010");
        assert_eq!(toks[2].lexeme.as_str(), "0o33");
        assert!(toks.iter().all(|t| t.kind == TokenKind::IntegerLiteral || t.kind == TokenKind::EndOfFile));
    }

    #[test]
    fn float_literal_with_exponent() {
        let toks = lex_all("2.5e-3");
        assert_eq!(toks[0].kind, TokenKind::FloatLiteral);
        assert_eq!(toks[0].lexeme.as_str(), "2.5e-3");
    }

    #[test]
    fn typed_integer_suffix() {
        let toks = lex_all("42i64 7u8");
        assert_eq!(toks[0].lexeme.as_str(), "42i64");
        assert_eq!(toks[1].lexeme.as_str(), "7u8");
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(
            kinds("a ^^ b // c << d"),
            vec![
                TokenKind::Identifier,
                TokenKind::CaretCaret,
                TokenKind::Identifier,
                TokenKind::SlashSlash,
                TokenKind::Identifier,
                TokenKind::Shl,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("let # trailing\nx"), vec![TokenKind::Let, TokenKind::Identifier, TokenKind::EndOfFile]);
    }

    #[test]
    fn nested_block_comments_close_cleanly() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("/* a /* b */ c */ x", &handler);
        let t = lexer.consume();
        assert_eq!(t.kind, TokenKind::Identifier);
        assert!(!lexer.had_error());
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("/* never closes", &handler);
        lexer.consume();
        assert!(lexer.had_error());
    }

    #[test]
    fn string_literal_with_escapes() {
        let toks = lex_all(r#""a\nb\"c""#);
        assert_eq!(toks[0].kind, TokenKind::StrLiteral);
        assert_eq!(toks[0].lexeme.as_str(), "a\nb\"c");
    }

    #[test]
    fn unicode_escape_short_and_long() {
        let toks = lex_all(r"'ሴ' '\U0001F600'");
        assert_eq!(toks[0].lexeme.as_str(), "\u{1234}");
        assert_eq!(toks[1].lexeme.as_str(), "\u{1F600}");
    }

    #[test]
    fn unterminated_string_is_invalid_and_errors() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"oops", &handler);
        let t = lexer.consume();
        assert!(t.invalid);
        assert!(lexer.had_error());
    }

    #[test]
    fn char_literal_with_multiple_chars_is_invalid() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("'ab'", &handler);
        let t = lexer.consume();
        assert!(t.invalid);
        assert!(lexer.had_error());
    }

    #[test]
    fn stray_character_is_reported_and_recovers() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("let $ x", &handler);
        assert_eq!(lexer.consume().kind, TokenKind::Let);
        let bad = lexer.consume();
        assert!(bad.invalid);
        assert_eq!(lexer.consume().kind, TokenKind::Identifier);
        assert!(lexer.had_error());
    }

    #[test]
    fn done_is_true_only_after_eof_drained() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("x", &handler);
        assert!(!lexer.done());
        lexer.consume(); // Identifier
        assert!(!lexer.done());
        lexer.consume(); // Eof
        assert!(lexer.done());
    }

    #[test]
    fn peek_does_not_advance() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a b", &handler);
        assert_eq!(lexer.peek().kind, TokenKind::Identifier);
        assert_eq!(lexer.peek().kind, TokenKind::Identifier);
        lexer.consume();
        assert_eq!(lexer.peek().lexeme.as_str(), "b");
    }

    #[test]
    fn token_positions_are_monotonically_non_decreasing() {
        let toks = lex_all("let x = 1;\nlet y = 2;");
        let mut last = (1u32, 1u32);
        for t in &toks {
            assert!((t.line, t.column) >= last || t.line > last.0);
            last = (t.line, t.column);
        }
    }
}
