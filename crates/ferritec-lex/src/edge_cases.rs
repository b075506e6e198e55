//! Edge case tests for ferritec-lex

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::{Lexer, Token};
    use ferritec_util::Handler;

    fn lex_all(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.consume();
            let is_eof = token.kind == TokenKind::EndOfFile;
            if is_eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        let t = lex_all("x");
        assert_eq!(t[0].kind, TokenKind::Identifier);
        assert_eq!(t[0].lexeme.as_str(), "x");
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        let t = lex_all(&format!("let {name} = 1;"));
        assert!(t.iter().any(|tok| tok.lexeme.as_str() == name));
    }

    #[test]
    fn test_edge_keywords_not_idents() {
        let t = kinds("func let if");
        assert_eq!(t[0], TokenKind::Func);
        assert_eq!(t[1], TokenKind::Let);
        assert_eq!(t[2], TokenKind::If);
    }

    #[test]
    fn test_edge_hex_bounds() {
        let t = lex_all("0x0 0xFF");
        assert_eq!(t[0].lexeme.as_str(), "0x0");
        assert_eq!(t[1].lexeme.as_str(), "0xFF");
    }

    #[test]
    fn test_edge_binary() {
        let t = lex_all("0b0 0b1010");
        assert_eq!(t[1].lexeme.as_str(), "0b1010");
    }

    #[test]
    fn test_edge_octal() {
        let t = lex_all("0o0 0o77");
        assert_eq!(t[1].lexeme.as_str(), "0o77");
    }

    #[test]
    fn test_edge_empty_string() {
        let t = lex_all("\"\"");
        assert_eq!(t[0].kind, TokenKind::StrLiteral);
        assert_eq!(t[0].lexeme.as_str(), "");
    }

    #[test]
    fn test_edge_all_operators() {
        let t = kinds("+ - * / % == != < > <= >= && || !");
        assert!(t.contains(&TokenKind::Plus));
        assert!(t.contains(&TokenKind::EqEq));
    }

    #[test]
    fn test_edge_all_delimiters() {
        let t = kinds("( ) { } [ ] , ; : . ->");
        assert!(t.contains(&TokenKind::LParen));
        assert!(t.contains(&TokenKind::Arrow));
    }

    #[test]
    fn test_edge_nested_delimiters() {
        let t = kinds("((()))");
        assert_eq!(t.iter().filter(|x| **x == TokenKind::LParen).count(), 3);
    }

    #[test]
    fn test_edge_case_sensitivity() {
        let t = lex_all("Func func");
        assert_eq!(t[0].kind, TokenKind::Identifier);
        assert_eq!(t[1].kind, TokenKind::Func);
    }

    #[test]
    fn test_edge_bools() {
        let t = kinds("true false");
        assert_eq!(t[0], TokenKind::True);
        assert_eq!(t[1], TokenKind::False);
    }

    #[test]
    fn test_edge_at() {
        assert!(kinds("@").contains(&TokenKind::At));
    }

    #[test]
    fn test_edge_tilde() {
        assert!(kinds("~").contains(&TokenKind::Tilde));
    }

    #[test]
    fn test_edge_scientific() {
        let t = lex_all("1e10 1.5e-3");
        assert!(t.iter().all(|x| x.kind == TokenKind::FloatLiteral));
    }

    #[test]
    fn test_edge_max_int() {
        let t = lex_all("18446744073709551615");
        assert_eq!(t[0].kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn test_edge_all_keywords() {
        let t = kinds("func let if else switch while for repeat break continue return aggregate enum");
        assert!(t.contains(&TokenKind::Func));
        assert!(t.contains(&TokenKind::Aggregate));
        assert!(t.contains(&TokenKind::Enum));
    }

    // ==================== ERROR CASES ====================

    #[test]
    fn test_err_unterminated_string() {
        let h = Handler::new();
        let mut lex = Lexer::new("\"unterminated", &h);
        let _ = lex.consume();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_unterminated_char() {
        let h = Handler::new();
        let mut lex = Lexer::new("'x", &h);
        let _ = lex.consume();
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_invalid_chars() {
        let h = Handler::new();
        let mut lex = Lexer::new("$%", &h);
        while !lex.done() {
            lex.consume();
        }
        assert!(h.has_errors());
    }

    #[test]
    fn test_err_mixed_valid_invalid() {
        let h = Handler::new();
        let mut lex = Lexer::new("let x = $ 1;", &h);
        while !lex.done() {
            lex.consume();
        }
        assert!(h.has_errors());
    }

    #[test]
    fn test_edge_consec_ops() {
        assert!(kinds("+++").len() >= 2);
    }

    #[test]
    fn test_edge_whitespace_variations() {
        let t = lex_all("let\tx\n=\n1");
        assert_eq!(t[0].kind, TokenKind::Let);
        assert_eq!(t.last().unwrap().kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn test_edge_leading_zeros() {
        assert!(!lex_all("007").is_empty());
    }
}
