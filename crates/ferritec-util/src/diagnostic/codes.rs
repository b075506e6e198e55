//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings. Codes are grouped by phase: `E1xxx` lexer, `E2xxx`
//! parser, `E3xxx` semantic analysis, `Wxxxx` warnings.
//!
//! # Examples
//!
//! ```
//! use ferritec_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_LEXER_UNEXPECTED_CHAR;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E1001");
//! ```

/// A unique code identifying a diagnostic message.
///
/// Diagnostic codes follow the format `{prefix}{number}` where `prefix` is
/// `E` for errors or `W` for warnings, and `number` is a 4-digit identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning).
    pub prefix: &'static str,
    /// The numeric identifier.
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code.
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning).
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier.
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E1001", "W0001").
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXER CODES (E1xxx) — §4.2
    // =========================================================================

    /// E1001: stray character that starts no valid token.
    pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 1001);
    /// E1002: unterminated string or char literal.
    pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 1002);
    /// E1003: malformed numeric literal (bad digit for base, bad suffix).
    pub const E_LEXER_INVALID_NUMBER: Self = Self::new("E", 1003);
    /// E1004: unrecognized operator/punctuation sequence.
    pub const E_LEXER_UNKNOWN_TOKEN: Self = Self::new("E", 1004);
    /// E1005: unterminated block comment at end of file.
    pub const E_LEXER_UNTERMINATED_COMMENT: Self = Self::new("E", 1005);
    /// E1006: invalid escape sequence in a string/char literal.
    pub const E_LEXER_INVALID_ESCAPE: Self = Self::new("E", 1006);
    /// E1007: a char literal did not hold exactly one code point.
    pub const E_LEXER_INVALID_CHAR_LITERAL: Self = Self::new("E", 1007);
    /// E1008: \u/\U escape names a surrogate or out-of-range code point.
    pub const E_LEXER_INVALID_UNICODE_ESCAPE: Self = Self::new("E", 1008);
    /// E1009: catastrophic I/O failure reading the source (critical).
    pub const E_LEXER_IO_FAILURE: Self = Self::new("E", 1009);

    // =========================================================================
    // PARSER CODES (E2xxx) — §4.3
    // =========================================================================

    /// E2001: current token has no nud/statement handler.
    pub const E_PARSER_UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
    /// E2002: a specific token kind was required but not found.
    pub const E_PARSER_EXPECTED_TOKEN: Self = Self::new("E", 2002);
    /// E2003: end of file reached mid-construct.
    pub const E_PARSER_UNEXPECTED_EOF: Self = Self::new("E", 2003);
    /// E2004: duplicate name within one declaration (fields/params/enum values).
    pub const E_PARSER_DUPLICATE_DEF: Self = Self::new("E", 2004);
    /// E2005: `const` declared without an initializer.
    pub const E_PARSER_CONST_WITHOUT_INIT: Self = Self::new("E", 2005);
    /// E2006: variable declaration has neither a type nor a value.
    pub const E_PARSER_MISSING_TYPE_OR_VALUE: Self = Self::new("E", 2006);
    /// E2007: `module` declaration found after the file head.
    pub const E_PARSER_MODULE_NOT_AT_HEAD: Self = Self::new("E", 2007);

    // =========================================================================
    // SEMANTIC CODES (E3xxx) — §4.5 / §6 taxonomy
    // =========================================================================

    /// E3001: identifier does not resolve in any enclosing scope.
    pub const E_SEMANTIC_UNDECLARED_IDENTIFIER: Self = Self::new("E", 3001);
    /// E3002: name already declared in the current scope.
    pub const E_SEMANTIC_REDECLARATION: Self = Self::new("E", 3002);
    /// E3003: operand/assignment/return types are incompatible.
    pub const E_SEMANTIC_TYPE_MISMATCH: Self = Self::new("E", 3003);
    /// E3004: call argument count does not match the callee's parameters.
    pub const E_SEMANTIC_ARITY_MISMATCH: Self = Self::new("E", 3004);
    /// E3005: callee does not have function type.
    pub const E_SEMANTIC_NOT_CALLABLE: Self = Self::new("E", 3005);
    /// E3006: index target is not an array type.
    pub const E_SEMANTIC_NOT_INDEXABLE: Self = Self::new("E", 3006);
    /// E3007: member access names a field the aggregate does not have.
    pub const E_SEMANTIC_MISSING_FIELD: Self = Self::new("E", 3007);
    /// E3008: assignment target is not mutable.
    pub const E_SEMANTIC_IMMUTABLE_TARGET: Self = Self::new("E", 3008);
    /// E3009: a cast between incompatible primitive types (e.g. string→char).
    pub const E_SEMANTIC_INVALID_CAST: Self = Self::new("E", 3009);
    /// E3010: condition of if/while/do-while/repeat is not `bool`.
    pub const E_SEMANTIC_NON_BOOL_CONDITION: Self = Self::new("E", 3010);
    /// E3011: `break` outside a loop context.
    pub const E_SEMANTIC_BREAK_OUTSIDE_LOOP: Self = Self::new("E", 3011);
    /// E3012: `continue` outside a loop context.
    pub const E_SEMANTIC_CONTINUE_OUTSIDE_LOOP: Self = Self::new("E", 3012);
    /// E3013: `return` outside a function context.
    pub const E_SEMANTIC_RETURN_OUTSIDE_FUNCTION: Self = Self::new("E", 3013);
    /// E3014: a declared type or value is missing where one is required.
    pub const E_SEMANTIC_INCOMPLETE_INITIALIZER: Self = Self::new("E", 3014);
    /// E3015: a referenced type (primitive, aggregate, alias, component) doesn't exist.
    pub const E_SEMANTIC_UNKNOWN_TYPE: Self = Self::new("E", 3015);
    /// E3016: nested function declaration.
    pub const E_SEMANTIC_NESTED_FUNCTION: Self = Self::new("E", 3016);
    /// E3017: generic type used where an alias was expected (generics can't be aliased).
    pub const E_SEMANTIC_GENERIC_ALIAS: Self = Self::new("E", 3017);

    // =========================================================================
    // WARNING CODES (Wxxxx) — §7
    // =========================================================================

    /// W0001: a numeric conversion narrows the value (demotion).
    pub const W_DEMOTION: Self = Self::new("W", 1);
    /// W0002: a declaration shadows a binding from an outer scope.
    pub const W_SHADOWING: Self = Self::new("W", 2);
    /// W0003: statements after an unconditional exit can never run.
    pub const W_UNREACHABLE_CODE: Self = Self::new("W", 3);
    /// W0004: a `{ }` block with no statements.
    pub const W_EMPTY_BLOCK: Self = Self::new("W", 4);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const E_LEXER_UNEXPECTED_CHAR: DiagnosticCode = DiagnosticCode::E_LEXER_UNEXPECTED_CHAR;
pub const E_LEXER_UNTERMINATED_STRING: DiagnosticCode = DiagnosticCode::E_LEXER_UNTERMINATED_STRING;
pub const E_LEXER_INVALID_NUMBER: DiagnosticCode = DiagnosticCode::E_LEXER_INVALID_NUMBER;
pub const E_LEXER_UNKNOWN_TOKEN: DiagnosticCode = DiagnosticCode::E_LEXER_UNKNOWN_TOKEN;
pub const E_LEXER_UNTERMINATED_COMMENT: DiagnosticCode = DiagnosticCode::E_LEXER_UNTERMINATED_COMMENT;
pub const E_LEXER_INVALID_ESCAPE: DiagnosticCode = DiagnosticCode::E_LEXER_INVALID_ESCAPE;
pub const E_LEXER_INVALID_CHAR_LITERAL: DiagnosticCode = DiagnosticCode::E_LEXER_INVALID_CHAR_LITERAL;
pub const E_LEXER_INVALID_UNICODE_ESCAPE: DiagnosticCode =
    DiagnosticCode::E_LEXER_INVALID_UNICODE_ESCAPE;
pub const E_LEXER_IO_FAILURE: DiagnosticCode = DiagnosticCode::E_LEXER_IO_FAILURE;

pub const E_PARSER_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN;
pub const E_PARSER_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_EXPECTED_TOKEN;
pub const E_PARSER_UNEXPECTED_EOF: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_EOF;
pub const E_PARSER_DUPLICATE_DEF: DiagnosticCode = DiagnosticCode::E_PARSER_DUPLICATE_DEF;
pub const E_PARSER_CONST_WITHOUT_INIT: DiagnosticCode = DiagnosticCode::E_PARSER_CONST_WITHOUT_INIT;
pub const E_PARSER_MISSING_TYPE_OR_VALUE: DiagnosticCode =
    DiagnosticCode::E_PARSER_MISSING_TYPE_OR_VALUE;
pub const E_PARSER_MODULE_NOT_AT_HEAD: DiagnosticCode = DiagnosticCode::E_PARSER_MODULE_NOT_AT_HEAD;

pub const E_SEMANTIC_UNDECLARED_IDENTIFIER: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER;
pub const E_SEMANTIC_REDECLARATION: DiagnosticCode = DiagnosticCode::E_SEMANTIC_REDECLARATION;
pub const E_SEMANTIC_TYPE_MISMATCH: DiagnosticCode = DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH;
pub const E_SEMANTIC_ARITY_MISMATCH: DiagnosticCode = DiagnosticCode::E_SEMANTIC_ARITY_MISMATCH;
pub const E_SEMANTIC_NOT_CALLABLE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_NOT_CALLABLE;
pub const E_SEMANTIC_NOT_INDEXABLE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_NOT_INDEXABLE;
pub const E_SEMANTIC_MISSING_FIELD: DiagnosticCode = DiagnosticCode::E_SEMANTIC_MISSING_FIELD;
pub const E_SEMANTIC_IMMUTABLE_TARGET: DiagnosticCode = DiagnosticCode::E_SEMANTIC_IMMUTABLE_TARGET;
pub const E_SEMANTIC_INVALID_CAST: DiagnosticCode = DiagnosticCode::E_SEMANTIC_INVALID_CAST;
pub const E_SEMANTIC_NON_BOOL_CONDITION: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_NON_BOOL_CONDITION;
pub const E_SEMANTIC_BREAK_OUTSIDE_LOOP: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_BREAK_OUTSIDE_LOOP;
pub const E_SEMANTIC_CONTINUE_OUTSIDE_LOOP: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_CONTINUE_OUTSIDE_LOOP;
pub const E_SEMANTIC_RETURN_OUTSIDE_FUNCTION: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_RETURN_OUTSIDE_FUNCTION;
pub const E_SEMANTIC_INCOMPLETE_INITIALIZER: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_INCOMPLETE_INITIALIZER;
pub const E_SEMANTIC_UNKNOWN_TYPE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_UNKNOWN_TYPE;
pub const E_SEMANTIC_NESTED_FUNCTION: DiagnosticCode = DiagnosticCode::E_SEMANTIC_NESTED_FUNCTION;
pub const E_SEMANTIC_GENERIC_ALIAS: DiagnosticCode = DiagnosticCode::E_SEMANTIC_GENERIC_ALIAS;

pub const W_DEMOTION: DiagnosticCode = DiagnosticCode::W_DEMOTION;
pub const W_SHADOWING: DiagnosticCode = DiagnosticCode::W_SHADOWING;
pub const W_UNREACHABLE_CODE: DiagnosticCode = DiagnosticCode::W_UNREACHABLE_CODE;
pub const W_EMPTY_BLOCK: DiagnosticCode = DiagnosticCode::W_EMPTY_BLOCK;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code() {
        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(code.prefix(), "E");
        assert_eq!(code.number(), 1001);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DiagnosticCode::new("W", 1).as_str(), "W0001");
        assert_eq!(DiagnosticCode::new("E", 1001).as_str(), "E1001");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DiagnosticCode::E_LEXER_UNEXPECTED_CHAR), "E1001");
    }

    #[test]
    fn test_debug() {
        assert_eq!(
            format!("{:?}", DiagnosticCode::E_LEXER_UNEXPECTED_CHAR),
            "DiagnosticCode(E1001)"
        );
    }

    #[test]
    fn test_lexer_codes_in_e1_range() {
        for code in [
            DiagnosticCode::E_LEXER_UNEXPECTED_CHAR,
            DiagnosticCode::E_LEXER_UNTERMINATED_STRING,
            DiagnosticCode::E_LEXER_INVALID_NUMBER,
            DiagnosticCode::E_LEXER_UNKNOWN_TOKEN,
        ] {
            assert_eq!(code.prefix(), "E");
            assert!((1000..2000).contains(&code.number()));
        }
    }

    #[test]
    fn test_parser_codes_in_e2_range() {
        for code in [
            DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN,
            DiagnosticCode::E_PARSER_EXPECTED_TOKEN,
            DiagnosticCode::E_PARSER_DUPLICATE_DEF,
        ] {
            assert!((2000..3000).contains(&code.number()));
        }
    }

    #[test]
    fn test_semantic_codes_in_e3_range() {
        for code in [
            DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER,
            DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
            DiagnosticCode::E_SEMANTIC_NOT_CALLABLE,
        ] {
            assert!((3000..4000).contains(&code.number()));
        }
    }

    #[test]
    fn test_warning_codes() {
        assert_eq!(DiagnosticCode::W_DEMOTION.prefix(), "W");
        assert_eq!(DiagnosticCode::W_SHADOWING.as_str(), "W0002");
        assert_eq!(DiagnosticCode::W_UNREACHABLE_CODE.as_str(), "W0003");
        assert_eq!(DiagnosticCode::W_EMPTY_BLOCK.as_str(), "W0004");
    }

    #[test]
    fn test_code_equality() {
        let code1 = DiagnosticCode::new("E", 1001);
        let code2 = DiagnosticCode::new("E", 1001);
        let code3 = DiagnosticCode::new("E", 1002);
        assert_eq!(code1, code2);
        assert_ne!(code1, code3);
    }
}
