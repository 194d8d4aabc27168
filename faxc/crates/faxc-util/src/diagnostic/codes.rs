//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings. Codes are grouped by the pipeline stage that raises
//! them: 1xxx lexical, 2xxx syntactic, 3xxx semantic.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_LEXER_UNKNOWN_TOKEN;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.number(), 1004);
//! assert_eq!(code.as_str(), "E1004");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use faxc_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1001);
/// assert_eq!(code.as_str(), "E1001");
///
/// let warning = DiagnosticCode::W_UNUSED_VARIABLE;
/// assert_eq!(warning.prefix(), "W");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E1001", "W4001")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXICAL ERRORS (E1xxx)
    // =========================================================================

    /// E1001: invalid/unexpected character
    pub const E_LEXER_UNEXPECTED_CHAR: Self = Self::new("E", 1001);
    /// E1002: unterminated char or string literal
    pub const E_LEXER_UNTERMINATED_STRING: Self = Self::new("E", 1002);
    /// E1003: invalid numeric literal
    pub const E_LEXER_INVALID_NUMBER: Self = Self::new("E", 1003);
    /// E1004: unrecognised token
    pub const E_LEXER_UNKNOWN_TOKEN: Self = Self::new("E", 1004);
    /// E1005: hexadecimal floating-point constants are not supported
    pub const E_LEXER_HEX_FLOAT: Self = Self::new("E", 1005);
    /// E1006: mixed-case `Ll`/`lL` long-long integer suffix
    pub const E_LEXER_MIXED_CASE_SUFFIX: Self = Self::new("E", 1006);
    /// E1007: empty char constant `''`
    pub const E_LEXER_EMPTY_CHAR_CONST: Self = Self::new("E", 1007);
    /// E1008: non-octal digit in an octal integer literal
    pub const E_LEXER_NON_OCTAL_DIGIT: Self = Self::new("E", 1008);

    // =========================================================================
    // SYNTACTIC ERRORS (E2xxx)
    // =========================================================================

    /// E2001: unexpected token
    pub const E_PARSER_UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
    /// E2002: expected a specific token that was not found
    pub const E_PARSER_EXPECTED_TOKEN: Self = Self::new("E", 2002);
    /// E2003: unexpected end of file
    pub const E_PARSER_UNEXPECTED_EOF: Self = Self::new("E", 2003);
    /// E2004: illegal combination of type-specifier keywords
    pub const E_PARSER_ILLEGAL_TYPE_SPEC: Self = Self::new("E", 2004);
    /// E2005: a recognised but unimplemented language feature was used
    pub const E_PARSER_UNSUPPORTED_FEATURE: Self = Self::new("E", 2005);

    // =========================================================================
    // SEMANTIC ERRORS (E3xxx)
    // =========================================================================

    /// E3001: reference to an undeclared variable
    pub const E_SEMANTIC_UNDECLARED_VAR: Self = Self::new("E", 3001);
    /// E3002: redeclaration of a variable already in scope
    pub const E_SEMANTIC_REDECLARATION: Self = Self::new("E", 3002);
    /// E3003: operand types cannot be combined by a binary operator
    pub const E_SEMANTIC_BAD_OPERAND_TYPES: Self = Self::new("E", 3003);
    /// E3004: assignment target is not an lvalue
    pub const E_SEMANTIC_NOT_LVALUE: Self = Self::new("E", 3004);
    /// E3005: `break`/`continue` used outside of a loop
    pub const E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP: Self = Self::new("E", 3005);
    /// E3006: unrecognised escape sequence in a char/string literal
    pub const E_SEMANTIC_UNKNOWN_ESCAPE: Self = Self::new("E", 3006);
    /// E3007: a type this code generator cannot lower (`long double`,
    /// pointer, array, struct/union) reached code generation
    pub const E_SEMANTIC_UNSUPPORTED_TYPE: Self = Self::new("E", 3007);

    // =========================================================================
    // WARNINGS (W4xxx)
    // =========================================================================

    /// W4001: unused local variable
    pub const W_UNUSED_VARIABLE: Self = Self::new("W", 4001);
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
pub const E_LEXER_HEX_FLOAT: DiagnosticCode = DiagnosticCode::E_LEXER_HEX_FLOAT;
pub const E_LEXER_MIXED_CASE_SUFFIX: DiagnosticCode = DiagnosticCode::E_LEXER_MIXED_CASE_SUFFIX;
pub const E_LEXER_EMPTY_CHAR_CONST: DiagnosticCode = DiagnosticCode::E_LEXER_EMPTY_CHAR_CONST;
pub const E_LEXER_NON_OCTAL_DIGIT: DiagnosticCode = DiagnosticCode::E_LEXER_NON_OCTAL_DIGIT;
pub const E_PARSER_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN;
pub const E_PARSER_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::E_PARSER_EXPECTED_TOKEN;
pub const E_PARSER_UNEXPECTED_EOF: DiagnosticCode = DiagnosticCode::E_PARSER_UNEXPECTED_EOF;
pub const E_PARSER_ILLEGAL_TYPE_SPEC: DiagnosticCode = DiagnosticCode::E_PARSER_ILLEGAL_TYPE_SPEC;
pub const E_PARSER_UNSUPPORTED_FEATURE: DiagnosticCode = DiagnosticCode::E_PARSER_UNSUPPORTED_FEATURE;
pub const E_SEMANTIC_UNDECLARED_VAR: DiagnosticCode = DiagnosticCode::E_SEMANTIC_UNDECLARED_VAR;
pub const E_SEMANTIC_REDECLARATION: DiagnosticCode = DiagnosticCode::E_SEMANTIC_REDECLARATION;
pub const E_SEMANTIC_BAD_OPERAND_TYPES: DiagnosticCode = DiagnosticCode::E_SEMANTIC_BAD_OPERAND_TYPES;
pub const E_SEMANTIC_NOT_LVALUE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_NOT_LVALUE;
pub const E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP: DiagnosticCode =
    DiagnosticCode::E_SEMANTIC_LOOP_CONTROL_OUTSIDE_LOOP;
pub const E_SEMANTIC_UNKNOWN_ESCAPE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_UNKNOWN_ESCAPE;
pub const E_SEMANTIC_UNSUPPORTED_TYPE: DiagnosticCode = DiagnosticCode::E_SEMANTIC_UNSUPPORTED_TYPE;
pub const W_UNUSED_VARIABLE: DiagnosticCode = DiagnosticCode::W_UNUSED_VARIABLE;

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
        assert_eq!(DiagnosticCode::E_LEXER_UNEXPECTED_CHAR.as_str(), "E1001");
        assert_eq!(DiagnosticCode::W_UNUSED_VARIABLE.as_str(), "W4001");
    }

    #[test]
    fn test_display() {
        let code = DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN;
        assert_eq!(format!("{}", code), "E2001");
    }

    #[test]
    fn test_code_equality() {
        let a = DiagnosticCode::new("E", 1001);
        let b = DiagnosticCode::new("E", 1001);
        let c = DiagnosticCode::new("E", 1002);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
