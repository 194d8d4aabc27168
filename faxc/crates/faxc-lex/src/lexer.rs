//! The lexer: turns source text into a finite token sequence terminated by
//! `EOF`.
//!
//! Scanning mechanics (number/identifier/string/char dispatch, the
//! leading-zero octal scan, the `u`/`l`/`ll` suffix grammar) follow the
//! classic hand-written C scanner shape: a `Cursor` plus a `Handler`, one
//! `next_token` entry point.

use faxc_util::diagnostic::DiagnosticCode;
use faxc_util::{Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, FloatSuffix, IntSuffix, Token, TokenKind};
use crate::unicode::{is_ascii_ident_continue, is_ascii_ident_start, is_digit_in_base};

/// Scans one source file into a stream of [`Token`]s.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a Handler,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Scans the whole file into a token vector terminated by `Eof`,
    /// matching `ScannerScan`'s contract (§4.1: "after EOF keeps returning
    /// EOF" is modelled here by always appending exactly one trailing EOF).
    pub fn tokenize(mut self) -> Vec<Token> {
        tracing::trace!("tokenizing");
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tracing::trace!(count = tokens.len(), "tokenizing done");
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make(TokenKind::Eof);
        }

        let c = self.cursor.current_char();

        if c.is_ascii_digit() {
            return self.number();
        }
        if is_ascii_ident_start(c) {
            return self.identifier_or_keyword();
        }
        if c == '\'' {
            return self.char_constant();
        }
        if c == '"' {
            return self.string_literal();
        }
        self.punctuation()
    }

    fn make(&mut self, kind: TokenKind) -> Token {
        let text = self.cursor.slice_from(self.token_start);
        Token::new(kind, Symbol::intern(text), self.token_start_line, self.token_start_column)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => self.skip_line_comment(),
                '/' if self.cursor.peek_char(1) == '*' => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.token_start_line, self.token_start_column)
    }

    fn error(&mut self, code: DiagnosticCode, message: impl Into<String>) -> Token {
        self.handler
            .build_error(self.current_span(), message.into())
            .code(code)
            .emit(self.handler);
        self.make(TokenKind::Error)
    }

    // ---- numbers --------------------------------------------------------

    fn number(&mut self) -> Token {
        let mut is_hex = false;
        let mut non_octal_digit_in_leading_zero = false;
        let mut is_float = false;

        if self.cursor.current_char() == '0' {
            self.cursor.advance();
            if self.cursor.current_char() == 'x' || self.cursor.current_char() == 'X' {
                is_hex = true;
                self.cursor.advance();
                if !self.cursor.current_char().is_ascii_hexdigit() {
                    return self.error(
                        DiagnosticCode::E_LEXER_INVALID_NUMBER,
                        "number literal can't end with 'x'",
                    );
                }
                while self.cursor.current_char().is_ascii_hexdigit() {
                    self.cursor.advance();
                }
            } else {
                while self.cursor.current_char().is_ascii_digit() {
                    if !is_digit_in_base(self.cursor.current_char(), 8) {
                        non_octal_digit_in_leading_zero = true;
                    }
                    self.cursor.advance();
                }
            }
        } else {
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == '.' {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == 'e' || self.cursor.current_char() == 'E' {
            is_float = true;
            self.cursor.advance();
            if self.cursor.current_char() == '+' || self.cursor.current_char() == '-' {
                self.cursor.advance();
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if is_float {
            if is_hex {
                return self.error(
                    DiagnosticCode::E_LEXER_HEX_FLOAT,
                    "hexadecimal floating constants are not supported",
                );
            }
            return self.float_suffix();
        }

        if non_octal_digit_in_leading_zero {
            return self.error(
                DiagnosticCode::E_LEXER_NON_OCTAL_DIGIT,
                "non-octal digit in octal integer constant",
            );
        }
        self.int_suffix()
    }

    fn float_suffix(&mut self) -> Token {
        let c = self.cursor.current_char();
        if c == 'l' || c == 'L' {
            self.cursor.advance();
            return self.make(TokenKind::FloatConstant(FloatSuffix::LongDouble));
        }
        if c == 'f' || c == 'F' {
            self.cursor.advance();
            return self.make(TokenKind::FloatConstant(FloatSuffix::Float));
        }
        self.make(TokenKind::FloatConstant(FloatSuffix::None))
    }

    fn int_suffix(&mut self) -> Token {
        let mut is_unsigned = self.match_unsigned_suffix();

        let c = self.cursor.current_char();
        if c == 'l' || c == 'L' {
            let first = c;
            self.cursor.advance();
            let next = self.cursor.current_char();
            if next == first {
                self.cursor.advance();
                if !is_unsigned {
                    is_unsigned = self.match_unsigned_suffix();
                }
                return self.make(TokenKind::IntConstant(if is_unsigned {
                    IntSuffix::UnsignedLongLong
                } else {
                    IntSuffix::LongLong
                }));
            }
            if next == 'l' || next == 'L' {
                // same letter, different case: `Ll` / `lL`.
                self.cursor.advance();
                return self.error(
                    DiagnosticCode::E_LEXER_MIXED_CASE_SUFFIX,
                    "long long constant requires both letters to be the same case",
                );
            }
            if !is_unsigned {
                is_unsigned = self.match_unsigned_suffix();
            }
            return self.make(TokenKind::IntConstant(if is_unsigned {
                IntSuffix::UnsignedLong
            } else {
                IntSuffix::Long
            }));
        }

        self.make(TokenKind::IntConstant(if is_unsigned {
            IntSuffix::Unsigned
        } else {
            IntSuffix::None
        }))
    }

    fn match_unsigned_suffix(&mut self) -> bool {
        let c = self.cursor.current_char();
        if c == 'u' || c == 'U' {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    // ---- identifiers / keywords ------------------------------------------

    fn identifier_or_keyword(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        let kind = match keyword_from_ident(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        };
        self.make(kind)
    }

    // ---- char / string literals -------------------------------------------

    fn char_constant(&mut self) -> Token {
        self.cursor.advance(); // opening '\''
        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
            return self.error(
                DiagnosticCode::E_LEXER_EMPTY_CHAR_CONST,
                "empty char constant not allowed",
            );
        }
        loop {
            if self.cursor.is_at_end() {
                return self.error(
                    DiagnosticCode::E_LEXER_UNTERMINATED_STRING,
                    "unterminated char constant",
                );
            }
            let prev = self.cursor.current_char();
            self.cursor.advance();
            if prev == '\'' {
                break;
            }
            if prev == '\\' && !self.cursor.is_at_end() {
                // escape: swallow the following char unconditionally so an
                // escaped quote can't terminate the constant early.
                self.cursor.advance();
            }
        }
        self.make(TokenKind::CharConstant)
    }

    fn string_literal(&mut self) -> Token {
        self.cursor.advance(); // opening '"'
        loop {
            if self.cursor.is_at_end() {
                return self.error(
                    DiagnosticCode::E_LEXER_UNTERMINATED_STRING,
                    "unterminated string literal",
                );
            }
            let prev = self.cursor.current_char();
            self.cursor.advance();
            if prev == '"' {
                break;
            }
            if prev == '\\' && !self.cursor.is_at_end() {
                self.cursor.advance();
            }
        }
        self.make(TokenKind::StringLiteral)
    }

    // ---- punctuation / operators -------------------------------------------

    fn punctuation(&mut self) -> Token {
        let c = self.cursor.current_char();
        self.cursor.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,
            '=' => self.two('=', TokenKind::EqEq, TokenKind::Eq),
            '!' => self.two('=', TokenKind::BangEq, TokenKind::Bang),
            '^' => self.two('=', TokenKind::CaretEq, TokenKind::Caret),
            '*' => self.two('=', TokenKind::StarEq, TokenKind::Star),
            '%' => self.two('=', TokenKind::PercentEq, TokenKind::Percent),
            '+' => {
                if self.cursor.match_char('+') {
                    TokenKind::PlusPlus
                } else if self.cursor.match_char('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.cursor.match_char('-') {
                    TokenKind::MinusMinus
                } else if self.cursor.match_char('=') {
                    TokenKind::MinusEq
                } else if self.cursor.match_char('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '>' => {
                if self.cursor.match_char('=') {
                    TokenKind::MoreEq
                } else if self.cursor.match_char('>') {
                    if self.cursor.match_char('=') {
                        TokenKind::ShiftRightEq
                    } else {
                        TokenKind::ShiftRight
                    }
                } else {
                    TokenKind::More
                }
            }
            '<' => {
                if self.cursor.match_char('=') {
                    TokenKind::LessEq
                } else if self.cursor.match_char('<') {
                    if self.cursor.match_char('=') {
                        TokenKind::ShiftLeftEq
                    } else {
                        TokenKind::ShiftLeft
                    }
                } else {
                    TokenKind::Less
                }
            }
            '.' => {
                if self.cursor.current_char() == '.' && self.cursor.peek_char(1) == '.' {
                    self.cursor.advance();
                    self.cursor.advance();
                    TokenKind::DotDotDot
                } else {
                    TokenKind::Dot
                }
            }
            '&' => {
                if self.cursor.match_char('=') {
                    TokenKind::AmpEq
                } else if self.cursor.match_char('&') {
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.cursor.match_char('=') {
                    TokenKind::PipeEq
                } else if self.cursor.match_char('|') {
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                }
            }
            _ => {
                return self.error(
                    DiagnosticCode::E_LEXER_UNEXPECTED_CHAR,
                    format!("invalid character '{c}'"),
                );
            }
        };
        self.make(kind)
    }

    fn two(&mut self, second: char, if_matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.cursor.match_char(second) {
            if_matched
        } else {
            otherwise
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        Lexer::new(src, &handler).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn return_statement() {
        let kinds = kinds("return 42;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(crate::token::Keyword::Return),
                TokenKind::IntConstant(IntSuffix::None),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keeps_returning_eof() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("", &handler);
        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
    }

    #[test]
    fn long_long_suffix() {
        assert_eq!(kinds("123LL"), vec![TokenKind::IntConstant(IntSuffix::LongLong), TokenKind::Eof]);
        assert_eq!(kinds("123ull"), vec![TokenKind::IntConstant(IntSuffix::UnsignedLongLong), TokenKind::Eof]);
    }

    #[test]
    fn mixed_case_long_long_is_an_error() {
        let handler = Handler::new();
        let tokens = Lexer::new("123Ll", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert!(handler.has_errors());
    }

    #[test]
    fn hex_float_is_an_error() {
        let handler = Handler::new();
        let tokens = Lexer::new("0x1.5p0", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn leading_zero_octal() {
        assert_eq!(kinds("017"), vec![TokenKind::IntConstant(IntSuffix::None), TokenKind::Eof]);
        let handler = Handler::new();
        let tokens = Lexer::new("019", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn float_suffixes() {
        assert_eq!(kinds("1.5f"), vec![TokenKind::FloatConstant(FloatSuffix::Float), TokenKind::Eof]);
        assert_eq!(kinds("1.5"), vec![TokenKind::FloatConstant(FloatSuffix::None), TokenKind::Eof]);
        assert_eq!(kinds("1.5l"), vec![TokenKind::FloatConstant(FloatSuffix::LongDouble), TokenKind::Eof]);
        assert_eq!(kinds("1e10"), vec![TokenKind::FloatConstant(FloatSuffix::None), TokenKind::Eof]);
    }

    #[test]
    fn empty_char_constant_is_an_error() {
        let handler = Handler::new();
        let tokens = Lexer::new("''", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn escaped_quote_does_not_terminate_char_constant() {
        assert_eq!(kinds(r"'\''"), vec![TokenKind::CharConstant, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let handler = Handler::new();
        let tokens = Lexer::new("\"abc", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("<= >= == != << >> && || += -="),
            vec![
                TokenKind::LessEq,
                TokenKind::MoreEq,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::ShiftLeft,
                TokenKind::ShiftRight,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("1 // comment\n/* block \n comment */ 2"),
            vec![
                TokenKind::IntConstant(IntSuffix::None),
                TokenKind::IntConstant(IntSuffix::None),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_vs_identifier() {
        assert_eq!(kinds("int"), vec![TokenKind::Keyword(crate::token::Keyword::Int), TokenKind::Eof]);
        assert_eq!(kinds("integer"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn line_tracking() {
        let handler = Handler::new();
        let tokens = Lexer::new("int a;\nint b;", &handler).tokenize();
        let b_tok = tokens.iter().find(|t| t.kind == TokenKind::Ident && t.text.as_str() == "b").unwrap();
        assert_eq!(b_tok.line, 2);
    }

    proptest::proptest! {
        /// Any run of decimal digits with no leading zero scans to a single
        /// unsuffixed `IntConstant` whose lexeme is the digits verbatim
        /// (§4.1 "after EOF keeps returning EOF" neighbor property: exactly
        /// one real token plus the trailing `Eof`, nothing dropped or split).
        #[test]
        fn prop_plain_decimal_digits_scan_to_one_unsuffixed_int_constant(digits in "[1-9][0-9]{0,8}") {
            let handler = Handler::new();
            let tokens = Lexer::new(&digits, &handler).tokenize();
            proptest::prop_assert_eq!(handler.has_errors(), false);
            proptest::prop_assert_eq!(tokens.len(), 2);
            proptest::prop_assert_eq!(tokens[0].kind, TokenKind::IntConstant(IntSuffix::None));
            proptest::prop_assert_eq!(tokens[0].text.as_str(), digits.as_str());
            proptest::prop_assert!(tokens[1].is_eof());
        }

        /// The `u`/`U`, `l`/`L`, `ll`/`LL` suffix grammar (any signedness
        /// before or after any length, same-case length pairs only) always
        /// resolves to the `IntSuffix` that combination names, regardless of
        /// which digits precede it.
        #[test]
        fn prop_valid_suffix_combinations_map_to_the_expected_int_suffix(
            digits in "[1-9][0-9]{0,5}",
            unsigned_first in proptest::bool::ANY,
            unsigned in proptest::bool::ANY,
            length in 0..3usize,
            upper in proptest::bool::ANY,
        ) {
            let u = if upper { "U" } else { "u" };
            let l = if upper { "L" } else { "l" };
            let length_part = match length {
                0 => String::new(),
                1 => l.to_string(),
                _ => l.repeat(2),
            };
            let source = if unsigned {
                if unsigned_first {
                    format!("{digits}{u}{length_part}")
                } else {
                    format!("{digits}{length_part}{u}")
                }
            } else {
                format!("{digits}{length_part}")
            };

            let expected = match (unsigned, length) {
                (false, 0) => IntSuffix::None,
                (true, 0) => IntSuffix::Unsigned,
                (false, 1) => IntSuffix::Long,
                (true, 1) => IntSuffix::UnsignedLong,
                (false, _) => IntSuffix::LongLong,
                (true, _) => IntSuffix::UnsignedLongLong,
            };

            let handler = Handler::new();
            let tokens = Lexer::new(&source, &handler).tokenize();
            proptest::prop_assert_eq!(handler.has_errors(), false);
            proptest::prop_assert_eq!(tokens[0].kind, TokenKind::IntConstant(expected));
        }

        /// An identifier that isn't one of the fixed keyword spellings
        /// always scans as a single `Ident` token carrying its own text back
        /// unchanged.
        #[test]
        fn prop_non_keyword_identifiers_round_trip(name in "[a-zA-Z_][a-zA-Z0-9_]{0,15}") {
            proptest::prop_assume!(crate::token::keyword_from_ident(&name).is_none());
            let handler = Handler::new();
            let tokens = Lexer::new(&name, &handler).tokenize();
            proptest::prop_assert_eq!(tokens.len(), 2);
            proptest::prop_assert_eq!(tokens[0].kind, TokenKind::Ident);
            proptest::prop_assert_eq!(tokens[0].text.as_str(), name.as_str());
            proptest::prop_assert!(tokens[1].is_eof());
        }
    }
}
