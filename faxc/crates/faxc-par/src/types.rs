//! Declaration-specifier parsing: storage class/qualifier keywords, then the
//! base type.
//!
//! Storage classes (`typedef`/`extern`/`static`/`auto`/`register`) and type
//! qualifiers (`const`/`volatile`) are recognised and consumed — the scanner
//! tokenizes them and real C code uses them routinely — but this compiler
//! tracks neither; every declared variable is an ordinary stack local.

use faxc_lex::{Keyword, TokenKind};
use faxc_sem::{DataType, Signedness};

use crate::Parser;

impl<'a> Parser<'a> {
    /// True if the current token could begin a declaration's type
    /// specifier, i.e. whether `parse_statement` should treat this as a
    /// declaration rather than an expression statement.
    pub(crate) fn at_type_start(&self) -> bool {
        matches!(
            self.current_keyword(),
            Some(
                Keyword::Char
                    | Keyword::Short
                    | Keyword::Int
                    | Keyword::Long
                    | Keyword::Float
                    | Keyword::Double
                    | Keyword::Signed
                    | Keyword::Unsigned
                    | Keyword::Void
                    | Keyword::Const
                    | Keyword::Volatile
                    | Keyword::Typedef
                    | Keyword::Extern
                    | Keyword::Static
                    | Keyword::Auto
                    | Keyword::Register
                    | Keyword::Struct
                    | Keyword::Union
                    | Keyword::Enum
            )
        )
    }

    fn skip_qualifiers(&mut self) {
        while matches!(
            self.current_keyword(),
            Some(Keyword::Const | Keyword::Volatile | Keyword::Typedef | Keyword::Extern | Keyword::Static | Keyword::Auto | Keyword::Register)
        ) {
            self.advance();
        }
    }

    /// Parses one declaration's type specifier. Always consumes at least one
    /// token when `at_type_start()` held; returns `DataType::Error` (with a
    /// diagnostic already emitted) for anything this compiler can't lower.
    pub(crate) fn parse_type_specifier(&mut self) -> DataType {
        self.skip_qualifiers();

        let mut signedness = None;
        loop {
            match self.current_keyword() {
                Some(Keyword::Signed) => {
                    signedness = Some(Signedness::Signed);
                    self.advance();
                }
                Some(Keyword::Unsigned) => {
                    signedness = Some(Signedness::Unsigned);
                    self.advance();
                }
                _ => break,
            }
            self.skip_qualifiers();
        }

        let data_type = match self.current_keyword() {
            Some(Keyword::Char) => {
                self.advance();
                DataType::Char(signedness.unwrap_or(Signedness::Signed))
            }
            Some(Keyword::Short) => {
                self.advance();
                self.match_keyword(Keyword::Int);
                DataType::Short(signedness.unwrap_or(Signedness::Signed))
            }
            Some(Keyword::Int) => {
                self.advance();
                DataType::Int(signedness.unwrap_or(Signedness::Signed))
            }
            Some(Keyword::Long) => {
                self.advance();
                if self.match_keyword(Keyword::Long) {
                    self.match_keyword(Keyword::Int);
                    DataType::LongLong(signedness.unwrap_or(Signedness::Signed))
                } else if self.match_keyword(Keyword::Double) {
                    if signedness.is_some() {
                        self.error_illegal_type_spec("'long double' cannot carry a signedness specifier");
                    }
                    DataType::LongDouble
                } else {
                    self.match_keyword(Keyword::Int);
                    DataType::Long(signedness.unwrap_or(Signedness::Signed))
                }
            }
            Some(Keyword::Float) => {
                self.advance();
                if signedness.is_some() {
                    self.error_illegal_type_spec("'float' cannot carry a signedness specifier");
                }
                DataType::Float
            }
            Some(Keyword::Double) => {
                self.advance();
                if signedness.is_some() {
                    self.error_illegal_type_spec("'double' cannot carry a signedness specifier");
                }
                DataType::Double
            }
            Some(Keyword::Void) => {
                self.advance();
                DataType::Void
            }
            Some(Keyword::Struct) | Some(Keyword::Union) | Some(Keyword::Enum) => {
                self.advance();
                if self.check(TokenKind::Ident) {
                    self.advance();
                }
                if self.check(TokenKind::LeftBrace) {
                    self.skip_balanced_braces();
                }
                self.report_unsupported_feature("struct/union/enum types");
                DataType::Error
            }
            None if signedness.is_some() => DataType::Int(signedness.unwrap()),
            _ => {
                self.error_expected("a type specifier");
                DataType::Error
            }
        };

        // Pointer declarator: `int *p`. Represented but rejected by codegen,
        // since this compiler never emits address-of/dereference code.
        let mut indirection = 0u32;
        while self.match_kind(TokenKind::Star) {
            indirection += 1;
        }
        self.skip_qualifiers();

        if indirection > 0 {
            DataType::Pointer { inner: Box::new(data_type), indirection }
        } else {
            data_type
        }
    }

    /// Consumes one balanced `{ ... }` block without interpreting its
    /// contents — used to recover past struct/union/enum bodies we don't
    /// model.
    fn skip_balanced_braces(&mut self) {
        if !self.match_kind(TokenKind::LeftBrace) {
            return;
        }
        let mut depth = 1u32;
        while depth > 0 && !self.is_at_end() {
            if self.match_kind(TokenKind::LeftBrace) {
                depth += 1;
            } else if self.match_kind(TokenKind::RightBrace) {
                depth -= 1;
            } else {
                self.advance();
            }
        }
    }
}
