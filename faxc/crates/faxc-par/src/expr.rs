//! Expression parsing: a cascade of precedence-climbing functions.
//!
//! Precedence from loosest to tightest binding:
//! `assignment > logical-and > logical-or > equality > relational >
//! additive (also bitwise &|^, folded into this tier) > multiplicative >
//! unary > cast > grouping/primary`.
//! Note `&&` binds *looser* than `||` here — not a typo, just an unusual
//! precedence choice preserved deliberately.

use faxc_lex::{FloatSuffix, IntSuffix, TokenKind};
use faxc_sem::DataType;
use faxc_util::Symbol;

use crate::ast::{BinOp, Expr, LiteralValue, UnOp};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> Expr {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Expr {
        let left = self.parse_logical_and();

        let compound = match self.peek_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::PercentEq => Some(BinOp::Mod),
            TokenKind::AmpEq => Some(BinOp::BitAnd),
            TokenKind::PipeEq => Some(BinOp::BitOr),
            TokenKind::CaretEq => Some(BinOp::BitXor),
            TokenKind::ShiftLeftEq | TokenKind::ShiftRightEq => {
                self.advance();
                self.report_unsupported_feature("shift assignment operators");
                let span = left.span();
                let value = self.parse_assignment();
                return Expr::Assignment { target: Box::new(left), value: Box::new(value), span };
            }
            _ => return left,
        };

        let is_simple_eq = matches!(self.peek_kind(), TokenKind::Eq);
        self.advance();
        let span = left.span();
        let value = self.parse_assignment();

        if is_simple_eq {
            Expr::Assignment { target: Box::new(left), value: Box::new(value), span }
        } else {
            // Desugar `lvalue OP= rvalue` into `lvalue = lvalue OP rvalue`.
            // Safe to duplicate `left` because this language's only lvalues
            // are bare identifiers, which have no evaluation side effects.
            let op = compound.unwrap();
            let combined = Expr::Binary { op, left: Box::new(left.clone()), right: Box::new(value), span };
            Expr::Assignment { target: Box::new(left), value: Box::new(combined), span }
        }
    }

    fn parse_logical_and(&mut self) -> Expr {
        let mut left = self.parse_logical_or();
        while matches!(self.peek_kind(), TokenKind::AmpAmp) {
            self.advance();
            let right = self.parse_logical_or();
            let span = left.span();
            left = Expr::Binary { op: BinOp::LogAnd, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    fn parse_logical_or(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while matches!(self.peek_kind(), TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_equality();
            let span = left.span();
            left = Expr::Binary { op: BinOp::LogOr, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_relational();
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::EqEq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational();
            let span = left.span();
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    fn parse_relational(&mut self) -> Expr {
        let mut left = self.parse_additive();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Lt,
                TokenKind::LessEq => BinOp::Le,
                TokenKind::More => BinOp::Gt,
                TokenKind::MoreEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive();
            let span = left.span();
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    /// Additive and bitwise operators share one precedence tier.
    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                TokenKind::Amp => BinOp::BitAnd,
                TokenKind::Pipe => BinOp::BitOr,
                TokenKind::Caret => BinOp::BitXor,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative();
            let span = left.span();
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary();
            let span = left.span();
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), span };
        }
        left
    }

    /// Unary `+`/`-`, then a cast, then grouping/primary. `!`/`~`/`++`/`--`
    /// are tokenized but unsupported: reported and skipped so the operand
    /// still parses.
    fn parse_unary(&mut self) -> Expr {
        let span = self.span_here();
        match self.peek_kind() {
            TokenKind::Plus => {
                self.advance();
                let operand = self.parse_unary();
                Expr::Unary { op: UnOp::Plus, operand: Box::new(operand), span }
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_unary();
                Expr::Unary { op: UnOp::Minus, operand: Box::new(operand), span }
            }
            TokenKind::Bang | TokenKind::Tilde | TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let feature = match self.peek_kind() {
                    TokenKind::Bang => "logical negation (!)",
                    TokenKind::Tilde => "bitwise complement (~)",
                    TokenKind::PlusPlus => "prefix increment (++)",
                    _ => "prefix decrement (--)",
                };
                self.advance();
                self.report_unsupported_feature(feature);
                self.parse_unary()
            }
            _ => self.parse_cast(),
        }
    }

    /// `( type-name ) unary-expr`, disambiguated from a parenthesized
    /// expression by whether a type specifier follows `(`.
    fn parse_cast(&mut self) -> Expr {
        if matches!(self.peek_kind(), TokenKind::LeftParen) {
            let save = self.pos;
            let span = self.span_here();
            self.advance();
            if self.at_type_start() {
                let target = self.parse_type_specifier();
                if self.expect(TokenKind::RightParen, "')' after cast type").is_some() {
                    let operand = self.parse_unary();
                    return Expr::Cast { target, operand: Box::new(operand), span };
                }
            }
            self.pos = save;
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Expr {
        let span = self.span_here();
        match self.peek_kind() {
            TokenKind::IntConstant(suffix) => {
                let tok = self.advance();
                self.finish_int_literal(tok.text, suffix, span)
            }
            TokenKind::FloatConstant(suffix) => {
                let tok = self.advance();
                self.finish_float_literal(tok.text, suffix, span)
            }
            TokenKind::CharConstant => {
                let tok = self.advance();
                self.finish_char_literal(tok.text, span)
            }
            TokenKind::Ident => {
                let tok = self.advance();
                Expr::Identifier { name: tok.text, span }
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect(TokenKind::RightParen, "')'");
                Expr::Grouping { inner: Box::new(inner), span }
            }
            TokenKind::StringLiteral => {
                self.advance();
                self.report_unsupported_feature("string literal expressions");
                Expr::Error { span }
            }
            _ => {
                self.error_unexpected("expression");
                // Consume the offending token so `synchronize` makes
                // progress instead of looping on it forever.
                if !self.is_at_end() {
                    self.advance();
                }
                Expr::Error { span }
            }
        }
    }

    fn finish_int_literal(&mut self, text: Symbol, suffix: IntSuffix, span: faxc_util::Span) -> Expr {
        let digits = strip_int_suffix(text.as_str());
        let value = parse_int_digits(digits).unwrap_or(0) as i128;
        Expr::Literal { value: LiteralValue::Int(value), data_type: DataType::int_constant_type(suffix), span }
    }

    fn finish_float_literal(&mut self, text: Symbol, suffix: FloatSuffix, span: faxc_util::Span) -> Expr {
        let digits = strip_float_suffix(text.as_str());
        let value: f64 = digits.parse().unwrap_or(0.0);
        Expr::Literal { value: LiteralValue::Float(value), data_type: DataType::float_constant_type(suffix), span }
    }

    fn finish_char_literal(&mut self, text: Symbol, span: faxc_util::Span) -> Expr {
        let body = text.as_str().trim_start_matches('\'').trim_end_matches('\'');
        match faxc_sem::decode_char_constant(body) {
            Ok(byte) => Expr::Literal {
                value: LiteralValue::Int(byte as i128),
                data_type: DataType::char_ty(),
                span,
            },
            Err(bad) => {
                self.handler
                    .build_error(span, format!("unrecognised escape sequence '\\{bad}'"))
                    .code(faxc_util::diagnostic::DiagnosticCode::E_SEMANTIC_UNKNOWN_ESCAPE)
                    .emit(self.handler);
                Expr::Error { span }
            }
        }
    }
}

/// Strips the `u`/`U`/`l`/`L` suffix letters the lexer already classified
/// into `IntSuffix`, leaving the digit text to parse.
fn strip_int_suffix(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.eq_ignore_ascii_case(&'u') || c.eq_ignore_ascii_case(&'l'))
}

fn strip_float_suffix(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.eq_ignore_ascii_case(&'f') || c.eq_ignore_ascii_case(&'l'))
}

/// Parses an integer lexeme (hex `0x`/octal leading-`0`/decimal) to its raw
/// bit pattern.
fn parse_int_digits(digits: &str) -> Option<u128> {
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u128::from_str_radix(hex, 16).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        u128::from_str_radix(&digits[1..], 8).ok()
    } else if digits.is_empty() {
        Some(0)
    } else {
        digits.parse().ok()
    }
}
