//! faxc-par — recursive-descent parser for the C subset.
//!
//! `Parser` owns the whole token vector (the lexer already ran to
//! completion) and a cursor into it; cascading precedence-climbing methods
//! live in [`expr`], statement dispatch in [`stmt`], declaration-specifier
//! parsing in [`types`]. On a syntax error the parser reports a diagnostic,
//! emits a placeholder node, and enters synchronizing mode so one mistake
//! doesn't cascade into hundreds.

pub mod ast;
mod expr;
mod stmt;
mod types;

pub use ast::*;

use faxc_lex::{Keyword, Token, TokenKind};
use faxc_util::diagnostic::DiagnosticCode;
use faxc_util::{Handler, Span};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a Handler,
    /// Suppresses further diagnostics while recovering from a syntax error,
    /// so synchronizing doesn't itself produce a flood of "unexpected token"
    /// reports.
    synchronizing: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        assert!(!tokens.is_empty() && tokens.last().unwrap().is_eof(), "token stream must end in Eof");
        Self { tokens, pos: 0, handler, synchronizing: false }
    }

    /// Parses the whole token stream into the sequence of top-level
    /// statements executed by `_start`.
    pub fn parse_program(mut self) -> Program {
        tracing::trace!("parsing");
        let mut program = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_statement() {
                program.push(stmt);
            }
        }
        tracing::trace!(statements = program.len(), "parsing done");
        program
    }

    // ---- cursor primitives -------------------------------------------

    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn previous(&self) -> Token {
        self.tokens[self.pos.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if k == kw)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_keyword(&self) -> Option<Keyword> {
        match self.peek_kind() {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    fn span_here(&self) -> Span {
        let tok = self.peek();
        Span::point(tok.line, tok.column)
    }

    fn span_of(&self, tok: Token) -> Span {
        Span::point(tok.line, tok.column)
    }

    /// Consumes a token of `kind`, reporting `E_PARSER_EXPECTED_TOKEN` and
    /// entering synchronizing mode if the current token doesn't match.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_expected(what);
            None
        }
    }

    fn error_expected(&mut self, what: &str) {
        if self.synchronizing {
            return;
        }
        self.handler
            .build_error(self.span_here(), format!("expected {what}, found {:?}", self.peek_kind()))
            .code(DiagnosticCode::E_PARSER_EXPECTED_TOKEN)
            .emit(self.handler);
        self.synchronizing = true;
    }

    fn error_unexpected(&mut self, what: &str) {
        if self.synchronizing {
            return;
        }
        self.handler
            .build_error(self.span_here(), format!("unexpected {what}"))
            .code(DiagnosticCode::E_PARSER_UNEXPECTED_TOKEN)
            .emit(self.handler);
        self.synchronizing = true;
    }

    fn error_illegal_type_spec(&mut self, message: &str) {
        if self.synchronizing {
            return;
        }
        self.handler
            .build_error(self.span_here(), message.to_string())
            .code(DiagnosticCode::E_PARSER_ILLEGAL_TYPE_SPEC)
            .emit(self.handler);
        self.synchronizing = true;
    }

    /// A recognised-but-unimplemented language feature: reports and recovers
    /// without poisoning the rest of the parse, since the tokens are still
    /// consumed correctly.
    pub(crate) fn report_unsupported_feature(&mut self, feature: &str) {
        self.handler
            .build_error(self.span_here(), format!("{feature} is not supported by this compiler"))
            .code(DiagnosticCode::E_PARSER_UNSUPPORTED_FEATURE)
            .emit(self.handler);
    }

    /// Skips tokens until a likely statement boundary: past a `;`, or just
    /// before a token that starts a new statement/declaration/block close.
    fn synchronize(&mut self) {
        self.synchronizing = false;
        while !self.is_at_end() {
            if matches!(self.previous().kind, TokenKind::Semicolon) {
                return;
            }
            if self.check(TokenKind::RightBrace) || self.at_statement_start() {
                return;
            }
            self.advance();
        }
    }

    fn at_statement_start(&self) -> bool {
        self.at_type_start()
            || matches!(
                self.current_keyword(),
                Some(
                    Keyword::If
                        | Keyword::While
                        | Keyword::For
                        | Keyword::Do
                        | Keyword::Return
                        | Keyword::Break
                        | Keyword::Continue
                        | Keyword::Putchar
                        | Keyword::Switch
                        | Keyword::Goto
                )
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lex::Lexer;

    fn parse(src: &str) -> (Program, bool) {
        let handler = Handler::new();
        let tokens = Lexer::new(src, &handler).tokenize();
        let program = Parser::new(tokens, &handler).parse_program();
        (program, handler.has_errors())
    }

    #[test]
    fn empty_program_parses() {
        let (program, had_error) = parse("");
        assert!(program.is_empty());
        assert!(!had_error);
    }

    #[test]
    fn var_decl_with_initializer() {
        let (program, had_error) = parse("int x = 1 + 2;");
        assert!(!had_error);
        assert_eq!(program.len(), 1);
        assert!(matches!(program[0], Stmt::VarDecl { .. }));
    }

    #[test]
    fn missing_semicolon_reports_and_recovers() {
        let (program, had_error) = parse("int x = 1 int y = 2;");
        assert!(had_error);
        // recovery resumes at the next statement start
        assert!(program.iter().any(|s| matches!(s, Stmt::VarDecl { .. })));
    }
}
