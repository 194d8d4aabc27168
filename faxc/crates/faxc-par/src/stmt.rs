//! Statement parsing: declarations, control flow, and the handful of
//! statement forms this compiler recognises.

use faxc_lex::{Keyword, TokenKind};
use faxc_util::Span;

use crate::ast::{Expr, Stmt};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        let stmt = self.parse_statement_inner();
        if self.synchronizing {
            self.synchronize();
        }
        stmt
    }

    fn parse_statement_inner(&mut self) -> Option<Stmt> {
        if self.at_type_start() {
            return self.parse_var_decl();
        }
        match self.current_keyword() {
            Some(Keyword::If) => self.parse_if(),
            Some(Keyword::While) => self.parse_while(),
            Some(Keyword::For) => self.parse_for(),
            Some(Keyword::Do) => self.parse_do_while(),
            Some(Keyword::Return) => self.parse_return(),
            Some(Keyword::Break) => self.parse_break(),
            Some(Keyword::Continue) => self.parse_continue(),
            Some(Keyword::Putchar) => self.parse_putchar(),
            Some(Keyword::Switch | Keyword::Goto | Keyword::Case | Keyword::Default) => {
                self.report_unsupported_feature("switch/goto control flow");
                self.skip_to_semicolon();
                None
            }
            _ if self.check(TokenKind::LeftBrace) => Some(self.parse_block()),
            _ if self.check(TokenKind::Semicolon) => {
                self.advance();
                None
            }
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_var_decl(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        let data_type = self.parse_type_specifier();
        let name_tok = self.expect(TokenKind::Ident, "a variable name")?;
        let init = if self.match_kind(TokenKind::Eq) {
            Some(self.parse_expression())
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';' after declaration");
        Some(Stmt::VarDecl { name: name_tok.text, data_type, init, span })
    }

    fn parse_expr_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression();
        self.expect(TokenKind::Semicolon, "';' after expression");
        Some(Stmt::Expr(expr))
    }

    fn parse_block(&mut self) -> Stmt {
        self.advance(); // '{'
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
        }
        self.expect(TokenKind::RightBrace, "'}'");
        Stmt::Block(stmts)
    }

    fn parse_if(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::LeftParen, "'(' after 'if'");
        let cond = self.parse_expression();
        self.expect(TokenKind::RightParen, "')' after if condition");
        let then_branch = Box::new(self.parse_statement_inner()?);
        let else_branch = if self.match_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement_inner()?))
        } else {
            None
        };
        Some(Stmt::If { cond, then_branch, else_branch, span })
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::LeftParen, "'(' after 'while'");
        let cond = self.parse_expression();
        self.expect(TokenKind::RightParen, "')' after while condition");
        let body = Box::new(self.parse_statement_inner()?);
        Some(Stmt::While { cond, body, span })
    }

    /// `do` has a reserved keyword and a grammar shape but no codegen: parse
    /// past the whole construct so surrounding statements still parse, but
    /// contribute nothing to the program.
    fn parse_do_while(&mut self) -> Option<Stmt> {
        self.advance();
        self.report_unsupported_feature("'do'/'while' post-condition loops");
        self.parse_statement_inner();
        self.expect(TokenKind::Keyword(Keyword::While), "'while' after 'do' body");
        self.expect(TokenKind::LeftParen, "'(' after 'while'");
        self.parse_expression();
        self.expect(TokenKind::RightParen, "')' after while condition");
        self.expect(TokenKind::Semicolon, "';' after do-while");
        None
    }

    /// `for (init; cond; step) body` desugars to a `Block` that declares
    /// `init` in its own scope, then a `While` whose body runs `step` after
    /// the loop body — no dedicated for-loop lowering exists, so
    /// parsing-time desugaring keeps the code generator's loop handling
    /// singular.
    fn parse_for(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::LeftParen, "'(' after 'for'");

        let init = if self.check(TokenKind::Semicolon) {
            self.advance();
            None
        } else if self.at_type_start() {
            self.parse_var_decl()
        } else {
            self.parse_expr_statement()
        };

        let cond = if self.check(TokenKind::Semicolon) {
            Expr::Literal {
                value: crate::ast::LiteralValue::Int(1),
                data_type: faxc_sem::DataType::int(),
                span,
            }
        } else {
            self.parse_expression()
        };
        self.expect(TokenKind::Semicolon, "';' after for-loop condition");

        let step = if self.check(TokenKind::RightParen) { None } else { Some(self.parse_expression()) };
        self.expect(TokenKind::RightParen, "')' after for-loop clauses");

        let mut body_stmts = vec![self.parse_statement_inner()?];
        if let Some(step) = step {
            body_stmts.push(Stmt::Expr(step));
        }
        let loop_stmt = Stmt::While { cond, body: Box::new(Stmt::Block(body_stmts)), span };

        let mut outer = Vec::new();
        if let Some(init) = init {
            outer.push(init);
        }
        outer.push(loop_stmt);
        Some(Stmt::Block(outer))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expression()) };
        self.expect(TokenKind::Semicolon, "';' after return");
        Some(Stmt::Return { value, span })
    }

    fn parse_break(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::Semicolon, "';' after break");
        Some(Stmt::Break { span })
    }

    fn parse_continue(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::Semicolon, "';' after continue");
        Some(Stmt::Continue { span })
    }

    fn parse_putchar(&mut self) -> Option<Stmt> {
        let span = self.span_here();
        self.advance();
        self.expect(TokenKind::LeftParen, "'(' after 'putchar'");
        let value = self.parse_expression();
        self.expect(TokenKind::RightParen, "')' after putchar argument");
        self.expect(TokenKind::Semicolon, "';' after putchar statement");
        Some(Stmt::Putchar { value, span })
    }

    fn skip_to_semicolon(&mut self) {
        while !self.is_at_end() && !self.check(TokenKind::Semicolon) {
            self.advance();
        }
        self.match_kind(TokenKind::Semicolon);
    }
}
