//! The typed statement/expression AST.
//!
//! A tagged union in place of a base-header-plus-variant-cast pattern: each
//! `Expr`/`Stmt` variant owns its children outright, so dropping a node
//! recursively drops its subtree for free.

use faxc_sem::DataType;
use faxc_util::{Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    BitAnd,
    BitOr,
    BitXor,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    LogAnd,
    LogOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
}

/// A compile-time literal value, already classified by suffix/decoding at
/// parse time (numeric suffixes are unambiguous; escape decoding has no
/// later-binding ambiguity either).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Int(i128),
    Float(f64),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal { value: LiteralValue, data_type: DataType, span: Span },
    Identifier { name: Symbol, span: Span },
    Grouping { inner: Box<Expr>, span: Span },
    Unary { op: UnOp, operand: Box<Expr>, span: Span },
    /// `(type) expr` — a C-style cast, sitting between unary and primary in
    /// the grammar even though it isn't a named precedence tier of its own.
    Cast { target: DataType, operand: Box<Expr>, span: Span },
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr>, span: Span },
    /// Always simple `=`; compound assignment (`+=` etc.) is desugared by
    /// the parser into `lvalue = lvalue OP rvalue`.
    Assignment { target: Box<Expr>, value: Box<Expr>, span: Span },
    /// A placeholder produced when a sub-expression failed to parse; always
    /// paired with a diagnostic, carries `DataType::Error` downstream so
    /// codegen can suppress cascading type errors.
    Error { span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Grouping { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assignment { span, .. }
            | Expr::Error { span } => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    VarDecl { name: Symbol, data_type: DataType, init: Option<Expr>, span: Span },
    Return { value: Option<Expr>, span: Span },
    Block(Vec<Stmt>),
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>>, span: Span },
    While { cond: Expr, body: Box<Stmt>, span: Span },
    Break { span: Span },
    Continue { span: Span },
    Putchar { value: Expr, span: Span },
}

/// A translation unit: the sequence of top-level statements executed by
/// `_start`.
pub type Program = Vec<Stmt>;
