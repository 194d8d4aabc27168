//! faxc-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides fundamental utilities and types that form the foundation
//! of the entire faxc compiler infrastructure. These utilities are designed to be
//! zero-cost abstractions that improve code clarity, type safety, and performance
//! without runtime overhead.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. ZERO-COST ABSTRACTIONS
//!    All utilities compile down to efficient code with no runtime penalty
//!    compared to hand-written implementations.
//!
//! 2. TYPE SAFETY
//!    Leverage Rust's type system to prevent bugs at compile time.
//!    Examples: typed indices prevent mixing different ID spaces.
//!
//! 3. ERGONOMICS
//!    APIs should be intuitive and easy to use correctly.
//!    Examples: builder patterns, type inference-friendly interfaces.
//!
//! MODULES
//! -------
//! - [`span`] — `FileId`/`Span` source locations and the multi-file `SourceMap`.
//! - [`symbol`] — the `Symbol` string interner shared by every pipeline stage.
//! - [`diagnostic`] — `Diagnostic`/`Level`/`Handler`, the shared error-reporting
//!   infrastructure used by the lexer, parser, semantic analysis, and codegen.
//! - [`index_vec`] — `IndexVec<I, T>`, a typed alternative to indexing `Vec<T>`
//!   with a raw `usize`.
//! - [`error`] — `thiserror`-derived error enums for this crate's own fallible
//!   operations (symbol lookup, source-map queries, index-vector access).

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
