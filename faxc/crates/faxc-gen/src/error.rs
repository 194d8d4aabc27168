//! Fatal code generation errors.
//!
//! Everything a user's source can trigger — undeclared variables, bad
//! operand types, non-lvalue assignment, loop control outside a loop,
//! unsupported long double — is a recoverable diagnostic reported through
//! `faxc_util::diagnostic::Handler`, exactly like lexer/parser errors:
//! `had_error` is set, compilation continues, and the driver reports a
//! non-zero exit status afterwards. `CodeGenError` is reserved for the one
//! class of genuinely fatal failure: allocator exhaustion that the
//! register/temp pools' own invariants say should never happen.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    /// All 8 SIMD registers are in use. With one float (sub)expression
    /// materialized at a time this indicates a bug in register lifetime
    /// tracking, not a large program.
    #[error("SIMD register pool exhausted")]
    SimdRegisterPoolExhausted,

    /// A growable buffer (`.text`/`.data`, the temp pool) failed to grow.
    #[error("allocation failure: {0}")]
    AllocationFailure(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
