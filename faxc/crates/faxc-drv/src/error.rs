//! Driver-level errors.
//!
//! Everything below the driver (lexer/parser) reports through
//! [`faxc_util::diagnostic::Handler`] and keeps running; these variants only
//! cover the things that stop the driver itself cold — a source file that
//! can't be read, an output path that can't be written, the code generator
//! hitting a genuinely fatal allocator failure, or the handler having
//! collected at least one error by the time the pipeline finishes.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read '{path}': {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write output to '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compilation failed with {error_count} error(s)")]
    CompilationFailed { error_count: usize },

    #[error("code generation failed: {0}")]
    CodeGen(#[from] faxc_gen::CodeGenError),
}

pub type Result<T> = std::result::Result<T, DriverError>;
