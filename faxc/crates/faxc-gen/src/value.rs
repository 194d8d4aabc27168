//! The value descriptor every expression lowers to.
//!
//! A `GenValue` is what every expression lowers to: a type plus a location
//! telling `emit_result` how to spell the operand in an instruction. It
//! never owns a register directly — GP/SIMD registers are transient,
//! borrowed from the pools in `registers.rs` for the span of one
//! instruction sequence and freed immediately after.

use faxc_sem::DataType;

/// Where a value currently lives.
#[derive(Debug, Clone)]
pub enum Location {
    /// A value known at compile time, not yet materialized anywhere.
    IntConstant(i128),
    /// A floating-point literal materialized into `.data` under a fresh
    /// label.
    FloatConstant(u32),
    /// A local variable's stack slot, `[rbp - n]`.
    BaseOffset(u32),
    /// A compiler-introduced temporary's stack slot, indexed into the temp
    /// pool rather than carrying a raw offset directly.
    Temp(usize),
    /// A `.data` label, referenced as `[.Ln]` (e.g. a constant materialized
    /// by `convert_to_type`'s compile-time integer-to-float fold).
    Label(u32),
}

/// An expression's fully-typed result.
#[derive(Debug, Clone)]
pub struct GenValue {
    pub data_type: DataType,
    pub location: Location,
}

impl GenValue {
    pub fn new(data_type: DataType, location: Location) -> Self {
        Self { data_type, location }
    }

    pub fn error() -> Self {
        Self { data_type: DataType::Error, location: Location::IntConstant(0) }
    }

    pub fn is_error(&self) -> bool {
        self.data_type.is_error()
    }

    /// The temp-pool index this value occupies, if it is a temporary.
    pub fn temp_index(&self) -> Option<usize> {
        match self.location {
            Location::Temp(i) => Some(i),
            _ => None,
        }
    }
}
