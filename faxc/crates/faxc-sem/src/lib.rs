//! faxc-sem — the C subset's type system, scopes, and literal decoding.
//!
//! This crate has no type *inference*: every declaration names its type
//! explicitly, so there is nothing to solve for. What it owns is the data
//! that the code generator needs but that isn't itself an instruction-
//! emission concern: the `DataType` lattice and its conversions, the
//! lexical scope/loop stacks, and char/string escape decoding.

pub mod escape;
pub mod scope;
pub mod types;

pub use escape::{decode_char_constant, decode_escapes};
pub use scope::{LocalVariable, LoopLabels, LoopStack, ScopeStack};
pub use types::{binary_expression_resulting_type, classify_conversion, Conversion, DataType, Signedness};
