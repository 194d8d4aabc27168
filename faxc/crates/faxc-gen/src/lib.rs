//! NASM code generation: the single-pass backend that turns a typed
//! statement/expression tree into x86-64 System V assembly text.

pub mod codegen;
pub mod error;
pub mod registers;
pub mod temp;
pub mod value;

pub use codegen::CodeGenerator;
pub use error::{CodeGenError, Result};
pub use registers::{GpRegister, SimdRegister, SimdRegisterPool};
pub use temp::{StackLayout, TempPool};
pub use value::{GenValue, Location};
