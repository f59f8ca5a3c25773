// bee - A bytecode stack machine for a small expression language

pub mod bytecode;
pub mod runtime;
pub mod vm;

pub use bytecode::{Bytecode, ConstantPool, OpCode};
pub use runtime::{Runtime, RuntimeConfig, RuntimeError};
pub use vm::{VMError, Value, VM};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
