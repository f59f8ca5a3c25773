mod error;
mod execution_context;
mod interpreter;
mod value;

pub use error::{VMError, VMResult};
pub use execution_context::{ExecutionContext, STACK_MAX};
pub use interpreter::VM;
pub use value::{format_number, Value};
