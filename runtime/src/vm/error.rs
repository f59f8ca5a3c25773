use thiserror::Error;

/// Error type for VM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VMError {
    /// An operand had the wrong type; recoverable by the caller
    #[error("{message}\n[line {line}] in script")]
    Runtime { message: String, line: u32 },

    #[error("Stack overflow: more than {0} values on the stack")]
    StackOverflow(usize),

    #[error("Stack underflow")]
    StackUnderflow,

    #[error("Invalid opcode: {0}")]
    InvalidOpcode(u8),

    #[error("Invalid constant index: {0}")]
    InvalidConstantIndex(usize),

    #[error("Unexpected end of bytecode at offset {0}")]
    UnexpectedEndOfCode(usize),
}

impl VMError {
    /// Errors caused by broken stack discipline or malformed bytecode rather
    /// than by the program's values
    pub fn is_fatal(&self) -> bool {
        !matches!(self, VMError::Runtime { .. })
    }

    /// Source line of a type error, when known
    pub fn line(&self) -> Option<u32> {
        match self {
            VMError::Runtime { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for VM operations
pub type VMResult<T> = Result<T, VMError>;
