pub mod cli;
pub mod codegen;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use codegen::{compile, Compiler};
pub use lexer::{Lexeme, Scanner, Token, TokenKind};
pub use parser::{CompileError, CompileFailure, ErrorLocation};
pub use runtime::{interpret, InterpretError, InterpretResult, Interpreter};
