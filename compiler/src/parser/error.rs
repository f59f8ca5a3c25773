use std::fmt;

use thiserror::Error;

/// Where in the source a compile error was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// At a token; holds its lexeme
    Lexeme(String),
    /// At the end of input
    End,
    /// Inside a lexical error, which has no lexeme worth quoting
    Lexical,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocation::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
            ErrorLocation::End => write!(f, " at end"),
            ErrorLocation::Lexical => Ok(()),
        }
    }
}

/// A single diagnostic produced while compiling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct CompileError {
    pub line: u32,
    pub location: ErrorLocation,
    pub message: String,
}

/// Every diagnostic reported by a failed compilation, in source order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_lines(.errors))]
pub struct CompileFailure {
    errors: Vec<CompileError>,
}

impl CompileFailure {
    pub fn new(errors: Vec<CompileError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    /// The diagnostic that put the parser into panic mode
    pub fn first(&self) -> Option<&CompileError> {
        self.errors.first()
    }
}

fn join_lines(errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileFailure>;
