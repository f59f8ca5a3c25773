use std::io::{self, Write};

use bee::{Bytecode, Runtime, RuntimeConfig, RuntimeError, Value};
use thiserror::Error;
use tracing::debug;

use crate::codegen::compile;
use crate::parser::CompileFailure;

/// Outcome of interpreting one source unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}

impl InterpretResult {
    /// Conventional process exit status for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            InterpretResult::Ok => 0,
            InterpretResult::CompileError => 65,
            InterpretResult::RuntimeError => 70,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error(transparent)]
    Compile(#[from] CompileFailure),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl InterpretError {
    pub fn result(&self) -> InterpretResult {
        match self {
            InterpretError::Compile(_) => InterpretResult::CompileError,
            InterpretError::Runtime(_) => InterpretResult::RuntimeError,
        }
    }
}

/// Compiles and runs source text; each call is independent of the last
#[derive(Clone, Debug)]
pub struct Interpreter {
    runtime: Runtime,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::default(),
        }
    }

    pub fn with_config(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        Ok(Self {
            runtime: Runtime::with_config(config)?,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.runtime.config()
    }

    /// Compile `source` and run it, returning the value of the expression
    pub fn evaluate(&self, source: &str) -> Result<Value, InterpretError> {
        let bytecode = compile(source)?;
        self.execute(&bytecode)
    }

    /// Run an already compiled unit
    pub fn execute(&self, bytecode: &Bytecode) -> Result<Value, InterpretError> {
        let value = self.runtime.execute(bytecode)?;
        Ok(value)
    }

    /// Run `source`, printing the result to `out` and any diagnostics to `err`
    pub fn interpret_with<W: Write, E: Write>(
        &self,
        source: &str,
        out: &mut W,
        err: &mut E,
    ) -> InterpretResult {
        report(self.evaluate(source), out, err)
    }

    /// Run `source` against the process's stdout and stderr
    pub fn interpret(&self, source: &str) -> InterpretResult {
        self.interpret_with(source, &mut io::stdout().lock(), &mut io::stderr().lock())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a value to `out` or an error to `err` and classify the outcome
pub fn report<W: Write, E: Write>(
    outcome: Result<Value, InterpretError>,
    out: &mut W,
    err: &mut E,
) -> InterpretResult {
    match outcome {
        Ok(value) => {
            if let Err(error) = writeln!(out, "{}", value) {
                debug!(%error, "failed to write result");
            }
            InterpretResult::Ok
        }
        Err(error) => {
            if let Err(io_error) = writeln!(err, "{}", error) {
                debug!(error = %io_error, "failed to write diagnostic");
            }
            error.result()
        }
    }
}

/// Interpret `source` with the default configuration
pub fn interpret(source: &str) -> InterpretResult {
    Interpreter::new().interpret(source)
}
