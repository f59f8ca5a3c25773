mod config;
mod executor;

pub use config::RuntimeConfig;
pub use executor::Runtime;

use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error(transparent)]
    VMError(#[from] crate::vm::VMError),

    #[error("Runtime configuration error: {0}")]
    ConfigError(String),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
