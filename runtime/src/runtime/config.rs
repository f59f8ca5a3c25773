//! Runtime configuration options

use crate::vm::STACK_MAX;

/// Configuration options for the bee runtime
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Log a disassembly of every unit before it runs
    pub debug_mode: bool,
    /// Log the stack and instruction before every dispatch
    pub stack_trace: bool,
    /// Capacity of the value stack
    pub stack_max: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            stack_trace: false,
            stack_max: STACK_MAX,
        }
    }
}

impl RuntimeConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    /// Enable or disable stack trace
    pub fn with_stack_trace(mut self, stack_trace: bool) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    /// Set the value stack capacity
    pub fn with_stack_max(mut self, stack_max: usize) -> Self {
        self.stack_max = stack_max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert!(!config.debug_mode);
        assert!(!config.stack_trace);
        assert_eq!(config.stack_max, 256);
        assert_eq!(config, RuntimeConfig::new());
    }

    #[test]
    fn test_builder_chain() {
        let config = RuntimeConfig::new()
            .with_debug_mode(true)
            .with_stack_trace(true)
            .with_stack_max(16);
        assert!(config.debug_mode);
        assert!(config.stack_trace);
        assert_eq!(config.stack_max, 16);
    }
}
