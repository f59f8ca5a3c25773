use tracing::debug;

use crate::bytecode::{disassemble, Bytecode};
use crate::runtime::{RuntimeConfig, RuntimeError, RuntimeResult};
use crate::vm::{Value, VM};

/// The Runtime is the main entry point for running compiled bytecode
#[derive(Clone, Debug)]
pub struct Runtime {
    vm: VM,
    config: RuntimeConfig,
}

impl Runtime {
    /// Create a new runtime with default configuration
    pub fn new() -> RuntimeResult<Self> {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a new runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> RuntimeResult<Self> {
        if config.stack_max == 0 {
            return Err(RuntimeError::ConfigError(
                "stack_max must be at least 1".to_string(),
            ));
        }

        let mut vm = VM::new().with_stack_max(config.stack_max);
        vm.set_stack_trace(config.stack_trace);

        Ok(Self { vm, config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Execute a compiled unit and return the value it produced
    pub fn execute(&self, bytecode: &Bytecode) -> RuntimeResult<Value> {
        if self.config.debug_mode {
            debug!(
                constants = bytecode.constants().len(),
                bytes = bytecode.len(),
                "\n{}",
                disassemble(bytecode, "code")
            );
        }

        let value = self.vm.execute(bytecode)?;
        Ok(value)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        let config = RuntimeConfig::default();
        Self {
            vm: VM::new().with_stack_max(config.stack_max),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use crate::vm::VMError;

    /// Helper function to create a test runtime with default config
    fn create_test_runtime() -> Runtime {
        Runtime::new().expect("Failed to create test runtime")
    }

    /// `-(1.5)` as bytecode
    fn create_simple_test_bytecode() -> Bytecode {
        let mut bytecode = Bytecode::new();
        let index = bytecode.add_constant(Value::Number(1.5));
        bytecode.write_op(OpCode::Constant, 1);
        bytecode.write(index as u8, 1);
        bytecode.write_op(OpCode::Negate, 1);
        bytecode.write_op(OpCode::Return, 1);
        bytecode
    }

    #[test]
    fn test_runtime_new() {
        let runtime = create_test_runtime();
        assert_eq!(runtime.config(), &RuntimeConfig::default());
    }

    #[test]
    fn test_runtime_rejects_empty_stack() {
        let result = Runtime::with_config(RuntimeConfig::new().with_stack_max(0));
        match result {
            Err(RuntimeError::ConfigError(message)) => assert!(message.contains("stack_max")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_execute_valid_bytecode() {
        let runtime = create_test_runtime();
        let value = runtime.execute(&create_simple_test_bytecode()).unwrap();
        assert_eq!(value, Value::Number(-1.5));
    }

    #[test]
    fn test_execute_with_debug_mode_and_stack_trace() {
        crate::test_utils::init_test_logging();

        let config = RuntimeConfig::new()
            .with_debug_mode(true)
            .with_stack_trace(true);
        let runtime = Runtime::with_config(config).unwrap();
        let value = runtime.execute(&create_simple_test_bytecode()).unwrap();
        assert_eq!(value, Value::Number(-1.5));
    }

    #[test]
    fn test_stack_max_is_applied() {
        let runtime = Runtime::with_config(RuntimeConfig::new().with_stack_max(1)).unwrap();

        let mut bytecode = Bytecode::new();
        bytecode.write_op(OpCode::True, 1);
        bytecode.write_op(OpCode::False, 1);
        bytecode.write_op(OpCode::Equal, 1);
        bytecode.write_op(OpCode::Return, 1);

        assert_eq!(
            runtime.execute(&bytecode),
            Err(RuntimeError::VMError(VMError::StackOverflow(1)))
        );
    }

    #[test]
    fn test_multiple_executions_are_independent() {
        let runtime = create_test_runtime();
        let bytecode = create_simple_test_bytecode();

        for i in 0..3 {
            let result = runtime.execute(&bytecode);
            assert_eq!(result, Ok(Value::Number(-1.5)), "iteration {}", i);
        }
    }
}
