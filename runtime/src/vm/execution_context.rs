use crate::bytecode::Bytecode;
use crate::vm::{Value, VMError, VMResult};

/// Default capacity of the value stack
pub const STACK_MAX: usize = 256;

/// The execution context for VM instructions: the bytecode being run, the
/// instruction cursor and a fixed-capacity value stack
pub struct ExecutionContext<'a> {
    bytecode: &'a Bytecode,
    ip: usize,
    stack: Vec<Value>,
    stack_max: usize,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(bytecode: &'a Bytecode, stack_max: usize) -> Self {
        Self {
            bytecode,
            ip: 0,
            stack: Vec::with_capacity(stack_max.min(STACK_MAX)),
            stack_max,
        }
    }

    /// Get the bytecode being executed
    pub fn bytecode(&self) -> &'a Bytecode {
        self.bytecode
    }

    /// Get the current instruction cursor
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Check if there are more bytes to execute
    pub fn has_more_instructions(&self) -> bool {
        self.ip < self.bytecode.len()
    }

    /// Read the byte under the cursor and advance past it
    pub fn read_byte(&mut self) -> VMResult<u8> {
        let byte = self
            .bytecode
            .code()
            .get(self.ip)
            .copied()
            .ok_or(VMError::UnexpectedEndOfCode(self.ip))?;
        self.ip += 1;
        Ok(byte)
    }

    /// Read a one-byte pool index and fetch that constant
    pub fn read_constant(&mut self) -> VMResult<Value> {
        let index = self.read_byte()? as usize;
        self.bytecode
            .constants()
            .get(index)
            .ok_or(VMError::InvalidConstantIndex(index))
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) -> VMResult<()> {
        if self.stack.len() >= self.stack_max {
            return Err(VMError::StackOverflow(self.stack_max));
        }
        self.stack.push(value);
        Ok(())
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> VMResult<Value> {
        self.stack.pop().ok_or(VMError::StackUnderflow)
    }

    /// Look at a value `distance` slots below the top without removing it
    pub fn peek(&self, distance: usize) -> VMResult<Value> {
        self.stack
            .len()
            .checked_sub(distance + 1)
            .and_then(|index| self.stack.get(index).copied())
            .ok_or(VMError::StackUnderflow)
    }

    /// Get the current stack depth
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn reset_stack(&mut self) {
        self.stack.clear();
    }

    /// Source line of the instruction that was just read
    pub fn current_line(&self) -> u32 {
        self.bytecode
            .line_at(self.ip.saturating_sub(1))
            .unwrap_or(0)
    }

    /// Build a type error located at the current instruction and reset the stack
    pub fn runtime_error(&mut self, message: impl Into<String>) -> VMError {
        let line = self.current_line();
        self.reset_stack();
        VMError::Runtime {
            message: message.into(),
            line,
        }
    }

    /// Render the stack bottom to top, e.g. `[ 1 ][ true ]`
    pub fn format_stack(&self) -> String {
        self.stack.iter().map(|value| format!("[ {} ]", value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;

    fn create_test_bytecode() -> Bytecode {
        let mut bytecode = Bytecode::new();
        let index = bytecode.add_constant(Value::Number(42.0));
        bytecode.write_op(OpCode::Constant, 1);
        bytecode.write(index as u8, 1);
        bytecode.write_op(OpCode::Return, 2);
        bytecode
    }

    #[test]
    fn test_context_creation() {
        let bytecode = create_test_bytecode();
        let context = ExecutionContext::new(&bytecode, STACK_MAX);
        assert_eq!(context.ip(), 0);
        assert_eq!(context.stack_depth(), 0);
        assert!(context.has_more_instructions());
    }

    #[test]
    fn test_read_byte_and_constant() {
        let bytecode = create_test_bytecode();
        let mut context = ExecutionContext::new(&bytecode, STACK_MAX);

        assert_eq!(context.read_byte().unwrap(), OpCode::Constant.to_byte());
        assert_eq!(context.read_constant().unwrap(), Value::Number(42.0));
        assert_eq!(context.read_byte().unwrap(), OpCode::Return.to_byte());
        assert!(!context.has_more_instructions());

        match context.read_byte() {
            Err(VMError::UnexpectedEndOfCode(3)) => {}
            other => panic!("Expected UnexpectedEndOfCode, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_constant_index() {
        let mut bytecode = Bytecode::new();
        bytecode.write_op(OpCode::Constant, 1);
        bytecode.write(7, 1);
        let mut context = ExecutionContext::new(&bytecode, STACK_MAX);

        context.read_byte().unwrap();
        assert_eq!(context.read_constant(), Err(VMError::InvalidConstantIndex(7)));
    }

    #[test]
    fn test_push_pop_peek() {
        let bytecode = Bytecode::new();
        let mut context = ExecutionContext::new(&bytecode, STACK_MAX);

        context.push(Value::Number(1.0)).unwrap();
        context.push(Value::Bool(true)).unwrap();

        assert_eq!(context.peek(0).unwrap(), Value::Bool(true));
        assert_eq!(context.peek(1).unwrap(), Value::Number(1.0));
        assert_eq!(context.peek(2), Err(VMError::StackUnderflow));
        assert_eq!(context.format_stack(), "[ 1 ][ true ]");

        assert_eq!(context.pop().unwrap(), Value::Bool(true));
        assert_eq!(context.pop().unwrap(), Value::Number(1.0));
        assert_eq!(context.pop(), Err(VMError::StackUnderflow));
    }

    #[test]
    fn test_stack_overflow() {
        let bytecode = Bytecode::new();
        let mut context = ExecutionContext::new(&bytecode, 2);

        context.push(Value::Nil).unwrap();
        context.push(Value::Nil).unwrap();
        assert_eq!(context.push(Value::Nil), Err(VMError::StackOverflow(2)));
        assert_eq!(context.stack_depth(), 2);
    }

    #[test]
    fn test_runtime_error_uses_previous_byte_line_and_resets_stack() {
        let bytecode = create_test_bytecode();
        let mut context = ExecutionContext::new(&bytecode, STACK_MAX);
        context.read_byte().unwrap();
        context.read_byte().unwrap();
        context.read_byte().unwrap();
        context.push(Value::Nil).unwrap();

        let error = context.runtime_error("Operand must be a number.");

        assert_eq!(error.line(), Some(2));
        assert_eq!(context.stack_depth(), 0);
    }
}
