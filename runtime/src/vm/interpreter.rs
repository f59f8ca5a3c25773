use tracing::{debug, trace};

use crate::bytecode::{disassemble_instruction, Bytecode, OpCode};
use crate::vm::execution_context::STACK_MAX;
use crate::vm::{ExecutionContext, Value, VMError, VMResult};

/// The Virtual Machine that executes bytecode instructions
#[derive(Clone, Debug)]
pub struct VM {
    stack_max: usize,
    stack_trace_enabled: bool,
}

impl VM {
    pub fn new() -> Self {
        Self {
            stack_max: STACK_MAX,
            stack_trace_enabled: false,
        }
    }

    /// Use a value stack holding at most `stack_max` values
    pub fn with_stack_max(mut self, stack_max: usize) -> Self {
        self.stack_max = stack_max;
        self
    }

    pub fn stack_max(&self) -> usize {
        self.stack_max
    }

    /// Enable or disable per-instruction tracing
    pub fn set_stack_trace(&mut self, enabled: bool) {
        self.stack_trace_enabled = enabled;
    }

    /// Run `bytecode` until `OP_RETURN` and hand back the value it returned
    pub fn execute(&self, bytecode: &Bytecode) -> VMResult<Value> {
        let mut context = ExecutionContext::new(bytecode, self.stack_max);
        let result = self.run(&mut context);
        if let Err(error) = &result {
            debug!(%error, ip = context.ip(), "execution aborted");
            context.reset_stack();
        }
        result
    }

    fn run(&self, context: &mut ExecutionContext<'_>) -> VMResult<Value> {
        loop {
            if self.stack_trace_enabled && context.has_more_instructions() {
                let (instruction, _) = disassemble_instruction(context.bytecode(), context.ip());
                trace!(stack = %context.format_stack(), "{}", instruction);
            }

            let byte = context.read_byte()?;
            let opcode = OpCode::from_byte(byte).ok_or(VMError::InvalidOpcode(byte))?;

            match opcode {
                OpCode::Constant => {
                    let value = context.read_constant()?;
                    context.push(value)?;
                }
                OpCode::Nil => context.push(Value::Nil)?,
                OpCode::True => context.push(Value::Bool(true))?,
                OpCode::False => context.push(Value::Bool(false))?,

                OpCode::Equal => {
                    let b = context.pop()?;
                    let a = context.pop()?;
                    context.push(Value::Bool(a == b))?;
                }
                OpCode::Greater => binary_op(context, |a, b| Value::Bool(a > b))?,
                OpCode::Less => binary_op(context, |a, b| Value::Bool(a < b))?,

                OpCode::Add => binary_op(context, |a, b| Value::Number(a + b))?,
                OpCode::Subtract => binary_op(context, |a, b| Value::Number(a - b))?,
                OpCode::Multiply => binary_op(context, |a, b| Value::Number(a * b))?,
                OpCode::Divide => binary_op(context, |a, b| Value::Number(a / b))?,

                OpCode::Not => {
                    let value = context.pop()?;
                    context.push(Value::Bool(value.is_falsey()))?;
                }
                OpCode::Negate => {
                    let Value::Number(number) = context.peek(0)? else {
                        return Err(context.runtime_error("Operand must be a number."));
                    };
                    context.pop()?;
                    context.push(Value::Number(-number))?;
                }

                OpCode::Return => {
                    let value = context.pop()?;
                    debug!(%value, "execution finished");
                    return Ok(value);
                }
            }
        }
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

/// Pop `b` then `a`, both numbers, and push `op(a, b)`
fn binary_op(
    context: &mut ExecutionContext<'_>,
    op: impl Fn(f64, f64) -> Value,
) -> VMResult<()> {
    let (Value::Number(b), Value::Number(a)) = (context.peek(0)?, context.peek(1)?) else {
        return Err(context.runtime_error("Operands must be numbers."));
    };
    context.pop()?;
    context.pop()?;
    context.push(op(a, b))
}
