mod buffer;
mod constants;
mod disassembler;
mod opcode;

pub use buffer::{grow_capacity, GrowableArray, MIN_CAPACITY};
pub use constants::ConstantPool;
pub use disassembler::{disassemble, disassemble_instruction};
pub use opcode::OpCode;

use crate::vm::Value;

/// A compiled unit: instruction bytes, the source line of every byte, and the
/// constants the instructions refer to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    code: GrowableArray<u8>,
    lines: GrowableArray<u32>,
    constants: ConstantPool,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte produced while compiling `line`
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Append an opcode byte
    pub fn write_op(&mut self, opcode: OpCode, line: u32) {
        self.write(opcode.into(), line);
    }

    /// Add a value to the constant pool and return its index
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.append(value)
    }

    pub fn code(&self) -> &[u8] {
        self.code.as_slice()
    }

    pub fn lines(&self) -> &[u32] {
        self.lines.as_slice()
    }

    /// Source line that produced the byte at `offset`
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.code.capacity()
    }

    /// Release all storage, leaving an empty container
    pub fn free(&mut self) {
        self.code.clear();
        self.lines.clear();
        self.constants.clear();
    }
}
