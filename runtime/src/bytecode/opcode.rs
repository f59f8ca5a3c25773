/// Opcodes for the VM

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Stack loads
    Constant = 0x00,   // Push constant from the pool (1 operand: pool index)
    Nil = 0x01,        // Push nil
    True = 0x02,       // Push true
    False = 0x03,      // Push false

    // Comparison operations
    Equal = 0x04,      // Structural equality of the top two values
    Greater = 0x05,    // Second top value > top value
    Less = 0x06,       // Second top value < top value

    // Arithmetic operations
    Add = 0x07,        // Add top two values
    Subtract = 0x08,   // Subtract top value from second top value
    Multiply = 0x09,   // Multiply top two values
    Divide = 0x0A,     // Divide second top value by top value

    // Unary operations
    Not = 0x0B,        // Logical NOT of the top value's falsiness
    Negate = 0x0C,     // Arithmetic negation

    // Control
    Return = 0x0D,     // Pop and report the top value, end execution
}

const CONSTANT: u8 = OpCode::Constant as u8;
const NIL: u8 = OpCode::Nil as u8;
const TRUE: u8 = OpCode::True as u8;
const FALSE: u8 = OpCode::False as u8;

const EQUAL: u8 = OpCode::Equal as u8;
const GREATER: u8 = OpCode::Greater as u8;
const LESS: u8 = OpCode::Less as u8;

const ADD: u8 = OpCode::Add as u8;
const SUBTRACT: u8 = OpCode::Subtract as u8;
const MULTIPLY: u8 = OpCode::Multiply as u8;
const DIVIDE: u8 = OpCode::Divide as u8;

const NOT: u8 = OpCode::Not as u8;
const NEGATE: u8 = OpCode::Negate as u8;

const RETURN: u8 = OpCode::Return as u8;

impl OpCode {
    /// Convert a byte to an opcode
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CONSTANT => Some(OpCode::Constant),
            NIL => Some(OpCode::Nil),
            TRUE => Some(OpCode::True),
            FALSE => Some(OpCode::False),

            EQUAL => Some(OpCode::Equal),
            GREATER => Some(OpCode::Greater),
            LESS => Some(OpCode::Less),

            ADD => Some(OpCode::Add),
            SUBTRACT => Some(OpCode::Subtract),
            MULTIPLY => Some(OpCode::Multiply),
            DIVIDE => Some(OpCode::Divide),

            NOT => Some(OpCode::Not),
            NEGATE => Some(OpCode::Negate),

            RETURN => Some(OpCode::Return),

            _ => None,
        }
    }

    /// Convert an opcode to a byte
    pub fn to_byte(&self) -> u8 {
        *self as u8
    }

    /// Get the number of operand bytes that follow the opcode
    pub fn num_operands(&self) -> usize {
        match self {
            OpCode::Constant => 1,
            _ => 0,
        }
    }

    /// Mnemonic used by the disassembler
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::from_byte(byte).ok_or(byte)
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        opcode.to_byte()
    }
}
