//! Human-readable listings of compiled bytecode, for debugging only.

use std::fmt::Write;

use crate::bytecode::{Bytecode, OpCode};

/// Render every instruction in `bytecode` under a `== name ==` header
pub fn disassemble(bytecode: &Bytecode, name: &str) -> String {
    let mut listing = format!("== {} ==\n", name);

    let mut offset = 0;
    while offset < bytecode.len() {
        let (line, next) = disassemble_instruction(bytecode, offset);
        listing.push_str(&line);
        listing.push('\n');
        offset = next;
    }

    listing
}

/// Render the instruction at `offset`, returning the text and the offset of
/// the next instruction
pub fn disassemble_instruction(bytecode: &Bytecode, offset: usize) -> (String, usize) {
    let mut text = format!("{:04} ", offset);
    let Some(&byte) = bytecode.code().get(offset) else {
        text.push_str("<end of code>");
        return (text, offset + 1);
    };

    let line = bytecode.line_at(offset);
    if offset > 0 && line == bytecode.line_at(offset - 1) {
        text.push_str("   | ");
    } else {
        let _ = write!(text, "{:>4} ", line.unwrap_or(0));
    }

    match OpCode::from_byte(byte) {
        Some(OpCode::Constant) => {
            let next = constant_instruction(bytecode, offset, &mut text);
            (text, next)
        }
        Some(opcode) => {
            text.push_str(opcode.name());
            (text, offset + 1)
        }
        None => {
            let _ = write!(text, "Unknown opcode {}", byte);
            (text, offset + 1)
        }
    }
}

fn constant_instruction(bytecode: &Bytecode, offset: usize, text: &mut String) -> usize {
    let Some(&index) = bytecode.code().get(offset + 1) else {
        let _ = write!(text, "{:<16} <truncated>", OpCode::Constant.name());
        return offset + 1;
    };

    let _ = write!(text, "{:<16} {:>4} '", OpCode::Constant.name(), index);
    match bytecode.constants().get(index as usize) {
        Some(value) => {
            let _ = write!(text, "{}'", value);
        }
        None => text.push_str("?'"),
    }
    offset + 2
}
