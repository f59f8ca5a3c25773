use bee::{Bytecode, OpCode, Value};
use tracing::debug;

use crate::lexer::TokenKind;
use crate::parser::{rule, CompileResult, ParseFn, Parser, Precedence};

/// Deepest expression nesting the compiler recurses into
pub const MAX_NESTING: usize = 256;

/// Single-pass compiler: parses one expression and emits bytecode as it goes
pub struct Compiler<'src> {
    parser: Parser<'src>,
    bytecode: Bytecode,
    depth: usize,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            parser: Parser::new(source),
            bytecode: Bytecode::new(),
            depth: 0,
        }
    }

    /// Compile the whole source, which must be exactly one expression
    pub fn compile(mut self) -> CompileResult<Bytecode> {
        self.parser.advance();
        self.expression();
        self.parser.consume(TokenKind::Eof, "Expect end of expression.");
        self.parser.drain();
        self.emit_return();

        self.parser.finish()?;
        debug!(
            bytes = self.bytecode.len(),
            constants = self.bytecode.constants().len(),
            "compiled expression"
        );
        Ok(self.bytecode)
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    // Every grouping and unary operand passes through here, so this bounds
    // the native recursion depth
    fn parse_precedence(&mut self, precedence: Precedence) {
        if self.depth >= MAX_NESTING {
            self.parser.error("Expression nested too deeply.");
            return;
        }

        self.depth += 1;
        self.parse_operand(precedence);
        self.depth -= 1;
    }

    fn parse_operand(&mut self, precedence: Precedence) {
        self.parser.advance();
        let Some(prefix) = rule(self.parser.previous().kind).prefix else {
            self.parser.error("Expect expression.");
            return;
        };
        self.apply(prefix);

        while precedence <= rule(self.parser.current().kind).precedence {
            self.parser.advance();
            if let Some(infix) = rule(self.parser.previous().kind).infix {
                self.apply(infix);
            }
        }
    }

    fn apply(&mut self, handler: ParseFn) {
        match handler {
            ParseFn::Grouping => self.grouping(),
            ParseFn::Unary => self.unary(),
            ParseFn::Binary => self.binary(),
            ParseFn::Number => self.number(),
            ParseFn::Literal => self.literal(),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.parser
            .consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn number(&mut self) {
        match self.parser.previous().text().parse::<f64>() {
            Ok(number) => self.emit_constant(Value::Number(number)),
            // unreachable for scanner output, which is always digits[.digits]
            Err(_) => self.parser.error("Invalid number literal."),
        }
    }

    fn literal(&mut self) {
        match self.parser.previous().kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            TokenKind::True => self.emit_op(OpCode::True),
            _ => {}
        }
    }

    fn unary(&mut self) {
        let operator = self.parser.previous().kind;

        // operand first, so the instruction finds it on the stack
        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenKind::Bang => self.emit_op(OpCode::Not),
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            _ => {}
        }
    }

    fn binary(&mut self) {
        let operator = self.parser.previous().kind;
        self.parse_precedence(rule(operator).precedence.next());

        // `a >= b` is `!(a < b)` and `a <= b` is `!(a > b)`; neither holds for NaN
        match operator {
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            _ => {}
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        let line = self.parser.previous().line;
        self.bytecode.write(byte, line);
    }

    fn emit_op(&mut self, opcode: OpCode) {
        self.emit_byte(opcode.to_byte());
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn emit_return(&mut self) {
        self.emit_op(OpCode::Return);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    /// Add `value` to the pool; operands are one byte wide
    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.bytecode.add_constant(value);
        match u8::try_from(index) {
            Ok(index) => index,
            Err(_) => {
                self.parser.error("Too many constants in one chunk.");
                0
            }
        }
    }
}

/// Compile `source` into a unit ready to execute
pub fn compile(source: &str) -> CompileResult<Bytecode> {
    Compiler::new(source).compile()
}
