mod error;

pub use error::{CompileError, CompileFailure, CompileResult, ErrorLocation};

use tracing::debug;

use crate::lexer::{Scanner, Token, TokenKind};

/// Binding power of an operator, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // . ()
    Primary,
}

impl Precedence {
    /// The next tighter level; `Primary` is its own successor
    pub fn next(self) -> Self {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// Handler invoked when a token starts or continues an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFn {
    Grouping,
    Unary,
    Binary,
    Number,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub precedence: Precedence,
}

impl ParseRule {
    const fn new(prefix: Option<ParseFn>, infix: Option<ParseFn>, precedence: Precedence) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

/// Look up how `kind` behaves in prefix and infix position
pub fn rule(kind: TokenKind) -> ParseRule {
    use ParseFn::*;

    match kind {
        TokenKind::LeftParen => ParseRule::new(Some(Grouping), None, Precedence::None),
        TokenKind::Minus => ParseRule::new(Some(Unary), Some(Binary), Precedence::Term),
        TokenKind::Plus => ParseRule::new(None, Some(Binary), Precedence::Term),
        TokenKind::Slash | TokenKind::Star => {
            ParseRule::new(None, Some(Binary), Precedence::Factor)
        }
        TokenKind::Bang => ParseRule::new(Some(Unary), None, Precedence::None),
        TokenKind::BangEqual | TokenKind::EqualEqual => {
            ParseRule::new(None, Some(Binary), Precedence::Equality)
        }
        TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => ParseRule::new(None, Some(Binary), Precedence::Comparison),
        TokenKind::Number => ParseRule::new(Some(Number), None, Precedence::None),
        TokenKind::False | TokenKind::True | TokenKind::Nil => {
            ParseRule::new(Some(Literal), None, Precedence::None)
        }
        _ => ParseRule::new(None, None, Precedence::None),
    }
}

/// Token cursor and error state shared by the code generator
///
/// Holds a one-token lookahead (`current`) and the token just consumed
/// (`previous`). Error tokens from the scanner are reported and skipped here,
/// so the code generator never sees them.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    previous: Token<'src>,
    current: Token<'src>,
    had_error: bool,
    panic_mode: bool,
    errors: Vec<CompileError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let start = Token::new(TokenKind::Eof, "", 1);
        Self {
            scanner: Scanner::new(source),
            previous: start,
            current: start,
            had_error: false,
            panic_mode: false,
            errors: Vec::new(),
        }
    }

    pub fn previous(&self) -> Token<'src> {
        self.previous
    }

    pub fn current(&self) -> Token<'src> {
        self.current
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn panic_mode(&self) -> bool {
        self.panic_mode
    }

    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    /// Step to the next non-error token, reporting any error tokens on the way
    pub fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.text();
            self.error_at_current(message);
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advance past a token of `kind`, or report `message` at the current token
    pub fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    /// Skip every remaining token up to end of input
    pub fn drain(&mut self) {
        while !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    /// Report an error at the token just consumed
    pub fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    pub fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let location = match token.kind {
            TokenKind::Eof => ErrorLocation::End,
            TokenKind::Error => ErrorLocation::Lexical,
            _ => ErrorLocation::Lexeme(token.text().to_string()),
        };
        let error = CompileError {
            line: token.line,
            location,
            message: message.to_string(),
        };
        debug!(%error, "compile error");
        self.errors.push(error);
    }

    /// Hand back the collected diagnostics if any error was reported
    pub fn finish(self) -> CompileResult<()> {
        if self.had_error {
            Err(CompileFailure::new(self.errors))
        } else {
            Ok(())
        }
    }
}
