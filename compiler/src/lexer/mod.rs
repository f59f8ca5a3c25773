use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,     // (
    RightParen,    // )
    LeftBrace,     // {
    RightBrace,    // }
    Comma,         // ,
    Dot,           // .
    Minus,         // -
    Plus,          // +
    Semicolon,     // ;
    Slash,         // /
    Star,          // *

    // One or two character tokens
    Bang,          // !
    BangEqual,     // !=
    Equal,         // =
    EqualEqual,    // ==
    Greater,       // >
    GreaterEqual,  // >=
    Less,          // <
    LessEqual,     // <=

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Error,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:?}", self))
    }
}

/// The text a token stands for
///
/// Normal tokens borrow their lexeme from the source buffer. Error tokens carry
/// a static diagnostic instead, so the two cases never share a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Lexeme<'src> {
    Source(&'src str),
    Diagnostic(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: Lexeme<'src>,
    pub line: u32,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, line: u32) -> Self {
        Self {
            kind,
            lexeme: Lexeme::Source(lexeme),
            line,
        }
    }

    pub fn error(message: &'static str, line: u32) -> Self {
        Self {
            kind: TokenKind::Error,
            lexeme: Lexeme::Diagnostic(message),
            line,
        }
    }

    /// The lexeme, or the diagnostic message for error tokens
    pub fn text(&self) -> &'src str {
        match self.lexeme {
            Lexeme::Source(text) => text,
            Lexeme::Diagnostic(message) => message,
        }
    }
}

/// Turns source text into tokens on demand
///
/// Tokens borrow from the source, which therefore outlives them. `reset`
/// starts a fresh scan over new text without any carried-over state.
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: u32,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    /// Restart scanning at the beginning of `source`
    pub fn reset(&mut self, source: &'src str) {
        *self = Scanner::new(source);
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Produce the next token; once the input is exhausted this keeps
    /// returning `Eof`
    pub fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();

        if is_alpha(c) {
            return self.identifier();
        }
        if c.is_ascii_digit() {
            return self.number();
        }

        match c {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b';' => self.make_token(TokenKind::Semicolon),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),
            b'!' => self.one_or_two(TokenKind::BangEqual, TokenKind::Bang),
            b'=' => self.one_or_two(TokenKind::EqualEqual, TokenKind::Equal),
            b'<' => self.one_or_two(TokenKind::LessEqual, TokenKind::Less),
            b'>' => self.one_or_two(TokenKind::GreaterEqual, TokenKind::Greater),
            b'"' => self.string(),
            _ => {
                self.skip_rest_of_char();
                Token::error("Unexpected character.", self.line)
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source.as_bytes()[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source.as_bytes().get(self.current + 1).copied().unwrap_or(b'\0')
    }

    fn matches(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn one_or_two(&mut self, with_equal: TokenKind, alone: TokenKind) -> Token<'src> {
        let kind = if self.matches(b'=') { with_equal } else { alone };
        self.make_token(kind)
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, &self.source[self.start..self.current], self.line)
    }

    // Keep `current` on a char boundary after consuming a non-ASCII lead byte
    fn skip_rest_of_char(&mut self) {
        while !self.source.is_char_boundary(self.current) {
            self.current += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Token<'src> {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Token::error("Unterminated string.", self.line);
        }

        // closing quote
        self.advance();
        self.make_token(TokenKind::String)
    }

    fn number(&mut self) -> Token<'src> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'src> {
        while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
            self.advance();
        }
        self.make_token(self.identifier_kind())
    }

    /// Keyword recognition as a trie over the first one or two characters
    fn identifier_kind(&self) -> TokenKind {
        let lexeme = &self.source.as_bytes()[self.start..self.current];
        match lexeme[0] {
            b'a' => check_keyword(lexeme, 1, "nd", TokenKind::And),
            b'c' => check_keyword(lexeme, 1, "lass", TokenKind::Class),
            b'e' => check_keyword(lexeme, 1, "lse", TokenKind::Else),
            b'f' if lexeme.len() > 1 => match lexeme[1] {
                b'a' => check_keyword(lexeme, 2, "lse", TokenKind::False),
                b'o' => check_keyword(lexeme, 2, "r", TokenKind::For),
                b'u' => check_keyword(lexeme, 2, "n", TokenKind::Fun),
                _ => TokenKind::Identifier,
            },
            b'i' => check_keyword(lexeme, 1, "f", TokenKind::If),
            b'n' => check_keyword(lexeme, 1, "il", TokenKind::Nil),
            b'o' => check_keyword(lexeme, 1, "r", TokenKind::Or),
            b'p' => check_keyword(lexeme, 1, "rint", TokenKind::Print),
            b'r' => check_keyword(lexeme, 1, "eturn", TokenKind::Return),
            b's' => check_keyword(lexeme, 1, "uper", TokenKind::Super),
            b't' if lexeme.len() > 1 => match lexeme[1] {
                b'h' => check_keyword(lexeme, 2, "is", TokenKind::This),
                b'r' => check_keyword(lexeme, 2, "ue", TokenKind::True),
                _ => TokenKind::Identifier,
            },
            b'v' => check_keyword(lexeme, 1, "ar", TokenKind::Var),
            b'w' => check_keyword(lexeme, 1, "hile", TokenKind::While),
            _ => TokenKind::Identifier,
        }
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    /// Yields every token up to and including `Eof`
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

/// The lexeme is the keyword when it is exactly `start + rest` long and the
/// tail matches
fn check_keyword(lexeme: &[u8], start: usize, rest: &str, kind: TokenKind) -> TokenKind {
    if lexeme.len() == start + rest.len() && &lexeme[start..] == rest.as_bytes() {
        kind
    } else {
        TokenKind::Identifier
    }
}
