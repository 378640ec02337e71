// ABOUTME: Lexer converting source text into a token stream

use crate::error::LexError;
use crate::token::{keyword_kind, Literal, Token, TokenKind};

pub struct Scanner<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scans the whole source, returning the token stream (always ending
    /// in `Eof`) and any lexical errors encountered along the way. A
    /// lexical error never stops scanning (spec.md §4.1).
    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<LexError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", Literal::None, self.line));
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            b'(' => self.add_token(TokenKind::LeftParen),
            b')' => self.add_token(TokenKind::RightParen),
            b'{' => self.add_token(TokenKind::LeftBrace),
            b'}' => self.add_token(TokenKind::RightBrace),
            b',' => self.add_token(TokenKind::Comma),
            b'.' => self.add_token(TokenKind::Dot),
            b'-' => self.add_token(TokenKind::Minus),
            b'+' => self.add_token(TokenKind::Plus),
            b';' => self.add_token(TokenKind::Semicolon),
            b'*' => self.add_token(TokenKind::Star),
            b'!' => {
                let kind = if self.match_next(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            b'=' => {
                let kind = if self.match_next(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            b'<' => {
                let kind = if self.match_next(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            b'>' => {
                let kind = if self.match_next(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            b'/' => {
                if self.match_next(b'/') {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            b' ' | b'\r' | b'\t' => {}
            b'\n' => self.line += 1,
            b'"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),
            c => self
                .errors
                .push(LexError::new(self.line, format!("Unexpected character: {}", c as char))),
        }
    }

    fn scan_string(&mut self) {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.errors
                .push(LexError::new(self.line, "Unterminated string."));
            return;
        }

        // consume the closing quote
        self.advance();

        let contents = &self.source[self.start + 1..self.current - 1];
        let value = String::from_utf8_lossy(contents).into_owned();
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(
            TokenKind::String,
            lexeme,
            Literal::Str(value),
            self.line,
        ));
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let lexeme = self.lexeme();
        let value: f64 = lexeme.parse().expect("scanned number lexeme must parse");
        self.tokens.push(Token::new(
            TokenKind::Number,
            lexeme,
            Literal::Number(value),
            self.line,
        ));
    }

    fn scan_identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let lexeme = self.lexeme();
        let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens
            .push(Token::new(kind, lexeme, Literal::None, self.line));
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.tokens
            .push(Token::new(kind, lexeme, Literal::None, self.line));
    }

    fn lexeme(&self) -> String {
        String::from_utf8_lossy(&self.source[self.start..self.current]).into_owned()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_next(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            b'\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            b'\0'
        } else {
            self.source[self.current + 1]
        }
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_alpha_numeric(c: u8) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}
