//! JSONC tokenizer
//!
//! Produces tokens with exact start/end points. Whitespace and comments
//! (`//` line comments and `/* */` block comments) are skipped, but they still
//! advance the line/column counters so positions always match the original text.

use super::ast::Point;
use crate::{ProxyLintError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    /// String with escapes decoded
    String(String),
    Number(f64),
    True,
    False,
    Null,
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::True | TokenKind::False => "boolean",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Point,
    pub end: Point,
}

/// Streaming tokenizer over a source string
pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        // A leading byte order mark is skipped but still occupies one UTF-16
        // column, matching how editors and `LineIndex` count it
        let bom = src.starts_with('\u{feff}');
        Self {
            src,
            offset: if bom { '\u{feff}'.len_utf8() } else { 0 },
            line: 1,
            column: if bom { 2 } else { 1 },
        }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    fn point(&self) -> Point {
        Point::new(self.line, self.column, self.offset)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.offset..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        match ch {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                // "\r\n" counts as a single line break
                if self.peek() != Some('\n') {
                    self.line += 1;
                    self.column = 1;
                }
            }
            _ => self.column += ch.len_utf16() as u32,
        }
        Some(ch)
    }

    fn error_here(&self, message: impl Into<String>) -> ProxyLintError {
        ProxyLintError::parse_error(message, self.line, self.column)
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(ProxyLintError::parse_error(
                                    "Unterminated block comment",
                                    line,
                                    column,
                                ));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Read the next significant token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let start = self.point();

        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            });
        };

        let kind = match ch {
            '{' | '}' | '[' | ']' | ':' | ',' => {
                self.bump();
                match ch {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ':' => TokenKind::Colon,
                    _ => TokenKind::Comma,
                }
            }
            '"' => TokenKind::String(self.lex_string()?),
            '-' | '0'..='9' => TokenKind::Number(self.lex_number()?),
            c if c.is_ascii_alphabetic() => self.lex_keyword()?,
            other => return Err(self.error_here(format!("Unexpected character '{other}'"))),
        };

        Ok(Token {
            kind,
            start,
            end: self.point(),
        })
    }

    fn lex_string(&mut self) -> Result<String> {
        let (line, column) = (self.line, self.column);
        self.bump();
        let mut value = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| self.error_here("Unterminated escape sequence"))?;
                    match escaped {
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        '/' => value.push('/'),
                        'b' => value.push('\u{0008}'),
                        'f' => value.push('\u{000c}'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'u' => value.push(self.lex_unicode_escape()?),
                        other => {
                            return Err(self.error_here(format!("Invalid escape '\\{other}'")));
                        }
                    }
                }
                Some('\n') | Some('\r') | None => {
                    return Err(ProxyLintError::parse_error(
                        "Unterminated string",
                        line,
                        column,
                    ));
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_here("Invalid unicode escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn lex_unicode_escape(&mut self) -> Result<char> {
        let high = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&high) {
            // Surrogate pair: expect a second \uXXXX
            if self.peek() == Some('\\') && self.peek_second() == Some('u') {
                self.bump();
                self.bump();
                let low = self.read_hex4()?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code)
                        .ok_or_else(|| self.error_here("Invalid unicode escape"));
                }
            }
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn lex_number(&mut self) -> Result<f64> {
        let start = self.offset;
        let (line, column) = (self.line, self.column);

        if self.peek() == Some('-') {
            self.bump();
        }
        match self.peek() {
            Some('0') => {
                self.bump();
            }
            Some('1'..='9') => self.eat_digits(),
            _ => return Err(ProxyLintError::parse_error("Invalid number", line, column)),
        }
        if self.peek() == Some('.') {
            self.bump();
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(self.error_here("Expected digit after '.'"));
            }
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some('0'..='9')) {
                return Err(self.error_here("Expected digit in exponent"));
            }
            self.eat_digits();
        }

        self.src[start..self.offset]
            .parse::<f64>()
            .map_err(|e| ProxyLintError::parse_error(format!("Invalid number: {e}"), line, column))
    }

    fn eat_digits(&mut self) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
        }
    }

    fn lex_keyword(&mut self) -> Result<TokenKind> {
        let start = self.offset;
        let (line, column) = (self.line, self.column);
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.offset] {
            "true" => Ok(TokenKind::True),
            "false" => Ok(TokenKind::False),
            "null" => Ok(TokenKind::Null),
            word => Err(ProxyLintError::parse_error(
                format!("Unexpected identifier '{word}'"),
                line,
                column,
            )),
        }
    }
}
