//! Lexer and parser for the nested-record manifest text
//!
//! The format is the legacy OpenStep property list dialect Xcode writes:
//! braces delimit dictionaries of `key = value;` pairs, parentheses delimit
//! comma-separated arrays, and strings are either bare atoms or double
//! quoted with backslash escapes. Block and line comments are annotation
//! only and are discarded here, the encoder regenerates them from the
//! object graph.

use std::fmt;

use thiserror::Error;

/// Line and column of a byte in the input, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlistError {
    #[error("unexpected end of input at {at}")]
    UnexpectedEof { at: Position },

    #[error("unexpected {found} at {at}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        at: Position,
    },

    #[error("unterminated string starting at {at}")]
    UnterminatedString { at: Position },

    #[error("unterminated comment starting at {at}")]
    UnterminatedComment { at: Position },

    #[error("invalid escape sequence \\{escape} at {at}")]
    InvalidEscape { escape: char, at: Position },

    #[error("binary data literals are not supported, at {at}")]
    DataUnsupported { at: Position },

    #[error("trailing content after the root value at {at}")]
    TrailingContent { at: Position },
}

/// Parsed value tree
///
/// Dictionaries keep their textual key order so diagnostics can point at
/// the input, lookups go through [`PlistValue::get`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    String(String),
    Array(Vec<PlistValue>),
    Dict(Vec<(String, PlistValue)>),
}

impl PlistValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            PlistValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, PlistValue)]> {
        match self {
            PlistValue::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// First value stored under `key` in a dictionary
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            PlistValue::Dict(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl fmt::Display for PlistValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlistValue::String(_) => write!(f, "string"),
            PlistValue::Array(_) => write!(f, "array"),
            PlistValue::Dict(_) => write!(f, "dictionary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Equals,
    Semicolon,
    Comma,
    String(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::String(value) => format!("string \"{value}\""),
        }
    }
}

/// Characters a string may contain and still be written as a bare atom
fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '/')
}

/// Whether `value` must be double quoted when emitted
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty() || !value.chars().all(is_bare_char)
}

/// Emit `value` as a bare atom when possible, otherwise double quoted
pub fn quote(value: &str) -> String {
    if !needs_quoting(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    /// Skip whitespace and both comment forms
    fn skip_trivia(&mut self) -> Result<(), PlistError> {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') => match self.input.get(self.pos + 1) {
                    Some(b'/') => {
                        while let Some(b) = self.peek_byte() {
                            if b == b'\n' {
                                break;
                            }
                            self.bump();
                        }
                    }
                    Some(b'*') => {
                        let start = self.position();
                        self.bump();
                        self.bump();
                        loop {
                            match self.bump() {
                                Some(b'*') if self.peek_byte() == Some(b'/') => {
                                    self.bump();
                                    break;
                                }
                                Some(_) => {}
                                None => {
                                    return Err(PlistError::UnterminatedComment { at: start });
                                }
                            }
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<(Token, Position)>, PlistError> {
        self.skip_trivia()?;
        let at = self.position();
        let byte = match self.peek_byte() {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let token = match byte {
            b'{' => {
                self.bump();
                Token::LBrace
            }
            b'}' => {
                self.bump();
                Token::RBrace
            }
            b'(' => {
                self.bump();
                Token::LParen
            }
            b')' => {
                self.bump();
                Token::RParen
            }
            b'=' => {
                self.bump();
                Token::Equals
            }
            b';' => {
                self.bump();
                Token::Semicolon
            }
            b',' => {
                self.bump();
                Token::Comma
            }
            b'<' => return Err(PlistError::DataUnsupported { at }),
            b'"' => Token::String(self.lex_quoted()?),
            _ => Token::String(self.lex_bare()),
        };
        Ok(Some((token, at)))
    }

    fn lex_quoted(&mut self) -> Result<String, PlistError> {
        let start = self.position();
        self.bump();
        let mut bytes = Vec::new();
        loop {
            let byte = self
                .bump()
                .ok_or(PlistError::UnterminatedString { at: start })?;
            match byte {
                b'"' => return Ok(String::from_utf8_lossy(&bytes).into_owned()),
                b'\\' => {
                    let escape_at = self.position();
                    let escaped = self
                        .bump()
                        .ok_or(PlistError::UnterminatedString { at: start })?;
                    match escaped {
                        b'"' => bytes.push(b'"'),
                        b'\\' => bytes.push(b'\\'),
                        b'n' => bytes.push(b'\n'),
                        b't' => bytes.push(b'\t'),
                        b'r' => bytes.push(b'\r'),
                        other => {
                            return Err(PlistError::InvalidEscape {
                                escape: other as char,
                                at: escape_at,
                            });
                        }
                    }
                }
                other => bytes.push(other),
            }
        }
    }

    fn lex_bare(&mut self) -> String {
        let start = self.pos;
        while let Some(byte) = self.peek_byte() {
            let c = byte as char;
            if byte.is_ascii_whitespace()
                || matches!(byte, b'{' | b'}' | b'(' | b')' | b'=' | b';' | b',' | b'"')
            {
                break;
            }
            // A comment opener ends the atom
            if c == '/' && matches!(self.input.get(self.pos + 1), Some(b'/') | Some(b'*')) {
                break;
            }
            self.bump();
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<(Token, Position)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            lookahead: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&(Token, Position)>, PlistError> {
        if self.lookahead.is_none() {
            self.lookahead = self.lexer.next_token()?;
        }
        Ok(self.lookahead.as_ref())
    }

    fn advance(&mut self) -> Result<(Token, Position), PlistError> {
        if let Some(token) = self.lookahead.take() {
            return Ok(token);
        }
        self.lexer.next_token()?.ok_or(PlistError::UnexpectedEof {
            at: self.lexer.position(),
        })
    }

    fn peek_is(&mut self, expected: &Token) -> Result<bool, PlistError> {
        Ok(matches!(self.peek()?, Some((token, _)) if token == expected))
    }

    fn expect(&mut self, expected: Token, label: &'static str) -> Result<(), PlistError> {
        let (token, at) = self.advance()?;
        if token == expected {
            Ok(())
        } else {
            Err(PlistError::UnexpectedToken {
                found: token.describe(),
                expected: label,
                at,
            })
        }
    }

    fn parse_value(&mut self) -> Result<PlistValue, PlistError> {
        let (token, at) = self.advance()?;
        match token {
            Token::String(value) => Ok(PlistValue::String(value)),
            Token::LBrace => self.parse_dict(),
            Token::LParen => self.parse_array(),
            other => Err(PlistError::UnexpectedToken {
                found: other.describe(),
                expected: "a value",
                at,
            }),
        }
    }

    fn parse_dict(&mut self) -> Result<PlistValue, PlistError> {
        let mut entries = Vec::new();
        loop {
            if self.peek_is(&Token::RBrace)? {
                self.advance()?;
                return Ok(PlistValue::Dict(entries));
            }
            let (token, at) = self.advance()?;
            let key = match token {
                Token::String(key) => key,
                other => {
                    return Err(PlistError::UnexpectedToken {
                        found: other.describe(),
                        expected: "a dictionary key",
                        at,
                    });
                }
            };
            self.expect(Token::Equals, "'='")?;
            let value = self.parse_value()?;
            self.expect(Token::Semicolon, "';'")?;
            entries.push((key, value));
        }
    }

    fn parse_array(&mut self) -> Result<PlistValue, PlistError> {
        let mut items = Vec::new();
        loop {
            if self.peek_is(&Token::RParen)? {
                self.advance()?;
                return Ok(PlistValue::Array(items));
            }
            items.push(self.parse_value()?);
            if self.peek_is(&Token::Comma)? {
                self.advance()?;
            } else if !self.peek_is(&Token::RParen)? {
                let (token, at) = self.advance()?;
                return Err(PlistError::UnexpectedToken {
                    found: token.describe(),
                    expected: "',' or ')'",
                    at,
                });
            }
        }
    }
}

/// Parse one complete value, requiring nothing but trivia after it
pub fn parse(input: &str) -> Result<PlistValue, PlistError> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    match parser.peek()? {
        None => Ok(value),
        Some((_, at)) => Err(PlistError::TrailingContent { at: *at }),
    }
}

#[cfg(test)]
mod tests {
    include!("plist.test.rs");
}
