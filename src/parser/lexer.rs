//! Lexer for the configuration text format.
//!
//! Line breaks and comments are significant and come out as tokens: the
//! parser decides where a comment may appear.

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    /// `=` or `:`
    Assign,
    Newline,
    /// Comment text including its `#` or `//` marker.
    Comment(String),
    /// Quoted string with escapes already processed.
    Quoted(String),
    /// Unquoted run of characters: keys, numbers, literals, bare strings.
    Word(String),
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::Newline => "line break".to_string(),
            TokenKind::Comment(text) => format!("comment \"{}\"", text),
            TokenKind::Quoted(text) => format!("string \"{}\"", text),
            TokenKind::Word(text) => format!("'{}'", text),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Characters that end an unquoted word.
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '{' | '}' | '[' | ']' | ',' | ';' | '=' | ':' | '#' | '"')
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::Eof`].
    pub(crate) fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::with_capacity((self.input.len() / 4).max(8));
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_inline_whitespace();

        let (line, column) = (self.line, self.column);
        let token = |kind| Token { kind, line, column };

        let Some(ch) = self.current_char() else {
            return Ok(token(TokenKind::Eof));
        };

        let kind = match ch {
            '\n' => {
                self.advance();
                TokenKind::Newline
            }
            '{' => {
                self.advance();
                TokenKind::LeftBrace
            }
            '}' => {
                self.advance();
                TokenKind::RightBrace
            }
            '[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            ']' => {
                self.advance();
                TokenKind::RightBracket
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '=' | ':' => {
                self.advance();
                TokenKind::Assign
            }
            '#' => TokenKind::Comment(self.read_comment()),
            '/' if self.peek() == Some('/') => TokenKind::Comment(self.read_comment()),
            '"' if self.rest().starts_with("\"\"\"") => TokenKind::Quoted(self.read_raw_string()?),
            '"' => TokenKind::Quoted(self.read_string()?),
            _ => TokenKind::Word(self.read_word()),
        };

        Ok(token(kind))
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch != '\n' && ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_comment(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
        self.input[start..self.position].trim_end().to_string()
    }

    fn read_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if is_delimiter(ch) || (ch == '/' && self.peek() == Some('/')) {
                break;
            }
            self.advance();
        }
        self.input[start..self.position].to_string()
    }

    /// `"""..."""`: no escapes, may span lines.
    fn read_raw_string(&mut self) -> Result<String, SyntaxError> {
        for _ in 0..3 {
            self.advance();
        }
        let start = self.position;
        while !self.rest().starts_with("\"\"\"") {
            if self.current_char().is_none() {
                return Err(self.error("unterminated multi-line string"));
            }
            self.advance();
        }
        let value = self.input[start..self.position].to_string();
        for _ in 0..3 {
            self.advance();
        }
        Ok(value)
    }

    fn read_string(&mut self) -> Result<String, SyntaxError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            let Some(ch) = self.current_char() else {
                return Err(self.error("unterminated string literal"));
            };
            match ch {
                '"' => {
                    self.advance();
                    return Ok(value);
                }
                '\n' => return Err(self.error("line break inside string literal")),
                '\\' => {
                    self.advance();
                    value.push(self.read_escape()?);
                }
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn read_escape(&mut self) -> Result<char, SyntaxError> {
        let Some(ch) = self.current_char() else {
            return Err(self.error("unterminated string literal"));
        };
        self.advance();
        let escaped = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'u' => return self.read_unicode_escape(),
            other => return Err(self.error(format!("invalid escape sequence '\\{}'", other))),
        };
        Ok(escaped)
    }

    fn read_hex4(&mut self) -> Result<u32, SyntaxError> {
        let digits = self.rest().get(..4).unwrap_or_default();
        if digits.len() != 4 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(self.error("invalid unicode escape"));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error("invalid unicode escape"))?;
        for _ in 0..4 {
            self.advance();
        }
        Ok(code)
    }

    fn read_unicode_escape(&mut self) -> Result<char, SyntaxError> {
        let high = self.read_hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.rest().starts_with("\\u") {
                return Err(self.error("unpaired surrogate in unicode escape"));
            }
            self.advance();
            self.advance();
            let low = self.read_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("unpaired surrogate in unicode escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }
}
