//! Recursive descent parser for the HOCON-like configuration format.
//!
//! ```text
//! # comment            // comment
//! global = "value";    key: 1        key true
//! server { port = 8080, hosts = ["a", "b"] }
//! a.b.c = 1            # dotted keys nest
//! ```
//!
//! Statements end at a line break, `;`, `,` or a closing `}`. A comment may
//! start wherever a statement or list element may start, and after any
//! punctuation; a comment directly after a scalar value on the same line is
//! rejected.

mod lexer;

use crate::error::{ConfigError, Result};
use crate::node::{Node, Section, SectionRef};
use lexer::{Lexer, Token, TokenKind};

/// Position-tagged syntax failure, turned into [`ConfigError::Parse`] once
/// the source name is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    fn into_config_error(self, origin: &str) -> ConfigError {
        ConfigError::Parse {
            origin: origin.to_string(),
            line: self.line,
            column: self.column,
            message: self.message,
        }
    }
}

/// Parse `input` into a root section. `origin` names the source in errors.
pub fn parse(input: &str, origin: &str) -> Result<Section> {
    let tokens = Lexer::new(input)
        .tokenize()
        .map_err(|err| err.into_config_error(origin))?;
    Parser::new(tokens)
        .parse_document()
        .map_err(|err| err.into_config_error(origin))
}

/// Where a statement body stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Brace,
    Eof,
}

/// Maximum nesting of sections and lists, dotted key segments included.
const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

type ParseResult<T> = std::result::Result<T, SyntaxError>;

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn enter(&mut self, levels: usize) -> ParseResult<()> {
        self.depth += levels;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting too deep (limit {})", MAX_DEPTH)));
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn current(&self) -> &Token {
        // tokenize() always ends with Eof, and Eof is never consumed
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let token = self.current();
        SyntaxError {
            line: token.line,
            column: token.column,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        self.error(format!(
            "unexpected {}, expected {}",
            self.kind().describe(),
            expected
        ))
    }

    fn skip_blank(&mut self) {
        while matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Comma | TokenKind::Comment(_)
        ) {
            self.advance();
        }
    }

    fn parse_document(&mut self) -> ParseResult<Section> {
        self.skip_blank();
        if *self.kind() == TokenKind::LeftBrace {
            self.advance();
            let root = self.parse_body(Closing::Brace)?;
            self.advance(); // '}'
            self.skip_blank();
            if *self.kind() != TokenKind::Eof {
                return Err(self.unexpected("end of input after root object"));
            }
            return Ok(root);
        }
        self.parse_body(Closing::Eof)
    }

    /// Statements up to (not including) the closing token.
    fn parse_body(&mut self, closing: Closing) -> ParseResult<Section> {
        let mut section = Section::new();
        loop {
            self.skip_blank();
            match (self.kind(), closing) {
                (TokenKind::RightBrace, Closing::Brace) | (TokenKind::Eof, Closing::Eof) => {
                    return Ok(section);
                }
                (TokenKind::Eof, Closing::Brace) => {
                    return Err(self.error("unexpected end of input, expected '}'"));
                }
                (TokenKind::Word(_) | TokenKind::Quoted(_), _) => {
                    self.parse_statement(&mut section)?;
                }
                _ => return Err(self.unexpected("a key")),
            }
        }
    }

    fn parse_statement(&mut self, section: &mut Section) -> ParseResult<()> {
        let key = self.parse_key()?;
        let nested = key.len() - 1;
        self.enter(nested)?;
        let (value, scalar) = match self.kind() {
            TokenKind::Assign => {
                self.advance();
                self.parse_value()?
            }
            TokenKind::LeftBrace => self.parse_value()?,
            TokenKind::Word(_) | TokenKind::Quoted(_) | TokenKind::LeftBracket => {
                self.parse_value()?
            }
            _ => {
                return Err(self.unexpected(&format!(
                    "'=', ':' or '{{' after key '{}'",
                    key.join(".")
                )));
            }
        };
        self.leave(nested);
        self.expect_terminator(scalar)?;
        insert_path(section, &key, value);
        Ok(())
    }

    /// After a value: a line break, `;`, `,`, `}` or end of input must follow.
    fn expect_terminator(&self, after_scalar: bool) -> ParseResult<()> {
        match self.kind() {
            TokenKind::Newline
            | TokenKind::Semicolon
            | TokenKind::Comma
            | TokenKind::RightBrace
            | TokenKind::Eof => Ok(()),
            TokenKind::Comment(text) if after_scalar => Err(self.error(format!(
                "missing ';' or line break before comment \"{}\"",
                text
            ))),
            TokenKind::Comment(_) => Ok(()),
            _ => Err(self.unexpected("';' or line break after value")),
        }
    }

    fn parse_key(&mut self) -> ParseResult<Vec<String>> {
        let key = match self.kind() {
            TokenKind::Quoted(text) if text.is_empty() => return Err(self.error("empty key")),
            TokenKind::Quoted(text) => vec![text.clone()],
            TokenKind::Word(word) => {
                let segments: Vec<String> = word.split('.').map(str::to_string).collect();
                if segments.iter().any(String::is_empty) {
                    return Err(self.error(format!("invalid key '{}'", word)));
                }
                segments
            }
            _ => return Err(self.unexpected("a key")),
        };
        self.advance();
        Ok(key)
    }

    /// A value and whether it was a scalar literal.
    fn parse_value(&mut self) -> ParseResult<(Node, bool)> {
        let value = match self.kind() {
            TokenKind::Quoted(text) => (Node::String(text.clone()), true),
            TokenKind::Word(word) => match literal(word) {
                Node::Float(f) if !f.is_finite() => {
                    return Err(self.error(format!("number out of range: {}", word)));
                }
                node => (node, true),
            },
            TokenKind::LeftBracket => return Ok((self.parse_list()?, false)),
            TokenKind::LeftBrace => {
                self.enter(1)?;
                self.advance();
                let body = self.parse_body(Closing::Brace)?;
                self.advance(); // '}'
                self.leave(1);
                return Ok((Node::from(body), false));
            }
            _ => return Err(self.unexpected("a value")),
        };
        self.advance();
        Ok(value)
    }

    fn parse_list(&mut self) -> ParseResult<Node> {
        self.enter(1)?;
        self.advance(); // '['
        let mut items = Vec::new();
        loop {
            while matches!(self.kind(), TokenKind::Newline | TokenKind::Comment(_)) {
                self.advance();
            }
            match self.kind() {
                TokenKind::RightBracket => {
                    self.advance();
                    self.leave(1);
                    return Ok(Node::List(items));
                }
                TokenKind::Eof => return Err(self.error("unterminated list, expected ']'")),
                _ => {}
            }

            let (item, scalar) = self.parse_value()?;
            items.push(item);

            if let TokenKind::Comment(text) = self.kind()
                && scalar
            {
                return Err(self.error(format!(
                    "missing ',' or line break before comment \"{}\"",
                    text
                )));
            }

            let mut separated = false;
            while matches!(self.kind(), TokenKind::Newline | TokenKind::Comment(_)) {
                separated |= *self.kind() == TokenKind::Newline;
                self.advance();
            }
            match self.kind() {
                TokenKind::Comma => self.advance(),
                TokenKind::RightBracket => {}
                TokenKind::Eof => return Err(self.error("unterminated list, expected ']'")),
                _ if separated => {}
                _ => return Err(self.unexpected("',' or ']' in list")),
            }
        }
    }
}

/// Interpret an unquoted word: boolean and null literals (any case),
/// integers, floats, or else a bare string.
fn literal(word: &str) -> Node {
    match word.to_ascii_lowercase().as_str() {
        "true" => return Node::Bool(true),
        "false" => return Node::Bool(false),
        "null" => return Node::Null,
        _ => {}
    }
    if looks_numeric(word) {
        if let Ok(i) = word.parse::<i64>() {
            return Node::Int(i);
        }
        if let Ok(f) = word.parse::<f64>() {
            return Node::Float(f);
        }
    }
    Node::String(word.to_string())
}

/// Excludes words like `inf` or `nan` that `f64::from_str` would accept.
fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix(['-', '+']).unwrap_or(word);
    let mut chars = unsigned.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|ch| ch.is_ascii_digit()),
        _ => false,
    }
}

/// Insert `value` at the dotted `key` below `section`.
///
/// Missing or non-section intermediates become sections. A section landing
/// on an existing section is overlaid key by key; anything else replaces the
/// existing value in place.
fn insert_path(section: &mut Section, key: &[String], value: Node) {
    let Some((first, rest)) = key.split_first() else {
        return;
    };
    if rest.is_empty() {
        overlay(section, first.clone(), value);
        return;
    }
    let existing = section.get(first).and_then(Node::as_section).cloned();
    let child = match existing {
        Some(child) => child,
        None => {
            let child = SectionRef::default();
            section.insert(first.clone(), Node::Section(child.clone()));
            child
        }
    };
    insert_path(&mut child.write(), rest, value);
}

fn overlay(section: &mut Section, key: String, value: Node) {
    if let (Some(Node::Section(existing)), Node::Section(incoming)) = (section.get(&key), &value) {
        let existing = existing.clone();
        let incoming = std::mem::take(&mut *incoming.write());
        let mut target = existing.write();
        for (child_key, child) in incoming {
            overlay(&mut target, child_key, child);
        }
        return;
    }
    section.insert(key, value);
}
