//! Parser for path expressions.
//!
//! ```text
//! path      := ["/"] segment ("/" segment)*
//! segment   := [ident ":"] (ident | "*") predicate*
//! predicate := "[" ident "=" value "]"       key equality
//!            | "[" "." "=" value "]"         self-value equality
//!            | "[" ident "]"                 key presence
//! ident     := [A-Za-z_][A-Za-z0-9_.-]*
//! value     := literal | "concat(" literal ("," literal)* ")"
//! literal   := "'" [^']* "'" | '"' [^"]* '"'
//! ```
//!
//! Whitespace is accepted inside brackets only.

use crate::error::{PathError, PathErrorCode, PathResult};
use std::fmt;

/// A bracketed filter of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[name='value']`
    Key { name: String, value: String },
    /// `[.='value']`
    SelfValue(String),
    /// `[name]`
    KeyPresent(String),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { name, value } => write!(f, "[{name}={}]", quote(value)),
            Self::SelfValue(value) => write!(f, "[.={}]", quote(value)),
            Self::KeyPresent(name) => write!(f, "[{name}]"),
        }
    }
}

/// One `module:name[predicate]*` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub module: Option<String>,
    pub name: String,
    pub predicates: Vec<Predicate>,
}

impl Segment {
    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{module}:")?;
        }
        f.write_str(&self.name)?;
        for predicate in &self.predicates {
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub absolute: bool,
    pub segments: Vec<Segment>,
    /// The expression as written, for error reporting
    pub text: String,
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 || self.absolute {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Quote a predicate value, preferring single quotes.
///
/// A value holding both quote characters is written as a `concat(...)` of
/// literals split around its single quotes.
pub fn quote(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let mut parts = Vec::new();
    for (i, piece) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !piece.is_empty() {
            parts.push(format!("'{piece}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Parse a path expression.
///
/// Absolute expressions must name the module of their first segment.
/// Relative ones are checked against their context node when resolved.
pub fn parse(text: &str) -> PathResult<PathExpr> {
    Parser::new(text).parse()
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, code: PathErrorCode, detail: impl Into<String>) -> PathError {
        PathError::new(code, self.text, detail)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> PathResult<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(
                PathErrorCode::UnexpectedToken,
                format!("expected '{expected}', found '{c}' at {}", self.pos - 1),
            )),
            None => Err(self.error(
                PathErrorCode::UnexpectedEof,
                format!("expected '{expected}'"),
            )),
        }
    }

    fn parse(mut self) -> PathResult<PathExpr> {
        let absolute = self.peek() == Some('/');
        if absolute {
            self.pos += 1;
        }

        let mut segments = Vec::new();
        loop {
            segments.push(self.segment()?);
            match self.bump() {
                None => break,
                Some('/') => {}
                Some(c) => {
                    return Err(self.error(
                        PathErrorCode::UnexpectedToken,
                        format!("unexpected '{c}' at {}", self.pos - 1),
                    ));
                }
            }
        }

        if absolute && segments[0].module.is_none() {
            return Err(self.error(
                PathErrorCode::MissingModule,
                format!("first segment '{}' has no module prefix", segments[0].name),
            ));
        }

        Ok(PathExpr {
            absolute,
            segments,
            text: self.text.to_string(),
        })
    }

    fn segment(&mut self) -> PathResult<Segment> {
        let first = self.name_or_wildcard()?;
        let (module, name) = if self.peek() == Some(':') {
            self.pos += 1;
            if first == "*" {
                return Err(self.error(
                    PathErrorCode::InvalidCharacter,
                    "a module name cannot be a wildcard",
                ));
            }
            (Some(first), self.name_or_wildcard()?)
        } else {
            (None, first)
        };

        let mut predicates = Vec::new();
        while self.peek() == Some('[') {
            self.pos += 1;
            predicates.push(self.predicate()?);
        }
        Ok(Segment {
            module,
            name,
            predicates,
        })
    }

    fn name_or_wildcard(&mut self) -> PathResult<String> {
        if self.peek() == Some('*') {
            self.pos += 1;
            return Ok("*".to_string());
        }
        self.identifier()
    }

    fn identifier(&mut self) -> PathResult<String> {
        let start = self.pos;
        match self.peek() {
            None => return Err(self.error(PathErrorCode::UnexpectedEof, "expected a name")),
            Some('/') => {
                return Err(self.error(
                    PathErrorCode::UnexpectedToken,
                    format!("empty segment at {start}"),
                ));
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.pos += 1,
            Some(c) => {
                return Err(self.error(
                    PathErrorCode::InvalidCharacter,
                    format!("'{c}' cannot start a name at {start}"),
                ));
            }
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn predicate(&mut self) -> PathResult<Predicate> {
        self.skip_ws();
        let predicate = if self.peek() == Some('.') {
            self.pos += 1;
            self.skip_ws();
            if self.peek() == Some(']') {
                return Err(self.error(
                    PathErrorCode::InvalidOperand,
                    "'.' predicate needs a value",
                ));
            }
            self.expect('=')?;
            self.skip_ws();
            Predicate::SelfValue(self.value()?)
        } else {
            let name = self.identifier()?;
            self.skip_ws();
            if self.peek() == Some(']') {
                Predicate::KeyPresent(name)
            } else {
                self.expect('=')?;
                self.skip_ws();
                let value = self.value()?;
                Predicate::Key { name, value }
            }
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(predicate)
    }

    fn value(&mut self) -> PathResult<String> {
        if self.peek() != Some('c') {
            return self.literal();
        }
        let function = self.identifier()?;
        if function != "concat" {
            return Err(self.error(
                PathErrorCode::InvalidOperand,
                format!("expected a quoted value or concat(...), found '{function}'"),
            ));
        }
        self.skip_ws();
        self.expect('(')?;
        let mut value = String::new();
        loop {
            self.skip_ws();
            value.push_str(&self.literal()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(')') => return Ok(value),
                Some(c) => {
                    return Err(self.error(
                        PathErrorCode::UnexpectedToken,
                        format!("expected ',' or ')', found '{c}' at {}", self.pos - 1),
                    ));
                }
                None => {
                    return Err(self.error(PathErrorCode::UnexpectedEof, "unterminated concat(...)"));
                }
            }
        }
    }

    fn literal(&mut self) -> PathResult<String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => {
                return Err(self.error(
                    PathErrorCode::InvalidOperand,
                    format!("expected a quoted value, found '{c}'"),
                ));
            }
            None => return Err(self.error(PathErrorCode::UnexpectedEof, "expected a value")),
        };
        self.pos += 1;
        let start = self.pos;
        while let Some(c) = self.bump() {
            if c == quote {
                return Ok(self.chars[start..self.pos - 1].iter().collect());
            }
        }
        Err(self.error(PathErrorCode::UnexpectedEof, "unterminated quoted value"))
    }
}
