//! Length- and pattern-restricted textual types: `string` and `binary`.

use super::Diagnostics;
use super::numeric::{LengthRangeIntervals, Range};
use crate::error::ValidationError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

fn default_length() -> LengthRangeIntervals<u64> {
    LengthRangeIntervals::new(Range::new(0, u64::MAX))
}

/// A compiled `pattern` restriction.
///
/// YANG patterns are implicitly anchored at both ends.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    invert: bool,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
            invert: false,
        })
    }

    /// A pattern that must *not* match (`modifier invert-match`).
    pub fn inverted(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            invert: true,
            ..Self::new(source)?
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.regex.is_match(value) != self.invert
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.invert == other.invert
    }
}

/// `string` with optional length and pattern restrictions.
///
/// Every configured pattern must accept the value.
#[derive(Debug, Clone, PartialEq)]
pub struct StringType {
    pub length: LengthRangeIntervals<u64>,
    pub patterns: Vec<Pattern>,
}

impl Default for StringType {
    fn default() -> Self {
        Self {
            length: default_length(),
            patterns: Vec::new(),
        }
    }
}

impl StringType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, min: u64, max: u64) -> Self {
        self.length.push(min, max);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        let length = value.chars().count() as u64;
        if !self.length.allows(length) {
            diag.add_error(ValidationError::InvalidLength);
            return diag;
        }
        if self.patterns.iter().any(|p| !p.accepts(value)) {
            diag.add_error(ValidationError::InvalidPattern);
        }
        diag
    }
}

/// Base64-encoded `binary`; the length restriction applies to the decoded
/// octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryType {
    pub length: LengthRangeIntervals<u64>,
}

impl Default for BinaryType {
    fn default() -> Self {
        Self {
            length: default_length(),
        }
    }
}

impl BinaryType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, min: u64, max: u64) -> Self {
        self.length.push(min, max);
        self
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(compact.as_bytes()) {
            Ok(bytes) => {
                if !self.length.allows(bytes.len() as u64) {
                    diag.add_error(ValidationError::InvalidLength);
                }
            }
            Err(_) => diag.add_error(ValidationError::InvalAttr),
        }
        diag
    }
}
