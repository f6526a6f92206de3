//! Types whose values are drawn from a declared table of names:
//! `enumeration`, `bits` and `identityref`.

use super::Diagnostics;
use crate::error::ValidationError;
use std::collections::HashSet;

/// One `enum` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// `enumeration`: the value must be one of the declared literal names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumerationType {
    pub enums: Vec<EnumValue>,
}

impl EnumerationType {
    pub fn new(enums: Vec<EnumValue>) -> Self {
        Self { enums }
    }

    /// Enumeration whose values are assigned in declaration order from 0.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enums: names
                .into_iter()
                .enumerate()
                .map(|(i, n)| EnumValue::new(n, i as i32))
                .collect(),
        }
    }

    /// The numeric value assigned to a literal name.
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.enums.iter().find(|e| e.name == name).map(|e| e.value)
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        if self.value_of(value).is_none() {
            diag.add_error(ValidationError::InvalidEnum);
        }
        diag
    }
}

/// One `bit` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bit {
    pub name: String,
    pub position: u32,
}

impl Bit {
    pub fn new(name: impl Into<String>, position: u32) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// `bits`: a whitespace-separated set of declared bit names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitsType {
    pub bits: Vec<Bit>,
}

impl BitsType {
    pub fn new(bits: Vec<Bit>) -> Self {
        Self { bits }
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        let mut seen = HashSet::new();
        for name in value.split_whitespace() {
            let declared = self.bits.iter().any(|b| b.name == name);
            if !declared || !seen.insert(name) {
                diag.add_error(ValidationError::InvalAttr);
                break;
            }
        }
        diag
    }
}

/// An identity together with every identity derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub module: String,
    pub name: String,
    pub derived: Vec<Identity>,
}

impl Identity {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            derived: Vec::new(),
        }
    }

    pub fn with_derived(mut self, identity: Identity) -> Self {
        self.derived.push(identity);
        self
    }

    /// `value` is either `name` or `module:name`.
    fn names(&self, value: &str) -> bool {
        match value.split_once(':') {
            Some((module, name)) => self.module == module && self.name == name,
            None => self.name == value,
        }
    }

    /// Whether `value` names this identity or any transitively derived one.
    pub fn covers(&self, value: &str) -> bool {
        self.names(value) || self.derived.iter().any(|d| d.covers(value))
    }
}

/// `identityref` restricted to a base identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityType {
    pub base: Identity,
}

impl IdentityType {
    pub fn new(base: Identity) -> Self {
        Self { base }
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        if !self.base.covers(value) {
            diag.add_error(ValidationError::InvalidIdentity);
        }
        diag
    }
}
