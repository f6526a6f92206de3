//! Types that refer to other data: `instance-identifier` and `leafref`.
//!
//! Both validators only look at the value itself. Whether the referenced
//! instance exists is decided by the caller that has the data tree at hand
//! (see [`ValidationService`](crate::validation::ValidationService)).

use super::{Diagnostics, ValueType};
use crate::error::ValidationError;
use crate::path::{self, Predicate};

/// `instance-identifier`: an absolute, fully-keyed path expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstanceIdType {
    pub require_instance: bool,
}

impl InstanceIdType {
    pub fn new(require_instance: bool) -> Self {
        Self { require_instance }
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        let well_formed = path::parse(value).is_ok_and(|expr| {
            expr.absolute
                && expr.segments.iter().all(|s| {
                    !s.is_wildcard()
                        && s.predicates
                            .iter()
                            .all(|p| !matches!(p, Predicate::KeyPresent(_)))
                })
        });
        if !well_formed {
            diag.add_error(ValidationError::Inval);
        }
        diag
    }
}

/// `leafref`: values follow the type of the referenced leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafrefType {
    /// Absolute schema path of the referenced leaf
    pub path: String,
    /// Value type of the referenced leaf, resolved when the schema is built
    pub target: Option<Box<ValueType>>,
    pub require_instance: bool,
}

impl LeafrefType {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target: None,
            require_instance: true,
        }
    }

    pub fn with_target(mut self, target: ValueType) -> Self {
        self.target = Some(Box::new(target));
        self
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        match &self.target {
            Some(target) => target.validate(value),
            None => Diagnostics::new(value.to_string()),
        }
    }
}
