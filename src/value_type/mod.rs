//! Value types of leaf and leaf-list nodes.
//!
//! [`ValueType`] is a closed sum over the YANG built-in types. Each variant
//! carries its own restrictions and is checked through the single
//! [`ValueType::validate`] entry point, which returns a diagnostics tree whose
//! own error list is empty iff the value is acceptable.
//!
//! # Examples
//!
//! ```rust
//! use yang_path::value_type::{NumberType, ValueType};
//! use yang_path::error::ValidationError;
//!
//! let ty = ValueType::Int32(NumberType::new(0, 10));
//! assert!(!ty.validate("5").has_errors());
//! assert_eq!(ty.validate("11").errors, vec![ValidationError::RangeViolation]);
//! assert_eq!(ty.validate("").errors, vec![ValidationError::InvalAttr]);
//! ```

pub mod named;
pub mod numeric;
pub mod reference;
pub mod text;


pub use named::{Bit, BitsType, EnumValue, EnumerationType, Identity, IdentityType};
pub use numeric::{Decimal64Type, IntegerValue, LengthRangeIntervals, NumberType, Range};
pub use reference::{InstanceIdType, LeafrefType};
pub use text::{BinaryType, Pattern, StringType};

use crate::diagnostics::DiagnosticNode;
use crate::error::ValidationError;

/// Diagnostics of a single value check; the source is the checked value.
pub type Diagnostics = DiagnosticNode<String, ValidationError>;

/// The type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Binary(BinaryType),
    Bits(BitsType),
    Bool,
    Decimal64(Decimal64Type),
    Empty,
    Enumeration(EnumerationType),
    Identity(IdentityType),
    InstanceId(InstanceIdType),
    Leafref(LeafrefType),
    String(StringType),
    Int8(NumberType<i8>),
    Int16(NumberType<i16>),
    Int32(NumberType<i32>),
    Int64(NumberType<i64>),
    Uint8(NumberType<u8>),
    Uint16(NumberType<u16>),
    Uint32(NumberType<u32>),
    Uint64(NumberType<u64>),
    Union(UnionType),
}

impl ValueType {
    /// Check `value` against this type.
    pub fn validate(&self, value: &str) -> Diagnostics {
        match self {
            Self::Binary(t) => t.validate(value),
            Self::Bits(t) => t.validate(value),
            Self::Bool => validate_bool(value),
            Self::Decimal64(t) => t.validate(value),
            Self::Empty => validate_empty(value),
            Self::Enumeration(t) => t.validate(value),
            Self::Identity(t) => t.validate(value),
            Self::InstanceId(t) => t.validate(value),
            Self::Leafref(t) => t.validate(value),
            Self::String(t) => t.validate(value),
            Self::Int8(t) => t.validate(value),
            Self::Int16(t) => t.validate(value),
            Self::Int32(t) => t.validate(value),
            Self::Int64(t) => t.validate(value),
            Self::Uint8(t) => t.validate(value),
            Self::Uint16(t) => t.validate(value),
            Self::Uint32(t) => t.validate(value),
            Self::Uint64(t) => t.validate(value),
            Self::Union(t) => t.validate(value),
        }
    }

    /// YANG name of the built-in type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary(_) => "binary",
            Self::Bits(_) => "bits",
            Self::Bool => "boolean",
            Self::Decimal64(_) => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration(_) => "enumeration",
            Self::Identity(_) => "identityref",
            Self::InstanceId(_) => "instance-identifier",
            Self::Leafref(_) => "leafref",
            Self::String(_) => "string",
            Self::Int8(_) => i8::NAME,
            Self::Int16(_) => i16::NAME,
            Self::Int32(_) => i32::NAME,
            Self::Int64(_) => i64::NAME,
            Self::Uint8(_) => u8::NAME,
            Self::Uint16(_) => u16::NAME,
            Self::Uint32(_) => u32::NAME,
            Self::Uint64(_) => u64::NAME,
            Self::Union(_) => "union",
        }
    }

    /// Leafrefs of this type, union members included, in declaration order.
    pub fn leafrefs(&self) -> Vec<&LeafrefType> {
        match self {
            Self::Leafref(l) => vec![l],
            Self::Union(u) => u.types.iter().flat_map(ValueType::leafrefs).collect(),
            _ => Vec::new(),
        }
    }

    /// Visit every leafref of this type, union members included.
    pub fn visit_leafrefs_mut(&mut self, visit: &mut impl FnMut(&mut LeafrefType)) {
        match self {
            Self::Leafref(l) => visit(l),
            Self::Union(u) => {
                for member in &mut u.types {
                    member.visit_leafrefs_mut(visit);
                }
            }
            _ => {}
        }
    }

    /// Plain `string` without restrictions.
    pub fn string() -> Self {
        Self::String(StringType::default())
    }
}

fn validate_bool(value: &str) -> Diagnostics {
    let mut diag = Diagnostics::new(value.to_string());
    if value != "true" && value != "false" {
        diag.add_error(ValidationError::InvalidBoolVal);
    }
    diag
}

fn validate_empty(value: &str) -> Diagnostics {
    let mut diag = Diagnostics::new(value.to_string());
    if !value.is_empty() {
        diag.add_error(ValidationError::InvalidEmptyVal);
    }
    diag
}

/// `union`: accepted if any member type accepts the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionType {
    pub types: Vec<ValueType>,
}

impl UnionType {
    pub fn new(types: Vec<ValueType>) -> Self {
        Self { types }
    }

    /// The first member accepting the value wins. When none does, the node
    /// reports [`ValidationError::Inval`] and keeps every member's
    /// diagnostics as children.
    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        let mut failures = Vec::with_capacity(self.types.len());
        for member in &self.types {
            let member_diag = member.validate(value);
            if !member_diag.has_errors() {
                return diag;
            }
            failures.push(member_diag);
        }
        diag.add_error(ValidationError::Inval);
        diag.children = failures;
        diag
    }
}
