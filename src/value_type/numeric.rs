//! Range-constrained numeric types: the fixed-width integers and decimal64.

use super::Diagnostics;
use crate::error::ValidationError;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

/// A closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A default interval plus optional explicit sub-intervals.
///
/// With no explicit intervals the value must lie in the default range.
/// Otherwise it must lie in at least one explicit interval and the default
/// range is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthRangeIntervals<T> {
    pub default_range: Range<T>,
    pub intervals: Vec<Range<T>>,
}

impl<T: PartialOrd + Copy> LengthRangeIntervals<T> {
    pub fn new(default_range: Range<T>) -> Self {
        Self {
            default_range,
            intervals: Vec::new(),
        }
    }

    pub fn push(&mut self, min: T, max: T) {
        self.intervals.push(Range::new(min, max));
    }

    pub fn allows(&self, value: T) -> bool {
        if self.intervals.is_empty() {
            self.default_range.contains(value)
        } else {
            self.intervals.iter().any(|r| r.contains(value))
        }
    }
}

/// Fixed-width integers usable in a [`NumberType`].
pub trait IntegerValue:
    Copy + PartialOrd + fmt::Debug + fmt::Display + FromStr<Err = ParseIntError>
{
    const MIN: Self;
    const MAX: Self;
    const NAME: &'static str;
}

macro_rules! integer_value {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl IntegerValue for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;
                const NAME: &'static str = $name;
            }
        )*
    };
}

integer_value! {
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
}

/// A range-constrained integer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberType<T> {
    pub range: LengthRangeIntervals<T>,
}

impl<T: IntegerValue> NumberType<T> {
    /// A type whose default range is `[min, max]`.
    pub fn new(min: T, max: T) -> Self {
        Self {
            range: LengthRangeIntervals::new(Range::new(min, max)),
        }
    }

    /// Full width of the underlying integer.
    pub fn full() -> Self {
        Self::new(T::MIN, T::MAX)
    }

    /// Add an explicit interval. Once any interval is present the default
    /// range no longer applies.
    pub fn with_interval(mut self, min: T, max: T) -> Self {
        self.range.push(min, max);
        self
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        if value.is_empty() {
            diag.add_error(ValidationError::InvalAttr);
            return diag;
        }
        match value.parse::<T>() {
            Ok(number) => {
                if !self.range.allows(number) {
                    diag.add_error(ValidationError::RangeViolation);
                }
            }
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    diag.add_error(ValidationError::RangeViolation)
                }
                _ => diag.add_error(ValidationError::InvalAttr),
            },
        }
        diag
    }
}

impl<T: IntegerValue> Default for NumberType<T> {
    fn default() -> Self {
        Self::full()
    }
}

/// Failure to read a decimal64 literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecimalFailure {
    Malformed,
    Overflow,
}

/// `decimal64` with a fixed number of fraction digits.
///
/// Values and ranges are held scaled by `10^fraction_digits` so that all
/// comparisons are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal64Type {
    pub fraction_digits: u8,
    pub range: LengthRangeIntervals<i64>,
}

impl Decimal64Type {
    /// `fraction_digits` is clamped to the YANG limits `1..=18`.
    pub fn new(fraction_digits: u8) -> Self {
        Self {
            fraction_digits: fraction_digits.clamp(1, 18),
            range: LengthRangeIntervals::new(Range::new(i64::MIN, i64::MAX)),
        }
    }

    /// Add an explicit interval given in unscaled units.
    pub fn with_interval(mut self, min: f64, max: f64) -> Self {
        let scale = 10f64.powi(i32::from(self.fraction_digits));
        self.range
            .push((min * scale).round() as i64, (max * scale).round() as i64);
        self
    }

    pub fn validate(&self, value: &str) -> Diagnostics {
        let mut diag = Diagnostics::new(value.to_string());
        match parse_scaled(value, self.fraction_digits) {
            Ok(scaled) => {
                if !self.range.allows(scaled) {
                    diag.add_error(ValidationError::RangeViolation);
                }
            }
            Err(DecimalFailure::Overflow) => diag.add_error(ValidationError::RangeViolation),
            Err(DecimalFailure::Malformed) => diag.add_error(ValidationError::InvalAttr),
        }
        diag
    }
}

fn parse_scaled(value: &str, fraction_digits: u8) -> Result<i64, DecimalFailure> {
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty()
        || !all_digits(int_part)
        || !all_digits(frac_part)
        || (body.contains('.') && frac_part.is_empty())
        || frac_part.len() > usize::from(fraction_digits)
    {
        return Err(DecimalFailure::Malformed);
    }

    let digits = format!(
        "{int_part}{frac_part:0<width$}",
        width = usize::from(fraction_digits)
    );
    let magnitude: i128 = digits.parse().map_err(|_| DecimalFailure::Overflow)?;
    let scaled = if negative { -magnitude } else { magnitude };
    i64::try_from(scaled).map_err(|_| DecimalFailure::Overflow)
}
