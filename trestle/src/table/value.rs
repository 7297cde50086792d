//! Values read off rows by column accessors.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A cell value, as produced by a column accessor.
///
/// Values drive both default cell display and sorting.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text shown by the default cell renderer.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => s.clone(),
            Self::Timestamp(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) | Self::Decimal(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Empty => 4,
        }
    }

    /// Total ascending order between two values.
    ///
    /// `Int`, `Decimal` and `Float` share one numeric scale: finite floats
    /// are converted to decimals, so integers beyond `f64` precision keep
    /// their order next to floats. Floats outside the decimal range (the
    /// infinities included) sit below or above every decimal, and `NaN`
    /// after all other numbers. Text compares case-insensitively, then
    /// byte-wise.
    ///
    /// Values of different kinds order as
    /// `Bool < numbers < Text < Timestamp < Empty`.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        use CellValue::*;

        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Text(a), Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => match (self.number(), other.number()) {
                (Some(a), Some(b)) => a.compare(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Exact(Decimal::from(*i))),
            Self::Decimal(d) => Some(Number::Exact(*d)),
            Self::Float(f) => Some(Number::from_f64(*f)),
            _ => None,
        }
    }
}

/// A numeric cell value placed on the shared scale.
#[derive(Debug, Clone, Copy)]
enum Number {
    /// Below `Decimal::MIN`, `-inf` included.
    Below(f64),
    Exact(Decimal),
    /// Above `Decimal::MAX`, `+inf` included.
    Above(f64),
    Nan,
}

impl Number {
    fn from_f64(f: f64) -> Self {
        if f.is_nan() {
            return Self::Nan;
        }
        match Decimal::from_f64_retain(f) {
            Some(d) => Self::Exact(d),
            // Too small in magnitude for a decimal scale.
            None if f.abs() < 1.0 => Self::Exact(Decimal::ZERO),
            None if f < 0.0 => Self::Below(f),
            None => Self::Above(f),
        }
    }

    fn band(&self) -> u8 {
        match self {
            Self::Below(_) => 0,
            Self::Exact(_) => 1,
            Self::Above(_) => 2,
            Self::Nan => 3,
        }
    }

    fn compare(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.cmp(b),
            (Self::Below(a), Self::Below(b)) | (Self::Above(a), Self::Above(b)) => a.total_cmp(b),
            _ => self.band().cmp(&other.band()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<Decimal> for CellValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
