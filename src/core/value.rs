use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::cmp::Ordering;

use super::error::{MergeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    // Numeric types
    SmallInt(i16),
    Integer(i64),
    Real(f64),
    Numeric(Decimal),  // NUMERIC/DECIMAL with precision
    // String types
    Text(String),
    Char(String),      // Fixed-length CHAR(n)
    // Boolean
    Boolean(bool),
    // Date/Time types
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    // Special types
    Uuid(Uuid),
    Json(String),      // JSON as text
    Bytea(Vec<u8>),    // Binary data
    Enum(String, String), // (enum_name, value)
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::SmallInt(_) | Self::Integer(_) | Self::Real(_) | Self::Numeric(_))
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::SmallInt(i) => Some(*i as i64),
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Exact decimal view of a numeric value. Reals go through `from_f64`
    /// and fail for NaN/infinity.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::SmallInt(i) => Some(Decimal::from(*i)),
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Numeric(d) => Some(*d),
            Self::Real(r) => Decimal::from_f64(*r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::SmallInt(i) => Some(f64::from(*i)),
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Numeric(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Date and timestamp values on one naive (UTC) timeline.
    #[must_use]
    pub fn as_naive_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Self::Timestamp(t) => Some(*t),
            Self::TimestampTz(t) => Some(t.naive_utc()),
            _ => None,
        }
    }

    pub(crate) fn as_text_like(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Char(s) | Self::Json(s) | Self::Enum(_, s) => Some(s),
            _ => None,
        }
    }

    /// Rank used when two values of unrelated families meet in one column.
    const fn family_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::SmallInt(_) | Self::Integer(_) | Self::Real(_) | Self::Numeric(_) => 2,
            Self::Text(_) | Self::Char(_) | Self::Json(_) | Self::Enum(..) => 3,
            Self::Date(_) | Self::Timestamp(_) | Self::TimestampTz(_) => 4,
            Self::Uuid(_) => 5,
            Self::Bytea(_) => 6,
        }
    }

    /// Total order over values. `Null` sorts below everything here; callers
    /// that need configurable null placement handle nulls before calling.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::TimestampTz(a), Self::TimestampTz(b)) => a.cmp(b),
            (Self::Date(a), Self::Timestamp(b)) => a.and_time(NaiveTime::MIN).cmp(b),
            (Self::Timestamp(a), Self::Date(b)) => a.cmp(&b.and_time(NaiveTime::MIN)),
            (Self::TimestampTz(a), b) if b.as_naive_timestamp().is_some() => {
                a.naive_utc().cmp(&b.as_naive_timestamp().unwrap_or_default())
            }
            (a, Self::TimestampTz(b)) if a.as_naive_timestamp().is_some() => {
                a.as_naive_timestamp().unwrap_or_default().cmp(&b.naive_utc())
            }
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::Bytea(a), Self::Bytea(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => compare_numeric(a, b),
            (a, b) => match (a.as_text_like(), b.as_text_like()) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => a.family_rank().cmp(&b.family_rank()),
            },
        }
    }

    fn ensure_numeric(&self, op: &'static str) -> Result<()> {
        if self.is_null() || self.is_numeric() {
            Ok(())
        } else {
            Err(MergeError::TypeMismatch { op, value: self.to_string() })
        }
    }

    /// Adds two partial sums. `Null` is the identity, so a null operand
    /// contributes nothing and `Null + Null` stays `Null`.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.ensure_numeric("SUM")?;
        other.ensure_numeric("SUM")?;

        match (self, other) {
            (Self::Null, v) | (v, Self::Null) => Ok(v.clone()),
            (a, b) => {
                if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
                    return Ok(x.checked_add(y).map_or_else(
                        || Self::Numeric(Decimal::from(x) + Decimal::from(y)),
                        Self::Integer,
                    ));
                }
                if matches!(a, Self::Real(_)) || matches!(b, Self::Real(_)) {
                    let x = a.as_f64().unwrap_or_default();
                    let y = b.as_f64().unwrap_or_default();
                    return Ok(Self::Real(x + y));
                }
                let (x, y) = (decimal_operand(a, "SUM")?, decimal_operand(b, "SUM")?);
                x.checked_add(y)
                    .map(Self::Numeric)
                    .ok_or_else(|| MergeError::TypeMismatch { op: "SUM", value: "numeric overflow".to_string() })
            }
        }
    }

    /// Divides an accumulated sum by an accumulated count for AVG.
    /// A null sum or a zero/null count yields `Null`.
    pub fn divide_by_count(&self, count: &Self) -> Result<Self> {
        self.ensure_numeric("AVG")?;
        count.ensure_numeric("AVG")?;

        let zero_count = count.as_decimal().is_none_or(|c| c.is_zero());
        if self.is_null() || zero_count {
            return Ok(Self::Null);
        }

        if let Self::Real(sum) = self {
            let divisor = count.as_f64().unwrap_or(1.0);
            return Ok(Self::Real(sum / divisor));
        }

        let sum = decimal_operand(self, "AVG")?;
        let divisor = decimal_operand(count, "AVG")?;
        sum.checked_div(divisor)
            .map(Self::Numeric)
            .ok_or_else(|| MergeError::TypeMismatch { op: "AVG", value: "numeric overflow".to_string() })
    }
}

fn decimal_operand(value: &Value, op: &'static str) -> Result<Decimal> {
    value
        .as_decimal()
        .ok_or_else(|| MergeError::TypeMismatch { op, value: value.to_string() })
}

fn compare_numeric(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
        return x.cmp(&y);
    }
    if matches!(a, Value::Real(_)) || matches!(b, Value::Real(_)) {
        let x = a.as_f64().unwrap_or_default();
        let y = b.as_f64().unwrap_or_default();
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a.as_decimal(), b.as_decimal()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Numeric(v)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::SmallInt(i) => write!(f, "{i}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Char(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Self::TimestampTz(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S %Z")),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Json(j) => write!(f, "{j}"),
            Self::Bytea(b) => write!(f, "\\x{}", hex::encode(b)),
            Self::Enum(_, v) => write!(f, "{v}"),
        }
    }
}
