use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::core::{Row, Value};
use crate::statement::OrderItem;

/// Hashable form of one grouping value. Values that compare equal map to
/// the same part: numerics collapse onto one numeric domain, text-like
/// values onto their text, dates and timestamps onto a UTC timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Float(u64),
    Text(String),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
    Bytes(Vec<u8>),
}

impl KeyPart {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Boolean(b) => Self::Bool(*b),
            Value::SmallInt(_) | Value::Integer(_) => Self::Int(value.as_int().unwrap_or_default()),
            Value::Numeric(_) | Value::Real(_) => match value.as_decimal() {
                Some(d) => Self::numeric(d),
                // NaN / infinity
                None => Self::Float(value.as_f64().unwrap_or_default().to_bits()),
            },
            Value::Date(_) | Value::Timestamp(_) | Value::TimestampTz(_) => {
                Self::Timestamp(value.as_naive_timestamp().unwrap_or_default())
            }
            Value::Uuid(u) => Self::Uuid(*u),
            Value::Bytea(b) => Self::Bytes(b.clone()),
            Value::Text(_) | Value::Char(_) | Value::Json(_) | Value::Enum(..) => {
                Self::Text(value.as_text_like().unwrap_or_default().to_string())
            }
        }
    }

    fn numeric(d: Decimal) -> Self {
        let d = d.normalize();
        if d.scale() == 0 {
            if let Some(i) = d.to_i64() {
                return Self::Int(i);
            }
        }
        Self::Decimal(d)
    }
}

/// The GROUP BY key tuple of one row; empty when there is no GROUP BY.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<KeyPart>);

impl GroupKey {
    pub fn from_row(row: &Row, group_by: &[OrderItem]) -> Self {
        Self(
            group_by
                .iter()
                .map(|item| {
                    let value = item
                        .index
                        .checked_sub(1)
                        .and_then(|i| row.values.get(i))
                        .unwrap_or(&Value::Null);
                    KeyPart::from_value(value)
                })
                .collect(),
        )
    }
}
