use serde::{Deserialize, Serialize};
use super::error::{MergeError, Result};
use super::value::Value;

/// One materialized result row. Column positions are 1-based, as in SQL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Result<&Value> {
        index
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .ok_or(MergeError::ColumnOutOfRange {
                clause: "read",
                position: index,
                column_count: self.values.len(),
            })
    }

    /// Overwrites one column in place; out-of-range positions are ignored
    /// because every caller validated them against the shared column count.
    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.values.get_mut(i)) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
