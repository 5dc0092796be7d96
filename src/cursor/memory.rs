use super::RowCursor;
use crate::core::{MergeError, Result, Row, Value};

/// A shard result that has already been fetched into memory.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    labels: Vec<String>,
    rows: std::vec::IntoIter<Row>,
    current: Option<Row>,
}

impl MemoryCursor {
    pub fn new(labels: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            labels,
            rows: rows.into_iter(),
            current: None,
        }
    }

    /// Convenience constructor for literal rows.
    pub fn from_values<L: Into<String>>(labels: impl IntoIterator<Item = L>, rows: Vec<Vec<Value>>) -> Self {
        Self::new(
            labels.into_iter().map(Into::into).collect(),
            rows.into_iter().map(Row::new).collect(),
        )
    }
}

impl RowCursor for MemoryCursor {
    fn next(&mut self) -> Result<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn value(&self, index: usize) -> Result<Value> {
        self.current
            .as_ref()
            .ok_or(MergeError::NoCurrentRow)?
            .get(index)
            .cloned()
    }

    fn column_count(&self) -> usize {
        self.labels.len()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
            .ok_or(MergeError::ColumnOutOfRange {
                clause: "label",
                position: index,
                column_count: self.labels.len(),
            })
    }

    fn current_row(&self) -> Result<Row> {
        self.current.clone().ok_or(MergeError::NoCurrentRow)
    }
}
