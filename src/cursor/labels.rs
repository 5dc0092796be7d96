use std::collections::HashMap;

use super::RowCursor;
use crate::core::{MergeError, Result};

/// Column labels captured from the first shard, with a lookup map.
#[derive(Debug, Clone, Default)]
pub struct ColumnLabels {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    case_sensitive: bool,
}

impl ColumnLabels {
    pub fn new(labels: Vec<String>, case_sensitive: bool) -> Self {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            // first occurrence wins for duplicate labels
            index.entry(Self::key(label, case_sensitive)).or_insert(i + 1);
        }
        Self { labels, index, case_sensitive }
    }

    pub fn from_cursor<C: RowCursor + ?Sized>(cursor: &C, case_sensitive: bool) -> Result<Self> {
        let labels = (1..=cursor.column_count())
            .map(|i| cursor.column_label(i).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(labels, case_sensitive))
    }

    fn key(label: &str, case_sensitive: bool) -> String {
        if case_sensitive { label.to_string() } else { label.to_ascii_lowercase() }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Result<&str> {
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

    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(&Self::key(label, self.case_sensitive))
            .copied()
            .ok_or_else(|| MergeError::ColumnLabelNotFound(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let labels = ColumnLabels::new(vec!["id".to_string(), "Name".to_string()], false);
        assert_eq!(labels.index_of("NAME").unwrap(), 2);
        assert_eq!(labels.label(1).unwrap(), "id");
        assert!(labels.label(3).is_err());
        assert!(labels.label(0).is_err());
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let labels = ColumnLabels::new(vec!["Name".to_string()], true);
        assert!(labels.index_of("name").is_err());
        assert_eq!(labels.index_of("Name").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_labels_resolve_to_first() {
        let labels = ColumnLabels::new(vec!["a".to_string(), "A".to_string()], false);
        assert_eq!(labels.index_of("a").unwrap(), 1);
    }
}
