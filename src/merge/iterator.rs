use super::advance_shard;
use crate::core::{MergeError, Result, Value};
use crate::cursor::{BoxedCursor, ColumnLabels, RowCursor};

/// Concatenates shard results in input order.
pub struct IteratorMergedResult {
    cursors: Vec<BoxedCursor>,
    position: usize,
    on_row: bool,
    labels: ColumnLabels,
}

impl IteratorMergedResult {
    pub fn new(cursors: Vec<BoxedCursor>, labels: ColumnLabels) -> Self {
        Self { cursors, position: 0, on_row: false, labels }
    }
}

impl RowCursor for IteratorMergedResult {
    fn next(&mut self) -> Result<bool> {
        while let Some(cursor) = self.cursors.get_mut(self.position) {
            if advance_shard(cursor, self.position)? {
                self.on_row = true;
                return Ok(true);
            }
            self.position += 1;
        }
        self.on_row = false;
        Ok(false)
    }

    fn value(&self, index: usize) -> Result<Value> {
        if !self.on_row {
            return Err(MergeError::NoCurrentRow);
        }
        self.cursors
            .get(self.position)
            .ok_or(MergeError::NoCurrentRow)?
            .value(index)
    }

    fn column_count(&self) -> usize {
        self.labels.len()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        self.labels.label(index)
    }

    fn column_index(&self, label: &str) -> Result<usize> {
        self.labels.index_of(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{collect_rows, MemoryCursor};

    fn shard(values: &[i64]) -> BoxedCursor {
        Box::new(MemoryCursor::from_values(
            ["id"],
            values.iter().map(|v| vec![Value::Integer(*v)]).collect(),
        ))
    }

    #[test]
    fn test_concatenates_in_input_order() {
        let cursors = vec![shard(&[3, 1]), shard(&[]), shard(&[2])];
        let labels = ColumnLabels::from_cursor(&cursors[0], false).unwrap();
        let mut merged = IteratorMergedResult::new(cursors, labels);

        let ids: Vec<i64> = collect_rows(&mut merged)
            .unwrap()
            .iter()
            .map(|r| r.values[0].as_int().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(!merged.next().unwrap());
        assert!(matches!(merged.value(1), Err(MergeError::NoCurrentRow)));
    }

    #[test]
    fn test_read_before_next() {
        let cursors = vec![shard(&[1])];
        let labels = ColumnLabels::from_cursor(&cursors[0], false).unwrap();
        let merged = IteratorMergedResult::new(cursors, labels);
        assert!(matches!(merged.value(1), Err(MergeError::NoCurrentRow)));
        assert_eq!(merged.column_index("ID").unwrap(), 1);
    }
}
