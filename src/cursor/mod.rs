/// Row cursor contract
///
/// Every shard result and every merged result is a forward-only cursor:
/// - `next()` advances and reports whether a row is available
/// - `value(i)` reads column `i` (1-based) of the current row
/// - column metadata is fixed for the cursor's lifetime
///
/// Once `next()` returns `false` it keeps returning `false`.
pub mod compare;
pub mod json;
pub mod labels;
pub mod memory;

pub use compare::compare_rows;
pub use json::ShardFile;
pub use labels::ColumnLabels;
pub use memory::MemoryCursor;

use crate::core::{MergeError, Result, Row, Value};

pub trait RowCursor {
    fn next(&mut self) -> Result<bool>;

    fn value(&self, index: usize) -> Result<Value>;

    fn column_count(&self) -> usize;

    fn column_label(&self, index: usize) -> Result<&str>;

    /// 1-based position of `label`, matched case-insensitively.
    fn column_index(&self, label: &str) -> Result<usize> {
        (1..=self.column_count())
            .find(|&i| self.column_label(i).is_ok_and(|l| l.eq_ignore_ascii_case(label)))
            .ok_or_else(|| MergeError::ColumnLabelNotFound(label.to_string()))
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        let index = self.column_index(label)?;
        self.value(index)
    }

    /// Copies every column of the current row.
    fn current_row(&self) -> Result<Row> {
        (1..=self.column_count())
            .map(|i| self.value(i))
            .collect::<Result<Vec<_>>>()
            .map(Row::new)
    }
}

/// A shard cursor handed over by the routing layer, possibly from another thread.
pub type BoxedCursor = Box<dyn RowCursor + Send>;

impl<C: RowCursor + ?Sized> RowCursor for Box<C> {
    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn value(&self, index: usize) -> Result<Value> {
        (**self).value(index)
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        (**self).column_label(index)
    }

    fn column_index(&self, label: &str) -> Result<usize> {
        (**self).column_index(label)
    }

    fn current_row(&self) -> Result<Row> {
        (**self).current_row()
    }
}

/// Drains a cursor into rows. Mostly useful for tests and the CLI.
pub fn collect_rows<C: RowCursor + ?Sized>(cursor: &mut C) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    while cursor.next()? {
        rows.push(cursor.current_row()?);
    }
    Ok(rows)
}
