use crate::core::{MergeError, Result, Row, Value};
use crate::cursor::RowCursor;
use crate::statement::Pagination;

/// Skips `offset` rows of the inner cursor, then returns at most
/// `row_count` rows.
///
/// Dialect differences are resolved before construction by
/// `Limit::normalize`; this decorator only sees a skip and a cap.
pub struct PaginationMergedResult<C: RowCursor> {
    inner: C,
    offset: usize,
    row_count: Option<usize>,
    skipped: bool,
    returned: usize,
    done: bool,
}

impl<C: RowCursor> PaginationMergedResult<C> {
    pub const fn new(inner: C, pagination: Pagination) -> Self {
        Self {
            inner,
            offset: pagination.offset,
            row_count: pagination.row_count,
            skipped: false,
            returned: 0,
            done: false,
        }
    }

    pub const fn inner(&self) -> &C {
        &self.inner
    }

    fn skip_offset(&mut self) -> Result<()> {
        self.skipped = true;
        for skipped in 0..self.offset {
            if !self.inner.next()? {
                tracing::trace!(skipped, offset = self.offset, "offset reached end of result");
                self.done = true;
                break;
            }
        }
        Ok(())
    }

    const fn on_row(&self) -> bool {
        !self.done && self.returned > 0
    }
}

impl<C: RowCursor> RowCursor for PaginationMergedResult<C> {
    fn next(&mut self) -> Result<bool> {
        if !self.skipped {
            self.skip_offset()?;
        }
        if self.done {
            return Ok(false);
        }
        if self.row_count.is_some_and(|cap| self.returned >= cap) {
            self.done = true;
            return Ok(false);
        }
        if self.inner.next()? {
            self.returned += 1;
            Ok(true)
        } else {
            self.done = true;
            Ok(false)
        }
    }

    fn value(&self, index: usize) -> Result<Value> {
        if !self.on_row() {
            return Err(MergeError::NoCurrentRow);
        }
        self.inner.value(index)
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        self.inner.column_label(index)
    }

    fn column_index(&self, label: &str) -> Result<usize> {
        self.inner.column_index(label)
    }

    fn current_row(&self) -> Result<Row> {
        if !self.on_row() {
            return Err(MergeError::NoCurrentRow);
        }
        self.inner.current_row()
    }
}
