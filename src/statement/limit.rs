/// LIMIT / OFFSET model
///
/// Dialects spell pagination two ways:
/// - MySQL, PostgreSQL, H2: `LIMIT count OFFSET skip` (plain counts)
/// - Oracle `ROWNUM`, SQL Server `ROW_NUMBER()`/`TOP`: 1-based row-number
///   bounds that may be exclusive (`rn > m`, `rn < n`) or inclusive
///
/// `Limit::normalize` turns either form into one skip/cap pair.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    MySql,
    PostgreSql,
    H2,
    Oracle,
    SqlServer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    OffsetCount,
    RowNumber,
}

impl Dialect {
    #[must_use]
    pub const fn pagination_style(self) -> PaginationStyle {
        match self {
            Self::MySql | Self::PostgreSql | Self::H2 => PaginationStyle::OffsetCount,
            Self::Oracle | Self::SqlServer => PaginationStyle::RowNumber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitValue {
    pub value: usize,
    /// Exclusive bound (`>` / `<`). Only meaningful for row-number dialects.
    #[serde(default)]
    pub bound_opened: bool,
}

impl LimitValue {
    #[must_use]
    pub const fn new(value: usize, bound_opened: bool) -> Self {
        Self { value, bound_opened }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub offset: Option<LimitValue>,
    #[serde(default)]
    pub row_count: Option<LimitValue>,
}

/// Normalized pagination: skip `offset` rows, then return at most
/// `row_count` rows (unbounded when `None`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub row_count: Option<usize>,
}

impl Limit {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect, offset: None, row_count: None }
    }

    /// `LIMIT row_count OFFSET offset` for offset-count dialects.
    #[must_use]
    pub const fn offset_count(dialect: Dialect, offset: usize, row_count: Option<usize>) -> Self {
        let row_count = match row_count {
            Some(n) => Some(LimitValue::new(n, false)),
            None => None,
        };
        Self { dialect, offset: Some(LimitValue::new(offset, false)), row_count }
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: LimitValue) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn with_row_count(mut self, row_count: LimitValue) -> Self {
        self.row_count = Some(row_count);
        self
    }

    #[must_use]
    pub fn normalize(&self) -> Pagination {
        match self.dialect.pagination_style() {
            PaginationStyle::OffsetCount => Pagination {
                offset: self.offset.map_or(0, |o| o.value),
                row_count: self.row_count.map(|r| r.value),
            },
            PaginationStyle::RowNumber => {
                let offset = self.offset.map_or(0, |o| {
                    if o.bound_opened { o.value } else { o.value.saturating_sub(1) }
                });
                let last_row = self.row_count.map(|r| {
                    if r.bound_opened { r.value.saturating_sub(1) } else { r.value }
                });
                Pagination {
                    offset,
                    row_count: last_row.map(|last| last.saturating_sub(offset)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_limit_is_verbatim() {
        let limit = Limit::offset_count(Dialect::MySql, 1, Some(2));
        assert_eq!(limit.normalize(), Pagination { offset: 1, row_count: Some(2) });
    }

    #[test]
    fn test_bound_flags_ignored_for_offset_count() {
        let limit = Limit::new(Dialect::PostgreSql)
            .with_offset(LimitValue::new(5, true))
            .with_row_count(LimitValue::new(10, true));
        assert_eq!(limit.normalize(), Pagination { offset: 5, row_count: Some(10) });
    }

    #[test]
    fn test_empty_limit() {
        assert_eq!(Limit::new(Dialect::H2).normalize(), Pagination::default());
    }

    #[test]
    fn test_oracle_rownum_bounds() {
        // rownum > 1 AND rownum <= 3 -> rows 2 and 3
        let limit = Limit::new(Dialect::Oracle)
            .with_offset(LimitValue::new(1, true))
            .with_row_count(LimitValue::new(3, false));
        assert_eq!(limit.normalize(), Pagination { offset: 1, row_count: Some(2) });

        // rownum >= 2 AND rownum < 4 -> rows 2 and 3
        let limit = Limit::new(Dialect::Oracle)
            .with_offset(LimitValue::new(2, false))
            .with_row_count(LimitValue::new(4, true));
        assert_eq!(limit.normalize(), Pagination { offset: 1, row_count: Some(2) });
    }

    #[test]
    fn test_sqlserver_top_only() {
        let limit = Limit::new(Dialect::SqlServer).with_row_count(LimitValue::new(5, false));
        assert_eq!(limit.normalize(), Pagination { offset: 0, row_count: Some(5) });
    }

    #[test]
    fn test_row_number_window_before_offset_is_empty() {
        let limit = Limit::new(Dialect::Oracle)
            .with_offset(LimitValue::new(10, true))
            .with_row_count(LimitValue::new(5, false));
        assert_eq!(limit.normalize(), Pagination { offset: 10, row_count: Some(0) });
    }
}
