use serde::{Deserialize, Serialize};

use crate::core::{MergeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationKind {
    Count,
    Sum,
    Avg,
    Max,
    Min,
}

impl std::fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Max => "MAX",
            Self::Min => "MIN",
        };
        write!(f, "{name}")
    }
}

/// Hidden SUM and COUNT columns that shards return next to an AVG so the
/// average can be recombined exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumns {
    pub sum_index: usize,
    pub count_index: usize,
}

/// One aggregate in the select list. `index` is the 1-based column where
/// each shard reports its partial result and where the merged value is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationItem {
    pub kind: AggregationKind,
    pub index: usize,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub derived: Option<DerivedColumns>,
}

impl AggregationItem {
    #[must_use]
    pub const fn new(kind: AggregationKind, index: usize) -> Self {
        Self { kind, index, alias: None, derived: None }
    }

    #[must_use]
    pub const fn count(index: usize) -> Self {
        Self::new(AggregationKind::Count, index)
    }

    #[must_use]
    pub const fn sum(index: usize) -> Self {
        Self::new(AggregationKind::Sum, index)
    }

    #[must_use]
    pub const fn max(index: usize) -> Self {
        Self::new(AggregationKind::Max, index)
    }

    #[must_use]
    pub const fn min(index: usize) -> Self {
        Self::new(AggregationKind::Min, index)
    }

    /// AVG recombined from per-shard SUM and COUNT columns.
    #[must_use]
    pub const fn avg_derived(index: usize, sum_index: usize, count_index: usize) -> Self {
        Self {
            kind: AggregationKind::Avg,
            index,
            alias: None,
            derived: Some(DerivedColumns { sum_index, count_index }),
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Derived SUM/COUNT columns of an AVG. Shards only return a partial
    /// average, which cannot be recombined exactly without them.
    pub fn require_derived(&self) -> Result<DerivedColumns> {
        self.derived.ok_or_else(|| {
            MergeError::Config(format!(
                "{} at column {} needs derived SUM and COUNT columns",
                self.kind, self.index
            ))
        })
    }

    /// Every column position this item reads or writes.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.index)
            .chain(self.derived.iter().flat_map(|d| [d.sum_index, d.count_index]))
    }
}
