/// ORDER BY / GROUP BY item model
///
/// Both clauses describe a key the same way: a 1-based column position, a
/// value direction and a null direction. The null direction says whether a
/// null key behaves as the smallest (`Asc`) or the largest (`Desc`) value.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Parsed `NULLS FIRST` / `NULLS LAST` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullsClause {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItem {
    pub index: usize,
    #[serde(default)]
    pub direction: OrderDirection,
    #[serde(default)]
    pub null_direction: OrderDirection,
}

impl OrderItem {
    #[must_use]
    pub const fn new(index: usize, direction: OrderDirection, null_direction: OrderDirection) -> Self {
        Self { index, direction, null_direction }
    }

    #[must_use]
    pub const fn asc(index: usize) -> Self {
        Self::new(index, OrderDirection::Asc, OrderDirection::Asc)
    }

    #[must_use]
    pub const fn desc(index: usize) -> Self {
        Self::new(index, OrderDirection::Desc, OrderDirection::Asc)
    }

    /// Builds an item from an Oracle-style NULLS clause. The clause sets the
    /// null direction independently of the value direction: FIRST or no
    /// clause treats null as the smallest value, LAST as the largest.
    #[must_use]
    pub const fn with_nulls(index: usize, direction: OrderDirection, nulls: Option<NullsClause>) -> Self {
        let null_direction = match nulls {
            None | Some(NullsClause::First) => OrderDirection::Asc,
            Some(NullsClause::Last) => OrderDirection::Desc,
        };
        Self::new(index, direction, null_direction)
    }

    /// Compares two values of this item's column in output order.
    #[must_use]
    pub fn compare_values(&self, a: &Value, b: &Value) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => self.null_ordering(),
            (false, true) => self.null_ordering().reverse(),
            (false, false) => match self.direction {
                OrderDirection::Asc => a.compare(b),
                OrderDirection::Desc => a.compare(b).reverse(),
            },
        }
    }

    /// Where a null key lands relative to a non-null one.
    const fn null_ordering(&self) -> Ordering {
        match (self.direction, self.null_direction) {
            (OrderDirection::Asc, OrderDirection::Asc) | (OrderDirection::Desc, OrderDirection::Desc) => {
                Ordering::Less
            }
            _ => Ordering::Greater,
        }
    }
}
