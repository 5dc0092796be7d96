use serde::{Deserialize, Serialize};

use super::aggregation::AggregationItem;
use super::limit::Limit;
use super::order_item::OrderItem;

/// The parts of a parsed SELECT that decide how shard results are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectStatement {
    #[serde(default)]
    pub order_by: Vec<OrderItem>,
    #[serde(default)]
    pub group_by: Vec<OrderItem>,
    #[serde(default)]
    pub aggregations: Vec<AggregationItem>,
    #[serde(default)]
    pub limit: Option<Limit>,
}

impl SelectStatement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_order_by(mut self, item: OrderItem) -> Self {
        self.order_by.push(item);
        self
    }

    #[must_use]
    pub fn with_group_by(mut self, item: OrderItem) -> Self {
        self.group_by.push(item);
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, item: AggregationItem) -> Self {
        self.aggregations.push(item);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when ORDER BY starts with exactly the GROUP BY items, so every
    /// shard already emits rows clustered by group key.
    #[must_use]
    pub fn is_group_by_ordered(&self) -> bool {
        !self.group_by.is_empty()
            && self.order_by.len() >= self.group_by.len()
            && self.order_by.iter().zip(&self.group_by).all(|(o, g)| o == g)
    }
}
