/// Statement model consumed by the merge engine
///
/// Produced by the SQL parser; the merge engine only reads it.
pub mod order_item;
pub mod aggregation;
pub mod limit;
pub mod select;

pub use order_item::{NullsClause, OrderDirection, OrderItem};
pub use aggregation::{AggregationItem, AggregationKind, DerivedColumns};
pub use limit::{Dialect, Limit, LimitValue, Pagination, PaginationStyle};
pub use select::SelectStatement;
