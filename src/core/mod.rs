// Module declarations
pub mod error;
pub mod value;
pub mod row;
pub mod config;

// Re-exports for convenience
pub use error::{MergeError, Result};
pub use value::Value;
pub use row::Row;
pub use config::MergeConfig;
