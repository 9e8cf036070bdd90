//! Re-export of the shared DTOs from `valuscope-types`.
// Consolidated re-exports so downstream crates can depend on `valuscope-core` only

pub use valuscope_types::{
    CombineMode, FilterCondition, FilterSet, PercentileConfig, Record, RetryConfig,
    ValuscopeConfig, ValuscopeError, Value,
};
