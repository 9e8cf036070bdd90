//! Valuscope data transfer objects, error taxonomy, and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod filter;
mod value;

pub use config::{PercentileConfig, RetryConfig, ValuscopeConfig};
pub use error::ValuscopeError;
pub use filter::{CombineMode, FilterCondition, FilterSet};
pub use value::{Record, Value};
