pub mod filter;
pub mod indicator;
pub mod snapshot;
pub mod valuation;
