//! Terminal reporting.
//!
//! We keep formatting code in one place so:
//! - the ranking/bucketing code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;
