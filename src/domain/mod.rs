//! Domain types used throughout the ranking engine.
//!
//! This module defines:
//!
//! - reference population statistics (`SegmentStats`)
//! - query inputs (`Query`, `Metric`)
//! - visualization outputs (`Bucket`)
//! - loading configuration and diagnostics (`LoaderConfig`, `LoadReport`)

pub mod types;

pub use types::*;
