//! `finrank` library crate.
//!
//! The binary (`finrank`) is a thin wrapper around this library so that:
//!
//! - the ranking engine is testable without spawning processes
//! - modules are reusable (e.g., a future web/API front-end)
//! - code stays easy to navigate as the project grows
//!
//! The engine proper is `fx` + `data` + `estimate` + `distribution`; the
//! `cli`/`app`/`report` modules are terminal presentation around it.

pub mod app;
pub mod cli;
pub mod data;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod fx;
pub mod report;
