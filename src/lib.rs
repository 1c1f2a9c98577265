//! Classic object-oriented patterns expressed in Rust.
//!
//! - [`domain::tree`]: composite shape tree with containment queries
//! - [`domain::timer`]: observer-style event timer
//! - [`domain::logger`]: decorator-chained logger

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
