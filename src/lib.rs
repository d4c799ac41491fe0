//! Core library for the subgraph-snapshots reporters.
//!
//! The three binaries share everything here: the subgraph client, the
//! snapshot grouping and aggregation, and the report rendering.

pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod report;
pub mod snapshots;
pub mod subgraph;
pub mod utils;
