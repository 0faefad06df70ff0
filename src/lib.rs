//! colstats - per-column statistics for a columnar datastore
//!
//! For every ingested column, in every block and at the table scope, this crate
//! incrementally maintains either a numeric summary (count, min, max, mean) or a
//! bounded top-frequency table of categorical values. The summaries back query
//! planning (range pruning, cardinality estimation) and are persisted as
//! per-block metadata.

pub mod config;
pub mod core;
pub mod ingest;
pub mod stats;
pub mod table;
pub mod utils;
pub mod version;
