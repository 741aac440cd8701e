//! Service layer for a London transport client.
//!
//! Wraps the TfL Unified API behind a typed client and the handful of
//! aggregation services a map/status UI consumes: stop point search,
//! per-line arrival grouping (with hub station fan-out), nearby marker
//! reconciliation, and line status aggregation. Durable user preferences
//! (search filters, drawn lines) are kept as JSON blobs on disk.

pub mod config;
pub mod models;
pub mod prefs;
pub mod providers;
pub mod services;

pub use config::Config;
pub use providers::tfl::{TflClient, TflError};
