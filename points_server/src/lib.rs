//! HTTP server for the points ledger.
//!
//! The server is a thin transport over [`points_ledger`]: it parses and
//! validates requests, calls the ledger, and maps the outcome to JSON.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod validation;
