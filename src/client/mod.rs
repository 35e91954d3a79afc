//! Client library for connecting to tonalityd.
//!
//! Provides [`AnalyzeClient`], which submits batches to a remote tonalityd
//! instance over HTTP.

mod analyze_client;

pub use analyze_client::{AnalyzeClient, DEFAULT_SERVER};
