//! HTTP server and daemon configuration.
//!
//! This module provides:
//! - The axum service wrapping a [`BatchAnalyzer`](crate::BatchAnalyzer) (`service`)
//! - Configuration and secrets loading for tonalityd (`config`)

pub mod config;
pub mod service;

pub use service::{AppState, router, router_with_limit, serve};
