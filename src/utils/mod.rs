//! # Utility Modules
//!
//! Supporting utilities for logging, timing, and observability.
//!
//! This module provides reusable utilities used throughout the broker
//! implementation.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe observability counters
//! - **Timeout**: Shared timeout defaults

pub mod logging;
pub mod metrics;
pub mod timeout;

// Re-export public types for advanced users
pub use metrics::{global_metrics, Metrics, MetricsSnapshot};
