//! Metric store module
//!
//! This module provides the durable side of the metric log:
//! - `MetricsRepository`: per-process-model append/read API
//! - `MetricStoreConfig`: output root and file path resolution
//! - `fs_adapter`: directory/file primitives over `tokio::fs`
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌────────┐    ┌──────────────┐    ┌─────────────────┐    ┌────────────┐
//! │ engine │───►│ codec encode │───►│ ensure dir +    │───►│ <id>.met   │
//! │ event  │    │ one line     │    │ append one line │    │ append-only│
//! └────────┘    └──────────────┘    └─────────────────┘    └────────────┘
//!
//! Read Path:
//! ┌────────────┐    ┌────────────────┐    ┌───────────────┐
//! │ read whole │───►│ drop blank     │───►│ codec decode  │───► Vec<Metric>
//! │ <id>.met   │    │ lines          │    │ each line     │    (write order)
//! └────────────┘    └────────────────┘    └───────────────┘
//! ```

pub mod fs_adapter;
mod store;

pub use store::{MetricStoreConfig, MetricsRepository, METRIC_FILE_EXTENSION};
