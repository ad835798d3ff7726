//! Data types for the metric store
//!
//! This module contains the record types persisted by the store and the
//! error taxonomy of its write, read, and decode paths.

mod error;
mod metric;

pub use error::{MetricStoreError, MetricStoreResult};
pub use metric::{FlowNodeMetric, Metric, MetricType, ProcessModelMetric};
