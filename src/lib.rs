//! Metrics Store
//!
//! An append-only, file-based metric log for workflow engine execution
//! telemetry: one `.met` file per process model, one semicolon-delimited
//! line per recorded event.
//!
//! # Features
//!
//! - **Two record variants**: process-model and flow-node metrics, tagged on
//!   the wire and modeled as one sum type
//! - **Append-only**: records are written once and never mutated; reads
//!   return records in write order
//! - **Async I/O**: every write and read suspends on file-system I/O instead
//!   of blocking the runtime
//! - **Loud decoding**: unknown metric types, bad timestamps, and bad JSON
//!   payloads fail with a specific error, never a silent default
//!
//! # Modules
//!
//! - `types`: record types (`Metric`, `MetricType`) and the error taxonomy
//! - `codec`: the line codec between records and their on-disk encoding
//! - `metric_store`: the repository API and its file-system primitives
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use metrics_store::{MetricStoreConfig, MetricsRepository, MetricType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MetricStoreConfig::new("metrics");
//!     let repository = MetricsRepository::with_config(config);
//!
//!     repository
//!         .write_metric_for_process_model(
//!             "corr-1",
//!             "invoice-approval",
//!             MetricType::ProcessStarted,
//!             Utc::now(),
//!             None,
//!         )
//!         .await?;
//!
//!     let metrics = repository
//!         .read_metrics_for_process_model("invoice-approval")
//!         .await?;
//!     println!("{} metrics recorded", metrics.len());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod metric_store;
pub mod types;

// Re-export commonly used items at crate root
pub use metric_store::{MetricStoreConfig, MetricsRepository, METRIC_FILE_EXTENSION};
pub use types::{
    FlowNodeMetric, Metric, MetricStoreError, MetricStoreResult, MetricType, ProcessModelMetric,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
