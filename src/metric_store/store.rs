//! Metric store - append/read API over the on-disk metric log
//!
//! The store maps a process-model id to its `.met` file under the configured
//! output root, appends encoded records to it, and streams the whole file
//! back through the codec on read. Records are never cached; every read
//! re-parses from disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec;
use crate::metric_store::fs_adapter;
use crate::types::{FlowNodeMetric, Metric, MetricStoreResult, MetricType, ProcessModelMetric};

/// File extension of metric log files
pub const METRIC_FILE_EXTENSION: &str = "met";

/// Configuration for the metric store
///
/// An explicit, immutable value passed at construction; the store holds no
/// process-wide mutable configuration.
#[derive(Debug, Clone)]
pub struct MetricStoreConfig {
    /// Root directory that metric files are written under
    pub output_path: PathBuf,
}

impl MetricStoreConfig {
    /// Create a config with the given output root
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Get the output root directory
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Get the path of the metric file for a process model id
    pub fn metric_file_path(&self, process_model_id: &str) -> PathBuf {
        self.output_path
            .join(format!("{}.{}", process_model_id, METRIC_FILE_EXTENSION))
    }
}

/// Repository for workflow execution metrics
///
/// One file per process-model id; each write appends exactly one encoded
/// line, each read returns the file's records in write order. Sequential
/// awaited writes to the same id are observed in issue order; callers that
/// write to one id concurrently must serialize those writes themselves.
pub struct MetricsRepository {
    config: MetricStoreConfig,
}

impl MetricsRepository {
    /// Create a repository writing under the configured output root
    pub fn with_config(config: MetricStoreConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &MetricStoreConfig {
        &self.config
    }

    /// Record a metric for a process model execution
    pub async fn write_metric_for_process_model(
        &self,
        correlation_id: &str,
        process_model_id: &str,
        metric_type: MetricType,
        timestamp: DateTime<Utc>,
        error: Option<Value>,
    ) -> MetricStoreResult<()> {
        let mut metric = ProcessModelMetric::new(
            correlation_id.to_string(),
            process_model_id.to_string(),
            metric_type,
            timestamp,
        );
        if let Some(error) = error {
            metric = metric.with_error(error);
        }

        self.append_metric(process_model_id, &Metric::ProcessModel(metric))
            .await
    }

    /// Record a metric for a flow-node instance, with its token snapshot
    #[allow(clippy::too_many_arguments)]
    pub async fn write_metric_for_flow_node(
        &self,
        correlation_id: &str,
        process_model_id: &str,
        flow_node_instance_id: &str,
        flow_node_id: &str,
        metric_type: MetricType,
        token: Value,
        timestamp: DateTime<Utc>,
        error: Option<Value>,
    ) -> MetricStoreResult<()> {
        let mut metric = FlowNodeMetric::new(
            correlation_id.to_string(),
            process_model_id.to_string(),
            flow_node_instance_id.to_string(),
            flow_node_id.to_string(),
            metric_type,
            token,
            timestamp,
        );
        if let Some(error) = error {
            metric = metric.with_error(error);
        }

        self.append_metric(process_model_id, &Metric::FlowNode(metric))
            .await
    }

    /// Read all metrics recorded for a process model, in write order
    ///
    /// A process model without any recorded metrics yields an empty vec,
    /// not an error.
    pub async fn read_metrics_for_process_model(
        &self,
        process_model_id: &str,
    ) -> MetricStoreResult<Vec<Metric>> {
        let metric_file_path = self.config.metric_file_path(process_model_id);

        if !fs_adapter::target_exists(&metric_file_path).await {
            return Ok(Vec::new());
        }

        fs_adapter::read_and_parse_file(&metric_file_path).await
    }

    /// Read the metrics of every process model under the output root
    pub async fn read_all_metrics(&self) -> MetricStoreResult<Vec<Metric>> {
        if !fs_adapter::target_exists(self.config.output_path()).await {
            return Ok(Vec::new());
        }

        fs_adapter::read_and_parse_directory(self.config.output_path(), METRIC_FILE_EXTENSION)
            .await
    }

    /// Encode a record and append it to the file of its process model
    async fn append_metric(&self, process_model_id: &str, metric: &Metric) -> MetricStoreResult<()> {
        let metric_file_path = self.config.metric_file_path(process_model_id);
        let line = codec::encode(metric)?;

        fs_adapter::ensure_directory_exists(&metric_file_path).await?;
        fs_adapter::append_line(&metric_file_path, &line).await
    }
}
