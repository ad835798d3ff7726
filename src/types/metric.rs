//! Metric record types
//!
//! This module defines the records persisted by the metric store. A metric is
//! an immutable, timestamped event describing execution progress of either a
//! whole process model or a single flow-node instance. Records are written
//! once, at the moment the event occurs, and never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Measurement points at which the workflow engine records a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// A process model execution was started
    ProcessStarted,
    /// A process model execution finished successfully
    ProcessFinished,
    /// A process model execution finished with an error
    ProcessError,
    /// A flow node instance was entered
    OnEnter,
    /// A flow node instance was exited
    OnExit,
    /// A flow node instance raised an error
    OnError,
    /// A flow node instance was suspended
    OnSuspend,
    /// A suspended flow node instance was resumed
    OnResume,
}

impl MetricType {
    /// The exact string form used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::ProcessStarted => "ProcessStarted",
            MetricType::ProcessFinished => "ProcessFinished",
            MetricType::ProcessError => "ProcessError",
            MetricType::OnEnter => "OnEnter",
            MetricType::OnExit => "OnExit",
            MetricType::OnError => "OnError",
            MetricType::OnSuspend => "OnSuspend",
            MetricType::OnResume => "OnResume",
        }
    }

    /// Parse the wire string form back into a measurement point
    ///
    /// Returns `None` for anything outside the enumeration; callers must
    /// treat that as an error, never as a default.
    pub fn parse(raw: &str) -> Option<MetricType> {
        match raw {
            "ProcessStarted" => Some(MetricType::ProcessStarted),
            "ProcessFinished" => Some(MetricType::ProcessFinished),
            "ProcessError" => Some(MetricType::ProcessError),
            "OnEnter" => Some(MetricType::OnEnter),
            "OnExit" => Some(MetricType::OnExit),
            "OnError" => Some(MetricType::OnError),
            "OnSuspend" => Some(MetricType::OnSuspend),
            "OnResume" => Some(MetricType::OnResume),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A metric recorded for a whole process model execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessModelMetric {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// Identifier grouping all activity of one end-to-end execution request
    pub correlation_id: String,

    /// The process model this metric belongs to
    pub process_model_id: String,

    /// The measurement point that produced this metric
    pub metric_type: MetricType,

    /// Optional structured payload; defaults to an empty object
    #[serde(default = "empty_object")]
    pub payload: Value,

    /// Serialized error, present only when the event carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A metric recorded for a single flow-node instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNodeMetric {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// Identifier grouping all activity of one end-to-end execution request
    pub correlation_id: String,

    /// The process model this metric belongs to
    pub process_model_id: String,

    /// The runtime occurrence of the flow node
    pub flow_node_instance_id: String,

    /// The flow node within the process model definition
    pub flow_node_id: String,

    /// The measurement point that produced this metric
    pub metric_type: MetricType,

    /// Serialized process-token snapshot at the time of the event
    pub token: Value,

    /// Serialized error, present only when the event carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// One record in the append-only metric log
///
/// The two variants share the correlation/process-model identity; the
/// flow-node variant additionally pins the record to one flow-node instance
/// and carries a token snapshot. The variant is encoded on the wire as a
/// leading type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    /// Flow-node level metric (listed first so untagged JSON decoding
    /// matches the variant with the larger required field set)
    FlowNode(FlowNodeMetric),
    /// Process-model level metric
    ProcessModel(ProcessModelMetric),
}

impl Metric {
    /// The process model this record belongs to
    pub fn process_model_id(&self) -> &str {
        match self {
            Metric::ProcessModel(m) => &m.process_model_id,
            Metric::FlowNode(m) => &m.process_model_id,
        }
    }

    /// The correlation this record belongs to
    pub fn correlation_id(&self) -> &str {
        match self {
            Metric::ProcessModel(m) => &m.correlation_id,
            Metric::FlowNode(m) => &m.correlation_id,
        }
    }

    /// The measurement point that produced this record
    pub fn metric_type(&self) -> MetricType {
        match self {
            Metric::ProcessModel(m) => m.metric_type,
            Metric::FlowNode(m) => m.metric_type,
        }
    }

    /// When the event occurred
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Metric::ProcessModel(m) => m.timestamp,
            Metric::FlowNode(m) => m.timestamp,
        }
    }

    /// The serialized error, if the event carried one
    pub fn error(&self) -> Option<&Value> {
        match self {
            Metric::ProcessModel(m) => m.error.as_ref(),
            Metric::FlowNode(m) => m.error.as_ref(),
        }
    }

    /// Whether this is a flow-node level record
    pub fn is_flow_node(&self) -> bool {
        matches!(self, Metric::FlowNode(_))
    }
}

impl ProcessModelMetric {
    /// Create a process-model metric with an empty payload and no error
    pub fn new(
        correlation_id: String,
        process_model_id: String,
        metric_type: MetricType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            correlation_id,
            process_model_id,
            metric_type,
            payload: empty_object(),
            error: None,
        }
    }

    /// Attach a serialized error to the metric
    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }
}

impl FlowNodeMetric {
    /// Create a flow-node metric carrying the given token snapshot
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        correlation_id: String,
        process_model_id: String,
        flow_node_instance_id: String,
        flow_node_id: String,
        metric_type: MetricType,
        token: Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            correlation_id,
            process_model_id,
            flow_node_instance_id,
            flow_node_id,
            metric_type,
            token,
            error: None,
        }
    }

    /// Attach a serialized error to the metric
    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_type_round_trip() {
        for metric_type in [
            MetricType::ProcessStarted,
            MetricType::ProcessFinished,
            MetricType::ProcessError,
            MetricType::OnEnter,
            MetricType::OnExit,
            MetricType::OnError,
            MetricType::OnSuspend,
            MetricType::OnResume,
        ] {
            let parsed = MetricType::parse(metric_type.as_str());
            assert_eq!(parsed, Some(metric_type));
        }
    }

    #[test]
    fn test_metric_type_unknown_is_none() {
        assert_eq!(MetricType::parse("onEnter"), None);
        assert_eq!(MetricType::parse(""), None);
        assert_eq!(MetricType::parse("Started"), None);
    }

    #[test]
    fn test_process_model_metric_serialization() {
        let metric = ProcessModelMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            MetricType::ProcessStarted,
            Utc::now(),
        );

        let json = serde_json::to_string(&metric).unwrap();
        assert!(json.contains("\"correlationId\":\"corr-1\""));
        assert!(json.contains("\"processModelId\":\"pm-1\""));
        assert!(json.contains("\"metricType\":\"ProcessStarted\""));
        // No error was attached, so the field is omitted entirely.
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_untagged_metric_deserialization_picks_variant() {
        let flow_node = Metric::FlowNode(FlowNodeMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            "fni-1".to_string(),
            "fn-1".to_string(),
            MetricType::OnEnter,
            json!({"value": 1}),
            Utc::now(),
        ));

        let json = serde_json::to_string(&flow_node).unwrap();
        let parsed: Metric = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_flow_node());

        let process_model = Metric::ProcessModel(ProcessModelMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            MetricType::ProcessStarted,
            Utc::now(),
        ));

        let json = serde_json::to_string(&process_model).unwrap();
        let parsed: Metric = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_flow_node());
    }

    #[test]
    fn test_with_error_sets_error_field() {
        let metric = ProcessModelMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            MetricType::ProcessError,
            Utc::now(),
        )
        .with_error(json!({"message": "boom"}));

        assert_eq!(metric.error, Some(json!({"message": "boom"})));
    }
}
