//! Line codec for the append-only metric log
//!
//! One metric record is one line of text: fields joined by semicolons, with
//! a leading type tag selecting the record variant. The payload, token, and
//! error fields embed compact JSON; to keep that sub-encoding from colliding
//! with the outer delimiter, every field is escaped on encode and the decoder
//! splits on unescaped semicolons only.
//!
//! # Wire format
//!
//! ```text
//! ProcessModel;<ts>;<correlationId>;<processModelId>;;;<metricType>;<payload>[;<error>]
//! FlowNodeInstance;<ts>;<correlationId>;<processModelId>;<fnInstanceId>;<fnId>;<metricType>;<token>[;<error>]
//! ```
//!
//! Timestamps are RFC 3339. Encoding never emits a raw newline inside a
//! field, and `encode` returns the line without a trailing newline; the
//! append primitive adds exactly one.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::{FlowNodeMetric, Metric, MetricStoreError, MetricStoreResult, MetricType, ProcessModelMetric};

/// Field delimiter of the on-disk format
pub const DELIMITER: char = ';';

const DELIMITER_STR: &str = ";";

/// Type tag of the process-model variant
pub const PROCESS_MODEL_TAG: &str = "ProcessModel";

/// Type tag of the flow-node variant
pub const FLOW_NODE_TAG: &str = "FlowNodeInstance";

// Both variants encode to 8 fields, 9 when an error is attached.
const FIELD_COUNT: usize = 8;
const FIELD_COUNT_WITH_ERROR: usize = 9;

/// Encode a metric record into one delimited line (no trailing newline)
pub fn encode(metric: &Metric) -> MetricStoreResult<String> {
    let mut fields: Vec<String> = Vec::with_capacity(FIELD_COUNT_WITH_ERROR);

    match metric {
        Metric::ProcessModel(m) => {
            fields.push(PROCESS_MODEL_TAG.to_string());
            fields.push(m.timestamp.to_rfc3339());
            fields.push(m.correlation_id.clone());
            fields.push(m.process_model_id.clone());
            fields.push(String::new());
            fields.push(String::new());
            fields.push(m.metric_type.as_str().to_string());
            fields.push(serde_json::to_string(&m.payload)?);
            if let Some(error) = &m.error {
                fields.push(serde_json::to_string(error)?);
            }
        }
        Metric::FlowNode(m) => {
            fields.push(FLOW_NODE_TAG.to_string());
            fields.push(m.timestamp.to_rfc3339());
            fields.push(m.correlation_id.clone());
            fields.push(m.process_model_id.clone());
            fields.push(m.flow_node_instance_id.clone());
            fields.push(m.flow_node_id.clone());
            fields.push(m.metric_type.as_str().to_string());
            fields.push(serde_json::to_string(&m.token)?);
            if let Some(error) = &m.error {
                fields.push(serde_json::to_string(error)?);
            }
        }
    }

    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    Ok(escaped.join(DELIMITER_STR))
}

/// Decode one delimited line back into a metric record
///
/// Either returns a complete record or fails; partial records are never
/// produced, and the input is not mutated.
pub fn decode(line: &str) -> MetricStoreResult<Metric> {
    let fields = split_fields(line);

    if fields.len() != FIELD_COUNT && fields.len() != FIELD_COUNT_WITH_ERROR {
        return Err(MetricStoreError::MalformedRecord(format!(
            "expected {} or {} fields, found {}",
            FIELD_COUNT,
            FIELD_COUNT_WITH_ERROR,
            fields.len()
        )));
    }

    let tag = fields[0].as_str();
    if tag != PROCESS_MODEL_TAG && tag != FLOW_NODE_TAG {
        return Err(MetricStoreError::MalformedRecord(format!(
            "unknown record tag {:?}",
            tag
        )));
    }

    let timestamp = parse_timestamp(&fields[1])?;
    let metric_type = MetricType::parse(&fields[6])
        .ok_or_else(|| MetricStoreError::UnknownMetricType(fields[6].clone()))?;
    let error = match fields.get(FIELD_COUNT) {
        Some(raw) => Some(parse_json_field(raw)?),
        None => None,
    };

    if tag == PROCESS_MODEL_TAG {
        Ok(Metric::ProcessModel(ProcessModelMetric {
            timestamp,
            correlation_id: fields[2].clone(),
            process_model_id: fields[3].clone(),
            metric_type,
            payload: parse_optional_json_field(&fields[7])?,
            error,
        }))
    } else {
        Ok(Metric::FlowNode(FlowNodeMetric {
            timestamp,
            correlation_id: fields[2].clone(),
            process_model_id: fields[3].clone(),
            flow_node_instance_id: fields[4].clone(),
            flow_node_id: fields[5].clone(),
            metric_type,
            token: parse_json_field(&fields[7])?,
            error,
        }))
    }
}

fn parse_timestamp(raw: &str) -> MetricStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| MetricStoreError::MalformedTimestamp(raw.to_string()))
}

fn parse_json_field(raw: &str) -> MetricStoreResult<Value> {
    Ok(serde_json::from_str(raw)?)
}

/// An empty payload field decodes to the default empty object.
fn parse_optional_json_field(raw: &str) -> MetricStoreResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    parse_json_field(raw)
}

/// Escape the delimiter, backslashes, and line breaks within a field
fn escape_field(field: &str) -> String {
    let mut escaped = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Split a line on unescaped delimiters, unescaping each field
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some('\\') => current.push('\\'),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                // Unknown escape: keep the character as-is.
                Some(other) => current.push(other),
                None => current.push('\\'),
            },
            ';' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn test_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    fn process_model_metric() -> Metric {
        Metric::ProcessModel(ProcessModelMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            MetricType::ProcessStarted,
            test_timestamp(),
        ))
    }

    fn flow_node_metric() -> Metric {
        Metric::FlowNode(FlowNodeMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            "fni-1".to_string(),
            "fn-1".to_string(),
            MetricType::OnEnter,
            json!({"current_value": 42}),
            test_timestamp(),
        ))
    }

    #[test]
    fn test_process_model_round_trip() {
        let metric = process_model_metric();
        let line = encode(&metric).unwrap();
        let decoded = decode(&line).unwrap();
        assert_eq!(decoded, metric);
    }

    #[test]
    fn test_flow_node_round_trip() {
        let metric = flow_node_metric();
        let line = encode(&metric).unwrap();
        let decoded = decode(&line).unwrap();
        assert_eq!(decoded, metric);
    }

    #[test]
    fn test_round_trip_with_error_field() {
        let metric = Metric::ProcessModel(
            ProcessModelMetric::new(
                "corr-1".to_string(),
                "pm-1".to_string(),
                MetricType::ProcessError,
                test_timestamp(),
            )
            .with_error(json!({"message": "boom", "code": 500})),
        );

        let line = encode(&metric).unwrap();
        let decoded = decode(&line).unwrap();
        assert_eq!(decoded, metric);
        assert!(decoded.error().is_some());
    }

    #[test]
    fn test_encode_is_idempotent_through_decode() {
        let metric = flow_node_metric();
        let line = encode(&metric).unwrap();
        let reencoded = encode(&decode(&line).unwrap()).unwrap();
        assert_eq!(line, reencoded);
    }

    #[test]
    fn test_encoded_line_layout() {
        let line = encode(&process_model_metric()).unwrap();
        assert!(line.starts_with("ProcessModel;"));
        assert!(line.ends_with(";ProcessStarted;{}"));
        assert!(!line.contains('\n'));

        let line = encode(&flow_node_metric()).unwrap();
        assert!(line.starts_with("FlowNodeInstance;"));
        assert!(line.contains(";fni-1;fn-1;OnEnter;"));
    }

    #[test]
    fn test_delimiter_inside_token_survives_round_trip() {
        let metric = Metric::FlowNode(FlowNodeMetric::new(
            "corr-1".to_string(),
            "pm-1".to_string(),
            "fni-1".to_string(),
            "fn-1".to_string(),
            MetricType::OnExit,
            json!({"note": "a;b;c", "multi": "line1\nline2"}),
            test_timestamp(),
        ));

        let line = encode(&metric).unwrap();
        // The raw line must stay a single line with exactly 8 fields.
        assert!(!line.contains('\n'));
        assert_eq!(split_fields(&line).len(), 8);

        let decoded = decode(&line).unwrap();
        assert_eq!(decoded, metric);
    }

    #[test]
    fn test_unknown_metric_type_fails() {
        let line = encode(&process_model_metric())
            .unwrap()
            .replace("ProcessStarted", "SomethingElse");

        match decode(&line) {
            Err(MetricStoreError::UnknownMetricType(raw)) => assert_eq!(raw, "SomethingElse"),
            other => panic!("expected UnknownMetricType, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let line = "ProcessModel;not-a-date;corr-1;pm-1;;;ProcessStarted;{}";
        match decode(line) {
            Err(MetricStoreError::MalformedTimestamp(raw)) => assert_eq!(raw, "not-a-date"),
            other => panic!("expected MalformedTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_payload_fails() {
        let line = "FlowNodeInstance;2024-03-15T10:30:00+00:00;corr-1;pm-1;fni-1;fn-1;OnEnter;{not json";
        assert!(matches!(
            decode(line),
            Err(MetricStoreError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_unknown_tag_fails() {
        let line = "SomeOtherTag;2024-03-15T10:30:00+00:00;corr-1;pm-1;;;ProcessStarted;{}";
        assert!(matches!(
            decode(line),
            Err(MetricStoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_wrong_field_count_fails() {
        assert!(matches!(
            decode("ProcessModel;2024-03-15T10:30:00+00:00;corr-1"),
            Err(MetricStoreError::MalformedRecord(_))
        ));
        assert!(matches!(
            decode(""),
            Err(MetricStoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_empty_payload_field_decodes_to_empty_object() {
        let line = "ProcessModel;2024-03-15T10:30:00+00:00;corr-1;pm-1;;;ProcessStarted;";
        let decoded = decode(line).unwrap();
        match decoded {
            Metric::ProcessModel(m) => assert_eq!(m.payload, json!({})),
            _ => panic!("expected process-model variant"),
        }
    }
}
