use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use crate::scanner::SweepBuffer;
use crate::telemetry::{CommandBuffer, PointSample, SweepFrame};

/// Wire marker for a sample whose ranging call timed out.
pub const INVALID_DISTANCE: f64 = -1.0;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("invalid format, expected {{\"{0}\": list}}")]
    ExpectedList(&'static str),
    #[error("\"sensor data\" entries must be [angle, distance] number pairs")]
    MalformedPair,
}

/// Sweep payload POSTed to the host: `{"sensor data": [[angle, cm], ...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SweepPayload {
    #[serde(rename = "sensor data")]
    pub samples: Vec<Vec<f64>>,
}

impl SweepPayload {
    pub fn from_sweep(sweep: &SweepBuffer) -> Self {
        let samples = sweep
            .samples()
            .iter()
            .map(|s| vec![s.angle_deg, s.distance_cm.unwrap_or(INVALID_DISTANCE)])
            .collect();
        Self { samples }
    }
}

/// Command list served to the embedded side: `{"rpi_data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommandEnvelope {
    pub rpi_data: Vec<Value>,
}

/// Host-control update body: `{"new_data": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommandUpdate {
    pub new_data: Vec<Value>,
}

/// Validate an inbound sweep payload: the `"sensor data"` field must hold an
/// array of `[angle, distance]` number pairs. A negative distance is the
/// no-reading sentinel and maps to `None`.
pub fn parse_sweep(value: &Value) -> Result<SweepFrame, PayloadError> {
    let entries = value
        .get("sensor data")
        .and_then(Value::as_array)
        .ok_or(PayloadError::ExpectedList("sensor data"))?;

    let mut points = Vec::with_capacity(entries.len());
    for entry in entries {
        let pair = entry
            .as_array()
            .filter(|p| p.len() == 2)
            .ok_or(PayloadError::MalformedPair)?;
        let angle_deg = pair[0].as_f64().ok_or(PayloadError::MalformedPair)?;
        let distance = pair[1].as_f64().ok_or(PayloadError::MalformedPair)?;
        points.push(PointSample {
            angle_deg,
            distance_cm: (distance >= 0.0).then_some(distance),
        });
    }
    Ok(SweepFrame::new(points))
}

/// Validate a host-control update: the `"new_data"` field must hold a list.
/// Its elements stay opaque.
pub fn parse_command(value: &Value) -> Result<CommandBuffer, PayloadError> {
    let entries = value
        .get("new_data")
        .and_then(Value::as_array)
        .ok_or(PayloadError::ExpectedList("new_data"))?;
    Ok(CommandBuffer(entries.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Sample;
    use serde_json::json;
    use std::time::Instant;

    fn sweep_with(samples: Vec<(f64, Option<f64>)>) -> SweepBuffer {
        let mut sweep = SweepBuffer::new();
        for (angle_deg, distance_cm) in samples {
            sweep.push(Sample {
                angle_deg,
                distance_cm,
                taken_at: Instant::now(),
            });
        }
        sweep
    }

    #[test]
    fn timeout_samples_cross_the_wire_as_sentinel() {
        let sweep = sweep_with(vec![(0.0, Some(17.15)), (5.0, None)]);
        let payload = SweepPayload::from_sweep(&sweep);
        assert_eq!(payload.samples, vec![vec![0.0, 17.15], vec![5.0, -1.0]]);
    }

    #[test]
    fn payload_serializes_under_the_sensor_data_key() {
        let sweep = sweep_with(vec![(0.0, Some(100.0))]);
        let json = serde_json::to_value(SweepPayload::from_sweep(&sweep)).unwrap();
        assert_eq!(json, json!({ "sensor data": [[0.0, 100.0]] }));
    }

    #[test]
    fn parse_sweep_maps_sentinel_back_to_none() {
        let frame = parse_sweep(&json!({ "sensor data": [[0.0, 150.0], [5.0, -1.0]] })).unwrap();
        assert_eq!(frame.points[0].distance_cm, Some(150.0));
        assert_eq!(frame.points[1].distance_cm, None);
        assert_eq!(frame.points[1].angle_deg, 5.0);
    }

    #[test]
    fn parse_sweep_rejects_missing_field() {
        assert_eq!(
            parse_sweep(&json!({ "data": [] })),
            Err(PayloadError::ExpectedList("sensor data"))
        );
    }

    #[test]
    fn parse_sweep_rejects_malformed_pairs() {
        assert_eq!(
            parse_sweep(&json!({ "sensor data": [[0.0, 1.0, 2.0]] })),
            Err(PayloadError::MalformedPair)
        );
        assert_eq!(
            parse_sweep(&json!({ "sensor data": [["a", 1.0]] })),
            Err(PayloadError::MalformedPair)
        );
    }

    #[test]
    fn parse_command_accepts_any_list() {
        let cmd = parse_command(&json!({ "new_data": [10, "park", [1, 2]] })).unwrap();
        assert_eq!(cmd.0.len(), 3);
    }

    #[test]
    fn parse_command_rejects_non_list() {
        assert_eq!(
            parse_command(&json!({ "new_data": 42 })),
            Err(PayloadError::ExpectedList("new_data"))
        );
        assert_eq!(
            parse_command(&json!({})),
            Err(PayloadError::ExpectedList("new_data"))
        );
    }
}
