use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (angle, distance) point as seen by the host. `distance_cm` is `None`
/// when the embedded side reported a ranging timeout for that angle.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSample {
    pub angle_deg: f64,
    pub distance_cm: Option<f64>,
}

/// Last completed sweep received from the embedded side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepFrame {
    pub points: Vec<PointSample>,
    pub received_at: Option<DateTime<Utc>>,
}

impl SweepFrame {
    pub fn new(points: Vec<PointSample>) -> Self {
        Self {
            points,
            received_at: Some(Utc::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Opaque host-defined command payload. Replaced wholesale on every update,
/// never queued or merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandBuffer(pub Vec<serde_json::Value>);
