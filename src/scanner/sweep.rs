use std::time::Instant;

use serde::Deserialize;

/// One angle/distance sample. `distance_cm` is `None` when the ranging call
/// timed out at this angle; the sample is still recorded so the sweep keeps
/// one entry per visited angle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub angle_deg: f64,
    pub distance_cm: Option<f64>,
    pub taken_at: Instant,
}

/// Ordered samples for a single pass. Created empty when the pass starts,
/// appended monotonically, handed off by value once the pass reaches its
/// terminal bound.
#[derive(Debug, Clone, Default)]
pub struct SweepBuffer {
    samples: Vec<Sample>,
}

impl SweepBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SweepDirection {
    #[strum(serialize = "forward")]
    Forward,
    #[strum(serialize = "return")]
    Return,
}

impl SweepDirection {
    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Forward => SweepDirection::Return,
            SweepDirection::Return => SweepDirection::Forward,
        }
    }
}

/// Whether the return traversal collects samples too, or only repositions.
/// `ForwardOnly` guarantees no sample collection overlaps the transmission
/// of the previous pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    #[strum(serialize = "forward_only")]
    ForwardOnly,
    #[strum(serialize = "bidirectional")]
    Bidirectional,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanState {
    Idle,
    Sweeping {
        direction: SweepDirection,
        angle_deg: f64,
    },
    PassComplete,
}
