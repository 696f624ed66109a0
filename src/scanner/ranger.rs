use std::time::{Duration, Instant};

use crate::config::RangerConfig;

use super::error::RangeError;

pub const SOUND_SPEED_CM_PER_US: f64 = 0.0343;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Platform capability: the ranging trigger output and echo input lines.
/// Both operations block the calling thread; `read_edge_transition` returns
/// `None` once `timeout` elapses without the requested transition.
pub trait EchoTransceiver: Send {
    /// Hold the trigger line active for `width` after a quiescent period.
    fn drive_pulse(&mut self, width: Duration);
    fn read_edge_transition(&mut self, edge: Edge, timeout: Duration) -> Option<Instant>;
}

/// Pulse-echo ranger. One `measure` call fires the trigger, times the echo
/// pulse and converts it to centimeters. Blocks the caller for up to twice
/// the configured echo timeout; never call it from a context that cannot
/// tolerate that.
pub struct PulseRanger<T> {
    io: T,
    config: RangerConfig,
}

impl<T: EchoTransceiver> PulseRanger<T> {
    pub fn new(io: T, config: RangerConfig) -> Self {
        Self { io, config }
    }

    /// Fire one ranging pulse. A missing edge within the timeout yields
    /// `RangeError::Timeout`, never a stale or zero distance. Readings are
    /// rounded to two decimals and clamped to the configured maximum range.
    pub fn measure(&mut self) -> Result<f64, RangeError> {
        let timeout = Duration::from_millis(self.config.echo_timeout_ms);
        self.io
            .drive_pulse(Duration::from_micros(self.config.trigger_pulse_us));

        let pulse_start = self
            .io
            .read_edge_transition(Edge::Rising, timeout)
            .ok_or(RangeError::Timeout)?;
        let pulse_end = self
            .io
            .read_edge_transition(Edge::Falling, timeout)
            .ok_or(RangeError::Timeout)?;

        // The echo time covers the round trip, hence the division by two.
        let echo_us = pulse_end.duration_since(pulse_start).as_secs_f64() * 1_000_000.0;
        let distance_cm = (echo_us * SOUND_SPEED_CM_PER_US) / 2.0;
        let distance_cm = (distance_cm * 100.0).round() / 100.0;
        Ok(distance_cm.min(self.config.max_range_cm))
    }
}
