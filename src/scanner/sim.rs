use std::time::{Duration, Instant};

use crate::config::SimConfig;

use super::actuator::PositionOutput;
use super::ranger::{Edge, EchoTransceiver, SOUND_SPEED_CM_PER_US};

/// Position line that only records what it was told. Stands in for a real
/// PWM output on platforms without one.
#[derive(Debug, Default)]
pub struct SimPositionOutput {
    last_pulse: Option<Duration>,
}

impl SimPositionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_pulse(&self) -> Option<Duration> {
        self.last_pulse
    }
}

impl PositionOutput for SimPositionOutput {
    fn set_position_command(&mut self, pulse_width: Duration) {
        self.last_pulse = Some(pulse_width);
    }
}

/// Simulated echo line: a flat wall at a fixed distance, with an optional
/// periodic dropout (every Nth ping goes unanswered) to exercise the
/// timeout path.
#[derive(Debug)]
pub struct SimEchoTransceiver {
    config: SimConfig,
    pings: u64,
    pulse_started: Option<Instant>,
}

impl SimEchoTransceiver {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            pings: 0,
            pulse_started: None,
        }
    }

    fn echo_duration(&self) -> Duration {
        let round_trip_us = self.config.wall_distance_cm * 2.0 / SOUND_SPEED_CM_PER_US;
        Duration::from_nanos((round_trip_us * 1_000.0).round() as u64)
    }

    fn dropped(&self) -> bool {
        match self.config.dropout_period {
            Some(period) if period > 0 => self.pings % period == 0,
            _ => false,
        }
    }
}

impl EchoTransceiver for SimEchoTransceiver {
    fn drive_pulse(&mut self, _width: Duration) {
        self.pings += 1;
        self.pulse_started = None;
    }

    fn read_edge_transition(&mut self, edge: Edge, _timeout: Duration) -> Option<Instant> {
        if self.dropped() {
            return None;
        }
        match edge {
            Edge::Rising => {
                let now = Instant::now();
                self.pulse_started = Some(now);
                Some(now)
            }
            Edge::Falling => self.pulse_started.map(|start| start + self.echo_duration()),
        }
    }
}
