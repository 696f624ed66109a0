use std::time::Duration;

use crate::config::ActuatorConfig;

use super::error::ActuatorError;

pub const ANGLE_MIN_DEG: f64 = 0.0;
pub const ANGLE_MAX_DEG: f64 = 180.0;

/// Platform capability: the actuator's position command line. The single
/// operation maps to whatever pulse-width or bus write the platform uses.
pub trait PositionOutput: Send {
    fn set_position_command(&mut self, pulse_width: Duration);
}

/// Single-axis actuator driver. Maps an angle in [0, 180] linearly onto the
/// configured pulse-width range. There is no feedback sensor: after
/// `set_angle` the physical position is only trusted once `settle_delay()`
/// has elapsed.
pub struct ActuatorDriver<P> {
    out: P,
    config: ActuatorConfig,
    last_angle_deg: Option<f64>,
}

impl<P: PositionOutput> ActuatorDriver<P> {
    pub fn new(out: P, config: ActuatorConfig) -> Self {
        Self {
            out,
            config,
            last_angle_deg: None,
        }
    }

    pub fn set_angle(&mut self, angle_deg: f64) -> Result<(), ActuatorError> {
        if !(ANGLE_MIN_DEG..=ANGLE_MAX_DEG).contains(&angle_deg) {
            return Err(ActuatorError::OutOfRange(angle_deg));
        }
        let width = self.pulse_width_for(angle_deg);
        self.out.set_position_command(width);
        self.last_angle_deg = Some(angle_deg);
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.config.settle_ms)
    }

    pub fn last_angle_deg(&self) -> Option<f64> {
        self.last_angle_deg
    }

    fn pulse_width_for(&self, angle_deg: f64) -> Duration {
        let min_us = self.config.min_pulse_us as f64;
        let max_us = self.config.max_pulse_us as f64;
        let width_us = min_us + (angle_deg / ANGLE_MAX_DEG) * (max_us - min_us);
        Duration::from_nanos((width_us * 1_000.0).round() as u64)
    }
}
