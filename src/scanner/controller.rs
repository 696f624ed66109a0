use std::thread;
use std::time::Instant;

use crate::config::{Config, SweepConfig};
use crate::relay::RelayClient;

use super::actuator::{ActuatorDriver, PositionOutput};
use super::error::{RangeError, ScanError};
use super::ranger::{EchoTransceiver, PulseRanger};
use super::sim::{SimEchoTransceiver, SimPositionOutput};
use super::sweep::{Sample, ScanState, SweepBuffer, SweepDirection, SweepPolicy};

/// The sweep state machine. Owns the actuator and the ranger and drives them
/// strictly in sequence: position, settle, range, record. Ranging timeouts
/// are recorded as invalid samples and retried only on the next scheduled
/// step; an out-of-range actuator command is a configuration defect and
/// terminates the controller.
pub struct ScanController<P, T> {
    actuator: ActuatorDriver<P>,
    ranger: PulseRanger<T>,
    config: SweepConfig,
    state: ScanState,
    direction: SweepDirection,
}

impl<P: PositionOutput, T: EchoTransceiver> ScanController<P, T> {
    pub fn new(actuator: ActuatorDriver<P>, ranger: PulseRanger<T>, config: SweepConfig) -> Self {
        Self {
            actuator,
            ranger,
            config,
            state: ScanState::Idle,
            direction: SweepDirection::Forward,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Park at the start bound and enter the first forward pass.
    pub fn start(&mut self) -> Result<(), ScanError> {
        self.actuator.set_angle(self.config.start_deg)?;
        thread::sleep(self.actuator.settle_delay());
        self.direction = SweepDirection::Forward;
        self.state = ScanState::Sweeping {
            direction: self.direction,
            angle_deg: self.config.start_deg,
        };
        Ok(())
    }

    /// Run one directional pass and hand off the completed buffer. Both
    /// bounds are sampled, so a 0..180 sweep in 5° steps yields 37 samples.
    pub fn run_pass(&mut self) -> Result<SweepBuffer, ScanError> {
        let (direction, mut angle_deg) = match self.state {
            ScanState::Sweeping {
                direction,
                angle_deg,
            } => (direction, angle_deg),
            _ => {
                self.start()?;
                (SweepDirection::Forward, self.config.start_deg)
            }
        };

        let mut buffer = SweepBuffer::new();
        loop {
            self.actuator.set_angle(angle_deg)?;
            thread::sleep(self.actuator.settle_delay());

            let distance_cm = match self.ranger.measure() {
                Ok(distance) => Some(distance),
                Err(RangeError::Timeout) => {
                    log::warn!("ranging timeout at {:.1}°", angle_deg);
                    None
                }
            };
            buffer.push(Sample {
                angle_deg,
                distance_cm,
                taken_at: Instant::now(),
            });

            let at_terminal_bound = match direction {
                SweepDirection::Forward => angle_deg >= self.config.end_deg,
                SweepDirection::Return => angle_deg <= self.config.start_deg,
            };
            if at_terminal_bound {
                self.state = ScanState::PassComplete;
                return Ok(buffer);
            }

            angle_deg = match direction {
                SweepDirection::Forward => {
                    (angle_deg + self.config.step_deg).min(self.config.end_deg)
                }
                SweepDirection::Return => {
                    (angle_deg - self.config.step_deg).max(self.config.start_deg)
                }
            };
            self.state = ScanState::Sweeping {
                direction,
                angle_deg,
            };
        }
    }

    /// Re-enter `Sweeping` after a completed pass. `Bidirectional` reverses
    /// in place; `ForwardOnly` repositions to the start bound without
    /// collecting, so nothing is sampled while the previous pass's
    /// transmission may still be in flight.
    pub fn finish_pass(&mut self) -> Result<(), ScanError> {
        match self.config.policy {
            SweepPolicy::Bidirectional => {
                self.direction = self.direction.reversed();
                let angle_deg = match self.direction {
                    SweepDirection::Forward => self.config.start_deg,
                    SweepDirection::Return => self.config.end_deg,
                };
                self.state = ScanState::Sweeping {
                    direction: self.direction,
                    angle_deg,
                };
            }
            SweepPolicy::ForwardOnly => {
                self.actuator.set_angle(self.config.start_deg)?;
                thread::sleep(self.actuator.settle_delay());
                self.direction = SweepDirection::Forward;
                self.state = ScanState::Sweeping {
                    direction: self.direction,
                    angle_deg: self.config.start_deg,
                };
            }
        }
        Ok(())
    }
}

/// The embedded-side loop: sweep, publish, poll for a command, reposition,
/// repeat. Relay failures are logged and discarded; by the time a retry
/// could land, the next pass is already producing fresher data.
pub fn run_scanner(config: &Config) -> Result<(), ScanError> {
    let actuator = ActuatorDriver::new(SimPositionOutput::new(), config.scanner.actuator.clone());
    let ranger = PulseRanger::new(
        SimEchoTransceiver::new(config.scanner.sim.clone()),
        config.scanner.ranger.clone(),
    );
    let mut controller = ScanController::new(actuator, ranger, config.scanner.sweep.clone());
    let relay = RelayClient::new(&config.relay)?;

    controller.start()?;
    log::info!(
        "scan loop started: {}° to {}° step {}°, {} policy",
        config.scanner.sweep.start_deg,
        config.scanner.sweep.end_deg,
        config.scanner.sweep.step_deg,
        config.scanner.sweep.policy
    );

    loop {
        let sweep = controller.run_pass()?;
        log::info!("pass complete: {} samples", sweep.len());

        if let Err(e) = relay.publish_sweep(&sweep) {
            log::warn!("sweep publish failed: {}", e);
        }
        match relay.fetch_command() {
            Ok(Some(command)) => log::info!("received command: {:?}", command),
            Ok(None) => {}
            Err(e) => log::warn!("command fetch failed: {}", e),
        }

        controller.finish_pass()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActuatorConfig, RangerConfig};
    use crate::scanner::Edge;
    use std::time::Duration;

    struct NullOutput;

    impl PositionOutput for NullOutput {
        fn set_position_command(&mut self, _pulse_width: Duration) {}
    }

    /// Constant-distance echo line that can go silent for selected ranging
    /// calls, identified by zero-based call index.
    struct FixedEcho {
        echo: Duration,
        base: Instant,
        calls: usize,
        drop_calls: Vec<usize>,
    }

    impl FixedEcho {
        fn at_150cm() -> Self {
            // 150 cm -> 150 * 2 / 0.0343 ≈ 8746.36 µs round trip
            Self {
                echo: Duration::from_nanos(8_746_356),
                base: Instant::now(),
                calls: 0,
                drop_calls: Vec::new(),
            }
        }

        fn dropping(mut self, calls: Vec<usize>) -> Self {
            self.drop_calls = calls;
            self
        }
    }

    impl EchoTransceiver for FixedEcho {
        fn drive_pulse(&mut self, _width: Duration) {
            self.calls += 1;
        }

        fn read_edge_transition(&mut self, edge: Edge, _timeout: Duration) -> Option<Instant> {
            if self.drop_calls.contains(&(self.calls - 1)) {
                return None;
            }
            match edge {
                Edge::Rising => Some(self.base),
                Edge::Falling => Some(self.base + self.echo),
            }
        }
    }

    fn fast_actuator() -> ActuatorDriver<NullOutput> {
        ActuatorDriver::new(
            NullOutput,
            ActuatorConfig {
                settle_ms: 0,
                ..ActuatorConfig::default()
            },
        )
    }

    fn controller(echo: FixedEcho, policy: SweepPolicy) -> ScanController<NullOutput, FixedEcho> {
        let sweep = SweepConfig {
            policy,
            ..SweepConfig::default()
        };
        ScanController::new(
            fast_actuator(),
            PulseRanger::new(echo, RangerConfig::default()),
            sweep,
        )
    }

    #[test]
    fn full_pass_samples_both_bounds_in_order() {
        let mut controller = controller(FixedEcho::at_150cm(), SweepPolicy::ForwardOnly);
        controller.start().unwrap();
        let sweep = controller.run_pass().unwrap();

        assert!(!sweep.is_empty());
        assert_eq!(sweep.len(), 37);
        for (i, sample) in sweep.samples().iter().enumerate() {
            assert_eq!(sample.angle_deg, i as f64 * 5.0);
            assert_eq!(sample.distance_cm, Some(150.0));
        }
        assert_eq!(controller.state(), ScanState::PassComplete);
    }

    #[test]
    fn run_pass_starts_from_idle() {
        let mut controller = controller(FixedEcho::at_150cm(), SweepPolicy::ForwardOnly);
        assert_eq!(controller.state(), ScanState::Idle);
        let sweep = controller.run_pass().unwrap();
        assert_eq!(sweep.len(), 37);
    }

    #[test]
    fn timeout_recorded_as_invalid_sample_not_dropped() {
        // drop the echo for the 3rd and 5th ranging calls
        let echo = FixedEcho::at_150cm().dropping(vec![2, 4]);
        let mut controller = controller(echo, SweepPolicy::ForwardOnly);
        controller.start().unwrap();
        let sweep = controller.run_pass().unwrap();

        assert_eq!(sweep.len(), 37);
        assert_eq!(sweep.samples()[2].distance_cm, None);
        assert_eq!(sweep.samples()[4].distance_cm, None);
        assert_eq!(sweep.samples()[3].distance_cm, Some(150.0));
    }

    #[test]
    fn forward_only_policy_reparks_forward() {
        let mut controller = controller(FixedEcho::at_150cm(), SweepPolicy::ForwardOnly);
        controller.start().unwrap();
        controller.run_pass().unwrap();
        controller.finish_pass().unwrap();

        assert_eq!(
            controller.state(),
            ScanState::Sweeping {
                direction: SweepDirection::Forward,
                angle_deg: 0.0
            }
        );
        // the re-park itself must not have collected anything: the next
        // pass starts a fresh ascending sweep
        let next = controller.run_pass().unwrap();
        assert_eq!(next.len(), 37);
        assert_eq!(next.samples()[0].angle_deg, 0.0);
    }

    #[test]
    fn bidirectional_policy_collects_on_the_way_back() {
        let mut controller = controller(FixedEcho::at_150cm(), SweepPolicy::Bidirectional);
        controller.start().unwrap();
        controller.run_pass().unwrap();
        controller.finish_pass().unwrap();

        assert_eq!(
            controller.state(),
            ScanState::Sweeping {
                direction: SweepDirection::Return,
                angle_deg: 180.0
            }
        );
        let back = controller.run_pass().unwrap();
        assert_eq!(back.len(), 37);
        assert_eq!(back.samples()[0].angle_deg, 180.0);
        assert_eq!(back.samples()[36].angle_deg, 0.0);
    }

    #[test]
    fn misaligned_step_still_samples_terminal_bound() {
        let echo = FixedEcho::at_150cm();
        let sweep = SweepConfig {
            step_deg: 50.0,
            ..SweepConfig::default()
        };
        let mut controller = ScanController::new(
            fast_actuator(),
            PulseRanger::new(echo, RangerConfig::default()),
            sweep,
        );
        controller.start().unwrap();
        let pass = controller.run_pass().unwrap();
        let angles: Vec<f64> = pass.samples().iter().map(|s| s.angle_deg).collect();
        assert_eq!(angles, vec![0.0, 50.0, 100.0, 150.0, 180.0]);
    }
}
