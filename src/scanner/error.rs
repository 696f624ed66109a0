use thiserror::Error;

use crate::relay::RelayError;

#[derive(Debug, Error, PartialEq)]
pub enum ActuatorError {
    #[error("angle {0}° outside [0, 180]")]
    OutOfRange(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum RangeError {
    #[error("no echo edge within timeout")]
    Timeout,
}

/// Fatal scan-loop errors. Ranging timeouts are not here on purpose: they
/// are recorded as invalid samples and the sweep continues.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("actuator fault: {0}")]
    Actuator(#[from] ActuatorError),
    #[error("relay setup failed: {0}")]
    RelaySetup(#[from] RelayError),
}
