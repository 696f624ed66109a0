use serde::Deserialize;
use thiserror::Error;

use crate::scanner::SweepPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
    #[serde(default)]
    pub ranger: RangerConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_start_deg")]
    pub start_deg: f64,
    #[serde(default = "default_end_deg")]
    pub end_deg: f64,
    #[serde(default = "default_step_deg")]
    pub step_deg: f64,
    #[serde(default = "default_policy")]
    pub policy: SweepPolicy,
}

fn default_start_deg() -> f64 {
    0.0
}

fn default_end_deg() -> f64 {
    180.0
}

fn default_step_deg() -> f64 {
    5.0
}

fn default_policy() -> SweepPolicy {
    SweepPolicy::ForwardOnly
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_deg: default_start_deg(),
            end_deg: default_end_deg(),
            step_deg: default_step_deg(),
            policy: default_policy(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default = "default_min_pulse_us")]
    pub min_pulse_us: u64,
    #[serde(default = "default_max_pulse_us")]
    pub max_pulse_us: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_min_pulse_us() -> u64 {
    500
}

fn default_max_pulse_us() -> u64 {
    2500
}

fn default_settle_ms() -> u64 {
    20
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: default_min_pulse_us(),
            max_pulse_us: default_max_pulse_us(),
            settle_ms: default_settle_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangerConfig {
    #[serde(default = "default_trigger_pulse_us")]
    pub trigger_pulse_us: u64,
    #[serde(default = "default_echo_timeout_ms")]
    pub echo_timeout_ms: u64,
    #[serde(default = "default_max_range_cm")]
    pub max_range_cm: f64,
}

fn default_trigger_pulse_us() -> u64 {
    10
}

fn default_echo_timeout_ms() -> u64 {
    200
}

fn default_max_range_cm() -> f64 {
    500.0
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            trigger_pulse_us: default_trigger_pulse_us(),
            echo_timeout_ms: default_echo_timeout_ms(),
            max_range_cm: default_max_range_cm(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_wall_distance_cm")]
    pub wall_distance_cm: f64,
    #[serde(default)]
    pub dropout_period: Option<u64>,
}

fn default_wall_distance_cm() -> f64 {
    150.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wall_distance_cm: default_wall_distance_cm(),
            dropout_period: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_host() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl RelayConfig {
    pub fn sweep_url(&self) -> String {
        format!("{}/pico_data", self.host.trim_end_matches('/'))
    }

    pub fn command_url(&self) -> String {
        format!("{}/get_rpi_data", self.host.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
