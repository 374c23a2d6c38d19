//! TOML-based configuration for the CAVP host.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use cavp_protocol::SessionConfig;

use crate::error::HostError;

/// Top-level host configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub serial: SerialSection,
    #[serde(default)]
    pub protocol: ProtocolSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("failed to read config file: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| HostError::Config(format!("failed to parse config: {e}")))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, HostError> {
        toml::from_str(s).map_err(|e| HostError::Config(format!("failed to parse config: {e}")))
    }
}

/// The `[serial]` section.
#[derive(Debug, Deserialize)]
pub struct SerialSection {
    #[serde(default = "default_baud")]
    pub baud: u32,
}

fn default_baud() -> u32 {
    115200
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            baud: default_baud(),
        }
    }
}

/// The `[protocol]` section: timing and retry budget of the handshake.
#[derive(Debug, Deserialize)]
pub struct ProtocolSection {
    /// Wait for the target's readiness announcement, in milliseconds.
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
    /// Per-acknowledgement wait before a step is resent, in milliseconds.
    #[serde(default = "default_ack_timeout_ms")]
    pub ack_timeout_ms: u64,
    /// Wait for a vector's full response stream, in milliseconds. Monte
    /// Carlo vectors keep the target busy for a long time.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
    /// Resends of a step before its timeout becomes fatal.
    #[serde(default = "default_step_retries")]
    pub step_retries: u32,
}

fn default_startup_timeout_ms() -> u64 {
    30_000
}

fn default_ack_timeout_ms() -> u64 {
    2_000
}

fn default_response_timeout_ms() -> u64 {
    120_000
}

fn default_step_retries() -> u32 {
    3
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            startup_timeout_ms: default_startup_timeout_ms(),
            ack_timeout_ms: default_ack_timeout_ms(),
            response_timeout_ms: default_response_timeout_ms(),
            step_retries: default_step_retries(),
        }
    }
}

impl ProtocolSection {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            startup_timeout: Duration::from_millis(self.startup_timeout_ms),
            ack_timeout: Duration::from_millis(self.ack_timeout_ms),
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            step_retries: self.step_retries,
        }
    }
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
