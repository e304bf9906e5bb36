//! TOML configuration, grounded on `statime-linux`'s `Config`/`PortConfig`
//! split: a shared instance-wide section plus one `[[port]]` table per port.

use std::path::Path;

use ptp_core::config::{ClockIdentity, DelayMechanism};
use serde::{Deserialize, Deserializer};

use crate::logging::LogLevel;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub loglevel: LogLevel,
    #[serde(default = "default_domain")]
    pub domain: u8,
    #[serde(default, deserialize_with = "deserialize_clock_identity")]
    pub identity: Option<ClockIdentity>,
    #[serde(default = "default_priority")]
    pub priority1: u8,
    #[serde(default = "default_priority")]
    pub priority2: u8,
    #[serde(rename = "port")]
    pub ports: Vec<PortConfig>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PortConfig {
    #[serde(default = "default_announce_interval")]
    pub announce_interval: i8,
    #[serde(default = "default_sync_interval")]
    pub sync_interval: i8,
    #[serde(default = "default_announce_receipt_timeout")]
    pub announce_receipt_timeout: u8,
    #[serde(default)]
    pub master_only: bool,
    #[serde(default)]
    pub delay_asymmetry_nanos: i64,
    #[serde(default = "default_delay_interval")]
    pub delay_interval: i8,
}

impl PortConfig {
    /// The port settings the loopback demo runs with when no config file is
    /// given, matching `default_*`'s values above.
    pub fn default_demo() -> Self {
        Self {
            announce_interval: default_announce_interval(),
            sync_interval: default_sync_interval(),
            announce_receipt_timeout: default_announce_receipt_timeout(),
            master_only: false,
            delay_asymmetry_nanos: 0,
            delay_interval: default_delay_interval(),
        }
    }

    /// Converts a parsed table into the engine's own config type, which
    /// needs the full port identity (clock identity + this port's number)
    /// rather than the instance-wide identity this table is merged with.
    pub fn into_engine_config(self, port_identity: ptp_core::datastructures::common::PortIdentity) -> ptp_core::config::PortConfig {
        ptp_core::config::PortConfig {
            port_identity,
            delay_mechanism: DelayMechanism::E2E { log_interval: self.delay_interval },
            log_announce_interval: self.announce_interval,
            announce_receipt_timeout: self.announce_receipt_timeout,
            log_sync_interval: self.sync_interval,
            master_only: self.master_only,
            delay_asymmetry: ptp_core::time::Duration::from_nanos(self.delay_asymmetry_nanos),
        }
    }
}

fn deserialize_clock_identity<'de, D>(deserializer: D) -> Result<Option<ClockIdentity>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: String = Deserialize::deserialize(deserializer)?;
    let bytes = decode_hex(&raw).map_err(D::Error::custom)?;
    Ok(Some(ClockIdentity(bytes)))
}

fn decode_hex(raw: &str) -> Result<[u8; 8], String> {
    if raw.len() != 16 {
        return Err(format!("clock identity must be 16 hex characters, got {}", raw.len()));
    }
    let mut bytes = [0u8; 8];
    for (index, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&raw[index * 2..index * 2 + 2], 16)
            .map_err(|_| format!("invalid hex byte at position {index}"))?;
    }
    Ok(bytes)
}

fn default_domain() -> u8 {
    0
}

fn default_priority() -> u8 {
    128
}

fn default_announce_interval() -> i8 {
    1
}

fn default_sync_interval() -> i8 {
    0
}

fn default_announce_receipt_timeout() -> u8 {
    3
}

fn default_delay_interval() -> i8 {
    0
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Config = toml::de::from_str(&contents).map_err(ConfigError::Toml)?;
        config.warn_when_unreasonable();
        Ok(config)
    }

    fn warn_when_unreasonable(&self) {
        if self.ports.is_empty() {
            log::warn!("no ports configured");
        }
        if self.ports.len() > ptp_core::instance::MAX_PORTS {
            log::warn!("more ports configured than a single instance can drive");
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "io error while reading config: {e}"),
            ConfigError::Toml(e) => write!(f, "config toml parsing error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_in_defaults() {
        const MINIMAL: &str = r#"
[[port]]
"#;
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.domain, 0);
        assert_eq!(config.priority1, 128);
        assert_eq!(config.identity, None);
        assert_eq!(config.ports.len(), 1);
        assert_eq!(config.ports[0].announce_interval, 1);
        assert_eq!(config.ports[0].announce_receipt_timeout, 3);
    }

    #[test]
    fn clock_identity_parses_from_hex() {
        const WITH_IDENTITY: &str = r#"
identity = "0011223344556677"
[[port]]
"#;
        let config: Config = toml::from_str(WITH_IDENTITY).unwrap();
        assert_eq!(
            config.identity,
            Some(ClockIdentity([0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]))
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        const BAD: &str = r#"
typo-field = true
[[port]]
"#;
        assert!(toml::from_str::<Config>(BAD).is_err());
    }
}
