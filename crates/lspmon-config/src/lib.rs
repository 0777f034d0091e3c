//! Configuration for lspmon.
//!
//! A TOML file layered over built-in defaults and `LSPMON_`-prefixed
//! environment variables, plus translation into the poller, device and
//! inventory settings of `lspmon_core`.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lspmon_core::{CommandDeviceConfig, Inventory, PollerConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub poll: PollSettings,

    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    /// Devices polled when none are given on the command line.
    #[serde(default)]
    pub devices: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PollSettings {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_workers")]
    pub workers: usize,

    /// How long quitting waits for in-flight polls.
    #[serde(default = "default_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            workers: default_workers(),
            shutdown_grace_secs: default_grace(),
        }
    }
}

fn default_interval() -> u64 {
    300
}
fn default_workers() -> usize {
    2
}
fn default_grace() -> u64 {
    5
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceSettings {
    /// Query command argv. `{host}` is replaced with the device address.
    #[serde(default)]
    pub command: Vec<String>,

    /// TCP port probed before querying; `0` disables the probe.
    #[serde(default = "default_probe_port")]
    pub probe_port: u16,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            probe_port: default_probe_port(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_probe_port() -> u16 {
    830
}
fn default_timeout() -> u64 {
    180
}

/// Inventory hosts, kept as an array of tables so file order survives
/// figment's (sorted) dictionaries. The first host listing an address
/// names it.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InventorySettings {
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostEntry {
    pub name: String,
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "lspmon", "lspmon").map_or_else(
        || PathBuf::from(".lspmon.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path. A missing file yields the defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment, then validate.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LSPMON_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Validation & translation ────────────────────────────────────────

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval_secs == 0 {
            return Err(invalid("poll.interval_secs", "must be at least 1"));
        }
        if self.poll.workers == 0 {
            return Err(invalid("poll.workers", "must be at least 1"));
        }
        if self.inventory.hosts.iter().any(|h| h.name.trim().is_empty()) {
            return Err(invalid("inventory.hosts", "every host needs a name"));
        }
        if self.device.timeout_secs == 0 {
            return Err(invalid("device.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_secs(self.poll.interval_secs),
            workers: self.poll.workers,
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.poll.shutdown_grace_secs)
    }

    /// Settings for command-backed devices. Fails without a query command.
    pub fn device_config(&self) -> Result<Arc<CommandDeviceConfig>, ConfigError> {
        if self.device.command.is_empty() {
            let path = config_path();
            return Err(invalid(
                "device.command",
                format!("no query command configured (set it in {})", path.display()),
            ));
        }
        Ok(Arc::new(CommandDeviceConfig {
            command: self.device.command.clone(),
            probe_port: (self.device.probe_port != 0).then_some(self.device.probe_port),
            timeout: Duration::from_secs(self.device.timeout_secs),
        }))
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::new(
            self.inventory
                .hosts
                .iter()
                .map(|host| (host.name.as_str(), host.addresses.clone())),
        )
    }
}
