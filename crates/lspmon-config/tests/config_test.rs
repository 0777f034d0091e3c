#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::time::Duration;

use lspmon_config::{ConfigError, load_config_from};
use lspmon_core::Resolver;
use pretty_assertions::assert_eq;

fn write_config(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

// ── Defaults ────────────────────────────────────────────────────────

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    let poller = config.poller_config();
    assert_eq!(poller.interval, Duration::from_secs(300));
    assert_eq!(poller.workers, 2);
    assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
    assert!(config.devices.is_empty());
    assert!(config.inventory().is_empty());
}

#[test]
fn defaults_have_no_query_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
    let err = config.device_config().unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "device.command"));
}

// ── File values ─────────────────────────────────────────────────────

#[test]
fn file_values_override_defaults() {
    let file = write_config(
        r#"
devices = ["pe1", "10.0.0.2"]

[poll]
interval_secs = 60
workers = 8

[device]
command = ["lsp-fetch", "--host", "{host}"]
probe_port = 0
timeout_secs = 30

[[inventory.hosts]]
name = "pe1"
addresses = ["10.0.0.1"]

[[inventory.hosts]]
name = "pe2"
addresses = ["10.0.0.2", "192.0.2.2"]
"#,
    );
    let config = load_config_from(file.path()).unwrap();

    assert_eq!(config.devices, ["pe1", "10.0.0.2"]);
    assert_eq!(config.poller_config().interval, Duration::from_secs(60));
    assert_eq!(config.poller_config().workers, 8);

    let device = config.device_config().unwrap();
    assert_eq!(device.command, ["lsp-fetch", "--host", "{host}"]);
    assert_eq!(device.probe_port, None);
    assert_eq!(device.timeout, Duration::from_secs(30));

    let inventory = config.inventory();
    assert_eq!(inventory.len(), 2);
    assert_eq!(inventory.resolve("192.0.2.2".parse().unwrap()), Some("pe2"));
}

#[test]
fn probe_port_defaults_to_netconf() {
    let file = write_config("[device]\ncommand = [\"x\"]\n");
    let device = load_config_from(file.path())
        .unwrap()
        .device_config()
        .unwrap();
    assert_eq!(device.probe_port, Some(830));
    assert_eq!(device.timeout, Duration::from_secs(180));
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn zero_interval_is_rejected() {
    let file = write_config("[poll]\ninterval_secs = 0\n");
    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "poll.interval_secs"));
}

#[test]
fn zero_workers_is_rejected() {
    let file = write_config("[poll]\nworkers = 0\n");
    assert!(matches!(
        load_config_from(file.path()),
        Err(ConfigError::Validation { .. })
    ));
}

#[test]
fn malformed_toml_is_a_figment_error() {
    let file = write_config("[poll\ninterval_secs = ");
    assert!(matches!(
        load_config_from(file.path()),
        Err(ConfigError::Figment(_))
    ));
}

#[test]
fn bad_inventory_address_is_rejected() {
    let file = write_config("[[inventory.hosts]]\nname = \"pe1\"\naddresses = [\"not-an-ip\"]\n");
    assert!(matches!(
        load_config_from(file.path()),
        Err(ConfigError::Figment(_))
    ));
}

#[test]
fn inventory_keeps_file_order() {
    let file = write_config(
        r#"
[[inventory.hosts]]
name = "zeta"
addresses = ["10.0.0.9"]

[[inventory.hosts]]
name = "alpha"
addresses = ["10.0.0.9", "10.0.0.1"]
"#,
    );
    let inventory = load_config_from(file.path()).unwrap().inventory();
    let names: Vec<_> = inventory.hostnames().collect();
    assert_eq!(names, ["zeta", "alpha"]);
    assert_eq!(inventory.resolve("10.0.0.9".parse().unwrap()), Some("zeta"));
}

#[test]
fn unnamed_inventory_host_is_rejected() {
    let file = write_config("[[inventory.hosts]]\nname = \" \"\n");
    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "inventory.hosts"));
}
