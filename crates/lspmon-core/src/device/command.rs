// ── Command-backed device ──
//
// Runs an operator-supplied command per query. The command's stdout must
// be a JSON document `{"lsps": [...]}` in the snapshot schema.

use serde::Deserialize;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::debug;

use super::DeviceHandle;
use crate::error::{ConnectionError, QueryError};
use crate::model::{DeviceId, LabelSwitchedPath, LspSnapshot};

const HOST_PLACEHOLDER: &str = "{host}";

/// Settings shared by every command-backed device in a fleet.
#[derive(Debug, Clone)]
pub struct CommandDeviceConfig {
    /// argv; `{host}` in any element is replaced with the device host.
    pub command: Vec<String>,
    /// TCP port probed by `open()`. No probe when unset.
    pub probe_port: Option<u16>,
    pub timeout: Duration,
}

impl Default for CommandDeviceConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            probe_port: Some(830),
            timeout: Duration::from_secs(180),
        }
    }
}

#[derive(Deserialize)]
struct LspReport {
    lsps: Vec<LabelSwitchedPath>,
}

pub struct CommandDevice {
    id: DeviceId,
    host: String,
    config: Arc<CommandDeviceConfig>,
    connected: bool,
}

impl CommandDevice {
    pub fn new(host: impl Into<String>, config: Arc<CommandDeviceConfig>) -> Self {
        let host = host.into();
        Self {
            id: DeviceId::new(host.clone()),
            host,
            config,
            connected: false,
        }
    }

    fn argv(&self) -> Vec<String> {
        self.config
            .command
            .iter()
            .map(|arg| arg.replace(HOST_PLACEHOLDER, &self.host))
            .collect()
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }

    async fn run_query(&self) -> Result<Vec<u8>, QueryError> {
        let argv = self.argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(QueryError::Missing {
                what: "device command".into(),
            });
        };

        let child = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.config.timeout, child)
            .await
            .map_err(|_| QueryError::Timeout {
                timeout_secs: self.timeout_secs(),
            })?
            .map_err(|e| QueryError::Command {
                reason: format!("{program}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QueryError::Command {
                reason: format!("{program} exited with {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(output.stdout)
    }
}

impl DeviceHandle for CommandDevice {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn open(&mut self) -> Result<(), ConnectionError> {
        if let Some(port) = self.config.probe_port {
            debug!(host = %self.host, port, "probing device");
            let connect = TcpStream::connect((self.host.as_str(), port));
            match tokio::time::timeout(self.config.timeout, connect).await {
                Err(_) => {
                    return Err(ConnectionError::Timeout {
                        host: self.host.clone(),
                        timeout_secs: self.timeout_secs(),
                    });
                }
                Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                    return Err(ConnectionError::Refused {
                        host: self.host.clone(),
                    });
                }
                Ok(Err(e)) => {
                    return Err(ConnectionError::Probe {
                        host: self.host.clone(),
                        reason: e.to_string(),
                    });
                }
                Ok(Ok(_stream)) => {}
            }
        }
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> bool {
        std::mem::replace(&mut self.connected, false)
    }

    async fn query_lsps(&mut self) -> Result<LspSnapshot, QueryError> {
        let stdout = match self.run_query().await {
            Ok(stdout) => stdout,
            Err(e) => {
                // Force a fresh probe on the next poll.
                self.connected = false;
                return Err(e);
            }
        };

        let report: LspReport =
            serde_json::from_slice(&stdout).map_err(|e| QueryError::Malformed {
                reason: e.to_string(),
            })?;
        debug!(host = %self.host, lsps = report.lsps.len(), "query complete");
        Ok(LspSnapshot::new(self.id.clone(), report.lsps))
    }
}
