// ── Device identity ──
//
// A device is identified by the address (or name) it was configured with.
// The identity is what every status, error and result event is keyed on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Identity of a polled device, unique within a fleet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identity parsed as an IP address, if it is one.
    pub fn ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<IpAddr> for DeviceId {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}
