// ── Poller output events ──

use std::fmt;

use crate::error::PollError;
use crate::model::{DeviceId, LspSnapshot};

/// Progress note for one device. Most-recent-wins display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub device: DeviceId,
    pub text: String,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.device, self.text)
    }
}

/// A failed poll. The device is rescheduled regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub device: DeviceId,
    pub error: PollError,
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.device, self.error)
    }
}

/// A successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub device: DeviceId,
    pub snapshot: LspSnapshot,
}
