// ── Per-device snapshot ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device_id::DeviceId;
use super::lsp::{LabelSwitchedPath, SessionRole};

/// Every LSP known on one device at one instant.
///
/// Built once per successful poll and never mutated afterwards; ownership
/// moves from the poller to the consumer through the result channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LspSnapshot {
    pub device: DeviceId,
    pub taken_at: DateTime<Utc>,
    pub lsps: Vec<LabelSwitchedPath>,
}

impl LspSnapshot {
    pub fn new(device: DeviceId, lsps: Vec<LabelSwitchedPath>) -> Self {
        Self {
            device,
            taken_at: Utc::now(),
            lsps,
        }
    }

    /// LSPs for which this device is the head end.
    pub fn ingress(&self) -> impl Iterator<Item = &LabelSwitchedPath> {
        self.lsps
            .iter()
            .filter(|l| l.session_role == SessionRole::Ingress)
    }
}
