// ── Fleet view ──
//
// Latest snapshot per device. Owned and mutated by a single consumer;
// a new snapshot replaces the old one wholesale.

use indexmap::IndexMap;

use crate::model::{DeviceId, LabelSwitchedPath, LspSnapshot};

#[derive(Debug, Clone, Default)]
pub struct FleetView {
    devices: IndexMap<DeviceId, Option<LspSnapshot>>,
}

impl FleetView {
    /// A view with every device known but not yet polled.
    pub fn new<I: IntoIterator<Item = DeviceId>>(devices: I) -> Self {
        Self {
            devices: devices.into_iter().map(|id| (id, None)).collect(),
        }
    }

    /// Store `snapshot` as the latest for its device, returning the
    /// previous one. Unknown devices are added.
    pub fn replace(&mut self, snapshot: LspSnapshot) -> Option<LspSnapshot> {
        self.devices
            .insert(snapshot.device.clone(), Some(snapshot))
            .flatten()
    }

    pub fn get(&self, device: &DeviceId) -> Option<&LspSnapshot> {
        self.devices.get(device).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of devices with at least one snapshot.
    pub fn polled(&self) -> usize {
        self.devices.values().filter(|s| s.is_some()).count()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &LspSnapshot> {
        self.devices.values().filter_map(Option::as_ref)
    }

    /// Ingress LSPs of every device, devices in registration order.
    pub fn ingress(&self) -> impl Iterator<Item = &LabelSwitchedPath> {
        self.snapshots().flat_map(LspSnapshot::ingress)
    }
}
