// ── Domain model ──
//
// Immutable-per-snapshot records describing the LSPs of one device.

pub mod bandwidth;
pub mod device_id;
pub mod lsp;
pub mod path;
pub mod snapshot;

pub use bandwidth::Bandwidth;
pub use device_id::DeviceId;
pub use lsp::{ActiveBandwidth, AutoBandwidth, LabelSwitchedPath, LspState, SessionRole};
pub use path::{
    AdminGroupConstraint, AdminGroupKind, EroHop, HistoryEvent, HopKind, LspPath, PathHistory,
    PathPriority, PathRole,
};
pub use snapshot::LspSnapshot;
