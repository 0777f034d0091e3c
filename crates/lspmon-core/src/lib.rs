//! Data model and polling engine for lspmon.
//!
//! - **[`poller`]** drives a fleet of [`DeviceHandle`]s: a fixed worker pool
//!   queries each device, a sleep stage re-enqueues it after the poll
//!   interval, and outcomes are published on three channels (status,
//!   results, errors).
//! - **[`model`]** holds the immutable per-poll records: [`LspSnapshot`],
//!   [`LabelSwitchedPath`], [`LspPath`] and the [`Bandwidth`] value type.
//! - **[`FleetView`]** keeps the latest snapshot per device for consumers.
//! - **[`Inventory`]** resolves addresses to hostnames for display.

pub mod device;
pub mod error;
pub mod export;
pub mod fleet;
pub mod inventory;
pub mod model;
pub mod poller;

// ── Primary re-exports ──────────────────────────────────────────────
pub use device::{CommandDevice, CommandDeviceConfig, DeviceHandle};
pub use error::{BandwidthParseError, ConnectionError, ExportError, PollError, QueryError};
pub use fleet::FleetView;
pub use inventory::{Inventory, Resolver};
pub use model::{
    ActiveBandwidth, Bandwidth, DeviceId, LabelSwitchedPath, LspPath, LspSnapshot, LspState,
    SessionRole,
};
pub use poller::{
    ErrorEvent, PollResult, PollerConfig, PollerHandle, PollerOutputs, ShutdownReport,
    StatusEvent,
};
