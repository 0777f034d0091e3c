// ── Device collaborator ──
//
// The poller only ever talks to devices through `DeviceHandle`. The
// transport behind it (SSH, NETCONF, a helper script) is not its concern.

mod command;

use std::future::Future;

use crate::error::{ConnectionError, QueryError};
use crate::model::{DeviceId, LspSnapshot};

pub use command::{CommandDevice, CommandDeviceConfig};

/// A session-oriented handle to one network device.
///
/// Handles are owned values: the poller moves each one between its stages,
/// so a handle is never queried by two workers at once.
pub trait DeviceHandle: Send + 'static {
    fn id(&self) -> &DeviceId;

    fn is_connected(&self) -> bool;

    /// Establish a session. Called only when `is_connected()` is false.
    fn open(&mut self) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Tear the session down; returns whether a session was open.
    fn close(&mut self) -> bool;

    fn query_lsps(&mut self) -> impl Future<Output = Result<LspSnapshot, QueryError>> + Send;
}
