// ── Query workers ──
//
// Each worker pulls one device at a time off the shared work queue, polls
// it to completion and hands it to the sleep stage.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Sinks;
use crate::device::DeviceHandle;
use crate::error::PollError;
use crate::model::LspSnapshot;

pub(super) const STATUS_QUERYING: &str = "LSPs query";
pub(super) const STATUS_SUCCESS: &str = "LSPs query successful";

pub(super) type WorkQueue<D> = Arc<Mutex<UnboundedReceiver<D>>>;

pub(super) async fn worker_task<D: DeviceHandle>(
    worker: usize,
    queue: WorkQueue<D>,
    sleep_tx: UnboundedSender<D>,
    sinks: Sinks,
    cancel: CancellationToken,
) {
    debug!(worker, "poll worker started");

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            device = async { queue.lock().await.recv().await } => device,
        };
        let Some(mut device) = next else { break };

        // In-flight polls are never interrupted by the stop signal.
        poll_device(&mut device, &sinks).await;

        if cancel.is_cancelled() {
            sinks.close_device(&mut device);
            break;
        }
        if let Err(returned) = sleep_tx.send(device) {
            let mut device = returned.0;
            sinks.close_device(&mut device);
            break;
        }
    }

    debug!(worker, "poll worker stopped");
}

/// Poll one device and publish the outcome. Failures become error events.
pub(super) async fn poll_device<D: DeviceHandle>(device: &mut D, sinks: &Sinks) {
    let id = device.id().clone();
    match query(device, sinks).await {
        Ok(snapshot) => {
            sinks.status(&id, STATUS_SUCCESS);
            sinks.result(id, snapshot);
        }
        Err(error) => {
            warn!(device = %id, error = %error, "poll failed");
            sinks.error(id, error);
        }
    }
}

pub(super) async fn query<D: DeviceHandle>(
    device: &mut D,
    sinks: &Sinks,
) -> Result<LspSnapshot, PollError> {
    if !device.is_connected() {
        device.open().await?;
    }
    if !device.is_connected() {
        return Err(PollError::NotConnected);
    }
    sinks.status(device.id(), STATUS_QUERYING);
    Ok(device.query_lsps().await?)
}
