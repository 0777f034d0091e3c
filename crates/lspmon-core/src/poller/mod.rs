// ── Polling scheduler ──
//
// A fixed pool of workers drains a shared work queue of devices. After each
// poll a device moves to the sleep stage, which re-enqueues it once the
// poll interval has elapsed. Devices are owned values moving between
// stages, so no device is ever polled by two workers at once.
//
//   work queue ──► worker ×N ──► sleep stage ──┐
//        ▲                                    │
//        └────────────────────────────────────┘

mod events;
mod sleeper;
mod worker;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::device::DeviceHandle;
use crate::error::PollError;
use crate::model::{DeviceId, LspSnapshot};

pub use events::{ErrorEvent, PollResult, StatusEvent};
use worker::WorkQueue;

pub(crate) const STATUS_CLOSING: &str = "Closing connection";

/// Scheduler tuning.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between the end of one poll of a device and the start of the next.
    pub interval: Duration,
    /// Worker count; clamped to at least one.
    pub workers: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            workers: 2,
        }
    }
}

/// Receiving ends of the three output channels.
#[derive(Debug)]
pub struct PollerOutputs {
    pub status: UnboundedReceiver<StatusEvent>,
    pub results: UnboundedReceiver<PollResult>,
    pub errors: UnboundedReceiver<ErrorEvent>,
}

// ── Output sinks ────────────────────────────────────────────────────

/// Sending ends shared by every stage. Sends only fail once the consumer
/// is gone, at which point nobody is left to tell.
#[derive(Clone)]
pub(crate) struct Sinks {
    status: UnboundedSender<StatusEvent>,
    results: UnboundedSender<PollResult>,
    errors: UnboundedSender<ErrorEvent>,
}

impl Sinks {
    fn channel() -> (Self, PollerOutputs) {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        let sinks = Self {
            status: status_tx,
            results: results_tx,
            errors: errors_tx,
        };
        let outputs = PollerOutputs {
            status: status_rx,
            results: results_rx,
            errors: errors_rx,
        };
        (sinks, outputs)
    }

    pub(crate) fn status(&self, device: &DeviceId, text: &str) {
        let _ = self.status.send(StatusEvent {
            device: device.clone(),
            text: text.to_owned(),
        });
    }

    pub(crate) fn result(&self, device: DeviceId, snapshot: LspSnapshot) {
        let _ = self.results.send(PollResult { device, snapshot });
    }

    pub(crate) fn error(&self, device: DeviceId, error: PollError) {
        let _ = self.errors.send(ErrorEvent { device, error });
    }

    pub(crate) fn close_device<D: DeviceHandle>(&self, device: &mut D) {
        if device.close() {
            debug!(device = %device.id(), "connection closed");
            self.status(device.id(), STATUS_CLOSING);
        }
    }
}

// ── Scheduler ───────────────────────────────────────────────────────

/// Start polling `devices`. Must be called from within a tokio runtime.
///
/// Every device is enqueued immediately, so the first round of polls
/// starts at once.
pub fn start<D: DeviceHandle>(
    devices: Vec<D>,
    config: &PollerConfig,
) -> (PollerHandle, PollerOutputs) {
    let (sinks, outputs) = Sinks::channel();
    let cancel = CancellationToken::new();
    let workers = config.workers.max(1);

    let (work_tx, work_rx) = mpsc::unbounded_channel::<D>();
    let (sleep_tx, sleep_rx) = mpsc::unbounded_channel::<D>();
    let queue: WorkQueue<D> = Arc::new(Mutex::new(work_rx));

    info!(
        devices = devices.len(),
        workers,
        interval_secs = config.interval.as_secs(),
        "starting poller"
    );
    for device in devices {
        // The receiver is alive in `queue`; this cannot fail.
        let _ = work_tx.send(device);
    }

    let mut tasks = Vec::with_capacity(workers + 1);
    for worker in 0..workers {
        tasks.push(tokio::spawn(worker::worker_task(
            worker,
            Arc::clone(&queue),
            sleep_tx.clone(),
            sinks.clone(),
            cancel.clone(),
        )));
    }
    drop(sleep_tx);
    tasks.push(tokio::spawn(sleeper::sleeper_task(
        config.interval,
        sleep_rx,
        work_tx,
        queue,
        sinks,
        cancel.clone(),
    )));

    let handle = PollerHandle { cancel, tasks };
    (handle, outputs)
}

/// Poll every device exactly once, concurrently, and close them afterwards.
///
/// Status events are discarded. Results come back in input order.
pub async fn poll_once<D: DeviceHandle>(
    devices: Vec<D>,
) -> Vec<(DeviceId, Result<LspSnapshot, PollError>)> {
    let (sinks, _outputs) = Sinks::channel();
    let polls = devices.into_iter().map(|mut device| {
        let sinks = sinks.clone();
        async move {
            let outcome = worker::query(&mut device, &sinks).await;
            device.close();
            (device.id().clone(), outcome)
        }
    });
    futures::future::join_all(polls).await
}

// ── Handle ──────────────────────────────────────────────────────────

/// Outcome of [`PollerHandle::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Tasks still inside a device call when the grace period ran out.
    pub aborted: usize,
}

/// Owner of the scheduler's tasks. Dropping it stops the scheduler without
/// waiting for in-flight polls.
pub struct PollerHandle {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl PollerHandle {
    /// Signal every stage to stop without waiting.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the scheduler and wait up to `grace` for its stages to exit.
    ///
    /// Polls already in flight are allowed to finish within the grace
    /// period; tasks still busy after it are aborted.
    pub async fn shutdown(mut self, grace: Duration) -> ShutdownReport {
        self.cancel.cancel();
        let deadline = tokio::time::Instant::now() + grace;

        let mut aborted = 0;
        for mut task in self.tasks.drain(..) {
            if tokio::time::timeout_at(deadline, &mut task).await.is_err() {
                task.abort();
                aborted += 1;
            }
        }

        if aborted > 0 {
            warn!(
                aborted,
                grace_secs = grace.as_secs(),
                "poller tasks aborted after grace period"
            );
        } else {
            info!("poller shut down");
        }
        ShutdownReport { aborted }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
