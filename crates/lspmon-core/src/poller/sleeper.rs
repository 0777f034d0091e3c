// ── Sleep stage ──
//
// Owns one timer per sleeping device and puts the device back on the work
// queue when its timer fires.

use std::collections::HashMap;
use std::future::poll_fn;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tokio_util::time::DelayQueue;
use tracing::debug;

use super::Sinks;
use super::worker::WorkQueue;
use crate::device::DeviceHandle;

pub(super) async fn sleeper_task<D: DeviceHandle>(
    interval: Duration,
    mut incoming: UnboundedReceiver<D>,
    work_tx: UnboundedSender<D>,
    queue: WorkQueue<D>,
    sinks: Sinks,
    cancel: CancellationToken,
) {
    debug!(interval_secs = interval.as_secs(), "sleep stage started");

    let waiting = format!("Waiting {} seconds until next query", interval.as_secs());
    let mut timers: DelayQueue<u64> = DelayQueue::new();
    let mut parked: HashMap<u64, D> = HashMap::new();
    let mut next_ticket: u64 = 0;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            device = incoming.recv() => {
                let Some(device) = device else { break };
                sinks.status(device.id(), &waiting);
                timers.insert(next_ticket, interval);
                parked.insert(next_ticket, device);
                next_ticket = next_ticket.wrapping_add(1);
            }
            Some(expired) = poll_fn(|cx| timers.poll_expired(cx)) => {
                if let Some(device) = parked.remove(expired.get_ref()) {
                    if let Err(returned) = work_tx.send(device) {
                        let mut device = returned.0;
                        sinks.close_device(&mut device);
                    }
                }
            }
        }
    }

    // Pending timers are dropped, never re-enqueued.
    timers.clear();
    for (_, mut device) in parked.drain() {
        sinks.close_device(&mut device);
    }
    incoming.close();
    while let Ok(mut device) = incoming.try_recv() {
        sinks.close_device(&mut device);
    }

    // Workers release the queue as soon as they observe the stop signal.
    let mut queue = queue.lock().await;
    while let Ok(mut device) = queue.try_recv() {
        sinks.close_device(&mut device);
    }

    debug!("sleep stage stopped");
}
