#![allow(clippy::unwrap_used)]
// Scheduler behaviour against in-memory devices, on a paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use lspmon_core::poller::{self, PollerConfig, PollerOutputs};
use lspmon_core::{
    ConnectionError, DeviceHandle, DeviceId, LabelSwitchedPath, LspSnapshot, LspState, PollError,
    QueryError,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc::UnboundedReceiver;

// ── Mock device ─────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Behavior {
    Answer { delay: Duration },
    Refuse,
    Hang,
    SilentOpen,
}

#[derive(Default)]
struct Stats {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    queries: AtomicUsize,
    closed: AtomicBool,
}

struct MockDevice {
    id: DeviceId,
    behavior: Behavior,
    connected: bool,
    stats: Arc<Stats>,
}

impl MockDevice {
    fn new(name: &str, behavior: Behavior) -> (Self, Arc<Stats>) {
        let stats = Arc::new(Stats::default());
        let device = Self {
            id: DeviceId::from(name),
            behavior,
            connected: false,
            stats: Arc::clone(&stats),
        };
        (device, stats)
    }

    fn lsps() -> Vec<LabelSwitchedPath> {
        [("up-lsp", LspState::Up), ("down-lsp", LspState::Down)]
            .into_iter()
            .map(|(name, state)| LabelSwitchedPath {
                name: name.into(),
                state,
                ..LabelSwitchedPath::default()
            })
            .collect()
    }
}

impl DeviceHandle for MockDevice {
    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn open(&mut self) -> Result<(), ConnectionError> {
        match self.behavior {
            Behavior::Refuse => Err(ConnectionError::Refused {
                host: self.id.to_string(),
            }),
            Behavior::SilentOpen => Ok(()),
            Behavior::Answer { .. } | Behavior::Hang => {
                self.connected = true;
                Ok(())
            }
        }
    }

    fn close(&mut self) -> bool {
        self.stats.closed.store(true, Ordering::SeqCst);
        std::mem::replace(&mut self.connected, false)
    }

    async fn query_lsps(&mut self) -> Result<LspSnapshot, QueryError> {
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

        match self.behavior {
            Behavior::Answer { delay } => tokio::time::sleep(delay).await,
            Behavior::Hang => std::future::pending::<()>().await,
            Behavior::Refuse | Behavior::SilentOpen => {}
        }

        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.stats.queries.fetch_add(1, Ordering::SeqCst);
        Ok(LspSnapshot::new(self.id.clone(), Self::lsps()))
    }
}

fn config(interval_secs: u64, workers: usize) -> PollerConfig {
    PollerConfig {
        interval: Duration::from_secs(interval_secs),
        workers,
    }
}

fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}

fn answer(secs: u64) -> Behavior {
    Behavior::Answer {
        delay: Duration::from_secs(secs),
    }
}

// ── Scheduling ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn every_device_is_polled_repeatedly_and_never_concurrently() {
    let (devices, stats): (Vec<_>, Vec<_>) = (0..4)
        .map(|i| MockDevice::new(&format!("pe{i}"), answer(1)))
        .unzip();

    let (handle, _outputs) = poller::start(devices, &config(10, 2));
    tokio::time::sleep(Duration::from_secs(25)).await;
    handle.shutdown(Duration::from_secs(5)).await;

    for s in &stats {
        assert!(s.queries.load(Ordering::SeqCst) >= 2);
        assert_eq!(s.max_in_flight.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn slow_device_does_not_delay_others() {
    let (slow, slow_stats) = MockDevice::new("slow", answer(100));
    let (fast, fast_stats) = MockDevice::new("fast", answer(1));

    let (handle, _outputs) = poller::start(vec![slow, fast], &config(5, 2));
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(slow_stats.queries.load(Ordering::SeqCst), 0);
    assert!(fast_stats.queries.load(Ordering::SeqCst) >= 3);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn status_sequence_for_one_poll() {
    let (dev, _stats) = MockDevice::new("pe1", answer(1));
    let (handle, mut outputs) = poller::start(vec![dev], &config(30, 1));
    tokio::time::sleep(Duration::from_secs(2)).await;

    let texts: Vec<_> = drain(&mut outputs.status)
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(
        texts,
        [
            "LSPs query",
            "LSPs query successful",
            "Waiting 30 seconds until next query",
        ]
    );

    let results = drain(&mut outputs.results);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].device, DeviceId::from("pe1"));
    assert_eq!(results[0].snapshot.lsps.len(), 2);
    handle.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn failed_devices_are_rescheduled() {
    let (dev, _stats) = MockDevice::new("bad", Behavior::Refuse);
    let (handle, mut outputs) = poller::start(vec![dev], &config(10, 1));
    tokio::time::sleep(Duration::from_secs(25)).await;

    let errors = drain(&mut outputs.errors);
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| matches!(
        e.error,
        PollError::Connection(ConnectionError::Refused { .. })
    )));
    assert!(drain(&mut outputs.results).is_empty());
    handle.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn open_without_session_is_not_connected() {
    let (dev, stats) = MockDevice::new("ghost", Behavior::SilentOpen);
    let (handle, mut outputs) = poller::start(vec![dev], &config(10, 1));
    tokio::time::sleep(Duration::from_secs(1)).await;

    let errors = drain(&mut outputs.errors);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, PollError::NotConnected);
    assert_eq!(stats.queries.load(Ordering::SeqCst), 0);
    handle.shutdown(Duration::from_secs(1)).await;
}

// ── Shutdown ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn shutdown_closes_sleeping_devices_without_requeue() {
    let (dev, stats) = MockDevice::new("pe1", answer(1));
    let (handle, mut outputs) = poller::start(vec![dev], &config(10, 1));
    tokio::time::sleep(Duration::from_secs(3)).await;

    let report = handle.shutdown(Duration::from_secs(1)).await;
    assert_eq!(report.aborted, 0);
    assert!(stats.closed.load(Ordering::SeqCst));

    let last = drain(&mut outputs.status).pop().unwrap();
    assert_eq!(last.text, "Closing connection");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(stats.queries.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn mixed_fleet_shuts_down_within_budget() {
    let (ok, _) = MockDevice::new("ok", answer(1));
    let (refused, _) = MockDevice::new("refused", Behavior::Refuse);
    let (hung, hung_stats) = MockDevice::new("hung", Behavior::Hang);

    let (handle, outputs) = poller::start(vec![ok, refused, hung], &config(60, 3));
    let PollerOutputs {
        mut status,
        mut results,
        mut errors,
    } = outputs;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let results = drain(&mut results);
    assert_eq!(results.len(), 1);
    let states: Vec<_> = results[0].snapshot.lsps.iter().map(|l| l.state).collect();
    assert_eq!(states, [LspState::Up, LspState::Down]);

    let errors = drain(&mut errors);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].device, DeviceId::from("refused"));
    assert_eq!(hung_stats.in_flight.load(Ordering::SeqCst), 1);
    drain(&mut status);

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        handle.shutdown(Duration::from_secs(2)),
    )
    .await
    .unwrap();
    assert_eq!(report.aborted, 1);
}

// ── One-shot ────────────────────────────────────────────────────────

#[tokio::test]
async fn poll_once_keeps_input_order_and_closes() {
    let (a, a_stats) = MockDevice::new("a", answer(0));
    let (b, _) = MockDevice::new("b", Behavior::Refuse);

    let outcomes = poller::poll_once(vec![a, b]).await;
    let ids: Vec<_> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(outcomes[0].1.is_ok());
    assert!(outcomes[1].1.is_err());
    assert!(a_stats.closed.load(Ordering::SeqCst));
}
