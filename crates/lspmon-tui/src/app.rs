//! Control loop: poll inputs, render, sleep until the next tick.

use std::time::Duration;

use color_eyre::eyre::Result;
use lspmon_core::{PollerHandle, PollerOutputs, ShutdownReport};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dashboard::{Dashboard, Flow};
use crate::event::{Event, EventReader};
use crate::filter_prompt::{self, PromptOutcome};
use crate::keymap;
use crate::tui::Tui;
use crate::ui;

const TICK: Duration = Duration::from_millis(250);

/// Cancel `interrupt` on SIGINT. The handler is registered before this
/// returns, so a signal arriving during terminal setup is not fatal.
fn listen_for_interrupt(interrupt: CancellationToken) -> Result<()> {
    #[cfg(unix)]
    let mut sigint =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        let received = sigint.recv().await.is_some();
        #[cfg(not(unix))]
        let received = match tokio::signal::ctrl_c().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "interrupt listener failed");
                false
            }
        };
        if received {
            info!("interrupt received");
            interrupt.cancel();
        }
    });
    Ok(())
}

/// Owns the dashboard and the running poller.
pub struct App {
    dashboard: Dashboard,
    outputs: PollerOutputs,
    poller: PollerHandle,
    grace: Duration,
    running: bool,
}

impl App {
    pub fn new(
        dashboard: Dashboard,
        poller: PollerHandle,
        outputs: PollerOutputs,
        grace: Duration,
    ) -> Self {
        Self {
            dashboard,
            outputs,
            poller,
            grace,
            running: true,
        }
    }

    /// Run on the real terminal until quit, interrupt or a terminal
    /// failure. The terminal is restored on every path.
    pub async fn run(self) -> Result<()> {
        let interrupt = CancellationToken::new();
        listen_for_interrupt(interrupt.clone())?;

        let mut tui = Tui::new()?;
        tui.enter()?;
        let mut events = EventReader::new();

        let outcome = self.run_with(&mut tui.terminal, &mut events, &interrupt).await;
        events.stop();
        drop(tui);
        outcome.map(|_| ())
    }

    /// Drive the loop on `terminal`, then shut the poller down within the
    /// grace period, whether or not the loop failed.
    pub async fn run_with<B>(
        mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventReader,
        interrupt: &CancellationToken,
    ) -> Result<ShutdownReport>
    where
        B: Backend + Send,
        B::Error: Send + Sync + 'static,
    {
        info!("dashboard loop started");
        let outcome = self.event_loop(terminal, events, interrupt).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "dashboard loop failed");
        }

        let report = self.poller.shutdown(self.grace).await;
        info!(aborted = report.aborted, "dashboard loop ended");
        outcome.map(|()| report)
    }

    async fn event_loop<B>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventReader,
        interrupt: &CancellationToken,
    ) -> Result<()>
    where
        B: Backend + Send,
        B::Error: Send + Sync + 'static,
    {
        let mut tick = interval(TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let stopped = self.poller.cancel_token();

        while self.running {
            self.handle_events(terminal, events).await?;
            if !self.running {
                break;
            }
            self.dashboard.ingest(&mut self.outputs);
            ui::draw(terminal, &mut self.dashboard, None)?;

            tokio::select! {
                biased;
                () = interrupt.cancelled() => self.running = false,
                () = stopped.cancelled() => {
                    info!("poller stopped");
                    self.running = false;
                }
                _ = tick.tick() => {}
            }
        }
        Ok(())
    }

    /// Apply every pending key press. Stops early on quit.
    async fn handle_events<B>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventReader,
    ) -> Result<()>
    where
        B: Backend + Send,
        B::Error: Send + Sync + 'static,
    {
        while let Some(event) = events.try_next()? {
            let key = match event {
                Event::Key(key) => key,
                // The next draw picks up the new size.
                Event::Resize(..) => continue,
            };
            let command = match keymap::map_key(key) {
                Ok(command) => command,
                Err(e) => {
                    debug!(error = %e, "key ignored");
                    continue;
                }
            };
            match self.dashboard.apply(command) {
                Flow::Continue => {}
                Flow::Quit => {
                    self.running = false;
                    return Ok(());
                }
                Flow::EditFilter => {
                    match filter_prompt::run(terminal, events, &mut self.dashboard).await? {
                        PromptOutcome::Commit(pattern) => {
                            info!(pattern, "filter changed");
                            self.dashboard.set_filter(&pattern);
                        }
                        PromptOutcome::Cancel => {}
                    }
                }
            }
        }
        Ok(())
    }
}
