//! Event system: crossterm event reader running in a background tokio task.
//!
//! Key presses and resizes are forwarded over an unbounded channel. The
//! control loop drains it without blocking once per tick; the filter
//! prompt awaits it directly.

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
}

/// Reads terminal events in a background task and sends them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut event_stream = EventStream::new();

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,

                    next = event_stream.next() => match next {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                        // Ignore key release/repeat, mouse and focus events
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "terminal event stream failed");
                            break;
                        }
                        None => break,
                    },
                };

                // If the receiver is dropped, stop.
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Reader fed from `rx` instead of the terminal.
    #[cfg(test)]
    pub fn scripted(rx: mpsc::UnboundedReceiver<Event>) -> Self {
        Self {
            rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Next pending event, if any, without waiting. Errors once the
    /// reader has stopped and every queued event was taken.
    pub fn try_next(&mut self) -> Result<Option<Event>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(eyre!("terminal event stream closed")),
        }
    }

    /// Wait for the next event. Returns `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Signal the background reader to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
