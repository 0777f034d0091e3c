//! Dashboard engine: fleet state, view state and frame rendering.
//!
//! Owned and driven by the single control loop. Each tick the loop calls
//! [`Dashboard::ingest`] to drain the poller's channels, then
//! [`Dashboard::render_frame`] to produce the next frame.

pub mod columns;
pub mod frame;
pub mod legend;
pub mod scroll;
pub mod view;

use std::sync::Arc;

use chrono::{DateTime, Local};
use lspmon_core::{DeviceId, FleetView, PollerOutputs, Resolver};
use tracing::{debug, trace};

use crate::keymap::Command;
use columns::{Column, GAP, fit};
use frame::{FrameLine, RenderedFrame, StyleTag, ViewError};
use view::{RowFilter, ViewState};

pub const TITLE: &str = "LSP Information";

/// Minimum usable width; narrower terminals get the resize notice.
pub const MIN_WIDTH: usize = 41;

/// Lines taken by everything except data rows: title, blank, status,
/// last error, summary, blank, header, two scroll markers, legend.
pub const CHROME_LINES: usize = 10;

const SCROLL_UP_MARK: &str = " ^ ^ ^ ^ ^ ^ ";
const SCROLL_DOWN_MARK: &str = "::::::::::::";

/// What the control loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    EditFilter,
}

pub struct Dashboard {
    fleet: FleetView,
    view: ViewState,
    resolver: Arc<dyn Resolver>,
    last_status: String,
    last_error: String,
}

impl Dashboard {
    pub fn new<I>(devices: I, resolver: Arc<dyn Resolver>) -> Self
    where
        I: IntoIterator<Item = DeviceId>,
    {
        Self {
            fleet: FleetView::new(devices),
            view: ViewState::default(),
            resolver,
            last_status: String::new(),
            last_error: String::new(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Drain all three poller channels without blocking. Returns whether
    /// anything arrived.
    pub fn ingest(&mut self, outputs: &mut PollerOutputs) -> bool {
        let mut changed = false;
        while let Ok(result) = outputs.results.try_recv() {
            debug!(
                device = %result.device,
                lsps = result.snapshot.lsps.len(),
                "snapshot received"
            );
            self.fleet.replace(result.snapshot);
            changed = true;
        }
        while let Ok(status) = outputs.status.try_recv() {
            self.last_status = status.to_string();
            changed = true;
        }
        while let Ok(error) = outputs.errors.try_recv() {
            self.last_error = error.to_string();
            changed = true;
        }
        changed
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::EditFilter => return Flow::EditFilter,
            Command::ToggleDown => {
                self.view.only_down = !self.view.only_down;
                self.view.scroll.reset();
            }
            Command::SortBy(key) => {
                self.view.sort_key = key;
                self.last_status = format!("Sorting by {key}");
            }
            Command::ToggleReverse => self.view.reverse = !self.view.reverse,
            Command::ScrollUp => self.view.scroll.scroll_by(-1),
            Command::ScrollDown => self.view.scroll.scroll_by(1),
            Command::PageUp => self.view.scroll.page(false),
            Command::PageDown => self.view.scroll.page(true),
        }
        trace!(?command, offset = self.view.scroll.offset(), "view updated");
        Flow::Continue
    }

    /// Replace the regex filter. An invalid pattern is matched literally
    /// and its parse error shown in the last-error slot.
    pub fn set_filter(&mut self, pattern: &str) {
        let filter = RowFilter::new(pattern);
        if let Some(err) = filter.error() {
            self.last_error = format!("Invalid filter regex, matching literally: {err}");
        }
        self.view.filter = filter;
        self.view.scroll.reset();
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn check_size(width: usize, height: usize) -> Result<usize, ViewError> {
        if width < MIN_WIDTH {
            return Err(ViewError::TooNarrow { min: MIN_WIDTH });
        }
        if height <= CHROME_LINES {
            return Err(ViewError::TooShort {
                min: CHROME_LINES + 1,
            });
        }
        Ok(height - CHROME_LINES)
    }

    /// Build the full frame for a `width` x `height` terminal.
    pub fn render_frame(
        &mut self,
        width: usize,
        height: usize,
        now: DateTime<Local>,
    ) -> RenderedFrame {
        let viewport = match Self::check_size(width, height) {
            Ok(rows) => rows,
            Err(err) => {
                return RenderedFrame {
                    lines: vec![FrameLine::single(err.to_string(), StyleTag::Warning).clip(width)],
                };
            }
        };

        let resolver = self.resolver.as_ref();
        let selection = self.view.select(&self.fleet, resolver);
        self.view.scroll.set_bounds(selection.rows.len(), viewport);
        let scroll = self.view.scroll;
        let columns = columns::visible(width);

        let mut lines = Vec::with_capacity(height);
        lines.push(title_line(width, now));
        lines.push(FrameLine::blank());
        lines.push(labelled("Status: ", &self.last_status, StyleTag::Text, width));
        lines.push(labelled("Last Error: ", &self.last_error, StyleTag::Error, width));

        let window = scroll.window();
        let shown = window.len();
        lines.push(
            FrameLine::single(
                format!(
                    "Total LSPs {}   Displayed/Matched filter: {}/{} LSPs",
                    selection.total,
                    shown,
                    selection.rows.len()
                ),
                StyleTag::Text,
            )
            .clip(width),
        );
        lines.push(FrameLine::blank());
        lines.push(header_line(&columns));

        lines.push(if scroll.has_above() {
            FrameLine::single(SCROLL_UP_MARK, StyleTag::ScrollHint)
        } else {
            FrameLine::blank()
        });
        for lsp in &selection.rows[window] {
            lines.push(row_line(&columns, lsp, resolver));
        }
        for _ in shown..viewport {
            lines.push(FrameLine::blank());
        }
        lines.push(if scroll.has_below() {
            FrameLine::single(SCROLL_DOWN_MARK, StyleTag::ScrollHint)
        } else {
            FrameLine::blank()
        });

        lines.push(legend::legend(width, &self.view));
        RenderedFrame { lines }
    }
}

// ── Line builders ───────────────────────────────────────────────────

fn title_line(width: usize, now: DateTime<Local>) -> FrameLine {
    let clock = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let pad = width.saturating_sub(TITLE.len() + clock.len()).max(1);
    let mut line = FrameLine::single(TITLE, StyleTag::Title);
    line.push(" ".repeat(pad), StyleTag::Text);
    line.push(clock, StyleTag::Clock);
    line.clip(width)
}

fn labelled(label: &str, value: &str, style: StyleTag, width: usize) -> FrameLine {
    let mut line = FrameLine::single(label, StyleTag::Label);
    line.push(value, style);
    line.clip(width)
}

fn separator(line: &mut FrameLine, idx: usize) {
    if idx > 0 {
        line.push(" ".repeat(GAP), StyleTag::Text);
    }
}

fn header_line(columns: &[Column]) -> FrameLine {
    let mut line = FrameLine::default();
    for (idx, col) in columns.iter().enumerate() {
        separator(&mut line, idx);
        line.push(fit(col.header(), col.width(), col.align()), StyleTag::Header);
    }
    line
}

fn row_line(
    columns: &[Column],
    lsp: &lspmon_core::LabelSwitchedPath,
    resolver: &dyn Resolver,
) -> FrameLine {
    let mut line = FrameLine::default();
    for (idx, col) in columns.iter().enumerate() {
        separator(&mut line, idx);
        let cell = col.cell(lsp, resolver);
        line.push(fit(&cell.text, col.width(), col.align()), cell.style);
    }
    line
}
