//! Modal filter prompt.
//!
//! While the prompt is open the control loop is suspended: only key events
//! are read, and the dashboard is redrawn after each edit.

use color_eyre::eyre::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tui_input::{Input, InputRequest};

use crate::dashboard::Dashboard;
use crate::event::{Event, EventReader};
use crate::tui::InputModeGuard;
use crate::ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Commit(String),
    Cancel,
}

/// What one key does to the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Edit(InputRequest),
    Commit,
    Cancel,
    Ignore,
}

fn step(key: KeyEvent) -> Step {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Step::Commit,
        KeyCode::Esc => Step::Cancel,
        KeyCode::Char('c') if ctrl => Step::Cancel,
        KeyCode::Char('u') if ctrl => Step::Edit(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Step::Edit(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Step::Edit(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Step::Edit(InputRequest::GoToEnd),
        KeyCode::Char(c) if !ctrl => Step::Edit(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Step::Edit(InputRequest::DeletePrevChar),
        KeyCode::Delete => Step::Edit(InputRequest::DeleteNextChar),
        KeyCode::Left => Step::Edit(InputRequest::GoToPrevChar),
        KeyCode::Right => Step::Edit(InputRequest::GoToNextChar),
        KeyCode::Home => Step::Edit(InputRequest::GoToStart),
        KeyCode::End => Step::Edit(InputRequest::GoToEnd),
        _ => Step::Ignore,
    }
}

/// Run the prompt until Enter or Esc, pre-filled with the current filter.
pub async fn run<B>(
    terminal: &mut Terminal<B>,
    events: &mut EventReader,
    dashboard: &mut Dashboard,
) -> Result<PromptOutcome>
where
    B: Backend + Send,
    B::Error: Send + Sync + 'static,
{
    let _restore = InputModeGuard;
    let mut input = Input::new(dashboard.view().filter.pattern().to_owned());

    loop {
        ui::draw(terminal, dashboard, Some(&input))?;

        let Some(event) = events.next().await else {
            bail!("terminal event stream closed during filter prompt");
        };
        let Event::Key(key) = event else {
            continue;
        };
        match step(key) {
            Step::Commit => return Ok(PromptOutcome::Commit(input.value().to_owned())),
            Step::Cancel => return Ok(PromptOutcome::Cancel),
            Step::Edit(request) => {
                input.handle(request);
            }
            Step::Ignore => {}
        }
    }
}
