//! Maps dashboard frames onto ratatui widgets.

use chrono::Local;
use color_eyre::eyre::Result;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use tui_input::Input;

use crate::dashboard::Dashboard;
use crate::dashboard::frame::{FrameLine, RenderedFrame};
use crate::theme;

pub const PROMPT_LABEL: &str = "Filter regex: ";

fn to_line(line: &FrameLine) -> Line<'_> {
    line.segments
        .iter()
        .map(|seg| Span::styled(seg.text.as_str(), theme::style(seg.style)))
        .collect::<Vec<_>>()
        .into()
}

fn render(frame: &mut Frame, rendered: &RenderedFrame) {
    let lines: Vec<Line<'_>> = rendered.lines.iter().map(to_line).collect();
    frame.render_widget(Paragraph::new(lines), frame.area());
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Filter prompt on the bottom row, with the cursor placed in the input.
fn render_prompt(frame: &mut Frame, input: &Input) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    frame.render_widget(Clear, row);

    let label_width = clamp_u16(PROMPT_LABEL.len()).min(row.width);
    let field_width = usize::from(row.width - label_width);
    let scroll = input.visual_scroll(field_width);

    let label = Rect::new(row.x, row.y, label_width, 1);
    let field = Rect::new(row.x + label_width, row.y, row.width - label_width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(PROMPT_LABEL, theme::title_style())),
        label,
    );
    frame.render_widget(
        Paragraph::new(input.value())
            .style(theme::table_row())
            .scroll((0, clamp_u16(scroll))),
        field,
    );

    let cursor = input.visual_cursor().saturating_sub(scroll);
    frame.set_cursor_position((field.x + clamp_u16(cursor), field.y));
}

/// Render the dashboard, and the filter prompt over its legend if given.
pub fn draw<B>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard,
    prompt: Option<&Input>,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    terminal.draw(|frame| {
        let area = frame.area();
        let rendered = dashboard.render_frame(
            usize::from(area.width),
            usize::from(area.height),
            Local::now(),
        );
        render(frame, &rendered);
        if let Some(input) = prompt {
            render_prompt(frame, input);
        }
    })?;
    Ok(())
}
