//! Palette and the mapping from frame style tags to terminal styles.

use ratatui::style::{Color, Modifier, Style};

use crate::dashboard::frame::StyleTag;

// ── Core Palette ──────────────────────────────────────────────────────

pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Legend entry that is currently in effect.
pub fn key_hint_active() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

pub fn style(tag: StyleTag) -> Style {
    match tag {
        StyleTag::Title => title_style(),
        StyleTag::Clock | StyleTag::Label => Style::default().fg(CORAL),
        StyleTag::Text => Style::default().fg(DIM_WHITE),
        StyleTag::Error => Style::default().fg(ERROR_RED),
        StyleTag::Header => table_header(),
        StyleTag::Row => table_row(),
        StyleTag::StateUp => Style::default().fg(SUCCESS_GREEN),
        StyleTag::StateDown => Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
        StyleTag::ScrollHint | StyleTag::LegendKey => key_hint(),
        StyleTag::LegendActive => key_hint_active(),
        StyleTag::Warning => Style::default()
            .fg(ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD),
    }
}
