//! Terminal-independent frame: lines of styled text segments.
//!
//! The dashboard renders into this representation; `ui` maps it onto
//! ratatui widgets. Keeping the two apart lets tests inspect frames as
//! plain text.

use thiserror::Error;

/// Semantic style of a segment. `theme` owns the actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Title,
    Clock,
    Label,
    Text,
    Error,
    Header,
    Row,
    StateUp,
    StateDown,
    ScrollHint,
    LegendKey,
    LegendActive,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: StyleTag,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: StyleTag) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLine {
    pub segments: Vec<Segment>,
}

impl FrameLine {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn single(text: impl Into<String>, style: StyleTag) -> Self {
        Self {
            segments: vec![Segment::new(text, style)],
        }
    }

    pub fn push(&mut self, text: impl Into<String>, style: StyleTag) {
        self.segments.push(Segment::new(text, style));
    }

    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Drop everything past `width` characters.
    pub fn clip(mut self, width: usize) -> Self {
        let mut budget = width;
        self.segments.retain_mut(|seg| {
            if budget == 0 {
                return false;
            }
            let len = seg.text.chars().count();
            if len > budget {
                seg.text = seg.text.chars().take(budget).collect();
                budget = 0;
            } else {
                budget -= len;
            }
            true
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFrame {
    pub lines: Vec<FrameLine>,
}

impl RenderedFrame {
    /// Whole frame as newline-joined text.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(FrameLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The terminal cannot hold a usable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("TERMINAL NEEDS TO BE AT LEAST {min} CHARACTERS WIDE")]
    TooNarrow { min: usize },

    #[error("TERMINAL NEEDS TO BE AT LEAST {min} LINES TALL")]
    TooShort { min: usize },
}
