//! Command legend. Label verbosity follows the terminal width.

use super::frame::{FrameLine, StyleTag};
use super::view::{SortKey, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Full,
    Medium,
    Short,
}

impl Tier {
    fn for_width(width: usize) -> Self {
        if width > 120 {
            Self::Full
        } else if width > 100 {
            Self::Medium
        } else {
            Self::Short
        }
    }

    fn pick(self, full: &'static str, medium: &'static str, short: &'static str) -> &'static str {
        match self {
            Self::Full => full,
            Self::Medium => medium,
            Self::Short => short,
        }
    }
}

fn item(line: &mut FrameLine, text: impl Into<String>, active: bool) {
    let style = if active {
        StyleTag::LegendActive
    } else {
        StyleTag::LegendKey
    };
    line.push(text, style);
    line.push(" ", StyleTag::Text);
}

pub fn legend(width: usize, view: &ViewState) -> FrameLine {
    let tier = Tier::for_width(width);
    let sorted = |key: SortKey| view.sort_key == key;
    let mut line = FrameLine::default();

    item(&mut line, tier.pick("[Q]uit", "[Q]uit", "[Q]"), false);
    item(&mut line, tier.pick("[D]own LSPs", "[D]own", "[D]"), view.only_down);

    let label = tier.pick("Sort by:", "Sort:", "");
    if !label.is_empty() {
        line.push(label, StyleTag::Label);
    }
    item(&mut line, tier.pick("[N]ame", "[N]ame", "[N]"), sorted(SortKey::Name));
    item(
        &mut line,
        tier.pick("[B]andwidth", "[B]w", "[B]"),
        sorted(SortKey::Bandwidth),
    );
    item(
        &mut line,
        tier.pick("[S]ource IP", "[S]rc", "[S]"),
        sorted(SortKey::SourceAddress),
    );
    item(
        &mut line,
        tier.pick("[T]o IP", "[T]o", "[T]"),
        sorted(SortKey::DestinationAddress),
    );
    item(
        &mut line,
        tier.pick("[R]everse sort", "[R]ev", "[R]"),
        view.reverse,
    );

    let filter = tier.pick("[F]ilter: ", "[F]ilter: ", "[F] ");
    item(
        &mut line,
        format!("{filter}{}", view.filter.pattern()),
        view.filter.is_active(),
    );

    line.clip(width)
}
