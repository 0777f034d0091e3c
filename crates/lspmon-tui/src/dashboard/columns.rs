//! Table columns and width-driven column elision.

use std::net::IpAddr;

use lspmon_core::{ActiveBandwidth, LabelSwitchedPath, LspState, Resolver};

use super::frame::StyleTag;

/// Space between adjacent columns.
pub const GAP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Every column the table can show, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Ccsd,
    Vpn,
    FromHost,
    FromAddress,
    ToHost,
    ToAddress,
    Bandwidth,
    State,
}

/// Columns dropped together, first tier first, until the table fits.
/// Name and State are never dropped.
const ELISION_TIERS: [&[Column]; 5] = [
    &[Column::FromHost, Column::ToHost],
    &[Column::Bandwidth],
    &[Column::Vpn],
    &[Column::Ccsd],
    &[Column::FromAddress, Column::ToAddress],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub style: StyleTag,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleTag::Row,
        }
    }
}

impl Column {
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Ccsd,
        Self::Vpn,
        Self::FromHost,
        Self::FromAddress,
        Self::ToHost,
        Self::ToAddress,
        Self::Bandwidth,
        Self::State,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Ccsd => "CCSD",
            Self::Vpn => "L3VPN",
            Self::FromHost => "From",
            Self::FromAddress => "From Address",
            Self::ToHost => "To",
            Self::ToAddress => "To Address",
            Self::Bandwidth => "Bandwidth",
            Self::State => "State",
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::Name => 30,
            Self::Ccsd => 6,
            Self::Vpn => 20,
            Self::FromHost | Self::ToHost | Self::Bandwidth => 12,
            Self::FromAddress | Self::ToAddress => 15,
            Self::State => 7,
        }
    }

    pub fn align(self) -> Align {
        match self {
            Self::Bandwidth | Self::State => Align::Right,
            _ => Align::Left,
        }
    }

    /// Cell content for `lsp`. Untruncated; layout clips to `width()`.
    pub fn cell(self, lsp: &LabelSwitchedPath, resolver: &dyn Resolver) -> Cell {
        let host = |addr: Option<IpAddr>| {
            addr.and_then(|a| resolver.resolve(a))
                .unwrap_or_default()
                .to_owned()
        };
        let addr = |addr: Option<IpAddr>| addr.map(|a| a.to_string()).unwrap_or_default();

        match self {
            Self::Name => Cell::plain(lsp.name.clone()),
            Self::Ccsd => Cell::plain(lsp.ccsd().unwrap_or_default()),
            Self::Vpn => Cell::plain(lsp.vpn().unwrap_or_default()),
            Self::FromHost => Cell::plain(host(lsp.source_address)),
            Self::FromAddress => Cell::plain(addr(lsp.source_address)),
            Self::ToHost => Cell::plain(host(lsp.destination_address)),
            Self::ToAddress => Cell::plain(addr(lsp.destination_address)),
            Self::Bandwidth => Cell::plain(match lsp.active_bandwidth() {
                ActiveBandwidth::Rate(bw) => bw.to_string(),
                ActiveBandwidth::Unspecified => "0".to_owned(),
                ActiveBandwidth::NoActivePath => String::new(),
            }),
            Self::State => Cell {
                text: lsp.state.to_string(),
                style: match lsp.state {
                    LspState::Up => StyleTag::StateUp,
                    LspState::Down => StyleTag::StateDown,
                    LspState::Unknown => StyleTag::Row,
                },
            },
        }
    }
}

/// Total width of `columns` laid out with gaps.
pub fn span(columns: &[Column]) -> usize {
    let widths: usize = columns.iter().map(|c| c.width()).sum();
    widths + GAP * columns.len().saturating_sub(1)
}

/// Columns that fit in `width`, eliding whole tiers in priority order.
pub fn visible(width: usize) -> Vec<Column> {
    let mut columns = Column::ALL.to_vec();
    for tier in ELISION_TIERS {
        if span(&columns) <= width {
            break;
        }
        columns.retain(|c| !tier.contains(c));
    }
    columns
}

/// Pad or clip `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize, align: Align) -> String {
    let clipped: String = text.chars().take(width).collect();
    match align {
        Align::Left => format!("{clipped:<width$}"),
        Align::Right => format!("{clipped:>width$}"),
    }
}
