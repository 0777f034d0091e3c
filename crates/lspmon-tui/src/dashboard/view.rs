//! Operator-controlled view state: filters, sort order and scroll.

use std::cmp::Ordering;

use lspmon_core::{FleetView, LabelSwitchedPath, Resolver};
use regex::Regex;

use super::columns::Column;
use super::scroll::ScrollState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum SortKey {
    #[default]
    Name,
    #[strum(serialize = "Source IP")]
    SourceAddress,
    #[strum(serialize = "To IP")]
    DestinationAddress,
    Bandwidth,
}

impl SortKey {
    pub fn compare(self, a: &LabelSwitchedPath, b: &LabelSwitchedPath) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::SourceAddress => a.source_address.cmp(&b.source_address),
            Self::DestinationAddress => a.destination_address.cmp(&b.destination_address),
            Self::Bandwidth => a.active_bandwidth().cmp(&b.active_bandwidth()),
        }
    }
}

/// Compiled regex filter. An empty pattern matches everything.
///
/// A pattern that is not a valid regex is matched literally instead, and
/// the parse failure is kept for display.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    pattern: String,
    regex: Option<Regex>,
    error: Option<String>,
}

impl RowFilter {
    pub fn new(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self::default();
        }
        let (regex, error) = match Regex::new(pattern) {
            Ok(re) => (Some(re), None),
            Err(e) => (Regex::new(&regex::escape(pattern)).ok(), Some(e.to_string())),
        };
        Self {
            pattern: pattern.to_owned(),
            regex,
            error,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when any displayed attribute of `lsp` matches.
    pub fn matches(&self, lsp: &LabelSwitchedPath, resolver: &dyn Resolver) -> bool {
        let Some(re) = &self.regex else {
            return true;
        };
        Column::ALL
            .iter()
            .any(|col| re.is_match(&col.cell(lsp, resolver).text))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub only_down: bool,
    pub sort_key: SortKey,
    pub reverse: bool,
    pub filter: RowFilter,
    pub scroll: ScrollState,
}

/// Rows after filtering and sorting, plus the pre-filter total.
pub struct Selection<'a> {
    pub total: usize,
    pub rows: Vec<&'a LabelSwitchedPath>,
}

impl ViewState {
    /// Flatten, filter and sort the ingress LSPs of `fleet`.
    pub fn select<'a>(&self, fleet: &'a FleetView, resolver: &dyn Resolver) -> Selection<'a> {
        let candidates: Vec<_> = fleet.ingress().collect();
        let total = candidates.len();

        let mut rows: Vec<_> = candidates
            .into_iter()
            .filter(|lsp| self.filter.matches(lsp, resolver))
            .filter(|lsp| !self.only_down || lsp.is_down())
            .collect();

        let key = self.sort_key;
        if self.reverse {
            rows.sort_by(|a, b| key.compare(a, b).reverse());
        } else {
            rows.sort_by(|a, b| key.compare(a, b));
        }
        Selection { total, rows }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lspmon_core::{DeviceId, Inventory, LspPath, LspSnapshot, LspState};
    use pretty_assertions::assert_eq;

    fn lsp(name: &str) -> LabelSwitchedPath {
        LabelSwitchedPath {
            name: name.into(),
            ..LabelSwitchedPath::default()
        }
    }

    fn fleet(lsps: Vec<LabelSwitchedPath>) -> FleetView {
        let mut fleet = FleetView::default();
        fleet.replace(LspSnapshot::new(DeviceId::from("pe1"), lsps));
        fleet
    }

    fn names(sel: &Selection<'_>) -> Vec<String> {
        sel.rows.iter().map(|l| l.name.clone()).collect()
    }

    fn active(bandwidth: Option<&str>) -> Vec<LspPath> {
        vec![LspPath {
            name: "primary".into(),
            is_active: true,
            bandwidth: bandwidth.map(|b| b.parse().unwrap()),
            ..LspPath::default()
        }]
    }

    #[test]
    fn bandwidth_sort_orders_missing_paths_first() {
        let mut a = lsp("A");
        a.paths = active(Some("10m"));
        let mut b = lsp("B");
        b.paths = active(None);
        let c = lsp("C");

        let fleet = fleet(vec![a, b, c]);
        let mut view = ViewState {
            sort_key: SortKey::Bandwidth,
            ..ViewState::default()
        };
        let inv = Inventory::default();
        assert_eq!(names(&view.select(&fleet, &inv)), ["C", "B", "A"]);

        view.reverse = true;
        assert_eq!(names(&view.select(&fleet, &inv)), ["A", "B", "C"]);
    }

    #[test]
    fn down_filter_keeps_order() {
        let mut rows = vec![lsp("one"), lsp("two"), lsp("three")];
        rows[0].state = LspState::Up;
        rows[1].state = LspState::Down;
        rows[2].state = LspState::Up;
        let fleet = fleet(rows);

        let view = ViewState {
            only_down: true,
            ..ViewState::default()
        };
        let sel = view.select(&fleet, &Inventory::default());
        assert_eq!(names(&sel), ["two"]);
        assert_eq!(sel.total, 3);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut rows = vec![lsp("x"), lsp("y"), lsp("z")];
        for r in &mut rows {
            r.source_address = Some("10.0.0.1".parse().unwrap());
        }
        let fleet = fleet(rows);
        let view = ViewState {
            sort_key: SortKey::SourceAddress,
            ..ViewState::default()
        };
        assert_eq!(
            names(&view.select(&fleet, &Inventory::default())),
            ["x", "y", "z"]
        );
    }

    #[test]
    fn regex_matches_any_displayed_attribute() {
        let dst = "10.0.0.9".parse().unwrap();
        let inv = Inventory::new([("pe9-core", vec![dst])]);
        let mut hit = lsp("unrelated");
        hit.destination_address = Some(dst);
        let fleet = fleet(vec![hit, lsp("other")]);

        let view = ViewState {
            filter: RowFilter::new("pe9"),
            ..ViewState::default()
        };
        assert_eq!(names(&view.select(&fleet, &inv)), ["unrelated"]);

        let view = ViewState {
            filter: RowFilter::new(r"^oth"),
            ..ViewState::default()
        };
        assert_eq!(names(&view.select(&fleet, &inv)), ["other"]);
    }

    #[test]
    fn invalid_regex_matches_literally() {
        let filter = RowFilter::new("lsp(");
        assert!(filter.is_active());
        assert!(filter.error().is_some());

        let inv = Inventory::default();
        assert!(filter.matches(&lsp("to-lsp(1)"), &inv));
        assert!(!filter.matches(&lsp("to-lsp1"), &inv));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = RowFilter::new("");
        assert!(!filter.is_active());
        assert!(filter.matches(&lsp("any"), &Inventory::default()));
    }
}
