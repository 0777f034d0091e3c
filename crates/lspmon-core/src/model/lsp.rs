// ── Label-switched path ──

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::bandwidth::Bandwidth;
use super::path::{LspPath, PathRole};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum LspState {
    #[serde(alias = "up", alias = "UP")]
    Up,
    #[serde(rename = "Dn", alias = "Down", alias = "down", alias = "DOWN")]
    #[strum(serialize = "Dn")]
    Down,
    #[default]
    #[serde(other)]
    #[strum(serialize = "--")]
    Unknown,
}

/// Signalling role of the local device for this LSP.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionRole {
    #[default]
    Ingress,
    Transit,
    Egress,
}

/// Auto-bandwidth settings of an LSP, when enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoBandwidth {
    pub minimum: Option<Bandwidth>,
    pub maximum: Option<Bandwidth>,
    pub max_average: Option<Bandwidth>,
    pub adjust_interval_secs: Option<u32>,
    pub adjust_threshold_percent: Option<u8>,
    pub monitor_only: bool,
}

/// Bandwidth of the active path, as used for ordering.
///
/// An LSP without an active path sorts below one whose active path carries
/// no bandwidth statement, which sorts below any concrete rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActiveBandwidth {
    NoActivePath,
    Unspecified,
    Rate(Bandwidth),
}

/// One label-switched path as reported by a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSwitchedPath {
    pub name: String,
    pub state: LspState,
    pub session_role: SessionRole,
    pub source_address: Option<IpAddr>,
    pub destination_address: Option<IpAddr>,
    /// `None` means the metric is taken from the IGP.
    pub metric: Option<u32>,
    pub bandwidth: Option<Bandwidth>,
    pub fast_reroute: bool,
    pub link_protection: bool,
    pub node_protection: bool,
    pub active_path: Option<String>,
    pub active_path_role: Option<PathRole>,
    pub paths: Vec<LspPath>,
    pub description: Option<String>,
    pub route_count: Option<u32>,
    pub lsp_type: Option<String>,
    pub egress_label_operation: Option<String>,
    pub load_balance: Option<String>,
    pub revert_timer: Option<u32>,
    pub autobandwidth: Option<AutoBandwidth>,
}

impl LabelSwitchedPath {
    pub fn is_down(&self) -> bool {
        self.state == LspState::Down
    }

    /// Second `:`-separated segment of the name.
    pub fn ccsd(&self) -> Option<&str> {
        self.name.split(':').nth(1)
    }

    /// Leading segment of the name, only when the name is segmented.
    pub fn vpn(&self) -> Option<&str> {
        self.name.split_once(':').map(|(vpn, _)| vpn)
    }

    /// The active child path: the one flagged active, else the one named
    /// by `active_path`.
    pub fn active(&self) -> Option<&LspPath> {
        self.paths.iter().find(|p| p.is_active).or_else(|| {
            let name = self.active_path.as_deref()?;
            self.paths.iter().find(|p| p.name == name)
        })
    }

    pub fn active_bandwidth(&self) -> ActiveBandwidth {
        match self.active() {
            None => ActiveBandwidth::NoActivePath,
            Some(path) => path
                .bandwidth
                .map_or(ActiveBandwidth::Unspecified, ActiveBandwidth::Rate),
        }
    }

    pub fn penultimate_hop_popping(&self) -> bool {
        self.egress_label_operation
            .as_deref()
            .is_some_and(|op| op.eq_ignore_ascii_case("penultimate hop popping"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lsp(name: &str) -> LabelSwitchedPath {
        LabelSwitchedPath {
            name: name.into(),
            ..LabelSwitchedPath::default()
        }
    }

    #[test]
    fn name_segments() {
        let l = lsp("CUST-A:123456:primary");
        assert_eq!(l.vpn(), Some("CUST-A"));
        assert_eq!(l.ccsd(), Some("123456"));

        let plain = lsp("to-pe2");
        assert_eq!(plain.vpn(), None);
        assert_eq!(plain.ccsd(), None);
    }

    #[test]
    fn active_path_falls_back_to_named_path() {
        let mut l = lsp("x");
        l.paths = vec![
            LspPath {
                name: "a".into(),
                ..LspPath::default()
            },
            LspPath {
                name: "b".into(),
                bandwidth: Some("10m".parse().unwrap()),
                ..LspPath::default()
            },
        ];
        assert_eq!(l.active_bandwidth(), ActiveBandwidth::NoActivePath);

        l.active_path = Some("b".into());
        assert_eq!(l.active().map(|p| p.name.as_str()), Some("b"));
        assert_eq!(
            l.active_bandwidth(),
            ActiveBandwidth::Rate("10m".parse().unwrap())
        );

        l.paths[0].is_active = true;
        assert_eq!(l.active_bandwidth(), ActiveBandwidth::Unspecified);
    }

    #[test]
    fn active_bandwidth_ordering() {
        let rate = ActiveBandwidth::Rate(Bandwidth::ZERO);
        assert!(ActiveBandwidth::NoActivePath < ActiveBandwidth::Unspecified);
        assert!(ActiveBandwidth::Unspecified < rate);
    }

    #[test]
    fn penultimate_hop_popping_follows_egress_operation() {
        let mut l = lsp("x");
        assert!(!l.penultimate_hop_popping());

        l.egress_label_operation = Some("Penultimate hop popping".into());
        assert!(l.penultimate_hop_popping());

        l.egress_label_operation = Some("Push 3".into());
        assert!(!l.penultimate_hop_popping());
    }

    #[test]
    fn state_parses_device_spellings() {
        let states: Vec<LspState> =
            serde_json::from_str(r#"["Up", "Dn", "down", "Restarting"]"#).unwrap();
        assert_eq!(
            states,
            vec![LspState::Up, LspState::Down, LspState::Down, LspState::Unknown]
        );
        assert_eq!(LspState::Down.to_string(), "Dn");
    }
}
