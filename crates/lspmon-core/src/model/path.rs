// ── LSP path model ──
//
// A path is one candidate route (primary or secondary) of a
// label-switched path. Paths are owned by their parent LSP.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use super::bandwidth::Bandwidth;

// ── Priority ────────────────────────────────────────────────────────

/// Setup and hold priority, each in `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPriority")]
pub struct PathPriority {
    setup: u8,
    hold: u8,
}

impl PathPriority {
    pub const MAX: u8 = 7;

    pub fn new(setup: u8, hold: u8) -> Option<Self> {
        (setup <= Self::MAX && hold <= Self::MAX).then_some(Self { setup, hold })
    }

    pub fn setup(self) -> u8 {
        self.setup
    }

    pub fn hold(self) -> u8 {
        self.hold
    }
}

impl fmt::Display for PathPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.setup, self.hold)
    }
}

#[derive(Deserialize)]
struct RawPriority {
    setup: u8,
    hold: u8,
}

impl TryFrom<RawPriority> for PathPriority {
    type Error = String;

    fn try_from(raw: RawPriority) -> Result<Self, Self::Error> {
        Self::new(raw.setup, raw.hold).ok_or_else(|| {
            format!(
                "priority {} {} outside 0..={}",
                raw.setup,
                raw.hold,
                Self::MAX
            )
        })
    }
}

/// Out-of-range priorities are dropped rather than failing the snapshot.
fn lenient_priority<'de, D>(de: D) -> Result<Option<PathPriority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPriority>::deserialize(de)?;
    Ok(raw.and_then(|r| PathPriority::new(r.setup, r.hold)))
}

fn lenient_cos<'de, D>(de: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<u8>::deserialize(de)?;
    Ok(raw.filter(|c| *c <= PathPriority::MAX))
}

// ── Explicit route ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HopKind {
    Strict,
    Loose,
}

/// One hop of an explicit route object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EroHop {
    pub address: IpAddr,
    pub kind: HopKind,
}

impl fmt::Display for EroHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            HopKind::Strict => 'S',
            HopKind::Loose => 'L',
        };
        write!(f, "{tag} {}", self.address)
    }
}

// ── Admin groups ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminGroupKind {
    Exclude,
    IncludeAll,
    IncludeAny,
}

/// A named set of admin groups with one constraint semantic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGroupConstraint {
    pub kind: AdminGroupKind,
    #[serde(default)]
    pub extended: bool,
    pub groups: Vec<String>,
}

impl fmt::Display for AdminGroupConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            AdminGroupKind::Exclude => "Exclude",
            AdminGroupKind::IncludeAll => "Include All",
            AdminGroupKind::IncludeAny => "Include Any",
        };
        let extended = if self.extended { " Extended" } else { "" };
        let noun = if self.groups.len() == 1 {
            "Admin Group"
        } else {
            "Admin Groups"
        };
        write!(f, "{verb}{extended} {noun}: {}", self.groups.join(", "))
    }
}

// ── History ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Device-local timestamp text, kept verbatim.
    pub time: String,
    pub log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Path history ordered by sequence number.
///
/// Only sequence numbers in `1..=999` are retained. Re-inserting an
/// existing sequence number overwrites the earlier event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<i64, HistoryEvent>", into = "BTreeMap<u16, HistoryEvent>")]
pub struct PathHistory(BTreeMap<u16, HistoryEvent>);

impl PathHistory {
    pub const MAX_SEQUENCE: u16 = 999;

    /// Insert an event; returns `false` when the sequence is out of range.
    pub fn insert(&mut self, sequence: u16, event: HistoryEvent) -> bool {
        if sequence == 0 || sequence > Self::MAX_SEQUENCE {
            return false;
        }
        self.0.insert(sequence, event);
        true
    }

    pub fn get(&self, sequence: u16) -> Option<&HistoryEvent> {
        self.0.get(&sequence)
    }

    pub fn latest(&self) -> Option<(u16, &HistoryEvent)> {
        self.0.last_key_value().map(|(k, v)| (*k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &HistoryEvent)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Devices report sequence numbers of any width; those outside the window
/// are dropped here instead of failing the whole report.
impl From<BTreeMap<i64, HistoryEvent>> for PathHistory {
    fn from(raw: BTreeMap<i64, HistoryEvent>) -> Self {
        let mut history = Self::default();
        for (seq, event) in raw {
            if let Ok(seq) = u16::try_from(seq) {
                history.insert(seq, event);
            }
        }
        history
    }
}

impl From<PathHistory> for BTreeMap<u16, HistoryEvent> {
    fn from(history: PathHistory) -> Self {
        history.0
    }
}

// ── Path ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum PathRole {
    Primary,
    Secondary,
}

/// One candidate path of an LSP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LspPath {
    pub name: String,
    pub role: Option<PathRole>,
    pub is_active: bool,
    #[serde(deserialize_with = "lenient_priority")]
    pub priority: Option<PathPriority>,
    pub bandwidth: Option<Bandwidth>,
    pub explicit_route: Vec<EroHop>,
    pub admin_groups: Vec<AdminGroupConstraint>,
    pub history: PathHistory,
    #[serde(deserialize_with = "lenient_cos")]
    pub cos: Option<u8>,
    pub optimize_timer: Option<u32>,
    pub cspf_metric: Option<u32>,
    pub no_decrement_ttl: bool,
    pub no_record_route: bool,
}
