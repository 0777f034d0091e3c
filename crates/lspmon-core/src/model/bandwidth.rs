// ── Bandwidth value type ──
//
// Rates are stored as whole bits per second. Human strings use decimal
// SI suffixes (k/m/g) and an optional "bps" tail, e.g. "1.5m", "2Gbps".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BandwidthParseError;

const UNITS: [(u64, char); 3] = [(1_000_000_000, 'g'), (1_000_000, 'm'), (1_000, 'k')];

/// A rate in bits per second, totally ordered by magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BandwidthRepr", into = "String")]
pub struct Bandwidth(u64);

impl Bandwidth {
    pub const ZERO: Self = Self(0);

    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub const fn bps(self) -> u64 {
        self.0
    }
}

impl FromStr for Bandwidth {
    type Err = BandwidthParseError;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let body = lowered.strip_suffix("bps").unwrap_or(&lowered).trim_end();
        if body.is_empty() {
            return Err(BandwidthParseError::Empty);
        }

        let (digits, multiplier) = split_suffix(body);
        let invalid = || BandwidthParseError::Invalid {
            input: s.to_owned(),
        };
        let value: f64 = digits.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }

        let bps = (value * multiplier).round();
        if bps > u64::MAX as f64 {
            return Err(BandwidthParseError::OutOfRange {
                input: s.to_owned(),
            });
        }
        Ok(Self(bps as u64))
    }
}

fn split_suffix(body: &str) -> (&str, f64) {
    if let Some(digits) = body.strip_suffix('k') {
        (digits, 1e3)
    } else if let Some(digits) = body.strip_suffix('m') {
        (digits, 1e6)
    } else if let Some(digits) = body.strip_suffix('g') {
        (digits, 1e9)
    } else {
        (body, 1.0)
    }
}

impl fmt::Display for Bandwidth {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (unit, suffix) in UNITS {
            // Unit choice happens after rounding to display precision, so
            // 999_999_999 renders as "1g" rather than "1000m".
            let scaled = (self.0 as f64 / unit as f64 * 1000.0).round() / 1000.0;
            if scaled >= 1.0 {
                let text = format!("{scaled:.3}");
                let text = text.trim_end_matches('0').trim_end_matches('.');
                return write!(f, "{text}{suffix}");
            }
        }
        write!(f, "{}", self.0)
    }
}

// ── Serde plumbing ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum BandwidthRepr {
    Bps(u64),
    Text(String),
}

impl TryFrom<BandwidthRepr> for Bandwidth {
    type Error = BandwidthParseError;

    fn try_from(repr: BandwidthRepr) -> Result<Self, Self::Error> {
        match repr {
            BandwidthRepr::Bps(bps) => Ok(Self(bps)),
            BandwidthRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Bandwidth> for String {
    fn from(bw: Bandwidth) -> Self {
        bw.to_string()
    }
}
