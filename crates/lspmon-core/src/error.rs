// ── Core error types ──
//
// Every per-device failure ends up as display data on the error channel.
// None of these terminate the poller.

use thiserror::Error;

/// Failure to establish a session with a device. Fatal to one poll attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Probe of {host} failed: {reason}")]
    Probe { host: String, reason: String },

    #[error("Authentication to {host} failed: {reason}")]
    Auth { host: String, reason: String },

    #[error("Connection to {host} refused")]
    Refused { host: String },

    #[error("Connection to {host} timed out after {timeout_secs}s")]
    Timeout { host: String, timeout_secs: u64 },

    #[error("Cannot connect to {host}: {reason}")]
    Other { host: String, reason: String },
}

/// The device answered, but not with usable LSP data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Malformed LSP data: {reason}")]
    Malformed { reason: String },

    #[error("Missing LSP data: {what}")]
    Missing { what: String },

    #[error("Query command failed: {reason}")]
    Command { reason: String },

    #[error("Query timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Outcome of a failed poll, as carried on the error channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Not connected")]
    NotConnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandwidthParseError {
    #[error("empty bandwidth value")]
    Empty,

    #[error("invalid bandwidth value: {input:?}")]
    Invalid { input: String },

    #[error("bandwidth value out of range: {input:?}")]
    OutOfRange { input: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
