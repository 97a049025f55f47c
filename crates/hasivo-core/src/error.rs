//! Error types for the switch control crate.
//!
//! Failures are split by where they happen: before any request is issued
//! (`Configuration`), on the wire (`Connectivity`, `Protocol`, `Unknown`),
//! while reading telemetry (`Decode`) and while logging out (`Logout`).
//! `Decode` and `Logout` never reach the caller of a command: the decoder
//! downgrades the former into an "off" report and the session swallows the
//! latter.

use thiserror::Error;

/// Discriminant of a [`SwitchError`], handy for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchErrorKind {
    Configuration,
    Connectivity,
    Protocol,
    Decode,
    Logout,
    Unknown,
}

/// Unified error type for all switch operations.
#[derive(Debug, Clone, Error)]
pub enum SwitchError {
    /// Target address unresolved before use; no network attempt was made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Device unreachable, connection reset, or another client holds the login slot.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// Non-2xx HTTP status, usually a wrong password or an expired session.
    #[error("HTTP {status}: {message}")]
    Protocol { status: u16, message: String },

    /// Telemetry payload did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Logout or transport release failed.
    #[error("logout failed: {0}")]
    Logout(String),

    /// Anything else.
    #[error("{0}")]
    Unknown(String),
}

impl SwitchError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    pub fn protocol(status: u16, msg: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn logout(msg: impl Into<String>) -> Self {
        Self::Logout(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    pub fn kind(&self) -> SwitchErrorKind {
        match self {
            Self::Configuration(_) => SwitchErrorKind::Configuration,
            Self::Connectivity(_) => SwitchErrorKind::Connectivity,
            Self::Protocol { .. } => SwitchErrorKind::Protocol,
            Self::Decode(_) => SwitchErrorKind::Decode,
            Self::Logout(_) => SwitchErrorKind::Logout,
            Self::Unknown(_) => SwitchErrorKind::Unknown,
        }
    }
}

/// Which stage of a request a reqwest failure came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FailureFlags {
    pub timeout: bool,
    pub connect: bool,
    pub request: bool,
    pub status: Option<u16>,
}

impl SwitchError {
    /// Connect-phase timeouts (packets dropped by an absent host) count as
    /// unreachable; only timeouts after the connection is up are `Unknown`.
    pub(crate) fn classify(flags: FailureFlags, detail: impl std::fmt::Display) -> Self {
        if flags.connect || (flags.request && !flags.timeout) {
            Self::connectivity(format!(
                "connection reset or refused; check the address or whether another client is logged in: {detail}"
            ))
        } else if flags.timeout {
            Self::unknown(format!("request timed out: {detail}"))
        } else if let Some(status) = flags.status {
            Self::protocol(status, "check the password or whether the session has expired")
        } else {
            Self::unknown(format!("HTTP error: {detail}"))
        }
    }
}

impl From<reqwest::Error> for SwitchError {
    fn from(e: reqwest::Error) -> Self {
        let flags = FailureFlags {
            timeout: e.is_timeout(),
            connect: e.is_connect(),
            request: e.is_request(),
            status: e.status().map(|s| s.as_u16()),
        };
        Self::classify(flags, e)
    }
}

impl From<SwitchError> for String {
    fn from(e: SwitchError) -> String {
        e.to_string()
    }
}

/// Convenience alias.
pub type SwitchResult<T> = Result<T, SwitchError>;
