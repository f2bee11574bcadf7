//! Error types for the panelwatch core crate.
//!
//! Per-target errors (`PanelError`, `SshError`) are swallowed by the
//! aggregator and the reboot dispatcher and only ever surface as log lines
//! or as an `"Error: ..."` reply. `ConfigError` is fatal at startup.

use thiserror::Error;

/// Errors raised while assembling the configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing required variable: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The comma-separated target lists have different lengths.
    #[error("Target lists are misaligned: {key} has {found} entries, expected {expected}")]
    Misaligned {
        key: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Errors from the panel login and status endpoints.
#[derive(Error, Debug)]
pub enum PanelError {
    /// Connection, TLS or timeout failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The panel answered with a non-200 status.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not the expected JSON shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The body parsed but `success` was false or absent.
    #[error("Panel reported failure")]
    Rejected,

    /// Login succeeded but no session cookie was returned.
    #[error("Session cookie missing from login response")]
    MissingCookie,
}

/// Errors from opening or using a remote command session.
#[derive(Error, Debug)]
pub enum SshError {
    /// TCP connect or address resolution failed.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// SSH handshake failed.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// Password authentication was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Opening the channel or running the command failed.
    #[error("Command failed: {0}")]
    Exec(String),
}

/// Errors reported by a [`DisplaySink`](crate::aggregator::DisplaySink).
#[derive(Error, Debug)]
pub enum DisplayError {
    /// The referenced document no longer exists.
    #[error("Document not found: {0}")]
    NotFound(u64),

    /// Any other platform failure.
    #[error("{0}")]
    Platform(String),
}
