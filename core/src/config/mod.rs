//! Environment-driven configuration.
//!
//! Targets are described by seven comma-separated, positionally aligned
//! lists. Entry `i` of every list belongs to target `i`; any length mismatch
//! is a startup error.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

/// Default idle time between polling cycles, in seconds.
pub const DEFAULT_DELAY_SECS: u64 = 5;

/// Default timeout applied to every outbound request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default location of the persisted document pointer.
pub const DEFAULT_STATE_FILE: &str = "message_tracker.json";

/// Default log file written next to the stderr output.
pub const DEFAULT_LOG_FILE: &str = "bot.log";

/// Default SSH port used by the reboot dispatcher.
pub const DEFAULT_SSH_PORT: u16 = 22;

const TARGET_LISTS: [&str; 7] = [
    "VPS_NAMES",
    "VPS_IPS",
    "VPS_USERS",
    "VPS_PASSWORDS",
    "PANEL_URLS",
    "PANEL_USERS",
    "PANEL_PASSWORDS",
];

/// One monitored server plus the credentials for its management panel.
///
/// Identity is the position in the configured lists.
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub host: String,
    pub ssh_user: String,
    pub ssh_password: String,
    pub panel_url: String,
    pub panel_user: String,
    pub panel_password: String,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("ssh_user", &self.ssh_user)
            .field("ssh_password", &"<redacted>")
            .field("panel_url", &self.panel_url)
            .field("panel_user", &self.panel_user)
            .field("panel_password", &"<redacted>")
            .finish()
    }
}

/// Complete process configuration.
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub channel_id: u64,
    pub targets: Vec<Target>,
    pub delay: Duration,
    pub request_timeout: Duration,
    pub ssh_port: u16,
    pub state_file: PathBuf,
    /// `None` disables the log file.
    pub log_file: Option<PathBuf>,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("targets", &self.targets)
            .field("delay", &self.delay)
            .field("request_timeout", &self.request_timeout)
            .field("ssh_port", &self.ssh_port)
            .field("state_file", &self.state_file)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl BotConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = required(&lookup, "BOT_TOKEN")?;

        let channel_raw = required(&lookup, "CHANNEL_ID")?;
        let channel_id = match channel_raw.parse::<u64>() {
            Ok(0) => {
                return Err(ConfigError::Invalid {
                    key: "CHANNEL_ID",
                    reason: "must be non-zero".to_string(),
                })
            }
            Ok(id) => id,
            Err(e) => {
                return Err(ConfigError::Invalid {
                    key: "CHANNEL_ID",
                    reason: e.to_string(),
                })
            }
        };

        let mut lists = Vec::with_capacity(TARGET_LISTS.len());
        for key in TARGET_LISTS {
            lists.push(split_list(&required(&lookup, key)?));
        }

        let expected = lists[0].len();
        for (key, list) in TARGET_LISTS.into_iter().zip(&lists) {
            if list.len() != expected {
                return Err(ConfigError::Misaligned {
                    key,
                    expected,
                    found: list.len(),
                });
            }
        }

        let targets = (0..expected)
            .map(|i| Target {
                name: lists[0][i].clone(),
                host: lists[1][i].clone(),
                ssh_user: lists[2][i].clone(),
                ssh_password: lists[3][i].clone(),
                panel_url: lists[4][i].trim_end_matches('/').to_string(),
                panel_user: lists[5][i].clone(),
                panel_password: lists[6][i].clone(),
            })
            .collect();

        let delay = Duration::from_secs(positive_secs(&lookup, "DELAY", DEFAULT_DELAY_SECS)?);
        let request_timeout = Duration::from_secs(positive_secs(
            &lookup,
            "REQUEST_TIMEOUT",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);

        let ssh_port = match optional(&lookup, "SSH_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "SSH_PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_SSH_PORT,
        };

        let state_file = optional(&lookup, "STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let log_file = log_file_from(lookup("LOG_FILE"));

        Ok(Self {
            bot_token,
            channel_id,
            targets,
            delay,
            request_timeout,
            ssh_port,
            state_file,
            log_file,
        })
    }
}

/// Resolve the raw `LOG_FILE` value. Unset means [`DEFAULT_LOG_FILE`]; an
/// explicitly empty value turns file logging off.
pub fn log_file_from(raw: Option<String>) -> Option<PathBuf> {
    match raw {
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => Some(PathBuf::from(raw.trim())),
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn positive_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = optional(lookup, key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

/// Split a comma-separated list, trimming whitespace around each entry.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
