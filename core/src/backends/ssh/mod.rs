//! Remote reboot over SSH.
//!
//! Every reboot opens its own session, runs a single privileged command and
//! disconnects. Failures are logged and turned into an `"Error: ..."`
//! message; [`Rebooter::reboot`] never fails.

pub mod auth;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::{Target, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SSH_PORT};
use crate::errors::SshError;

use self::auth::{connect_and_authenticate, SshTarget};

/// Command issued on the remote host.
pub const REBOOT_COMMAND: &str = "sudo reboot";

/// Message returned when the command was dispatched.
pub const REBOOT_SUCCESS: &str = "Reboot command sent successfully.";

/// Blocking reboot dispatch.
///
/// Implementations run on a blocking thread; see [`dispatch_reboot`].
pub trait Rebooter: Send + Sync {
    /// Reboot `host` and describe the outcome. Never panics on remote failure.
    fn reboot(&self, host: &str, user: &str, password: &str) -> String;
}

/// [`Rebooter`] that uses `ssh2` password authentication.
#[derive(Debug, Clone)]
pub struct SshRebooter {
    port: u16,
    timeout: Duration,
}

impl Default for SshRebooter {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SshRebooter {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    fn try_reboot(&self, host: &str, user: &str, password: &str) -> Result<(), SshError> {
        let session = connect_and_authenticate(&SshTarget {
            host,
            port: self.port,
            username: user,
            password,
            timeout: self.timeout,
        })?;

        let mut channel = session
            .channel_session()
            .map_err(|e| SshError::Exec(format!("channel open failed: {e}")))?;
        channel
            .exec(REBOOT_COMMAND)
            .map_err(|e| SshError::Exec(format!("exec failed: {e}")))?;

        // The host is going down; don't wait for output or exit status.
        channel.close().ok();
        session.disconnect(None, "reboot dispatched", None).ok();
        Ok(())
    }
}

impl Rebooter for SshRebooter {
    fn reboot(&self, host: &str, user: &str, password: &str) -> String {
        match self.try_reboot(host, user, password) {
            Ok(()) => {
                info!(host, "Reboot command sent");
                REBOOT_SUCCESS.to_string()
            }
            Err(e) => {
                error!(host, "Error rebooting host: {e}");
                format!("Error: {e}")
            }
        }
    }
}

/// Run a reboot on the blocking pool and return its outcome message.
pub async fn dispatch_reboot(rebooter: Arc<dyn Rebooter>, target: &Target) -> String {
    let host = target.host.clone();
    let user = target.ssh_user.clone();
    let password = target.ssh_password.clone();

    match tokio::task::spawn_blocking(move || rebooter.reboot(&host, &user, &password)).await {
        Ok(message) => message,
        Err(e) => {
            error!(server = %target.name, "Reboot task panicked: {e}");
            format!("Error: {e}")
        }
    }
}
