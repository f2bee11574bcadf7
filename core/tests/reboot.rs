//! Reboot dispatcher tests.
//!
//! The live-server cases need an SSH container with password auth on port
//! 2201 (user `testuser`, password `testpass`) and skip gracefully when it
//! is not running.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{closed_port, require_ssh_container, target, PORT_SSH_PASSWORD};
use panelwatch_core::backends::{dispatch_reboot, Rebooter, SshRebooter, REBOOT_SUCCESS};

#[test]
fn refused_connection_returns_error_message() {
    let rebooter = SshRebooter::new(closed_port(), Duration::from_secs(2));
    let message = rebooter.reboot("127.0.0.1", "root", "root");
    assert!(message.starts_with("Error:"), "got {message}");
    assert!(message.contains("Connection failed"), "got {message}");
}

#[tokio::test]
async fn dispatch_never_raises_for_unreachable_host() {
    let rebooter: Arc<dyn Rebooter> =
        Arc::new(SshRebooter::new(closed_port(), Duration::from_secs(2)));
    let message = dispatch_reboot(rebooter, &target("alpha", "127.0.0.1", "http://unused")).await;
    assert!(message.starts_with("Error:"), "got {message}");
}

#[test]
fn bad_credentials_return_error_message() {
    require_ssh_container!(PORT_SSH_PASSWORD);

    let rebooter = SshRebooter::new(PORT_SSH_PASSWORD, Duration::from_secs(5));
    let message = rebooter.reboot("127.0.0.1", "testuser", "wrong-password");
    assert!(message.starts_with("Error: Authentication failed"), "got {message}");
}

#[test]
fn valid_credentials_report_success() {
    require_ssh_container!(PORT_SSH_PASSWORD);

    let rebooter = SshRebooter::new(PORT_SSH_PASSWORD, Duration::from_secs(5));
    let message = rebooter.reboot("127.0.0.1", "testuser", "testpass");
    assert_eq!(message, REBOOT_SUCCESS);
}
