//! Remote command backends.

pub mod ssh;

pub use ssh::{dispatch_reboot, Rebooter, SshRebooter, REBOOT_COMMAND, REBOOT_SUCCESS};
