//! SSH connection setup for one-shot remote commands.
//!
//! Provides [`connect_and_authenticate()`] for establishing a
//! password-authenticated `ssh2::Session`. Host keys are not checked:
//! any key the server presents is accepted.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::errors::SshError;

/// Where and how to open a remote command session.
#[derive(Clone)]
pub struct SshTarget<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub timeout: Duration,
}

/// Resolve `host:port` and connect to the first address that answers.
fn connect_tcp(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, SshError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| SshError::Connect(format!("{host}:{port}: {e}")))?
        .collect();

    let mut last_err = None;
    for addr in &addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(tcp) => return Ok(tcp),
            Err(e) => last_err = Some(e),
        }
    }

    Err(SshError::Connect(match last_err {
        Some(e) => format!("{host}:{port}: {e}"),
        None => format!("{host}:{port}: no addresses resolved"),
    }))
}

/// Connect to an SSH server, perform handshake, and authenticate by password.
///
/// Returns an authenticated `Session` in blocking mode with `timeout`
/// applied to every subsequent libssh2 call.
pub fn connect_and_authenticate(target: &SshTarget<'_>) -> Result<ssh2::Session, SshError> {
    let tcp = connect_tcp(target.host, target.port, target.timeout)?;
    tcp.set_read_timeout(Some(target.timeout)).ok();
    tcp.set_write_timeout(Some(target.timeout)).ok();

    let mut session = ssh2::Session::new().map_err(|e| SshError::Handshake(e.to_string()))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(u32::try_from(target.timeout.as_millis()).unwrap_or(u32::MAX));
    session
        .handshake()
        .map_err(|e| SshError::Handshake(e.to_string()))?;

    session
        .userauth_password(target.username, target.password)
        .map_err(|e| SshError::Auth(e.to_string()))?;

    if !session.authenticated() {
        return Err(SshError::Auth("server did not accept credentials".to_string()));
    }

    Ok(session)
}
