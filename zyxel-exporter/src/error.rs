//! Error types for zyxel-exporter.

use std::io;
use thiserror::Error;

/// Main error type for scrape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Shell channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Device dialect errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Whether this error is a credential rejection.
    ///
    /// Bad credentials are the only condition the scraper never retries.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::AuthenticationFailed { .. })
        )
    }

    /// Whether the scraper should drop the session and try again.
    ///
    /// Every transport and channel fault qualifies except rejected
    /// credentials.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(TransportError::AuthenticationFailed { .. }) => false,
            Error::Transport(_) | Error::Channel(_) => true,
            Error::Device(_) => false,
        }
    }

    /// Whether the router's host key was refused.
    pub fn is_host_key_rejection(&self) -> bool {
        matches!(
            self,
            Error::Transport(
                TransportError::HostKeyChanged { .. } | TransportError::HostKeyUnknown { .. }
            )
        )
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key did not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is on
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// The session is no longer active
    #[error("SSH session not active")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Channel layer errors (shell I/O).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open the session channel
    #[error("Failed to open shell channel: {0}")]
    OpenFailed(russh::Error),

    /// Failed to request a PTY or shell
    #[error("Failed to request interactive shell")]
    ShellRequestFailed,

    /// I/O error on the shell stream
    #[error("Channel I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Device dialect errors.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// A dialect with this model identifier is already registered
    #[error("Dialect for model '{model}' already registered")]
    AlreadyRegistered { model: String },
}

/// Result type alias using the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_not_retryable() {
        let err: Error = TransportError::AuthenticationFailed {
            user: "admin".to_string(),
        }
        .into();
        assert!(err.is_auth_failure());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_disconnected_is_retryable() {
        let err: Error = TransportError::Disconnected.into();
        assert!(!err.is_auth_failure());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_channel_io_is_retryable() {
        let err: Error =
            ChannelError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset")).into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_host_key_rejection_is_retryable() {
        let err: Error = TransportError::HostKeyUnknown {
            host: "192.168.1.1".to_string(),
            port: 22,
        }
        .into();
        assert!(!err.is_auth_failure());
        assert!(err.is_retryable());
        assert!(err.is_host_key_rejection());
    }

    #[test]
    fn test_key_error_is_retryable() {
        let err: Error = TransportError::Key("bad passphrase".to_string()).into();
        assert!(err.is_retryable());
        assert!(!err.is_host_key_rejection());
    }

    #[test]
    fn test_display() {
        let err: Error = TransportError::AuthenticationFailed {
            user: "admin".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Transport error: Authentication failed for user 'admin'"
        );
    }
}
