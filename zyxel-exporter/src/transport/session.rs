//! The seam between the scraper and whatever provides shell sessions.
//!
//! [`SshTransport`](super::SshTransport) is the real implementation; tests
//! plug in scripted in-memory sessions.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

/// A bidirectional byte stream to an interactive shell.
pub trait ShellStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> ShellStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// An authenticated session that can open interactive shells.
pub trait Session: Send + Sync {
    /// Stream type for a single shell.
    type Stream: ShellStream + 'static;

    /// Open a fresh interactive shell on this session.
    fn open_shell(&self) -> impl Future<Output = Result<Self::Stream>> + Send;

    /// Whether the underlying connection is still usable.
    fn is_alive(&self) -> bool;

    /// Tear the session down.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Establishes authenticated sessions.
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Session: Session;

    /// Connect and authenticate.
    ///
    /// Rejected credentials must be reported as
    /// [`TransportError::AuthenticationFailed`](crate::error::TransportError::AuthenticationFailed)
    /// so they are never retried.
    fn connect(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}
