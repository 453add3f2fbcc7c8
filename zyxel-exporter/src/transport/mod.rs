//! SSH transport layer wrapping russh.
//!
//! This module provides the connection management, authentication and shell
//! channel creation that the scraper drives through the [`Connector`] and
//! [`Session`] traits.

pub mod config;
mod session;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use session::{Connector, Session, ShellStream};
pub use ssh::{SshConnector, SshTransport};
