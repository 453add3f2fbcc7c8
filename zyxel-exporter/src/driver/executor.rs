//! Single-command execution over a shell channel.

use std::time::Instant;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use super::response::RawCapture;
use crate::channel::{ReadConfig, ShellChannel};
use crate::error::Result;
use crate::transport::Session;

/// Sends commands over a [`ShellChannel`] and captures their output.
///
/// A command's response is bounded by the prompt appearing twice: once
/// before the command is sent, and once after its output. The shell echoes
/// the command first, which is read and discarded.
pub struct CommandExecutor<S> {
    channel: ShellChannel<S>,
}

impl<S> CommandExecutor<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create an executor over an existing channel.
    pub fn new(channel: ShellChannel<S>) -> Self {
        Self { channel }
    }

    /// Run `command` and return its output.
    ///
    /// Never retries. If the shell stops responding, each read phase gives
    /// up at its deadline and the capture comes back incomplete, possibly
    /// empty.
    pub async fn execute(&mut self, command: &str) -> Result<RawCapture> {
        let start = Instant::now();

        // Skip any banner or leftover output up to the first prompt
        let banner = self.channel.read_to_prompt().await?;
        if self.channel.is_closed() {
            debug!("no prompt before {:?}, giving up", command);
            return Ok(RawCapture::new(command, "", false, start.elapsed()));
        }

        self.channel.write_line(command).await?;

        let echo = format!("{}\r\n", command);
        let echoed = self.channel.read_until(echo.as_bytes()).await?;

        let output = self.channel.read_to_prompt().await?;

        let complete = banner.matched && echoed.matched && output.matched;
        let elapsed = start.elapsed();
        debug!(
            "{:?}: {} bytes in {:?}{}",
            command,
            output.data.len(),
            elapsed,
            if complete { "" } else { " (incomplete)" }
        );

        Ok(RawCapture::new(
            command,
            output.as_str().into_owned(),
            complete,
            elapsed,
        ))
    }

    /// Close the underlying channel.
    pub async fn close(mut self) {
        self.channel.close().await;
    }
}

/// Open a fresh shell on `session`, run one command, and close the shell.
pub async fn execute_on<T: Session>(
    session: &T,
    command: &str,
    config: &ReadConfig,
) -> Result<RawCapture> {
    let stream = session.open_shell().await?;
    let mut executor = CommandExecutor::new(ShellChannel::new(stream, config.clone()));
    let capture = executor.execute(command).await?;
    executor.close().await;
    Ok(capture)
}
