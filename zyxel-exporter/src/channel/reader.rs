//! Prompt-delimited reads over an interactive shell stream.

use std::time::Duration;

use bytes::{BufMut, BytesMut};
use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};
use tokio::time::Instant;

use super::matcher::TerminatorMatcher;
use crate::error::{ChannelError, Result};

/// Prompt printed by the ZySH command shell.
pub const DEFAULT_PROMPT: &str = "ZySH> ";

/// Configuration for shell channel reads.
#[derive(Debug, Clone)]
pub struct ReadConfig {
    /// Deadline for a single read phase, measured from the start of the read.
    pub timeout: Duration,

    /// The shell prompt that ends every response.
    pub prompt: String,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

/// Result of a read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// The data that was read, without the terminator.
    pub data: Vec<u8>,

    /// Whether the terminator was matched. `false` means the read hit its
    /// deadline or the end of the stream and `data` may be truncated.
    pub matched: bool,
}

impl ReadResult {
    fn matched(data: Vec<u8>) -> Self {
        Self {
            data,
            matched: true,
        }
    }

    fn partial(data: Vec<u8>) -> Self {
        Self {
            data,
            matched: false,
        }
    }

    /// Get the data as a string (lossy UTF-8).
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// Interactive shell channel with terminator-based reads.
///
/// Output is consumed one byte at a time from a buffered stream and fed to a
/// [`TerminatorMatcher`], because the device marks neither the start nor the
/// end of a response: the only delimiters are the echoed command and the
/// prompt that follows the output.
pub struct ShellChannel<S> {
    /// Buffered shell stream.
    stream: BufStream<S>,

    /// Read configuration.
    config: ReadConfig,

    /// Set once the stream ended or a read timed out.
    closed: bool,
}

impl<S> ShellChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a raw shell stream.
    pub fn new(stream: S, config: ReadConfig) -> Self {
        Self {
            stream: BufStream::new(stream),
            config,
            closed: false,
        }
    }

    /// Wrap a raw shell stream with the default configuration.
    pub fn with_defaults(stream: S) -> Self {
        Self::new(stream, ReadConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// The prompt this channel waits for.
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Whether the channel has been closed by a timeout or end of stream.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Read until the stream ends with `terminator` or the read deadline
    /// passes.
    ///
    /// On a match the terminator is stripped from the returned data. On
    /// timeout the channel is closed and whatever arrived is returned with
    /// `matched == false`; end of stream is treated the same way. Only a
    /// genuine I/O failure is an error.
    pub async fn read_until(&mut self, terminator: &[u8]) -> Result<ReadResult> {
        if self.closed {
            return Ok(ReadResult::partial(Vec::new()));
        }

        let mut matcher = TerminatorMatcher::new(terminator);
        if matcher.is_empty() {
            return Ok(ReadResult::matched(Vec::new()));
        }

        let deadline = Instant::now() + self.config.timeout;
        let mut buffer = BytesMut::with_capacity(4096);

        loop {
            match tokio::time::timeout_at(deadline, self.stream.read_u8()).await {
                Ok(Ok(byte)) => {
                    buffer.put_u8(byte);
                    if matcher.push(byte) {
                        buffer.truncate(buffer.len() - matcher.len());
                        trace!(
                            "read {} bytes before {:?}",
                            buffer.len(),
                            String::from_utf8_lossy(terminator)
                        );
                        return Ok(ReadResult::matched(buffer.to_vec()));
                    }
                }
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!(
                        "stream ended after {} bytes while waiting for {:?}",
                        buffer.len(),
                        String::from_utf8_lossy(terminator)
                    );
                    self.closed = true;
                    return Ok(ReadResult::partial(buffer.to_vec()));
                }
                Ok(Err(e)) => return Err(ChannelError::Io(e).into()),
                Err(_) => {
                    warn!(
                        "timed out after {:?} waiting for {:?} ({} bytes read)",
                        self.config.timeout,
                        String::from_utf8_lossy(terminator),
                        buffer.len()
                    );
                    self.close().await;
                    return Ok(ReadResult::partial(buffer.to_vec()));
                }
            }
        }
    }

    /// Read until the shell prompt.
    pub async fn read_to_prompt(&mut self) -> Result<ReadResult> {
        let prompt = self.config.prompt.clone();
        self.read_until(prompt.as_bytes()).await
    }

    /// Send one line of input followed by a newline.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.stream
            .write_all(line.as_bytes())
            .await
            .map_err(ChannelError::Io)?;
        self.stream.write_all(b"\n").await.map_err(ChannelError::Io)?;
        self.stream.flush().await.map_err(ChannelError::Io)?;
        Ok(())
    }

    /// Close the channel. Further reads return empty, unmatched results.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.shutdown().await {
            debug!("error shutting down shell channel: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::duplex;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_until_strips_terminator() {
        let mock = Builder::new().read(b"Welcome\r\nZySH> ").build();
        let mut channel = ShellChannel::with_defaults(mock);

        let result = channel.read_to_prompt().await.unwrap();
        assert!(result.matched);
        assert_eq!(result.as_str(), "Welcome\r\n");
        assert!(!channel.is_closed());
    }

    #[tokio::test]
    async fn test_read_until_across_chunks() {
        let mock = Builder::new()
            .read(b"line one\r\nZy")
            .read(b"SH> ")
            .build();
        let mut channel = ShellChannel::with_defaults(mock);

        let result = channel.read_to_prompt().await.unwrap();
        assert!(result.matched);
        assert_eq!(result.as_str(), "line one\r\n");
    }

    #[tokio::test]
    async fn test_consecutive_reads_share_stream() {
        let mock = Builder::new()
            .read(b"ifconfig\r\nbr0 stats\r\nZySH> ")
            .build();
        let mut channel = ShellChannel::with_defaults(mock);

        let echo = channel.read_until(b"ifconfig\r\n").await.unwrap();
        assert!(echo.matched);
        assert!(echo.data.is_empty());

        let output = channel.read_to_prompt().await.unwrap();
        assert_eq!(output.as_str(), "br0 stats\r\n");
    }

    #[tokio::test]
    async fn test_end_of_stream_returns_partial() {
        let mock = Builder::new().read(b"truncated out").build();
        let mut channel = ShellChannel::with_defaults(mock);

        let result = channel.read_to_prompt().await.unwrap();
        assert!(!result.matched);
        assert_eq!(result.as_str(), "truncated out");
        assert!(channel.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_partial_and_closes() {
        let (client, mut server) = duplex(1024);
        server.write_all(b"half a resp").await.unwrap();

        let mut channel = ShellChannel::with_defaults(client);
        let start = Instant::now();
        let result = channel.read_to_prompt().await.unwrap();

        assert!(!result.matched);
        assert_eq!(result.as_str(), "half a resp");
        assert!(channel.is_closed());
        assert!(start.elapsed() >= Duration::from_secs(5));

        // Closed channels do not block again
        let again = channel.read_to_prompt().await.unwrap();
        assert!(!again.matched);
        assert!(again.data.is_empty());
        drop(server);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timeout() {
        let (client, _server) = duplex(64);
        let config = ReadConfig {
            timeout: Duration::from_millis(250),
            ..ReadConfig::default()
        };
        let mut channel = ShellChannel::new(client, config);

        let start = Instant::now();
        let result = channel.read_to_prompt().await.unwrap();
        assert!(!result.matched);
        assert!(result.data.is_empty());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_write_line_appends_newline() {
        let mock = Builder::new().write(b"xdslctl info\n").build();
        let mut channel = ShellChannel::with_defaults(mock);
        channel.write_line("xdslctl info").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_utf8_bytes_are_kept() {
        let mock = Builder::new().read(b"caf\xe9\r\nZySH> ").build();
        let mut channel = ShellChannel::with_defaults(mock);

        let result = channel.read_to_prompt().await.unwrap();
        assert_eq!(result.data, b"caf\xe9\r\n");
    }
}
