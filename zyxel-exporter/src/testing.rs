//! In-memory sessions for exercising the scrape path without SSH.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, duplex};

use crate::channel::DEFAULT_PROMPT;
use crate::error::{ChannelError, Result, TransportError};
use crate::transport::{Connector, Session};

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    /// Echo the command, then never prompt again.
    Hang,
}

/// A session whose shells answer commands from a fixed script.
///
/// Every shell prints the prompt, then for each command line echoes it and
/// prints the scripted output followed by the prompt. Commands without a
/// script produce no output. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    replies: Arc<HashMap<String, Reply>>,
    opens: Arc<AtomicUsize>,
    failing_opens: Arc<AtomicUsize>,
    dead: Arc<AtomicBool>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `output`.
    pub fn respond(mut self, command: &str, output: &str) -> Self {
        Arc::make_mut(&mut self.replies).insert(command.to_string(), Reply::Output(output.into()));
        self
    }

    /// Echo `command` but never return to the prompt.
    pub fn hang(mut self, command: &str) -> Self {
        Arc::make_mut(&mut self.replies).insert(command.to_string(), Reply::Hang);
        self
    }

    /// Fail the next `count` shell opens.
    pub fn failing_opens(self, count: usize) -> Self {
        self.failing_opens.store(count, Ordering::SeqCst);
        self
    }

    /// Number of shells opened successfully.
    pub fn opened(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Make the session report itself dead.
    pub fn kill(&self) {
        self.dead.store(true, Ordering::SeqCst);
    }

    fn revive(&self) {
        self.dead.store(false, Ordering::SeqCst);
    }
}

impl Session for ScriptedSession {
    type Stream = DuplexStream;

    async fn open_shell(&self) -> Result<DuplexStream> {
        if self.dead.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected.into());
        }
        if self
            .failing_opens
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ChannelError::ShellRequestFailed.into());
        }

        self.opens.fetch_add(1, Ordering::SeqCst);
        let (client, server) = duplex(64 * 1024);
        tokio::spawn(serve_shell(server, self.replies.clone()));
        Ok(client)
    }

    fn is_alive(&self) -> bool {
        !self.dead.load(Ordering::SeqCst)
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}

async fn serve_shell(stream: DuplexStream, replies: Arc<HashMap<String, Reply>>) {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();

    if writer.write_all(DEFAULT_PROMPT.as_bytes()).await.is_err() {
        return;
    }

    while let Ok(Some(line)) = lines.next_line().await {
        let command = line.trim_end_matches('\r');
        let response = match replies.get(command) {
            Some(Reply::Output(output)) => format!("{}\r\n{}{}", command, output, DEFAULT_PROMPT),
            Some(Reply::Hang) => format!("{}\r\n", command),
            None => format!("{}\r\n{}", command, DEFAULT_PROMPT),
        };
        if writer.write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}

/// Hands out a [`ScriptedSession`], optionally failing first.
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    session: ScriptedSession,
    failures: Arc<AtomicUsize>,
    reject: bool,
    host_key_changed: bool,
    connects: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new(session: ScriptedSession) -> Self {
        Self {
            session,
            failures: Arc::new(AtomicUsize::new(0)),
            reject: false,
            host_key_changed: false,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Report the session inactive on the next `count` connects.
    pub fn failing(self, count: usize) -> Self {
        self.failures.store(count, Ordering::SeqCst);
        self
    }

    /// Reject every connect as bad credentials.
    pub fn rejecting_credentials(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Refuse every connect because the host key changed.
    pub fn rejecting_host_key(mut self) -> Self {
        self.host_key_changed = true;
        self
    }

    /// Number of connect attempts so far.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// The shared session handed out on success.
    pub fn session(&self) -> &ScriptedSession {
        &self.session
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self) -> Result<ScriptedSession> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(TransportError::AuthenticationFailed {
                user: "admin".to_string(),
            }
            .into());
        }
        if self.host_key_changed {
            return Err(TransportError::HostKeyChanged {
                host: "192.168.1.1".to_string(),
                port: 22,
                line: 1,
            }
            .into());
        }
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(TransportError::Disconnected.into());
        }

        self.session.revive();
        Ok(self.session.clone())
    }
}
