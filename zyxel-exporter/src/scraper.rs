//! Scrape orchestration: session lifecycle, identity, fetching and retries.
//!
//! One [`Scraper`] owns at most one session and the dialect bound to it. A
//! scrape runs connect, identify, fetch, and on a transport fault drops the
//! session and starts over, up to a fixed number of attempts.

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::channel::ReadConfig;
use crate::device::{self, Device, DialectRegistry};
use crate::error::Result;
use crate::transport::{Connector, Session};

/// Which categories of raw text a scrape fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrapeScope {
    /// DSL status and interface statistics.
    #[default]
    Both,
    /// DSL status only.
    DslOnly,
    /// Interface statistics only.
    InterfacesOnly,
}

impl ScrapeScope {
    /// Whether DSL status is fetched.
    pub fn includes_dsl(&self) -> bool {
        matches!(self, ScrapeScope::Both | ScrapeScope::DslOnly)
    }

    /// Whether interface statistics are fetched.
    pub fn includes_interfaces(&self) -> bool {
        matches!(self, ScrapeScope::Both | ScrapeScope::InterfacesOnly)
    }
}

/// Raw text from one scrape. `None` means the category was not requested or
/// no data could be obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResult {
    pub dsl: Option<String>,
    pub interfaces: Option<String>,
}

impl ScrapeResult {
    /// Whether neither category produced text.
    pub fn is_empty(&self) -> bool {
        self.dsl.is_none() && self.interfaces.is_none()
    }
}

/// Scrape policy.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Categories to fetch.
    pub scope: ScrapeScope,

    /// Shell read settings.
    pub read: ReadConfig,

    /// Attempts per scrape before giving up.
    pub max_attempts: u32,

    /// Pause between attempts.
    pub retry_backoff: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scope: ScrapeScope::Both,
            read: ReadConfig::default(),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Owns the router session and the dialect identified on it.
pub struct Scraper<C: Connector> {
    connector: C,
    registry: DialectRegistry,
    config: ScraperConfig,
    session: Option<C::Session>,
    device: Option<Device>,
}

impl<C: Connector> Scraper<C> {
    /// Create a scraper with the built-in dialects.
    pub fn new(connector: C, config: ScraperConfig) -> Self {
        Self::with_registry(connector, DialectRegistry::builtin(), config)
    }

    /// Create a scraper with a custom dialect registry.
    pub fn with_registry(connector: C, registry: DialectRegistry, config: ScraperConfig) -> Self {
        Self {
            connector,
            registry,
            config,
            session: None,
            device: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// The device identified on the current session, if any.
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    /// Whether a session is currently held.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Fetch raw text for the configured scope.
    ///
    /// Bad credentials are returned as an error straight away. Any other
    /// transport fault, a refused host key included, discards the session
    /// and retries after a short pause; once the attempts are used up the
    /// result is empty rather than an error.
    pub async fn scrape(&mut self) -> Result<ScrapeResult> {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.attempt().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_auth_failure() => {
                    error!("{}", e);
                    self.reset().await;
                    return Err(e);
                }
                Err(e) if e.is_retryable() => {
                    if e.is_host_key_rejection() {
                        error!("scrape attempt {}/{} failed: {}", attempt, attempts, e);
                    } else {
                        warn!("scrape attempt {}/{} failed: {}", attempt, attempts, e);
                    }
                    self.reset().await;
                    if attempt < attempts {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
                Err(e) => {
                    self.reset().await;
                    return Err(e);
                }
            }
        }

        error!("no data after {} attempts", attempts);
        Ok(ScrapeResult::default())
    }

    /// Render a scrape result with the bound dialect. Empty when no device
    /// has been identified.
    pub fn render(&self, result: &ScrapeResult) -> String {
        match &self.device {
            Some(device) => device.render(result.dsl.as_deref(), result.interfaces.as_deref()),
            None => String::new(),
        }
    }

    /// Scrape and render in one step.
    pub async fn scrape_and_render(&mut self) -> Result<String> {
        let result = self.scrape().await?;
        Ok(self.render(&result))
    }

    /// Drop the session and the device bound to it.
    pub async fn disconnect(&mut self) {
        self.reset().await;
    }

    async fn attempt(&mut self) -> Result<ScrapeResult> {
        if self.session.as_ref().is_some_and(|s| !s.is_alive()) {
            debug!("session no longer active, reconnecting");
            self.reset().await;
        }

        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let session = self.connector.connect().await?;
                info!("session established");
                session
            }
        };
        let session = &*self.session.insert(session);

        if self.device.is_none() {
            self.device = device::resolve(session, &self.registry, &self.config.read).await?;
        }
        let Some(device) = &self.device else {
            return Ok(ScrapeResult::default());
        };

        let scope = self.config.scope;
        let read = &self.config.read;

        let dsl = if scope.includes_dsl() {
            Some(device.fetch_dsl(session, read).await?.into_text())
        } else {
            None
        };
        let interfaces = if scope.includes_interfaces() {
            Some(device.fetch_interfaces(session, read).await?.into_text())
        } else {
            None
        };

        Ok(ScrapeResult { dsl, interfaces })
    }

    async fn reset(&mut self) {
        self.device = None;
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                debug!("error closing session: {}", e);
            }
        }
    }
}
