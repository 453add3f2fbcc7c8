//! # zyxel-exporter
//!
//! Scrape DSL line and network interface statistics from Zyxel VMG routers
//! over SSH and render them in the Prometheus exposition format.
//!
//! The router offers no structured output. Each command runs in the
//! interactive ZySH shell and its response is cut out of the byte stream
//! between the echoed command and the next `ZySH> ` prompt, then parsed with
//! a per-model set of regular expressions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zyxel_exporter::{AuthMethod, Scraper, ScraperConfig, SshConfig, SshConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zyxel_exporter::Error> {
//!     let ssh = SshConfig::new("192.168.1.1", "admin", AuthMethod::password("1234"));
//!     let mut scraper = Scraper::new(SshConnector::new(ssh), ScraperConfig::default());
//!
//!     let result = scraper.scrape().await?;
//!     println!("{}", scraper.render(&result));
//!
//!     scraper.disconnect().await;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod cli;
pub mod device;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod scraper;
pub mod server;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use device::{Device, Dialect, DialectRegistry};
pub use driver::RawCapture;
pub use error::Error;
pub use metrics::{MetricKind, MetricRecord, MetricValue};
pub use scraper::{ScrapeResult, ScrapeScope, Scraper, ScraperConfig};
pub use transport::{AuthMethod, SshConfig, SshConnector};
