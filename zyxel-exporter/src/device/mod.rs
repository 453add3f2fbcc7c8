//! Device dialects for the supported router families.
//!
//! A [`Dialect`] is the fixed set of commands and text patterns for one
//! hardware/firmware family. [`resolve`] picks one per session and binds it
//! into a [`Device`], which fetches raw output through the command executor
//! and turns it into metric records.

mod identity;
mod interfaces;
mod registry;
pub mod vendors;

pub use identity::{IDENTIFY_COMMAND, parse_product_model, resolve};
pub use interfaces::parse_interfaces;
pub use registry::DialectRegistry;

use std::fmt;
use std::sync::Arc;

use crate::channel::ReadConfig;
use crate::driver::{RawCapture, execute_on};
use crate::error::Result;
use crate::metrics::{MetricRecord, render};
use crate::transport::Session;

/// Commands and parsers for one router family.
pub trait Dialect: Send + Sync {
    /// Product model identifier this dialect was written for.
    fn name(&self) -> &'static str;

    /// Command printing the DSL line status.
    fn dsl_command(&self) -> &'static str;

    /// Command printing interface statistics.
    fn interface_command(&self) -> &'static str {
        "ifconfig"
    }

    /// Parse DSL status output. Sections that do not match are skipped.
    fn parse_dsl(&self, raw: &str) -> Vec<MetricRecord>;

    /// Parse interface statistics output.
    fn parse_interfaces(&self, raw: &str) -> Vec<MetricRecord> {
        parse_interfaces(raw)
    }
}

/// A dialect bound to the model string the router reported.
#[derive(Clone)]
pub struct Device {
    model: String,
    dialect: Arc<dyn Dialect>,
}

impl Device {
    /// Bind a dialect to a reported model.
    pub fn new(model: impl Into<String>, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            model: model.into(),
            dialect,
        }
    }

    /// The model string the router reported.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The bound dialect.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Fetch raw DSL status text.
    pub async fn fetch_dsl<S: Session>(&self, session: &S, config: &ReadConfig) -> Result<RawCapture> {
        execute_on(session, self.dialect.dsl_command(), config).await
    }

    /// Fetch raw interface statistics text.
    pub async fn fetch_interfaces<S: Session>(
        &self,
        session: &S,
        config: &ReadConfig,
    ) -> Result<RawCapture> {
        execute_on(session, self.dialect.interface_command(), config).await
    }

    /// Parse DSL text; absent text yields no records.
    pub fn parse_dsl(&self, raw: Option<&str>) -> Vec<MetricRecord> {
        raw.map(|text| self.dialect.parse_dsl(text)).unwrap_or_default()
    }

    /// Parse interface text; absent text yields no records.
    pub fn parse_interfaces(&self, raw: Option<&str>) -> Vec<MetricRecord> {
        raw.map(|text| self.dialect.parse_interfaces(text))
            .unwrap_or_default()
    }

    /// Parse both captures and render the exposition document.
    pub fn render(&self, dsl: Option<&str>, interfaces: Option<&str>) -> String {
        render(&self.parse_dsl(dsl), &self.parse_interfaces(interfaces))
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("model", &self.model)
            .field("dialect", &self.dialect.name())
            .finish()
    }
}
