//! Router identification.
//!
//! `sys atsh` prints the manufacturing information block:
//!
//! ```text
//! Firmware Version        : V1.00(AAJZ.14)C0
//! Bootbase Version        : V1.01 | 04/11/2017 11:28:53
//! Vendor Name             : Zyxel Communications Corp.
//! Product Model           : VMG1312-B10D
//! ```

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Device, DialectRegistry};
use crate::channel::ReadConfig;
use crate::driver::execute_on;
use crate::error::Result;
use crate::transport::Session;

/// Command that prints the product model.
pub const IDENTIFY_COMMAND: &str = "sys atsh";

static PRODUCT_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Product Model\s*:[ \t]*(?P<model>[^\s]+)").unwrap());

/// Extract the product model from identification output.
pub fn parse_product_model(raw: &str) -> Option<&str> {
    PRODUCT_MODEL_RE
        .captures(raw)
        .and_then(|caps| caps.name("model"))
        .map(|m| m.as_str())
}

/// Identify the router on `session` and bind the matching dialect.
///
/// Returns `Ok(None)` when the response carries no product model; the caller
/// must not run dialect-specific commands in that case. A model that is
/// present but unknown binds the registry's default dialect.
pub async fn resolve<S: Session>(
    session: &S,
    registry: &DialectRegistry,
    config: &ReadConfig,
) -> Result<Option<Device>> {
    let capture = execute_on(session, IDENTIFY_COMMAND, config).await?;

    let Some(model) = parse_product_model(&capture.text) else {
        warn!(
            "no product model in {:?} output ({} bytes)",
            IDENTIFY_COMMAND,
            capture.text.len()
        );
        return Ok(None);
    };

    if !registry.contains(model) {
        debug!(
            "model {} not registered, using {}",
            model,
            registry.default_dialect().name()
        );
    }
    let dialect = registry.lookup(model);
    info!("identified {} (dialect {})", model, dialect.name());

    Ok(Some(Device::new(model, dialect)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::ScriptedSession;

    const ATSH: &str = "Firmware Version        : V5.13(ABCD.2)C0\r\n\
        Vendor Name             : Zyxel Communications Corp.\r\n\
        Product Model           : VMG1312-T20B\r\n\
        MAC Address             : E4186B068770\r\n";

    #[test]
    fn test_parse_product_model() {
        assert_eq!(parse_product_model(ATSH), Some("VMG1312-T20B"));
    }

    #[test]
    fn test_parse_product_model_missing() {
        assert_eq!(parse_product_model("Vendor Name : Zyxel\r\n"), None);
        assert_eq!(parse_product_model("Product Model :\r\n"), None);
        assert_eq!(parse_product_model(""), None);
    }

    #[tokio::test]
    async fn test_resolve_known_model() {
        let session = ScriptedSession::new().respond(IDENTIFY_COMMAND, ATSH);
        let device = resolve(&session, &DialectRegistry::builtin(), &ReadConfig::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(device.model(), "VMG1312-T20B");
        assert_eq!(device.dialect().name(), "VMG1312-T20B");
    }

    #[tokio::test]
    async fn test_resolve_unknown_model_uses_default() {
        let session =
            ScriptedSession::new().respond(IDENTIFY_COMMAND, "Product Model : VMG3925-B10B\r\n");
        let device = resolve(&session, &DialectRegistry::builtin(), &ReadConfig::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(device.model(), "VMG3925-B10B");
        assert_eq!(device.dialect().name(), "VMG1312-B10D");
    }

    #[tokio::test]
    async fn test_resolve_without_model_is_none() {
        let session = ScriptedSession::new().respond(IDENTIFY_COMMAND, "Unknown command\r\n");
        let device = resolve(&session, &DialectRegistry::builtin(), &ReadConfig::default())
            .await
            .unwrap();
        assert!(device.is_none());
    }
}
