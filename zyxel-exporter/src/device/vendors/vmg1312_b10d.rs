//! Zyxel VMG1312-B10D (ADSL/VDSL via `xdslctl`).
//!
//! ```text
//! xdslctl: ADSL driver and PHY status
//! Status: Showtime
//! Last Retrain Reason:	0
//! Last initialization procedure status:	0
//! Max:	Upstream rate = 7833 Kbps, Downstream rate = 47522 Kbps
//! Bearer:	0, Upstream rate = 7833 Kbps, Downstream rate = 39999 Kbps
//! Bearer:	1, Upstream rate = 0 Kbps, Downstream rate = 0 Kbps
//! ```
//!
//! Bearers reporting zero in both directions are inactive and produce no
//! samples.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::device::Dialect;
use crate::metrics::MetricRecord;

/// Product model identifier.
pub const MODEL: &str = "VMG1312-B10D";

static MAX_LINE_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Max:\s+Upstream rate = (?P<upstream>\d+) Kbps,\s+Downstream rate = (?P<downstream>\d+) Kbps",
    )
    .unwrap()
});

static LINE_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Bearer:\s+(?P<bearer>\d+), Upstream rate = (?P<upstream>\d+) Kbps,\s+Downstream rate = (?P<downstream>\d+) Kbps",
    )
    .unwrap()
});

/// Dialect for the VMG1312-B10D and firmware sharing its `xdslctl` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vmg1312B10d;

impl Dialect for Vmg1312B10d {
    fn name(&self) -> &'static str {
        MODEL
    }

    fn dsl_command(&self) -> &'static str {
        "xdslctl info"
    }

    fn parse_dsl(&self, raw: &str) -> Vec<MetricRecord> {
        let mut output = Vec::new();

        for caps in LINE_RATE_RE.captures_iter(raw) {
            let Some((up, down)) = rates_bps(&caps) else {
                continue;
            };
            if up == 0 && down == 0 {
                continue;
            }
            let bearer = &caps["bearer"];
            output.push(line_rate(bearer, "up", up));
            output.push(line_rate(bearer, "down", down));
        }

        if let Some((up, down)) = MAX_LINE_RATE_RE.captures(raw).as_ref().and_then(rates_bps) {
            output.push(max_line_rate("up", up));
            output.push(max_line_rate("down", down));
        }

        output
    }
}

/// Upstream and downstream rates converted from Kbps to bps.
fn rates_bps(caps: &Captures<'_>) -> Option<(u64, u64)> {
    let kbps = |name: &str| caps[name].parse::<u64>().ok()?.checked_mul(1000);
    Some((kbps("upstream")?, kbps("downstream")?))
}

fn line_rate(bearer: &str, stream: &str, bps: u64) -> MetricRecord {
    MetricRecord::gauge("zyxel_line_rate", bps)
        .with_help("The line rate.")
        .with_label("bearer", bearer)
        .with_label("stream", stream)
}

fn max_line_rate(stream: &str, bps: u64) -> MetricRecord {
    MetricRecord::gauge("zyxel_max_line_rate", bps)
        .with_help("The maximum attainable line rate.")
        .with_label("stream", stream)
}
