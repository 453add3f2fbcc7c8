//! Zyxel VMG1312-T20B (VDSL2 via `dsllinestatus`).
//!
//! ```text
//! =============================================================================
//!     xDSLFwVersion:      FwVer:5.10.6.0_B_A60901 HwVer:T14.F7_0.0
//!        Line State:      Up
//!        Modulation:      ITU G.993.2(VDSL2), G.998.4(G.I
//! =============================================================================
//!
//! near-end interleaved channel bit rate: 27397 kbps
//! near-end fast channel bit rate: 0 kbps
//! far-end interleaved channel bit rate: 0 kbps
//! far-end fast channel bit rate: 4294 kbps
//!
//! near-end FEC error fast: 0
//! near-end FEC error interleaved: 599876
//! ...
//! far-end HEC error interleaved: 0
//!
//! Downstream:
//! relative capacity occupation: 100%
//! noise margin downstream: 7.4 dB
//! output power upstream: 7.0 dbm
//! attenuation downstream: 21.8 dB
//!
//! Upstream:
//! relative capacity occupation: 100%
//! noise margin upstream: 8.1 dB
//! output power downstream: 12.1 dbm
//! attenuation upstream: 6.6 dB
//! ```
//!
//! Near-end figures describe the downstream direction and far-end figures
//! the upstream direction. Each direction carries a fast and an interleaved
//! path; only one is normally active, so the line rate is the larger of the
//! two. Error counters are read from the near-end interleaved and far-end
//! fast paths only.

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::device::Dialect;
use crate::metrics::MetricRecord;

/// Product model identifier.
pub const MODEL: &str = "VMG1312-T20B";

static CHANNEL_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<end>near|far)-end (?P<path>fast|interleaved) channel bit rate:[ \t]*(?P<rate>\d+) kbps",
    )
    .unwrap()
});

static LINE_ERROR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<end>near|far)-end (?P<kind>FEC|CRC|HEC) error (?P<path>fast|interleaved):[ \t]*(?P<count>\d+)",
    )
    .unwrap()
});

static LINE_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Line State:[ \t]*(?P<state>[A-Za-z_]+)").unwrap());

static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?P<direction>Downstream|Upstream):[ \t]*$").unwrap()
});

static CAPACITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"relative capacity occupation:[ \t]*(?P<value>\d+(?:\.\d+)?)[ \t]*%").unwrap()
});

static NOISE_MARGIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"noise margin \w+:[ \t]*(?P<value>-?\d+(?:\.\d+)?)[ \t]*dB").unwrap()
});

static OUTPUT_POWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)output power \w+:[ \t]*(?P<value>-?\d+(?:\.\d+)?)[ \t]*dbm").unwrap()
});

static ATTENUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"attenuation \w+:[ \t]*(?P<value>-?\d+(?:\.\d+)?)[ \t]*dB").unwrap()
});

/// Signal-quality families read from each direction's report section.
static SIGNAL_FIELDS: Lazy<[(&'static str, &'static str, &'static Regex); 4]> = Lazy::new(|| {
    [
        (
            "zyxel_line_noise_capacity_occupation_percent",
            "Relative capacity occupation.",
            &*CAPACITY_RE,
        ),
        ("zyxel_line_noise_margin_db", "Noise margin.", &*NOISE_MARGIN_RE),
        (
            "zyxel_line_noise_output_power_dbm",
            "Output power.",
            &*OUTPUT_POWER_RE,
        ),
        (
            "zyxel_line_noise_attenuation_db",
            "Line attenuation.",
            &*ATTENUATION_RE,
        ),
    ]
});

const ERROR_TYPES: [&str; 3] = ["fec", "crc", "hec"];

/// Coarse DSL link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Down,
    Initializing,
    Training,
    Up,
}

impl LineState {
    /// Every state, in output order.
    pub const ALL: [LineState; 4] = [
        LineState::Down,
        LineState::Initializing,
        LineState::Training,
        LineState::Up,
    ];

    /// Label value for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineState::Down => "down",
            LineState::Initializing => "initializing",
            LineState::Training => "training",
            LineState::Up => "up",
        }
    }

    /// Map a firmware state token; unknown tokens give `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "down" | "idle" => Some(LineState::Down),
            "initializing" | "init" => Some(LineState::Initializing),
            "training" | "handshake" => Some(LineState::Training),
            "up" | "showtime" => Some(LineState::Up),
            _ => None,
        }
    }
}

/// Per-direction fast/interleaved rates in bps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PathRates {
    fast: Option<u64>,
    interleaved: Option<u64>,
}

impl PathRates {
    /// The larger of the reported path rates.
    fn max(&self) -> Option<u64> {
        match (self.fast, self.interleaved) {
            (Some(f), Some(i)) => Some(f.max(i)),
            (f, i) => f.or(i),
        }
    }
}

/// Dialect for the VMG1312-T20B.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vmg1312T20b;

impl Dialect for Vmg1312T20b {
    fn name(&self) -> &'static str {
        MODEL
    }

    fn dsl_command(&self) -> &'static str {
        "dsllinestatus"
    }

    fn parse_dsl(&self, raw: &str) -> Vec<MetricRecord> {
        let text = raw.replace("\r\n", "\n");
        let mut output = Vec::new();
        parse_line_state(&text, &mut output);
        parse_max_line_rate(&text, &mut output);
        parse_line_errors(&text, &mut output);
        parse_signal_quality(&text, &mut output);
        output
    }
}

fn parse_line_state(text: &str, output: &mut Vec<MetricRecord>) {
    let Some(caps) = LINE_STATE_RE.captures(text) else {
        return;
    };
    let token = &caps["state"];
    let current = LineState::from_token(token);
    if current.is_none() {
        debug!("unrecognised line state {:?}", token);
    }

    for state in LineState::ALL {
        output.push(
            MetricRecord::gauge("zyxel_line_state", u64::from(current == Some(state)))
                .with_help("The DSL link state.")
                .with_label("state", state.as_str()),
        );
    }
}

fn parse_max_line_rate(text: &str, output: &mut Vec<MetricRecord>) {
    let mut up = PathRates::default();
    let mut down = PathRates::default();

    for caps in CHANNEL_RATE_RE.captures_iter(text) {
        let Some(bps) = caps["rate"]
            .parse::<u64>()
            .ok()
            .and_then(|kbps| kbps.checked_mul(1000))
        else {
            continue;
        };
        let rates = if &caps["end"] == "near" { &mut down } else { &mut up };
        if &caps["path"] == "fast" {
            rates.fast = Some(bps);
        } else {
            rates.interleaved = Some(bps);
        }
    }

    debug!("down: {:?} up: {:?}", down, up);

    let max_rate = |stream: &str, bps: u64| {
        MetricRecord::gauge("zyxel_max_line_rate", bps)
            .with_help("The maximum attainable line rate.")
            .with_label("stream", stream)
    };

    for (stream, rates) in [("up", &up), ("down", &down)] {
        if let Some(bps) = rates.max() {
            output.push(max_rate(stream, bps));
        }
    }
    for (stream, rates) in [("up", &up), ("down", &down)] {
        if let Some(bps) = rates.fast {
            output.push(max_rate(&format!("{}_fast", stream), bps));
        }
        if let Some(bps) = rates.interleaved {
            output.push(max_rate(&format!("{}_interleaved", stream), bps));
        }
    }
}

/// Path whose error counters are reported for each direction: downstream
/// is read from the near-end interleaved path, upstream from the far-end
/// fast path. The other two paths are ignored.
fn reported_stream(end: &str, path: &str) -> Option<&'static str> {
    match (end, path) {
        ("near", "interleaved") => Some("down"),
        ("far", "fast") => Some("up"),
        _ => None,
    }
}

fn parse_line_errors(text: &str, output: &mut Vec<MetricRecord>) {
    let mut counts: IndexMap<(&str, &str), Option<u64>> = IndexMap::new();
    for stream in ["up", "down"] {
        for error_type in ERROR_TYPES {
            counts.insert((stream, error_type), None);
        }
    }

    for caps in LINE_ERROR_RE.captures_iter(text) {
        let Some(stream) = reported_stream(&caps["end"], &caps["path"]) else {
            continue;
        };
        let Ok(count) = caps["count"].parse::<u64>() else {
            continue;
        };
        let Some(error_type) = ERROR_TYPES
            .iter()
            .copied()
            .find(|t| t.eq_ignore_ascii_case(&caps["kind"]))
        else {
            continue;
        };
        if let Some(slot) = counts.get_mut(&(stream, error_type)) {
            *slot = Some(count);
        }
    }

    for ((stream, error_type), count) in counts {
        let Some(count) = count else {
            continue;
        };
        output.push(
            MetricRecord::counter("zyxel_line_errors", count)
                .with_help("The errors on the line.")
                .with_label("stream", stream)
                .with_label("type", error_type),
        );
    }
}

fn parse_signal_quality(text: &str, output: &mut Vec<MetricRecord>) {
    let headers: Vec<_> = SECTION_RE.captures_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(direction)) = (caps.get(0), caps.name("direction")) else {
            continue;
        };
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let body = text[whole.end()..end].trim_start_matches('\n');
        let body = body.split("\n\n").next().unwrap_or_default();
        sections.push((direction.as_str().to_lowercase(), body));
    }

    for (metric, help, pattern) in SIGNAL_FIELDS.iter() {
        for (stream, body) in &sections {
            let Some(value) = pattern
                .captures(body)
                .and_then(|caps| caps["value"].parse::<f64>().ok())
            else {
                continue;
            };
            output.push(
                MetricRecord::gauge(*metric, value)
                    .with_help(*help)
                    .with_label("stream", stream.as_str()),
            );
        }
    }
}
