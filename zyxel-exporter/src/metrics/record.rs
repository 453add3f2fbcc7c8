//! Typed metric observations produced by the device parsers.

use std::fmt;

use indexmap::IndexMap;

/// Prometheus metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    /// The `# TYPE` keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample value.
///
/// Counters and rates are kept as integers so large byte counts render
/// exactly; signal measurements such as noise margin are floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Unsigned(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Unsigned(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

/// One named, labelled sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Metric name, e.g. `zyxel_line_rate`.
    pub name: String,

    /// Description for the `# HELP` line.
    pub help: Option<String>,

    /// Gauge or counter.
    pub kind: MetricKind,

    /// Labels in insertion order.
    pub labels: IndexMap<String, String>,

    /// The sample value.
    pub value: MetricValue,
}

impl MetricRecord {
    /// Create a record with no help text and no labels.
    pub fn new(name: impl Into<String>, kind: MetricKind, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            help: None,
            kind,
            labels: IndexMap::new(),
            value: value.into(),
        }
    }

    /// Create a gauge sample.
    pub fn gauge(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self::new(name, MetricKind::Gauge, value)
    }

    /// Create a counter sample.
    pub fn counter(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self::new(name, MetricKind::Counter, value)
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Append a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Get a label value.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let record = MetricRecord::counter("zyxel_bytes", 42u64)
            .with_help("Bytes sent/received.")
            .with_label("stream", "rx")
            .with_label("iface", "br0");

        assert_eq!(record.kind, MetricKind::Counter);
        assert_eq!(record.label("iface"), Some("br0"));
        let keys: Vec<_> = record.labels.keys().map(String::as_str).collect();
        assert_eq!(keys, ["stream", "iface"]);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(MetricValue::from(2713281739u64).to_string(), "2713281739");
        assert_eq!(MetricValue::from(7.4).to_string(), "7.4");
        assert_eq!(MetricValue::from(-3.5).to_string(), "-3.5");
    }
}
