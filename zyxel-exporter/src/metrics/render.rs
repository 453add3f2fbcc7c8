//! Exposition-format rendering.

use indexmap::IndexMap;

use super::record::MetricRecord;

/// Render the DSL records followed by the interface records.
pub fn render(dsl: &[MetricRecord], interfaces: &[MetricRecord]) -> String {
    render_records(dsl.iter().chain(interfaces))
}

/// Render records as a Prometheus text document.
///
/// Samples are grouped by metric name in order of first appearance, so each
/// family's `# HELP`/`# TYPE` header appears exactly once, directly above its
/// samples. Lines are joined with `\n` and there is no trailing newline; an
/// empty input renders as an empty string.
pub fn render_records<'a>(records: impl IntoIterator<Item = &'a MetricRecord>) -> String {
    let mut families: IndexMap<&str, Vec<&MetricRecord>> = IndexMap::new();
    for record in records {
        families.entry(record.name.as_str()).or_default().push(record);
    }

    let mut lines = Vec::new();
    for (name, samples) in &families {
        if let Some(help) = samples.iter().find_map(|r| r.help.as_deref()) {
            lines.push(format!("# HELP {} {}", name, help));
        }
        lines.push(format!("# TYPE {} {}", name, samples[0].kind));
        for sample in samples {
            lines.push(sample_line(sample));
        }
    }
    lines.join("\n")
}

fn sample_line(record: &MetricRecord) -> String {
    if record.labels.is_empty() {
        return format!("{} {}", record.name, record.value);
    }

    let labels = record
        .labels
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, escape_label_value(value)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}{{{}}} {}", record.name, labels, record.value)
}

fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
