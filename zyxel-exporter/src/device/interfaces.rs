//! `ifconfig` output parsing shared by every dialect.
//!
//! ```text
//! br0       Link encap:Ethernet  HWaddr E4:18:6B:06:87:70
//!           inet addr:192.168.1.1  Bcast:192.168.1.255  Mask:255.255.255.0
//!           UP BROADCAST RUNNING ALLMULTI MULTICAST  MTU:1500  Metric:1
//!           RX packets:7968422 errors:0 dropped:19510 overruns:0 frame:0
//!           TX packets:11495200 errors:0 dropped:0 overruns:0 carrier:0
//!           collisions:0 txqueuelen:0
//!           RX bytes:2713281739 (2.5 GiB)  TX bytes:1342943018 (1.2 GiB)
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::metrics::MetricRecord;

/// One interface block: a name at the start of a line, then indented
/// detail lines up to the next blank line.
static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^([\w.\-]+)[ \t]+(.*?)(?:^[ \t]*$|\z)").unwrap());

static BYTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(RX|TX) bytes:(\d+)").unwrap());
static PACKETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(RX|TX) packets:(\d+)").unwrap());
static ERRORS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(RX|TX).*errors:(\d+)").unwrap());
static DROPPED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(RX|TX).*dropped:(\d+)").unwrap());

/// Counter families extracted from each interface, in output order.
static COUNTERS: Lazy<[(&'static str, &'static str, &'static Regex); 4]> = Lazy::new(|| {
    [
        ("zyxel_bytes", "Bytes sent/received.", &*BYTES_RE),
        ("zyxel_packets", "Packets sent/received.", &*PACKETS_RE),
        ("zyxel_errors", "Errors sending/receiving.", &*ERRORS_RE),
        ("zyxel_dropped", "Packets dropped sending/receiving.", &*DROPPED_RE),
    ]
});

/// Parse `ifconfig` output into per-interface byte, packet, error and drop
/// counters labelled `stream="rx"|"tx"` and `iface`.
pub fn parse_interfaces(raw: &str) -> Vec<MetricRecord> {
    let text = raw.replace("\r\n", "\n");
    let blocks: Vec<(&str, &str)> = INTERFACE_RE
        .captures_iter(&text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect();

    let mut output = Vec::new();
    for (metric, help, pattern) in COUNTERS.iter() {
        for (iface, stats) in &blocks {
            for caps in pattern.captures_iter(stats) {
                let Ok(value) = caps[2].parse::<u64>() else {
                    continue;
                };
                output.push(
                    MetricRecord::counter(*metric, value)
                        .with_help(*help)
                        .with_label("stream", caps[1].to_lowercase())
                        .with_label("iface", *iface),
                );
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricValue, render_records};

    const IFCONFIG: &str = "br0       Link encap:Ethernet  HWaddr E4:18:6B:06:87:70\r\n\
        \x20         inet addr:192.168.1.1  Bcast:192.168.1.255  Mask:255.255.255.0\r\n\
        \x20         UP BROADCAST RUNNING ALLMULTI MULTICAST  MTU:1500  Metric:1\r\n\
        \x20         RX packets:7968422 errors:0 dropped:19510 overruns:0 frame:0\r\n\
        \x20         TX packets:11495200 errors:0 dropped:0 overruns:0 carrier:0\r\n\
        \x20         collisions:0 txqueuelen:0\r\n\
        \x20         RX bytes:2713281739 (2.5 GiB)  TX bytes:1342943018 (1.2 GiB)\r\n\
        \r\n\
        eth4.0    Link encap:Ethernet  HWaddr E4:18:6B:06:87:70\r\n\
        \x20         RX packets:100 errors:2 dropped:3 overruns:0 frame:0\r\n\
        \x20         TX packets:200 errors:4 dropped:5 overruns:0 carrier:0\r\n\
        \x20         RX bytes:1000 (1000.0 B)  TX bytes:2000 (2.0 KiB)\r\n\
        \r\n";

    fn find<'a>(records: &'a [MetricRecord], name: &str, stream: &str, iface: &str) -> Option<&'a MetricRecord> {
        records.iter().find(|r| {
            r.name == name && r.label("stream") == Some(stream) && r.label("iface") == Some(iface)
        })
    }

    #[test]
    fn test_parse_bytes() {
        let records = parse_interfaces(IFCONFIG);
        let rx = find(&records, "zyxel_bytes", "rx", "br0").unwrap();
        let tx = find(&records, "zyxel_bytes", "tx", "br0").unwrap();
        assert_eq!(rx.value, MetricValue::Unsigned(2713281739));
        assert_eq!(tx.value, MetricValue::Unsigned(1342943018));
    }

    #[test]
    fn test_parse_all_counters() {
        let records = parse_interfaces(IFCONFIG);
        // 4 families x 2 interfaces x 2 streams
        assert_eq!(records.len(), 16);

        assert_eq!(find(&records, "zyxel_packets", "tx", "br0").unwrap().value, MetricValue::Unsigned(11495200));
        assert_eq!(find(&records, "zyxel_dropped", "rx", "br0").unwrap().value, MetricValue::Unsigned(19510));
        assert_eq!(find(&records, "zyxel_errors", "tx", "eth4.0").unwrap().value, MetricValue::Unsigned(4));
        assert_eq!(find(&records, "zyxel_dropped", "tx", "eth4.0").unwrap().value, MetricValue::Unsigned(5));
    }

    #[test]
    fn test_rendered_sample_lines() {
        let output = render_records(&parse_interfaces(IFCONFIG));
        assert!(output.contains("zyxel_bytes{stream=\"rx\",iface=\"br0\"} 2713281739"));
        assert!(output.contains("zyxel_bytes{stream=\"tx\",iface=\"br0\"} 1342943018"));
        assert!(output.contains("# TYPE zyxel_bytes counter"));
    }

    #[test]
    fn test_block_without_trailing_blank_line() {
        let raw = "br0       Link encap:Ethernet\n          RX bytes:5 (5.0 B)  TX bytes:6 (6.0 B)";
        let records = parse_interfaces(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(find(&records, "zyxel_bytes", "tx", "br0").unwrap().value, MetricValue::Unsigned(6));
    }

    #[test]
    fn test_reparse_is_identical() {
        let first = render_records(&parse_interfaces(IFCONFIG));
        let second = render_records(&parse_interfaces(IFCONFIG));
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert!(parse_interfaces("").is_empty());
        assert!(parse_interfaces("ifconfig: command not found\r\n").is_empty());
    }
}
