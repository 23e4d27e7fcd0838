//! Rendering of verdicts and metric points.
//!
//! Text output follows the conventions of Nagios/Sensu plugins: a verdict
//! is a single `Name STATUS: message` line and metric points use the
//! graphite plaintext format `name value timestamp`. JSON output emits one
//! object per line instead.

use std::io::{self, Write};

use clap::ValueEnum;

use lagwatch_types::{MetricPoint, Verdict};

/// Name printed in front of check verdicts.
pub const CHECK_NAME: &str = "ConsumerLagCheck";

/// Output format for verdicts and metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Plugin style text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Render a verdict as a single line (without trailing newline).
pub fn render_verdict(verdict: &Verdict, format: Format) -> String {
    match format {
        Format::Text => {
            if verdict.message.is_empty() {
                format!("{} {}", CHECK_NAME, verdict.status)
            } else {
                format!("{} {}: {}", CHECK_NAME, verdict.status, verdict.message)
            }
        }
        Format::Json => serde_json::json!({
            "check": CHECK_NAME,
            "status": verdict.status,
            "exit_code": verdict.status.exit_code(),
            "message": verdict.message,
        })
        .to_string(),
    }
}

/// Render a metric point as a single line (without trailing newline).
///
/// JSON values are written as plain integers even past the `i64` range.
pub fn render_point(point: &MetricPoint, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(format!("{} {} {}", point.name, point.value, point.timestamp)),
        Format::Json => serde_json::to_string(point),
    }
}

/// Write a verdict line.
pub fn write_verdict<W: Write>(out: &mut W, verdict: &Verdict, format: Format) -> io::Result<()> {
    writeln!(out, "{}", render_verdict(verdict, format))
}

/// Write one line per metric point.
pub fn write_points<W: Write>(out: &mut W, points: &[MetricPoint], format: Format) -> io::Result<()> {
    for point in points {
        writeln!(out, "{}", render_point(point, format)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_verdict() {
        let verdict = Verdict::ok("Group `g1`'s lag is ok (10/10)");
        assert_eq!(
            render_verdict(&verdict, Format::Text),
            "ConsumerLagCheck OK: Group `g1`'s lag is ok (10/10)"
        );
    }

    #[test]
    fn text_verdict_without_message() {
        assert_eq!(render_verdict(&Verdict::critical(""), Format::Text), "ConsumerLagCheck CRITICAL");
    }

    #[test]
    fn json_verdict() {
        let line = render_verdict(&Verdict::warning("slow"), Format::Json);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["status"], "warning");
        assert_eq!(value["exit_code"], 1);
        assert_eq!(value["message"], "slow");
    }

    #[test]
    fn graphite_point() {
        let point = MetricPoint::from_segments(&["sensu", "kafka", "consumers", "g1", "t1", "lag"], 7, 1_700_000_000);
        assert_eq!(
            render_point(&point, Format::Text).unwrap(),
            "sensu.kafka.consumers.g1.t1.lag 7 1700000000"
        );
    }

    #[test]
    fn json_point_keeps_values_past_i64() {
        let value = 2 * i128::from(i64::MAX);
        let point = MetricPoint::from_segments(&["g1", "t1", "offset"], value, 5);

        assert_eq!(
            render_point(&point, Format::Json).unwrap(),
            r#"{"name":"g1.t1.offset","value":18446744073709551614,"timestamp":5}"#
        );
        assert_eq!(
            render_point(&point, Format::Text).unwrap(),
            "g1.t1.offset 18446744073709551614 5"
        );
    }

    #[test]
    fn write_points_emits_one_line_each() {
        let points = vec![
            MetricPoint::from_segments(&["a", "offset"], 1, 5),
            MetricPoint::from_segments(&["a", "lag"], 2, 5),
        ];
        let mut out = Vec::new();
        write_points(&mut out, &points, Format::Json).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"name\":\"a.lag\""));
    }
}
