//! Metric points for line-oriented time-series sinks.

/// Separator between metric path segments.
pub const METRIC_DELIMITER: &str = ".";

/// A single named value at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricPoint {
    /// Dot-delimited metric path, e.g. `sensu.kafka.consumers.g1.t1.lag`.
    pub name: String,
    /// Metric value. Topic sums can exceed the `i64` range.
    pub value: i128,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

impl MetricPoint {
    /// Create a point whose name is built from `segments`.
    pub fn from_segments<S: AsRef<str>>(segments: &[S], value: i128, timestamp: u64) -> Self {
        Self {
            name: metric_name(segments),
            value,
            timestamp,
        }
    }
}

/// Join metric path segments with [`METRIC_DELIMITER`].
pub fn metric_name<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(METRIC_DELIMITER)
}

/// Current Unix time in seconds.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
