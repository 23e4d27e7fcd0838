//! Projection of topic summaries into metric points.

use lagwatch_types::{metric_name, Field, MetricPoint};

use super::aggregate::TopicTable;

/// Default metric naming scheme.
pub const DEFAULT_SCHEME: &str = "sensu.kafka.consumers";

/// Turns per-topic sums into `<scheme>.<group>.<topic>.<field>` points.
///
/// Every topic in the table is emitted; apply the topic filter to the table
/// first.
#[derive(Debug, Clone)]
pub struct MetricsProjector {
    scheme: String,
    group: String,
}

impl MetricsProjector {
    pub fn new(scheme: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            group: group.into(),
        }
    }

    /// Metric name for one topic and field.
    pub fn metric_name(&self, topic: &str, field: Field) -> String {
        metric_name(&[self.scheme.as_str(), self.group.as_str(), topic, field.name()])
    }

    /// One point per field and topic, grouped by field in [`Field::ALL`]
    /// order, topics in table order.
    pub fn project(&self, table: &TopicTable, timestamp: u64) -> Vec<MetricPoint> {
        Field::ALL
            .iter()
            .flat_map(move |&field| {
                table.iter().map(move |summary| MetricPoint {
                    name: self.metric_name(summary.topic(), field),
                    value: summary.sum(field),
                    timestamp,
                })
            })
            .collect()
    }
}
