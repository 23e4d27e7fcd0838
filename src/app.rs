//! One run of the check or the metrics emitter.
//!
//! [`App`] wires the pieces together: it asks the [`CommandRunner`] for the
//! consumer group description, parses and aggregates it, then either
//! evaluates the thresholds or projects metric points.

use tracing::{debug, info};

use lagwatch_adapters::{CommandRunner, KafkaTools};
use lagwatch_types::{current_timestamp, MetricPoint, Verdict};

use crate::config::Settings;
use crate::data::{
    parse_topic_list, thresholds, MetricsProjector, RecordParser, ThresholdEvaluator, TopicTable,
};
use crate::error::CheckError;

/// Runs the pipeline for one consumer group.
#[derive(Debug)]
pub struct App {
    settings: Settings,
    tools: KafkaTools,
    runner: Box<dyn CommandRunner>,
}

impl App {
    /// Create a new App with the given settings and command runner.
    pub fn new(settings: Settings, runner: Box<dyn CommandRunner>) -> Self {
        let tools = settings.kafka_tools();
        Self {
            settings,
            tools,
            runner,
        }
    }

    /// Describe the group and aggregate its partitions by topic.
    ///
    /// Topics rejected by the configured allow/exclude lists are removed.
    pub fn collect(&self) -> Result<TopicTable, CheckError> {
        let topics = self.topics_to_describe()?;
        let command = self
            .tools
            .describe_group(&self.settings.group, self.settings.new_consumer, &topics);

        debug!(runner = self.runner.description(), command = %command, "describing consumer group");
        let output = self.runner.run(&command)?;

        let records = RecordParser::for_layout(self.settings.layout()).parse(&output);
        let table = TopicTable::aggregate(records).filter(&self.settings.topic_filter());

        info!(
            group = %self.settings.group,
            topics = table.len(),
            total_lag = thresholds::total_lag(&table),
            "aggregated consumer group"
        );
        Ok(table)
    }

    /// Topics the legacy offset checker should be restricted to.
    ///
    /// Only used for legacy groups with auto-listing enabled; an empty list
    /// means no restriction.
    fn topics_to_describe(&self) -> Result<Vec<String>, CheckError> {
        if self.settings.new_consumer || !self.settings.auto_list {
            return Ok(Vec::new());
        }

        let output = self.runner.run(&self.tools.list_topics())?;
        let filter = self.settings.topic_filter();
        let topics: Vec<String> = parse_topic_list(&output)
            .into_iter()
            .filter(|topic| filter.allows(topic))
            .collect();

        debug!(?topics, "auto-listed topics");
        Ok(topics)
    }

    /// Run the alerting check.
    ///
    /// Every failure is folded into the returned verdict.
    pub fn check(&self) -> Verdict {
        let result = self.collect().and_then(|table| {
            ThresholdEvaluator::new(&self.settings.group, self.settings.thresholds).evaluate(&table)
        });

        match result {
            Ok(evaluation) => evaluation.verdict,
            Err(e) => Verdict::new(e.status(), e.to_string()),
        }
    }

    /// Produce metric points for every reported topic.
    pub fn metrics(&self) -> Result<Vec<MetricPoint>, CheckError> {
        self.metrics_at(current_timestamp())
    }

    /// Produce metric points stamped with `timestamp`.
    pub fn metrics_at(&self, timestamp: u64) -> Result<Vec<MetricPoint>, CheckError> {
        let table = self.collect()?;
        let projector = MetricsProjector::new(&self.settings.scheme, &self.settings.group);
        Ok(projector.project(&table, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use lagwatch_adapters::{CommandKind, StaticRunner};
    use lagwatch_types::Status;
    use std::rc::Rc;

    const DESCRIBE: &str = "\
banner 1
banner 2
TOPIC PARTITION CURRENT-OFFSET LOG-END-OFFSET LAG OWNER
t1 0 100 110 10 c1
t2 0 5 5 0 c2
";

    fn settings(overrides: Overrides) -> Settings {
        let overrides = Overrides {
            group: Some("g1".to_string()),
            ..overrides
        };
        Settings::load_with_env(None, &overrides, Some(Default::default())).unwrap()
    }

    fn app(overrides: Overrides, runner: StaticRunner) -> App {
        App::new(settings(overrides), Box::new(runner))
    }

    #[test]
    fn collect_applies_topic_filter() {
        let runner = StaticRunner::new().with_output(CommandKind::DescribeGroup, DESCRIBE);
        let overrides = Overrides {
            topic_excludes: Some(vec!["t2".to_string()]),
            ..Overrides::default()
        };

        let table = app(overrides, runner).collect().unwrap();
        assert_eq!(table.topics(), vec!["t1"]);
    }

    #[test]
    fn check_is_ok_without_thresholds() {
        let runner = StaticRunner::new().with_output(CommandKind::DescribeGroup, DESCRIBE);
        let verdict = app(Overrides::default(), runner).check();

        assert_eq!(verdict.status, Status::Ok);
        assert_eq!(verdict.message, "Group `g1`'s lag is ok (0/10)");
    }

    #[test]
    fn check_without_output_is_critical() {
        let verdict = app(Overrides::default(), StaticRunner::new()).check();
        assert_eq!(verdict.status, Status::Critical);
        assert_eq!(verdict.message, "Could not find topics/partitions");
    }

    #[test]
    fn new_consumer_skips_topic_listing() {
        let runner = Rc::new(StaticRunner::new().with_output(CommandKind::DescribeGroup, DESCRIBE));
        App::new(settings(Overrides::default()), Box::new(Rc::clone(&runner)))
            .collect()
            .unwrap();

        let kinds: Vec<_> = runner.history().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CommandKind::DescribeGroup]);
    }

    #[test]
    fn legacy_group_restricts_to_listed_topics() {
        let runner = Rc::new(
            StaticRunner::new()
                .with_output(CommandKind::ListTopics, "t1\nt2\n__consumer_offsets\n")
                .with_output(CommandKind::DescribeGroup, "header\ng1 t1 0 1 1 0 c1\n"),
        );
        let overrides = Overrides {
            new_consumer: Some(false),
            topic_excludes: Some(vec!["t2".to_string()]),
            ..Overrides::default()
        };

        let table = App::new(settings(overrides), Box::new(Rc::clone(&runner)))
            .collect()
            .unwrap();
        assert_eq!(table.topics(), vec!["t1"]);

        let history = runner.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, CommandKind::ListTopics);
        assert_eq!(history[1].args[history[1].args.len() - 2..], ["--topic", "t1"]);
    }

    #[test]
    fn legacy_group_without_auto_list_is_unrestricted() {
        let runner = Rc::new(StaticRunner::new());
        let overrides = Overrides {
            new_consumer: Some(false),
            auto_list: Some(false),
            ..Overrides::default()
        };

        let _ = App::new(settings(overrides), Box::new(Rc::clone(&runner))).collect();
        let history = runner.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].args.contains(&"--topic".to_string()));
    }

    #[test]
    fn metrics_are_stamped() {
        let runner = StaticRunner::new().with_output(CommandKind::DescribeGroup, DESCRIBE);
        let points = app(Overrides::default(), runner).metrics_at(99).unwrap();

        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.timestamp == 99));
        assert_eq!(points[4].name, "sensu.kafka.consumers.g1.t1.lag");
        assert_eq!(points[4].value, 10);
    }
}
