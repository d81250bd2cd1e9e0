//! Folds decoded rows into one [`Benchmark`] per run name.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::{
    BenchGraphError,
    benchmark::Benchmark,
    classifier::{Classification, RecordClassifier, RowKind},
    config::EngineConfig,
    row::RawRow,
    time_scale::TimeScaleTable,
};

#[derive(Clone, Debug)]
pub struct BenchmarkAccumulator {
    config: EngineConfig,
    classifier: RecordClassifier,
    table: TimeScaleTable,
    index: AHashMap<String, usize>,
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkAccumulator {
    pub fn new(config: EngineConfig, table: TimeScaleTable) -> Result<Self, BenchGraphError> {
        config.validate()?;
        let classifier = RecordClassifier::new(&config);
        Ok(Self {
            config,
            classifier,
            table,
            index: AHashMap::new(),
            benchmarks: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    pub fn get(&self, run_name: &str) -> Option<&Benchmark> {
        self.index.get(run_name).map(|&idx| &self.benchmarks[idx])
    }

    /// Benchmarks in the order their run names were first seen.
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    pub fn into_benchmarks(self) -> Vec<Benchmark> {
        self.benchmarks
    }

    pub fn ingest_all<'a, I>(&mut self, rows: I) -> Result<(), BenchGraphError>
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        for row in rows {
            self.ingest(row)?;
        }
        Ok(())
    }

    /// A row that fails to classify or convert leaves the accumulator unchanged.
    pub fn ingest(&mut self, row: &RawRow) -> Result<(), BenchGraphError> {
        let classification = self.classifier.classify(row, &self.table)?;

        if row.is_error() {
            let message = row.error_message.clone().unwrap_or_default();
            warn!(run = %row.run_name, error = %message, "benchmark reported an error");
            let idx = self.entry(&classification);
            self.benchmarks[idx].error = Some(message);
            return Ok(());
        }

        let factor =
            classification.to_seconds * self.config.category_scale_factor(&classification.category);
        let mut converted = Vec::with_capacity(self.config.data_points.len());
        for metric in self.config.metric_names() {
            converted.push((metric.to_string(), row.metric(metric)? * factor));
        }

        let idx = self.entry(&classification);
        let benchmark = &mut self.benchmarks[idx];
        for (metric, _) in &converted {
            benchmark.samples.entry(metric.clone()).or_default();
        }
        match &classification.kind {
            RowKind::Sample => {
                for (metric, value) in converted {
                    benchmark.record_sample(&metric, value);
                }
            }
            RowKind::Statistic(statistic) => {
                for (metric, value) in converted {
                    benchmark.record_statistic(statistic, &metric, value);
                }
            }
        }
        Ok(())
    }

    fn entry(&mut self, classification: &Classification) -> usize {
        if let Some(&idx) = self.index.get(&classification.key) {
            return idx;
        }
        debug!(
            run = %classification.key,
            category = %classification.category,
            display_name = %classification.display_name,
            "new benchmark"
        );
        self.benchmarks.push(Benchmark::new(
            &classification.key,
            &classification.category,
            &classification.display_name,
        ));
        let idx = self.benchmarks.len() - 1;
        self.index.insert(classification.key.clone(), idx);
        idx
    }

    /// Folds a separately accumulated shard into this one, keyed by run name.
    pub fn merge(&mut self, other: BenchmarkAccumulator) {
        for incoming in other.benchmarks {
            let Some(&idx) = self.index.get(&incoming.run_name) else {
                self.index
                    .insert(incoming.run_name.clone(), self.benchmarks.len());
                self.benchmarks.push(incoming);
                continue;
            };
            let existing = &mut self.benchmarks[idx];
            for (metric, values) in incoming.samples {
                existing.samples.entry(metric).or_default().extend(values);
            }
            for (statistic, values) in incoming.statistics {
                existing
                    .statistics
                    .entry(statistic)
                    .or_default()
                    .extend(values);
            }
            existing.heuristics.union(&incoming.heuristics);
            if incoming.error.is_some() {
                existing.error = incoming.error;
            }
        }
    }
}
