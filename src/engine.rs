use tracing::info;

use crate::{
    BenchGraphError,
    accumulator::BenchmarkAccumulator,
    aggregate::{CategoryMap, aggregate},
    config::EngineConfig,
    row::RawRow,
    time_scale::TimeScaleTable,
};

/// What the engine hands to rendering.
#[derive(Clone, Debug)]
pub struct EngineOutput {
    pub categories: CategoryMap,
    pub time_scales: TimeScaleTable,
}

#[derive(Clone, Debug)]
pub struct ChartEngine {
    config: EngineConfig,
    table: TimeScaleTable,
}

impl ChartEngine {
    pub fn new(config: EngineConfig) -> Result<Self, BenchGraphError> {
        Self::with_table(config, TimeScaleTable::clock())
    }

    pub fn with_table(config: EngineConfig, table: TimeScaleTable) -> Result<Self, BenchGraphError> {
        config.validate()?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn accumulator(&self) -> Result<BenchmarkAccumulator, BenchGraphError> {
        BenchmarkAccumulator::new(self.config.clone(), self.table.clone())
    }

    pub fn run(&self, rows: &[RawRow]) -> Result<EngineOutput, BenchGraphError> {
        let mut accumulator = self.accumulator()?;
        accumulator.ingest_all(rows)?;
        self.finish(accumulator)
    }

    /// Aggregates an accumulator that was filled (or merged from shards) elsewhere.
    pub fn finish(&self, accumulator: BenchmarkAccumulator) -> Result<EngineOutput, BenchGraphError> {
        let benchmarks = accumulator.into_benchmarks();
        let count = benchmarks.len();
        let categories = aggregate(benchmarks, &self.config.data_points)?;
        info!(
            benchmarks = count,
            categories = categories.len(),
            "aggregated benchmark results"
        );
        Ok(EngineOutput {
            categories,
            time_scales: self.table.clone(),
        })
    }
}
