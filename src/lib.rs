//! Normalizes Google-Benchmark style run output into grouped, chart-ready models.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod accumulator;
pub mod aggregate;
pub mod bench_utils;
pub mod benchmark;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod errors;
pub mod layout;
pub mod loader;
pub mod row;
pub mod time_scale;

pub use crate::accumulator::BenchmarkAccumulator;
pub use crate::aggregate::{CategoryGroup, CategoryMap, GroupEntry, aggregate, is_noop_category};
pub use crate::benchmark::{Benchmark, Heuristics};
pub use crate::classifier::{Classification, RecordClassifier, RowKind};
pub use crate::config::{DataPointSpec, EngineConfig};
pub use crate::engine::{ChartEngine, EngineOutput};
pub use crate::errors::BenchGraphError;
pub use crate::layout::{ChartPlan, plan_chart};
pub use crate::loader::{InputFormat, load_rows};
pub use crate::row::RawRow;
pub use crate::time_scale::{TimeScale, TimeScaleTable};
