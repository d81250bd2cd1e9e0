use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Running extrema over every sample value recorded for a benchmark.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Heuristics {
    pub min: f64,
    pub max: f64,
}

impl Heuristics {
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn union(&mut self, other: &Heuristics) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn range(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Benchmark {
    pub category: String,
    pub display_name: String,
    pub run_name: String,
    /// Canonical-unit samples per metric, in input order.
    pub samples: BTreeMap<String, Vec<f64>>,
    /// statistic name -> metric -> canonical-unit value
    pub statistics: BTreeMap<String, BTreeMap<String, f64>>,
    pub heuristics: Heuristics,
    pub error: Option<String>,
}

impl Benchmark {
    pub fn new(run_name: &str, category: &str, display_name: &str) -> Self {
        Self {
            category: category.to_string(),
            display_name: display_name.to_string(),
            run_name: run_name.to_string(),
            samples: BTreeMap::new(),
            statistics: BTreeMap::new(),
            heuristics: Heuristics::empty(),
            error: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn statistic(&self, statistic: &str, metric: &str) -> Option<f64> {
        self.statistics
            .get(statistic)
            .and_then(|values| values.get(metric))
            .copied()
    }

    pub fn mean(&self, metric: &str) -> Option<f64> {
        self.statistic("mean", metric)
    }

    pub fn stddev(&self, metric: &str) -> Option<f64> {
        self.statistic("stddev", metric)
    }

    pub fn samples_for(&self, metric: &str) -> &[f64] {
        self.samples.get(metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record_sample(&mut self, metric: &str, value: f64) {
        self.samples
            .entry(metric.to_string())
            .or_default()
            .push(value);
        self.heuristics.observe(value);
    }

    pub fn record_statistic(&mut self, statistic: &str, metric: &str, value: f64) {
        self.statistics
            .entry(statistic.to_string())
            .or_default()
            .insert(metric.to_string(), value);
    }
}
