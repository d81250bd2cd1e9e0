use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BenchGraphError;

/// One decoded input record: a raw trial sample or a precomputed statistic.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct RawRow {
    pub name: String,
    pub run_name: String,
    pub time_unit: String,
    #[serde(default)]
    pub error_occurred: Option<bool>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub metric_values: BTreeMap<String, f64>,
}

impl RawRow {
    pub fn new(name: &str, run_name: &str, time_unit: &str) -> Self {
        Self {
            name: name.to_string(),
            run_name: run_name.to_string(),
            time_unit: time_unit.to_string(),
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: &str, value: f64) -> Self {
        self.metric_values.insert(metric.to_string(), value);
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.error_occurred = Some(true);
        self.error_message = Some(message.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error_occurred.unwrap_or(false)
    }

    pub fn metric(&self, metric: &str) -> Result<f64, BenchGraphError> {
        self.metric_values
            .get(metric)
            .copied()
            .ok_or_else(|| BenchGraphError::missing_metric(&self.run_name, metric))
    }
}
