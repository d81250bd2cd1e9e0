//! Engine configuration: which metrics are tracked and how benchmarks are grouped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::BenchGraphError;

/// One tracked numeric field and its comparison polarity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataPointSpec {
    pub metric: String,
    pub lower_is_better: bool,
}

impl DataPointSpec {
    pub fn new(metric: &str, lower_is_better: bool) -> Self {
        Self {
            metric: metric.to_string(),
            lower_is_better,
        }
    }

    pub fn polarity_text(&self) -> &'static str {
        if self.lower_is_better {
            "lower is better"
        } else {
            "higher is better"
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Ordered; the first entry is the primary metric used for display sorting.
    pub data_points: Vec<DataPointSpec>,
    pub categories: Vec<String>,
    pub scale: f64,
    pub scale_categories: BTreeSet<String>,
    pub name_removals: Vec<String>,
}

impl EngineConfig {
    pub fn new<I, S>(metric_names: I, lower_is_better: &[&str]) -> Result<Self, BenchGraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let data_points: Vec<DataPointSpec> = metric_names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                DataPointSpec::new(name, lower_is_better.contains(&name))
            })
            .collect();
        Self::from_data_points(data_points)
    }

    pub fn from_data_points(data_points: Vec<DataPointSpec>) -> Result<Self, BenchGraphError> {
        let config = Self {
            data_points,
            categories: Vec::new(),
            scale: 1.0,
            scale_categories: BTreeSet::new(),
            name_removals: Vec::new(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_scale_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scale_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_name_removals<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_removals = fragments.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), BenchGraphError> {
        if self.data_points.is_empty() {
            return Err(BenchGraphError::configuration(
                "at least one data point name is required",
            ));
        }
        if let Some(blank) = self.data_points.iter().find(|dp| dp.metric.trim().is_empty()) {
            return Err(BenchGraphError::configuration(format!(
                "data point name {:?} is blank",
                blank.metric
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(BenchGraphError::configuration(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.data_points.iter().map(|dp| dp.metric.as_str())
    }

    /// Multiplier applied on top of unit conversion for rows in `category`.
    pub fn category_scale_factor(&self, category: &str) -> f64 {
        if self.scale_categories.contains(category) {
            1.0 / self.scale
        } else {
            1.0
        }
    }
}
