//! Decides what a row contributes and which benchmark it belongs to.

use std::cmp::Reverse;

use tracing::debug;

use crate::{BenchGraphError, config::EngineConfig, row::RawRow, time_scale::TimeScaleTable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowKind {
    Sample,
    Statistic(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub key: String,
    pub kind: RowKind,
    pub category: String,
    pub display_name: String,
    pub to_seconds: f64,
}

#[derive(Clone, Debug)]
pub struct RecordClassifier {
    // longest first by character count, supplied order among equal lengths
    categories: Vec<String>,
    name_removals: Vec<String>,
}

impl RecordClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        let mut categories = config.categories.clone();
        categories.sort_by_key(|category| Reverse(category.chars().count()));
        let name_removals = config
            .name_removals
            .iter()
            .filter(|fragment| !fragment.is_empty())
            .cloned()
            .collect();
        Self {
            categories,
            name_removals,
        }
    }

    pub fn classify(
        &self,
        row: &RawRow,
        table: &TimeScaleTable,
    ) -> Result<Classification, BenchGraphError> {
        let to_seconds = table
            .lookup(&row.time_unit)
            .map_err(|_| BenchGraphError::unsupported_unit(&row.run_name, &row.time_unit))?
            .to_seconds;
        let category = self.match_category(&row.run_name).to_string();
        let display_name = self.display_name(&row.run_name, &category);
        let kind = row_kind(&row.name, &row.run_name);
        debug!(run = %row.run_name, category = %category, kind = ?kind, "classified row");
        Ok(Classification {
            key: row.run_name.clone(),
            kind,
            category,
            display_name,
            to_seconds,
        })
    }

    /// Longest category occurring in `run_name`, or `""` when none does.
    pub fn match_category(&self, run_name: &str) -> &str {
        self.categories
            .iter()
            .find(|category| run_name.contains(category.as_str()))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn display_name(&self, run_name: &str, category: &str) -> String {
        let mut name = if category.is_empty() {
            run_name.to_string()
        } else {
            run_name.replace(category, "")
        };
        for fragment in &self.name_removals {
            name = name.replace(fragment.as_str(), "");
        }
        name.trim_matches('_').to_string()
    }
}

/// A row whose name is its run name is a sample; anything left over names a
/// statistic. A trailing `/...` time-mode marker (`/real_time`, `/manual_time`)
/// on the leftover is not part of the statistic name.
pub fn row_kind(name: &str, run_name: &str) -> RowKind {
    if name == run_name {
        return RowKind::Sample;
    }
    let remainder = if run_name.is_empty() {
        name.to_string()
    } else {
        name.replace(run_name, "")
    };
    let statistic = match remainder.find('/') {
        Some(slash) => &remainder[..slash],
        None => remainder.as_str(),
    };
    let statistic = statistic.trim_matches('_');
    if statistic.is_empty() {
        RowKind::Sample
    } else {
        RowKind::Statistic(statistic.to_string())
    }
}
