//! Groups accumulated benchmarks into categories and fixes their visual encoding.
//!
//! Every category receives the shared no-op baseline (if one was recorded),
//! gets palette slots assigned from alphabetical order, and is then ordered by
//! the primary metric's mean. Palette slots are settled before the value sort
//! so they never move when rankings change.

use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::debug;

use crate::{
    BenchGraphError,
    benchmark::{Benchmark, Heuristics},
    config::DataPointSpec,
};

const NOOP_NAMES: [&str; 3] = ["noop", "no-op", "no op"];

pub fn is_noop_category(category: &str) -> bool {
    let folded = category.to_lowercase();
    NOOP_NAMES.contains(&folded.as_str())
}

/// One benchmark's placement inside a category.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GroupEntry {
    pub benchmark: Arc<Benchmark>,
    /// metric -> palette slot
    pub color_index: BTreeMap<String, usize>,
    /// Position in the final display order.
    pub name_index: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CategoryGroup {
    pub entries: Vec<GroupEntry>,
    pub heuristics: Heuristics,
}

impl CategoryGroup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn benchmarks(&self) -> impl Iterator<Item = &Benchmark> {
        self.entries.iter().map(|entry| entry.benchmark.as_ref())
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.benchmarks()
            .map(|benchmark| benchmark.display_name.as_str())
            .collect()
    }

    pub fn entry(&self, run_name: &str) -> Option<&GroupEntry> {
        self.entries
            .iter()
            .find(|entry| entry.benchmark.run_name == run_name)
    }
}

/// Category groups in first-seen category order.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct CategoryMap {
    groups: Vec<(String, CategoryGroup)>,
}

impl CategoryMap {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, group)| group)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryGroup)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.as_str(), group))
    }
}

pub fn aggregate(
    benchmarks: Vec<Benchmark>,
    data_points: &[DataPointSpec],
) -> Result<CategoryMap, BenchGraphError> {
    let primary = data_points.first().ok_or_else(|| {
        BenchGraphError::configuration("at least one data point name is required")
    })?;

    let mut baseline: Option<Arc<Benchmark>> = None;
    let mut members: Vec<(String, Vec<Arc<Benchmark>>)> = Vec::new();
    for benchmark in benchmarks {
        if is_noop_category(&benchmark.category) {
            if baseline.is_none() {
                baseline = Some(Arc::new(benchmark));
            } else {
                debug!(run = %benchmark.run_name, "ignoring additional no-op benchmark");
            }
            continue;
        }
        let benchmark = Arc::new(benchmark);
        match members
            .iter()
            .position(|(category, _)| *category == benchmark.category)
        {
            Some(idx) => members[idx].1.push(benchmark),
            None => members.push((benchmark.category.clone(), vec![benchmark])),
        }
    }

    let groups = members
        .into_iter()
        .map(|(category, mut list)| {
            if let Some(noop) = &baseline {
                list.insert(0, Arc::clone(noop));
            }
            let group = build_group(list, data_points, primary);
            (category, group)
        })
        .collect();
    Ok(CategoryMap { groups })
}

fn build_group(
    list: Vec<Arc<Benchmark>>,
    data_points: &[DataPointSpec],
    primary: &DataPointSpec,
) -> CategoryGroup {
    let mut heuristics = Heuristics::empty();
    for benchmark in &list {
        heuristics.union(&benchmark.heuristics);
    }

    let mut alphabetical = list;
    alphabetical.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.run_name.cmp(&b.run_name))
    });
    let mut entries: Vec<GroupEntry> = alphabetical
        .into_iter()
        .enumerate()
        .map(|(position, benchmark)| GroupEntry {
            benchmark,
            color_index: color_slots(position, data_points),
            name_index: 0,
        })
        .collect();

    entries.sort_by(|a, b| display_order(&a.benchmark, &b.benchmark, primary));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.name_index = position;
    }
    CategoryGroup {
        entries,
        heuristics,
    }
}

fn color_slots(position: usize, data_points: &[DataPointSpec]) -> BTreeMap<String, usize> {
    if data_points.len() < 2 {
        data_points
            .iter()
            .map(|dp| (dp.metric.clone(), position))
            .collect()
    } else {
        data_points
            .iter()
            .enumerate()
            .map(|(slot, dp)| (dp.metric.clone(), slot))
            .collect()
    }
}

/// Errored benchmarks last, then those without a primary mean, then by mean in
/// the primary metric's favorable direction.
fn display_order(a: &Benchmark, b: &Benchmark, primary: &DataPointSpec) -> Ordering {
    let rank = |benchmark: &Benchmark| match (benchmark.is_error(), benchmark.mean(&primary.metric)) {
        (true, _) => (2, 0.0),
        (false, None) => (1, 0.0),
        (false, Some(mean)) => (0, mean),
    };
    let (rank_a, mean_a) = rank(a);
    let (rank_b, mean_b) = rank(b);
    rank_a.cmp(&rank_b).then_with(|| {
        if primary.lower_is_better {
            mean_a.total_cmp(&mean_b)
        } else {
            mean_b.total_cmp(&mean_a)
        }
    })
}
