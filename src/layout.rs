//! Chart geometry for one category group: bar positions, scatter jitter, axis
//! scale and the text that goes around them.
//!
//! Nothing here draws pixels. A [`ChartPlan`] is everything a plotting backend
//! needs to render a horizontal bar chart of a group.

use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::{
    aggregate::{CategoryGroup, GroupEntry},
    config::DataPointSpec,
    time_scale::{TimeScale, TimeScaleTable},
};

pub const BAR_HEIGHT: f64 = 0.35;
pub const BAR_PADDING: f64 = 0.15;
const EDGE_DARKEN: f64 = 0.6;

pub const PALETTE: [(&str, Option<&str>); 16] = [
    ("#a6cee3", Some("/")),
    ("#f255bb", Some("O")),
    ("#00c9ab", Some("\\")),
    ("#b15928", Some("o")),
    ("#33a02c", Some(".")),
    ("#fb9a99", Some("*")),
    ("#e31a1c", Some("+")),
    ("#fdbf6f", Some("x")),
    ("#ff7f00", Some("|")),
    ("#cab2d6", None),
    ("#6a3d9a", Some("-")),
    ("#ffff99", Some("xx")),
    ("#f5f5f5", Some("..")),
    ("#1f78b4", Some("||")),
    ("#b2df8a", Some("**")),
    ("#cc33cc", Some("--")),
];

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Swatch {
    pub color: String,
    pub edge_color: String,
    pub hatch: Option<String>,
}

/// Palette slots wrap around once a group has more members than colors.
pub fn swatch(slot: usize) -> Swatch {
    if slot >= PALETTE.len() {
        warn!(slot, palette = PALETTE.len(), "palette slot wraps around");
    }
    let (color, hatch) = PALETTE[slot % PALETTE.len()];
    Swatch {
        color: color.to_string(),
        edge_color: darken(color, EDGE_DARKEN),
        hatch: hatch.map(str::to_string),
    }
}

// Scaling HSV value is a uniform scale of the RGB channels.
fn darken(hex: &str, factor: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        let raw = hex
            .get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(0);
        (f64::from(raw) * factor).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(1..3), channel(3..5), channel(5..7))
}

pub fn scatter_alpha(points: usize) -> f64 {
    match points {
        0..=10 => 0.20,
        11..=100 => 0.10,
        101..=1000 => 0.05,
        _ => 0.002,
    }
}

/// Formats an axis tick given in seconds using `scale`'s unit.
pub fn format_tick(seconds: f64, scale: &TimeScale) -> String {
    if seconds == 0.0 {
        return "0".to_string();
    }
    let value = scale.display(seconds);
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Chart title for a category; the unnamed category falls back to `fallback`.
pub fn chart_title(category: &str, fallback: &str) -> String {
    let source = if category.is_empty() {
        fallback
    } else {
        category
    };
    source
        .replace("_measure", "")
        .replace('_', " ")
        .trim()
        .to_string()
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Scatter {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub alpha: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkKind {
    Bar {
        mean: f64,
        stddev: Option<f64>,
        scatter: Scatter,
    },
    /// Non-errored benchmark with no mean statistic to draw.
    NoMean { scatter: Scatter },
    Error { x: f64, message: String },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Mark {
    pub benchmark: String,
    pub metric: String,
    pub y: f64,
    pub height: f64,
    pub swatch: Swatch,
    #[serde(flatten)]
    pub kind: MarkKind,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChartPlan {
    pub title: String,
    pub time_scale: TimeScale,
    pub x_limits: [f64; 2],
    pub x_label: String,
    pub legend: Vec<String>,
    pub y_ticks: Vec<f64>,
    pub y_labels: Vec<String>,
    pub y_limits: [f64; 2],
    pub marks: Vec<Mark>,
}

pub fn plan_chart<R: Rng>(
    title: &str,
    group: &CategoryGroup,
    data_points: &[DataPointSpec],
    table: &TimeScaleTable,
    rng: &mut R,
) -> ChartPlan {
    let max = if group.heuristics.is_empty() {
        0.0
    } else {
        group.heuristics.max
    };
    let range = group.heuristics.range();
    let metric_count = data_points.len().max(1);
    let group_size = BAR_HEIGHT * metric_count as f64 + BAR_PADDING;
    let time_scale = table.select_display_scale(max).clone();

    let mut marks = Vec::with_capacity(group.len() * metric_count);
    for (bi, entry) in group.entries.iter().enumerate() {
        for (di, dp) in data_points.iter().enumerate() {
            let y = bi as f64 * group_size + di as f64 * BAR_HEIGHT + BAR_PADDING * 0.5;
            marks.push(plan_mark(entry, dp, y, range, rng));
        }
    }

    let y_ticks = (0..group.len())
        .map(|bi| (bi as f64 + 0.5) * group_size)
        .collect();
    let y_labels = group
        .benchmarks()
        .map(|benchmark| benchmark.display_name.clone())
        .collect();
    let first_y = marks.first().map(|mark| mark.y).unwrap_or(0.0);
    let last_y = marks.last().map(|mark| mark.y).unwrap_or(0.0);

    let (x_label, legend) = axis_text(data_points, &time_scale);
    ChartPlan {
        title: title.to_string(),
        time_scale,
        x_limits: [0.0, max + range * 0.25],
        x_label,
        legend,
        y_ticks,
        y_labels,
        y_limits: [first_y - BAR_PADDING, last_y + BAR_HEIGHT + BAR_PADDING],
        marks,
    }
}

fn plan_mark<R: Rng>(
    entry: &GroupEntry,
    dp: &DataPointSpec,
    y: f64,
    range: f64,
    rng: &mut R,
) -> Mark {
    let benchmark = &entry.benchmark;
    let slot = entry.color_index.get(&dp.metric).copied().unwrap_or(0);
    let kind = if let Some(message) = &benchmark.error {
        MarkKind::Error {
            x: range * 0.02,
            message: message.clone(),
        }
    } else {
        let x = benchmark.samples_for(&dp.metric).to_vec();
        let quarter = BAR_HEIGHT * 0.25;
        let jitter = x
            .iter()
            .map(|_| y + rng.gen_range(quarter..BAR_HEIGHT - quarter))
            .collect();
        let scatter = Scatter {
            alpha: scatter_alpha(x.len()),
            x,
            y: jitter,
        };
        match benchmark.mean(&dp.metric) {
            Some(mean) => MarkKind::Bar {
                mean,
                stddev: benchmark.stddev(&dp.metric),
                scatter,
            },
            None => MarkKind::NoMean { scatter },
        }
    };
    Mark {
        benchmark: benchmark.display_name.clone(),
        metric: dp.metric.clone(),
        y,
        height: BAR_HEIGHT,
        swatch: swatch(slot),
        kind,
    }
}

fn axis_text(data_points: &[DataPointSpec], scale: &TimeScale) -> (String, Vec<String>) {
    match data_points {
        [single] => (
            format!(
                "{} measured in {} - {}",
                single.metric,
                scale.label,
                single.polarity_text()
            ),
            Vec::new(),
        ),
        many => {
            let legend = many
                .iter()
                .map(|dp| {
                    let polarity = if dp.lower_is_better {
                        "lower=good"
                    } else {
                        "higher=good"
                    };
                    format!("{} - {}", dp.metric, polarity)
                })
                .collect();
            (format!("measured in {}", scale.label), legend)
        }
    }
}
