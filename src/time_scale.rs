//! Time units understood by the engine and the display scale picked for an axis.
//!
//! Every duration is stored in seconds. A [`TimeScale`] knows how to get a raw
//! value into seconds and how to get a value in seconds back into its own unit
//! for display.

use serde::{Deserialize, Serialize};

use crate::BenchGraphError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeScale {
    pub symbol: String,
    pub label: String,
    pub to_seconds: f64,
    pub from_seconds: f64,
}

impl TimeScale {
    pub fn new(symbol: &str, label: &str, to_seconds: f64, from_seconds: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
            to_seconds,
            from_seconds,
        }
    }

    /// Converts a canonical (seconds) value into this unit.
    pub fn display(&self, seconds: f64) -> f64 {
        seconds * self.from_seconds
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeScaleTable {
    scales: Vec<TimeScale>,
}

impl TimeScaleTable {
    /// Builds a table from scales ordered ascending by `to_seconds`.
    pub fn new(scales: Vec<TimeScale>) -> Result<Self, BenchGraphError> {
        if scales.is_empty() {
            return Err(BenchGraphError::configuration(
                "time scale table must not be empty",
            ));
        }
        if scales
            .windows(2)
            .any(|pair| pair[0].to_seconds > pair[1].to_seconds)
        {
            return Err(BenchGraphError::configuration(
                "time scales must be ordered ascending by multiplier",
            ));
        }
        Ok(Self { scales })
    }

    /// The wall-clock table used for Google-Benchmark output.
    pub fn clock() -> Self {
        Self {
            scales: vec![
                TimeScale::new("fs", "femtoseconds", 1e-15, 1e15),
                TimeScale::new("ps", "picoseconds", 1e-12, 1e12),
                TimeScale::new("ns", "nanoseconds", 1e-9, 1e9),
                TimeScale::new("µs", "microseconds", 1e-6, 1e6),
                TimeScale::new("us", "microseconds", 1e-6, 1e6),
                TimeScale::new("ms", "milliseconds", 1e-3, 1e3),
                TimeScale::new("s", "seconds", 1.0, 1.0),
                TimeScale::new("m", "minutes", 60.0, 1.0 / 60.0),
                TimeScale::new("h", "hours", 3600.0, 1.0 / 3600.0),
            ],
        }
    }

    /// Resolves a `--time-format` name. Only the wall-clock table exists.
    pub fn named(name: &str) -> Result<Self, BenchGraphError> {
        match name {
            "clock" => Ok(Self::clock()),
            other => Err(BenchGraphError::configuration(format!(
                "unknown time format '{other}' (expected 'clock')"
            ))),
        }
    }

    /// First scale in table order carrying `symbol`.
    pub fn lookup(&self, symbol: &str) -> Result<&TimeScale, BenchGraphError> {
        self.scales
            .iter()
            .find(|scale| scale.symbol == symbol)
            .ok_or_else(|| BenchGraphError::unknown_unit(symbol))
    }

    /// Largest scale whose multiplier does not exceed `max_seconds`, clamped to
    /// the smallest scale when every multiplier is larger.
    pub fn select_display_scale(&self, max_seconds: f64) -> &TimeScale {
        let upper = self
            .scales
            .partition_point(|scale| scale.to_seconds <= max_seconds);
        &self.scales[upper.saturating_sub(1)]
    }
}

impl Default for TimeScaleTable {
    fn default() -> Self {
        Self::clock()
    }
}
