//! Decoding of benchmark-harness output into [`RawRow`]s.
//!
//! Supports the Google-Benchmark JSON document and its CSV reporter layout.

use std::{fs, io::Read, path::Path};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{BenchGraphError, row::RawRow};

const AGGREGATE_SUFFIXES: [&str; 4] = ["_mean", "_median", "_stddev", "_cv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Json,
        }
    }

    pub fn parse(value: &str) -> Result<Self, BenchGraphError> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            other => Err(BenchGraphError::invalid_input(format!(
                "input format must be 'json' or 'csv', got {other:?}"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct JsonDocument {
    benchmarks: Vec<Map<String, Value>>,
}

pub fn load_rows(path: &Path, format: Option<InputFormat>) -> Result<Vec<RawRow>, BenchGraphError> {
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    let data = fs::read(path)
        .map_err(|e| BenchGraphError::io(format!("{}: {e}", path.display())))?;
    match format {
        InputFormat::Json => parse_json(data.as_slice()),
        InputFormat::Csv => parse_csv(data.as_slice()),
    }
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<RawRow>, BenchGraphError> {
    let document: JsonDocument = serde_json::from_reader(reader)
        .map_err(|e| BenchGraphError::invalid_input(e.to_string()))?;
    document
        .benchmarks
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| json_row(idx, entry))
        .collect()
}

fn json_row(idx: usize, mut entry: Map<String, Value>) -> Result<RawRow, BenchGraphError> {
    let name = take_string(&mut entry, "name")
        .ok_or_else(|| BenchGraphError::invalid_input(format!("benchmark #{idx} has no name")))?;
    let run_name = take_string(&mut entry, "run_name").unwrap_or_else(|| name.clone());
    let time_unit = take_string(&mut entry, "time_unit").ok_or_else(|| {
        BenchGraphError::invalid_input(format!("benchmark {name} has no time_unit"))
    })?;
    let error_occurred = match entry.remove("error_occurred") {
        None | Some(Value::Null) => None,
        Some(Value::Bool(flag)) => Some(flag),
        Some(other) => {
            return Err(BenchGraphError::invalid_input(format!(
                "benchmark {name} has non-boolean error_occurred {other}"
            )));
        }
    };
    let error_message = take_string(&mut entry, "error_message");
    let metric_values = entry
        .into_iter()
        .filter_map(|(key, value)| value.as_f64().map(|number| (key, number)))
        .collect();
    Ok(RawRow {
        name,
        run_name,
        time_unit,
        error_occurred,
        error_message,
        metric_values,
    })
}

fn take_string(entry: &mut Map<String, Value>, key: &str) -> Option<String> {
    match entry.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, BenchGraphError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| BenchGraphError::invalid_input(e.to_string()))?
        .clone();
    let column = |label: &str| headers.iter().position(|header| header.trim() == label);
    let name_col = column("name")
        .ok_or_else(|| BenchGraphError::invalid_input("csv input has no 'name' column"))?;
    let unit_col = column("time_unit")
        .ok_or_else(|| BenchGraphError::invalid_input("csv input has no 'time_unit' column"))?;
    let run_col = column("run_name");
    let error_col = column("error_occurred");
    let message_col = column("error_message");
    let reserved = [Some(name_col), Some(unit_col), run_col, error_col, message_col];

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| BenchGraphError::invalid_input(e.to_string()))?;
        let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
        let name = field(name_col).to_string();
        if name.is_empty() {
            return Err(BenchGraphError::invalid_input(format!(
                "csv record {} has an empty name",
                line + 1
            )));
        }
        let run_name = match run_col.map(field) {
            Some(run) if !run.is_empty() => run.to_string(),
            _ => strip_aggregate_suffix(&name).to_string(),
        };
        let error_occurred = match error_col.map(field) {
            None | Some("") => None,
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            Some(other) => {
                return Err(BenchGraphError::invalid_input(format!(
                    "csv record {} has invalid error_occurred {other:?}",
                    line + 1
                )));
            }
        };
        let error_message = message_col
            .map(field)
            .filter(|message| !message.is_empty())
            .map(str::to_string);
        let metric_values = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !reserved.contains(&Some(*idx)))
            .filter_map(|(idx, header)| {
                field(idx)
                    .parse::<f64>()
                    .ok()
                    .map(|value| (header.trim().to_string(), value))
            })
            .collect();
        rows.push(RawRow {
            name,
            run_name,
            time_unit: field(unit_col).to_string(),
            error_occurred,
            error_message,
            metric_values,
        });
    }
    Ok(rows)
}

fn strip_aggregate_suffix(name: &str) -> &str {
    AGGREGATE_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}
