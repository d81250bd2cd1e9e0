use std::{fs, path::Path};

use benchgraph::{
    BenchGraphError, InputFormat,
    loader::{load_rows, parse_csv, parse_json},
};

const GOOGLE_JSON: &str = r#"{
  "context": {"date": "2024-01-01", "num_cpus": 8},
  "benchmarks": [
    {"name": "local_out_ptr/real_time", "run_name": "local_out_ptr/real_time",
     "run_type": "iteration", "iterations": 1000, "real_time": 12.5, "cpu_time": 12.0,
     "time_unit": "ns"},
    {"name": "local_out_ptr/real_time_mean", "run_name": "local_out_ptr/real_time",
     "run_type": "aggregate", "aggregate_name": "mean", "iterations": 3,
     "real_time": 12.0, "cpu_time": 11.5, "time_unit": "ns"},
    {"name": "broken", "run_name": "broken", "error_occurred": true,
     "error_message": "failed to allocate", "time_unit": "ns"}
  ]
}"#;

#[test]
fn test_parse_google_benchmark_json() {
    let rows = parse_json(GOOGLE_JSON.as_bytes()).expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].run_name, "local_out_ptr/real_time");
    assert_eq!(rows[0].time_unit, "ns");
    assert_eq!(rows[0].metric("real_time").expect("real_time"), 12.5);
    assert_eq!(rows[0].metric("iterations").expect("iterations"), 1000.0);
    assert!(!rows[0].is_error());
    assert_eq!(rows[1].name, "local_out_ptr/real_time_mean");
    assert!(rows[2].is_error());
    assert_eq!(rows[2].error_message.as_deref(), Some("failed to allocate"));
}

#[test]
fn test_json_run_name_defaults_to_name() {
    let rows = parse_json(
        r#"{"benchmarks": [{"name": "A", "time_unit": "us", "real_time": 1}]}"#.as_bytes(),
    )
    .expect("rows");
    assert_eq!(rows[0].run_name, "A");
}

#[test]
fn test_json_requires_time_unit() {
    let err = parse_json(r#"{"benchmarks": [{"name": "A", "real_time": 1}]}"#.as_bytes())
        .unwrap_err();
    assert!(matches!(err, BenchGraphError::InvalidInput(_)));
}

#[test]
fn test_json_without_benchmarks_array_fails() {
    assert!(parse_json(r#"{"context": {}}"#.as_bytes()).is_err());
}

#[test]
fn test_parse_csv_rows() {
    let data = "name,iterations,real_time,cpu_time,time_unit,label,error_occurred,error_message\n\
                BM_reset,100,10.5,10.0,ns,,,\n\
                BM_reset_mean,3,10.0,9.5,ns,,,\n\
                BM_fail,0,0,0,ns,,true,boom\n";
    let rows = parse_csv(data.as_bytes()).expect("rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].run_name, "BM_reset");
    assert_eq!(rows[1].run_name, "BM_reset");
    assert_eq!(rows[1].name, "BM_reset_mean");
    assert_eq!(rows[0].metric("real_time").expect("real_time"), 10.5);
    assert!(!rows[0].metric_values.contains_key("label"));
    assert_eq!(rows[2].error_occurred, Some(true));
    assert_eq!(rows[2].error_message.as_deref(), Some("boom"));
}

#[test]
fn test_csv_explicit_run_name_column() {
    let data = "name,run_name,real_time,time_unit\nX_stat,X,1,ms\n";
    let rows = parse_csv(data.as_bytes()).expect("rows");
    assert_eq!(rows[0].run_name, "X");
    assert!(!rows[0].metric_values.contains_key("run_name"));
}

#[test]
fn test_csv_requires_time_unit_column() {
    let err = parse_csv("name,real_time\nA,1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, BenchGraphError::InvalidInput(_)));
}

#[test]
fn test_format_detection() {
    assert_eq!(InputFormat::from_path(Path::new("run.csv")), InputFormat::Csv);
    assert_eq!(InputFormat::from_path(Path::new("run.CSV")), InputFormat::Csv);
    assert_eq!(InputFormat::from_path(Path::new("run.json")), InputFormat::Json);
    assert_eq!(InputFormat::from_path(Path::new("run")), InputFormat::Json);
    assert_eq!(InputFormat::parse("CSV").expect("csv"), InputFormat::Csv);
    assert!(InputFormat::parse("xml").is_err());
}

#[test]
fn test_load_rows_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bench.json");
    fs::write(&path, GOOGLE_JSON).expect("write");
    let rows = load_rows(&path, None).expect("rows");
    assert_eq!(rows.len(), 3);

    let missing = load_rows(&dir.path().join("missing.json"), None).unwrap_err();
    assert!(matches!(missing, BenchGraphError::Io(_)));
}
