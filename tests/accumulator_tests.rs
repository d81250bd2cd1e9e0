use benchgraph::{BenchGraphError, BenchmarkAccumulator, EngineConfig, RawRow, TimeScaleTable};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= b.abs() * 1e-9
}

fn accumulator(config: EngineConfig) -> BenchmarkAccumulator {
    BenchmarkAccumulator::new(config, TimeScaleTable::clock()).expect("accumulator")
}

fn real_time_config() -> EngineConfig {
    EngineConfig::new(["real_time"], &["real_time"]).expect("config")
}

#[test]
fn test_rows_merge_by_run_name() {
    let mut acc = accumulator(real_time_config());
    let rows = vec![
        RawRow::new("A", "A", "ns").with_metric("real_time", 1000.0),
        RawRow::new("B", "B", "ns").with_metric("real_time", 10.0),
        RawRow::new("A", "A", "ns").with_metric("real_time", 3000.0),
        RawRow::new("A_mean", "A", "ns").with_metric("real_time", 2000.0),
    ];
    acc.ingest_all(&rows).expect("ingest");
    assert_eq!(acc.len(), 2);
    let names: Vec<&str> = acc.benchmarks().iter().map(|b| b.run_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let a = acc.get("A").expect("A");
    let samples = a.samples_for("real_time");
    assert_eq!(samples.len(), 2);
    assert!(approx(samples[0], 1e-6));
    assert!(approx(samples[1], 3e-6));
    assert!(approx(a.heuristics.min, 1e-6));
    assert!(approx(a.heuristics.max, 3e-6));
    assert!(approx(a.mean("real_time").expect("mean"), 2e-6));
}

#[test]
fn test_statistic_rows_do_not_touch_heuristics() {
    let mut acc = accumulator(real_time_config());
    acc.ingest(&RawRow::new("A_mean", "A", "ms").with_metric("real_time", 4.0))
        .expect("ingest");
    let a = acc.get("A").expect("A");
    assert!(a.heuristics.is_empty());
    assert!(a.samples_for("real_time").is_empty());
    assert!(approx(a.mean("real_time").expect("mean"), 4e-3));
}

#[test]
fn test_duplicate_statistic_last_write_wins() {
    let mut acc = accumulator(real_time_config());
    acc.ingest(&RawRow::new("A_mean", "A", "ns").with_metric("real_time", 5.0))
        .expect("first");
    acc.ingest(&RawRow::new("A_mean", "A", "ns").with_metric("real_time", 7.0))
        .expect("second");
    let a = acc.get("A").expect("A");
    assert!(approx(a.mean("real_time").expect("mean"), 7e-9));
}

#[test]
fn test_errored_row_marks_benchmark_and_keeps_earlier_data() {
    let mut acc = accumulator(real_time_config());
    acc.ingest(&RawRow::new("A", "A", "ns").with_metric("real_time", 100.0))
        .expect("sample");
    acc.ingest(&RawRow::new("A", "A", "ns").with_error("allocation failed"))
        .expect("error row is not fatal");
    acc.ingest(&RawRow::new("B", "B", "ns").with_metric("real_time", 5.0))
        .expect("batch continues");

    let a = acc.get("A").expect("A");
    assert_eq!(a.error.as_deref(), Some("allocation failed"));
    assert_eq!(a.samples_for("real_time").len(), 1);
    assert!(acc.get("B").expect("B").error.is_none());
}

#[test]
fn test_errored_row_needs_no_metrics() {
    let mut acc = accumulator(real_time_config());
    let mut row = RawRow::new("A", "A", "ns");
    row.error_occurred = Some(true);
    acc.ingest(&row).expect("ingest");
    let a = acc.get("A").expect("A");
    assert_eq!(a.error.as_deref(), Some(""));
    assert!(a.samples.is_empty());
}

#[test]
fn test_scale_categories_divide_by_scale() {
    let config = real_time_config()
        .with_categories(["big", "small"])
        .with_scale(10.0)
        .with_scale_categories(["big"]);
    let mut acc = accumulator(config);
    acc.ingest(&RawRow::new("big_x", "big_x", "ns").with_metric("real_time", 100.0))
        .expect("big");
    acc.ingest(&RawRow::new("small_x", "small_x", "ns").with_metric("real_time", 100.0))
        .expect("small");
    assert!(approx(acc.get("big_x").expect("big").samples_for("real_time")[0], 1e-8));
    assert!(approx(acc.get("small_x").expect("small").samples_for("real_time")[0], 1e-7));
}

#[test]
fn test_every_metric_is_tracked() {
    let config = EngineConfig::new(["real_time", "cpu_time"], &["real_time", "cpu_time"])
        .expect("config");
    let mut acc = accumulator(config);
    acc.ingest(
        &RawRow::new("A", "A", "us")
            .with_metric("real_time", 2.0)
            .with_metric("cpu_time", 8.0)
            .with_metric("iterations", 1000.0),
    )
    .expect("ingest");
    let a = acc.get("A").expect("A");
    assert_eq!(a.samples.len(), 2);
    assert!(approx(a.samples_for("cpu_time")[0], 8e-6));
    assert!(approx(a.heuristics.min, 2e-6));
    assert!(approx(a.heuristics.max, 8e-6));
}

#[test]
fn test_missing_metric_is_reported() {
    let mut acc = accumulator(real_time_config());
    let err = acc
        .ingest(&RawRow::new("A", "A", "ns").with_metric("cpu_time", 1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        BenchGraphError::MissingMetric { ref run_name, ref metric }
            if run_name == "A" && metric == "real_time"
    ));
    assert!(acc.is_empty());
}

#[test]
fn test_failed_row_leaves_accumulator_usable() {
    let mut acc = accumulator(real_time_config());
    assert!(
        acc.ingest(&RawRow::new("A", "A", "ns").with_metric("cpu_time", 1.0))
            .is_err()
    );
    acc.ingest(&RawRow::new("B", "B", "ns").with_metric("real_time", 4.0))
        .expect("ingest");
    assert!(acc.get("A").is_none());
    let names: Vec<&str> = acc.benchmarks().iter().map(|b| b.run_name.as_str()).collect();
    assert_eq!(names, vec!["B"]);
}

#[test]
fn test_unsupported_unit_aborts_before_creating_benchmark() {
    let mut acc = accumulator(real_time_config());
    let err = acc
        .ingest(&RawRow::new("A", "A", "jiffies").with_metric("real_time", 1.0))
        .unwrap_err();
    assert!(matches!(err, BenchGraphError::UnsupportedTimeUnit { .. }));
    assert!(acc.is_empty());
}

#[test]
fn test_empty_metric_list_is_configuration_error() {
    let err = EngineConfig::new(Vec::<String>::new(), &[]).unwrap_err();
    assert!(matches!(err, BenchGraphError::ConfigurationError(_)));
}

#[test]
fn test_non_positive_scale_is_rejected() {
    let config = real_time_config().with_scale(0.0);
    let err = BenchmarkAccumulator::new(config, TimeScaleTable::clock()).unwrap_err();
    assert!(matches!(err, BenchGraphError::ConfigurationError(_)));
}

#[test]
fn test_merge_shards_by_run_name() {
    let mut left = accumulator(real_time_config());
    left.ingest_all(&[
        RawRow::new("A", "A", "ns").with_metric("real_time", 1.0),
        RawRow::new("A_mean", "A", "ns").with_metric("real_time", 1.0),
    ])
    .expect("left");
    let mut right = accumulator(real_time_config());
    right
        .ingest_all(&[
            RawRow::new("A", "A", "ns").with_metric("real_time", 3.0),
            RawRow::new("A_mean", "A", "ns").with_metric("real_time", 2.0),
            RawRow::new("C", "C", "ns").with_metric("real_time", 9.0),
        ])
        .expect("right");

    left.merge(right);
    assert_eq!(left.len(), 2);
    let a = left.get("A").expect("A");
    assert_eq!(a.samples_for("real_time").len(), 2);
    assert!(approx(a.samples_for("real_time")[1], 3e-9));
    assert!(approx(a.mean("real_time").expect("mean"), 2e-9));
    assert!(approx(a.heuristics.max, 3e-9));
    assert_eq!(left.benchmarks()[1].run_name, "C");
}
