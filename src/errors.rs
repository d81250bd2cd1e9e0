use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchGraphError {
    #[error("unknown time unit: {0}")]
    UnknownUnit(String),
    #[error("unsupported time unit {unit:?} in run {run_name}")]
    UnsupportedTimeUnit { run_name: String, unit: String },
    #[error("configuration error: {0}")]
    ConfigurationError(String),
    #[error("run {run_name} is missing metric {metric}")]
    MissingMetric { run_name: String, metric: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(String),
}

impl BenchGraphError {
    pub fn unknown_unit<T: Into<String>>(symbol: T) -> Self {
        BenchGraphError::UnknownUnit(symbol.into())
    }

    pub fn unsupported_unit<R: Into<String>, U: Into<String>>(run_name: R, unit: U) -> Self {
        BenchGraphError::UnsupportedTimeUnit {
            run_name: run_name.into(),
            unit: unit.into(),
        }
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        BenchGraphError::ConfigurationError(msg.into())
    }

    pub fn missing_metric<R: Into<String>, M: Into<String>>(run_name: R, metric: M) -> Self {
        BenchGraphError::MissingMetric {
            run_name: run_name.into(),
            metric: metric.into(),
        }
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BenchGraphError::InvalidInput(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        BenchGraphError::Io(msg.into())
    }
}
