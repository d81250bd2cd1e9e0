use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::row::RawRow;

#[derive(Clone, Debug)]
pub struct RunShape {
    pub categories: Vec<String>,
    pub variants: usize,
    pub repetitions: usize,
    pub with_noop: bool,
}

impl RunShape {
    pub fn rows(&self) -> usize {
        let benchmarks = self.categories.len() * self.variants + usize::from(self.with_noop);
        benchmarks * (self.repetitions + 2)
    }
}

/// Synthetic Google-Benchmark style rows: `repetitions` samples plus a mean and
/// stddev row per benchmark, all in nanoseconds.
pub fn generate_rows(shape: &RunShape, seed: u64) -> Vec<RawRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(shape.rows());
    if shape.with_noop {
        push_benchmark(&mut rows, "noop", 1.0, shape.repetitions, &mut rng);
    }
    for category in &shape.categories {
        for variant in 0..shape.variants {
            let run_name = format!("{category}_variant{variant}");
            let base = 10.0 + rng.gen_range(0.0..1000.0);
            push_benchmark(&mut rows, &run_name, base, shape.repetitions, &mut rng);
        }
    }
    rows
}

fn push_benchmark(
    rows: &mut Vec<RawRow>,
    run_name: &str,
    base: f64,
    repetitions: usize,
    rng: &mut StdRng,
) {
    let samples: Vec<f64> = (0..repetitions)
        .map(|_| base * rng.gen_range(0.9..1.1))
        .collect();
    for value in &samples {
        rows.push(RawRow::new(run_name, run_name, "ns").with_metric("real_time", *value));
    }
    let count = samples.len().max(1) as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    rows.push(
        RawRow::new(&format!("{run_name}_mean"), run_name, "ns").with_metric("real_time", mean),
    );
    rows.push(
        RawRow::new(&format!("{run_name}_stddev"), run_name, "ns")
            .with_metric("real_time", variance.sqrt()),
    );
}
