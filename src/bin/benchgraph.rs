use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use benchgraph::{
    BenchGraphError, ChartEngine, EngineConfig, InputFormat, TimeScaleTable,
    layout::{chart_title, plan_chart},
    load_rows,
};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SEED: u64 = 1782905257495843795;

/// Generate chart plans from a Google-Benchmark compatible json/csv listing of data.
#[derive(Parser, Debug)]
#[command(name = "benchgraph", version, about)]
struct Cli {
    #[arg(short, long, default_value = "out_ptr_benchmarks.json")]
    input: PathBuf,

    /// json or csv; detected from the input extension when omitted
    #[arg(short = 'f', long)]
    input_format: Option<String>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short = 'd', long, env = "BENCHGRAPH_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[arg(short = 'p', long, num_args = 1.., default_values_t = [String::from("real_time")])]
    data_point_names: Vec<String>,

    #[arg(short, long, num_args = 1.., default_values_t = [String::from("real_time")])]
    lower: Vec<String>,

    #[arg(short, long, num_args = 1..)]
    categories: Vec<String>,

    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    #[arg(short = 't', long, num_args = 1..)]
    scale_categories: Vec<String>,

    #[arg(short = 'r', long, num_args = 1..)]
    remove_from_names: Vec<String>,

    /// Time scale table used to read units and label axes
    #[arg(short = 'z', long, default_value = "clock")]
    time_format: String,

    /// Seed for scatter-point jitter
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "benchgraph=debug" } else { "benchgraph=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), BenchGraphError> {
    let lower: Vec<&str> = cli.lower.iter().map(String::as_str).collect();
    let config = EngineConfig::new(&cli.data_point_names, &lower)?
        .with_categories(cli.categories.iter().cloned())
        .with_scale(cli.scale)
        .with_scale_categories(cli.scale_categories.iter().cloned())
        .with_name_removals(cli.remove_from_names.iter().cloned());
    let engine = ChartEngine::with_table(config, TimeScaleTable::named(&cli.time_format)?)?;

    let format = cli
        .input_format
        .as_deref()
        .map(InputFormat::parse)
        .transpose()?;
    let rows = load_rows(&cli.input, format)?;
    let output = engine.run(&rows)?;

    let stem = input_stem(&cli.input);
    let single_target = output_file(&cli.input, cli.output.as_deref());
    let dir = output_dir(&single_target, cli.output_dir.as_deref());
    let mut rng = StdRng::seed_from_u64(cli.seed);
    for (category, group) in output.categories.iter() {
        let title = chart_title(category, &stem);
        let plan = plan_chart(
            &title,
            group,
            &engine.config().data_points,
            &output.time_scales,
            &mut rng,
        );
        let target = if cli.categories.is_empty() {
            single_target.clone()
        } else {
            dir.join(format!("{title}.plan.json"))
        };
        let data = serde_json::to_vec_pretty(&plan)
            .map_err(|e| BenchGraphError::invalid_input(e.to_string()))?;
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| BenchGraphError::io(format!("{}: {e}", parent.display())))?;
        }
        fs::write(&target, data)
            .map_err(|e| BenchGraphError::io(format!("{}: {e}", target.display())))?;
        info!(chart = %title, target = %target.display(), "saved chart plan");
    }
    Ok(())
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn output_file(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(format!("{}.plan.json", input_stem(input))),
    }
}

fn output_dir(output: &Path, dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.to_path_buf(),
        None => output.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}
