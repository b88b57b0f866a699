//! Regime TDA: Two-Regime Classification Experiment
//!
//! ## Protocol
//!
//! 1. Load a `value,regime` CSV, or generate the sine / noisy-sine series
//!    and save it there
//! 2. Cut the series into labelled windows
//! 3. Time-ordered train/test split (no shuffling)
//! 4. Fit Takens → persistence entropy → scaler → random forest
//! 5. Report per-class metrics and per-regime mean entropy
//! 6. Optionally export the 3-D attractor for plotting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tda_regime::{
    ClassificationReport, Parallelism, PipelineConfig, RegimeGenerator, RegimePipeline,
    RegimeSeries, WindowEnd, export_attractor, train_test_split,
};

#[derive(Parser, Debug)]
#[command(name = "regime_tda", about = "Classify dynamical regimes with persistent homology")]
struct Args {
    /// Series CSV with `value,regime` columns; generated if missing
    #[arg(long, default_value = "regime_data.csv")]
    data: PathBuf,

    /// Samples to generate when the CSV does not exist
    #[arg(long, default_value_t = 1000)]
    n_samples: usize,

    /// Noise std of the generated second regime
    #[arg(long, default_value_t = 0.5)]
    noise: f64,

    /// JSON pipeline configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    window: Option<usize>,

    #[arg(long)]
    delay: Option<usize>,

    #[arg(long)]
    dimension: Option<usize>,

    /// Trees in the forest
    #[arg(long)]
    estimators: Option<usize>,

    /// Seed for data generation and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Worker threads, -1 for all cores
    #[arg(long, short = 'j', allow_hyphen_values = true)]
    jobs: Option<i64>,

    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Label windows by their own last sample instead of the next one
    #[arg(long)]
    inclusive: bool,

    /// Write the 3-D delay embedding of the series as CSV
    #[arg(long)]
    attractor: Option<PathBuf>,

    /// Delay used for the attractor export
    #[arg(long, default_value_t = 1)]
    attractor_delay: usize,
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(w) = args.window {
        config.embedding.window_size = w;
    }
    if let Some(d) = args.delay {
        config.embedding.time_delay = d;
    }
    if let Some(m) = args.dimension {
        config.embedding.embedding_dimension = m;
    }
    if let Some(n) = args.estimators {
        config.forest.n_estimators = n;
    }
    if let Some(jobs) = args.jobs {
        config.parallelism = Parallelism::from_jobs(jobs);
    }
    config.forest.seed = args.seed;
    Ok(config)
}

fn load_series(args: &Args) -> Result<RegimeSeries> {
    if args.data.exists() {
        info!(path = %args.data.display(), "loading series");
        return RegimeSeries::from_csv_path(&args.data)
            .with_context(|| format!("reading {}", args.data.display()));
    }

    info!(path = %args.data.display(), n = args.n_samples, "generating series");
    let mut rng = StdRng::seed_from_u64(args.seed);
    let series = RegimeGenerator::new(args.n_samples, args.noise).generate(&mut rng)?;
    series
        .write_csv(&args.data)
        .with_context(|| format!("writing {}", args.data.display()))?;
    Ok(series)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  TDA Regime Classification: Takens + Persistence Entropy");
    println!("═══════════════════════════════════════════════════════════════\n");

    let series = load_series(&args)?;
    println!("Series: {} samples, {} regimes", series.len(), series.n_regimes());

    let emb = config.embedding;
    println!("Embedding Parameters:");
    println!("  W = {} (window)", emb.window_size);
    println!("  τ = {} (delay)", emb.time_delay);
    println!("  m = {} (dimension)", emb.embedding_dimension);
    match emb.point_count() {
        Some(m) => println!("  M = {} points per cloud", m),
        None => println!("  M < 1: windows will embed to a single zero point"),
    }
    println!();

    let end = if args.inclusive { WindowEnd::Inclusive } else { WindowEnd::Exclusive };
    let data = series.windows(emb.window_size, end)?;
    let split = train_test_split(&data.windows, &data.labels, args.test_fraction)?;
    println!("Windows: {} × {}", data.len(), data.window_size());
    println!("  train = {}, test = {}", split.y_train.len(), split.y_test.len());

    let mut pipeline = RegimePipeline::new(&config)?;
    pipeline.fit(&split.x_train, &split.y_train)?;
    let predicted = pipeline.predict(&split.x_test)?;
    let report = ClassificationReport::new(&split.y_test, &predicted)?;

    println!("\n══════════════════════════════════════════════════════════════");
    println!("  Classification Report (test set)");
    println!("══════════════════════════════════════════════════════════════\n");
    println!("{}", report);

    // Per-regime mean entropy on all windows
    let features = pipeline.transform_features(&data.windows)?;
    let dims = pipeline.topology().homology_dimensions().to_vec();
    println!("Mean persistence entropy by regime:");
    for regime in series.regimes() {
        let rows: Vec<usize> = (0..data.len()).filter(|&i| data.labels[i] == regime).collect();
        if rows.is_empty() {
            continue;
        }
        let means: Vec<String> = dims
            .iter()
            .enumerate()
            .map(|(col, d)| {
                let mean = rows.iter().map(|&i| features[[i, col]]).sum::<f64>() / rows.len() as f64;
                format!("H{} = {:.4}", d, mean)
            })
            .collect();
        println!("  regime {} ({} windows): {}", regime, rows.len(), means.join(", "));
    }

    if let Some(path) = &args.attractor {
        let n = export_attractor(&series, args.attractor_delay, path)
            .with_context(|| format!("writing attractor {}", path.display()))?;
        println!("\nAttractor: {} points → {}", n, path.display());
    }

    Ok(())
}
