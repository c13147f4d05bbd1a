//! svm-holdout Command Line Interface
//!
//! Fits an RBF one-vs-one SVM on a seeded holdout split of a built-in
//! dataset and prints the predicted and true test labels.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use svm_holdout::core::{Dataset, Result, SVMError};
use svm_holdout::pipeline::{self, PipelineConfig};
use svm_holdout::{BuiltinDataset, EvaluationMetrics, SplitSize};

#[derive(Parser)]
#[command(name = "svm-holdout")]
#[command(about = "Holdout evaluation of a multiclass RBF SVM on built-in datasets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify 8x8 handwritten digit images
    Digits(RunArgs),
    /// Classify iris flowers
    Iris(RunArgs),
    /// List the built-in datasets
    Datasets(DatasetsArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Regularization parameter C
    #[arg(short = 'C', long, default_value = "100.0")]
    c: f64,

    /// RBF kernel width
    #[arg(long, default_value = "0.001")]
    gamma: f64,

    /// Fraction of samples held out for testing [default: 0.1]
    #[arg(long, conflicts_with = "test_count")]
    test_size: Option<f64>,

    /// Exact number of samples held out for testing
    #[arg(long)]
    test_count: Option<usize>,

    /// Shuffle seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Convergence tolerance
    #[arg(long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum solver iterations per class pair
    #[arg(long, default_value = "100000")]
    max_iterations: usize,

    /// Kernel cache size in MB
    #[arg(long, default_value = "100")]
    cache_size: usize,

    /// Show per-class metrics and the confusion matrix
    #[arg(long)]
    detailed: bool,

    /// Write the report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DatasetsArgs {
    /// Only describe this dataset
    name: Option<CliDataset>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDataset {
    #[value(name = "digits")]
    Digits,
    #[value(name = "iris")]
    Iris,
}

impl From<CliDataset> for BuiltinDataset {
    fn from(cli_dataset: CliDataset) -> Self {
        match cli_dataset {
            CliDataset::Digits => BuiltinDataset::Digits,
            CliDataset::Iris => BuiltinDataset::Iris,
        }
    }
}

impl RunArgs {
    fn to_config(&self, dataset: BuiltinDataset) -> Result<PipelineConfig> {
        let split = match (self.test_count, self.test_size) {
            (Some(count), _) => SplitSize::Count(count),
            (None, Some(fraction)) => SplitSize::Fraction(fraction),
            (None, None) => SplitSize::default(),
        };

        // Convert MB to bytes
        let cache_size = match self.cache_size.checked_mul(1024 * 1024) {
            Some(bytes) => bytes,
            None => {
                return Err(SVMError::InvalidParameter(format!(
                    "Cache size of {} MB is too large",
                    self.cache_size
                )))
            }
        };

        Ok(PipelineConfig {
            split,
            c: self.c,
            gamma: self.gamma,
            seed: self.seed,
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
            cache_size,
            ..PipelineConfig::for_dataset(dataset)
        })
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Digits(args) => run_command(BuiltinDataset::Digits, args),
        Commands::Iris(args) => run_command(BuiltinDataset::Iris, args),
        Commands::Datasets(args) => datasets_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(dataset: BuiltinDataset, args: RunArgs) -> Result<()> {
    let config = args.to_config(dataset)?;
    info!(
        "Running {dataset}: C={}, gamma={}, split={:?}",
        config.c, config.gamma, config.split
    );

    let report = pipeline::run(&config)?;
    println!("{report}");

    if args.detailed {
        let metrics = EvaluationMetrics::from_predictions(&report.predicted, &report.actual)?;
        println!("\n{metrics}");
    }

    if let Some(path) = &args.output {
        report.save_json(path)?;
        info!("Report saved to: {path:?}");
    }

    Ok(())
}

fn datasets_command(args: DatasetsArgs) -> Result<()> {
    let selected: Vec<BuiltinDataset> = match args.name {
        Some(name) => vec![name.into()],
        None => BuiltinDataset::all().to_vec(),
    };

    for dataset in selected {
        let data = dataset.load()?;
        println!(
            "{dataset}: {} samples, {} features, {} classes",
            data.len(),
            data.dim(),
            data.classes().len()
        );
    }

    Ok(())
}
