use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use partition::experiment::{Experiment, ExperimentError};
use partition::generate::{generate_instances, GeneratorConfig, Strategy};
use partition::instance::{read_instances, write_instances, InstanceError};
use partition::{Algorithm, DEFAULT_ITERATIONS};

type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
enum CliError {
    #[error("IO error, more details: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to read instances, more details: {0}")]
    Instance(#[from] InstanceError),
    #[error("Failed to partition, more details: {0}")]
    Partition(#[from] partition::Error),
    #[error("Experiment failed, more details: {0}")]
    Experiment(#[from] ExperimentError),
}

#[derive(Debug, Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Args {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Partition the given weights into groups and print the groups.
    Solve {
        /// Algorithm to run.
        #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Cga)]
        algorithm: AlgorithmArg,

        /// Number of groups.
        #[arg(short = 'n', long)]
        groups: usize,

        #[command(flatten)]
        tuning: Tuning,

        /// The weights to partition.
        #[arg(required = true)]
        weights: Vec<u64>,
    },

    /// Generate random instances and write them in the instance text format.
    Generate {
        /// How the weights are generated.
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Balanced)]
        strategy: StrategyArg,

        /// Output path of the instance file.
        #[arg(short, long)]
        output: PathBuf,

        /// Numbers of groups to generate instances for.
        #[arg(short = 'n', long, value_delimiter = ',', default_values_t = [2, 3, 4, 5])]
        groups: Vec<usize>,

        /// Maximal number of weights per instance (starting from the number of groups).
        #[arg(short = 'm', long, default_value_t = 20)]
        max_weights: usize,

        /// Numbers of bits of the generated weights.
        #[arg(short, long, value_delimiter = ',', default_values_t = [4, 8, 16])]
        bits: Vec<u32>,

        /// Instances per combination of parameters.
        #[arg(short, long, default_value_t = 5)]
        repeat: usize,

        /// Seed of the random generator. If not provided, the generator is seeded from entropy.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run all algorithms over an instance file and record the results as CSV.
    Run {
        /// Path to the instance file.
        #[arg(short, long)]
        instances: PathBuf,

        /// Output path of the CSV. Results are written to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: Tuning,
    },
}

#[derive(Debug, clap::Args)]
struct Tuning {
    /// Number of binary search rounds of MULTIFIT.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Time limit of CGA in milliseconds. CGA runs until optimality is proven if omitted.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl Tuning {
    fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    fn algorithms(&self) -> Vec<Algorithm> {
        [
            AlgorithmArg::Ls,
            AlgorithmArg::Lpt,
            AlgorithmArg::Multifit,
            AlgorithmArg::Lrm,
            AlgorithmArg::Cga,
        ]
        .into_iter()
        .map(|a| a.with(self))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Ls,
    Lpt,
    Multifit,
    Lrm,
    Cga,
}

impl AlgorithmArg {
    fn with(self, tuning: &Tuning) -> Algorithm {
        match self {
            Self::Ls => Algorithm::LS,
            Self::Lpt => Algorithm::LPT,
            Self::Multifit => Algorithm::Multifit {
                iterations: tuning.iterations,
            },
            Self::Lrm => Algorithm::Lrm,
            Self::Cga => Algorithm::Cga {
                timeout: tuning.timeout(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Balanced,
    Random,
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Balanced => Strategy::Balanced,
            StrategyArg::Random => Strategy::Random,
        }
    }
}

fn configure_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    configure_logging(args.verbose);

    match run(args.command) {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(command: Command) -> CliResult<()> {
    match command {
        Command::Solve {
            algorithm,
            groups,
            tuning,
            weights,
        } => solve(algorithm.with(&tuning), groups, &weights),
        Command::Generate {
            strategy,
            output,
            groups,
            max_weights,
            bits,
            repeat,
            seed,
        } => {
            let config = GeneratorConfig {
                groups,
                max_weights,
                bits,
                repeat,
                strategy: strategy.into(),
            };
            generate(&config, seed, output)
        }
        Command::Run {
            instances,
            output,
            tuning,
        } => experiment(Experiment::new(tuning.algorithms()), instances, output),
    }
}

fn solve(algorithm: Algorithm, n: usize, weights: &[u64]) -> CliResult<()> {
    let (partition, stats) = algorithm.partition(weights, n)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "=== {algorithm} ===")?;
    for (g, group) in partition.groups().iter().enumerate() {
        writeln!(
            out,
            "Group {} (Sum: {}): {:?}",
            g + 1,
            group.sum(),
            group.values(weights)
        )?;
    }
    writeln!(
        out,
        "Makespan: {} (lower bound: {}, optimal: {})",
        stats.makespan,
        stats.lower_bound,
        if stats.proved_optimal { "yes" } else { "unknown" }
    )?;

    info!(
        "{algorithm} took {:?}, expanded={} pruned={}",
        stats.elapsed, stats.expanded, stats.pruned
    );

    Ok(())
}

fn generate(config: &GeneratorConfig, seed: Option<u64>, output: PathBuf) -> CliResult<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let instances = generate_instances(config, &mut rng)?;
    write_instances(BufWriter::new(File::create(&output)?), &instances)?;

    info!(
        "Generated {} instances into {}",
        instances.len(),
        output.display()
    );
    Ok(())
}

fn experiment(
    experiment: Experiment,
    instances: PathBuf,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let instances = read_instances(instances)?;

    let records = match output {
        Some(path) => experiment.run(&instances, BufWriter::new(File::create(path)?))?,
        None => experiment.run(&instances, io::stdout().lock())?,
    };

    for summary in experiment.summarize(&records) {
        info!(
            "{:<8} mean error {:>7.3}% | max error {:>7.3}% | optimal {}/{} | mean time {:.1}us",
            summary.algorithm.name(),
            summary.mean_error,
            summary.max_error,
            summary.optimal_hits,
            summary.instances,
            summary.mean_time_us
        );
    }

    Ok(())
}
