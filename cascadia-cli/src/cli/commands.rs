//! Command implementations and argument parsing for the cascadia CLI.

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use cascadia_core::{
    CascadeModelKind, DEFAULT_SEED_COUNTS, DEFAULT_TRANSMISSIONS, ExperimentBuilder,
    ExperimentReport, Graph, GridConfig, GridRow, SeedStrategy, SimulationError, erdos_renyi,
};
use clap::{Args, Parser, Subcommand};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::edges::parse_edge_list;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "cascadia",
    about = "Compare seeding strategies for information cascades on networks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Sweep seed-set sizes for each strategy on one graph.
    Sweep(SweepCommand),
    /// Compare SIR strategies over a grid of transmissions and seed counts.
    Grid(GridCommand),
}

/// Options accepted by the `sweep` command.
#[derive(Debug, Args, Clone)]
pub struct SweepCommand {
    /// Cascade model: `sir` or `threshold`.
    #[arg(long, default_value = "sir", value_parser = CascadeModelKind::from_str)]
    pub model: CascadeModelKind,

    /// SIR transmission probability.
    #[arg(long, default_value_t = 0.5)]
    pub transmission: f64,

    /// Threshold distribution id (1-6).
    #[arg(long, default_value_t = 1)]
    pub distribution: u8,

    /// Seed strategy to sweep; repeat for several. Defaults to all three.
    #[arg(long = "strategy", value_parser = SeedStrategy::from_str)]
    pub strategies: Vec<SeedStrategy>,

    /// Largest seed-set size.
    #[arg(long, default_value_t = 20)]
    pub max_seeds: usize,

    /// Monte Carlo repeats per seed-set size.
    #[arg(long, default_value_t = 50)]
    pub repeats: usize,

    /// Base RNG seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Graph to simulate on.
    #[command(subcommand)]
    pub graph: GraphSource,
}

/// Where the `sweep` graph comes from.
#[derive(Debug, Subcommand, Clone)]
pub enum GraphSource {
    /// Generate an Erdos-Renyi `G(n, p)` graph.
    Gnp(GnpArgs),
    /// Load a whitespace-separated edge list.
    Edges(EdgesArgs),
}

/// Erdos-Renyi generation arguments.
#[derive(Debug, Args, Clone)]
pub struct GnpArgs {
    /// Number of nodes.
    #[arg(long, default_value_t = 500)]
    pub nodes: usize,

    /// Independent edge probability.
    #[arg(long, default_value_t = 0.01)]
    pub probability: f64,

    /// RNG seed for graph generation (defaults to `--seed`).
    #[arg(long)]
    pub graph_seed: Option<u64>,
}

/// Edge-list loading arguments.
#[derive(Debug, Args, Clone)]
pub struct EdgesArgs {
    /// Path to a file with one `u v` pair per line.
    pub path: PathBuf,

    /// Node count; defaults to one more than the largest endpoint.
    #[arg(long)]
    pub nodes: Option<usize>,
}

/// Options accepted by the `grid` command.
#[derive(Debug, Args, Clone)]
pub struct GridCommand {
    /// Transmission probability; repeat for several.
    #[arg(long = "transmission")]
    pub transmissions: Vec<f64>,

    /// Seed-set size; repeat for several.
    #[arg(long = "seeds")]
    pub seed_counts: Vec<usize>,

    /// Graphs generated per configuration.
    #[arg(long, default_value_t = 20)]
    pub graphs: usize,

    /// Random seed draws per repeat.
    #[arg(long, default_value_t = 10)]
    pub draws: usize,

    /// Repeats per graph.
    #[arg(long, default_value_t = 50)]
    pub repeats: usize,

    /// Nodes per generated graph.
    #[arg(long, default_value_t = 500)]
    pub nodes: usize,

    /// Edge probability of generated graphs.
    #[arg(long, default_value_t = 0.01)]
    pub probability: f64,

    /// Base RNG seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading an already opened input failed.
    #[error("failed to read edge list: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An edge-list line could not be parsed.
    #[error("edge list line {line}: {reason}")]
    EdgeList {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// Simulation or graph construction failed.
    #[error(transparent)]
    Core(#[from] SimulationError),
}

/// Result of a CLI command, ready for rendering.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Curves from the `sweep` command.
    Sweep(ExperimentReport),
    /// Rows from the `grid` command.
    Grid(Vec<GridRow>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph or running the simulation
/// fails.
///
/// # Examples
/// ```
/// use cascadia_cli::cli::{Cli, CommandOutput, run_cli};
/// use clap::Parser;
///
/// let cli = Cli::try_parse_from([
///     "cascadia", "sweep", "--max-seeds", "2", "--repeats", "2",
///     "gnp", "--nodes", "30", "--probability", "0.1",
/// ])?;
/// let CommandOutput::Sweep(report) = run_cli(cli)? else {
///     unreachable!("sweep yields curves");
/// };
/// assert_eq!(report.curves().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    match cli.command {
        Command::Sweep(sweep) => {
            Span::current().record("command", field::display("sweep"));
            run_sweep(sweep).map(CommandOutput::Sweep)
        }
        Command::Grid(grid) => {
            Span::current().record("command", field::display("grid"));
            run_grid(grid).map(CommandOutput::Grid)
        }
    }
}

#[instrument(
    name = "cli.sweep",
    err,
    skip(command),
    fields(model = %command.model, source = field::Empty),
)]
pub(super) fn run_sweep(command: SweepCommand) -> Result<ExperimentReport, CliError> {
    let mut builder = ExperimentBuilder::new()
        .with_model(command.model)
        .with_transmission(command.transmission)
        .with_distribution(command.distribution)
        .with_max_seeds(command.max_seeds)
        .with_repeats(command.repeats)
        .with_seed(command.seed);
    if !command.strategies.is_empty() {
        builder = builder.with_strategies(command.strategies);
    }
    let experiment = builder.build()?;

    let span = Span::current();
    let graph = match command.graph {
        GraphSource::Gnp(args) => {
            span.record("source", field::display("gnp"));
            let mut rng = SmallRng::seed_from_u64(args.graph_seed.unwrap_or(command.seed));
            erdos_renyi(args.nodes, args.probability, &mut rng).map_err(SimulationError::from)?
        }
        GraphSource::Edges(args) => {
            span.record("source", field::display("edges"));
            load_edges(&args.path, args.nodes)?
        }
    };

    let report = experiment.run(&graph)?;
    info!(
        nodes = report.node_count(),
        average_degree = report.average_degree(),
        "sweep command completed"
    );
    Ok(report)
}

#[instrument(name = "cli.grid", err, skip(command))]
pub(super) fn run_grid(command: GridCommand) -> Result<Vec<GridRow>, CliError> {
    let transmissions = if command.transmissions.is_empty() {
        DEFAULT_TRANSMISSIONS.to_vec()
    } else {
        command.transmissions
    };
    let seed_counts = if command.seed_counts.is_empty() {
        DEFAULT_SEED_COUNTS.to_vec()
    } else {
        command.seed_counts
    };
    let rows = GridConfig::new()
        .with_transmissions(transmissions)
        .with_seed_counts(seed_counts)
        .with_graphs(command.graphs)
        .with_draws(command.draws)
        .with_repeats(command.repeats)
        .with_nodes(command.nodes)
        .with_edge_probability(command.probability)
        .with_seed(command.seed)
        .run()?;
    info!(rows = rows.len(), "grid command completed");
    Ok(rows)
}

#[instrument(name = "cli.load_edges", err, fields(path = %path.display()))]
pub(super) fn load_edges(path: &Path, nodes: Option<usize>) -> Result<Graph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_list(BufReader::new(file), nodes)
}

/// Renders `output` to `writer` as tab-separated text with a header row.
///
/// Sweep rows are `strategy, seed_size, cascade`. Grid rows are
/// `c, seed` followed by mean and standard deviation for random, degree and
/// eigenvector seeding, rounded to two decimals.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use cascadia_cli::cli::{CommandOutput, render_output};
/// use cascadia_core::{ExperimentBuilder, Graph, SeedStrategy};
///
/// let graph = Graph::new(3, vec![(0, 1), (1, 2)])?;
/// let report = ExperimentBuilder::new()
///     .with_transmission(1.0)
///     .with_strategies([SeedStrategy::Degree])
///     .with_max_seeds(1)
///     .with_repeats(1)
///     .build()?
///     .run(&graph)?;
/// let mut buffer = Vec::new();
/// render_output(&CommandOutput::Sweep(report), &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "strategy\tseed_size\tcascade\ndegree\t1\t1.000000\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Sweep(report) => {
            writeln!(writer, "strategy\tseed_size\tcascade")?;
            for (strategy, curve) in report.curves() {
                for point in curve {
                    writeln!(
                        writer,
                        "{strategy}\t{}\t{:.6}",
                        point.seed_size(),
                        point.cascade()
                    )?;
                }
            }
        }
        CommandOutput::Grid(rows) => {
            writeln!(
                writer,
                "c\tseed\trand_mean\trand_std\tdeg_mean\tdeg_std\teig_mean\teig_std"
            )?;
            for row in rows {
                let (random, degree, eigen) = (row.random(), row.degree(), row.eigen());
                writeln!(
                    writer,
                    "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    row.transmission(),
                    row.seeds(),
                    random.mean(),
                    random.std_dev(),
                    degree.mean(),
                    degree.std_dev(),
                    eigen.mean(),
                    eigen.std_dev(),
                )?;
            }
        }
    }
    Ok(())
}
