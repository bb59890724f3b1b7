//! Command implementations and argument parsing for the `coalesce` binary.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use coalesce_core::{
    BoxLattice, ClusterFilter, ClusterId, Cmp, CmpBuilder, CmpEngine, CmpError, CmpSummary,
    ColourScale, GraphError, Rgba, TorusLattice, WeightedGraph,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_SIDE: usize = 256;
const DEFAULT_PROBABILITY: f64 = 0.12;
const DEFAULT_TOP: usize = 3;

/// Number of channels painted by `--paint`.
pub const PAINT_LAYERS: usize = 5;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "coalesce",
    about = "Compute the coalescing mass process of a random Z² lattice."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a lattice with Bernoulli radii, compute its CMP and print the
    /// statistics.
    Run(RunCommand),
}

/// Shape of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Topology {
    /// Rectangle with free boundaries.
    Box,
    /// Rectangle with both axes wrapped.
    Torus,
}

impl Topology {
    /// Lower-case name used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Torus => "torus",
        }
    }
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Lattice shape.
    #[arg(value_enum)]
    pub topology: Topology,

    /// Number of columns.
    #[arg(long, default_value_t = DEFAULT_SIDE)]
    pub width: usize,

    /// Number of rows.
    #[arg(long, default_value_t = DEFAULT_SIDE)]
    pub height: usize,

    /// Probability that a site has radius 1 instead of 0.
    #[arg(long, default_value_t = DEFAULT_PROBABILITY)]
    pub probability: f64,

    /// Seed of the radius generator.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Abort when the lattice has more sites than this.
    #[arg(long = "site-limit")]
    pub site_limit: Option<usize>,

    /// Number of non-trivial clusters to list, largest first.
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Paint the cluster, largest-cluster and stabiliser layers and report
    /// how many sites each layer covers.
    #[arg(long)]
    pub paint: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The lattice could not be built from the given options.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Configuring or computing the CMP failed.
    #[error(transparent)]
    Core(#[from] CmpError),
}

/// One listed cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterReport {
    /// Identifier of the cluster.
    pub id: ClusterId,
    /// Number of member sites.
    pub size: usize,
    /// Sum of the member radii.
    pub weight: f64,
    /// Height in the hierarchy.
    pub height: usize,
    /// Number of child clusters.
    pub children: usize,
    /// Number of parent clusters.
    pub parents: usize,
}

/// Outcome of the `run` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Lattice shape.
    pub topology: Topology,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Bernoulli parameter of the radii.
    pub probability: f64,
    /// Seed of the radius generator.
    pub seed: u64,
    /// Graph-level statistics.
    pub summary: CmpSummary,
    /// Largest non-trivial clusters, largest first.
    pub top: Vec<ClusterReport>,
    /// Painted sites per layer when `--paint` was given.
    pub painted: Option<[usize; PAINT_LAYERS]>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the lattice or the CMP cannot be built.
///
/// # Examples
/// ```
/// use coalesce_cli::cli::{Cli, Command, RunCommand, Topology, run_cli};
///
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         topology: Topology::Torus,
///         width: 8,
///         height: 8,
///         probability: 1.0,
///         seed: 1,
///         site_limit: None,
///         top: 1,
///         paint: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.summary.cluster_count, 1);
/// assert_eq!(summary.top[0].size, 64);
/// # Ok::<(), coalesce_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        topology = command.topology.as_str(),
        width = command.width,
        height = command.height,
        probability = command.probability,
        seed = command.seed,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let mut builder = CmpBuilder::new().with_paint_channels(PAINT_LAYERS);
    if let Some(limit) = command.site_limit {
        builder = builder.with_site_limit(limit);
    }
    let engine = builder.build()?;

    let RunCommand {
        topology,
        width,
        height,
        probability,
        seed,
        top,
        paint,
        ..
    } = command;
    let (summary, top, painted) = match topology {
        Topology::Box => {
            let lattice = BoxLattice::bernoulli(width, height, probability, seed)?;
            analyse(&engine, &lattice, top, paint)?
        }
        Topology::Torus => {
            let lattice = TorusLattice::bernoulli(width, height, probability, seed)?;
            analyse(&engine, &lattice, top, paint)?
        }
    };

    info!(
        clusters = summary.cluster_count,
        largest = summary.largest.size,
        absolute_height = summary.absolute_height,
        "command completed"
    );
    Ok(ExecutionSummary {
        topology,
        width,
        height,
        probability,
        seed,
        summary,
        top,
        painted,
    })
}

type Analysis = (CmpSummary, Vec<ClusterReport>, Option<[usize; PAINT_LAYERS]>);

fn analyse<G>(engine: &CmpEngine, lattice: &G, top: usize, paint: bool) -> Result<Analysis, CliError>
where
    G: WeightedGraph<Site = (usize, usize)>,
{
    let mut cmp = engine.run(lattice, (0, 0))?;
    let reports = cmp
        .clusters_down(ClusterFilter::ALL.skip_trivial())
        .take(top)
        .map(|cluster| ClusterReport {
            id: cluster.id(),
            size: cluster.size(),
            weight: cluster.weight(),
            height: cluster.height(),
            children: cluster.children().len(),
            parents: cluster.parents().len(),
        })
        .collect();
    let painted = if paint {
        Some(paint_layers(&mut cmp)?)
    } else {
        None
    };
    Ok((cmp.summary().clone(), reports, painted))
}

/// Paints the five demonstration layers and counts the sites each covers:
/// clusters by height, the largest cluster, translucent stabilisers, the top
/// stabilisers and the largest stabiliser.
#[instrument(name = "cli.paint", level = "debug", skip_all, err)]
fn paint_layers(cmp: &mut Cmp<(usize, usize)>) -> Result<[usize; PAINT_LAYERS], CmpError> {
    let red = Rgba::opaque(255, 0, 0);
    let shown = ClusterFilter::ALL.skip_trivial().skip_isolated().skip_largest();
    let ids = |cmp: &Cmp<(usize, usize)>| -> Vec<ClusterId> {
        cmp.clusters_up(shown).map(|cluster| cluster.id()).collect()
    };
    let largest = cmp.largest().id();

    for id in ids(&*cmp) {
        let colour = cmp.colour_for(id, ColourScale::Height)?;
        cmp.paint_cluster(id, colour, 0)?;
    }
    cmp.paint_cluster(largest, red, 1)?;
    for id in ids(&*cmp).into_iter().rev() {
        let colour = translucent(cmp.colour_for(id, ColourScale::Height)?, 51);
        cmp.paint_stabiliser(id, colour, true, 2)?;
    }
    let roots = usize::from(cmp.is_master_cluster());
    for id in ids(&*cmp) {
        let parents = cmp.cluster(id).map_or(0, |cluster| cluster.parents().len());
        if parents == roots {
            let colour = cmp.colour_for(id, ColourScale::Height)?;
            cmp.paint_stabiliser(id, colour, true, 3)?;
        }
    }
    cmp.paint_stabiliser(largest, red, true, 4)?;

    let mut covered = [0; PAINT_LAYERS];
    let sites: Vec<_> = cmp.clusters().flat_map(|cluster| cluster.sites()).collect();
    for site in sites {
        for (channel, count) in covered.iter_mut().enumerate() {
            if cmp.paint(site, channel)?.a > 0 {
                *count += 1;
            }
        }
    }
    Ok(covered)
}

/// Scales a premultiplied colour to the given opacity out of 255.
fn translucent(colour: Rgba, opacity: u8) -> Rgba {
    let scale = |component: u8| {
        let scaled = u16::from(component) * u16::from(opacity) / 255;
        u8::try_from(scaled).unwrap_or(u8::MAX)
    };
    Rgba::new(
        scale(colour.r),
        scale(colour.g),
        scale(colour.b),
        scale(colour.a),
    )
}

/// Renders `summary` to `writer` as a short text report.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use coalesce_cli::cli::{Cli, Command, RunCommand, Topology, render_summary, run_cli};
///
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         topology: Topology::Box,
///         width: 4,
///         height: 3,
///         probability: 0.0,
///         seed: 0,
///         site_limit: None,
///         top: 3,
///         paint: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.starts_with("lattice: box 4x3, p = 0, seed 0\n"));
/// assert!(text.contains("- graph size: 12\n"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "lattice: {} {}x{}, p = {}, seed {}",
        summary.topology.as_str(),
        summary.width,
        summary.height,
        summary.probability,
        summary.seed
    )?;
    write!(writer, "{}", summary.summary)?;
    if !summary.top.is_empty() {
        writeln!(writer, "top clusters:")?;
        writeln!(writer, "id\tsize\tweight\theight\tchildren\tparents")?;
    }
    for cluster in &summary.top {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            cluster.id.get(),
            cluster.size,
            cluster.weight,
            cluster.height,
            cluster.children,
            cluster.parents
        )?;
    }
    if let Some(painted) = &summary.painted {
        writeln!(writer, "painted sites per layer:")?;
        for (channel, count) in painted.iter().enumerate() {
            writeln!(writer, "{channel}\t{count}")?;
        }
    }
    Ok(())
}
