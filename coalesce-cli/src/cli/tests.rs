//! Unit tests for argument parsing, command execution and rendering.

use super::commands::run_command;
use super::test_helpers::{run_args, run_command_expecting_error};
use super::{Cli, CliError, Command, PAINT_LAYERS, Topology, render_summary, run_cli};

use clap::Parser;
use coalesce_core::{CmpError, GraphError};
use coalesce_test_support::tracing::recorded;
use rstest::rstest;
use tracing::Level;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn clap_parses_every_run_option() {
    let cli = Cli::try_parse_from([
        "coalesce",
        "run",
        "torus",
        "--width",
        "4",
        "--height",
        "5",
        "--probability",
        "0.3",
        "--seed",
        "9",
        "--site-limit",
        "100",
        "--top",
        "2",
        "--paint",
    ])
    .expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.topology, Topology::Torus);
    assert_eq!((run.width, run.height), (4, 5));
    assert!((run.probability - 0.3).abs() < f64::EPSILON);
    assert_eq!(run.seed, 9);
    assert_eq!(run.site_limit, Some(100));
    assert_eq!(run.top, 2);
    assert!(run.paint);
}

#[rstest]
fn clap_applies_defaults() {
    let cli = Cli::try_parse_from(["coalesce", "run", "box"]).expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.topology, Topology::Box);
    assert_eq!((run.width, run.height), (256, 256));
    assert!((run.probability - 0.12).abs() < f64::EPSILON);
    assert_eq!(run.seed, 0);
    assert_eq!(run.site_limit, None);
    assert_eq!(run.top, 3);
    assert!(!run.paint);
}

#[rstest]
#[case::unknown_topology(&["coalesce", "run", "hexagon"])]
#[case::missing_topology(&["coalesce", "run"])]
#[case::negative_width(&["coalesce", "run", "box", "--width", "-3"])]
fn clap_rejects_bad_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case::boxed(Topology::Box)]
#[case::torus(Topology::Torus)]
fn full_lattices_form_one_cluster(#[case] topology: Topology) -> TestResult {
    let mut args = run_args(topology, 6, 4);
    args.probability = 1.0;
    let summary = run_command(args)?;

    assert_eq!(summary.summary.graph_size, 24);
    assert_eq!(summary.summary.cluster_count, 1);
    assert!(summary.summary.master_cluster);
    assert_eq!(summary.top.len(), 1);
    assert_eq!(summary.top[0].size, 24);
    assert_eq!(summary.painted, None);
    Ok(())
}

#[rstest]
fn top_clusters_are_listed_largest_first() -> TestResult {
    let summary = run_command(run_args(Topology::Box, 20, 20))?;

    assert!(summary.top.len() <= 3);
    assert!(summary.top.iter().all(|cluster| cluster.weight >= 1.0));
    assert!(
        summary
            .top
            .windows(2)
            .all(|pair| pair[0].weight >= pair[1].weight)
    );
    if let Some(first) = summary.top.first() {
        assert_eq!(first.size, summary.summary.largest.size);
    }
    Ok(())
}

#[rstest]
fn paint_reports_layer_coverage() -> TestResult {
    let mut args = run_args(Topology::Torus, 4, 4);
    args.probability = 1.0;
    args.paint = true;
    let summary = run_command(args)?;

    // A single cluster: only the largest-cluster layers are painted.
    assert_eq!(summary.painted, Some([0, 16, 0, 0, 16]));
    Ok(())
}

#[rstest]
fn paint_covers_no_more_than_the_lattice() -> TestResult {
    let mut args = run_args(Topology::Box, 16, 16);
    args.paint = true;
    let summary = run_command(args)?;

    let painted = summary.painted.expect("painting was requested");
    assert_eq!(painted.len(), PAINT_LAYERS);
    assert!(painted.iter().all(|&count| count <= 256));
    assert_eq!(painted[1], summary.summary.largest.size);
    Ok(())
}

#[rstest]
fn site_limit_aborts_discovery() {
    let mut args = run_args(Topology::Torus, 10, 10);
    args.site_limit = Some(50);
    let err = run_command_expecting_error(args, "100 sites exceed the limit");
    assert!(matches!(
        err,
        CliError::Core(CmpError::SiteLimitExceeded { limit: 50 })
    ));
}

#[rstest]
fn zero_site_limit_is_rejected() {
    let mut args = run_args(Topology::Box, 3, 3);
    args.site_limit = Some(0);
    let err = run_command_expecting_error(args, "zero limit must be rejected");
    assert!(matches!(
        err,
        CliError::Core(CmpError::InvalidSiteLimit { got: 0 })
    ));
}

#[rstest]
#[case::bad_probability(3, 3, 1.5, "GRAPH_INVALID_PROBABILITY")]
#[case::empty_lattice(0, 3, 0.5, "GRAPH_INVALID_DIMENSIONS")]
fn lattice_errors_surface_with_codes(
    #[case] width: usize,
    #[case] height: usize,
    #[case] probability: f64,
    #[case] code: &str,
) {
    let mut args = run_args(Topology::Box, width, height);
    args.probability = probability;
    match run_command_expecting_error(args, "lattice must be rejected") {
        CliError::Graph(graph) => assert_eq!(graph.code().as_str(), code),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn graph_errors_keep_their_message() {
    let err = CliError::from(GraphError::InvalidDimensions {
        width: 0,
        height: 2,
    });
    assert_eq!(err.to_string(), "lattice dimensions must be positive (got 0x2)");
}

#[rstest]
fn render_summary_lists_header_statistics_and_clusters() -> TestResult {
    let mut args = run_args(Topology::Torus, 3, 3);
    args.probability = 1.0;
    args.paint = true;
    let summary = run_command(args)?;

    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let id = summary.top[0].id.get();

    assert!(text.starts_with("lattice: torus 3x3, p = 1, seed 7\nCMP\n"));
    assert!(text.contains("- graph size: 9\n"));
    assert!(text.contains("top clusters:\nid\tsize\tweight\theight\tchildren\tparents\n"));
    assert!(text.contains(&format!("{id}\t9\t9\t0\t0\t0\n")));
    assert!(text.ends_with("painted sites per layer:\n0\t0\n1\t9\n2\t0\n3\t0\n4\t9\n"));
    Ok(())
}

#[rstest]
fn run_emits_tracing_fields() -> TestResult {
    let cli = Cli {
        command: Command::Run(run_args(Topology::Torus, 4, 4)),
    };
    let (result, layer) = recorded(|| run_cli(cli));
    result?;

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.field("command"), Some("run"));
    let execute = layer.span("cli.execute").expect("cli.execute span must exist");
    assert_eq!(execute.field("topology"), Some("torus"));
    assert_eq!(execute.field("width"), Some("4"));
    assert_eq!(execute.field("seed"), Some("7"));
    assert!(layer.span("core.cmp").is_some());
    assert!(layer.has_event(Level::INFO, "command completed"));
    Ok(())
}

#[rstest]
fn failures_are_logged_at_error_level() {
    let mut args = run_args(Topology::Box, 2, 2);
    args.probability = -1.0;
    let cli = Cli {
        command: Command::Run(args),
    };
    let (result, layer) = recorded(|| run_cli(cli));
    assert!(result.is_err());
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR && event.field("error").is_some())
    );
}
