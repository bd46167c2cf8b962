//! `cascadia` binary.
//!
//! Runs a `sweep` or `grid` experiment and prints its table to stdout.
//! Diagnostics go to stderr through `tracing`; a failed run logs the stable
//! error code of the core failure and exits non-zero.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use cascadia_core::{GraphErrorCode, SimulationErrorCode};
use clap::Parser;
use tracing::{error, field};

use cascadia_cli::{
    cli::{Cli, CliError, Command, render_output, run_cli},
    logging::{self, LoggingError},
};

fn command_name(cli: &Cli) -> &'static str {
    match cli.command {
        Command::Sweep(_) => "sweep",
        Command::Grid(_) => "grid",
    }
}

fn execute(cli: Cli) -> Result<()> {
    let name = command_name(&cli);
    let output = run_cli(cli).with_context(|| format!("`{name}` failed"))?;
    let mut table = BufWriter::new(io::stdout().lock());
    render_output(&output, &mut table)
        .and_then(|()| table.flush())
        .with_context(|| format!("failed to write `{name}` results"))
}

/// Stable codes of the core failure behind `err`, if there is one.
fn failure_codes(err: &anyhow::Error) -> (Option<SimulationErrorCode>, Option<GraphErrorCode>) {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (Some(core.code()), core.graph_code()),
        _ => (None, None),
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = execute(Cli::parse()) else {
        return ExitCode::SUCCESS;
    };
    let (code, graph_code) = failure_codes(&err);
    error!(
        error = format!("{err:#}"),
        code = code.map(|code| field::display(code.as_str())),
        graph_code = graph_code.map(|code| field::display(code.as_str())),
        "cascadia run failed"
    );
    ExitCode::FAILURE
}

#[expect(
    clippy::print_stderr,
    reason = "Logging is unavailable when its own initialisation fails"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("cascadia: cannot initialise logging: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascadia_core::{GraphError, SimulationError};
    use rstest::rstest;

    #[rstest]
    fn failure_codes_see_through_context() {
        let core = SimulationError::from(GraphError::SelfLoop { node: 3 });
        let err = anyhow::Error::new(CliError::Core(core)).context("`sweep` failed");
        let (code, graph_code) = failure_codes(&err);
        assert_eq!(code.map(SimulationErrorCode::as_str), Some("SIMULATION_GRAPH_FAILURE"));
        assert_eq!(graph_code.map(GraphErrorCode::as_str), Some("GRAPH_SELF_LOOP"));
    }

    #[rstest]
    fn non_core_failures_carry_no_codes() {
        let err = anyhow::Error::new(CliError::EdgeList {
            line: 2,
            reason: "expected two node ids".to_owned(),
        });
        assert_eq!(failure_codes(&err), (None, None));
    }

    #[rstest]
    #[case(&["cascadia", "sweep", "gnp"], "sweep")]
    #[case(&["cascadia", "grid"], "grid")]
    fn names_the_parsed_command(#[case] args: &[&str], #[case] expected: &str) {
        let cli = Cli::try_parse_from(args).expect("arguments must parse");
        assert_eq!(command_name(&cli), expected);
    }
}
