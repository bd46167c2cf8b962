//! Command-line interface for cascade experiments.
//!
//! `sweep` compares seeding strategies on one graph, either generated as
//! `G(n, p)` or loaded from an edge-list file. `grid` compares them for SIR
//! over many generated graphs and a grid of transmission values and seed
//! counts.

mod commands;
mod edges;

pub use commands::{
    Cli, CliError, Command, CommandOutput, EdgesArgs, GnpArgs, GraphSource, GridCommand,
    SweepCommand, render_output, run_cli,
};
pub use edges::{MAX_NODE_ID, parse_edge_list};
