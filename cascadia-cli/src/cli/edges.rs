//! Whitespace-separated edge-list parsing.

use std::{collections::HashSet, io::BufRead};

use cascadia_core::{Graph, SimulationError};
use tracing::warn;

use super::CliError;

/// Largest node id accepted from an edge list.
pub const MAX_NODE_ID: usize = (1 << 26) - 1;

/// Parses `u v` pairs, one per line, into a [`Graph`].
///
/// Text after `#` is ignored, as are blank lines. Repeated edges (in either
/// orientation) are collapsed. Node ids above [`MAX_NODE_ID`] are rejected.
/// The node count is `nodes` when given, otherwise one more than the largest
/// endpoint.
///
/// # Errors
/// Returns [`CliError::EdgeList`] for malformed lines, [`CliError::Read`] when
/// the reader fails, and [`CliError::Core`] when the edges do not form a
/// simple graph over the node count.
///
/// # Examples
/// ```
/// use cascadia_cli::cli::parse_edge_list;
///
/// let input = "# triangle\n0 1\n1 2\n2 0\n1 0\n";
/// let graph = parse_edge_list(input.as_bytes(), None)?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// # Ok::<(), cascadia_cli::cli::CliError>(())
/// ```
pub fn parse_edge_list(reader: impl BufRead, nodes: Option<usize>) -> Result<Graph, CliError> {
    if let Some(count) = nodes
        && count > MAX_NODE_ID + 1
    {
        return Err(CliError::EdgeList {
            line: 0,
            reason: format!("node count {count} exceeds the limit of {}", MAX_NODE_ID + 1),
        });
    }
    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    let mut repeated = 0_usize;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CliError::Read { source })?;
        let line_number = idx + 1;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let (left, right) = parse_pair(content, line_number)?;
        if seen.insert((left.min(right), left.max(right))) {
            edges.push((left, right));
        } else {
            repeated += 1;
        }
    }
    if repeated > 0 {
        warn!(repeated, "collapsed repeated edges in edge list");
    }

    let node_count = match nodes {
        Some(count) => count,
        None => inferred_node_count(&edges)?,
    };
    Graph::new(node_count, edges)
        .map_err(SimulationError::from)
        .map_err(CliError::from)
}

fn inferred_node_count(edges: &[(usize, usize)]) -> Result<usize, CliError> {
    let Some(largest) = edges.iter().map(|&(left, right)| left.max(right)).max() else {
        return Ok(0);
    };
    largest.checked_add(1).ok_or_else(|| CliError::EdgeList {
        line: 0,
        reason: format!("node id {largest} leaves no room for a node count"),
    })
}

fn parse_pair(content: &str, line: usize) -> Result<(usize, usize), CliError> {
    let mut tokens = content.split_whitespace();
    let (Some(left), Some(right), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(CliError::EdgeList {
            line,
            reason: format!("expected two node ids, found `{content}`"),
        });
    };
    let parse = |token: &str| {
        let id = token.parse::<usize>().map_err(|err| CliError::EdgeList {
            line,
            reason: format!("invalid node id `{token}`: {err}"),
        })?;
        if id > MAX_NODE_ID {
            return Err(CliError::EdgeList {
                line,
                reason: format!("node id {id} exceeds the limit of {MAX_NODE_ID}"),
            });
        }
        Ok(id)
    };
    Ok((parse(left)?, parse(right)?))
}
