//! Random graph generators used to feed simulations.

use rand::Rng;
use rand_distr::{Distribution, Geometric};

use crate::{error::GraphError, graph::Graph};

/// Generates an Erdos-Renyi `G(n, p)` graph.
///
/// Every unordered pair `(i, j)` with `i < j` is included independently with
/// probability `p`. Rather than flipping a coin per pair, the generator jumps
/// between included pairs with geometrically distributed skips, so the cost
/// is proportional to `n` plus the number of edges. Pairs are walked in a
/// fixed order (by larger endpoint, then smaller), so a seeded RNG always
/// produces the same graph.
///
/// # Errors
/// Returns [`GraphError::InvalidEdgeProbability`] when `p` is not a finite
/// value in `[0, 1]`.
///
/// # Examples
/// ```
/// use cascadia_core::erdos_renyi;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let complete = erdos_renyi(5, 1.0, &mut rng)?;
/// assert_eq!(complete.edge_count(), 10);
/// let empty = erdos_renyi(5, 0.0, &mut rng)?;
/// assert_eq!(empty.edge_count(), 0);
/// # Ok::<(), cascadia_core::GraphError>(())
/// ```
pub fn erdos_renyi<R: Rng + ?Sized>(
    node_count: usize,
    edge_probability: f64,
    rng: &mut R,
) -> Result<Graph, GraphError> {
    if !edge_probability.is_finite() || !(0.0..=1.0).contains(&edge_probability) {
        return Err(GraphError::InvalidEdgeProbability {
            got: edge_probability,
        });
    }
    if edge_probability == 0.0 {
        return Ok(Graph::empty(node_count));
    }
    if edge_probability == 1.0 {
        let edges = (1..node_count)
            .flat_map(|right| (0..right).map(move |left| (left, right)))
            .collect();
        return Ok(Graph::from_canonical_edges(node_count, edges));
    }

    let skips = Geometric::new(edge_probability).map_err(|_| {
        GraphError::InvalidEdgeProbability {
            got: edge_probability,
        }
    })?;
    Ok(Graph::from_canonical_edges(
        node_count,
        skip_sample_pairs(node_count, &skips, rng),
    ))
}

/// Walks the pairs `(left, right)`, `left < right`, row by row and keeps the
/// pair reached after each geometric skip.
fn skip_sample_pairs<R: Rng + ?Sized>(
    node_count: usize,
    skips: &Geometric,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    let mut right = 1_usize;
    // Offset of the next included pair within row `right`.
    let mut offset = skips.sample(rng);
    loop {
        while right < node_count && offset >= right as u64 {
            offset -= right as u64;
            right += 1;
        }
        if right >= node_count {
            break;
        }
        let left = usize::try_from(offset).unwrap_or(right);
        edges.push((left, right));
        offset = offset.saturating_add(1).saturating_add(skips.sample(rng));
    }
    edges
}
