use bitvec::prelude::*;

use csr_graph::{CsrGraph, Idx, Target};

use crate::frontier::FrontierBucket;
use crate::Error;

/// Relaxes all outgoing edges of a settled node.
///
/// Whenever an edge improves the tentative distance of a pivot neighbor,
/// that neighbor's row is expanded once more on the spot (the `lookahead`
/// feature). The look-ahead is strictly one extra level; anything deeper
/// could place entries a full ring ahead of the frontier cursor and blow
/// up the frontier size.
///
/// Look-ahead only tightens upper bounds and never settles a node, so the
/// final distances are unchanged with the feature disabled.
pub(crate) fn relax_edges<NI: Idx>(
    graph: &CsrGraph<NI>,
    dist: &mut [f64],
    pivots: &BitSlice<usize>,
    frontier: &mut FrontierBucket<NI>,
    node: NI,
) -> Result<(), Error> {
    let base = dist[node.index()];

    for Target { target, weight } in graph.neighbors_with_weights(node) {
        let new_distance = base + weight;
        if new_distance < dist[target.index()] {
            dist[target.index()] = new_distance;
            frontier.insert(target, new_distance)?;

            if cfg!(feature = "lookahead") && pivots[target.index()] {
                expand_pivot(graph, dist, frontier, target, new_distance)?;
            }
        }
    }

    Ok(())
}

/// One-level hub expansion piggy-backed onto the relaxation of `pivot`.
fn expand_pivot<NI: Idx>(
    graph: &CsrGraph<NI>,
    dist: &mut [f64],
    frontier: &mut FrontierBucket<NI>,
    pivot: NI,
    pivot_distance: f64,
) -> Result<(), Error> {
    for Target { target, weight } in graph.neighbors_with_weights(pivot) {
        let new_distance = pivot_distance + weight;
        if new_distance < dist[target.index()] {
            dist[target.index()] = new_distance;
            frontier.insert(target, new_distance)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::partition::BucketParams;

    fn fixture() -> (CsrGraph<u32>, Vec<f64>, FrontierBucket<u32>) {
        // 0 -> 1 -> {2, 3}, node 1 is the hub
        let graph = CsrGraph::from_edges(
            4,
            [(0, 1, 1.0), (1, 2, 2.0), (1, 3, 3.0)],
        )
        .unwrap();
        let mut dist = vec![f64::INFINITY; 4];
        dist[0] = 0.0;
        let frontier = FrontierBucket::new(BucketParams {
            bucket_width: 1.0,
            num_buckets: 64,
        });
        (graph, dist, frontier)
    }

    #[test]
    fn improves_neighbors() {
        let (graph, mut dist, mut frontier) = fixture();
        let pivots = BitVec::repeat(false, 4);

        relax_edges(&graph, &mut dist, &pivots, &mut frontier, 0).unwrap();

        assert_eq!(dist[1], 1.0);
        assert_eq!(frontier.len(), 1);
        assert!(dist[2].is_infinite());
    }

    #[cfg(feature = "lookahead")]
    #[test]
    fn pivot_neighbors_are_expanded_one_level() {
        let (graph, mut dist, mut frontier) = fixture();
        let mut pivots = BitVec::repeat(false, 4);
        pivots.set(1, true);

        relax_edges(&graph, &mut dist, &pivots, &mut frontier, 0).unwrap();

        // 1 was improved and expanded, 2 and 3 got tentative distances
        assert_eq!(dist[1], 1.0);
        assert_eq!(dist[2], 3.0);
        assert_eq!(dist[3], 4.0);
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn does_not_worsen_settled_distances() {
        let (graph, mut dist, mut frontier) = fixture();
        let pivots = BitVec::repeat(false, 4);
        dist[1] = 0.5;

        relax_edges(&graph, &mut dist, &pivots, &mut frontier, 0).unwrap();

        assert_eq!(dist[1], 0.5);
        assert!(frontier.is_empty());
    }
}
