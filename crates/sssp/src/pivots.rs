use bitvec::prelude::*;
use rayon::prelude::*;

use csr_graph::{CsrGraph, Idx};

/// Degree percentile above which a node counts as a pivot (inclusive).
const PIVOT_PERCENTILE: f64 = 0.99;

/// Marks high-degree nodes as pivots.
///
/// In scale-free graphs the small set of hubs funnels most shortest
/// paths. The relaxer expands pivots one hop further as soon as they are
/// first reached, which tightens tentative distances early and cuts down
/// on frontier churn.
///
/// The threshold is the 99th percentile of the degree distribution,
/// computed by sorting the degrees and indexing `floor(0.99 * (n - 1))`,
/// which keeps tie-breaking deterministic.
pub fn identify_pivots<NI: Idx>(graph: &CsrGraph<NI>) -> BitVec<usize> {
    let node_count = graph.node_count().index();

    let degrees = (0..node_count)
        .into_par_iter()
        .map(|node| graph.degree(NI::new(node)))
        .collect::<Vec<_>>();

    let mut sorted = degrees.clone();
    sorted.par_sort_unstable();
    let threshold = sorted[(PIVOT_PERCENTILE * (node_count - 1) as f64).floor() as usize];

    let mut pivots = BitVec::repeat(false, node_count);
    for (node, &degree) in degrees.iter().enumerate() {
        if degree >= threshold {
            pivots.set(node, true);
        }
    }

    pivots
}
