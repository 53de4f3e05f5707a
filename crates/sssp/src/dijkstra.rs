use bitvec::prelude::*;
use float_ord::FloatOrd;

use csr_graph::{CsrGraph, Idx, Target};

use crate::solver::QueryState;

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Binary-heap Dijkstra with lazy deletion.
///
/// This is the operational mode for near-tree graphs, where setting up the
/// bucket frontier costs more than it saves, and it doubles as the
/// reference implementation in the equivalence tests. Outdated heap
/// entries are discarded through the `settled` bitset when they surface.
pub fn dijkstra<NI: Idx>(
    graph: &CsrGraph<NI>,
    dist: &mut [f64],
    settled: &mut BitSlice<usize>,
    source: NI,
    target: Option<NI>,
) -> QueryState {
    let mut queue = BinaryHeap::new();
    queue.push(Reverse((FloatOrd(dist[source.index()]), source)));

    while let Some(Reverse((FloatOrd(distance), node))) = queue.pop() {
        if settled.replace(node.index(), true) {
            continue;
        }
        if target == Some(node) {
            return QueryState::EarlyTerminated;
        }

        for Target { target: next, weight } in graph.neighbors_with_weights(node) {
            let new_distance = distance + weight;
            if new_distance < dist[next.index()] {
                dist[next.index()] = new_distance;
                queue.push(Reverse((FloatOrd(new_distance), next)));
            }
        }
    }

    QueryState::Completed
}
