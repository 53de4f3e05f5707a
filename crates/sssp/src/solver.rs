use bitvec::prelude::*;
use log::info;
use num_format::{Locale, ToFormattedString};

use csr_graph::{CsrGraph, Idx};

use std::time::Instant;

use crate::dijkstra::dijkstra;
use crate::frontier::FrontierBucket;
use crate::partition::{bucket_params, BucketParams};
use crate::pivots::identify_pivots;
use crate::relax::relax_edges;
use crate::Error;

/// Graphs with fewer than `SPARSE_FALLBACK_FACTOR * node_count` edges are
/// solved with the binary-heap fallback. Such graphs tend to be near-trees
/// where the bucket setup cost dominates the useful work. Mis-tuning this
/// constant affects performance only, never correctness.
pub const SPARSE_FALLBACK_FACTOR: usize = 2;

/// Lifecycle of a single query.
///
/// A query starts `Ready`, turns `Running` on the first frontier pop and
/// finishes either `Completed` (frontier exhausted) or `EarlyTerminated`
/// (target settled). [`SsspSolver::search`] reports the terminal state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryState {
    Ready,
    Running,
    Completed,
    EarlyTerminated,
}

enum Mode {
    /// Binary-heap Dijkstra for very sparse inputs.
    Heap,
    /// Bucketed frontier with cached partition parameters and pivot mask.
    Bucket {
        params: BucketParams,
        pivots: BitVec<usize>,
    },
}

/// Single-source shortest-path engine over an installed CSR graph.
///
/// Installing a graph derives the operational mode once: very sparse
/// inputs run on the heap fallback, everything else on the bucketed
/// frontier with the partition parameters and pivot mask computed up
/// front. Queries never mutate the installed graph, so a solver can serve
/// any number of them in sequence; each query owns its distance vector,
/// settled bitset and frontier.
pub struct SsspSolver<NI: Idx> {
    graph: CsrGraph<NI>,
    mode: Mode,
}

impl<NI: Idx> SsspSolver<NI> {
    pub fn new(graph: CsrGraph<NI>) -> Result<Self, Error> {
        let start = Instant::now();

        let node_count = graph.node_count().index();
        let edge_count = graph.edge_count().index();

        let mode = if edge_count < SPARSE_FALLBACK_FACTOR * node_count {
            Mode::Heap
        } else {
            Mode::Bucket {
                params: bucket_params(graph.weights())?,
                pivots: identify_pivots(&graph),
            }
        };

        info!(
            "Installed graph with {} nodes and {} edges ({} mode) in {:?}",
            node_count.to_formatted_string(&Locale::en),
            edge_count.to_formatted_string(&Locale::en),
            match mode {
                Mode::Heap => "heap-fallback",
                Mode::Bucket { .. } => "bucket",
            },
            start.elapsed()
        );

        Ok(Self { graph, mode })
    }

    /// Replaces the installed graph and re-derives the operational mode.
    pub fn set_graph(&mut self, graph: CsrGraph<NI>) -> Result<(), Error> {
        *self = Self::new(graph)?;
        Ok(())
    }

    pub fn graph(&self) -> &CsrGraph<NI> {
        &self.graph
    }

    /// True iff queries run on the binary-heap fallback.
    pub fn is_sparse_fallback(&self) -> bool {
        matches!(self.mode, Mode::Heap)
    }

    /// Computes shortest-path distances from `source` to every node.
    ///
    /// Unreachable nodes report `f64::INFINITY`.
    pub fn shortest_path(&self, source: NI) -> Result<Vec<f64>, Error> {
        let (dist, _) = self.search(source, None)?;
        Ok(dist)
    }

    /// Computes the shortest-path distance from `source` to `target`,
    /// settling as few nodes as possible.
    pub fn shortest_path_to(&self, source: NI, target: NI) -> Result<f64, Error> {
        let (dist, _) = self.search(source, Some(target))?;
        Ok(dist[target.index()])
    }

    /// Runs a query and returns the distance vector together with the
    /// terminal [`QueryState`].
    pub fn search(
        &self,
        source: NI,
        target: Option<NI>,
    ) -> Result<(Vec<f64>, QueryState), Error> {
        let node_count = self.graph.node_count().index();

        if source.index() >= node_count {
            return Err(Error::InvalidSource {
                node: source.index(),
                node_count,
            });
        }
        if let Some(target) = target {
            if target.index() >= node_count {
                return Err(Error::InvalidTarget {
                    target: target.index(),
                    node_count,
                });
            }
        }

        let start = Instant::now();

        let mut dist = vec![f64::INFINITY; node_count];
        dist[source.index()] = 0.0;
        let mut settled = BitVec::repeat(false, node_count);

        let state = match &self.mode {
            Mode::Heap => dijkstra(&self.graph, &mut dist, &mut settled, source, target),
            Mode::Bucket { params, pivots } => self.bucket_search(
                *params,
                pivots,
                &mut dist,
                &mut settled,
                source,
                target,
            )?,
        };

        info!(
            "Query from {:?} finished as {:?} with {} settled nodes in {:?}",
            source,
            state,
            settled.count_ones().to_formatted_string(&Locale::en),
            start.elapsed()
        );

        Ok((dist, state))
    }

    /// The bucket-mode main loop.
    ///
    /// Nodes surface from the frontier in non-decreasing distance order;
    /// entries whose node was already settled are skipped. Once a node is
    /// settled its distance is final, which makes breaking on the target
    /// sound.
    fn bucket_search(
        &self,
        params: BucketParams,
        pivots: &BitSlice<usize>,
        dist: &mut [f64],
        settled: &mut BitSlice<usize>,
        source: NI,
        target: Option<NI>,
    ) -> Result<QueryState, Error> {
        let mut frontier = FrontierBucket::new(params);
        frontier.insert(source, 0.0)?;

        while let Some(node) = frontier.pop_min() {
            if settled.replace(node.index(), true) {
                continue;
            }
            if target == Some(node) {
                return Ok(QueryState::EarlyTerminated);
            }

            relax_edges(&self.graph, dist, pivots, &mut frontier, node)?;
        }

        Ok(QueryState::Completed)
    }
}

/// Convenience entry point for one-shot queries.
///
/// Builds a solver, runs a single full search and returns the distance
/// vector. Callers issuing repeated queries should hold on to an
/// [`SsspSolver`] instead to reuse the per-graph preprocessing.
pub fn shortest_path<NI: Idx>(graph: CsrGraph<NI>, source: NI) -> Result<Vec<f64>, Error> {
    SsspSolver::new(graph)?.shortest_path(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_mode_matches_fixed_expectation() {
        // m = 14 >= 2n = 12
        let graph: CsrGraph<u32> = CsrGraph::from_edges_undirected(
            6,
            [
                (0, 1, 4.0),
                (0, 2, 2.0),
                (1, 2, 5.0),
                (1, 3, 10.0),
                (2, 4, 3.0),
                (3, 5, 11.0),
                (4, 3, 4.0),
            ],
        )
        .unwrap();
        let solver = SsspSolver::new(graph).unwrap();

        assert!(!solver.is_sparse_fallback());
        assert_eq!(
            solver.shortest_path(0).unwrap(),
            vec![0.0, 4.0, 2.0, 9.0, 5.0, 20.0]
        );
    }

    #[test]
    fn replacing_the_graph_rederives_the_mode() {
        let chain: CsrGraph<u32> = CsrGraph::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        let mut solver = SsspSolver::new(chain).unwrap();
        assert!(solver.is_sparse_fallback());

        let dense: CsrGraph<u32> = CsrGraph::from_edges_undirected(
            3,
            [(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)],
        )
        .unwrap();
        solver.set_graph(dense).unwrap();
        assert!(!solver.is_sparse_fallback());
    }

    #[test]
    fn source_and_target_are_validated() {
        let graph: CsrGraph<u32> = CsrGraph::from_edges(2, [(0, 1, 1.0)]).unwrap();
        let solver = SsspSolver::new(graph).unwrap();

        assert!(matches!(
            solver.shortest_path(9),
            Err(Error::InvalidSource {
                node: 9,
                node_count: 2
            })
        ));
        assert!(matches!(
            solver.shortest_path_to(0, 9),
            Err(Error::InvalidTarget {
                target: 9,
                node_count: 2
            })
        ));
    }

    #[test]
    fn free_function_entry_point() {
        let graph: CsrGraph<u32> = CsrGraph::from_edges(3, [(0, 1, 1.0), (1, 2, 2.0)]).unwrap();

        assert_eq!(shortest_path(graph, 0).unwrap(), vec![0.0, 1.0, 3.0]);
    }
}
