//! Single-source shortest paths over CSR graphs.
//!
//! The engine computes shortest-path distances on weighted graphs with
//! strictly positive edge weights. Instead of a heap it keeps the
//! frontier in a cyclic array of buckets indexed by quantized tentative
//! distance, in the spirit of Dial's implementation of Dijkstra's
//! algorithm [1] and of the bucket structure used by delta-stepping [2].
//! Because the bucket width never exceeds the minimum edge weight,
//! draining buckets in cursor order settles nodes in non-decreasing
//! distance order.
//!
//! Two twists on the textbook scheme:
//!
//! - High-degree nodes are marked as pivots up front. When a relaxation
//!   first improves a pivot, its neighbors are relaxed immediately one
//!   level deep, which tightens upper bounds early on hub-heavy graphs.
//! - Very sparse graphs (fewer than twice as many edges as nodes) skip
//!   the bucket machinery entirely and run on a classical binary-heap
//!   Dijkstra, see [`dijkstra()`].
//!
//! The module contains the per-graph preprocessing ([`bucket_params`],
//! [`identify_pivots`]), the frontier structure ([`FrontierBucket`]) and
//! the dispatching solver ([`SsspSolver`]):
//!
//! ```
//! use bucket_sssp::prelude::*;
//!
//! let graph: CsrGraph<u32> = CsrGraph::from_edges(
//!     3,
//!     [(0, 1, 1.0), (1, 2, 2.0)],
//! )
//! .unwrap();
//!
//! let solver = SsspSolver::new(graph).unwrap();
//! assert_eq!(solver.shortest_path(0).unwrap(), vec![0.0, 1.0, 3.0]);
//! assert_eq!(solver.shortest_path_to(0, 2).unwrap(), 3.0);
//! ```
//!
//! Queries are single-threaded and only read the installed graph, so one
//! solver can serve concurrent callers through a shared reference.
//!
//! [1] Robert B. Dial: "Algorithm 360: Shortest-path forest with
//! topological ordering", Communications of the ACM, 1969
//! [2] Ulrich Meyer, Peter Sanders: "Δ-stepping: a parallelizable
//! shortest path algorithm", Journal of Algorithms, 2003

pub mod dijkstra;
pub mod frontier;
pub mod partition;
pub mod pivots;
pub mod prelude;
mod relax;
pub mod solver;

pub use crate::dijkstra::dijkstra;
pub use crate::frontier::FrontierBucket;
pub use crate::partition::{bucket_params, BucketParams};
pub use crate::pivots::identify_pivots;
pub use crate::solver::{shortest_path, QueryState, SsspSolver, SPARSE_FALLBACK_FACTOR};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] csr_graph::Error),
    #[error("source node {node} is out of range for a graph with {node_count} nodes")]
    InvalidSource { node: usize, node_count: usize },
    #[error("target node {target} is out of range for a graph with {node_count} nodes")]
    InvalidTarget { target: usize, node_count: usize },
    #[error("invalid weight {weight}, edge weights must be positive and finite")]
    InvalidWeight { weight: f64 },
    #[error(
        "distance {distance} lies a full ring ahead of bucket cursor {cursor}, \
         the frontier needs more than {num_buckets} buckets"
    )]
    BucketOverflow {
        distance: f64,
        cursor: usize,
        num_buckets: usize,
    },
}
