//! Compressed-Sparse-Row storage for weighted sparse graphs.
//!
//! The crate provides the read-only graph container consumed by
//! shortest-path computations. A graph is described by the classic CSR
//! triple `(offsets, targets, weights)` and can either be adopted from
//! caller-supplied arrays or built from a list of edges:
//!
//! ```
//! use csr_graph::prelude::*;
//!
//! let graph: CsrGraph<u32> = CsrGraph::from_edges(
//!     3,
//!     [(0, 1, 1.0), (0, 2, 4.0), (1, 2, 2.0)],
//! )
//! .unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 3);
//! assert_eq!(graph.degree(0), 2);
//! assert_eq!(graph.neighbors(0), &[1, 2]);
//! ```
//!
//! All edges are directed; undirected graphs are stored with one arc per
//! direction. Edge weights must be strictly positive and finite, which is
//! validated on construction. Once created, a graph is immutable and can
//! be shared freely between concurrent readers.

pub mod graph;
pub mod index;
pub mod prelude;

pub use crate::graph::CsrGraph;
pub use crate::graph::Target;
pub use crate::index::Idx;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("invalid weight {weight} at edge {edge}, edge weights must be positive and finite")]
    InvalidWeight { edge: usize, weight: f64 },
}
