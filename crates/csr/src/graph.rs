use log::info;
use rayon::prelude::*;

use std::time::Instant;

use crate::index::Idx;
use crate::Error;

/// A Compressed-Sparse-Row data structure to represent weighted sparse
/// graphs.
///
/// The structure is composed of three arrays: `offsets`, `targets` and
/// `weights`. For a graph with node count `n` and edge count `m`, `offsets`
/// has exactly `n + 1`, `targets` and `weights` exactly `m` entries.
///
/// For a given node `u`, `offsets[u]` stores the start index of the
/// neighbor list of `u` in `targets`. The degree of `u`, i.e., the length
/// of the neighbor list, is defined by `offsets[u + 1] - offsets[u]`. The
/// neighbor list of `u` is the slice `&targets[offsets[u]..offsets[u + 1]]`
/// with the corresponding edge weights at the same positions in `weights`.
///
/// All edges are directed and all weights are strictly positive and
/// finite. Undirected inputs are represented by storing both arcs, see
/// [`CsrGraph::from_edges_undirected`].
#[derive(Debug, Clone)]
pub struct CsrGraph<NI: Idx> {
    offsets: Box<[NI]>,
    targets: Box<[NI]>,
    weights: Box<[f64]>,
}

/// Represents the target of an edge and the weight of the connecting edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target<NI> {
    pub target: NI,
    pub weight: f64,
}

impl<NI> Target<NI> {
    pub fn new(target: NI, weight: f64) -> Self {
        Self { target, weight }
    }
}

impl<NI: Idx> CsrGraph<NI> {
    /// Adopts caller-supplied CSR arrays after validating them.
    ///
    /// Expects `offsets` to be non-decreasing with `offsets[0] == 0` and
    /// `offsets[n] == targets.len()`, all targets to be valid node ids and
    /// all weights to be strictly positive and finite. The graph is
    /// read-only once created; validation failures leave no state behind.
    pub fn from_parts(
        offsets: Vec<NI>,
        targets: Vec<NI>,
        weights: Vec<f64>,
    ) -> Result<Self, Error> {
        let start = Instant::now();

        if offsets.len() < 2 {
            return Err(Error::InvalidGraph(
                "graph requires at least one node, offsets must have at least two entries".into(),
            ));
        }

        let node_count = offsets.len() - 1;
        let edge_count = targets.len();

        if weights.len() != edge_count {
            return Err(Error::InvalidGraph(format!(
                "weight count {} does not match target count {}",
                weights.len(),
                edge_count,
            )));
        }
        if offsets[0].index() != 0 {
            return Err(Error::InvalidGraph(format!(
                "offsets must start at 0, found {}",
                offsets[0].index(),
            )));
        }
        if offsets[node_count].index() != edge_count {
            return Err(Error::InvalidGraph(format!(
                "offsets must end at the edge count {}, found {}",
                edge_count,
                offsets[node_count].index(),
            )));
        }
        if !offsets.par_windows(2).all(|w| w[0] <= w[1]) {
            return Err(Error::InvalidGraph(
                "offsets must be non-decreasing".into(),
            ));
        }
        if let Some((edge, target)) = targets
            .par_iter()
            .enumerate()
            .find_first(|(_, t)| t.index() >= node_count)
        {
            return Err(Error::InvalidGraph(format!(
                "target {:?} at edge {edge} is out of range for {node_count} nodes",
                target,
            )));
        }
        if let Some((edge, &weight)) = weights
            .par_iter()
            .enumerate()
            .find_first(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(Error::InvalidWeight { edge, weight });
        }

        info!(
            "Validated CSR graph with {node_count} nodes and {edge_count} edges in {:?}",
            start.elapsed()
        );

        Ok(Self {
            offsets: offsets.into_boxed_slice(),
            targets: targets.into_boxed_slice(),
            weights: weights.into_boxed_slice(),
        })
    }

    /// Builds a directed graph from `(source, target, weight)` triples.
    ///
    /// Edges are grouped by source node with a counting sort; the relative
    /// order of parallel edges is preserved.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (NI, NI, f64)>,
    {
        let edges = edges.into_iter().collect::<Vec<_>>();
        let edge_count = edges.len();

        if node_count == 0 {
            return Err(Error::InvalidGraph(
                "graph requires at least one node".into(),
            ));
        }

        let mut degrees = vec![0_usize; node_count];
        for &(source, _, _) in &edges {
            if source.index() >= node_count {
                return Err(Error::InvalidGraph(format!(
                    "source {:?} is out of range for {node_count} nodes",
                    source,
                )));
            }
            degrees[source.index()] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut total = 0_usize;
        offsets.push(NI::new(0));
        for degree in &degrees {
            total += degree;
            offsets.push(NI::new(total));
        }

        let mut cursors = offsets[..node_count]
            .iter()
            .map(|offset| offset.index())
            .collect::<Vec<_>>();
        let mut targets = vec![NI::new(0); edge_count];
        let mut weights = vec![0.0_f64; edge_count];

        for (source, target, weight) in edges {
            let at = cursors[source.index()];
            targets[at] = target;
            weights[at] = weight;
            cursors[source.index()] += 1;
        }

        Self::from_parts(offsets, targets, weights)
    }

    /// Builds an undirected graph by inserting both arcs for every
    /// `(source, target, weight)` triple.
    pub fn from_edges_undirected<I>(node_count: usize, edges: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (NI, NI, f64)>,
    {
        let both = edges
            .into_iter()
            .flat_map(|(u, v, w)| [(u, v, w), (v, u, w)])
            .collect::<Vec<_>>();
        Self::from_edges(node_count, both)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> NI {
        NI::new(self.offsets.len() - 1)
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> NI {
        NI::new(self.targets.len())
    }

    /// Returns the number of edges where the given node is the source node.
    pub fn degree(&self, node: NI) -> usize {
        let (start, end) = self.row_bounds(node);
        end - start
    }

    /// Returns the neighbor list of the given node.
    pub fn neighbors(&self, node: NI) -> &[NI] {
        let (start, end) = self.row_bounds(node);
        &self.targets[start..end]
    }

    /// Returns an iterator over the neighbors of the given node including
    /// the weight of the connecting edge.
    pub fn neighbors_with_weights(
        &self,
        node: NI,
    ) -> impl Iterator<Item = Target<NI>> + '_ {
        let (start, end) = self.row_bounds(node);
        self.targets[start..end]
            .iter()
            .zip(&self.weights[start..end])
            .map(|(&target, &weight)| Target::new(target, weight))
    }

    /// Returns all edge weights in CSR order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    fn row_bounds(&self, node: NI) -> (usize, usize) {
        let start = self.offsets[node.index()].index();
        let end = self.offsets[node.index() + 1].index();
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CsrGraph<u32> {
        CsrGraph::from_edges(3, [(0, 1, 1.0), (0, 2, 4.0), (1, 2, 2.0)]).unwrap()
    }

    #[test]
    fn counts_and_degrees() {
        let graph = triangle();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(1), 1);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn neighbor_lists() {
        let graph = triangle();

        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(
            graph.neighbors_with_weights(1).collect::<Vec<_>>(),
            vec![Target::new(2, 2.0)]
        );
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn undirected_inserts_both_arcs() {
        let graph: CsrGraph<u32> =
            CsrGraph::from_edges_undirected(3, [(0, 1, 1.0), (1, 2, 2.0)]).unwrap();

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.neighbors(1), &[0, 2]);
    }

    #[test]
    fn from_parts_accepts_valid_input() {
        let graph: CsrGraph<u32> =
            CsrGraph::from_parts(vec![0, 2, 3, 3], vec![1, 2, 2], vec![1.0, 4.0, 2.0]).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.neighbors(0), &[1, 2]);
    }

    #[test]
    fn rejects_empty_offsets() {
        let res = CsrGraph::<u32>::from_parts(vec![0], vec![], vec![]);
        assert!(matches!(res, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn rejects_non_monotone_offsets() {
        let res = CsrGraph::<u32>::from_parts(vec![0, 2, 1, 3], vec![1, 2, 2], vec![1.0; 3]);
        assert!(matches!(res, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn rejects_offsets_not_ending_at_edge_count() {
        let res = CsrGraph::<u32>::from_parts(vec![0, 1, 2, 4], vec![1, 2, 2], vec![1.0; 3]);
        assert!(matches!(res, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn rejects_out_of_range_target() {
        let res = CsrGraph::<u32>::from_parts(vec![0, 1, 1, 1], vec![7], vec![1.0]);
        assert!(matches!(res, Err(Error::InvalidGraph(_))));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let res = CsrGraph::<u32>::from_edges(2, [(0, 1, 0.0)]);
        assert!(matches!(
            res,
            Err(Error::InvalidWeight { edge: 0, weight: w }) if w == 0.0
        ));

        let res = CsrGraph::<u32>::from_edges(2, [(0, 1, f64::NAN)]);
        assert!(matches!(res, Err(Error::InvalidWeight { .. })));

        let res = CsrGraph::<u32>::from_edges(2, [(0, 1, f64::INFINITY)]);
        assert!(matches!(res, Err(Error::InvalidWeight { .. })));
    }

    #[test]
    fn rejects_out_of_range_source() {
        let res = CsrGraph::<u32>::from_edges(2, [(5, 1, 1.0)]);
        assert!(matches!(res, Err(Error::InvalidGraph(_))));
    }
}
