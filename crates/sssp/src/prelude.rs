pub use crate::dijkstra::dijkstra;
pub use crate::frontier::FrontierBucket;
pub use crate::partition::bucket_params;
pub use crate::partition::BucketParams;
pub use crate::pivots::identify_pivots;
pub use crate::solver::shortest_path;
pub use crate::solver::QueryState;
pub use crate::solver::SsspSolver;

pub use crate::Error;

pub use csr_graph::CsrGraph;
pub use csr_graph::Idx;
pub use csr_graph::Target;
