pub use crate::graph::CsrGraph;
pub use crate::graph::Target;

pub use crate::index::Idx;

pub use crate::Error;
