//! # Ledgerscope Graph
//!
//! The aggregated transaction flow graph and the graph algorithms the
//! detection pipeline runs over it:
//! - [`FlowGraph`]: string-interned directed multigraph, one aggregated
//!   edge per ordered (sender, receiver) pair
//! - Bounded simple directed cycle enumeration
//! - Connected components over induced subsets of the undirected projection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
pub mod cycles;
pub mod types;

pub use components::connected_components;
pub use cycles::simple_cycles_bounded;
pub use types::{EdgeStats, FlowGraph, NodeId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::components::connected_components;
    pub use crate::cycles::simple_cycles_bounded;
    pub use crate::types::{EdgeStats, FlowGraph, NodeId};
}
