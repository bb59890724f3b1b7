//! Coalescing mass process (CMP) clustering of weighted graphs.
//!
//! Every site of a graph carries an activation radius. Starting from
//! singletons, the lightest active cluster repeatedly explores the ball of its
//! own weight and merges with the first cluster able to reach back; clusters
//! that find nobody retire. The survivors are then linked into a hierarchy in
//! which a cluster is the parent of every cluster inside its activation ball.
//!
//! ```
//! use coalesce_core::{AdjacencyGraph, Cmp};
//!
//! // A star: centre 0 with four leaves, every radius 1.
//! let mut graph = AdjacencyGraph::uniform(5, 1.0)?;
//! for leaf in 1..5 {
//!     graph.add_edge(0, leaf)?;
//! }
//! let cmp = Cmp::compute(&graph, 0)?;
//! assert_eq!(cmp.cluster_count(), 1);
//! assert_eq!(cmp.largest().size(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cluster;
mod cmp;
mod engine;
mod error;
mod frontier;
mod graph;
mod hierarchy;
#[cfg(feature = "lattice")]
#[cfg_attr(docsrs, doc(cfg(feature = "lattice")))]
mod lattice;
mod merge;
mod ordering;
mod paint;
mod site;
mod stats;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(feature = "lattice")]
#[cfg_attr(docsrs, doc(cfg(feature = "lattice")))]
pub use crate::lattice::{BoxLattice, TorusLattice};
pub use crate::{
    builder::CmpBuilder,
    cluster::{Cluster, ClusterId, ClusterKind, ClusterSites},
    cmp::Cmp,
    engine::CmpEngine,
    error::{CmpError, CmpErrorCode, GraphError, GraphErrorCode, Result},
    graph::{AdjacencyGraph, WeightedGraph},
    paint::{ColourScale, Rgba, jet, jet_between},
    stats::{ClusterFilter, ClusterStats, CmpSummary},
};
