#![forbid(unsafe_code)]

//! Diagram layout core.
//!
//! Two independent algorithms over the [`graph`] cell model:
//! - [`cycle_remover`]: turns a [`hierarchy::HierarchyModel`] into a DAG by inverting the edges
//!   that close a cycle during a depth-first walk. First stage of a layered layout.
//! - [`tree`]: compact (Moen) tree layout with optional container resizing and jetty edge
//!   routing.

pub use sirenia_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cycle_remover;
mod error;
pub mod hierarchy;
pub mod options;
pub mod tree;

pub use cycle_remover::CycleRemoval;
pub use error::{Error, Result};
pub use hierarchy::{EdgeId, HierarchyEdge, HierarchyModel, HierarchyVertex, VertexId};
pub use options::{CompactTreeOptions, Orientation};
pub use tree::{CompactTreeLayout, LayoutTree, NodeId, TreeNode};
