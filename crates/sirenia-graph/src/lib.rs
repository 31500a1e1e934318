#![forbid(unsafe_code)]

//! Diagram cell model consumed by `sirenia` layouts.
//!
//! The model is deliberately small: a containment tree of cells (root, layers, vertices, edges),
//! per-cell geometry, edge terminals and waypoints, and a batch-update scope. Anything a layout
//! needs beyond raw storage lives in [`query`].

mod error;
mod geometry;
mod model;
mod path;
pub mod query;

pub use error::{ModelError, Result};
pub use geometry::{Geometry, Point, Rect};
pub use model::{CellId, CellKind, Model};
pub use path::{CellPath, PATH_SEPARATOR, ParseCellPathError};
