//! Force-directed layout for the GFRED dependency graph view.
//!
//! Given node ids and `owner -> dependency` edges, [`calculate_layout`]
//! returns a 2D position per node so that connected nodes cluster and
//! unconnected nodes push apart. The solver is deterministic: the same input
//! always yields the same positions.
//!
//! Rendering is the caller's concern. This crate only maps ids to points.
//!
//! # Example
//!
//! ```ignore
//! use gfred_layout::{LayoutConfig, calculate_layout};
//!
//! let nodes = ["object:alpha-1", "GTF Ulysses"];
//! let edges = [("object:alpha-1", "GTF Ulysses")];
//! let positions = calculate_layout(&nodes, &edges, &LayoutConfig::default());
//! assert_eq!(positions.len(), 2);
//! ```

mod bounds;
mod config;
mod error;
mod force;
mod position;

pub use bounds::LayoutBounds;
pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use force::{ForceDirectedLayout, LayoutState, calculate_layout};
pub use position::Position;
