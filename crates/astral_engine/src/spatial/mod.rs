//! Spatial partitioning data structures
//!
//! Provides efficient spatial indexing for collision broad-phase and
//! proximity queries in 3D space.

mod octree;

pub use octree::{Extent, Octree, OctreeConfig, OctreeError};
