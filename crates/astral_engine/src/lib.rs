//! # Astral Engine
//!
//! Spatial partitioning and collision core for a hobby 3D game engine.
//!
//! The crate deliberately covers only the parts of a game engine with real
//! algorithmic substance: an octree spatial index for broad-phase proximity
//! queries and stateless narrow-phase collision routines. Rendering, assets,
//! input, and scene management are the host application's business; the
//! engine only ever sees opaque object handles, positions, and shapes.
//!
//! ## Quick Start
//!
//! ```rust
//! use astral_engine::prelude::*;
//!
//! let mut octree = Octree::new(OctreeConfig::default()).unwrap();
//! octree.insert(1u32, Vec3::new(10.0, 0.0, 10.0), Extent::Sphere(1.0));
//!
//! let plane = CollisionShape::plane(
//!     Vec3::zeros(),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, 1.0),
//! );
//! let sphere = CollisionShape::sphere(1.0);
//!
//! let world_plane = plane.to_world(&Transform::identity());
//! let world_sphere = sphere.to_world(&Transform::from_position(Vec3::new(0.0, 0.5, 0.0)));
//!
//! assert!(contact_between(&world_sphere, &world_plane).is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            collections::{Handle, HandleMap},
            geometry::Aabb,
            math::{Transform, Vec3},
        },
        physics::collision::{
            contact_between, corrected_sphere_position, CollisionShape, Contact, WorldShape,
        },
        spatial::{Extent, Octree, OctreeConfig, OctreeError},
    };
}
