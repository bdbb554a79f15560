//! Physics module for collision detection and response
//!
//! Provides narrow-phase collision detection for primitive shape pairs and
//! geometric position correction. Broad-phase candidate pruning lives in
//! [`crate::spatial`]; the owning scene composes the two.

pub mod collision;

pub use collision::{
    contact_between, corrected_sphere_position, BoundingSphere, CollisionShape, Contact, Plane,
    Ray, WorldShape,
};
