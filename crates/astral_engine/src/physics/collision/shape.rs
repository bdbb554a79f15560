//! High-level collision shape abstractions
//!
//! Shapes are stored in MODEL SPACE and expressed in world space on demand
//! during collision tests. The engine never stores transforms; the owning
//! object model supplies one per query.

use super::primitives::{BoundingSphere, Plane, Ray, EPSILON};
use crate::foundation::geometry::Aabb;
use crate::foundation::math::{Transform, Vec3};

/// Collision shape attached to a game object (model space)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Spherical shape; the world position comes from the owning transform
    Sphere {
        /// Model-space radius
        radius: f32,
    },

    /// Plane patch spanned by two vectors from a model-space origin point
    Plane {
        /// A point on the plane
        origin: Vec3,
        /// First span vector
        span1: Vec3,
        /// Second span vector
        span2: Vec3,
    },

    /// Axis-aligned box between two model-space corners
    Box {
        /// Minimum corner
        min: Vec3,
        /// Maximum corner
        max: Vec3,
    },
}

impl CollisionShape {
    /// Creates a spherical collision shape with the given radius
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Creates a plane patch from an origin and two span vectors
    #[must_use]
    pub fn plane(origin: Vec3, span1: Vec3, span2: Vec3) -> Self {
        Self::Plane {
            origin,
            span1,
            span2,
        }
    }

    /// Creates an axis-aligned box between two corners
    #[must_use]
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        Self::Box { min, max }
    }

    /// Radius of a model-space sphere around the shape origin that encloses
    /// the shape
    ///
    /// Planes are unbounded and report infinity; callers indexing shapes in
    /// a spatial structure should store those as global objects.
    #[must_use]
    pub fn local_bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { radius } => *radius,
            Self::Plane { .. } => f32::INFINITY,
            Self::Box { min, max } => Vec3::new(
                min.x.abs().max(max.x.abs()),
                min.y.abs().max(max.y.abs()),
                min.z.abs().max(max.z.abs()),
            )
            .norm(),
        }
    }

    /// Express this shape in world space under the owning transform
    #[must_use]
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        match self {
            Self::Sphere { radius } => {
                // a sphere cannot represent non-uniform scale; take the most
                // conservative axis
                let scale = transform.scale.x.max(transform.scale.y).max(transform.scale.z);
                WorldShape::Sphere(BoundingSphere::new(transform.position, radius * scale))
            }
            Self::Plane {
                origin,
                span1,
                span2,
            } => {
                let linear = transform.linear();
                // non-uniform scale bends the normal away from the rotated
                // model normal, so it is transformed and re-normalized rather
                // than recomputed from the world spans
                let model_normal = span2
                    .cross(span1)
                    .try_normalize(EPSILON)
                    .unwrap_or_else(Vec3::zeros);
                let normal = (linear * model_normal)
                    .try_normalize(EPSILON)
                    .unwrap_or_else(Vec3::zeros);

                WorldShape::Plane(Plane {
                    origin: transform.position + linear * origin,
                    span1: linear * span1,
                    span2: linear * span2,
                    normal,
                })
            }
            Self::Box { min, max } => {
                let mut world_min = Vec3::repeat(f32::INFINITY);
                let mut world_max = Vec3::repeat(f32::NEG_INFINITY);
                for corner in 0..8 {
                    let local = Vec3::new(
                        if corner & 0b001 == 0 { min.x } else { max.x },
                        if corner & 0b010 == 0 { min.y } else { max.y },
                        if corner & 0b100 == 0 { min.z } else { max.z },
                    );
                    let world = transform.transform_point(local);
                    world_min = world_min.zip_map(&world, f32::min);
                    world_max = world_max.zip_map(&world, f32::max);
                }
                WorldShape::Box(Aabb::new(world_min, world_max))
            }
        }
    }
}

/// World-space collision shape (temporary, for testing only)
///
/// Produced by [`CollisionShape::to_world`] each time a test runs, or
/// constructed directly for query shapes such as rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    /// World-space sphere
    Sphere(BoundingSphere),
    /// World-space plane patch
    Plane(Plane),
    /// World-space axis-aligned box
    Box(Aabb),
    /// Query ray
    Ray(Ray),
}
