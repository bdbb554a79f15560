//! Primitive collision shapes and intersection algorithms
//!
//! World-space primitives with the pairwise tests between them. Everything
//! here is a plain value type; transforms have already been applied by the
//! time these tests run (see [`super::shape`]).

use super::contact::Contact;
use crate::foundation::geometry::Aabb;
use crate::foundation::math::{Mat3, Vec3};

/// Numeric slack subtracted from the squared radius in the sphere-plane test
/// so grazing contacts survive float noise
const CONTACT_TOLERANCE: f32 = 1e-3;

/// Threshold below which a direction has no usable length
pub(crate) const EPSILON: f32 = 1e-6;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// Unit direction of the ray; zero when constructed from a degenerate
    /// (zero-length) direction, in which case every test reports `None`
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized; a zero-length direction yields a
    /// degenerate ray that never hits anything rather than a panic.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(EPSILON).unwrap_or_else(Vec3::zeros),
        }
    }

    /// Get a point along the ray at distance t
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether this ray was built from a zero-length direction
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zeros()
    }

    /// Test this ray against an axis-aligned box
    ///
    /// Builds on the slab test of [`Aabb::intersect_ray`]; the contact normal
    /// is taken from the face nearest to the entry point. `scale1` carries
    /// the smallest non-negative hit parameter.
    #[must_use]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<Contact> {
        if self.is_degenerate() {
            return None;
        }
        let t = aabb.intersect_ray(self.origin, self.direction)?;
        let position = self.point_at(t);

        Some(Contact {
            position,
            normal: aabb_face_normal(aabb, position),
            scale1: t,
            scale2: 0.0,
        })
    }
}

/// Outward normal of the box face nearest to a point on its surface
fn aabb_face_normal(aabb: &Aabb, point: Vec3) -> Vec3 {
    let mut best_axis = 0;
    let mut best_sign = 1.0;
    let mut best_distance = f32::INFINITY;

    for axis in 0..3 {
        let to_min = (point[axis] - aabb.min[axis]).abs();
        if to_min < best_distance {
            best_distance = to_min;
            best_axis = axis;
            best_sign = -1.0;
        }
        let to_max = (point[axis] - aabb.max[axis]).abs();
        if to_max < best_distance {
            best_distance = to_max;
            best_axis = axis;
            best_sign = 1.0;
        }
    }

    let mut normal = Vec3::zeros();
    normal[best_axis] = best_sign;
    normal
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere; zero is valid and degrades to point tests
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test this sphere against another sphere
    ///
    /// The normal points from the other center toward this one (up by
    /// convention when the centers coincide), the contact point sits on the
    /// other sphere's surface, and `scale1` carries the penetration depth.
    /// Exact tangency counts as contact.
    #[must_use]
    pub fn contact_sphere(&self, other: &BoundingSphere) -> Option<Contact> {
        let delta = self.center - other.center;
        let radius_sum = self.radius + other.radius;
        let distance_squared = delta.norm_squared();
        if distance_squared > radius_sum * radius_sum {
            return None;
        }

        let distance = distance_squared.sqrt();
        let normal = if distance > EPSILON {
            delta / distance
        } else {
            // coincident centers have no separation direction
            Vec3::y()
        };

        Some(Contact {
            position: other.center + normal * other.radius,
            normal,
            scale1: radius_sum - distance,
            scale2: 0.0,
        })
    }

    /// Test this sphere against an axis-aligned box
    ///
    /// Clamps the center to the box for the closest point; the normal points
    /// from that point toward the center, falling back to up when the center
    /// is inside the box. `scale1` carries the penetration depth.
    #[must_use]
    pub fn contact_aabb(&self, aabb: &Aabb) -> Option<Contact> {
        let closest = aabb.closest_point(self.center);
        let delta = self.center - closest;
        let distance_squared = delta.norm_squared();
        if distance_squared > self.radius * self.radius {
            return None;
        }

        let distance = distance_squared.sqrt();
        let normal = if distance > EPSILON {
            delta / distance
        } else {
            Vec3::y()
        };

        Some(Contact {
            position: closest,
            normal,
            scale1: self.radius - distance,
            scale2: 0.0,
        })
    }

    /// Test ray intersection with this sphere
    ///
    /// Solves `|origin + t*direction - center|^2 = radius^2` and keeps the
    /// smallest non-negative root; `scale1` carries the hit parameter.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Contact> {
        if ray.is_degenerate() {
            return None;
        }

        // quadratic coefficients, with a == 1 for the unit direction
        let oc = ray.origin - self.center;
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t_near = (-b - sqrt_discriminant) / 2.0;
        let t_far = (-b + sqrt_discriminant) / 2.0;

        let t = if t_near >= 0.0 {
            t_near
        } else if t_far >= 0.0 {
            t_far
        } else {
            return None; // sphere entirely behind the ray
        };

        let position = ray.point_at(t);
        let normal = (position - self.center)
            .try_normalize(EPSILON)
            .unwrap_or(-ray.direction);

        Some(Contact {
            position,
            normal,
            scale1: t,
            scale2: 0.0,
        })
    }
}

/// A plane patch spanned by two vectors from an origin point
///
/// The patch is unbounded for collision purposes; the span vectors exist so
/// contacts can be located within the parallelogram they describe, letting
/// the caller decide whether a hit lies on the bounded patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane
    pub origin: Vec3,
    /// First span vector
    pub span1: Vec3,
    /// Second span vector
    pub span2: Vec3,
    /// Derived unit normal, oriented so a floor patch spanned by +X and +Z
    /// faces +Y; zero when the spans are linearly dependent
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane from an origin and two span vectors
    #[must_use]
    pub fn new(origin: Vec3, span1: Vec3, span2: Vec3) -> Self {
        let normal = span2
            .cross(&span1)
            .try_normalize(EPSILON)
            .unwrap_or_else(Vec3::zeros);
        Self {
            origin,
            span1,
            span2,
            normal,
        }
    }

    /// Test a sphere against this plane
    ///
    /// The signed distance from the center to the plane along the normal
    /// gives the candidate contact point; the sphere collides when that
    /// distance is within the radius (less a small squared slack, so grazing
    /// contacts are kept). `scale1`/`scale2` locate the contact in the span
    /// basis, solved by inverting the `[span1 | span2 | normal]` matrix;
    /// linearly dependent spans make that matrix singular and the test
    /// reports no contact. The returned normal is always the plane's own
    /// unit normal, whichever side the sphere is on.
    #[must_use]
    pub fn contact_sphere(&self, sphere: &BoundingSphere) -> Option<Contact> {
        let t = -self.normal.dot(&(sphere.center - self.origin));
        let position = sphere.center + self.normal * t;

        if t * t > sphere.radius * sphere.radius - CONTACT_TOLERANCE {
            return None;
        }

        let basis = Mat3::from_columns(&[self.span1, self.span2, self.normal]);
        let inverse = basis.try_inverse()?;
        let scales = inverse * (position - self.origin);

        Some(Contact {
            position,
            normal: self.normal,
            scale1: scales.x,
            scale2: scales.y,
        })
    }

    /// Test ray intersection with this plane
    ///
    /// Returns the smallest non-negative hit parameter in `scale1`. The
    /// normal is oriented toward the ray origin so the hit always reports
    /// the side that was struck. Rays parallel to the plane (and degenerate
    /// planes, whose normal is zero) report no hit.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Contact> {
        if ray.is_degenerate() {
            return None;
        }

        let denom = self.normal.dot(&ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = self.normal.dot(&(self.origin - ray.origin)) / denom;
        if t < 0.0 {
            return None;
        }

        let normal = if denom > 0.0 { -self.normal } else { self.normal };
        Some(Contact {
            position: ray.point_at(t),
            normal,
            scale1: t,
            scale2: 0.0,
        })
    }
}
