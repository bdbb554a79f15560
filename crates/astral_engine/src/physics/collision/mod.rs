//! Collision detection between primitive shape pairs
//!
//! All tests are pure functions over world-space geometry: no allocation, no
//! stored state, no internal synchronization. "No collision" is a normal
//! `None` result, never an error, and degenerate inputs (zero-length ray
//! directions, linearly dependent plane spans) also report `None` so callers
//! can skip the contact safely.

mod contact;
mod primitives;
mod response;
mod shape;

pub use contact::Contact;
pub use primitives::{BoundingSphere, Plane, Ray};
pub use response::corrected_sphere_position;
pub use shape::{CollisionShape, WorldShape};

/// Compute the contact between two world-space shapes, if any
///
/// The pair table is explicit and exhaustive so adding a shape variant is a
/// compile error until every pairing is decided. The contact normal pushes
/// the first shape out of the second; swapping the operands flips it. Rays
/// are queries rather than surfaces, so both ray operand orders report the
/// surface hit by the ray. Pairs with no narrow-phase test (plane-plane,
/// plane-box, box-box, ray-ray) report no contact.
#[must_use]
pub fn contact_between(a: &WorldShape, b: &WorldShape) -> Option<Contact> {
    match (a, b) {
        (WorldShape::Sphere(first), WorldShape::Sphere(second)) => first.contact_sphere(second),
        (WorldShape::Sphere(sphere), WorldShape::Plane(plane)) => plane.contact_sphere(sphere),
        (WorldShape::Plane(plane), WorldShape::Sphere(sphere)) => {
            plane.contact_sphere(sphere).map(Contact::flipped)
        }
        (WorldShape::Sphere(sphere), WorldShape::Box(aabb)) => sphere.contact_aabb(aabb),
        (WorldShape::Box(aabb), WorldShape::Sphere(sphere)) => {
            sphere.contact_aabb(aabb).map(Contact::flipped)
        }
        (WorldShape::Ray(ray), WorldShape::Sphere(sphere))
        | (WorldShape::Sphere(sphere), WorldShape::Ray(ray)) => sphere.intersect_ray(ray),
        (WorldShape::Ray(ray), WorldShape::Plane(plane))
        | (WorldShape::Plane(plane), WorldShape::Ray(ray)) => plane.intersect_ray(ray),
        (WorldShape::Ray(ray), WorldShape::Box(aabb))
        | (WorldShape::Box(aabb), WorldShape::Ray(ray)) => ray.intersect_aabb(aabb),
        (WorldShape::Plane(_), WorldShape::Plane(_) | WorldShape::Box(_))
        | (WorldShape::Box(_), WorldShape::Plane(_) | WorldShape::Box(_))
        | (WorldShape::Ray(_), WorldShape::Ray(_)) => None,
    }
}
