//! Geometric collision response

use super::contact::Contact;
use crate::foundation::math::Vec3;

/// Push a sphere out of a contact along the surface normal
///
/// Returns the center position at which a sphere of the given radius rests
/// exactly on the contacted surface. This is pure position correction;
/// velocities and impulses are the caller's business.
#[must_use]
pub fn corrected_sphere_position(contact: &Contact, radius: f32) -> Vec3 {
    contact.position + contact.normal * radius
}
