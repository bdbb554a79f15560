//! Contact geometry produced by narrow-phase tests

use crate::foundation::math::Vec3;

/// Result of a narrow-phase collision test
///
/// Tests return `Option<Contact>`; `None` means "no collision" (including
/// degenerate input geometry) and is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub position: Vec3,

    /// Unit surface normal at the contact. Plane contacts always carry the
    /// plane's own unit normal regardless of which side the sphere is on.
    pub normal: Vec3,

    /// Pair-dependent auxiliary value: the first span coordinate for plane
    /// contacts, penetration depth for sphere-sphere and sphere-box pairs,
    /// the hit parameter for ray tests
    pub scale1: f32,

    /// Second span coordinate for plane contacts, zero elsewhere
    pub scale2: f32,
}

impl Contact {
    /// The same contact seen from the other operand's side
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}
