//! Math utilities and types
//!
//! Provides fundamental math types for 3D collision and spatial queries.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
///
/// The engine never stores transforms itself; the owning scene supplies one
/// whenever a model-space shape has to be expressed in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors (non-uniform scale is allowed)
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Rotation and scale combined into a single linear map
    #[must_use]
    pub fn linear(&self) -> Mat3 {
        self.rotation.to_rotation_matrix().into_inner() * Mat3::from_diagonal(&self.scale)
    }

    /// Convert to a transformation matrix
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.linear() * point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_transform_is_noop() {
        let transform = Transform::identity();
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(transform.transform_point(point), point, epsilon = 1e-6);
    }

    #[test]
    fn test_transform_point_applies_scale_then_rotation() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation,
            scale: Vec3::new(2.0, 1.0, 1.0),
        };

        // (1, 0, 0) scales to (2, 0, 0), then rotates 90 degrees about Y to (0, 0, -2)
        let result = transform.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(result, Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_linear_matches_matrix_form() {
        let transform = Transform {
            position: Vec3::new(4.0, -1.0, 2.0),
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), 0.7),
            scale: Vec3::new(1.0, 3.0, 0.5),
        };
        let point = Vec3::new(-2.0, 5.0, 1.0);

        let via_matrix = transform
            .to_matrix()
            .transform_point(&Point3::from(point))
            .coords;
        assert_relative_eq!(transform.transform_point(point), via_matrix, epsilon = 1e-4);
    }
}
