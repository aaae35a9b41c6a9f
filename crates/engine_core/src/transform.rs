//! Transform component and orientation helpers for placing objects in the scene.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a position, an orthonormal basis and a uniform scale.
    pub fn from_basis(position: Vec3, basis: Mat3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_mat3(&basis).normalize(),
            scale: Vec3::splat(scale),
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Euler angles of the rotation in XYZ order.
    pub fn euler_xyz(&self) -> Vec3 {
        euler_xyz_from_basis(&Mat3::from_quat(self.rotation))
    }
}

/// Rotation basis whose local +Z points from `target` back to `eye`.
///
/// Objects oriented with this basis face `target` along their local -Z,
/// with local +Y as close to `up` as the geometry allows.
pub fn look_at_basis(eye: Vec3, target: Vec3, up: Vec3) -> Mat3 {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // up and view direction are parallel: nudge the view direction
        if (up.z.abs() - 1.0).abs() < f32::EPSILON {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);

    Mat3::from_cols(x, y, z)
}

/// Extract XYZ-order Euler angles (radians) from a pure rotation basis.
///
/// The basis is treated as `Rx(x) * Ry(y) * Rz(z)`.
pub fn euler_xyz_from_basis(m: &Mat3) -> Vec3 {
    let m11 = m.x_axis.x;
    let m12 = m.y_axis.x;
    let m13 = m.z_axis.x;
    let m22 = m.y_axis.y;
    let m23 = m.z_axis.y;
    let m32 = m.y_axis.z;
    let m33 = m.z_axis.z;

    let y = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999_9 {
        Vec3::new((-m23).atan2(m33), y, (-m12).atan2(m11))
    } else {
        // gimbal lock
        Vec3::new(m32.atan2(m22), y, 0.0)
    }
}

/// Rebuild a rotation basis from XYZ-order Euler angles.
pub fn basis_from_euler_xyz(euler: Vec3) -> Mat3 {
    Mat3::from_rotation_x(euler.x) * Mat3::from_rotation_y(euler.y) * Mat3::from_rotation_z(euler.z)
}

/// Raw transform data for GPU upload (instance data handed to the render host).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn look_at_basis_faces_target_along_negative_z() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(4.0, 2.0, -1.0);
        let basis = look_at_basis(eye, target, Vec3::Y);
        let forward = -basis.z_axis;
        assert!(approx(forward, (target - eye).normalize()));
        assert!((basis.x_axis.dot(basis.y_axis)).abs() < 1e-5);
        assert!(basis.y_axis.y > 0.0);
    }

    #[test]
    fn look_at_basis_handles_parallel_up() {
        let basis = look_at_basis(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(basis.x_axis.is_finite());
        assert!((basis.x_axis.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn euler_extraction_rebuilds_the_same_basis() {
        let basis = look_at_basis(Vec3::new(3.0, -1.0, 2.0), Vec3::new(-2.0, 5.0, 7.0), Vec3::new(0.2, 1.0, 0.1).normalize());
        let euler = euler_xyz_from_basis(&basis);
        let rebuilt = basis_from_euler_xyz(euler);
        assert!(approx(rebuilt.x_axis, basis.x_axis));
        assert!(approx(rebuilt.y_axis, basis.y_axis));
        assert!(approx(rebuilt.z_axis, basis.z_axis));
    }

    #[test]
    fn transform_raw_is_castable_for_upload() {
        let transforms = [
            TransformRaw::from(Transform::from_position(Vec3::X)),
            TransformRaw::from(Transform::from_position(Vec3::Y)),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&transforms);
        assert_eq!(bytes.len(), 2 * 16 * 4);
        assert_eq!(transforms[1].model[3][1], 1.0);
    }
}
