//! # 3D Camera
//!
//! Perspective camera producing the view and projection matrices for the
//! constant block. View space is right-handed Y-up with the camera looking
//! down its local -Z axis; the projection maps to a [-1, 1] clip volume and
//! the pipeline's viewport step remaps depth to [0, 1].

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// 3D perspective camera
///
/// Matrix calculations are performed on demand rather than cached; for
/// static cameras, compute the matrices once and reuse them in the
/// constant block.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees
    /// * `aspect` - Aspect ratio (width / height) of the output image
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// The default target is the origin with a +Y up vector; both can be
    /// changed after creation.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Update the look-at target without moving the camera
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio, typically after an output resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-view matrix for the current camera pose
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// View-to-clip projection matrix for the current lens parameters
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_centers_its_target() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 4.0), 60.0, 1.0, 0.1, 100.0);
        let clip = camera.projection_matrix()
            * camera.view_matrix()
            * Vec4::new(0.0, 0.0, 0.0, 1.0);

        // The target projects onto the optical axis.
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn test_fov_is_stored_in_radians() {
        let camera = Camera::perspective(Vec3::zeros(), 90.0, 1.0, 0.1, 10.0);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    }
}
