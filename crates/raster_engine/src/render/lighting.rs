//! Lighting model
//!
//! The pipeline shades with a single positional light plus a constant
//! ambient term. Light position arrives through the frame's constant block;
//! the ambient factor comes from the rasterizer configuration.

use crate::foundation::math::{utils, Vec3};

/// Default ambient contribution when the application does not override it
pub const DEFAULT_AMBIENT: f32 = 0.1;

/// Evaluate the diffuse lighting model for one surface sample
///
/// Computes `clamp(base_color * (ambient + max(0, n . l)))` per channel,
/// where `l` points from the surface sample toward the light. Inputs need
/// not be normalized; degenerate normals or a light sitting exactly on the
/// sample fall back to the ambient term alone.
pub fn shade(
    base_color: Vec3,
    normal: Vec3,
    surface_point: Vec3,
    light_position: Vec3,
    ambient: f32,
) -> Vec3 {
    let to_light = light_position - surface_point;
    let diffuse = match (normal.try_normalize(1e-12), to_light.try_normalize(1e-12)) {
        (Some(n), Some(l)) => n.dot(&l).max(0.0),
        _ => 0.0,
    };

    let lit = base_color * (ambient + diffuse);
    Vec3::new(
        utils::clamp(lit.x, 0.0, 1.0),
        utils::clamp(lit.y, 0.0, 1.0),
        utils::clamp(lit.z, 0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_light_head_on_gives_full_diffuse() {
        let color = shade(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 10.0),
            0.0,
        );
        assert_relative_eq!(color.x, 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_grazing_light_leaves_only_ambient() {
        let color = shade(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zeros(),
            Vec3::new(10.0, 0.0, 0.0),
            0.1,
        );
        assert_relative_eq!(color.x, 0.1, epsilon = EPSILON);
        assert_relative_eq!(color.z, 0.1, epsilon = EPSILON);
    }

    #[test]
    fn test_backlit_surface_is_not_negative() {
        let color = shade(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -5.0),
            0.0,
        );
        assert_relative_eq!(color.x, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_output_clamps_to_unit_range() {
        let color = shade(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 1.0),
            0.5,
        );
        assert_relative_eq!(color.x, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_normal_falls_back_to_ambient() {
        let color = shade(
            Vec3::new(0.8, 0.8, 0.8),
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 5.0),
            0.25,
        );
        assert_relative_eq!(color.x, 0.2, epsilon = EPSILON);
    }
}
