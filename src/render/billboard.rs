//! Camera-facing quad orientation.

use glam::DVec3;

/// World up axis.
pub const WORLD_UP: DVec3 = DVec3::Y;
/// World right axis.
pub const WORLD_RIGHT: DVec3 = DVec3::X;

/// Above this |cos| between the view direction and world up, the
/// `WORLD_UP x to_camera` cross product is too short to normalize reliably.
const POLE_THRESHOLD: f64 = 0.99;

/// In-plane axes of a point quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBasis {
    pub right: DVec3,
    pub up: DVec3,
}

impl QuadBasis {
    /// Axis-aligned basis used when billboarding is off.
    pub const FIXED: QuadBasis = QuadBasis {
        right: WORLD_RIGHT,
        up: WORLD_UP,
    };
}

impl Default for QuadBasis {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Basis for a quad at `point` facing `camera_position`.
///
/// Near the poles (camera almost straight above or below the point) the
/// right axis is pinned to [`WORLD_RIGHT`]. A camera exactly at the point
/// has no direction and gets the fixed basis.
pub fn billboard_basis(point: DVec3, camera_position: DVec3) -> QuadBasis {
    let Some(to_camera) = (camera_position - point).try_normalize() else {
        return QuadBasis::FIXED;
    };

    let right = if to_camera.dot(WORLD_UP).abs() > POLE_THRESHOLD {
        WORLD_RIGHT
    } else {
        WORLD_UP.cross(to_camera).normalize()
    };
    let up = to_camera.cross(right).normalize();

    QuadBasis { right, up }
}
