//! Camera pose, projection and rebuild deadband.
//!
//! The pose is produced outside the core (input handling, orbit controls)
//! and is read-only here. Conventions are right-handed with +Y up: a pose
//! with identity rotation looks down -Z.

use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Camera position and orthonormal orientation basis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: DVec3,
    pub forward: DVec3,
    pub right: DVec3,
    pub up: DVec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::look_at(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO)
    }
}

impl CameraPose {
    /// Pose at `position` looking towards `target`, +Y up.
    pub fn look_at(position: DVec3, target: DVec3) -> Self {
        let forward = (target - position).try_normalize().unwrap_or(DVec3::NEG_Z);
        let right = forward
            .cross(DVec3::Y)
            .try_normalize()
            .unwrap_or(DVec3::X);
        let up = right.cross(forward).normalize();
        Self {
            position,
            forward,
            right,
            up,
        }
    }

    /// Pose from a position and a rotation of the canonical -Z facing basis.
    pub fn from_rotation(position: DVec3, rotation: DQuat) -> Self {
        Self {
            position,
            forward: rotation * DVec3::NEG_Z,
            right: rotation * DVec3::X,
            up: rotation * DVec3::Y,
        }
    }

    /// Pose orbiting `target` at `distance`, angles in radians.
    pub fn orbit(target: DVec3, yaw: f64, pitch: f64, distance: f64) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let offset = DVec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * distance;
        Self::look_at(target + offset, target)
    }

    /// Orientation as a quaternion.
    pub fn rotation(&self) -> DQuat {
        DQuat::from_mat3(&DMat3::from_cols(self.right, self.up, -self.forward)).normalize()
    }

    /// Project a world point into viewport space.
    ///
    /// `x`/`y` are 0..1 across the visible screen (origin bottom-left), `z` is
    /// the depth along the forward axis (negative behind the camera).
    pub fn world_to_viewport(&self, projection: &Projection, point: DVec3) -> ViewportPoint {
        let rel = point - self.position;
        let depth = rel.dot(self.forward);
        let (half_width, half_height) = projection.half_extents(depth);
        ViewportPoint {
            x: 0.5 + 0.5 * rel.dot(self.right) / half_width,
            y: 0.5 + 0.5 * rel.dot(self.up) / half_height,
            z: depth,
        }
    }
}

/// A point in viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees.
        fov_y_degrees: f64,
        /// Width / height.
        aspect: f64,
    },
    Orthographic {
        /// Half the visible height in world units.
        half_height: f64,
        /// Width / height.
        aspect: f64,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Projection {
    /// Half width and half height of the view volume at `depth`.
    fn half_extents(&self, depth: f64) -> (f64, f64) {
        match *self {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
            } => {
                let half_height = depth * (fov_y_degrees.to_radians() * 0.5).tan();
                (half_height * aspect, half_height)
            }
            Projection::Orthographic {
                half_height,
                aspect,
            } => (half_height * aspect, half_height),
        }
    }
}

/// Minimum camera motion that makes billboard geometry stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDeadband {
    /// Translation threshold in world units.
    pub position: f64,
    /// Rotation threshold in degrees.
    pub degrees: f64,
}

impl Default for CameraDeadband {
    fn default() -> Self {
        Self {
            position: 0.01,
            degrees: 1.0,
        }
    }
}

impl CameraDeadband {
    /// True if `current` moved beyond the deadband relative to `last`.
    pub fn exceeded(&self, last: &CameraPose, current: &CameraPose) -> bool {
        if last.position.distance(current.position) > self.position {
            return true;
        }
        let angle = last.rotation().angle_between(current.rotation());
        angle.to_degrees() > self.degrees
    }
}
