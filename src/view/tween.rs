//! Smoothed camera transitions as explicit tween state.
//!
//! A [`CameraTween`] is advanced once per render tick with the frame delta.
//! Cancelling a transition means dropping the tween; starting a new one from
//! the current pose supersedes the old one.

use serde::{Deserialize, Serialize};

use crate::render::CameraPose;

/// Easing curves mapping linear progress `t` in [0, 1] to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Hermite smooth step, zero velocity at both ends.
    #[default]
    SmoothStep,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Transition from `start` to `target` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTween {
    pub start: CameraPose,
    pub target: CameraPose,
    pub elapsed: f64,
    pub duration: f64,
    pub easing: Easing,
}

impl CameraTween {
    pub fn new(start: CameraPose, target: CameraPose, duration: f64, easing: Easing) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Pose at the current progress.
    pub fn pose(&self) -> CameraPose {
        let t = self.easing.apply(self.progress());
        if t >= 1.0 {
            return self.target;
        }
        let position = self.start.position.lerp(self.target.position, t);
        let rotation = self.start.rotation().slerp(self.target.rotation(), t);
        CameraPose::from_rotation(position, rotation)
    }

    /// Advance by `delta` seconds and return the new pose.
    pub fn advance(&mut self, delta: f64) -> CameraPose {
        self.elapsed = (self.elapsed + delta.max(0.0)).min(self.duration);
        self.pose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::SmoothStep,
            Easing::QuadInOut,
            Easing::CubicInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-12);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-12);
        }
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_tween_reaches_target() {
        let start = CameraPose::look_at(DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO);
        let target = CameraPose::default();
        let mut tween = CameraTween::new(start, target, 1.0, Easing::Linear);

        let mid = tween.advance(0.5);
        assert!(!tween.is_finished());
        assert!((mid.position - DVec3::new(5.0, 0.0, 5.0)).length() < 1e-9);
        assert!((mid.forward.length() - 1.0).abs() < 1e-9);

        let end = tween.advance(0.75);
        assert!(tween.is_finished());
        assert_eq!(end, target);
        assert_eq!(tween.elapsed, 1.0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let start = CameraPose::look_at(DVec3::new(3.0, 3.0, 3.0), DVec3::ZERO);
        let target = CameraPose::default();
        let mut tween = CameraTween::new(start, target, 0.0, Easing::SmoothStep);
        assert!(tween.is_finished());
        assert_eq!(tween.advance(0.0), target);
    }
}
