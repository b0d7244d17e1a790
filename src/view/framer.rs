//! Subject framing: bounds center, out-of-view detection and camera recentering.

use glam::DVec3;

use super::schedule::IntervalTimer;
use super::tween::{CameraTween, Easing};
use crate::render::{CameraPose, Projection};
use crate::schema::{FramerConfig, PointSet};

/// Viewport margin outside [0, 1] still considered "in view" (50% overscan).
const VIEWPORT_MARGIN: f64 = 0.5;

/// Center of the raw point positions' bounding box.
///
/// `None` means there is no subject; it must not be read as the origin.
pub fn bounds_center(points: &PointSet) -> Option<DVec3> {
    points.bounds().map(|b| b.center())
}

/// True when `center` is behind the camera or well outside the screen.
pub fn is_out_of_view(pose: &CameraPose, projection: &Projection, center: DVec3) -> bool {
    let p = pose.world_to_viewport(projection, center);
    if p.z <= 0.0 {
        return true;
    }
    let range = -VIEWPORT_MARGIN..=1.0 + VIEWPORT_MARGIN;
    !(range.contains(&p.x) && range.contains(&p.y))
}

/// Watches the active point-set and steers the camera back to a default pose
/// when the subject has been lost.
pub struct ViewFramer {
    default_pose: CameraPose,
    poll: IntervalTimer,
    reset_duration: f64,
    easing: Easing,
    enabled: bool,
    transition: Option<CameraTween>,
}

impl ViewFramer {
    pub fn new(config: &FramerConfig, default_pose: CameraPose) -> Self {
        Self {
            default_pose,
            poll: IntervalTimer::new(config.poll_interval_seconds),
            reset_duration: config.reset_duration_seconds,
            easing: config.easing,
            enabled: config.enabled,
            transition: None,
        }
    }

    /// Record the pose that resets return to.
    pub fn capture_default(&mut self, pose: CameraPose) {
        self.default_pose = pose;
    }

    pub fn default_pose(&self) -> &CameraPose {
        &self.default_pose
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.poll.reset();
    }

    /// Start a smoothed transition from `current` to the default pose,
    /// superseding any transition in flight.
    pub fn request_reset(&mut self, current: &CameraPose) {
        self.transition = Some(CameraTween::new(
            *current,
            self.default_pose,
            self.reset_duration,
            self.easing,
        ));
    }

    /// Drop the in-flight transition, e.g. on user camera input.
    pub fn cancel(&mut self) {
        self.transition = None;
    }

    #[inline]
    pub fn is_resetting(&self) -> bool {
        self.transition.is_some()
    }

    /// The transition in flight: its target pose and duration.
    pub fn active_transition(&self) -> Option<&CameraTween> {
        self.transition.as_ref()
    }

    /// Advance one render tick.
    ///
    /// Returns the pose the camera should adopt this tick while a transition
    /// is running. Otherwise polls at the configured cadence and starts a
    /// transition when the subject is out of view.
    pub fn update(
        &mut self,
        delta: f64,
        current: &CameraPose,
        projection: &Projection,
        points: &PointSet,
    ) -> Option<CameraPose> {
        if let Some(transition) = self.transition.as_mut() {
            let pose = transition.advance(delta);
            if transition.is_finished() {
                self.transition = None;
                self.poll.reset();
            }
            return Some(pose);
        }

        if !self.enabled || !self.poll.tick(delta) {
            return None;
        }

        let center = bounds_center(points)?;
        if is_out_of_view(current, projection, center) {
            log::info!(
                "Subject at {:?} out of view, recentering over {:.2}s",
                center,
                self.reset_duration
            );
            self.request_reset(current);
        }
        None
    }
}
