//! Point cloud renderer state: active point-set, settings and current batches.
//!
//! Batches are rebuilt wholesale whenever the point-set, a render setting or
//! (in billboard mode) the camera pose changes beyond the deadband.

use std::sync::Arc;

use super::batch::{BuildParams, DrawBatch, PointBatchBuilder};
use super::camera::{CameraDeadband, CameraPose};
use super::overlay::{LineList, bounding_box_lines, center_marker_lines};
use crate::animation::FrameSink;
use crate::schema::{Color, PointSet, RenderConfig};

/// Fraction of the bounds diagonal used for the center marker arm length.
const CENTER_MARKER_SCALE: f64 = 0.05;

/// Why the batches were rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    PointSet,
    Settings,
    Camera,
}

/// User-adjustable rendering state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub point_size: f64,
    pub billboard: bool,
    pub point_color: Color,
    pub show_bounding_box: bool,
    pub show_center: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            point_size: config.point_size,
            billboard: config.billboard,
            point_color: config.point_color,
            show_bounding_box: false,
            show_center: false,
        }
    }
}

/// Owns the draw batches of the active point-set.
pub struct PointCloudRenderer {
    builder: PointBatchBuilder,
    deadband: CameraDeadband,
    settings: RenderSettings,
    active: Option<Arc<PointSet>>,
    use_colors: bool,
    camera: Option<CameraPose>,
    /// Camera pose the current billboard batches were built for.
    built_for: Option<CameraPose>,
    batches: Vec<DrawBatch>,
    bounding_box: Option<LineList>,
    center_marker: Option<LineList>,
    rebuild_count: u64,
}

impl Default for PointCloudRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl PointCloudRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            builder: PointBatchBuilder::new(config.max_vertices_per_batch),
            deadband: CameraDeadband {
                position: config.deadband_position,
                degrees: config.deadband_degrees,
            },
            settings: RenderSettings::from(config),
            active: None,
            use_colors: false,
            camera: None,
            built_for: None,
            batches: Vec::new(),
            bounding_box: None,
            center_marker: None,
            rebuild_count: 0,
        }
    }

    /// Replace the active point-set and rebuild.
    pub fn set_points(&mut self, points: Arc<PointSet>, use_colors: bool) {
        self.active = Some(points);
        self.use_colors = use_colors;
        self.rebuild(RebuildReason::PointSet);
    }

    /// Drop the active point-set and all geometry.
    pub fn clear(&mut self) {
        self.active = None;
        self.use_colors = false;
        self.built_for = None;
        self.batches.clear();
        self.bounding_box = None;
        self.center_marker = None;
    }

    /// Feed the latest camera pose. Returns true if batches were rebuilt.
    pub fn update_camera(&mut self, pose: &CameraPose) -> bool {
        self.camera = Some(*pose);
        if !self.settings.billboard || self.active.is_none() {
            return false;
        }
        let stale = match &self.built_for {
            Some(last) => self.deadband.exceeded(last, pose),
            None => true,
        };
        if stale {
            self.rebuild(RebuildReason::Camera);
        }
        stale
    }

    pub fn set_point_size(&mut self, size: f64) {
        if self.settings.point_size != size {
            self.settings.point_size = size;
            self.rebuild(RebuildReason::Settings);
        }
    }

    pub fn set_billboard(&mut self, billboard: bool) {
        if self.settings.billboard != billboard {
            self.settings.billboard = billboard;
            self.rebuild(RebuildReason::Settings);
        }
    }

    pub fn set_point_color(&mut self, color: Color) {
        if self.settings.point_color != color {
            self.settings.point_color = color;
            self.rebuild(RebuildReason::Settings);
        }
    }

    pub fn set_show_bounding_box(&mut self, show: bool) {
        self.settings.show_bounding_box = show;
        self.rebuild_overlays();
    }

    pub fn set_show_center(&mut self, show: bool) {
        self.settings.show_center = show;
        self.rebuild_overlays();
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    pub fn active_points(&self) -> Option<&Arc<PointSet>> {
        self.active.as_ref()
    }

    /// Whether the active batches carry per-point colors.
    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    pub fn bounding_box_lines(&self) -> Option<&LineList> {
        self.bounding_box.as_ref()
    }

    pub fn center_marker_lines(&self) -> Option<&LineList> {
        self.center_marker.as_ref()
    }

    /// Number of full batch rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn total_vertices(&self) -> usize {
        self.batches.iter().map(DrawBatch::vertex_count).sum()
    }

    fn rebuild(&mut self, reason: RebuildReason) {
        let Some(points) = self.active.clone() else {
            return;
        };

        let colors = if self.use_colors {
            points.colors()
        } else {
            None
        };
        let params = BuildParams {
            point_size: self.settings.point_size,
            billboard: self.settings.billboard,
            fallback_color: self.settings.point_color,
        };

        self.batches = self
            .builder
            .build(&points, self.camera.as_ref(), &params, colors.as_deref());
        self.built_for = if self.settings.billboard {
            self.camera
        } else {
            None
        };
        self.rebuild_count += 1;

        log::debug!(
            "Rebuilt {} batches for {} points ({:?})",
            self.batches.len(),
            points.len(),
            reason
        );

        if reason == RebuildReason::PointSet {
            self.rebuild_overlays();
        }
    }

    fn rebuild_overlays(&mut self) {
        let bounds = self.active.as_ref().and_then(|p| p.bounds());
        let color = self.settings.point_color;

        self.bounding_box = bounds
            .filter(|_| self.settings.show_bounding_box)
            .map(|b| bounding_box_lines(&b, color));

        let arm = bounds.map_or(0.0, |b| {
            (b.size().length() * CENTER_MARKER_SCALE).max(self.settings.point_size)
        });
        self.center_marker = bounds
            .filter(|_| self.settings.show_center)
            .map(|b| center_marker_lines(b.center(), arm, color));
    }
}

impl FrameSink for PointCloudRenderer {
    fn present(&mut self, points: Arc<PointSet>, use_colors: bool) {
        self.set_points(points, use_colors);
    }

    fn clear(&mut self) {
        PointCloudRenderer::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ColorMode;
    use crate::schema::PointRecord;
    use glam::DVec3;

    fn colored_set() -> Arc<PointSet> {
        Arc::new(PointSet::new(vec![
            PointRecord::with_color(DVec3::ZERO, Color::new(1.0, 0.0, 0.0)),
            PointRecord::with_color(DVec3::new(2.0, 2.0, 2.0), Color::new(0.0, 1.0, 0.0)),
        ]))
    }

    #[test]
    fn test_set_points_builds_batches() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_points(colored_set(), true);
        assert_eq!(renderer.batches().len(), 1);
        assert_eq!(renderer.batches()[0].color_mode, ColorMode::PerVertex);
        assert_eq!(renderer.total_vertices(), 8);
        assert_eq!(renderer.rebuild_count(), 1);

        renderer.set_points(colored_set(), false);
        assert_eq!(renderer.batches()[0].color_mode, ColorMode::Uniform);
    }

    #[test]
    fn test_camera_deadband_limits_rebuilds() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_points(colored_set(), false);
        let pose = CameraPose::default();

        assert!(renderer.update_camera(&pose));
        let count = renderer.rebuild_count();

        let mut nudged = pose;
        nudged.position.x += 0.001;
        assert!(!renderer.update_camera(&nudged));
        assert_eq!(renderer.rebuild_count(), count);

        let mut moved = pose;
        moved.position.x += 1.0;
        assert!(renderer.update_camera(&moved));
        assert_eq!(renderer.rebuild_count(), count + 1);
    }

    #[test]
    fn test_camera_ignored_without_billboard() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_billboard(false);
        renderer.set_points(colored_set(), false);
        let count = renderer.rebuild_count();

        let mut moved = CameraPose::default();
        moved.position.y += 5.0;
        assert!(!renderer.update_camera(&moved));
        assert_eq!(renderer.rebuild_count(), count);
    }

    #[test]
    fn test_camera_before_points_does_not_build() {
        let mut renderer = PointCloudRenderer::default();
        assert!(!renderer.update_camera(&CameraPose::default()));
        assert!(renderer.batches().is_empty());
    }

    #[test]
    fn test_settings_trigger_rebuild() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_points(colored_set(), false);
        let count = renderer.rebuild_count();

        renderer.set_point_size(0.5);
        renderer.set_point_size(0.5);
        renderer.set_point_color(Color::new(0.2, 0.2, 0.2));
        assert_eq!(renderer.rebuild_count(), count + 2);
        assert_eq!(renderer.batches()[0].vertices[0].color[0], 0.2);
    }

    #[test]
    fn test_overlays_follow_toggles_and_points() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_show_bounding_box(true);
        assert!(renderer.bounding_box_lines().is_none());

        renderer.set_points(colored_set(), true);
        assert_eq!(renderer.bounding_box_lines().unwrap().segment_count(), 12);
        assert!(renderer.center_marker_lines().is_none());

        renderer.set_show_center(true);
        let marker = renderer.center_marker_lines().unwrap();
        assert_eq!(marker.segment_count(), 3);

        renderer.set_show_bounding_box(false);
        assert!(renderer.bounding_box_lines().is_none());

        renderer.clear();
        assert!(renderer.center_marker_lines().is_none());
        assert!(renderer.batches().is_empty());
    }

    #[test]
    fn test_empty_point_set_clears_batches() {
        let mut renderer = PointCloudRenderer::default();
        renderer.set_points(colored_set(), false);
        renderer.set_points(Arc::new(PointSet::empty()), false);
        assert!(renderer.batches().is_empty());
    }
}
