//! Point records, point-sets and animation frame-sets.
//!
//! All types here are value data: once a [`PointSet`] or [`FrameSet`] is
//! constructed it is never edited in place. Loading new data replaces the
//! whole collection.

use std::sync::{Arc, OnceLock};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Linear RGB color with channels nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Default point color when a record carries no color.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Convert to an opaque RGBA array for vertex upload.
    #[inline]
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, 1.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A single parsed vertex with an optional per-point color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    /// World-space position.
    pub position: DVec3,
    /// Per-point color, if the source record carried a valid one.
    pub color: Option<Color>,
}

impl PointRecord {
    /// Create a colorless record.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            color: None,
        }
    }

    /// Create a colored record.
    pub fn with_color(position: DVec3, color: Color) -> Self {
        Self {
            position,
            color: Some(color),
        }
    }

    #[inline]
    pub fn has_color(&self) -> bool {
        self.color.is_some()
    }

    /// Color of this point, falling back to white.
    #[inline]
    pub fn color_or_default(&self) -> Color {
        self.color.unwrap_or_default()
    }
}

/// Axis-aligned bounding box of raw point positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// Compute the bounds enclosing all positions, or `None` if there are none.
    pub fn enclosing<I: IntoIterator<Item = DVec3>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Midpoint of the min/max corners.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// The eight corners, indexed by bit pattern (bit 0 = x, bit 1 = y, bit 2 = z).
    pub fn corners(&self) -> [DVec3; 8] {
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }
}

/// One frame's worth of points in source order.
///
/// The bounding box is computed lazily on first request and cached. Because a
/// point-set is never mutated after construction, the cache can only be
/// invalidated by replacing the whole set.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<PointRecord>,
    has_color_any: bool,
    bounds: OnceLock<Option<Bounds>>,
}

impl PointSet {
    pub fn new(points: Vec<PointRecord>) -> Self {
        let has_color_any = points.iter().any(PointRecord::has_color);
        Self {
            points,
            has_color_any,
            bounds: OnceLock::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a colorless point-set from bare positions.
    pub fn from_positions<I: IntoIterator<Item = DVec3>>(positions: I) -> Self {
        Self::new(positions.into_iter().map(PointRecord::new).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.points.iter()
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = DVec3> + '_ {
        self.points.iter().map(|p| p.position)
    }

    /// True if at least one point carries a color.
    #[inline]
    pub fn has_color_any(&self) -> bool {
        self.has_color_any
    }

    /// True if every point carries a color. Vacuously true for an empty set.
    pub fn is_fully_colored(&self) -> bool {
        self.points.iter().all(PointRecord::has_color)
    }

    /// Per-point colors, only when every point has one.
    pub fn colors(&self) -> Option<Vec<Color>> {
        self.points.iter().map(|p| p.color).collect()
    }

    /// Lazily computed bounding box; `None` for an empty set.
    pub fn bounds(&self) -> Option<Bounds> {
        *self
            .bounds
            .get_or_init(|| Bounds::enclosing(self.positions()))
    }
}

impl FromIterator<PointRecord> for PointSet {
    fn from_iter<I: IntoIterator<Item = PointRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered animation frames plus the all-or-nothing color flag.
///
/// `has_color_data` is true only when every point of every frame carries a
/// color (and there is at least one point). A single colorless point anywhere
/// degrades the whole animation to the uniform fallback color.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    frames: Vec<Arc<PointSet>>,
    has_color_data: bool,
}

impl FrameSet {
    pub fn new(frames: Vec<PointSet>) -> Self {
        Self::from_shared(frames.into_iter().map(Arc::new).collect())
    }

    pub fn from_shared(frames: Vec<Arc<PointSet>>) -> Self {
        let any_points = frames.iter().any(|f| !f.is_empty());
        let has_color_data = any_points && frames.iter().all(|f| f.is_fully_colored());
        Self {
            frames,
            has_color_data,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn has_color_data(&self) -> bool {
        self.has_color_data
    }

    pub fn get(&self, index: usize) -> Option<&Arc<PointSet>> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Arc<PointSet>] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<PointSet>> {
        self.frames.iter()
    }

    /// Total number of points across all frames.
    pub fn total_points(&self) -> usize {
        self.frames.iter().map(|f| f.len()).sum()
    }

    /// Whether frame `index` should render with per-point colors.
    pub fn frame_uses_colors(&self, index: usize) -> bool {
        self.has_color_data
            && self
                .frames
                .get(index)
                .is_some_and(|f| f.is_fully_colored())
    }
}

impl From<Vec<PointSet>> for FrameSet {
    fn from(frames: Vec<PointSet>) -> Self {
        Self::new(frames)
    }
}
