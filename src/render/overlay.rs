//! Line overlays derived from a point-set's bounds.

use glam::DVec3;

use crate::schema::{Bounds, Color};

/// Line-list geometry: consecutive vertex pairs form segments.
#[derive(Debug, Clone, PartialEq)]
pub struct LineList {
    pub positions: Vec<[f32; 3]>,
    pub color: [f32; 4],
}

impl LineList {
    fn from_segments<I: IntoIterator<Item = (DVec3, DVec3)>>(segments: I, color: Color) -> Self {
        let positions = segments
            .into_iter()
            .flat_map(|(a, b)| [a.as_vec3().to_array(), b.as_vec3().to_array()])
            .collect();
        Self {
            positions,
            color: color.to_rgba_f32(),
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// The 12 edges of an axis-aligned box.
pub fn bounding_box_lines(bounds: &Bounds, color: Color) -> LineList {
    let corners = bounds.corners();
    let edges = (0..8usize).flat_map(move |i| {
        [1usize, 2, 4]
            .into_iter()
            .filter(move |bit| i & bit == 0)
            .map(move |bit| (corners[i], corners[i | bit]))
    });
    LineList::from_segments(edges, color)
}

/// Three axis-aligned segments of length `2 * half_length` crossing at `center`.
pub fn center_marker_lines(center: DVec3, half_length: f64, color: Color) -> LineList {
    let axes = [DVec3::X, DVec3::Y, DVec3::Z];
    LineList::from_segments(
        axes.into_iter()
            .map(|axis| (center - axis * half_length, center + axis * half_length)),
        color,
    )
}
