//! Animation playback over loaded frame-sets.
//!
//! An [`AnimationPlayer`] owns the frame-set and a playback cursor. Every
//! frame transition is pushed to a [`FrameSink`], normally the
//! [`PointCloudRenderer`](crate::render::PointCloudRenderer), together with
//! whether per-point colors apply to the whole animation.

mod player;

pub use player::*;
