//! Point cloud player - Animated point cloud loading, batching and playback.
//!
//! This crate turns plain-text vertex files (`v x y z [r g b]`) into
//! camera-facing quad batches and plays sequences of them back as an
//! animation, keeping the subject in view.
//!
//! # Architecture
//!
//! - `schema`: Point records, point-sets, frame-sets and viewer configuration
//! - `geometry`: Vertex record parsing and file/directory loading
//! - `render`: Camera model, billboard bases, batch building and GPU upload
//! - `animation`: Playback state machine driving the renderer
//! - `view`: Subject framing and smoothed camera resets
//!
//! # Example
//!
//! ```rust,no_run
//! use point_cloud_player::{
//!     animation::AnimationPlayer,
//!     geometry::{LoadPolicy, load_path},
//!     render::{CameraPose, PointCloudRenderer},
//!     schema::ViewerConfig,
//! };
//!
//! let config = ViewerConfig::default();
//! let loaded = load_path("frames/", LoadPolicy::Degrade).unwrap();
//!
//! let mut player = AnimationPlayer::new(PointCloudRenderer::new(&config.render), &config.playback);
//! player.set_frames(loaded.frames);
//! player.play();
//!
//! let camera = CameraPose::default();
//! player.sink_mut().update_camera(&camera);
//! player.tick(1.0 / 60.0);
//!
//! println!("{} batches", player.sink().batches().len());
//! ```

pub mod animation;
pub mod geometry;
pub mod render;
pub mod schema;
pub mod view;

// Re-export commonly used types
pub use animation::{AnimationPlayer, FrameSink};
pub use geometry::{LoadError, LoadPolicy, load_path};
pub use render::{CameraPose, PointBatchBuilder, PointCloudRenderer, Projection};
pub use schema::{FrameSet, PointRecord, PointSet, ViewerConfig};
pub use view::ViewFramer;
