//! View module - Subject framing, camera reset transitions and polling cadence.

mod framer;
mod schedule;
mod tween;

pub use framer::*;
pub use schedule::*;
pub use tween::*;
