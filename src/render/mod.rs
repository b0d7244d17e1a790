//! Render module - Camera model, billboard batching and GPU submission.

mod batch;
mod billboard;
mod camera;
mod overlay;
mod renderer;

pub mod gpu;

pub use batch::*;
pub use billboard::*;
pub use camera::*;
pub use overlay::*;
pub use renderer::*;
