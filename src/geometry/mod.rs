//! Geometry module - Vertex file parsing and frame loading.

mod loader;
mod parser;

pub use loader::*;
pub use parser::*;
