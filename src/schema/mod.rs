//! Schema module - Point data model and viewer configuration.

mod config;
mod point;

pub use config::*;
pub use point::*;
