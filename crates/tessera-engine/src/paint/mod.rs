//! Color model shared between the render queue and the shader uniforms.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::{ClearColor, Color};
