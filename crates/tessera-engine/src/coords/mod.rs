//! Integer pixel geometry shared by the render queue and the GPU layer.
//!
//! Canonical CPU space:
//! - surface pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! Shaders receive positions either normalized to the target size or in raw
//! pixels; each uniform contract documents which.

mod rect;
mod size;

pub use rect::Rect;
pub use size::SurfaceSize;
