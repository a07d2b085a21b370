//! GPU rendering subsystem.
//!
//! - `ProgramKind` + WGSL sources: the fixed program set and its uniform contracts
//! - `FrameRecorder`: CPU recording of draw calls into passes
//! - `Renderer`: owns surfaces, sheets and pipelines; encodes recorded frames
//!
//! Convention:
//! - CPU geometry is in surface pixels (top-left origin, +Y down).
//! - Every program draws the same unit quad; its uniform block places it.

mod ctx;
mod error;
mod image;
mod program;
mod quad;
mod recorder;
mod registry;
mod renderer;
mod sink;
pub mod uniforms;
pub mod validate;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::{ImageError, ShaderError};
pub use image::{missing_placeholder, ImageId, PixelBuffer, SpriteSheet, CELL};
pub use program::{ProgramKind, TextureSlot};
pub use recorder::FrameRecorder;
pub use renderer::Renderer;
pub use sink::{CommandSink, DrawCall};

#[cfg(test)]
pub(crate) use sink::testing;
