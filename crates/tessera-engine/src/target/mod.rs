//! Off-screen render targets and the stack that selects the active one.
//!
//! - `GpuSurface`: one texture + view with a fixed size
//! - `FramebufferStack`: LIFO of bound targets; empty means the window
//! - `TargetScope`: guard that pops what it pushed on every exit path

mod scope;
mod stack;
mod surface;

pub use scope::{BindTarget, TargetScope};
pub use stack::{Framebuffer, FramebufferStack};
pub use surface::{GpuSurface, SurfaceId, SURFACE_FORMAT};
