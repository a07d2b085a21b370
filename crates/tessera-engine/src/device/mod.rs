//! GPU device + window surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the window surface (swapchain)
//! - acquiring window frames and handing out an encoder + view
//!
//! Off-screen render targets live in `target`; this layer only knows about the
//! window.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
