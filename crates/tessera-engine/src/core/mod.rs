//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop +
//! scheduler) and the game: the `App` callbacks and the per-frame context
//! used to present render queues to the window.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
