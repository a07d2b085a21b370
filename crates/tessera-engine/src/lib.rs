//! Tessera engine crate.
//!
//! Deferred 2D tile rendering on wgpu plus the fixed-timestep loop that
//! drives it:
//! - `scene::Screen` records drawing calls and replays them on flush
//! - `render` owns programs, images and surfaces and encodes frames
//! - `light` turns light requests and the day cycle into darkness
//! - `time` schedules ticks and frames
//! - `window` runs it all on a winit window

pub mod coords;
pub mod core;
pub mod device;
pub mod light;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod target;
pub mod time;
pub mod window;
