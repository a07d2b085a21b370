//! Lights and darkness.
//!
//! `LightCompositor` turns a frame's light requests into a brightness surface;
//! `darkness` decides how dark the overlay makes the unlit parts of a level.

mod compositor;
mod darkness;
mod falloff;

pub use compositor::{LightCompositor, LightRequest};
pub use darkness::{
    dark_factor, dithered_dark, overlay_opacity, DayCycle, DayPhase, ALWAYS_DARK_LEVEL,
    DITHER_4X4, MAX_DARK, SKY_REDUCTION, SURFACE_LEVEL,
};
pub use falloff::{brightness_at, falloff};
