//! Uniform contracts, one per program.
//!
//! Each struct mirrors the matching WGSL `struct` byte for byte (std140-style
//! alignment, explicit padding). Sizes are pinned by tests so a field change
//! on one side cannot silently drift from the other.

use bytemuck::{Pod, Zeroable};

use crate::coords::SurfaceSize;
use crate::paint::Color;

/// `flags` bit: replace pure-white texels with `white_tint`.
pub const SPRITE_WHITE_TINT: u32 = 1 << 0;
/// `flags` bit: replace every opaque texel's color with `color`.
pub const SPRITE_COLOR_OVERRIDE: u32 = 1 << 1;

/// Alpha written by full-bright sprites.
///
/// The overlay program treats any destination pixel below
/// `FULL_BRIGHT_THRESHOLD` as exempt from darkness; ordinary sprites write 1.0.
pub const FULL_BRIGHT_ALPHA: f32 = 252.0 / 255.0;
pub const FULL_BRIGHT_THRESHOLD: f32 = 253.5 / 255.0;

/// Sprite program.
///
/// `position` and `size` are normalized to the target surface; `tex_offset`
/// and `tex_size` are in sheet texels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteUniform {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub tex_offset: [f32; 2],
    pub tex_size: [f32; 2],
    pub white_tint: [f32; 4],
    pub color: [f32; 4],
    pub mirror: [u32; 2],
    pub full_bright: u32,
    pub flags: u32,
}

/// Rect program: normalized position + size, solid color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct RectUniform {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectUniform {
    pub fn new(target: SurfaceSize, x: i32, y: i32, w: i32, h: i32, color: Color) -> Self {
        Self {
            position: target.normalize(x, y),
            size: target.normalize(w, h),
            color: color.to_array(),
        }
    }
}

/// Line and LineSpecial programs. Endpoints are in target pixels and both are
/// inclusive. LineSpecial ignores `color`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LineUniform {
    pub point0: [f32; 2],
    pub point1: [f32; 2],
    pub screen_size: [f32; 2],
    pub _pad: [f32; 2],
    pub color: [f32; 4],
}

impl LineUniform {
    pub fn new(target: SurfaceSize, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Self {
        Self {
            point0: [x0 as f32, y0 as f32],
            point1: [x1 as f32, y1 as f32],
            screen_size: target.to_f32(),
            _pad: [0.0; 2],
            color: color.to_array(),
        }
    }
}

/// Lighting program: one radial light, centre and radius in target pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub center: [f32; 2],
    pub screen_size: [f32; 2],
    pub radius: f32,
    pub _pad: [f32; 3],
}

/// Overlay program: darkness pass over a whole surface.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct OverlayUniform {
    /// Dither pattern shift, so the pattern scrolls with the world.
    pub adjust: [i32; 2],
    pub level: i32,
    pub _pad0: i32,
    pub opacity: f32,
    pub _pad1: [f32; 3],
}

/// Postprocess program: textured quad under an affine transform.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlitUniform {
    /// Column-major clip-space transform applied to the unit quad.
    pub transform: [[f32; 4]; 4],
    /// Non-zero forces output alpha to 1 (presenting to the window).
    pub opaque: u32,
    pub _pad: [u32; 3],
}

impl BlitUniform {
    pub fn identity() -> Self {
        Self::scaled(1.0, 1.0)
    }

    /// Largest centred fit of `source` inside `target` keeping the aspect
    /// ratio; the uncovered bands keep whatever the target holds.
    pub fn fit(source: SurfaceSize, target: SurfaceSize) -> Self {
        if !source.is_valid() || !target.is_valid() {
            return Self::identity();
        }
        let [sw, sh] = source.to_f32();
        let [tw, th] = target.to_f32();
        let scale = (tw / sw).min(th / sh);
        Self::scaled(sw * scale / tw, sh * scale / th)
    }

    fn scaled(sx: f32, sy: f32) -> Self {
        Self {
            transform: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            opaque: 0,
            _pad: [0; 3],
        }
    }

    pub fn opaque(mut self) -> Self {
        self.opaque = 1;
        self
    }

    /// Horizontal and vertical scale factors in clip space.
    pub fn scale(&self) -> [f32; 2] {
        [self.transform[0][0], self.transform[1][1]]
    }
}
