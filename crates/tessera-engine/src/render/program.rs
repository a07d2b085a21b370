use std::fmt;

use super::uniforms::{
    BlitUniform, LightingUniform, LineUniform, OverlayUniform, RectUniform, SpriteUniform,
};

/// The fixed set of shader programs.
///
/// Every program draws the shared unit quad, reads its uniform block from
/// group 0 (dynamic offset into the frame's uniform arena) and, when it samples
/// textures, reads them from group 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProgramKind {
    Sprite,
    Rect,
    Line,
    LineSpecial,
    Overlay,
    Lighting,
    Postprocess,
}

/// What a group-1 binding holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureSlot {
    /// Non-filterable float texture read with `textureLoad`.
    Texel,
    /// Filterable float texture read with `textureSample`.
    Sampled,
    Sampler,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 7] = [
        ProgramKind::Sprite,
        ProgramKind::Rect,
        ProgramKind::Line,
        ProgramKind::LineSpecial,
        ProgramKind::Overlay,
        ProgramKind::Lighting,
        ProgramKind::Postprocess,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProgramKind::Sprite => "sprite",
            ProgramKind::Rect => "rect",
            ProgramKind::Line => "line",
            ProgramKind::LineSpecial => "line-special",
            ProgramKind::Overlay => "overlay",
            ProgramKind::Lighting => "lighting",
            ProgramKind::Postprocess => "postprocess",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            ProgramKind::Sprite => include_str!("shaders/sprite.wgsl"),
            ProgramKind::Rect => include_str!("shaders/rect.wgsl"),
            ProgramKind::Line => include_str!("shaders/line.wgsl"),
            ProgramKind::LineSpecial => include_str!("shaders/line_special.wgsl"),
            ProgramKind::Overlay => include_str!("shaders/overlay.wgsl"),
            ProgramKind::Lighting => include_str!("shaders/lighting.wgsl"),
            ProgramKind::Postprocess => include_str!("shaders/postprocess.wgsl"),
        }
    }

    /// Byte size of the program's uniform block.
    pub fn uniform_size(self) -> u64 {
        let size = match self {
            ProgramKind::Sprite => std::mem::size_of::<SpriteUniform>(),
            ProgramKind::Rect => std::mem::size_of::<RectUniform>(),
            ProgramKind::Line | ProgramKind::LineSpecial => std::mem::size_of::<LineUniform>(),
            ProgramKind::Overlay => std::mem::size_of::<OverlayUniform>(),
            ProgramKind::Lighting => std::mem::size_of::<LightingUniform>(),
            ProgramKind::Postprocess => std::mem::size_of::<BlitUniform>(),
        };
        size as u64
    }

    /// Group-1 bindings in binding order; empty when the program samples nothing.
    pub fn texture_slots(self) -> &'static [TextureSlot] {
        match self {
            ProgramKind::Sprite | ProgramKind::LineSpecial => &[TextureSlot::Texel],
            ProgramKind::Overlay => &[TextureSlot::Texel, TextureSlot::Texel, TextureSlot::Texel],
            ProgramKind::Postprocess => &[TextureSlot::Sampled, TextureSlot::Sampler],
            ProgramKind::Rect | ProgramKind::Line | ProgramKind::Lighting => &[],
        }
    }

    /// Whether the program reads a copy of its own target.
    pub fn reads_target(self) -> bool {
        matches!(self, ProgramKind::LineSpecial | ProgramKind::Overlay)
    }

    pub fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            ProgramKind::Lighting => Some(max_blend()),
            ProgramKind::Postprocess => Some(wgpu::BlendState::ALPHA_BLENDING),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Brightest-wins accumulation for the light surface.
fn max_blend() -> wgpu::BlendState {
    let max = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Max,
    };
    wgpu::BlendState {
        color: max,
        alpha: max,
    }
}
