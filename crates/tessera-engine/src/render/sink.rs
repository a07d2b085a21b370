use crate::paint::ClearColor;
use crate::target::{BindTarget, SurfaceId};

use super::image::ImageId;
use super::uniforms::{
    BlitUniform, LightingUniform, LineUniform, OverlayUniform, RectUniform, SpriteUniform,
};
use super::ProgramKind;

/// One program invocation against the active target, uniforms resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(ClearColor),
    Sprite { sheet: ImageId, uniform: SpriteUniform },
    Rect(RectUniform),
    Line(LineUniform),
    LineSpecial(LineUniform),
    Lighting(LightingUniform),
    Overlay { lit: SurfaceId, uniform: OverlayUniform },
    Postprocess { source: SurfaceId, uniform: BlitUniform },
}

impl DrawCall {
    /// Program this call binds; `None` for clears.
    pub fn program(&self) -> Option<ProgramKind> {
        Some(match self {
            DrawCall::Clear(_) => return None,
            DrawCall::Sprite { .. } => ProgramKind::Sprite,
            DrawCall::Rect(_) => ProgramKind::Rect,
            DrawCall::Line(_) => ProgramKind::Line,
            DrawCall::LineSpecial(_) => ProgramKind::LineSpecial,
            DrawCall::Lighting(_) => ProgramKind::Lighting,
            DrawCall::Overlay { .. } => ProgramKind::Overlay,
            DrawCall::Postprocess { .. } => ProgramKind::Postprocess,
        })
    }
}

/// Receives draw calls for whatever target its framebuffer stack has bound.
///
/// `FrameRecorder` is the GPU implementation; tests use a recording sink.
pub trait CommandSink: BindTarget {
    fn submit(&mut self, call: DrawCall);
}
