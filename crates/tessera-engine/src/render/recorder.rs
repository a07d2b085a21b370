//! CPU-side recording of one frame.
//!
//! Draw calls arrive in replay order against whatever the framebuffer stack
//! has bound. The recorder groups them into render passes (one per run of
//! draws on the same target), inserts target snapshots for programs that read
//! their own target, and packs every uniform block into one arena that is
//! uploaded in a single write before encoding.

use bytemuck::Pod;

use crate::paint::ClearColor;
use crate::target::{BindTarget, Framebuffer, FramebufferStack, SurfaceId};

use super::image::ImageId;
use super::sink::{CommandSink, DrawCall};
use super::ProgramKind;

/// Textures a recorded draw binds in group 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum DrawInputs {
    None,
    Sheet(ImageId),
    /// The snapshot copied right before the pass.
    Snapshot,
    Overlay { lit: SurfaceId },
    Blit { source: SurfaceId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedDraw {
    pub program: ProgramKind,
    pub uniform_offset: u32,
    pub inputs: DrawInputs,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderPassRecord {
    pub target: Framebuffer,
    /// `Some` when the pass starts with a clear; otherwise the target is loaded.
    pub clear: Option<ClearColor>,
    pub draws: Vec<RecordedDraw>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PassOp {
    Render(RenderPassRecord),
    /// Copy `source` into the snapshot texture.
    Snapshot { source: SurfaceId },
}

/// Uniform blocks packed at the device's dynamic-offset alignment.
#[derive(Debug, Default)]
pub(crate) struct UniformArena {
    bytes: Vec<u8>,
    alignment: usize,
}

impl UniformArena {
    pub(crate) fn new(alignment: u32) -> Self {
        Self {
            bytes: Vec::new(),
            alignment: alignment.max(1) as usize,
        }
    }

    pub(crate) fn push<T: Pod>(&mut self, value: &T) -> u32 {
        let offset = self.bytes.len().next_multiple_of(self.alignment);
        self.bytes.resize(offset, 0);
        self.bytes.extend_from_slice(bytemuck::bytes_of(value));
        offset as u32
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Records a frame's draw calls for `Renderer::encode`.
pub struct FrameRecorder {
    framebuffers: FramebufferStack,
    pub(crate) ops: Vec<PassOp>,
    pub(crate) arena: UniformArena,
}

impl FrameRecorder {
    pub(crate) fn new(uniform_alignment: u32) -> Self {
        Self {
            framebuffers: FramebufferStack::new(),
            ops: Vec::new(),
            arena: UniformArena::new(uniform_alignment),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of recorded draws, clears excluded.
    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                PassOp::Render(pass) => pass.draws.len(),
                PassOp::Snapshot { .. } => 0,
            })
            .sum()
    }

    fn open_pass(&mut self, target: Framebuffer, clear: Option<ClearColor>) {
        self.ops.push(PassOp::Render(RenderPassRecord {
            target,
            clear,
            draws: Vec::new(),
        }));
    }

    /// Appends to the last pass when it targets `target`, else opens a new one.
    fn push_draw(&mut self, target: Framebuffer, draw: RecordedDraw) {
        if let Some(PassOp::Render(pass)) = self.ops.last_mut() {
            if pass.target == target {
                pass.draws.push(draw);
                return;
            }
        }
        self.ops.push(PassOp::Render(RenderPassRecord {
            target,
            clear: None,
            draws: vec![draw],
        }));
    }

    fn record<T: Pod>(&mut self, program: ProgramKind, uniform: &T, inputs: DrawInputs) {
        let target = self.framebuffers.active();

        if let Framebuffer::Surface(id) = target {
            let samples_target = match inputs {
                DrawInputs::Overlay { lit } => lit == id,
                DrawInputs::Blit { source } => source == id,
                _ => false,
            };
            if samples_target {
                log::warn!("{program} draw samples {id} while rendering into it; skipped");
                return;
            }
        }

        if program.reads_target() {
            let Framebuffer::Surface(source) = target else {
                log::warn!("{program} draw needs a copy of its target; the window has none, skipped");
                return;
            };
            self.ops.push(PassOp::Snapshot { source });
        }

        let uniform_offset = self.arena.push(uniform);
        self.push_draw(
            target,
            RecordedDraw {
                program,
                uniform_offset,
                inputs,
            },
        );
    }
}

impl BindTarget for FrameRecorder {
    fn framebuffers(&mut self) -> &mut FramebufferStack {
        &mut self.framebuffers
    }
}

impl CommandSink for FrameRecorder {
    fn submit(&mut self, call: DrawCall) {
        match call {
            DrawCall::Clear(color) => {
                let target = self.framebuffers.active();
                self.open_pass(target, Some(color));
            }
            DrawCall::Sprite { sheet, uniform } => {
                self.record(ProgramKind::Sprite, &uniform, DrawInputs::Sheet(sheet))
            }
            DrawCall::Rect(u) => self.record(ProgramKind::Rect, &u, DrawInputs::None),
            DrawCall::Line(u) => self.record(ProgramKind::Line, &u, DrawInputs::None),
            DrawCall::LineSpecial(u) => {
                self.record(ProgramKind::LineSpecial, &u, DrawInputs::Snapshot)
            }
            DrawCall::Lighting(u) => self.record(ProgramKind::Lighting, &u, DrawInputs::None),
            DrawCall::Overlay { lit, uniform } => {
                self.record(ProgramKind::Overlay, &uniform, DrawInputs::Overlay { lit })
            }
            DrawCall::Postprocess { source, uniform } => {
                self.record(ProgramKind::Postprocess, &uniform, DrawInputs::Blit { source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::uniforms::{BlitUniform, LineUniform, OverlayUniform, RectUniform};
    use crate::target::TargetScope;

    fn passes(rec: &FrameRecorder) -> Vec<&RenderPassRecord> {
        rec.ops
            .iter()
            .filter_map(|op| match op {
                PassOp::Render(p) => Some(p),
                PassOp::Snapshot { .. } => None,
            })
            .collect()
    }

    #[test]
    fn arena_offsets_respect_alignment() {
        let mut arena = UniformArena::new(256);
        assert_eq!(arena.push(&RectUniform::default()), 0);
        assert_eq!(arena.push(&RectUniform::default()), 256);
        assert_eq!(arena.push(&LineUniform::default()), 512);
        assert_eq!(arena.bytes().len(), 512 + 48);
    }

    #[test]
    fn consecutive_draws_share_a_pass() {
        let mut rec = FrameRecorder::new(256);
        {
            let mut scope = TargetScope::new(&mut rec, SurfaceId(0));
            scope.submit(DrawCall::Clear(ClearColor::Plain));
            scope.submit(DrawCall::Rect(RectUniform::default()));
            scope.submit(DrawCall::Line(LineUniform::default()));
        }
        let p = passes(&rec);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].target, Framebuffer::Surface(SurfaceId(0)));
        assert_eq!(p[0].clear, Some(ClearColor::Plain));
        assert_eq!(p[0].draws.len(), 2);
        assert_eq!(rec.draw_count(), 2);
    }

    #[test]
    fn nested_target_splits_and_resumes_with_load() {
        let mut rec = FrameRecorder::new(256);
        {
            let mut outer = TargetScope::new(&mut rec, SurfaceId(0));
            outer.submit(DrawCall::Clear(ClearColor::Plain));
            outer.submit(DrawCall::Rect(RectUniform::default()));
            {
                let mut inner = TargetScope::new(&mut *outer, SurfaceId(1));
                inner.submit(DrawCall::Clear(ClearColor::TRANSPARENT));
            }
            outer.submit(DrawCall::Rect(RectUniform::default()));
        }
        let p = passes(&rec);
        let targets: Vec<_> = p.iter().map(|p| p.target).collect();
        assert_eq!(
            targets,
            vec![
                Framebuffer::Surface(SurfaceId(0)),
                Framebuffer::Surface(SurfaceId(1)),
                Framebuffer::Surface(SurfaceId(0)),
            ]
        );
        assert_eq!(p[2].clear, None);
    }

    #[test]
    fn target_readers_snapshot_first() {
        let mut rec = FrameRecorder::new(256);
        {
            let mut scope = TargetScope::new(&mut rec, SurfaceId(2));
            scope.submit(DrawCall::Clear(ClearColor::Plain));
            scope.submit(DrawCall::LineSpecial(LineUniform::default()));
        }
        assert!(matches!(rec.ops[0], PassOp::Render(_)));
        assert_eq!(rec.ops[1], PassOp::Snapshot { source: SurfaceId(2) });
        match &rec.ops[2] {
            PassOp::Render(pass) => {
                assert_eq!(pass.clear, None);
                assert_eq!(pass.draws[0].inputs, DrawInputs::Snapshot);
            }
            other => panic!("expected a render pass, got {other:?}"),
        }
    }

    #[test]
    fn window_cannot_be_read_back() {
        let mut rec = FrameRecorder::new(256);
        rec.submit(DrawCall::Overlay {
            lit: SurfaceId(1),
            uniform: OverlayUniform::default(),
        });
        assert!(rec.is_empty());
    }

    #[test]
    fn blit_into_its_own_source_is_skipped() {
        let mut rec = FrameRecorder::new(256);
        {
            let mut scope = TargetScope::new(&mut rec, SurfaceId(4));
            scope.submit(DrawCall::Postprocess {
                source: SurfaceId(4),
                uniform: BlitUniform::identity(),
            });
        }
        assert_eq!(rec.draw_count(), 0);
    }

    #[test]
    fn blit_to_window_records() {
        let mut rec = FrameRecorder::new(256);
        rec.submit(DrawCall::Clear(ClearColor::Plain));
        rec.submit(DrawCall::Postprocess {
            source: SurfaceId(0),
            uniform: BlitUniform::identity(),
        });
        let p = passes(&rec);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].target, Framebuffer::Window);
        assert_eq!(
            p[0].draws[0].inputs,
            DrawInputs::Blit {
                source: SurfaceId(0)
            }
        );
    }
}
