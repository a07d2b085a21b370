use crate::coords::SurfaceSize;
use crate::paint::ClearColor;
use crate::render::uniforms::BlitUniform;
use crate::render::{CommandSink, DrawCall, FrameRecorder};
use crate::scene::Screen;
use crate::target::TargetScope;
use crate::time::FrameStats;

/// Per-frame context passed to `core::App::render`.
pub struct FrameCtx<'a> {
    /// Sink every `Screen::flush` of this frame records into.
    pub recorder: &'a mut FrameRecorder,
    /// Window size in physical pixels.
    pub window_size: SurfaceSize,
    pub stats: FrameStats,
}

impl<'a> FrameCtx<'a> {
    /// Draws `screen` onto the window, scaled up as far as it fits with its
    /// aspect ratio kept; the remaining bands are black.
    pub fn present(&mut self, screen: &Screen) {
        present_into(&mut *self.recorder, self.window_size, screen);
    }

    /// Alpha-blends all of `source` over `onto` at the same size, e.g. a GUI
    /// layer over the world.
    pub fn composite(&mut self, source: &Screen, onto: &Screen) {
        composite_into(&mut *self.recorder, source, onto);
    }
}

fn present_into<S: CommandSink + ?Sized>(sink: &mut S, window: SurfaceSize, screen: &Screen) {
    if !sink.framebuffers().is_empty() {
        log::error!("present with {} surfaces still bound", sink.framebuffers().depth());
        return;
    }
    sink.submit(DrawCall::Clear(ClearColor::Plain));
    sink.submit(DrawCall::Postprocess {
        source: screen.surface(),
        uniform: BlitUniform::fit(screen.size(), window).opaque(),
    });
}

fn composite_into<S: CommandSink + ?Sized>(sink: &mut S, source: &Screen, onto: &Screen) {
    if source.size() != onto.size() {
        log::warn!(
            "compositing {} ({:?}) onto {} ({:?}) stretches it",
            source.surface(),
            source.size(),
            onto.surface(),
            onto.size()
        );
    }
    let mut scope = TargetScope::new(sink, onto.surface());
    scope.submit(DrawCall::Postprocess {
        source: source.surface(),
        uniform: BlitUniform::identity(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightCompositor;
    use crate::render::testing::RecordingSink;
    use crate::render::{ImageId, SpriteSheet};
    use crate::target::{Framebuffer, SurfaceId};

    fn screen(id: u32) -> Screen {
        let size = SurfaceSize::new(288, 192);
        let missing = SpriteSheet {
            id: ImageId(0),
            width: 8,
            height: 8,
        };
        Screen::new(
            SurfaceId(id),
            size,
            missing,
            LightCompositor::new(SurfaceId(id + 1), size),
        )
    }

    #[test]
    fn present_clears_window_and_letterboxes() {
        let mut sink = RecordingSink::default();
        let world = screen(0);
        present_into(&mut sink, SurfaceSize::new(1920, 1080), &world);

        assert_eq!(sink.calls.len(), 2);
        assert!(sink.calls.iter().all(|(t, _)| *t == Framebuffer::Window));
        assert_eq!(sink.calls[0].1, DrawCall::Clear(ClearColor::Plain));
        match &sink.calls[1].1 {
            DrawCall::Postprocess { source, uniform } => {
                assert_eq!(*source, SurfaceId(0));
                assert_eq!(uniform.opaque, 1);
                // 288x192 scaled by 5.625 fills the height; 1620 of 1920 wide.
                assert_eq!(uniform.scale()[1], 1.0);
                assert!((uniform.scale()[0] - 1620.0 / 1920.0).abs() < 1e-6);
            }
            other => panic!("expected postprocess, got {other:?}"),
        }
    }

    #[test]
    fn composite_targets_the_destination() {
        let mut sink = RecordingSink::default();
        let (gui, world) = (screen(4), screen(0));
        composite_into(&mut sink, &gui, &world);

        assert_eq!(
            sink.calls,
            vec![(
                Framebuffer::Surface(SurfaceId(0)),
                DrawCall::Postprocess {
                    source: SurfaceId(4),
                    uniform: BlitUniform::identity(),
                }
            )]
        );
        assert!(sink.stack.is_empty());
    }
}
