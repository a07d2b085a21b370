use crate::coords::SurfaceSize;
use crate::paint::ClearColor;
use crate::render::uniforms::LightingUniform;
use crate::render::{CommandSink, DrawCall};
use crate::target::{SurfaceId, TargetScope};

/// One light for the current frame, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LightRequest {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

/// Accumulates a frame's lights and renders them into its own surface.
///
/// Requests live for one frame: `resolve` consumes them, and a `Screen`
/// drops any left over when a new clear is queued or when it flushes.
#[derive(Debug)]
pub struct LightCompositor {
    surface: SurfaceId,
    size: SurfaceSize,
    pending: Vec<LightRequest>,
}

impl LightCompositor {
    pub fn new(surface: SurfaceId, size: SurfaceSize) -> Self {
        Self {
            surface,
            size,
            pending: Vec::new(),
        }
    }

    pub fn request(&mut self, x: i32, y: i32, radius: i32) {
        self.pending.push(LightRequest { x, y, radius });
    }

    pub fn pending(&self) -> &[LightRequest] {
        &self.pending
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub(crate) fn discard(&mut self) {
        self.pending.clear();
    }

    /// Renders the pending lights and returns the surface holding them.
    ///
    /// The surface is cleared to transparent first, so with no requests the
    /// result is uniformly unlit.
    pub fn resolve<S: CommandSink + ?Sized>(&mut self, sink: &mut S) -> SurfaceId {
        let mut scope = TargetScope::new(sink, self.surface);
        scope.submit(DrawCall::Clear(ClearColor::TRANSPARENT));

        let screen_size = self.size.to_f32();
        for light in self.pending.drain(..) {
            if light.radius <= 0 {
                continue;
            }
            scope.submit(DrawCall::Lighting(LightingUniform {
                center: [light.x as f32, light.y as f32],
                screen_size,
                radius: light.radius as f32,
                _pad: [0.0; 3],
            }));
        }

        log::trace!("lights resolved into {}", self.surface);
        self.surface
    }
}
