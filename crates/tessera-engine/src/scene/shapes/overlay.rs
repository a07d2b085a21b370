use crate::light::{dark_factor, overlay_opacity, DayCycle};
use crate::render::uniforms::OverlayUniform;
use crate::render::DrawCall;
use crate::scene::{RenderCommand, Screen};
use crate::target::SurfaceId;

/// Darkness pass over the whole surface, resolved against the frame's lights.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayCmd {
    pub level: i32,
    /// Dither pattern shift.
    pub adjust: (i32, i32),
    pub dark_factor: f64,
}

impl OverlayCmd {
    pub(crate) fn draw_call(&self, lit: SurfaceId) -> DrawCall {
        DrawCall::Overlay {
            lit,
            uniform: OverlayUniform {
                adjust: [self.adjust.0, self.adjust.1],
                level: self.level,
                _pad0: 0,
                opacity: overlay_opacity(self.level, self.dark_factor),
                _pad1: [0.0; 3],
            },
        }
    }
}

impl Screen {
    /// Queues the darkness overlay for `level` at the cycle's current time.
    ///
    /// Lights requested before the flush reaches this command are composited
    /// into the overlay; the pattern shift `(xa, ya)` keeps the dither fixed
    /// to the world while the camera moves.
    pub fn overlay(&mut self, level: i32, xa: i32, ya: i32, cycle: &DayCycle) {
        let factor = dark_factor(level, cycle);
        self.enqueue(RenderCommand::Overlay(OverlayCmd {
            level,
            adjust: (xa, ya),
            dark_factor: factor,
        }));
    }

    /// Requests a light for this frame at world position `(x, y)`.
    pub fn render_light(&mut self, x: i32, y: i32, radius: i32) {
        let (x, y) = self.to_surface(x, y);
        self.lights.request(x, y, radius);
    }
}
