use crate::coords::SurfaceSize;
use crate::paint::Color;
use crate::render::uniforms::RectUniform;
use crate::render::DrawCall;
use crate::scene::{RenderCommand, Screen};

/// Rectangle draw payload, surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectCmd {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub color: Color,
}

impl RectCmd {
    pub(crate) fn fill_call(&self, target: SurfaceSize) -> DrawCall {
        DrawCall::Rect(RectUniform::new(
            target, self.x, self.y, self.w, self.h, self.color,
        ))
    }

    /// Four one-pixel edges: top, left, bottom, right.
    pub(crate) fn outline_calls(&self, target: SurfaceSize) -> impl Iterator<Item = DrawCall> {
        let RectCmd { x, y, w, h, color } = *self;
        [
            (x, y, w, 1),
            (x, y, 1, h),
            (x, y.saturating_add(h.saturating_sub(1)), w, 1),
            (x.saturating_add(w.saturating_sub(1)), y, 1, h),
        ]
        .into_iter()
        .map(move |(x, y, w, h)| DrawCall::Rect(RectUniform::new(target, x, y, w, h, color)))
    }
}

impl Screen {
    /// Queues a solid rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x, y) = self.to_surface(x, y);
        self.enqueue(RenderCommand::FillRect(RectCmd { x, y, w, h, color }));
    }

    /// Queues a one-pixel rectangle outline.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x, y) = self.to_surface(x, y);
        self.enqueue(RenderCommand::DrawRect(RectCmd { x, y, w, h, color }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSink;
    use crate::scene::queue::tests::screen;

    fn rects(s: &mut Screen) -> Vec<RectUniform> {
        let mut sink = RecordingSink::default();
        s.flush(&mut sink);
        sink.calls
            .into_iter()
            .filter_map(|(_, call)| match call {
                DrawCall::Rect(u) => Some(u),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn outline_is_four_edges() {
        let mut s = screen();
        s.clear(0);
        s.draw_rect(10, 20, 30, 40, Color::WHITE);

        let size = s.size();
        let edges = rects(&mut s);
        let expect = |x, y, w, h| RectUniform::new(size, x, y, w, h, Color::WHITE);
        assert_eq!(
            edges,
            vec![
                expect(10, 20, 30, 1),
                expect(10, 20, 1, 40),
                expect(10, 59, 30, 1),
                expect(39, 20, 1, 40),
            ]
        );
    }

    #[test]
    fn fill_applies_offset() {
        let mut s = screen();
        s.clear(0);
        s.set_offset(-5, 5);
        s.fill_rect(0, 10, 8, 8, Color::BLACK);

        let size = s.size();
        assert_eq!(
            rects(&mut s),
            vec![RectUniform::new(size, 5, 5, 8, 8, Color::BLACK)]
        );
    }
}
