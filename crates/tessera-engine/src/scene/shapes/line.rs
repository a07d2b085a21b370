use crate::coords::SurfaceSize;
use crate::paint::Color;
use crate::render::uniforms::LineUniform;
use crate::render::DrawCall;
use crate::scene::{RenderCommand, Screen};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Solid line, inclusive endpoints in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineCmd {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: Color,
}

impl LineCmd {
    pub(crate) fn draw_call(&self, target: SurfaceSize) -> DrawCall {
        DrawCall::Line(LineUniform::new(
            target, self.x0, self.y0, self.x1, self.y1, self.color,
        ))
    }
}

/// Axis-aligned line that inverts whatever is already on the surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineSpecialCmd {
    pub x: i32,
    pub y: i32,
    pub length: i32,
    pub axis: Axis,
}

impl LineSpecialCmd {
    pub fn end(&self) -> (i32, i32) {
        match self.axis {
            Axis::X => (self.x.saturating_add(self.length), self.y),
            Axis::Y => (self.x, self.y.saturating_add(self.length)),
        }
    }

    pub(crate) fn draw_call(&self, target: SurfaceSize) -> DrawCall {
        let (x1, y1) = self.end();
        DrawCall::LineSpecial(LineUniform::new(
            target,
            self.x,
            self.y,
            x1,
            y1,
            Color::TRANSPARENT,
        ))
    }
}

impl Screen {
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (x0, y0) = self.to_surface(x0, y0);
        let (x1, y1) = self.to_surface(x1, y1);
        self.enqueue(RenderCommand::Line(LineCmd {
            x0,
            y0,
            x1,
            y1,
            color,
        }));
    }

    /// Line from `(x, y)` running `len` pixels along `axis`.
    pub fn draw_axis_line(&mut self, x: i32, y: i32, axis: Axis, len: i32, color: Color) {
        match axis {
            Axis::X => self.draw_line(x, y, x.saturating_add(len), y, color),
            Axis::Y => self.draw_line(x, y, x, y.saturating_add(len), color),
        }
    }

    /// Inverted line, used for selection markers that stay visible on any
    /// background.
    pub fn draw_line_special(&mut self, x: i32, y: i32, axis: Axis, len: i32) {
        let (x, y) = self.to_surface(x, y);
        self.enqueue(RenderCommand::LineSpecial(LineSpecialCmd {
            x,
            y,
            length: len,
            axis,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSink;
    use crate::scene::queue::tests::screen;

    fn calls(s: &mut Screen) -> Vec<DrawCall> {
        let mut sink = RecordingSink::default();
        s.flush(&mut sink);
        sink.calls.into_iter().skip(1).map(|(_, c)| c).collect()
    }

    #[test]
    fn axis_line_endpoints() {
        let mut s = screen();
        s.clear(0);
        s.draw_axis_line(4, 6, Axis::X, 10, Color::WHITE);
        s.draw_axis_line(4, 6, Axis::Y, 10, Color::WHITE);

        let size = s.size();
        assert_eq!(
            calls(&mut s),
            vec![
                DrawCall::Line(LineUniform::new(size, 4, 6, 14, 6, Color::WHITE)),
                DrawCall::Line(LineUniform::new(size, 4, 6, 4, 16, Color::WHITE)),
            ]
        );
    }

    #[test]
    fn line_offsets_both_endpoints() {
        let mut s = screen();
        s.clear(0);
        s.set_offset(2, 3);
        s.draw_line(2, 3, 12, 13, Color::BLACK);

        let size = s.size();
        assert_eq!(
            calls(&mut s),
            vec![DrawCall::Line(LineUniform::new(size, 0, 0, 10, 10, Color::BLACK))]
        );
    }

    #[test]
    fn special_line_runs_along_axis() {
        let cmd = LineSpecialCmd {
            x: 3,
            y: 4,
            length: 7,
            axis: Axis::Y,
        };
        assert_eq!(cmd.end(), (3, 11));

        let mut s = screen();
        s.clear(0);
        s.draw_line_special(3, 4, Axis::X, 7);
        match &calls(&mut s)[..] {
            [DrawCall::LineSpecial(u)] => {
                assert_eq!(u.point0, [3.0, 4.0]);
                assert_eq!(u.point1, [10.0, 4.0]);
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }
}
