use std::ops::BitXor;

use crate::coords::{Rect, SurfaceSize};
use crate::paint::Color;
use crate::render::uniforms::{
    SpriteUniform, SPRITE_COLOR_OVERRIDE, SPRITE_WHITE_TINT,
};
use crate::render::{DrawCall, SpriteSheet, CELL};
use crate::scene::{RenderCommand, Screen};

/// Horizontal / vertical flip.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mirror {
    pub x: bool,
    pub y: bool,
}

impl Mirror {
    pub const NONE: Mirror = Mirror { x: false, y: false };
    pub const X: Mirror = Mirror { x: true, y: false };
    pub const Y: Mirror = Mirror { x: false, y: true };
    pub const XY: Mirror = Mirror { x: true, y: true };

    /// Bit 0 flips X, bit 1 flips Y.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            x: bits & 1 != 0,
            y: bits & 2 != 0,
        }
    }
}

impl BitXor for Mirror {
    type Output = Mirror;

    fn bitxor(self, rhs: Mirror) -> Mirror {
        Mirror {
            x: self.x ^ rhs.x,
            y: self.y ^ rhs.y,
        }
    }
}

/// Per-draw sprite options.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SpriteStyle {
    pub mirror: Mirror,
    /// Replaces pure-white texels.
    pub white_tint: Option<Color>,
    /// Skips the darkness overlay for these pixels.
    pub full_bright: bool,
    /// Replaces the color of every opaque texel.
    pub color: Option<Color>,
}

impl SpriteStyle {
    pub fn mirrored(mirror: Mirror) -> Self {
        Self {
            mirror,
            ..Self::default()
        }
    }
}

/// One 8x8 cell of a composite sprite.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteCell {
    /// Cell column / row in the sheet.
    pub x: i32,
    pub y: i32,
    pub mirror: Mirror,
    pub sheet: SpriteSheet,
}

/// Grid of cells drawn as one unit, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub cells: Vec<Vec<SpriteCell>>,
    /// White tint applied to every cell.
    pub white_tint: Option<Color>,
}

/// Sprite draw payload: a texel rectangle of a sheet at a surface position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub x: i32,
    pub y: i32,
    pub sheet: SpriteSheet,
    pub src: Rect,
    pub style: SpriteStyle,
}

impl SpriteCmd {
    pub(crate) fn draw_call(&self, target: SurfaceSize) -> DrawCall {
        let style = &self.style;
        let mut flags = 0;
        if style.white_tint.is_some() {
            flags |= SPRITE_WHITE_TINT;
        }
        if style.color.is_some() {
            flags |= SPRITE_COLOR_OVERRIDE;
        }

        DrawCall::Sprite {
            sheet: self.sheet.id,
            uniform: SpriteUniform {
                position: target.normalize(self.x, self.y),
                size: target.normalize(self.src.w, self.src.h),
                tex_offset: [self.src.x as f32, self.src.y as f32],
                tex_size: [self.src.w as f32, self.src.h as f32],
                white_tint: style.white_tint.unwrap_or_default().to_array(),
                color: style.color.unwrap_or_default().to_array(),
                mirror: [style.mirror.x as u32, style.mirror.y as u32],
                full_bright: style.full_bright as u32,
                flags,
            },
        }
    }
}

impl Screen {
    /// Queues texels `src` of `sheet` at world position `(x, y)`.
    ///
    /// A rectangle that is empty or not fully inside the sheet draws the
    /// placeholder cell instead; only the mirror is kept from `style`.
    pub fn render_texels(
        &mut self,
        x: i32,
        y: i32,
        sheet: SpriteSheet,
        src: Rect,
        style: SpriteStyle,
    ) {
        let (x, y) = self.to_surface(x, y);
        let src = src.normalized();

        let cmd = if sheet.bounds().contains_rect(src) {
            SpriteCmd {
                x,
                y,
                sheet,
                src,
                style,
            }
        } else {
            log::trace!(
                "texels {src:?} outside {}x{} sheet; using placeholder",
                sheet.width,
                sheet.height
            );
            SpriteCmd {
                x,
                y,
                sheet: self.missing,
                src: Rect::new(0, 0, CELL as i32, CELL as i32),
                style: SpriteStyle::mirrored(style.mirror),
            }
        };
        self.enqueue(RenderCommand::Sprite(cmd));
    }

    /// Queues sheet cell `(cx, cy)` at world position `(x, y)`.
    ///
    /// A cell index whose texel position does not fit in `i32` draws the
    /// placeholder, like any other cell outside the sheet.
    pub fn render_cell(
        &mut self,
        x: i32,
        y: i32,
        sheet: SpriteSheet,
        cx: i32,
        cy: i32,
        style: SpriteStyle,
    ) {
        let c = CELL as i32;
        let src = match (cx.checked_mul(c), cy.checked_mul(c)) {
            (Some(tx), Some(ty)) => Rect::new(tx, ty, c, c),
            _ => Rect::default(),
        };
        self.render_texels(x, y, sheet, src, style);
    }

    /// Queues a composite sprite with its top-left cell at `(x, y)`.
    ///
    /// A global mirror reverses the traversal so the whole grid flips, and is
    /// XOR'd with each cell's own mirror so every cell flips in place too.
    pub fn render_sprite(
        &mut self,
        x: i32,
        y: i32,
        sprite: &Sprite,
        mirror: Mirror,
        full_bright: bool,
        color: Option<Color>,
    ) {
        let c = CELL as i32;
        let rows = sprite.cells.len();
        for r in 0..rows {
            let row = &sprite.cells[if mirror.y { rows - 1 - r } else { r }];
            let cols = row.len();
            for col in 0..cols {
                let cell = row[if mirror.x { cols - 1 - col } else { col }];
                let style = SpriteStyle {
                    mirror: cell.mirror ^ mirror,
                    white_tint: sprite.white_tint,
                    full_bright,
                    color,
                };
                self.render_cell(
                    x.saturating_add(col as i32 * c),
                    y.saturating_add(r as i32 * c),
                    cell.sheet,
                    cell.x,
                    cell.y,
                    style,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingSink;
    use crate::render::ImageId;
    use crate::scene::queue::tests::screen;

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            id: ImageId(3),
            width: 32,
            height: 16,
        }
    }

    fn sprites(s: &mut Screen) -> Vec<(ImageId, SpriteUniform)> {
        let mut sink = RecordingSink::default();
        s.flush(&mut sink);
        sink.calls
            .into_iter()
            .filter_map(|(_, call)| match call {
                DrawCall::Sprite { sheet, uniform } => Some((sheet, uniform)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn out_of_bounds_texels_use_placeholder() {
        let mut s = screen();
        s.clear(0);
        let style = SpriteStyle {
            mirror: Mirror::X,
            white_tint: Some(Color::WHITE),
            full_bright: true,
            color: None,
        };
        let small = SpriteSheet {
            id: ImageId(2),
            width: 16,
            height: 16,
        };
        s.render_texels(10, 10, small, Rect::new(20, 20, 16, 16), style);

        let drawn = sprites(&mut s);
        assert_eq!(drawn.len(), 1);
        let (id, u) = drawn[0];
        assert_eq!(id, ImageId(0));
        assert_eq!(u.position, SurfaceSize::new(160, 120).normalize(10, 10));
        assert_eq!(u.tex_offset, [0.0, 0.0]);
        assert_eq!(u.tex_size, [8.0, 8.0]);
        assert_eq!(u.mirror, [1, 0]);
        assert_eq!(u.full_bright, 0);
        assert_eq!(u.flags, 0);
    }

    #[test]
    fn partially_outside_is_also_redirected() {
        let mut s = screen();
        s.clear(0);
        s.render_texels(0, 0, sheet(), Rect::new(28, 0, 8, 8), SpriteStyle::default());
        assert_eq!(sprites(&mut s)[0].0, ImageId(0));
    }

    #[test]
    fn cell_maps_to_texels_and_applies_offset() {
        let mut s = screen();
        s.clear(0);
        s.set_offset(40, 30);
        s.render_cell(80, 90, sheet(), 2, 1, SpriteStyle::default());

        let (id, u) = sprites(&mut s)[0];
        assert_eq!(id, ImageId(3));
        assert_eq!(u.tex_offset, [16.0, 8.0]);
        assert_eq!(u.position, SurfaceSize::new(160, 120).normalize(40, 60));
        assert_eq!(u.size, SurfaceSize::new(160, 120).normalize(8, 8));
    }

    #[test]
    fn offset_is_not_retroactive() {
        let mut s = screen();
        s.clear(0);
        s.render_cell(8, 8, sheet(), 0, 0, SpriteStyle::default());
        s.set_offset(8, 8);
        s.render_cell(8, 8, sheet(), 0, 0, SpriteStyle::default());

        let drawn = sprites(&mut s);
        let size = SurfaceSize::new(160, 120);
        assert_eq!(drawn[0].1.position, size.normalize(8, 8));
        assert_eq!(drawn[1].1.position, size.normalize(0, 0));
    }

    #[test]
    fn style_flags_reach_uniform() {
        let mut s = screen();
        s.clear(0);
        let style = SpriteStyle {
            mirror: Mirror::Y,
            white_tint: Some(Color::from_rgb24(0x00ff00)),
            full_bright: true,
            color: Some(Color::BLACK),
        };
        s.render_cell(0, 0, sheet(), 0, 0, style);

        let (_, u) = sprites(&mut s)[0];
        assert_eq!(u.mirror, [0, 1]);
        assert_eq!(u.full_bright, 1);
        assert_eq!(u.flags, SPRITE_WHITE_TINT | SPRITE_COLOR_OVERRIDE);
        assert_eq!(u.white_tint, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn composite_mirror_reverses_cells_and_flips_each() {
        let a = SpriteCell {
            x: 0,
            y: 0,
            mirror: Mirror::NONE,
            sheet: sheet(),
        };
        let b = SpriteCell {
            x: 1,
            y: 0,
            mirror: Mirror::X,
            sheet: sheet(),
        };
        let sprite = Sprite {
            cells: vec![vec![a, b]],
            white_tint: None,
        };

        let mut s = screen();
        s.clear(0);
        s.render_sprite(0, 0, &sprite, Mirror::X, false, None);

        let drawn = sprites(&mut s);
        let size = SurfaceSize::new(160, 120);
        // Left slot now shows cell b, flipped back to unmirrored.
        assert_eq!(drawn[0].1.position, size.normalize(0, 0));
        assert_eq!(drawn[0].1.tex_offset, [8.0, 0.0]);
        assert_eq!(drawn[0].1.mirror, [0, 0]);
        // Right slot shows cell a, mirrored.
        assert_eq!(drawn[1].1.position, size.normalize(8, 0));
        assert_eq!(drawn[1].1.tex_offset, [0.0, 0.0]);
        assert_eq!(drawn[1].1.mirror, [1, 0]);
    }

    #[test]
    fn composite_mirror_y_reverses_rows() {
        let top = SpriteCell {
            x: 0,
            y: 0,
            mirror: Mirror::NONE,
            sheet: sheet(),
        };
        let bottom = SpriteCell { y: 1, ..top };
        let sprite = Sprite {
            cells: vec![vec![top], vec![bottom]],
            white_tint: Some(Color::WHITE),
        };

        let mut s = screen();
        s.clear(0);
        s.render_sprite(0, 0, &sprite, Mirror::Y, false, None);

        let drawn = sprites(&mut s);
        assert_eq!(drawn[0].1.tex_offset, [0.0, 8.0]);
        assert_eq!(drawn[0].1.mirror, [0, 1]);
        assert_eq!(drawn[0].1.flags, SPRITE_WHITE_TINT);
    }

    #[test]
    fn extreme_coordinates_never_overflow() {
        let mut s = screen();
        s.clear(0);
        s.set_offset(i32::MIN, i32::MAX);
        s.render_cell(i32::MAX, i32::MIN, sheet(), i32::MAX, i32::MIN, SpriteStyle::default());
        s.render_texels(0, 0, sheet(), Rect::new(i32::MAX - 4, 0, 8, 8), SpriteStyle::default());
        s.render_texels(0, 0, sheet(), Rect::new(i32::MIN, 0, i32::MIN, 8), SpriteStyle::default());

        let drawn = sprites(&mut s);
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|(id, u)| *id == ImageId(0) && u.tex_size == [8.0, 8.0]));
    }

    #[test]
    fn mirror_bits() {
        assert_eq!(Mirror::from_bits(0), Mirror::NONE);
        assert_eq!(Mirror::from_bits(1), Mirror::X);
        assert_eq!(Mirror::from_bits(3), Mirror::XY);
        assert_eq!(Mirror::X ^ Mirror::XY, Mirror::Y);
    }
}
