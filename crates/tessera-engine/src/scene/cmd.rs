use crate::paint::ClearColor;
use crate::scene::shapes::line::{LineCmd, LineSpecialCmd};
use crate::scene::shapes::overlay::OverlayCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::sprite::SpriteCmd;

/// One recorded drawing operation, in surface pixels with the queue offset
/// already applied.
///
/// Extending the queue:
/// - add a shape module under `scene::shapes::*` with its payload and `Screen` API
/// - add a variant here and a dispatch arm in `Screen::flush`
/// - add a program under `render` if no existing one fits
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Clear(ClearColor),
    Sprite(SpriteCmd),
    FillRect(RectCmd),
    /// One-pixel outline.
    DrawRect(RectCmd),
    Line(LineCmd),
    LineSpecial(LineSpecialCmd),
    Overlay(OverlayCmd),
}
