//! Render queues.
//!
//! Responsibilities:
//! - record gameplay drawing as `RenderCommand`s in call order
//! - replay them from the last clear onto the queue's own surface
//! - keep shape-specific API + conversion isolated per file under `scene::shapes`

mod cmd;
mod queue;

mod shapes;

pub use cmd::RenderCommand;
pub use queue::Screen;
pub use shapes::line::{Axis, LineCmd, LineSpecialCmd};
pub use shapes::overlay::OverlayCmd;
pub use shapes::rect::RectCmd;
pub use shapes::sprite::{Mirror, Sprite, SpriteCell, SpriteCmd, SpriteStyle};
