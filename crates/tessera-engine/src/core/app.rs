use winit::event::WindowEvent;

use crate::coords::SurfaceSize;
use crate::render::Renderer;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the game.
pub trait App {
    /// Called once the GPU is up, before the first tick. Create screens and
    /// upload sheets here; `resolution` is the configured logical size.
    fn init(&mut self, renderer: &mut Renderer, resolution: SurfaceSize) -> anyhow::Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Advances the simulation by one fixed tick.
    fn tick(&mut self) -> AppControl;

    /// Whether gameplay is running (game speed applies) rather than a menu.
    fn in_play(&self) -> bool {
        true
    }

    /// Requested game speed; `None` keeps the current one.
    fn game_speed(&self) -> Option<f64> {
        None
    }

    /// Records one frame: flush screens, composite, present.
    fn render(&mut self, frame: &mut FrameCtx<'_>) -> AppControl;
}
