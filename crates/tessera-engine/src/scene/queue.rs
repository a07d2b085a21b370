use crate::coords::SurfaceSize;
use crate::light::LightCompositor;
use crate::paint::ClearColor;
use crate::render::{CommandSink, DrawCall, SpriteSheet};
use crate::target::{SurfaceId, TargetScope};

use super::RenderCommand;

/// Deferred render queue for one surface.
///
/// Gameplay code calls the drawing API during a frame; nothing touches the
/// GPU until `flush`, which replays the commands onto the queue's surface
/// starting at the most recent clear. Commands recorded before that clear
/// belong to a superseded frame and are dropped, never drawn.
///
/// Lifecycle:
/// - created once per logical surface (`Renderer::create_screen`)
/// - empty again after every `flush`
#[derive(Debug)]
pub struct Screen {
    surface: SurfaceId,
    size: SurfaceSize,

    /// World-to-surface translation subtracted from subsequent calls.
    pub(super) x_offset: i32,
    pub(super) y_offset: i32,

    commands: Vec<RenderCommand>,
    last_clear: Option<usize>,

    pub(super) missing: SpriteSheet,
    pub(super) lights: LightCompositor,
}

impl Screen {
    pub(crate) fn new(
        surface: SurfaceId,
        size: SurfaceSize,
        missing: SpriteSheet,
        lights: LightCompositor,
    ) -> Self {
        Self {
            surface,
            size,
            x_offset: 0,
            y_offset: 0,
            commands: Vec::new(),
            last_clear: None,
            missing,
            lights,
        }
    }

    #[inline]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn lights(&self) -> &LightCompositor {
        &self.lights
    }

    /// Appends a command as-is; no offset is applied.
    ///
    /// A clear starts a new frame, so lights requested before it are dropped.
    pub fn enqueue(&mut self, command: RenderCommand) {
        if matches!(command, RenderCommand::Clear(_)) {
            self.last_clear = Some(self.commands.len());
            self.lights.discard();
        }
        self.commands.push(command);
    }

    /// Starts a new frame on this surface.
    ///
    /// `0` clears to opaque black; any other value is `0xAARRGGBB` and is
    /// written with its alpha.
    pub fn clear(&mut self, argb: u32) {
        self.enqueue(RenderCommand::Clear(ClearColor::from_argb32(argb)));
    }

    /// Sets the translation used by later calls. Already queued commands keep
    /// the offset they were recorded with.
    pub fn set_offset(&mut self, x_offset: i32, y_offset: i32) {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
    }

    #[inline]
    pub fn offset(&self) -> (i32, i32) {
        (self.x_offset, self.y_offset)
    }

    #[inline]
    pub(super) fn to_surface(&self, x: i32, y: i32) -> (i32, i32) {
        (x.saturating_sub(self.x_offset), y.saturating_sub(self.y_offset))
    }

    /// Replays the queue onto its surface through `sink`.
    ///
    /// Binds the surface for the duration and restores whatever was bound
    /// before. Without a clear since the last flush there is no frame to
    /// draw: pending commands and lights are discarded.
    ///
    /// Lights are resolved once, at the first overlay; later overlays in the
    /// same flush reuse that surface.
    pub fn flush<S: CommandSink + ?Sized>(&mut self, sink: &mut S) {
        let mut commands = std::mem::take(&mut self.commands);

        match self.last_clear.take() {
            None => {
                if !commands.is_empty() {
                    log::trace!(
                        "{}: no clear queued; dropping {} commands",
                        self.surface,
                        commands.len()
                    );
                }
            }
            Some(anchor) => {
                if anchor > 0 {
                    log::trace!("{}: skipping {anchor} stale commands", self.surface);
                }
                let mut scope = TargetScope::new(sink, self.surface);
                let mut lit = None;
                for command in &commands[anchor..] {
                    self.dispatch(&mut *scope, command, &mut lit);
                }
            }
        }

        self.lights.discard();
        commands.clear();
        self.commands = commands;
    }

    fn dispatch<S: CommandSink + ?Sized>(
        &mut self,
        sink: &mut S,
        command: &RenderCommand,
        lit: &mut Option<SurfaceId>,
    ) {
        let size = self.size;
        match command {
            RenderCommand::Clear(color) => sink.submit(DrawCall::Clear(*color)),
            RenderCommand::Sprite(cmd) => sink.submit(cmd.draw_call(size)),
            RenderCommand::FillRect(cmd) => sink.submit(cmd.fill_call(size)),
            RenderCommand::DrawRect(cmd) => {
                for call in cmd.outline_calls(size) {
                    sink.submit(call);
                }
            }
            RenderCommand::Line(cmd) => sink.submit(cmd.draw_call(size)),
            RenderCommand::LineSpecial(cmd) => sink.submit(cmd.draw_call(size)),
            RenderCommand::Overlay(cmd) => {
                let lit = *lit.get_or_insert_with(|| self.lights.resolve(sink));
                sink.submit(cmd.draw_call(lit));
            }
        }
    }
}
