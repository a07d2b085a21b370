use super::SurfaceId;

/// A render target as seen by the stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Framebuffer {
    /// The window swapchain texture.
    Window,
    Surface(SurfaceId),
}

/// LIFO of bound targets.
///
/// The top entry is where draws land; an empty stack means the window. Each
/// `push` must be matched by exactly one `pop`, which `TargetScope` enforces
/// for callers that can return early.
#[derive(Debug, Default, Clone)]
pub struct FramebufferStack {
    stack: Vec<SurfaceId>,
}

impl FramebufferStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, surface: SurfaceId) {
        log::trace!("bind {surface} (depth {})", self.stack.len() + 1);
        self.stack.push(surface);
    }

    /// Restores the previously bound target.
    ///
    /// Popping an empty stack is a pairing bug; it is reported and otherwise
    /// leaves the window bound.
    pub fn pop(&mut self) -> Framebuffer {
        match self.stack.pop() {
            Some(id) => log::trace!("unbind {id} (depth {})", self.stack.len()),
            None => {
                debug_assert!(false, "framebuffer stack underflow");
                log::error!("framebuffer stack underflow; window stays bound");
            }
        }
        self.active()
    }

    #[inline]
    pub fn active(&self) -> Framebuffer {
        self.stack
            .last()
            .copied()
            .map_or(Framebuffer::Window, Framebuffer::Surface)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
