use std::ops::{Deref, DerefMut};

use super::{FramebufferStack, SurfaceId};

/// Anything that owns a framebuffer stack.
///
/// Draw sinks implement this so a `TargetScope` can bind a surface around a
/// block of draws regardless of what the sink records into.
pub trait BindTarget {
    fn framebuffers(&mut self) -> &mut FramebufferStack;
}

impl BindTarget for FramebufferStack {
    fn framebuffers(&mut self) -> &mut FramebufferStack {
        self
    }
}

/// Binds a surface for its lifetime.
///
/// The surface is pushed on creation and popped on drop, so a panic or an
/// early `return`/`?` inside the scope still restores the previous target.
/// The scope derefs to the wrapped sink.
pub struct TargetScope<'a, B: BindTarget + ?Sized> {
    inner: &'a mut B,
    surface: SurfaceId,
    depth: usize,
}

impl<'a, B: BindTarget + ?Sized> TargetScope<'a, B> {
    pub fn new(inner: &'a mut B, surface: SurfaceId) -> Self {
        let stack = inner.framebuffers();
        stack.push(surface);
        let depth = stack.depth();
        Self { inner, surface, depth }
    }

    #[inline]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

impl<B: BindTarget + ?Sized> Deref for TargetScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.inner
    }
}

impl<B: BindTarget + ?Sized> DerefMut for TargetScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.inner
    }
}

impl<B: BindTarget + ?Sized> Drop for TargetScope<'_, B> {
    fn drop(&mut self) {
        let stack = self.inner.framebuffers();
        debug_assert_eq!(
            stack.depth(),
            self.depth,
            "nested target scope outlived its parent"
        );
        stack.pop();
    }
}
