/// Size of a render surface in pixels.
///
/// Sizes are fixed when a surface is created; a zero dimension is never valid
/// for a GPU resource.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns the size as `[width, height]` floats, as uploaded to shaders.
    #[inline]
    pub fn to_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Maps a pixel position to `[0, 1]` surface space.
    #[inline]
    pub fn normalize(self, x: i32, y: i32) -> [f32; 2] {
        [
            x as f32 / self.width.max(1) as f32,
            y as f32 / self.height.max(1) as f32,
        ]
    }

    /// Component-wise maximum, used to size scratch textures shared by surfaces.
    #[inline]
    pub fn max(self, other: SurfaceSize) -> SurfaceSize {
        SurfaceSize::new(self.width.max(other.width), self.height.max(other.height))
    }
}
