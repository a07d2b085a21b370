/// Straight-alpha RGBA color with components in `[0, 1]`.
///
/// Game code mostly speaks packed integers (`0xRRGGBB` for tints, `0xAARRGGBB`
/// for clears); the constructors below convert those once at enqueue time so
/// shaders only ever see floats.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a packed `0xRRGGBB` value. Upper bits are ignored.
    #[inline]
    pub fn from_rgb24(rgb: u32) -> Self {
        Self::rgba(
            channel(rgb >> 16),
            channel(rgb >> 8),
            channel(rgb),
            1.0,
        )
    }

    /// Color from a packed `0xAARRGGBB` value.
    #[inline]
    pub fn from_argb32(argb: u32) -> Self {
        Self::rgba(
            channel(argb >> 16),
            channel(argb >> 8),
            channel(argb),
            channel(argb >> 24),
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[inline]
fn channel(v: u32) -> f32 {
    (v & 0xff) as f32 / 255.0
}

/// Clear operation for a surface.
///
/// `Plain` is opaque black. `Solid` writes the given color including its alpha
/// channel, so a translucent clear stays translucent when the surface is later
/// composited with alpha blending.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ClearColor {
    Plain,
    Solid(Color),
}

impl ClearColor {
    /// Fully transparent, used for light accumulation and UI layers.
    pub const TRANSPARENT: ClearColor = ClearColor::Solid(Color::TRANSPARENT);

    /// Interprets a packed `0xAARRGGBB` value; `0` selects the plain clear.
    #[inline]
    pub fn from_argb32(argb: u32) -> Self {
        if argb == 0 {
            ClearColor::Plain
        } else {
            ClearColor::Solid(Color::from_argb32(argb))
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        match self {
            ClearColor::Plain => Color::BLACK,
            ClearColor::Solid(c) => c,
        }
    }
}
