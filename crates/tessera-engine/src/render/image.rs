//! Decoded RGBA8 images and their GPU sprite sheets.

use crate::coords::Rect;

use super::ImageError;

/// Edge length of one sheet cell in texels.
pub const CELL: u32 = 8;

/// A decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ImageError::Length {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer by evaluating `f(x, y) -> [r, g, b, a]` per texel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, ImageError> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    /// Sheet form of this image.
    ///
    /// Width and height are cut down to whole cells (extra texels on the right
    /// and bottom are dropped, with a warning) and alpha becomes binary:
    /// 0 stays transparent, anything else is opaque.
    pub fn to_sheet(&self) -> Result<PixelBuffer, ImageError> {
        let width = self.width - self.width % CELL;
        let height = self.height - self.height % CELL;
        if width == 0 || height == 0 {
            return Err(ImageError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if width != self.width || height != self.height {
            log::warn!(
                "sheet {}x{} is not a multiple of {CELL}; using {width}x{height}",
                self.width,
                self.height
            );
        }

        let src_row = self.width as usize * 4;
        let dst_row = width as usize * 4;
        let mut pixels = Vec::with_capacity(dst_row * height as usize);
        for row in self.pixels.chunks_exact(src_row).take(height as usize) {
            for px in row[..dst_row].chunks_exact(4) {
                let alpha = if px[3] == 0 { 0 } else { 0xff };
                pixels.extend_from_slice(&[px[0], px[1], px[2], alpha]);
            }
        }

        Ok(PixelBuffer {
            width,
            height,
            pixels,
        })
    }
}

/// 8x8 magenta/black checker drawn in place of out-of-range sprites.
pub fn missing_placeholder() -> PixelBuffer {
    let pixels = (0..CELL * CELL)
        .flat_map(|i| {
            let (x, y) = (i % CELL, i / CELL);
            if (x / 4 + y / 4) % 2 == 0 {
                [0xff, 0x00, 0xff, 0xff]
            } else {
                [0x00, 0x00, 0x00, 0xff]
            }
        })
        .collect();
    PixelBuffer {
        width: CELL,
        height: CELL,
        pixels,
    }
}

/// Handle into the renderer's image store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub(crate) u32);

/// An uploaded sheet: its handle plus the dimensions used for bounds checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

impl SpriteSheet {
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Number of whole cells across and down.
    pub fn cells(&self) -> (u32, u32) {
        (self.width / CELL, self.height / CELL)
    }
}

/// GPU side of a sheet.
pub(crate) struct SheetTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl SheetTexture {
    pub(crate) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &PixelBuffer,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            texture.as_image_copy(),
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            }],
        });

        Self {
            texture,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, alpha: u8) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |_, _| [10, 20, 30, alpha]).unwrap()
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(
            PixelBuffer::new(0, 8, vec![]),
            Err(ImageError::Empty { width: 0, height: 8 })
        );
    }

    #[test]
    fn rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ImageError::Length {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn sheet_truncates_to_whole_cells() {
        let img = PixelBuffer::from_fn(19, 10, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
        let sheet = img.to_sheet().unwrap();
        assert_eq!((sheet.width(), sheet.height()), (16, 8));
        assert_eq!(sheet.pixels().len(), 16 * 8 * 4);
        // Rows keep their own texels after the right edge is dropped.
        assert_eq!(sheet.texel(15, 7), Some([15, 7, 0, 255]));
        assert_eq!(sheet.texel(16, 0), None);
    }

    #[test]
    fn sheet_smaller_than_a_cell_fails() {
        assert_eq!(
            solid(7, 16, 255).to_sheet(),
            Err(ImageError::TooSmall { width: 7, height: 16 })
        );
    }

    #[test]
    fn sheet_alpha_is_binary() {
        let img = PixelBuffer::from_fn(8, 8, |x, _| [1, 2, 3, (x * 30) as u8]).unwrap();
        let sheet = img.to_sheet().unwrap();
        assert_eq!(sheet.texel(0, 0), Some([1, 2, 3, 0]));
        assert_eq!(sheet.texel(1, 0), Some([1, 2, 3, 255]));
        assert_eq!(sheet.texel(7, 3), Some([1, 2, 3, 255]));
    }

    #[test]
    fn placeholder_is_one_opaque_cell() {
        let p = missing_placeholder();
        assert_eq!((p.width(), p.height()), (CELL, CELL));
        assert!(p.pixels().chunks_exact(4).all(|px| px[3] == 0xff));
        assert_ne!(p.texel(0, 0), p.texel(4, 0));
    }
}
