use std::collections::HashMap;

use crate::coords::SurfaceSize;
use crate::light::{LightCompositor, DITHER_4X4};
use crate::scene::Screen;
use crate::target::{Framebuffer, GpuSurface, SurfaceId, SURFACE_FORMAT};

use super::image::{missing_placeholder, ImageId, PixelBuffer, SheetTexture, SpriteSheet};
use super::quad::QuadBuffers;
use super::recorder::{DrawInputs, FrameRecorder, PassOp, RenderPassRecord};
use super::registry::ShaderRegistry;
use super::{ImageError, ProgramKind, RenderCtx, RenderTarget, ShaderError};

/// Smallest uniform arena allocation; grows by powers of two.
const MIN_UNIFORM_BYTES: u64 = 64 * 1024;

/// Owns every GPU resource the render queues refer to by id.
///
/// - surfaces (`SurfaceId`) and sprite sheets (`ImageId`)
/// - the shader registry
/// - the per-frame uniform arena buffer
/// - the snapshot texture used by programs that read their own target
///
/// Frames go through `begin_frame` → `Screen::flush` / `FrameCtx` helpers →
/// `encode`. Images are released through `&mut self`, which cannot overlap a
/// frame being recorded.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,

    registry: ShaderRegistry,
    quad: QuadBuffers,
    sampler: wgpu::Sampler,
    dither: wgpu::TextureView,

    surfaces: Vec<GpuSurface>,
    images: Vec<Option<SheetTexture>>,
    missing: SpriteSheet,

    snapshot: Option<Snapshot>,
    uniforms: Option<UniformBuffer>,
    uniform_alignment: u32,
}

struct Snapshot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: SurfaceSize,
    /// Group 1 for LineSpecial, which samples nothing else.
    line_group: Option<wgpu::BindGroup>,
}

struct UniformBuffer {
    buffer: wgpu::Buffer,
    capacity: u64,
    groups: HashMap<ProgramKind, wgpu::BindGroup>,
}

impl Renderer {
    /// Compiles every program (for surfaces and for `window_format`) and
    /// uploads the placeholder sheet and dither pattern.
    pub fn new(ctx: RenderCtx<'_>, window_format: wgpu::TextureFormat) -> Result<Self, ShaderError> {
        let RenderCtx { device, queue } = ctx;
        let registry = ShaderRegistry::new(device, &[SURFACE_FORMAT, window_format])?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera nearest sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut renderer = Self {
            device: device.clone(),
            queue: queue.clone(),
            quad: QuadBuffers::new(device),
            dither: create_dither(device, queue),
            sampler,
            registry,
            surfaces: Vec::new(),
            images: Vec::new(),
            missing: SpriteSheet {
                id: ImageId(0),
                width: 0,
                height: 0,
            },
            snapshot: None,
            uniforms: None,
            uniform_alignment: device.limits().min_uniform_buffer_offset_alignment,
        };

        renderer.missing = renderer.store_sheet(&missing_placeholder(), "tessera missing sheet");
        Ok(renderer)
    }

    // ── resources ─────────────────────────────────────────────────────────

    /// Creates a fixed-size off-screen surface.
    pub fn create_surface(&mut self, size: SurfaceSize, label: &str) -> SurfaceId {
        let size = SurfaceSize::new(size.width.max(1), size.height.max(1));
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces
            .push(GpuSurface::new(&self.device, size, &format!("tessera {label}")));
        self.ensure_snapshot(size);
        log::debug!("created {id} ({label}) {}x{}", size.width, size.height);
        id
    }

    pub fn surface_size(&self, id: SurfaceId) -> Option<SurfaceSize> {
        self.surfaces.get(id.index()).map(GpuSurface::size)
    }

    /// Creates a render queue with its own surface and light surface.
    pub fn create_screen(&mut self, size: SurfaceSize) -> Screen {
        let surface = self.create_surface(size, "screen");
        let light = self.create_surface(size, "light");
        let size = SurfaceSize::new(size.width.max(1), size.height.max(1));
        Screen::new(surface, size, self.missing, LightCompositor::new(light, size))
    }

    /// Uploads a decoded image as a sprite sheet.
    pub fn upload_image(&mut self, image: &PixelBuffer) -> Result<SpriteSheet, ImageError> {
        let sheet = image.to_sheet()?;
        let label = format!("tessera sheet {}", self.images.len());
        Ok(self.store_sheet(&sheet, &label))
    }

    /// Frees a sheet's texture. Later draws naming it use the placeholder.
    pub fn release_image(&mut self, sheet: SpriteSheet) {
        if sheet.id == self.missing.id {
            log::warn!("the placeholder sheet cannot be released");
            return;
        }
        match self.images.get_mut(sheet.id.0 as usize).and_then(Option::take) {
            Some(tex) => tex.texture.destroy(),
            None => log::debug!("sheet {:?} already released", sheet.id),
        }
    }

    fn store_sheet(&mut self, sheet: &PixelBuffer, label: &str) -> SpriteSheet {
        let id = ImageId(self.images.len() as u32);
        let tex = self.registry.texture_layout(ProgramKind::Sprite).map(|layout| {
            SheetTexture::upload(&self.device, &self.queue, layout, sheet, label)
        });
        self.images.push(tex);
        SpriteSheet {
            id,
            width: sheet.width(),
            height: sheet.height(),
        }
    }

    fn ensure_snapshot(&mut self, size: SurfaceSize) {
        let current = self.snapshot.as_ref().map(|s| s.size).unwrap_or_default();
        let wanted = current.max(size);
        if wanted == current {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera snapshot"),
            size: wgpu::Extent3d {
                width: wanted.width,
                height: wanted.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SURFACE_FORMAT,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let line_group = self
            .registry
            .texture_layout(ProgramKind::LineSpecial)
            .map(|layout| {
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("tessera line-special textures"),
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    }],
                })
            });

        self.snapshot = Some(Snapshot {
            texture,
            view,
            size: wanted,
            line_group,
        });
    }

    // ── frames ────────────────────────────────────────────────────────────

    pub fn begin_frame(&self) -> FrameRecorder {
        FrameRecorder::new(self.uniform_alignment)
    }

    /// Encodes a recorded frame into `window.encoder`.
    pub fn encode(&mut self, recorder: FrameRecorder, window: &mut RenderTarget<'_>) {
        if recorder.is_empty() {
            return;
        }
        self.upload_uniforms(recorder.arena.bytes());

        for op in &recorder.ops {
            match op {
                PassOp::Snapshot { source } => self.copy_snapshot(window.encoder, *source),
                PassOp::Render(pass) => self.encode_pass(pass, window),
            }
        }
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        let fits = self.uniforms.as_ref().is_some_and(|u| u.capacity >= needed);
        if !fits {
            let capacity = needed.next_power_of_two().max(MIN_UNIFORM_BYTES);
            self.uniforms = Some(self.create_uniform_buffer(capacity));
        }
        if let Some(u) = &self.uniforms {
            if !bytes.is_empty() {
                self.queue.write_buffer(&u.buffer, 0, bytes);
            }
        }
    }

    fn create_uniform_buffer(&self, capacity: u64) -> UniformBuffer {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera uniform arena"),
            size: capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let groups = ProgramKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let layout = self.registry.uniform_layout(kind)?;
                let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("tessera {kind} uniforms")),
                    layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &buffer,
                            offset: 0,
                            size: wgpu::BufferSize::new(kind.uniform_size()),
                        }),
                    }],
                });
                Some((kind, group))
            })
            .collect();

        log::debug!("uniform arena resized to {capacity} bytes");
        UniformBuffer {
            buffer,
            capacity,
            groups,
        }
    }

    fn copy_snapshot(&self, encoder: &mut wgpu::CommandEncoder, source: SurfaceId) {
        let Some(src) = self.surfaces.get(source.index()) else { return };
        let Some(snapshot) = self.snapshot.as_ref() else { return };
        let size = src.size();
        encoder.copy_texture_to_texture(
            src.texture().as_image_copy(),
            snapshot.texture.as_image_copy(),
            wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn encode_pass(&self, pass: &RenderPassRecord, window: &mut RenderTarget<'_>) {
        let (view, format) = match pass.target {
            Framebuffer::Window => (window.color_view, window.format),
            Framebuffer::Surface(id) => match self.surfaces.get(id.index()) {
                Some(surface) => (surface.view(), SURFACE_FORMAT),
                None => {
                    log::error!("pass targets unknown {id}; skipped");
                    return;
                }
            },
        };
        let Some(uniforms) = self.uniforms.as_ref() else { return };

        let load = match pass.clear {
            Some(clear) => wgpu::LoadOp::Clear(clear.color().to_wgpu()),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = window.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_vertex_buffer(0, self.quad.vbo.slice(..));
        rpass.set_index_buffer(self.quad.ibo.slice(..), wgpu::IndexFormat::Uint16);

        for draw in &pass.draws {
            let Some(pipeline) = self.registry.pipeline(draw.program, format) else {
                log::warn!("no {} pipeline for {format:?}", draw.program);
                continue;
            };
            let Some(uniform_group) = uniforms.groups.get(&draw.program) else { continue };

            let textures = match draw.inputs {
                DrawInputs::None => None,
                DrawInputs::Sheet(id) => self.sheet_group(id),
                DrawInputs::Snapshot => self.snapshot.as_ref().and_then(|s| s.line_group.clone()),
                DrawInputs::Overlay { lit } => self.overlay_group(lit),
                DrawInputs::Blit { source } => self.blit_group(source),
            };
            if draw.program.texture_slots().is_empty() != textures.is_none() {
                log::warn!("{} draw is missing its textures; skipped", draw.program);
                continue;
            }

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, uniform_group, &[draw.uniform_offset]);
            if let Some(group) = &textures {
                rpass.set_bind_group(1, group, &[]);
            }
            rpass.draw_indexed(0..QuadBuffers::index_count(), 0, 0..1);
        }
    }

    /// Group 1 for a sprite; released or unknown sheets fall back to the placeholder.
    fn sheet_group(&self, id: ImageId) -> Option<wgpu::BindGroup> {
        let lookup = |id: ImageId| self.images.get(id.0 as usize).and_then(Option::as_ref);
        let tex = lookup(id).or_else(|| {
            log::trace!("sheet {id:?} not loaded; drawing placeholder");
            lookup(self.missing.id)
        })?;
        Some(tex.bind_group.clone())
    }

    fn overlay_group(&self, lit: SurfaceId) -> Option<wgpu::BindGroup> {
        let layout = self.registry.texture_layout(ProgramKind::Overlay)?;
        let snapshot = self.snapshot.as_ref()?;
        let lit = self.surfaces.get(lit.index())?;
        Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera overlay textures"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&snapshot.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(lit.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&self.dither),
                },
            ],
        }))
    }

    fn blit_group(&self, source: SurfaceId) -> Option<wgpu::BindGroup> {
        let layout = self.registry.texture_layout(ProgramKind::Postprocess)?;
        let source = self.surfaces.get(source.index())?;
        Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera blit textures"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }))
    }
}

fn create_dither(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: 4,
        height: 4,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("tessera dither"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        texture.as_image_copy(),
        &DITHER_4X4,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(4),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
