use std::collections::HashMap;

use super::program::{ProgramKind, TextureSlot};
use super::quad::QuadVertex;
use super::{validate, ShaderError};

/// Layouts and module of one program; pipelines are built per target format.
struct Program {
    module: wgpu::ShaderModule,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

/// Every program, compiled once at startup.
///
/// Sources are checked with naga before wgpu sees them, so a broken program
/// fails `new` with its diagnostic instead of tripping the device error
/// handler.
pub(crate) struct ShaderRegistry {
    programs: HashMap<ProgramKind, Program>,
    pipelines: HashMap<(ProgramKind, wgpu::TextureFormat), wgpu::RenderPipeline>,
}

impl ShaderRegistry {
    /// Builds all programs with pipelines for each of `formats`.
    pub(crate) fn new(
        device: &wgpu::Device,
        formats: &[wgpu::TextureFormat],
    ) -> Result<Self, ShaderError> {
        validate::check_all()?;

        let mut programs = HashMap::new();
        let mut pipelines = HashMap::new();

        for kind in ProgramKind::ALL {
            let program = build_program(device, kind);
            for &format in formats {
                pipelines
                    .entry((kind, format))
                    .or_insert_with(|| build_pipeline(device, kind, &program, format));
            }
            programs.insert(kind, program);
        }

        log::debug!(
            "shader registry ready: {} programs, {} pipelines",
            programs.len(),
            pipelines.len()
        );
        Ok(Self {
            programs,
            pipelines,
        })
    }

    pub(crate) fn pipeline(
        &self,
        kind: ProgramKind,
        format: wgpu::TextureFormat,
    ) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(kind, format))
    }

    pub(crate) fn uniform_layout(&self, kind: ProgramKind) -> Option<&wgpu::BindGroupLayout> {
        self.programs.get(&kind).map(|p| &p.uniform_layout)
    }

    pub(crate) fn texture_layout(&self, kind: ProgramKind) -> Option<&wgpu::BindGroupLayout> {
        self.programs.get(&kind)?.texture_layout.as_ref()
    }
}

fn build_program(device: &wgpu::Device, kind: ProgramKind) -> Program {
    let label = format!("tessera {kind}");

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(kind.source().into()),
    });

    let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} uniform bgl")),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(kind.uniform_size()),
            },
            count: None,
        }],
    });

    let slots = kind.texture_slots();
    let texture_layout = (!slots.is_empty()).then(|| {
        let entries: Vec<wgpu::BindGroupLayoutEntry> = slots
            .iter()
            .enumerate()
            .map(|(binding, slot)| wgpu::BindGroupLayoutEntry {
                binding: binding as u32,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: slot_binding(*slot),
                count: None,
            })
            .collect();
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} texture bgl")),
            entries: &entries,
        })
    });

    let mut groups = vec![&uniform_layout];
    groups.extend(texture_layout.as_ref());

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} pipeline layout")),
        bind_group_layouts: &groups,
        immediate_size: 0,
    });

    Program {
        module,
        uniform_layout,
        texture_layout,
        pipeline_layout,
    }
}

fn slot_binding(slot: TextureSlot) -> wgpu::BindingType {
    match slot {
        TextureSlot::Texel | TextureSlot::Sampled => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float {
                filterable: slot == TextureSlot::Sampled,
            },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        TextureSlot::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    kind: ProgramKind,
    program: &Program,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("tessera {kind} pipeline ({format:?})")),
        layout: Some(&program.pipeline_layout),

        vertex: wgpu::VertexState {
            module: &program.module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &program.module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: kind.blend(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
