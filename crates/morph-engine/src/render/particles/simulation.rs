use anyhow::{Result, ensure};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::targets::{POSITION_FORMAT, PositionTarget, PositionTexture};

use super::SIMULATION_WGSL;
use super::common::{
    position_texture_entry, triangle_list, uniform_min_binding_size, QuadVertex, FULLSCREEN_QUAD,
    QUAD_INDICES,
};

/// Angular speed of the blend oscillation; the shader blends with
/// `|sin(u_time * BLEND_SPEED)|`.
pub const BLEND_SPEED: f32 = 0.35;

/// Value written to `u_frequency`. The blend shader does not read it.
pub const DEFAULT_FREQUENCY: f32 = 5.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SimulationUniform {
    pub u_time: f32,
    pub u_frequency: f32,
    pub _pad: [f32; 2],
}

impl SimulationUniform {
    pub fn new(u_time: f32) -> Self {
        Self {
            u_time,
            u_frequency: DEFAULT_FREQUENCY,
            _pad: [0.0; 2],
        }
    }

    /// Blend factor the shader derives from `u_time`, in `[0, 1]`.
    pub fn blend(&self) -> f32 {
        (self.u_time * BLEND_SPEED).sin().abs()
    }
}

/// Full-screen pass that writes `mix(A, B, blend)` into a position target.
///
/// Sources are bound once at construction; only the time uniform changes
/// per frame.
pub struct SimulationPass {
    size: u32,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

impl SimulationPass {
    pub fn new(
        device: &wgpu::Device,
        positions_a: &PositionTexture,
        positions_b: &PositionTexture,
    ) -> Result<Self> {
        ensure!(
            positions_a.size() == positions_b.size(),
            "position maps differ in size: {} vs {}",
            positions_a.size(),
            positions_b.size()
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("morph simulation shader"),
            source: wgpu::ShaderSource::Wgsl(SIMULATION_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("morph simulation bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_min_binding_size::<SimulationUniform>(),
                    },
                    count: None,
                },
                position_texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                position_texture_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("morph simulation pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("morph simulation pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                // Float32 targets are not blendable; every texel is overwritten.
                targets: &[Some(wgpu::ColorTargetState {
                    format: POSITION_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph simulation ubo"),
            contents: bytemuck::bytes_of(&SimulationUniform::new(0.0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("morph simulation bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(positions_a.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(positions_b.view()),
                },
            ],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph simulation quad vbo"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph simulation quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            size: positions_a.size(),
            pipeline,
            bind_group,
            uniform_ubo,
            quad_vbo,
            quad_ibo,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Uploads the blend time for the next [`encode`](Self::encode).
    pub fn set_time(&self, queue: &wgpu::Queue, u_time: f32) {
        queue.write_buffer(
            &self.uniform_ubo,
            0,
            bytemuck::bytes_of(&SimulationUniform::new(u_time)),
        );
    }

    /// Records the blend into `target`, replacing its previous contents.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target: &PositionTarget) {
        debug_assert_eq!(target.size(), self.size);

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("morph simulation pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, self.size as f32, self.size as f32, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}
