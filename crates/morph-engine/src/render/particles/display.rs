use anyhow::{Result, ensure};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::targets::{PingPong, PositionTarget};
use crate::render::{RenderCtx, RenderTarget};

use super::DISPLAY_WGSL;
use super::common::{
    additive_blend, position_texture_entry, triangle_list, uniform_min_binding_size, QuadVertex,
    QUAD_INDICES, SPRITE_QUAD,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DisplayUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Linear straight-alpha sprite color.
    pub color: [f32; 4],
    /// Physical pixels.
    pub viewport: [f32; 2],
    /// Sprite diameter in physical pixels.
    pub point_size: f32,
    pub _pad: f32,
}

impl DisplayUniform {
    pub fn new(view_proj: Mat4, color: Color, viewport: Viewport, point_size: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            color: color.to_array(),
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            point_size: point_size.max(0.0),
            _pad: 0.0,
        }
    }
}

/// Per-particle instance: grid coordinate of the particle's texel.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ParticleInstance {
    uv: [f32; 2],
}

impl ParticleInstance {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Draws every particle as an additive sprite at the position stored in a
/// simulation target.
///
/// One bind group is prepared per ping-pong slot; [`render`](Self::render)
/// picks the slot the simulation last wrote. The pipeline is rebuilt when
/// the surface format changes.
pub struct DisplayPass {
    instance_count: u32,

    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_groups: [wgpu::BindGroup; 2],
    uniform_ubo: wgpu::Buffer,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: wgpu::Buffer,
}

impl DisplayPass {
    pub fn new(
        device: &wgpu::Device,
        targets: &PingPong<PositionTarget>,
        particle_uvs: &[[f32; 2]],
    ) -> Result<Self> {
        let size = targets.read().size() as usize;
        ensure!(
            particle_uvs.len() == size * size,
            "expected {} particle coordinates for a {size}x{size} grid, got {}",
            size * size,
            particle_uvs.len()
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("morph display shader"),
            source: wgpu::ShaderSource::Wgsl(DISPLAY_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("morph display bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_min_binding_size::<DisplayUniform>(),
                    },
                    count: None,
                },
                position_texture_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("morph display pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("morph display ubo"),
            size: std::mem::size_of::<DisplayUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_for = |slot: &PositionTarget| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("morph display bind group"),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_ubo.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(slot.view()),
                    },
                ],
            })
        };
        let [first, second] = targets.slots();
        let bind_groups = [bind_group_for(first), bind_group_for(second)];

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph display quad vbo"),
            contents: bytemuck::cast_slice(&SPRITE_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph display quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances: Vec<ParticleInstance> =
            particle_uvs.iter().map(|&uv| ParticleInstance { uv }).collect();
        let instance_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("morph display instance vbo"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            instance_count: instances.len() as u32,
            shader,
            pipeline_layout,
            pipeline_format: None,
            pipeline: None,
            bind_groups,
            uniform_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo,
        })
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Draws all particles on top of `target`, reading positions from
    /// ping-pong slot `source`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: usize,
        uniform: &DisplayUniform,
    ) {
        self.ensure_pipeline(ctx);
        ctx.queue.write_buffer(&self.uniform_ubo, 0, bytemuck::bytes_of(uniform));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_groups.get(source) else {
            log::warn!("display pass: no position slot {source}");
            return;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("morph display pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.instance_count);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("morph display pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ParticleInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(additive_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            // No depth buffer: additive blending is order independent.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("display pipeline built for {:?}", ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        // mat4x4 (64) + vec4 (16) + vec2 (8) + f32 + f32
        assert_eq!(std::mem::size_of::<DisplayUniform>(), 96);
    }

    #[test]
    fn uniform_clamps_degenerate_inputs() {
        let u = DisplayUniform::new(Mat4::IDENTITY, Color::WHITE, Viewport::new(0.0, 0.0), -3.0);
        assert_eq!(u.viewport, [1.0, 1.0]);
        assert_eq!(u.point_size, 0.0);
        assert_eq!(u.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }
}
