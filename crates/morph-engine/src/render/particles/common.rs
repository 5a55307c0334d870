//! GPU types shared by the particle passes.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

/// `src + dst` on every channel; overlapping particles brighten.
pub(super) fn additive_blend() -> wgpu::BlendState {
    let add = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: add,
        alpha: add,
    }
}

pub(super) fn uniform_min_binding_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

pub(super) fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

/// Bind group layout entry for an `Rgba32Float` texture read with `textureLoad`.
pub(super) fn position_texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

// ── quad geometry ─────────────────────────────────────────────────────────

/// Quad corner in NDC plus the texture coordinate it maps to.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Covers clip space. uv `(0, 0)` is the top-left texel so output texel
/// `(x, y)` reads source texel `(x, y)`.
pub(super) const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
];

/// Sprite corners in `[-1, 1]²`; uv is the same corner, used for the falloff.
pub(super) const SPRITE_QUAD: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0], uv: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0], uv: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0], uv: [-1.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullscreen_quad_maps_top_of_clip_space_to_first_row() {
        for v in FULLSCREEN_QUAD {
            assert_eq!(v.uv[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.uv[1], (1.0 - v.position[1]) / 2.0);
        }
    }

    #[test]
    fn quad_indices_cover_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < FULLSCREEN_QUAD.len()));
    }
}
