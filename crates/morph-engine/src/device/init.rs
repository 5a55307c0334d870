/// GPU setup options consumed by [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Adapter preference; the particle passes are fill-rate bound, so the
    /// default asks for the discrete GPU.
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB surface format when one is offered. Sprite colors are
    /// blended in linear space and encoded on store.
    pub prefer_srgb: bool,

    /// The blend clock advances once per presented frame, so FIFO also fixes
    /// the morph speed to the display refresh rate.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; replaced by a supported one when unavailable.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// `Rgba32Float` render targets and `textureLoad` are core WebGPU, so no
    /// optional feature is requested. The position texture side is checked
    /// against `max_texture_dimension_2d` of these limits.
    pub required_limits: wgpu::Limits,

    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
