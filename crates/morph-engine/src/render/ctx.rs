use crate::coords::Viewport;

/// What a renderer needs from the device for one frame.
///
/// `viewport` is the configured surface size in physical pixels, which is
/// also the size of `RenderTarget::color_view`.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self { device, queue, surface_format, viewport }
    }

    /// Aspect ratio for projection matrices.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }
}

/// The frame's command encoder and swapchain view.
///
/// Offscreen passes record into the same `encoder` before drawing to
/// `color_view`, so one submit covers the whole frame.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
