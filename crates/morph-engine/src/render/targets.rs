//! Position textures and the ping-pong pair the simulation renders into.
//!
//! Every texture here is `Rgba32Float`, one texel per particle, laid out as a
//! square `size × size` grid. Float32 textures are not filterable, so shaders
//! read them with `textureLoad` and no sampler is bound.

use anyhow::{Result, ensure};
use wgpu::util::DeviceExt;

/// Texel format shared by sources and simulation targets.
pub const POSITION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

fn position_extent(size: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size,
        height: size,
        depth_or_array_layers: 1,
    }
}

/// Largest grid side every device opened with the default
/// [`GpuInit`](crate::device::GpuInit) limits can hold.
pub fn max_position_size() -> u32 {
    wgpu::Limits::default().max_texture_dimension_2d
}

fn check_size(device: &wgpu::Device, size: u32) -> Result<()> {
    let max = device.limits().max_texture_dimension_2d;
    ensure!(size > 0, "position texture size must be positive");
    ensure!(size <= max, "position texture size {size} exceeds device limit {max}");
    Ok(())
}

/// Immutable source positions (one model), uploaded once at startup.
pub struct PositionTexture {
    size: u32,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl PositionTexture {
    /// Uploads `size × size` RGBA texels from `data`.
    ///
    /// `data` must hold exactly `size * size * 4` floats.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        size: u32,
        data: &[f32],
    ) -> Result<Self> {
        check_size(device, size)?;
        let expected = size as usize * size as usize * 4;
        ensure!(
            data.len() == expected,
            "{label}: expected {expected} floats for a {size}x{size} map, got {}",
            data.len()
        );

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: position_extent(size),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: POSITION_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(data),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("uploaded {label}: {size}x{size} rgba32f");

        Ok(Self {
            size,
            _texture: texture,
            view,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Offscreen render target holding blended positions.
pub struct PositionTarget {
    size: u32,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl PositionTarget {
    pub fn new(device: &wgpu::Device, label: &str, size: u32) -> Result<Self> {
        check_size(device, size)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: position_extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: POSITION_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            size,
            _texture: texture,
            view,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Two interchangeable buffers: one is written this frame, the other holds
/// the previous result.
///
/// After [`swap`](Self::swap), [`read`](Self::read) returns what was last
/// written.
#[derive(Debug)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    pub fn new(first: T, second: T) -> Self {
        Self {
            slots: [first, second],
            read: 0,
        }
    }

    /// Builds both slots with `make(index)`.
    pub fn try_from_fn<E>(mut make: impl FnMut(usize) -> Result<T, E>) -> Result<Self, E> {
        let first = make(0)?;
        let second = make(1)?;
        Ok(Self::new(first, second))
    }

    #[inline]
    pub fn read(&self) -> &T {
        &self.slots[self.read]
    }

    #[inline]
    pub fn write(&self) -> &T {
        &self.slots[1 - self.read]
    }

    /// Index of the slot [`read`](Self::read) returns.
    #[inline]
    pub fn read_index(&self) -> usize {
        self.read
    }

    #[inline]
    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}
