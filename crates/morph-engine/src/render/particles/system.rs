use anyhow::{Result, ensure};
use glam::Mat4;

use crate::paint::Color;
use crate::render::targets::{PingPong, PositionTarget, PositionTexture};
use crate::render::{RenderCtx, RenderTarget};

use super::{DisplayPass, DisplayUniform, SimulationPass};

/// CPU data the particle system is built from.
#[derive(Debug, Clone, Copy)]
pub struct ParticleSources<'a> {
    /// Side length of the particle grid.
    pub size: u32,
    /// RGBA texels of the first model (`size * size * 4` floats).
    pub positions_a: &'a [f32],
    /// RGBA texels of the second model.
    pub positions_b: &'a [f32],
    /// Texel-center coordinate of each particle, row-major.
    pub particle_uvs: &'a [[f32; 2]],
}

/// Per-frame inputs of [`ParticleSystem::render`].
#[derive(Debug, Clone, Copy)]
pub struct ParticleFrame {
    /// Blend clock, written to `u_time`.
    pub blend_time: f32,
    pub view_proj: Mat4,
    pub color: Color,
    pub point_size: f32,
}

/// Simulation and display passes plus the textures between them.
pub struct ParticleSystem {
    _sources: [PositionTexture; 2],
    targets: PingPong<PositionTarget>,
    simulation: SimulationPass,
    display: DisplayPass,
}

impl ParticleSystem {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, sources: ParticleSources<'_>) -> Result<Self> {
        let ParticleSources {
            size,
            positions_a,
            positions_b,
            particle_uvs,
        } = sources;
        ensure!(size > 0, "particle grid size must be positive");

        let a = PositionTexture::upload(device, queue, "morph positions a", size, positions_a)?;
        let b = PositionTexture::upload(device, queue, "morph positions b", size, positions_b)?;

        let targets = PingPong::try_from_fn(|i| {
            PositionTarget::new(device, &format!("morph simulation target {i}"), size)
        })?;

        let simulation = SimulationPass::new(device, &a, &b)?;
        let display = DisplayPass::new(device, &targets, particle_uvs)?;

        log::info!(
            "particle system ready: {size}x{size} grid, {} particles",
            display.instance_count()
        );

        Ok(Self {
            _sources: [a, b],
            targets,
            simulation,
            display,
        })
    }

    pub fn particle_count(&self) -> u32 {
        self.display.instance_count()
    }

    /// Runs the simulation pass into the back target, swaps, then draws the
    /// particles from the freshly written target onto `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &ParticleFrame) {
        self.simulation.set_time(ctx.queue, frame.blend_time);
        self.simulation.encode(target.encoder, self.targets.write());
        self.targets.swap();

        let uniform = DisplayUniform::new(frame.view_proj, frame.color, ctx.viewport, frame.point_size);
        self.display
            .render(ctx, target, self.targets.read_index(), &uniform);
    }
}
