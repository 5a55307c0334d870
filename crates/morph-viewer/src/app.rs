use std::time::Duration;

use anyhow::{Context, Result};
use morph_engine::core::{App, AppControl, FrameCtx, StartCtx};
use morph_engine::paint::Color;
use morph_engine::render::particles::{ParticleFrame, ParticleSources, ParticleSystem};
use morph_engine::time::FpsMeter;

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::controller::InteractionController;
use crate::scene::MorphScene;

/// The viewer application: uploads the scene once, then blends and draws
/// the particles every frame.
pub struct MorphApp {
    config: ViewerConfig,
    camera: Camera,
    controller: InteractionController,
    fps: FpsMeter,

    /// CPU scene, consumed by the upload in `on_start`.
    scene: Option<MorphScene>,
    particles: Option<ParticleSystem>,
}

impl MorphApp {
    pub fn new(config: ViewerConfig, scene: MorphScene) -> Self {
        Self {
            config,
            camera: Camera::default(),
            controller: InteractionController::new(),
            fps: FpsMeter::new(Duration::from_secs(2)),
            scene: Some(scene),
            particles: None,
        }
    }
}

impl App for MorphApp {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        let scene = self.scene.take().context("scene already uploaded")?;
        let [map_a, map_b] = &scene.maps;

        let particles = ParticleSystem::new(
            ctx.device,
            ctx.queue,
            ParticleSources {
                size: scene.grid.size(),
                positions_a: map_a.data(),
                positions_b: map_b.data(),
                particle_uvs: &scene.particle_uvs,
            },
        )
        .context("failed to upload particle scene")?;

        let viewport = ctx.window.viewport();
        log::info!(
            "{} particles, {}x{} {:?} surface; click or press Space to morph",
            particles.particle_count(),
            viewport.width,
            viewport.height,
            ctx.surface_format
        );
        self.particles = Some(particles);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.controller.handle_input(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }

        let blend_time = self.controller.advance();
        if let Some(fps) = self.fps.record(&ctx.time) {
            log::debug!(
                "{fps:.1} fps, blend time {:.3}, blend {:.3}",
                self.controller.clock().time(),
                self.controller.clock().blend()
            );
        }

        let Some(particles) = self.particles.as_mut() else {
            return AppControl::Continue;
        };

        let camera = &self.camera;
        let (color, point_size) = (self.config.color, self.config.point_size);

        ctx.render(Color::BLACK, |rctx, target| {
            let frame = ParticleFrame {
                blend_time,
                view_proj: camera.view_proj(rctx.aspect()),
                color,
                point_size,
            };
            particles.render(rctx, target, &frame);
        })
    }
}
