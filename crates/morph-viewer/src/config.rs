use std::path::PathBuf;

use anyhow::{Result, bail, ensure};
use clap::Parser;
use morph_engine::logging::LoggingConfig;
use morph_engine::paint::Color;
use morph_engine::render::targets::max_position_size;
use morph_engine::window::RuntimeConfig;
use morph_mesh::{DEFAULT_CHUNK, ParticleGrid};
use winit::dpi::LogicalSize;

/// `morph-viewer` - samples two meshes into particle clouds and morphs
/// between them on the GPU.
///
/// Click (or press Space) to advance the morph by a quarter period; each
/// click extends it further. `R` resets, Escape quits.
#[derive(Parser, Debug, Clone)]
#[command(name = "morph-viewer", version, about, long_about = None)]
pub struct ViewerArgs {
    /// Wavefront OBJ for the first model. A random ball is used when omitted.
    #[arg(long)]
    pub model_a: Option<PathBuf>,

    /// Wavefront OBJ for the second model. A random ball is used when omitted.
    #[arg(long)]
    pub model_b: Option<PathBuf>,

    /// Side length of the particle grid; `size²` particles are drawn. At most 8192.
    #[arg(long, default_value_t = 128)]
    pub size: u32,

    /// Normalization chunk, in floats.
    #[arg(long, default_value_t = DEFAULT_CHUNK)]
    pub chunk: usize,

    /// Seed for surface sampling. Entropy is used when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sprite diameter in physical pixels.
    #[arg(long, default_value_t = 2.0)]
    pub point_size: f32,

    /// Particle color as sRGB hex, `#rrggbb` or `#rrggbbaa`.
    #[arg(long, default_value = "#8fc7ff")]
    pub color: Color,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    #[arg(long, default_value = "morph")]
    pub title: String,

    /// Log filter in `env_logger` syntax; overrides `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,
}

/// Where a model's particles come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Obj(PathBuf),
    RandomBall,
}

impl ModelSource {
    fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::RandomBall, Self::Obj)
    }
}

/// Validated viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub models: [ModelSource; 2],
    pub grid: ParticleGrid,
    pub chunk: usize,
    pub seed: Option<u64>,
    pub point_size: f32,
    pub color: Color,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

impl ViewerConfig {
    pub fn from_args(args: ViewerArgs) -> Result<Self> {
        let Some(grid) = ParticleGrid::new(args.size) else {
            bail!("--size must be at least 1");
        };
        let max_size = max_position_size();
        ensure!(
            args.size <= max_size,
            "--size {} exceeds the largest position texture the GPU must support ({max_size})",
            args.size
        );
        ensure!(args.chunk > 0, "--chunk must be at least 1");
        ensure!(
            args.point_size.is_finite() && args.point_size > 0.0,
            "--point-size must be a positive number, got {}",
            args.point_size
        );
        ensure!(
            args.width > 0.0 && args.height > 0.0,
            "window size must be positive, got {}x{}",
            args.width,
            args.height
        );

        let logging = match args.log {
            Some(filter) => LoggingConfig::with_filter(filter),
            None => LoggingConfig::default(),
        };

        Ok(Self {
            models: [ModelSource::from_arg(args.model_a), ModelSource::from_arg(args.model_b)],
            grid,
            chunk: args.chunk,
            seed: args.seed,
            point_size: args.point_size,
            color: args.color,
            runtime: RuntimeConfig {
                title: args.title,
                initial_size: LogicalSize::new(args.width, args.height),
            },
            logging,
        })
    }
}
