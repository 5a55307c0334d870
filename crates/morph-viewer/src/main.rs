//! Particle morph viewer.
//!
//! Samples two meshes into `size²` particles each, uploads them as float
//! position textures and morphs between them on the GPU. See `--help`.

mod app;
mod camera;
mod config;
mod controller;
mod scene;

use anyhow::Result;
use clap::Parser;
use morph_engine::device::GpuInit;
use morph_engine::logging::init_logging;
use morph_engine::window::Runtime;

use crate::app::MorphApp;
use crate::config::{ViewerArgs, ViewerConfig};
use crate::scene::MorphScene;

fn main() -> Result<()> {
    let config = ViewerConfig::from_args(ViewerArgs::parse())?;
    init_logging(config.logging.clone());

    let scene = MorphScene::build(&config)?;
    let runtime = config.runtime.clone();

    Runtime::run(runtime, GpuInit::default(), MorphApp::new(config, scene))
}
