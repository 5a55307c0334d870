use anyhow::{Context, Result};
use morph_mesh::{ObjMesh, ParticleGrid, PointCloud, PositionMap, SurfaceSampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ModelSource, ViewerConfig};

/// CPU-side particle data for both models, ready for upload.
#[derive(Debug, Clone)]
pub struct MorphScene {
    pub grid: ParticleGrid,
    pub maps: [PositionMap; 2],
    pub particle_uvs: Vec<[f32; 2]>,
}

impl MorphScene {
    /// Samples both models and encodes them into position maps.
    ///
    /// Sampling uses `StdRng` seeded from `config.seed`, or from entropy.
    pub fn build(config: &ViewerConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let [a, b] = &config.models;
        let map_a = encode_model(a, config.grid, config.chunk, &mut rng).context("model A")?;
        let map_b = encode_model(b, config.grid, config.chunk, &mut rng).context("model B")?;

        Ok(Self {
            grid: config.grid,
            maps: [map_a, map_b],
            particle_uvs: config.grid.uvs(),
        })
    }
}

fn encode_model<R: Rng + ?Sized>(
    source: &ModelSource,
    grid: ParticleGrid,
    chunk: usize,
    rng: &mut R,
) -> Result<PositionMap> {
    let cloud = sample_model(source, grid.sample_budget(), rng)?;
    let map = PositionMap::encode(&cloud, grid, chunk)?;
    log::info!(
        "encoded {} of {} samples into a {}x{} position map",
        grid.count(),
        cloud.len(),
        map.width(),
        map.height()
    );
    Ok(map)
}

fn sample_model<R: Rng + ?Sized>(source: &ModelSource, count: usize, rng: &mut R) -> Result<PointCloud> {
    match source {
        ModelSource::Obj(path) => {
            let obj = ObjMesh::load(path)?;
            let mesh = obj
                .primary_mesh()
                .with_context(|| format!("no usable object in {}", path.display()))?;
            log::info!(
                "{}: {} vertices, {} triangles, surface area {:.4}",
                path.display(),
                mesh.vertices().len(),
                mesh.triangle_count(),
                mesh.area()
            );
            Ok(SurfaceSampler::new(&mesh)?.sample_points(count, rng))
        }
        ModelSource::RandomBall => {
            log::info!("no model given, using {count} random points in a unit ball");
            Ok(PointCloud::random_ball(count, rng))
        }
    }
}
