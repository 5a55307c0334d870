use crate::cloud::PointCloud;
use crate::error::MeshError;
use crate::grid::ParticleGrid;

/// Default normalization chunk, in floats (250 RGBA texels).
pub const DEFAULT_CHUNK: usize = 1000;

/// Scales each `chunk`-sized run of `values` into `[-1, 1]`.
///
/// Every chunk is divided by its own maximum absolute value, so chunks are
/// normalized independently of one another. An all-zero chunk is left as is.
/// The final chunk may be shorter than `chunk`.
pub fn normalize_chunks(values: &mut [f32], chunk: usize) -> Result<(), MeshError> {
    if chunk == 0 {
        return Err(MeshError::ZeroChunk);
    }

    for run in values.chunks_mut(chunk) {
        let max_abs = run.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        if max_abs == 0.0 {
            continue;
        }
        for v in run.iter_mut() {
            *v /= max_abs;
        }
    }

    Ok(())
}

/// CPU-side RGBA32F position map, `size × size` texels.
///
/// Texel `i` (row-major) stores the normalized position of particle `i` in
/// its RGB channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionMap {
    grid: ParticleGrid,
    texels: Vec<f32>,
}

impl PositionMap {
    /// Encodes a sampled cloud into a position map.
    ///
    /// The whole cloud is laid out as `[x, y, z, 1]` texels and normalized in
    /// `chunk`-float runs; the first `grid.count()` texels are kept.
    pub fn encode(cloud: &PointCloud, grid: ParticleGrid, chunk: usize) -> Result<Self, MeshError> {
        let needed = grid.count();
        if cloud.len() < needed {
            return Err(MeshError::NotEnoughSamples { needed, got: cloud.len() });
        }

        let mut texels = cloud.to_rgba();
        normalize_chunks(&mut texels, chunk)?;
        texels.truncate(needed * 4);

        Ok(Self { grid, texels })
    }

    pub fn grid(&self) -> ParticleGrid {
        self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.size()
    }

    pub fn height(&self) -> u32 {
        self.grid.size()
    }

    /// Raw RGBA floats, `width * height * 4` values.
    pub fn data(&self) -> &[f32] {
        &self.texels
    }

    pub fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = (y as usize * self.grid.size() as usize + x as usize) * 4;
        [self.texels[i], self.texels[i + 1], self.texels[i + 2], self.texels[i + 3]]
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_normalized(values: &[f32], chunk: usize) {
        for run in values.chunks(chunk) {
            assert!(run.iter().all(|v| v.abs() <= 1.0), "value above 1 in {run:?}");
            if run.iter().any(|&v| v != 0.0) {
                assert!(run.iter().any(|v| v.abs() == 1.0), "no unit value in {run:?}");
            }
        }
    }

    #[test]
    fn chunks_are_normalized_independently() {
        let mut values = vec![2.0, -4.0, 1.0, 0.5, 0.25, -0.125];
        normalize_chunks(&mut values, 3).unwrap();
        assert_eq!(values, vec![0.5, -1.0, 0.25, 1.0, 0.5, -0.25]);
    }

    #[test]
    fn zero_chunk_is_untouched() {
        let mut values = vec![0.0, 0.0, 3.0, 6.0];
        normalize_chunks(&mut values, 2).unwrap();
        assert_eq!(values, vec![0.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn trailing_partial_chunk() {
        let mut values = vec![1.0, 2.0, 8.0];
        normalize_chunks(&mut values, 2).unwrap();
        assert_eq!(values, vec![0.5, 1.0, 1.0]);
    }

    #[test]
    fn chunk_size_zero_is_rejected() {
        assert!(matches!(normalize_chunks(&mut [1.0], 0), Err(MeshError::ZeroChunk)));
    }

    #[test]
    fn every_chunk_size_bounds_and_hits_unit() {
        let mut rng = StdRng::seed_from_u64(11);
        let source: Vec<f32> = (0..997).map(|_| rng.gen_range(-250.0..250.0)).collect();
        for chunk in [1, 2, 3, 7, 64, 250, 1000, 4096] {
            let mut values = source.clone();
            normalize_chunks(&mut values, chunk).unwrap();
            assert_normalized(&values, chunk);
        }
    }

    #[test]
    fn size_four_map_is_four_by_four() {
        let grid = ParticleGrid::new(4).unwrap();
        let points = (0..grid.sample_budget()).map(|i| Vec3::splat(i as f32)).collect();
        let map = PositionMap::encode(&PointCloud::from_points(points), grid, DEFAULT_CHUNK).unwrap();
        assert_eq!((map.width(), map.height()), (4, 4));
        assert_eq!(map.data().len(), 16 * 4);
        assert_eq!((map.width() * map.height()) as usize, grid.count());
    }

    #[test]
    fn texels_hold_normalized_positions_in_order() {
        let grid = ParticleGrid::new(2).unwrap();
        let cloud = PointCloud::from_points(vec![
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, -4.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(8.0, 8.0, 8.0),
        ]);
        // One chunk covers every texel, including the over-drawn fifth sample.
        let map = PositionMap::encode(&cloud, grid, DEFAULT_CHUNK).unwrap();
        assert_eq!(map.texel(0, 0), [0.25, 0.0, 0.0, 0.125]);
        assert_eq!(map.texel(1, 0), [0.0, -0.5, 0.0, 0.125]);
        assert_eq!(map.texel(1, 1), [0.125, 0.125, 0.125, 0.125]);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let grid = ParticleGrid::new(3).unwrap();
        let cloud = PointCloud::from_points(vec![Vec3::ONE; 8]);
        match PositionMap::encode(&cloud, grid, DEFAULT_CHUNK) {
            Err(MeshError::NotEnoughSamples { needed, got }) => assert_eq!((needed, got), (9, 8)),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
