/// Square particle layout shared by position maps, render targets and the
/// display pass.
///
/// Every consumer derives its dimensions from the same grid so the particle
/// count, the texel count of each position map and the instance count of the
/// display pass always agree (`size * size`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ParticleGrid {
    size: u32,
}

impl ParticleGrid {
    /// Creates a `size × size` grid. Returns `None` for `size == 0`.
    pub const fn new(size: u32) -> Option<Self> {
        if size == 0 { None } else { Some(Self { size }) }
    }

    /// Side length in texels.
    #[inline]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of particles (`size²`).
    #[inline]
    pub const fn count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    /// Number of surface samples drawn per mesh: `⌈size² · 4/3⌉`.
    ///
    /// The sampler over-draws; the encoder keeps the first `size²` samples.
    #[inline]
    pub const fn sample_budget(&self) -> usize {
        (self.count() * 4).div_ceil(3)
    }

    /// Texel-center grid coordinate of particle `index`, in `[0, 1)`.
    pub fn uv(&self, index: usize) -> [f32; 2] {
        let size = self.size as usize;
        let col = index % size;
        let row = index / size;
        let s = self.size as f32;
        [(col as f32 + 0.5) / s, (row as f32 + 0.5) / s]
    }

    /// Grid coordinates for every particle, in row-major order.
    pub fn uvs(&self) -> Vec<[f32; 2]> {
        (0..self.count()).map(|i| self.uv(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(ParticleGrid::new(0).is_none());
    }

    #[test]
    fn size_four_has_sixteen_particles() {
        let grid = ParticleGrid::new(4).unwrap();
        assert_eq!(grid.count(), 16);
        assert_eq!(grid.uvs().len(), 16);
    }

    #[test]
    fn sample_budget_rounds_up() {
        // 16 * 4 / 3 = 21.33
        assert_eq!(ParticleGrid::new(4).unwrap().sample_budget(), 22);
        // 9 * 4 / 3 = 12 exactly
        assert_eq!(ParticleGrid::new(3).unwrap().sample_budget(), 12);
        assert_eq!(ParticleGrid::new(1).unwrap().sample_budget(), 2);
    }

    #[test]
    fn uv_addresses_texel_centers_row_major() {
        let grid = ParticleGrid::new(4).unwrap();
        assert_eq!(grid.uv(0), [0.125, 0.125]);
        assert_eq!(grid.uv(3), [0.875, 0.125]);
        assert_eq!(grid.uv(4), [0.125, 0.375]);
        assert_eq!(grid.uv(15), [0.875, 0.875]);
    }

    #[test]
    fn uv_maps_back_to_its_texel() {
        let grid = ParticleGrid::new(7).unwrap();
        for i in 0..grid.count() {
            let [u, v] = grid.uv(i);
            let col = (u * 7.0).floor() as usize;
            let row = (v * 7.0).floor() as usize;
            assert_eq!(row * 7 + col, i);
        }
    }
}
