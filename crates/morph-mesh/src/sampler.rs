use glam::Vec3;
use rand::Rng;

use crate::cloud::PointCloud;
use crate::error::MeshError;
use crate::mesh::{Triangle, TriangleMesh};

/// Draws points uniformly over a mesh surface.
///
/// Triangles are selected with probability proportional to their area via a
/// cumulative-area table, then a point is picked uniformly inside the chosen
/// triangle.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    triangles: Vec<Triangle>,
    /// `cumulative[i]` is the summed area of triangles `0..=i`.
    cumulative: Vec<f32>,
    total: f32,
}

impl SurfaceSampler {
    pub fn new(mesh: &TriangleMesh) -> Result<Self, MeshError> {
        if mesh.is_empty() {
            return Err(MeshError::NoFaces);
        }

        let triangles: Vec<Triangle> = mesh.triangles().collect();
        let mut cumulative = Vec::with_capacity(triangles.len());
        let mut total = 0.0f32;
        for t in &triangles {
            total += t.area();
            cumulative.push(total);
        }

        if !(total > 0.0 && total.is_finite()) {
            return Err(MeshError::ZeroArea);
        }

        Ok(Self { triangles, cumulative, total })
    }

    /// Total surface area covered by the sampler.
    pub fn area(&self) -> f32 {
        self.total
    }

    /// Samples one surface point.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let triangle = &self.triangles[self.pick(rng.gen_range(0.0..self.total))];

        let mut u: f32 = rng.r#gen();
        let mut v: f32 = rng.r#gen();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }

        triangle.point_at(u, v)
    }

    /// Samples exactly `count` points.
    pub fn sample_points<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> PointCloud {
        PointCloud::from_points((0..count).map(|_| self.sample(rng)).collect())
    }

    fn pick(&self, r: f32) -> usize {
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.triangles.len() - 1)
    }
}
