use glam::Vec3;
use rand::Rng;

/// Ordered, immutable set of sampled positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Vec3>,
}

impl PointCloud {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Random points inside the unit ball.
    ///
    /// Stand-in source used when no mesh is supplied for a model.
    pub fn random_ball<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let points = (0..count)
            .map(|_| {
                let distance = rng.r#gen::<f32>().cbrt();
                let theta = rng.gen_range(0.0..std::f32::consts::PI);
                let phi = rng.gen_range(0.0..std::f32::consts::TAU);
                let (sin_t, cos_t) = theta.sin_cos();
                let (sin_p, cos_p) = phi.sin_cos();
                Vec3::new(sin_t * cos_p, sin_t * sin_p, cos_t) * distance
            })
            .collect();

        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Flattens to `[x, y, z, 1.0]` per point, the texel layout of a position map.
    pub fn to_rgba(&self) -> Vec<f32> {
        self.points
            .iter()
            .flat_map(|p| [p.x, p.y, p.z, 1.0])
            .collect()
    }
}
