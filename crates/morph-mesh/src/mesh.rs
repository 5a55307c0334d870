use glam::Vec3;

/// A single triangle in model space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Surface area of the triangle.
    #[inline]
    pub fn area(&self) -> f32 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    /// Point at barycentric coordinates `(u, v)`, weighting `b` by `u` and `c` by `v`.
    #[inline]
    pub fn point_at(&self, u: f32, v: f32) -> Vec3 {
        self.a + (self.b - self.a) * u + (self.c - self.a) * v
    }
}

/// Indexed triangle soup.
///
/// Indices are validated at construction time by the loader, so every entry of
/// `indices` addresses a vertex in `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Builds a mesh from vertices and triangle indices.
    ///
    /// Triangles referencing a missing vertex are dropped with a warning.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        let count = vertices.len();
        let before = indices.len();
        let indices: Vec<[u32; 3]> = indices
            .into_iter()
            .filter(|tri| tri.iter().all(|&i| (i as usize) < count))
            .collect();

        if indices.len() != before {
            log::warn!(
                "dropped {} triangles with out-of-range indices",
                before - indices.len()
            );
        }

        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.iter().map(|&[a, b, c]| {
            Triangle::new(
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            )
        })
    }

    /// Total surface area.
    pub fn area(&self) -> f32 {
        self.triangles().map(|t| t.area()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn triangle_area_right_angle() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X * 2.0, Vec3::Y * 3.0);
        assert!((t.area() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_has_zero_area() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(t.area(), 0.0);
    }

    #[test]
    fn point_at_corners() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(t.point_at(0.0, 0.0), Vec3::ZERO);
        assert_eq!(t.point_at(1.0, 0.0), Vec3::X);
        assert_eq!(t.point_at(0.0, 1.0), Vec3::Y);
    }

    #[test]
    fn square_area_is_one() {
        assert!((unit_square().area() - 1.0).abs() < 1e-6);
        assert_eq!(unit_square().triangle_count(), 2);
    }

    #[test]
    fn out_of_range_triangles_are_dropped() {
        let mesh = TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2], [0, 1, 7]]);
        assert_eq!(mesh.triangle_count(), 1);
    }
}
