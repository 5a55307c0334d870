//! Mesh sampling and position-map encoding for the particle morph.
//!
//! This crate has no GPU dependencies so the whole CPU side of the pipeline
//! (load → sample → normalize → encode) can be tested without a device.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`obj`] | `ObjMesh`, `ObjObject`: Wavefront OBJ geometry reader |
//! | [`mesh`] | `Triangle`, `TriangleMesh` |
//! | [`sampler`] | `SurfaceSampler`: area-weighted surface sampling |
//! | [`cloud`] | `PointCloud` |
//! | [`grid`] | `ParticleGrid`: the shared `size × size` layout |
//! | [`encode`] | `normalize_chunks`, `PositionMap` |
//! | [`error`] | `MeshError` |
//!
//! # Quick start
//!
//! ```rust
//! use morph_mesh::{ObjMesh, ParticleGrid, PositionMap, SurfaceSampler, DEFAULT_CHUNK};
//! use rand::SeedableRng;
//!
//! let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
//! let mesh = ObjMesh::from_reader(src.as_bytes())?.primary_mesh()?;
//!
//! let grid = ParticleGrid::new(4).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let cloud = SurfaceSampler::new(&mesh)?.sample_points(grid.sample_budget(), &mut rng);
//!
//! let map = PositionMap::encode(&cloud, grid, DEFAULT_CHUNK)?;
//! assert_eq!((map.width(), map.height()), (4, 4));
//! # Ok::<(), morph_mesh::MeshError>(())
//! ```

pub mod cloud;
pub mod encode;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod obj;
pub mod sampler;

pub use cloud::PointCloud;
pub use encode::{normalize_chunks, PositionMap, DEFAULT_CHUNK};
pub use error::MeshError;
pub use grid::ParticleGrid;
pub use mesh::{Triangle, TriangleMesh};
pub use obj::{ObjMesh, ObjObject};
pub use sampler::SurfaceSampler;
