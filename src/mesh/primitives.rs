//! Procedural sphere meshes.

use std::f64::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::{MeshError, Result};

use super::index::VertexId;
use super::obj_mesh::{Corner, Face, Normal, ObjMesh};

/// Tessellation of a latitude/longitude sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvSphereOptions {
    /// Vertices around each latitude ring (at least 3).
    pub segments: usize,
    /// Latitude bands from pole to pole (at least 2).
    pub rings: usize,
}

impl Default for UvSphereOptions {
    fn default() -> Self {
        Self {
            segments: 32,
            rings: 16,
        }
    }
}

impl UvSphereOptions {
    /// Create options with the given tessellation.
    pub fn new(segments: usize, rings: usize) -> Self {
        Self { segments, rings }
    }

    /// Check that the tessellation describes a closed sphere.
    pub fn validate(&self) -> Result<()> {
        if self.segments < 3 {
            return Err(MeshError::invalid_param(
                "segments",
                self.segments,
                "must be at least 3",
            ));
        }
        if self.rings < 2 {
            return Err(MeshError::invalid_param(
                "rings",
                self.rings,
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Generate a unit UV sphere around the origin with `+y` as its polar axis.
///
/// Each pole is a single vertex shared by a fan of triangles, and ring
/// vertex `s` sits at longitude `s / segments` of a turn measured from `+x`
/// towards `-z`. The last column of faces therefore joins `u` close to 1
/// with `u = 0`, which is the seam [`spherical_uv`] has to repair.
///
/// Faces are counter-clockwise seen from outside. Every vertex gets its
/// position as its normal.
///
/// [`spherical_uv`]: crate::algo::spherical::spherical_uv
///
/// # Example
///
/// ```
/// use spheremap::mesh::{uv_sphere, UvSphereOptions};
///
/// let mesh = uv_sphere(&UvSphereOptions::new(8, 4)).unwrap();
/// assert_eq!(mesh.num_vertices(), 2 + 8 * 3);
/// assert_eq!(mesh.num_faces(), 2 * 8 * 3);
/// ```
pub fn uv_sphere(options: &UvSphereOptions) -> Result<ObjMesh> {
    options.validate()?;
    let UvSphereOptions { segments, rings } = *options;

    let mut mesh = ObjMesh::new();
    mesh.add_name("Sphere");

    let add = |mesh: &mut ObjMesh, p: Point3<f64>| -> VertexId {
        let v = mesh.add_vertex(p);
        mesh.add_normal(Normal::new(p.coords));
        v
    };

    let north = add(&mut mesh, Point3::new(0.0, 1.0, 0.0));
    let mut ring_ids: Vec<Vec<VertexId>> = Vec::with_capacity(rings - 1);
    for j in 1..rings {
        let phi = j as f64 / rings as f64 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let ring = (0..segments)
            .map(|s| {
                let theta = s as f64 / segments as f64 * TAU;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let dir = Vector3::new(sin_phi * cos_theta, cos_phi, -sin_phi * sin_theta);
                add(&mut mesh, Point3::from(dir))
            })
            .collect();
        ring_ids.push(ring);
    }
    let south = add(&mut mesh, Point3::new(0.0, -1.0, 0.0));

    // Normals were pushed in lockstep with positions.
    let tri = |a: VertexId, b: VertexId, c: VertexId| {
        Face::new([a, b, c].map(|v| Corner::new(v).with_normal(v.index().into())))
    };

    let first = &ring_ids[0];
    for s in 0..segments {
        let next = (s + 1) % segments;
        mesh.add_face(tri(north, first[s], first[next]));
    }

    for band in ring_ids.windows(2) {
        let (upper, lower) = (&band[0], &band[1]);
        for s in 0..segments {
            let next = (s + 1) % segments;
            mesh.add_face(tri(upper[s], lower[s], lower[next]));
            mesh.add_face(tri(upper[s], lower[next], upper[next]));
        }
    }

    let last = &ring_ids[ring_ids.len() - 1];
    for s in 0..segments {
        let next = (s + 1) % segments;
        mesh.add_face(tri(south, last[next], last[s]));
    }

    debug!(
        "Generated UV sphere: {} segments, {} rings, {} vertices, {} faces",
        segments,
        rings,
        mesh.num_vertices(),
        mesh.num_faces()
    );

    Ok(mesh)
}
