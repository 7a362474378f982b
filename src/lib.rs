//! # Spheremap
//!
//! Equirectangular texture coordinates for unit-sphere meshes.
//!
//! Spheremap reads a triangulated sphere from a Wavefront OBJ file, gives each
//! vertex a longitude/latitude texture coordinate, and repairs the triangles
//! that would otherwise smear the whole texture across the longitude seam or
//! collapse at a pole.
//!
//! ## Features
//!
//! - **Per-corner texture coordinates**: faces index positions, normals and
//!   texture coordinates independently, with type-safe indices
//! - **Seam and pole correction**: duplicate texture coordinates are appended,
//!   existing ones are never changed
//! - **OBJ I/O**: parsed meshes with fixed formatting, or raw lines kept verbatim
//! - **Winding reversal**: flips every triangle without touching other lines
//! - **UV sphere generator**: test meshes with a known seam and two poles
//!
//! ## Quick Start
//!
//! ```no_run
//! use spheremap::prelude::*;
//!
//! let mut mesh = spheremap::io::load("sphere.obj").unwrap();
//!
//! let report = spherical_uv(&mut mesh, &SphericalOptions::default()).unwrap();
//! println!("Seam faces: {}", report.corrections.seam_faces);
//! println!("Pole faces: {}", report.corrections.pole_faces);
//!
//! spheremap::io::save(&mesh, "sphere-uv.obj").unwrap();
//! ```
//!
//! ## Custom Axes
//!
//! ```
//! use spheremap::prelude::*;
//! use nalgebra::Vector3;
//!
//! // Same polar axis, seam turned a quarter turn
//! let basis = ProjectionBasis::new(Vector3::y(), Vector3::x()).unwrap();
//! let options = SphericalOptions::default().with_basis(basis);
//!
//! let mut mesh = uv_sphere(&UvSphereOptions::new(12, 6)).unwrap();
//! spherical_uv(&mut mesh, &options).unwrap();
//! assert!(inconsistent_faces(&mesh, options.wrap_span).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use spheremap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::spherical::{
        correct_seams, inconsistent_faces, spherical_uv, ProjectionBasis, SphericalOptions,
        SphericalReport, TexCoordSource,
    };
    pub use crate::algo::winding::reverse_winding;
    pub use crate::error::{MeshError, Result};
    pub use crate::io::ObjDocument;
    pub use crate::mesh::{
        uv_sphere, Corner, Face, FaceId, Normal, NormalId, ObjMesh, TexCoord, TexCoordId,
        TexCoordTable, UvSphereOptions, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_sphere_pipeline() {
        let mut mesh = uv_sphere(&UvSphereOptions::new(16, 8)).unwrap();
        let options = SphericalOptions::default();
        let report = spherical_uv(&mut mesh, &options).unwrap();

        assert_eq!(report.projected_vertices, mesh.num_vertices());
        assert_eq!(report.corrections.pole_faces, 32);
        assert!(inconsistent_faces(&mesh, options.wrap_span).is_empty());

        // Every pole corner was given its own longitude
        for f in mesh.face_ids() {
            for id in mesh.face(f).tex_coords().unwrap() {
                assert!(!mesh.tex_coords().get(id).is_pole());
            }
        }
    }

    #[test]
    fn test_reverse_round_trip() {
        let text = "v 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\n";
        let mut doc = ObjDocument::read(text.as_bytes()).unwrap();
        reverse_winding(&mut doc).unwrap();
        assert_eq!(doc.faces[0].1, "f 3 2 1");
    }
}
