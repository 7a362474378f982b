//! Core mesh data structures.
//!
//! This module provides the indexed triangle mesh read from and written to
//! OBJ files, together with its texture coordinate table.
//!
//! # Overview
//!
//! The primary type is [`ObjMesh`]. It keeps positions, normals and texture
//! coordinates in separate tables and lets each face corner index them
//! independently, exactly like the `f p/t/n` syntax of the file format.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex position
//! - [`TexCoordId`] - Identifies a texture coordinate
//! - [`NormalId`] - Identifies a normal
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use spheremap::mesh::{Corner, Face, ObjMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = ObjMesh::new();
//! let a = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
//! mesh.add_face(Face::new([Corner::new(a), Corner::new(b), Corner::new(c)]));
//!
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod index;
mod obj_mesh;
mod primitives;
mod texcoord;

pub use index::{FaceId, NormalId, TexCoordId, VertexId};
pub use obj_mesh::{Corner, Face, Normal, ObjMesh};
pub use primitives::{uv_sphere, UvSphereOptions};
pub use texcoord::{TexCoord, TexCoordTable, UNDEFINED_U_FALLBACK};
