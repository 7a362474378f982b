//! Mesh file I/O.
//!
//! Sphere meshes are exchanged as Wavefront OBJ text. Two views of a file are
//! available:
//!
//! | Type | Module | Use |
//! |------|--------|-----|
//! | [`ObjMesh`](crate::mesh::ObjMesh) | [`obj`] | Parsed geometry, re-serialized with fixed formatting |
//! | [`ObjDocument`] | [`document`] | Raw tagged lines, re-emitted verbatim |
//!
//! # Usage
//!
//! ```no_run
//! use spheremap::io::{load, save};
//!
//! let mesh = load("sphere.obj").unwrap();
//! save(&mesh, "sphere-uv.obj").unwrap();
//! ```

pub mod document;
pub mod obj;

use std::path::Path;

use crate::error::Result;
use crate::mesh::ObjMesh;

pub use document::ObjDocument;

/// Load a mesh from an OBJ file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ObjMesh> {
    obj::load(path)
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &ObjMesh, path: P) -> Result<()> {
    obj::save(mesh, path)
}
