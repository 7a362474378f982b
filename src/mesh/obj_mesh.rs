//! Indexed triangle mesh as stored in an OBJ file.
//!
//! Unlike a shared-vertex mesh, every face corner carries three independent
//! indices: position, texture coordinate and normal. That is what lets the
//! seam corrector give one position different texture coordinates in
//! different faces.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, NormalId, TexCoordId, VertexId};
use super::texcoord::TexCoordTable;

/// A vertex normal.
///
/// Normals are passed through untouched. When a normal was read from a file its
/// source text is kept so it can be written back byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    /// The normal direction.
    pub direction: Vector3<f64>,
    source: Option<String>,
}

impl Normal {
    /// Create a normal with no source text.
    pub fn new(direction: Vector3<f64>) -> Self {
        Self {
            direction,
            source: None,
        }
    }

    /// Create a normal that remembers the text it was parsed from
    /// (everything after the `vn` tag).
    pub fn with_source(direction: Vector3<f64>, source: impl Into<String>) -> Self {
        Self {
            direction,
            source: Some(source.into()),
        }
    }

    /// The text this normal was parsed from, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// One corner of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Position index.
    pub vertex: VertexId,
    /// Texture coordinate index, if the corner has one.
    pub tex_coord: Option<TexCoordId>,
    /// Normal index, if the corner has one.
    pub normal: Option<NormalId>,
}

impl Corner {
    /// A corner with only a position.
    pub fn new(vertex: VertexId) -> Self {
        Self {
            vertex,
            tex_coord: None,
            normal: None,
        }
    }

    /// Set the normal index.
    pub fn with_normal(mut self, normal: NormalId) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Set the texture coordinate index.
    pub fn with_tex_coord(mut self, tex_coord: TexCoordId) -> Self {
        self.tex_coord = Some(tex_coord);
        self
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// The three corners in winding order.
    pub corners: [Corner; 3],
}

impl Face {
    /// Create a face from three corners.
    pub fn new(corners: [Corner; 3]) -> Self {
        Self { corners }
    }

    /// The three position indices.
    pub fn vertices(&self) -> [VertexId; 3] {
        self.corners.map(|c| c.vertex)
    }

    /// The three texture coordinate indices, or `None` if any corner lacks one.
    pub fn tex_coords(&self) -> Option<[TexCoordId; 3]> {
        let [a, b, c] = self.corners;
        Some([a.tex_coord?, b.tex_coord?, c.tex_coord?])
    }

    /// Replace the three texture coordinate indices.
    pub fn set_tex_coords(&mut self, ids: [TexCoordId; 3]) {
        for (corner, id) in self.corners.iter_mut().zip(ids) {
            corner.tex_coord = Some(id);
        }
    }
}

/// A triangle mesh with separate position, normal and texture coordinate tables.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub(crate) names: Vec<String>,
    pub(crate) positions: Vec<Point3<f64>>,
    pub(crate) normals: Vec<Normal>,
    pub(crate) tex_coords: TexCoordTable,
    pub(crate) faces: Vec<Face>,
}

impl ObjMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Object names (`o` lines), in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> Point3<f64> {
        self.positions[v.index()]
    }

    /// Vertex normals.
    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    /// The texture coordinate table.
    pub fn tex_coords(&self) -> &TexCoordTable {
        &self.tex_coords
    }

    /// Mutable access to the texture coordinate table.
    pub fn tex_coords_mut(&mut self) -> &mut TexCoordTable {
        &mut self.tex_coords
    }

    /// All faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a face.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.index()]
    }

    /// Number of vertex positions.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of normals.
    #[inline]
    pub fn num_normals(&self) -> usize {
        self.normals.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Construction ====================

    /// Add an object name.
    pub fn add_name(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Add a vertex position and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Add a normal and return its ID.
    pub fn add_normal(&mut self, normal: Normal) -> NormalId {
        let id = NormalId::new(self.normals.len());
        self.normals.push(normal);
        id
    }

    /// Add a face and return its ID.
    ///
    /// Indices are not checked here; the OBJ reader and the generators only
    /// produce in-range indices.
    pub fn add_face(&mut self, face: Face) -> FaceId {
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        id
    }
}
