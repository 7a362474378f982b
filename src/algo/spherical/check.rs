//! Consistency checks for corrected texture coordinates.

use crate::mesh::{FaceId, ObjMesh, TexCoordId, TexCoordTable};

/// Why a face's texture coordinates cannot be interpolated cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inconsistency {
    /// A corner has no texture coordinate index.
    MissingTexCoord,
    /// A corner's index is past the end of the table.
    DanglingTexCoord,
    /// A corner still has an undefined longitude.
    UndefinedLongitude,
    /// The corners span more than the allowed fraction of a turn.
    Wrap {
        /// The longitude span across the face.
        span: f64,
    },
}

/// Longitude span (`max u - min u`) of a triangle.
///
/// Returns `None` if an index is out of range or a longitude is undefined.
pub fn face_span(table: &TexCoordTable, ids: [TexCoordId; 3]) -> Option<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for id in ids {
        let u = table.try_get(id)?.u?;
        min = min.min(u);
        max = max.max(u);
    }
    Some(max - min)
}

/// List every face whose texture coordinates are still inconsistent.
///
/// On a mesh corrected with the same `wrap_span` this is empty unless the
/// tessellation is too coarse for the thresholds.
pub fn inconsistent_faces(mesh: &ObjMesh, wrap_span: f64) -> Vec<(FaceId, Inconsistency)> {
    let table = mesh.tex_coords();
    mesh.face_ids()
        .filter_map(|f| {
            let Some(ids) = mesh.face(f).tex_coords() else {
                return Some((f, Inconsistency::MissingTexCoord));
            };
            let mut coords = ids.iter().map(|&id| table.try_get(id));
            if coords.clone().any(|tc| tc.is_none()) {
                return Some((f, Inconsistency::DanglingTexCoord));
            }
            if coords.any(|tc| tc.is_some_and(|tc| tc.is_pole())) {
                return Some((f, Inconsistency::UndefinedLongitude));
            }
            match face_span(table, ids) {
                Some(span) if span > wrap_span => Some((f, Inconsistency::Wrap { span })),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Corner, Face, TexCoord, VertexId};
    use nalgebra::Point3;

    fn mesh_with(coords: &[TexCoord], faces: &[[usize; 3]]) -> ObjMesh {
        let mut mesh = ObjMesh::new();
        mesh.add_vertex(Point3::origin());
        for &tc in coords {
            mesh.tex_coords_mut().push(tc);
        }
        for face in faces {
            mesh.add_face(Face::new(face.map(|t| {
                Corner::new(VertexId::new(0)).with_tex_coord(TexCoordId::new(t))
            })));
        }
        mesh
    }

    #[test]
    fn test_face_span() {
        let table: TexCoordTable = vec![
            TexCoord::new(0.1, 0.5),
            TexCoord::new(0.7, 0.5),
            TexCoord::pole(1.0),
        ]
        .into_iter()
        .collect();
        let span = face_span(&table, [0, 1, 0].map(TexCoordId::new)).unwrap();
        assert!((span - 0.6).abs() < 1e-12);
        assert!(face_span(&table, [0, 1, 2].map(TexCoordId::new)).is_none());
        assert!(face_span(&table, [0, 1, 3].map(TexCoordId::new)).is_none());
    }

    #[test]
    fn test_inconsistent_faces() {
        let mesh = mesh_with(
            &[
                TexCoord::new(0.0, 0.5),
                TexCoord::new(0.9, 0.5),
                TexCoord::new(0.95, 0.6),
                TexCoord::pole(1.0),
                TexCoord::new(1.0, 0.5),
            ],
            &[[4, 1, 2], [0, 1, 2], [3, 1, 2], [0, 1, 7]],
        );

        let found = inconsistent_faces(&mesh, 0.5);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].0, FaceId::new(1));
        assert!(matches!(found[0].1, Inconsistency::Wrap { span } if (span - 0.95).abs() < 1e-12));
        assert_eq!(found[1], (FaceId::new(2), Inconsistency::UndefinedLongitude));
        assert_eq!(found[2], (FaceId::new(3), Inconsistency::DanglingTexCoord));
    }

    #[test]
    fn test_missing_texcoord() {
        let mut mesh = ObjMesh::new();
        let v = mesh.add_vertex(Point3::origin());
        mesh.add_face(Face::new([Corner::new(v); 3]));
        assert_eq!(
            inconsistent_faces(&mesh, 0.5),
            vec![(FaceId::new(0), Inconsistency::MissingTexCoord)]
        );
    }
}
