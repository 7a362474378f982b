//! Seam and pole correction.
//!
//! A sphere tessellated into rings has two kinds of triangles whose
//! per-vertex texture coordinates cannot be interpolated directly:
//!
//! - **Seam triangles** straddle `u = 0`. Some of their corners read `u ≈ 0`
//!   while the rest read `u ≈ 1`, so the triangle would smear the whole
//!   texture across itself. The `u ≈ 0` corners get a duplicate at `u = 1`.
//! - **Pole triangles** have one corner on a pole, where `u` is undefined.
//!   That corner gets a duplicate whose `u` is the mean of the other two,
//!   after those have been moved to the same side of the seam.
//!
//! Duplicates are appended to the texture coordinate table and only the
//! triangle being corrected is repointed; neighbouring triangles keep the
//! original per-vertex entries.

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, ObjMesh, TexCoord, TexCoordId, TexCoordTable};

use super::SphericalOptions;

/// Which correction a triangle received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// The triangle was consistent already.
    Untouched,
    /// The triangle straddles the seam.
    Seam,
    /// The triangle has a corner on a pole.
    Pole,
}

/// Result of correcting one triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    /// The triangle's texcoord indices after correction.
    pub tex_coords: [TexCoordId; 3],
    /// Which branch applied.
    pub kind: CorrectionKind,
    /// Number of entries appended to the table.
    pub appended: usize,
}

/// Summary of a correction pass over a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Faces visited.
    pub faces: usize,
    /// Faces that took the seam branch.
    pub seam_faces: usize,
    /// Faces that took the pole branch.
    pub pole_faces: usize,
    /// Texture coordinates appended.
    pub appended: usize,
}

impl CorrectionReport {
    fn record(&mut self, correction: &Correction) {
        self.faces += 1;
        self.appended += correction.appended;
        match correction.kind {
            CorrectionKind::Untouched => {}
            CorrectionKind::Seam => self.seam_faces += 1,
            CorrectionKind::Pole => self.pole_faces += 1,
        }
    }
}

/// Correct the texture coordinates of one triangle.
///
/// `tex_coords` are the triangle's current texcoord indices into `table`.
/// New entries are appended to `table`; the returned indices point the
/// corrected corners at them. Corners that need no change keep their index.
///
/// # Errors
///
/// - [`MeshError::PoleCount`] if more than one corner is on a pole.
/// - [`MeshError::LatitudeMismatch`] if the two other corners of a pole
///   triangle are not on the same latitude ring.
/// - [`MeshError::InvalidTexCoordIndex`] if an index is not in `table`.
///
/// # Example
///
/// ```
/// use spheremap::algo::spherical::{correct_triangle, CorrectionKind, SphericalOptions};
/// use spheremap::mesh::{FaceId, TexCoord, TexCoordTable};
///
/// let mut table = TexCoordTable::new();
/// let ids = [
///     table.push(TexCoord::new(0.9, 0.5)),
///     table.push(TexCoord::new(0.0, 0.5)),
///     table.push(TexCoord::new(0.95, 0.6)),
/// ];
///
/// let c = correct_triangle(&mut table, FaceId::new(0), ids, &SphericalOptions::default()).unwrap();
/// assert_eq!(c.kind, CorrectionKind::Seam);
/// assert_eq!(table.get(c.tex_coords[1]), TexCoord::new(1.0, 0.5));
/// ```
pub fn correct_triangle(
    table: &mut TexCoordTable,
    face: FaceId,
    tex_coords: [TexCoordId; 3],
    options: &SphericalOptions,
) -> Result<Correction> {
    let mut coords = [TexCoord::pole(0.0); 3];
    for (slot, &id) in coords.iter_mut().zip(&tex_coords) {
        *slot = table
            .try_get(id)
            .ok_or(MeshError::InvalidTexCoordIndex {
                face: face.index(),
                index: id.one_based() as i64,
            })?;
    }

    match coords.map(|tc| tc.u) {
        [Some(u0), Some(u1), Some(u2)] => Ok(correct_wrap(
            table,
            tex_coords,
            [u0, u1, u2],
            coords.map(|tc| tc.v),
            options,
        )),
        _ => correct_pole(table, face, tex_coords, coords, options),
    }
}

fn correct_wrap(
    table: &mut TexCoordTable,
    mut ids: [TexCoordId; 3],
    u: [f64; 3],
    v: [f64; 3],
    options: &SphericalOptions,
) -> Correction {
    let min = u.iter().copied().fold(f64::INFINITY, f64::min);
    let max = u.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max - min <= options.wrap_span {
        return Correction {
            tex_coords: ids,
            kind: CorrectionKind::Untouched,
            appended: 0,
        };
    }

    // Corners not near 0 are already on the u ~ 1 side.
    let mut appended = 0;
    for ((id, u), v) in ids.iter_mut().zip(u).zip(v) {
        if u < options.seam_epsilon {
            *id = table.push(TexCoord::new(1.0, v));
            appended += 1;
        }
    }

    Correction {
        tex_coords: ids,
        kind: CorrectionKind::Seam,
        appended,
    }
}

fn correct_pole(
    table: &mut TexCoordTable,
    face: FaceId,
    mut ids: [TexCoordId; 3],
    coords: [TexCoord; 3],
    options: &SphericalOptions,
) -> Result<Correction> {
    let base: Vec<(usize, f64, f64)> = coords
        .iter()
        .enumerate()
        .filter_map(|(slot, tc)| tc.u.map(|u| (slot, u, tc.v)))
        .collect();

    let &[(slot_a, u_a, v_a), (slot_b, u_b, v_b)] = base.as_slice() else {
        return Err(MeshError::PoleCount {
            face: face.index(),
            count: 3 - base.len(),
        });
    };
    let (mut u_a, mut u_b) = (u_a, u_b);
    // Slots are 0, 1 and 2.
    let pole = 3 - slot_a - slot_b;

    let dv = (v_a - v_b).abs();
    if dv.is_nan() || dv >= options.latitude_epsilon {
        return Err(MeshError::LatitudeMismatch {
            face: face.index(),
            v0: v_a,
            v1: v_b,
        });
    }

    let mut appended = 0;
    if (u_a - u_b).abs() > options.pole_span {
        for (slot, u, v) in [(slot_a, &mut u_a, v_a), (slot_b, &mut u_b, v_b)] {
            if *u < options.seam_epsilon {
                ids[slot] = table.push(TexCoord::new(1.0, v));
                *u = 1.0;
                appended += 1;
            }
        }
    }

    ids[pole] = table.push(TexCoord::new((u_a + u_b) / 2.0, coords[pole].v));
    appended += 1;

    Ok(Correction {
        tex_coords: ids,
        kind: CorrectionKind::Pole,
        appended,
    })
}

/// Correct a sequence of triangles against one table, in order.
///
/// Returns the rewired indices of every triangle, in the same order.
pub(super) fn correct_faces<T>(
    table: &mut TexCoordTable,
    faces: T,
    options: &SphericalOptions,
) -> Result<(Vec<[TexCoordId; 3]>, CorrectionReport)>
where
    T: IntoIterator<Item = [TexCoordId; 3]>,
{
    let faces = faces.into_iter();
    let mut rewired = Vec::with_capacity(faces.size_hint().0);
    let mut report = CorrectionReport::default();

    for (i, ids) in faces.enumerate() {
        let face = FaceId::new(i);
        let correction = correct_triangle(table, face, ids, options)?;
        if correction.kind != CorrectionKind::Untouched {
            debug!(
                "{:?}: {:?} correction, {} texcoords appended",
                face, correction.kind, correction.appended
            );
        }
        report.record(&correction);
        rewired.push(correction.tex_coords);
    }

    Ok((rewired, report))
}

/// Correct the texture coordinates already present in a mesh.
///
/// Every face must reference texture coordinates. Faces are processed in
/// order; the mesh is only modified if every face succeeds.
pub fn correct_seams(mesh: &mut ObjMesh, options: &SphericalOptions) -> Result<CorrectionReport> {
    let current = mesh
        .face_ids()
        .map(|f| {
            mesh.face(f)
                .tex_coords()
                .ok_or(MeshError::MissingTexCoord { face: f.index() })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut table = mesh.tex_coords().clone();
    let (rewired, report) = correct_faces(&mut table, current, options)?;

    mesh.tex_coords = table;
    for (face, ids) in mesh.faces.iter_mut().zip(rewired) {
        face.set_tex_coords(ids);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(coords: &[TexCoord]) -> (TexCoordTable, [TexCoordId; 3]) {
        let table: TexCoordTable = coords.iter().copied().collect();
        (table, [0, 1, 2].map(TexCoordId::new))
    }

    fn correct(table: &mut TexCoordTable, ids: [TexCoordId; 3]) -> Result<Correction> {
        correct_triangle(table, FaceId::new(0), ids, &SphericalOptions::default())
    }

    #[test]
    fn test_consistent_triangle_untouched() {
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.1, 0.5),
            TexCoord::new(0.2, 0.5),
            TexCoord::new(0.15, 0.6),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Untouched);
        assert_eq!(c.tex_coords, ids);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_seam_duplicates_zero_corners() {
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.0, 0.4),
            TexCoord::new(0.9375, 0.4),
            TexCoord::new(0.0, 0.5),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Seam);
        assert_eq!(c.appended, 2);
        assert_eq!(table.len(), 5);
        assert_eq!(c.tex_coords[1], ids[1]);
        assert_eq!(table.get(c.tex_coords[0]), TexCoord::new(1.0, 0.4));
        assert_eq!(table.get(c.tex_coords[2]), TexCoord::new(1.0, 0.5));
        // Appended in corner order
        assert_eq!(c.tex_coords[0], TexCoordId::new(3));
        assert_eq!(c.tex_coords[2], TexCoordId::new(4));
    }

    #[test]
    fn test_seam_with_wider_epsilon() {
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.98, 0.5),
            TexCoord::new(0.02, 0.5),
            TexCoord::new(0.5, 0.55),
        ]);
        let options = SphericalOptions::default().with_seam_epsilon(0.05);
        let c = correct_triangle(&mut table, FaceId::new(0), ids, &options).unwrap();

        assert_eq!(c.kind, CorrectionKind::Seam);
        assert_eq!(c.appended, 1);
        assert_eq!(c.tex_coords[0], ids[0]);
        assert_eq!(c.tex_coords[2], ids[2]);
        assert_eq!(table.get(c.tex_coords[1]), TexCoord::new(1.0, 0.5));
    }

    #[test]
    fn test_seam_span_without_zero_corner() {
        // Wide span but nothing within epsilon of 0: detected, nothing to duplicate
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.98, 0.5),
            TexCoord::new(0.02, 0.5),
            TexCoord::new(0.5, 0.55),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Seam);
        assert_eq!(c.appended, 0);
        assert_eq!(c.tex_coords, ids);
    }

    #[test]
    fn test_half_turn_is_not_a_wrap() {
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.0, 0.5),
            TexCoord::new(0.5, 0.5),
            TexCoord::new(0.25, 0.6),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Untouched);
    }

    #[test]
    fn test_pole_takes_mean_longitude() {
        let (mut table, ids) = table_of(&[
            TexCoord::pole(1.0),
            TexCoord::new(0.25, 0.875),
            TexCoord::new(0.3125, 0.875),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Pole);
        assert_eq!(c.appended, 1);
        assert_eq!(&c.tex_coords[1..], &ids[1..]);
        assert_eq!(table.get(c.tex_coords[0]), TexCoord::new(0.28125, 1.0));
    }

    #[test]
    fn test_pole_without_seam_corner() {
        let (mut table, ids) = table_of(&[
            TexCoord::pole(1.0),
            TexCoord::new(0.1, 0.5),
            TexCoord::new(0.9, 0.5),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.appended, 1);
        assert_eq!(table.len(), 4);
        let pole = table.get(c.tex_coords[0]);
        assert!((pole.u.unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(pole.v, 1.0);
    }

    #[test]
    fn test_pole_on_seam() {
        let (mut table, ids) = table_of(&[
            TexCoord::new(0.875, 0.125),
            TexCoord::pole(0.0),
            TexCoord::new(0.0, 0.125),
        ]);
        let c = correct(&mut table, ids).unwrap();
        assert_eq!(c.kind, CorrectionKind::Pole);
        assert_eq!(c.appended, 2);
        assert_eq!(c.tex_coords[0], ids[0]);
        // Seam duplicate first, then the pole
        assert_eq!(c.tex_coords[2], TexCoordId::new(3));
        assert_eq!(c.tex_coords[1], TexCoordId::new(4));
        assert_eq!(table.get(c.tex_coords[2]), TexCoord::new(1.0, 0.125));
        assert_eq!(table.get(c.tex_coords[1]), TexCoord::new(0.9375, 0.0));
    }

    #[test]
    fn test_two_poles_rejected() {
        let (mut table, ids) = table_of(&[
            TexCoord::pole(1.0),
            TexCoord::pole(0.0),
            TexCoord::new(0.5, 0.5),
        ]);
        let err = correct(&mut table, ids).unwrap_err();
        assert!(matches!(err, MeshError::PoleCount { face: 0, count: 2 }));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_latitude_mismatch_rejected() {
        let (mut table, ids) = table_of(&[
            TexCoord::pole(1.0),
            TexCoord::new(0.1, 0.9),
            TexCoord::new(0.2, 0.8),
        ]);
        let err = correct(&mut table, ids).unwrap_err();
        assert!(matches!(err, MeshError::LatitudeMismatch { face: 0, .. }));
    }

    #[test]
    fn test_unknown_index_rejected() {
        let (mut table, _) = table_of(&[TexCoord::new(0.1, 0.5)]);
        let ids = [0, 1, 2].map(TexCoordId::new);
        let err = correct(&mut table, ids).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidTexCoordIndex { face: 0, index: 2 }
        ));
    }

    #[test]
    fn test_later_faces_see_earlier_appends() {
        let mut table: TexCoordTable = vec![
            TexCoord::new(0.0, 0.5),
            TexCoord::new(0.9, 0.5),
            TexCoord::new(0.95, 0.6),
            TexCoord::new(0.9, 0.4),
        ]
        .into_iter()
        .collect();
        let faces = vec![
            [0, 1, 2].map(TexCoordId::new),
            [0, 3, 1].map(TexCoordId::new),
        ];

        let (rewired, report) =
            correct_faces(&mut table, faces, &SphericalOptions::default()).unwrap();
        assert_eq!(report.seam_faces, 2);
        assert_eq!(report.appended, 2);
        assert_eq!(rewired[0][0], TexCoordId::new(4));
        assert_eq!(rewired[1][0], TexCoordId::new(5));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_correct_seams_requires_texcoords() {
        use crate::mesh::{Corner, Face, VertexId};
        use nalgebra::Point3;

        let mut mesh = ObjMesh::new();
        for p in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]] {
            mesh.add_vertex(Point3::from(p));
        }
        mesh.add_face(Face::new([0, 1, 2].map(|i| Corner::new(VertexId::new(i)))));

        let err = correct_seams(&mut mesh, &SphericalOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::MissingTexCoord { face: 0 }));
    }
}
