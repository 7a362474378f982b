//! Longitude/latitude projection of sphere vertices.

use std::f64::consts::{PI, TAU};

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::mesh::{TexCoord, TexCoordTable};

use super::ProjectionBasis;

/// Positions further than this from the unit sphere are reported.
const UNIT_LENGTH_TOLERANCE: f64 = 1e-3;

/// Negative longitudes closer to zero than this are snapped to `u = 1`.
const NEGATIVE_U_TOLERANCE: f64 = 1e-6;

/// Project one position onto the unit sphere's longitude/latitude square.
///
/// `u` is the fraction of a turn around the polar axis, in `[0, 1)`; `v` is
/// `1` at the positive pole and `0` at the negative one. Positions within
/// `pole_epsilon` (in `v`) of either pole, or on the polar axis itself, get an
/// undefined `u`.
///
/// Positions that are not unit length are projected as if they were; the
/// result is distorted but well defined.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use spheremap::algo::spherical::{project_position, ProjectionBasis};
///
/// let basis = ProjectionBasis::default();
///
/// let tc = project_position(&Point3::new(1.0, 0.0, 0.0), &basis, 1e-6);
/// assert_eq!(tc.u, Some(0.0));
/// assert!((tc.v - 0.5).abs() < 1e-12);
///
/// let pole = project_position(&Point3::new(0.0, 1.0, 0.0), &basis, 1e-6);
/// assert!(pole.is_pole());
/// ```
pub fn project_position(position: &Point3<f64>, basis: &ProjectionBasis, pole_epsilon: f64) -> TexCoord {
    let p = position.coords;
    let along = basis.polar().dot(&p);

    // Component perpendicular to the polar axis; NaN on the axis itself.
    let ring = (p - basis.polar() * along).normalize();
    let angle = basis.azimuth().dot(&ring).atan2(basis.cross().dot(&ring));

    let mut u = (1.0 + angle / TAU) % 1.0;
    // Unreachable while `1 + angle / TAU` stays in [0.5, 1.5]; kept so a
    // rounding slip below zero lands on the seam's far side.
    if u < 0.0 && u > -NEGATIVE_U_TOLERANCE {
        u = 1.0;
    }

    let v = 1.0 - along.clamp(-1.0, 1.0).acos() / PI;

    if !u.is_finite() || v < pole_epsilon || (v - 1.0).abs() < pole_epsilon {
        TexCoord::pole(v)
    } else {
        TexCoord::new(u, v)
    }
}

/// Project every position, producing one texture coordinate per vertex in
/// vertex order.
pub fn project_vertices(
    positions: &[Point3<f64>],
    basis: &ProjectionBasis,
    pole_epsilon: f64,
) -> TexCoordTable {
    let off_sphere = positions
        .iter()
        .filter(|p| (p.coords.norm() - 1.0).abs() > UNIT_LENGTH_TOLERANCE)
        .count();
    if off_sphere > 0 {
        warn!(
            "{} of {} vertices are not on the unit sphere; texture coordinates will be distorted",
            off_sphere,
            positions.len()
        );
    }

    let table: TexCoordTable = positions
        .iter()
        .map(|p| project_position(p, basis, pole_epsilon))
        .collect();

    debug!(
        "Projected {} vertices ({} on a pole)",
        table.len(),
        table.undefined_count()
    );
    table
}
