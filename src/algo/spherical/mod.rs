//! Equirectangular texture coordinates for unit-sphere meshes.
//!
//! The pipeline has two stages:
//!
//! 1. [`project_vertices`] maps every vertex to a longitude/latitude pair,
//!    one texture coordinate per vertex. Vertices on the rotation axis get an
//!    undefined longitude.
//! 2. [`correct_triangle`] repairs the triangles that straddle the longitude
//!    seam or touch a pole, by appending duplicate texture coordinates and
//!    repointing only that triangle's corners at them.
//!
//! [`spherical_uv`] runs both stages on an [`ObjMesh`]; [`correct_seams`]
//! runs only the second one on texture coordinates already present.
//!
//! # Example
//!
//! ```
//! use spheremap::algo::spherical::{spherical_uv, SphericalOptions};
//! use spheremap::mesh::{uv_sphere, UvSphereOptions};
//!
//! let mut mesh = uv_sphere(&UvSphereOptions::default()).unwrap();
//! let report = spherical_uv(&mut mesh, &SphericalOptions::default()).unwrap();
//!
//! assert_eq!(report.pole_vertices, 2);
//! assert!(mesh.tex_coords().len() > mesh.num_vertices());
//! ```

mod check;
mod project;
mod seam;

pub use check::{face_span, inconsistent_faces, Inconsistency};
pub use project::{project_position, project_vertices};
pub use seam::{correct_seams, correct_triangle, Correction, CorrectionKind, CorrectionReport};

use nalgebra::{Unit, Vector3};
use tracing::info;

use crate::error::{MeshError, Result};
use crate::mesh::{ObjMesh, TexCoordId};

/// Distance from `v = 0` or `v = 1` below which a vertex counts as a pole.
pub const DEFAULT_POLE_EPSILON: f64 = 1e-6;

/// Distance from `u = 0` below which a vertex counts as lying on the seam.
pub const DEFAULT_SEAM_EPSILON: f64 = 1e-6;

/// Largest latitude difference allowed between the two base vertices of a
/// pole triangle.
pub const DEFAULT_LATITUDE_EPSILON: f64 = 1e-6;

/// Longitude difference between the base vertices of a pole triangle above
/// which one of them is taken to sit on the seam.
pub const DEFAULT_POLE_SPAN: f64 = 0.25;

/// Longitude span above which a triangle is taken to straddle the seam.
pub const DEFAULT_WRAP_SPAN: f64 = 0.5;

/// Orthonormal frame the projection is measured in.
///
/// Latitude is measured from the `polar` axis. Longitude is the angle of the
/// vertex around the polar axis, starting at the `cross` axis (`u = 0`) and
/// turning towards the `azimuth` axis (`u = 0.25`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBasis {
    polar: Unit<Vector3<f64>>,
    azimuth: Unit<Vector3<f64>>,
    cross: Unit<Vector3<f64>>,
}

impl Default for ProjectionBasis {
    /// `+y` polar axis, `-z` azimuth axis, `+x` cross axis.
    fn default() -> Self {
        Self {
            polar: Vector3::y_axis(),
            azimuth: Unit::new_unchecked(Vector3::new(0.0, 0.0, -1.0)),
            cross: Vector3::x_axis(),
        }
    }
}

impl ProjectionBasis {
    /// Build a basis from a polar and an azimuth axis.
    ///
    /// Both axes are normalized; they must be perpendicular. The cross axis is
    /// `azimuth × polar`.
    pub fn new(polar: Vector3<f64>, azimuth: Vector3<f64>) -> Result<Self> {
        let polar = Unit::try_new(polar, 1e-12)
            .ok_or_else(|| MeshError::invalid_param("polar", fmt_axis(&polar), "must be non-zero"))?;
        let azimuth = Unit::try_new(azimuth, 1e-12).ok_or_else(|| {
            MeshError::invalid_param("azimuth", fmt_axis(&azimuth), "must be non-zero")
        })?;

        if polar.dot(azimuth.as_ref()).abs() > 1e-9 {
            return Err(MeshError::invalid_param(
                "azimuth",
                fmt_axis(azimuth.as_ref()),
                "must be perpendicular to the polar axis",
            ));
        }

        let cross = Unit::new_normalize(azimuth.cross(polar.as_ref()));
        Ok(Self {
            polar,
            azimuth,
            cross,
        })
    }

    /// The polar (rotation) axis.
    #[inline]
    pub fn polar(&self) -> &Vector3<f64> {
        &self.polar
    }

    /// The axis at a quarter turn of longitude.
    #[inline]
    pub fn azimuth(&self) -> &Vector3<f64> {
        &self.azimuth
    }

    /// The axis at zero longitude.
    #[inline]
    pub fn cross(&self) -> &Vector3<f64> {
        &self.cross
    }
}

fn fmt_axis(v: &Vector3<f64>) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

/// Where the corrector gets its starting texture coordinates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexCoordSource {
    /// Project every vertex and alias each corner's texcoord index to its
    /// position index. Texture coordinates already in the mesh are discarded.
    #[default]
    Project,
    /// Use the texture coordinates and corner indices already in the mesh.
    Existing,
}

/// Options for spherical texture coordinate generation.
#[derive(Debug, Clone)]
pub struct SphericalOptions {
    /// Projection frame.
    pub basis: ProjectionBasis,

    /// Source of the texture coordinates to correct.
    pub source: TexCoordSource,

    /// See [`DEFAULT_POLE_EPSILON`].
    pub pole_epsilon: f64,

    /// See [`DEFAULT_SEAM_EPSILON`].
    pub seam_epsilon: f64,

    /// See [`DEFAULT_LATITUDE_EPSILON`].
    pub latitude_epsilon: f64,

    /// See [`DEFAULT_POLE_SPAN`].
    pub pole_span: f64,

    /// See [`DEFAULT_WRAP_SPAN`].
    pub wrap_span: f64,
}

impl Default for SphericalOptions {
    fn default() -> Self {
        Self {
            basis: ProjectionBasis::default(),
            source: TexCoordSource::Project,
            pole_epsilon: DEFAULT_POLE_EPSILON,
            seam_epsilon: DEFAULT_SEAM_EPSILON,
            latitude_epsilon: DEFAULT_LATITUDE_EPSILON,
            pole_span: DEFAULT_POLE_SPAN,
            wrap_span: DEFAULT_WRAP_SPAN,
        }
    }
}

impl SphericalOptions {
    /// Set the projection frame.
    pub fn with_basis(mut self, basis: ProjectionBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Set the texture coordinate source.
    pub fn with_source(mut self, source: TexCoordSource) -> Self {
        self.source = source;
        self
    }

    /// Set the pole detection threshold.
    pub fn with_pole_epsilon(mut self, eps: f64) -> Self {
        self.pole_epsilon = eps;
        self
    }

    /// Set the seam detection threshold.
    pub fn with_seam_epsilon(mut self, eps: f64) -> Self {
        self.seam_epsilon = eps;
        self
    }

    /// Set the latitude tolerance for pole triangles.
    pub fn with_latitude_epsilon(mut self, eps: f64) -> Self {
        self.latitude_epsilon = eps;
        self
    }

    /// Set the base-vertex span that triggers seam handling in pole triangles.
    pub fn with_pole_span(mut self, span: f64) -> Self {
        self.pole_span = span;
        self
    }

    /// Set the span that marks a triangle as straddling the seam.
    pub fn with_wrap_span(mut self, span: f64) -> Self {
        self.wrap_span = span;
        self
    }

    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let epsilons = [
            ("pole_epsilon", self.pole_epsilon),
            ("seam_epsilon", self.seam_epsilon),
            ("latitude_epsilon", self.latitude_epsilon),
        ];
        for (name, value) in epsilons {
            if !(value.is_finite() && value > 0.0 && value < 0.5) {
                return Err(MeshError::invalid_param(name, value, "must be in (0, 0.5)"));
            }
        }

        let spans = [("pole_span", self.pole_span), ("wrap_span", self.wrap_span)];
        for (name, value) in spans {
            if !(value > 0.0 && value <= 1.0) {
                return Err(MeshError::invalid_param(name, value, "must be in (0, 1]"));
            }
        }
        Ok(())
    }
}

/// Summary of a [`spherical_uv`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SphericalReport {
    /// Number of vertices projected (0 when existing texcoords were reused).
    pub projected_vertices: usize,
    /// Number of texcoords with undefined longitude before correction.
    pub pole_vertices: usize,
    /// What the corrector did.
    pub corrections: CorrectionReport,
}

/// Generate and correct spherical texture coordinates for a mesh.
///
/// With [`TexCoordSource::Project`] every vertex is projected and each face
/// corner's texcoord index starts out equal to its position index; with
/// [`TexCoordSource::Existing`] the mesh's own texture coordinates are used.
/// The corrector then runs over every face in order.
///
/// The mesh is only modified if the whole run succeeds.
pub fn spherical_uv(mesh: &mut ObjMesh, options: &SphericalOptions) -> Result<SphericalReport> {
    options.validate()?;

    let report = match options.source {
        TexCoordSource::Project => {
            let mut table = project_vertices(mesh.positions(), &options.basis, options.pole_epsilon);
            let pole_vertices = table.undefined_count();

            let aliased = mesh
                .faces()
                .iter()
                .map(|face| face.vertices().map(|v| TexCoordId::new(v.index())));
            let (rewired, corrections) = seam::correct_faces(&mut table, aliased, options)?;

            mesh.tex_coords = table;
            for (face, ids) in mesh.faces.iter_mut().zip(rewired) {
                face.set_tex_coords(ids);
            }

            SphericalReport {
                projected_vertices: mesh.num_vertices(),
                pole_vertices,
                corrections,
            }
        }
        TexCoordSource::Existing => {
            let pole_vertices = mesh.tex_coords().undefined_count();
            let corrections = correct_seams(mesh, options)?;
            SphericalReport {
                projected_vertices: 0,
                pole_vertices,
                corrections,
            }
        }
    };

    info!(
        "Spherical UVs: {} vertices projected, {} pole vertices, {} seam faces, {} pole faces, {} texcoords appended",
        report.projected_vertices,
        report.pole_vertices,
        report.corrections.seam_faces,
        report.corrections.pole_faces,
        report.corrections.appended
    );

    Ok(report)
}
