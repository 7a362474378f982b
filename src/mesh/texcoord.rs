//! Texture coordinate storage.
//!
//! This module provides the [`TexCoordTable`] type, the append-only list of
//! `vt` entries a mesh carries. The projector fills it with one entry per
//! vertex; the seam corrector then appends duplicates and hands out the new
//! [`TexCoordId`]s to the faces that need them.

use nalgebra::Point2;

use super::index::TexCoordId;

/// Longitude written for an entry whose longitude is still undefined.
pub const UNDEFINED_U_FALLBACK: f64 = 0.5;

/// A single texture coordinate.
///
/// `u` is the longitude as a fraction of a turn and `v` the latitude, with
/// `v = 1` at the positive pole. `u` is `None` for vertices sitting on a pole,
/// where longitude has no meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoord {
    /// Longitude fraction, `None` when undefined.
    pub u: Option<f64>,
    /// Latitude fraction.
    pub v: f64,
}

impl TexCoord {
    /// A texture coordinate with a defined longitude.
    #[inline]
    pub fn new(u: f64, v: f64) -> Self {
        Self { u: Some(u), v }
    }

    /// A pole texture coordinate with undefined longitude.
    #[inline]
    pub fn pole(v: f64) -> Self {
        Self { u: None, v }
    }

    /// Whether the longitude is undefined.
    #[inline]
    pub fn is_pole(&self) -> bool {
        self.u.is_none()
    }

    /// The coordinate as written to a file, with the neutral fallback
    /// longitude substituted for an undefined one.
    #[inline]
    pub fn resolved(&self) -> Point2<f64> {
        Point2::new(self.u.unwrap_or(UNDEFINED_U_FALLBACK), self.v)
    }
}

/// Append-only table of texture coordinates.
///
/// # Example
///
/// ```
/// use spheremap::mesh::{TexCoord, TexCoordTable};
///
/// let mut table = TexCoordTable::new();
/// let a = table.push(TexCoord::new(0.25, 0.5));
/// let b = table.push(TexCoord::pole(1.0));
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get(a).u, Some(0.25));
/// assert!(table.get(b).is_pole());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TexCoordTable {
    coords: Vec<TexCoord>,
}

impl TexCoordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its handle.
    #[inline]
    pub fn push(&mut self, tc: TexCoord) -> TexCoordId {
        let id = TexCoordId::new(self.coords.len());
        self.coords.push(tc);
        id
    }

    /// Get an entry.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this table.
    #[inline]
    pub fn get(&self, id: TexCoordId) -> TexCoord {
        self.coords[id.index()]
    }

    /// Get an entry, or `None` if the handle is out of range.
    #[inline]
    pub fn try_get(&self, id: TexCoordId) -> Option<TexCoord> {
        self.coords.get(id.index()).copied()
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all entries with their handles, in append order.
    pub fn iter(&self) -> impl Iterator<Item = (TexCoordId, TexCoord)> + '_ {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &tc)| (TexCoordId::new(i), tc))
    }

    /// Get the raw entries slice.
    pub fn as_slice(&self) -> &[TexCoord] {
        &self.coords
    }

    /// Number of entries whose longitude is undefined.
    pub fn undefined_count(&self) -> usize {
        self.coords.iter().filter(|tc| tc.is_pole()).count()
    }

    /// Compute the bounding box of the defined entries.
    ///
    /// Returns `None` if no entry has a defined longitude.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let mut defined = self
            .coords
            .iter()
            .filter_map(|tc| tc.u.map(|u| Point2::new(u, tc.v)));

        let first = defined.next()?;
        let mut min = first;
        let mut max = first;

        for uv in defined {
            min.x = min.x.min(uv.x);
            min.y = min.y.min(uv.y);
            max.x = max.x.max(uv.x);
            max.y = max.y.max(uv.y);
        }

        Some((min, max))
    }
}

impl FromIterator<TexCoord> for TexCoordTable {
    fn from_iter<T: IntoIterator<Item = TexCoord>>(iter: T) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}
