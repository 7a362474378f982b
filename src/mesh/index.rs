//! Index types for mesh elements.
//!
//! Positions, normals, texture coordinates and faces live in separate tables,
//! so each gets its own index type. They are 0-based internally; the OBJ
//! format counts from 1, see [`one_based`](VertexId::one_based).

use std::fmt::{self, Debug};

/// A type-safe position index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe texture coordinate index.
///
/// Texture coordinate handles are stable: the table they point into is
/// append-only.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TexCoordId(u32);

/// A type-safe normal index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NormalId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a 0-based value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Get the 0-based index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the 1-based value used by the OBJ format.
            #[inline]
            pub fn one_based(self) -> usize {
                self.0 as usize + 1
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.index())
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(TexCoordId, "VT");
impl_index_type!(NormalId, "VN");
impl_index_type!(FaceId, "F");
