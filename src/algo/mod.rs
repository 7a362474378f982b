//! Mesh processing algorithms.
//!
//! - **Spherical UV**: equirectangular projection with seam and pole correction
//! - **Winding**: triangle winding reversal on raw OBJ lines

pub mod spherical;
pub mod winding;
