//! Error types for spheremap.
//!
//! Every failure is fatal for the run that produced it: the pipelines never
//! emit partial output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while loading, correcting or saving a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face line does not have exactly three index groups.
    #[error("line {line}: face has {count} vertices, only triangles are supported")]
    NonTriangularFace {
        /// 1-based line number in the source text.
        line: usize,
        /// Number of index groups found.
        count: usize,
    },

    /// A face index group could not be parsed.
    #[error("line {line}: malformed face index group '{group}'")]
    MalformedIndex {
        /// 1-based line number in the source text.
        line: usize,
        /// The offending group text.
        group: String,
    },

    /// A numeric field could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A face references a position that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index (1-based, as written in the file).
        vertex: i64,
    },

    /// A face references a texture coordinate that does not exist.
    #[error("face {face} references invalid texture coordinate index {index}")]
    InvalidTexCoordIndex {
        /// The face index.
        face: usize,
        /// The invalid texcoord index (1-based, as written in the file).
        index: i64,
    },

    /// A face references a normal that does not exist.
    #[error("face {face} references invalid normal index {index}")]
    InvalidNormalIndex {
        /// The face index.
        face: usize,
        /// The invalid normal index (1-based, as written in the file).
        index: i64,
    },

    /// A face has no texture coordinate although existing ones are reused.
    #[error("face {face} has no texture coordinate indices")]
    MissingTexCoord {
        /// The face index.
        face: usize,
    },

    /// A triangle touches the pole with more than one vertex.
    #[error("face {face} has {count} pole vertices, expected exactly one")]
    PoleCount {
        /// The face index.
        face: usize,
        /// Number of vertices with undefined longitude.
        count: usize,
    },

    /// The two base vertices of a pole triangle are not on the same latitude ring.
    #[error("face {face}: pole base vertices lie on different latitudes (v = {v0}, v = {v1})")]
    LatitudeMismatch {
        /// The face index.
        face: usize,
        /// Latitude of the first base vertex.
        v0: f64,
        /// Latitude of the second base vertex.
        v1: f64,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Attach a file path to errors that were raised without one.
    pub(crate) fn with_load_path(self, path: &std::path::Path) -> Self {
        match self {
            MeshError::Io(e) => MeshError::LoadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other => other,
        }
    }
}
