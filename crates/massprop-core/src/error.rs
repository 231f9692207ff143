//! Error taxonomy for the estimation pipeline.
//!
//! Every failure is fatal: this is an offline, re-runnable batch job, and
//! the correct recovery is always to fix the input and rerun. Variants fall
//! into three classes a caller can match on: input errors (unreadable or
//! degenerate meshes, out-of-range parameters), lookup errors (a configured
//! link name missing from the loaded set), and output errors (the document
//! could not be serialized or written).

use thiserror::Error;

/// Result type alias for the estimation pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the estimation pipeline.
#[derive(Debug, Clone, Error)]
pub enum Error {
    // Input errors
    #[error("failed to read mesh directory '{path}': {reason}")]
    MeshDirectory { path: String, reason: String },

    #[error("mesh directory '{path}' contains no mesh files")]
    EmptyMeshDirectory { path: String },

    #[error("unsupported mesh format: {path} (STL and OBJ are supported)")]
    UnsupportedMeshFormat { path: String },

    #[error("failed to load mesh '{path}': {reason}")]
    MeshLoad { path: String, reason: String },

    #[error("mesh '{path}' is not a closed solid: {reason}")]
    NonManifoldMesh { path: String, reason: String },

    #[error("two mesh files resolve to the same link name '{link}'")]
    DuplicateLink { link: String },

    #[error("link '{link}' has a degenerate volume of {volume} m^3")]
    DegenerateVolume { link: String, volume: f64 },

    #[error("no meshes to estimate")]
    NoMeshes,

    #[error("total mass must be positive, got {value} kg")]
    InvalidTotalMass { value: f64 },

    #[error("redistribution fraction must be within [0, 1], got {value}")]
    InvalidFraction { value: f64 },

    #[error("sink instance count must be at least 1, got {value}")]
    InvalidSinkInstances { value: u32 },

    #[error("link '{link}' cannot be coupled to itself")]
    SelfCoupling { link: String },

    // Lookup errors
    #[error("link not found: {link}")]
    LinkNotFound { link: String },

    // Output errors
    #[error("failed to write document '{path}': {reason}")]
    DocumentWrite { path: String, reason: String },

    #[error("failed to serialize document: {reason}")]
    XmlWrite { reason: String },
}
