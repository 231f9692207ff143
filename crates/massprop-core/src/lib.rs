//! Mesh-Based Inertial Property Estimation
//!
//! This crate estimates per-link mass, inertia and center of mass for
//! robot sub-assemblies whose only published mass figure is the total:
//! - Mesh: STL/OBJ loading and solid-volume geometry
//! - Inertia: exact mass properties of a homogeneous solid
//! - Estimate: spreading a known total mass at uniform average density
//! - Redistribute: moving mass between two mechanically coupled links
//! - Sdf: the output document carrying the estimated inertials

pub mod error;
pub mod mesh;
pub mod inertia;
pub mod assembly;
pub mod estimate;
pub mod redistribute;
pub mod sdf;

pub use error::*;
pub use mesh::*;
pub use inertia::*;
pub use assembly::*;
pub use estimate::*;
pub use redistribute::*;
pub use sdf::*;
