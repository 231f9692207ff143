//! Descriptors for the sub-assemblies whose inertials are estimated.
//!
//! A sub-assembly groups the links of one physical unit (an arm, a
//! gripper) that share a mesh directory and a single published total mass.
//! A coupling describes a mass transfer between two links of one
//! sub-assembly, for parts whose visual mesh pools material that really
//! belongs to a neighbour.

use std::collections::BTreeSet;
use std::path::PathBuf;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One sub-assembly: a directory of link meshes plus its known total mass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAssembly {
    /// Model name used in the output document.
    pub name: String,
    /// Directory holding one mesh file per link.
    pub mesh_dir: PathBuf,
    /// Total mass of the physical unit in kg, from its datasheet.
    pub total_mass: f64,
    /// Links whose mesh appears once but is mounted twice on the robot.
    /// Their volume counts double toward the assembly's average density.
    pub doubled_links: BTreeSet<String>,
}

/// A mass transfer from one link's estimate into another's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassCoupling {
    /// Link that gives mass away.
    pub source: String,
    /// Link that receives it.
    pub sink: String,
    /// Fraction of the source mass to move, in `[0, 1]`.
    pub fraction: f64,
    /// Translation from the source frame to the sink frame, applied when
    /// recombining centers of mass.
    pub offset: DVec3,
    /// How many copies of the sink link the robot mounts. The moved mass
    /// is split evenly between them.
    pub sink_instances: u32,
}
