//! Fixed parameters of the UR5 arm with RG2 gripper.
//!
//! Everything here is external domain knowledge about this specific robot;
//! none of it is derived from the meshes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use glam::DVec3;
use massprop_core::assembly::{MassCoupling, SubAssembly};

/// Total mass of the UR5 arm in kg, from the Universal Robots datasheet.
pub const UR5_TOTAL_MASS: f64 = 18.4;

/// Total mass of the RG2 gripper in kg, from the OnRobot datasheet.
pub const RG2_TOTAL_MASS: f64 = 0.78;

/// Share of the hand's estimated mass redistributed into the fingers. The
/// fingers house part of the drive mechanism that the visual meshes lump
/// into the hand body; the value is guesstimated.
pub const HAND_MASS_FRACTION_TO_FINGERS: f64 = 0.5;

/// Translation from the hand frame origin to the finger frame origin.
// TODO: read this translation from the robot's SDF model instead of
// keeping a hard-coded copy here.
pub const HAND_TO_FINGER_OFFSET: DVec3 = DVec3::new(0.105, 0.017, 0.0);

/// Where the estimated inertials are written, relative to the working
/// directory.
pub const OUTPUT_FILE: &str = "ur5_rg2_inertial_out.sdf";

/// The full parameter set for one estimation run.
pub struct Rig {
    pub arm: SubAssembly,
    pub gripper: SubAssembly,
    pub coupling: MassCoupling,
    pub output: PathBuf,
}

/// The UR5 + RG2 rig with its visual mesh directories.
pub fn rig() -> Rig {
    Rig {
        arm: SubAssembly {
            name: "UR5".to_string(),
            mesh_dir: PathBuf::from("ur5_rg2/meshes/visual/ur5"),
            total_mass: UR5_TOTAL_MASS,
            doubled_links: BTreeSet::new(),
        },
        gripper: SubAssembly {
            name: "RG2".to_string(),
            mesh_dir: PathBuf::from("ur5_rg2/meshes/visual/rg2"),
            total_mass: RG2_TOTAL_MASS,
            // One finger mesh, two mounted fingers.
            doubled_links: BTreeSet::from(["finger".to_string()]),
        },
        coupling: MassCoupling {
            source: "hand".to_string(),
            sink: "finger".to_string(),
            fraction: HAND_MASS_FRACTION_TO_FINGERS,
            offset: HAND_TO_FINGER_OFFSET,
            sink_instances: 2,
        },
        output: PathBuf::from(OUTPUT_FILE),
    }
}
