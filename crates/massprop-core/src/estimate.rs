//! Per-link inertial estimation under a shared average density.
//!
//! Individual link masses are rarely published, but the total mass of an
//! arm or gripper is. The estimator spreads that total uniformly over the
//! combined mesh volume: `density = total_mass / total_volume`, and every
//! link gets `density * volume` as its mass along with the inertia tensor
//! of its mesh at that density.

use std::collections::{BTreeMap, BTreeSet};

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assembly::SubAssembly;
use crate::error::{Error, Result};
use crate::inertia::MassProperties;
use crate::mesh::{TriMesh, load_mesh_dir};

/// Volumes at or below this are treated as degenerate. Real robot links
/// are in the 1e-5 m^3 range; anything near zero means an open or
/// inside-out mesh.
const VOLUME_EPS: f64 = 1e-12;

/// The estimated inertial record of one link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkInertial {
    /// Mass in kg.
    pub mass: f64,
    /// Center of mass in the link's mesh frame, in meters.
    pub center_of_mass: DVec3,
    /// Inertia tensor in kg m^2 about the center of mass.
    pub inertia: DMat3,
}

/// Estimate an inertial record for every named mesh.
///
/// Links listed in `doubled_links` are mounted more than once on the real
/// robot while their mesh appears only once; their volume counts twice
/// toward the average density, but the returned record still describes a
/// single instance.
pub fn estimate_link_inertials(
    meshes: &BTreeMap<String, TriMesh>,
    total_mass: f64,
    doubled_links: &BTreeSet<String>,
) -> Result<BTreeMap<String, LinkInertial>> {
    if meshes.is_empty() {
        return Err(Error::NoMeshes);
    }
    if !total_mass.is_finite() || total_mass <= 0.0 {
        return Err(Error::InvalidTotalMass { value: total_mass });
    }

    let mut total_volume = 0.0;
    for (name, mesh) in meshes {
        let mut volume = mesh.signed_volume();
        if !volume.is_finite() || volume <= VOLUME_EPS {
            return Err(Error::DegenerateVolume {
                link: name.clone(),
                volume,
            });
        }
        info!("Volume estimate of {name}: {volume:.6} m^3");
        if doubled_links.contains(name) {
            volume *= 2.0;
            info!("Counting the volume of {name} twice, the robot mounts two of them");
        }
        total_volume += volume;
    }

    let density = total_mass / total_volume;
    info!("Average density estimate: {density:.6} kg/m^3");

    let mut records = BTreeMap::new();
    for (name, mesh) in meshes {
        let props = MassProperties::from_mesh(mesh, density);
        debug!("Mass estimate of {name}: {:.6} kg", props.mass);
        records.insert(
            name.clone(),
            LinkInertial {
                mass: props.mass,
                center_of_mass: props.center_of_mass,
                inertia: props.inertia,
            },
        );
    }
    Ok(records)
}

/// Load a sub-assembly's mesh directory and estimate all of its links.
pub fn estimate_sub_assembly(sub: &SubAssembly) -> Result<BTreeMap<String, LinkInertial>> {
    info!("Estimating inertial properties of {}", sub.name);
    let meshes = load_mesh_dir(&sub.mesh_dir)?;
    estimate_link_inertials(&meshes, sub.total_mass, &sub.doubled_links)
}
