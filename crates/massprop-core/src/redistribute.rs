//! Mass redistribution between two mechanically coupled links.
//!
//! Some visual meshes pool material that physically belongs to a
//! neighbouring link; a gripper body modeled with its drivetrain inside
//! while the fingers are hollow shells is the motivating case. The
//! redistributor moves a configured fraction of the source link's
//! estimated mass into the sink link, splitting it evenly over however
//! many sink instances the robot mounts.
//!
//! The inertia update is a uniform scalar rescale by the mass ratio. That
//! keeps principal-axis ratios and is only approximate under mass
//! transfer; it assumes the moved mass ends up distributed like the sink's
//! existing material. Exact recomputation would need to know where inside
//! the source the moved material sat, which the meshes cannot tell us.

use std::collections::BTreeMap;

use tracing::info;

use crate::assembly::MassCoupling;
use crate::error::{Error, Result};
use crate::estimate::LinkInertial;

/// Apply `coupling` to the link records, mutating source and sink in place.
///
/// Per sink instance, `fraction / sink_instances` of the source mass is
/// moved. The sink's center of mass is recombined as a mass-weighted
/// centroid, with the source's center re-expressed in the sink frame via
/// the coupling offset. The source keeps its center of mass and scales
/// mass and inertia by `1 - fraction`.
///
/// All reads of the old records happen before either record is touched,
/// and validation happens before that, so a failed call leaves `records`
/// unchanged.
pub fn redistribute_mass(
    records: &mut BTreeMap<String, LinkInertial>,
    coupling: &MassCoupling,
) -> Result<()> {
    if !coupling.fraction.is_finite() || !(0.0..=1.0).contains(&coupling.fraction) {
        return Err(Error::InvalidFraction {
            value: coupling.fraction,
        });
    }
    if coupling.sink_instances == 0 {
        return Err(Error::InvalidSinkInstances {
            value: coupling.sink_instances,
        });
    }
    if coupling.source == coupling.sink {
        return Err(Error::SelfCoupling {
            link: coupling.source.clone(),
        });
    }

    let source = *records.get(&coupling.source).ok_or_else(|| Error::LinkNotFound {
        link: coupling.source.clone(),
    })?;
    let sink = *records.get(&coupling.sink).ok_or_else(|| Error::LinkNotFound {
        link: coupling.sink.clone(),
    })?;

    let moved_mass = coupling.fraction / f64::from(coupling.sink_instances) * source.mass;
    let new_sink_mass = sink.mass + moved_mass;
    let new_sink_inertia = sink.inertia * (new_sink_mass / sink.mass);
    let new_sink_com = (sink.mass * sink.center_of_mass
        + moved_mass * (source.center_of_mass - coupling.offset))
        / new_sink_mass;

    info!(
        "Moving {moved_mass:.6} kg from {} into each of {} {} instance(s)",
        coupling.source, coupling.sink_instances, coupling.sink
    );

    if let Some(record) = records.get_mut(&coupling.sink) {
        record.mass = new_sink_mass;
        record.inertia = new_sink_inertia;
        record.center_of_mass = new_sink_com;
    }
    if let Some(record) = records.get_mut(&coupling.source) {
        record.mass *= 1.0 - coupling.fraction;
        record.inertia *= 1.0 - coupling.fraction;
        // Removing a uniform share of the material leaves its centroid
        // where it was, so the source center of mass stays put.
    }
    Ok(())
}
