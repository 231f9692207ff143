//! Estimates per-link inertial properties of the UR5 arm and RG2 gripper.

mod ur5_rg2;

use massprop_core::error::Result;
use massprop_core::estimate::estimate_sub_assembly;
use massprop_core::redistribute::redistribute_mass;
use massprop_core::sdf::{Model, SdfDocument};

use crate::ur5_rg2::Rig;

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Estimating inertial properties for each link to add up to {} kg for UR5 and {} kg for RG2",
        ur5_rg2::UR5_TOTAL_MASS,
        ur5_rg2::RG2_TOTAL_MASS
    );

    if let Err(err) = run(&ur5_rg2::rig()) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

/// Estimate both sub-assemblies, redistribute the coupled mass inside the
/// gripper, then write the combined document.
fn run(rig: &Rig) -> Result<()> {
    let arm = estimate_sub_assembly(&rig.arm)?;
    let mut gripper = estimate_sub_assembly(&rig.gripper)?;
    redistribute_mass(&mut gripper, &rig.coupling)?;

    let mut document = SdfDocument::new();
    document.add_model(Model::from_link_inertials(rig.arm.name.as_str(), &arm));
    document.add_model(Model::from_link_inertials(
        rig.gripper.name.as_str(),
        &gripper,
    ));
    document.write_file(&rig.output)?;

    tracing::info!("Results written into {:?}", rig.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};

    use glam::DVec3;
    use massprop_core::assembly::{MassCoupling, SubAssembly};

    fn write_cube_stl(path: &Path, size: DVec3, center: DVec3) {
        let h = size / 2.0;
        let corners = [
            center + DVec3::new(-h.x, -h.y, -h.z),
            center + DVec3::new(h.x, -h.y, -h.z),
            center + DVec3::new(h.x, h.y, -h.z),
            center + DVec3::new(-h.x, h.y, -h.z),
            center + DVec3::new(-h.x, -h.y, h.z),
            center + DVec3::new(h.x, -h.y, h.z),
            center + DVec3::new(h.x, h.y, h.z),
            center + DVec3::new(-h.x, h.y, h.z),
        ];
        let faces = [
            [0, 3, 2],
            [0, 2, 1],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        let triangles: Vec<stl_io::Triangle> = faces
            .iter()
            .map(|&[a, b, c]| {
                let (v0, v1, v2) = (corners[a], corners[b], corners[c]);
                let n = (v1 - v0).cross(v2 - v0).normalize();
                stl_io::Triangle {
                    normal: stl_io::Normal::new(n.as_vec3().to_array()),
                    vertices: [
                        stl_io::Vertex::new(v0.as_vec3().to_array()),
                        stl_io::Vertex::new(v1.as_vec3().to_array()),
                        stl_io::Vertex::new(v2.as_vec3().to_array()),
                    ],
                }
            })
            .collect();
        let mut file = std::fs::File::create(path).unwrap();
        stl_io::write_stl(&mut file, triangles.iter()).unwrap();
    }

    #[test]
    fn test_default_rig_wiring() {
        let rig = ur5_rg2::rig();
        assert_eq!(rig.arm.name, "UR5");
        assert_eq!(rig.gripper.name, "RG2");
        assert!(rig.gripper.doubled_links.contains("finger"));
        assert_eq!(rig.coupling.source, "hand");
        assert_eq!(rig.coupling.sink, "finger");
        assert_eq!(rig.coupling.sink_instances, 2);
        assert_eq!(rig.coupling.fraction, ur5_rg2::HAND_MASS_FRACTION_TO_FINGERS);
        assert_eq!(rig.output, PathBuf::from(ur5_rg2::OUTPUT_FILE));
    }

    #[test]
    fn test_full_pipeline_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let arm_dir = dir.path().join("arm");
        let gripper_dir = dir.path().join("gripper");
        std::fs::create_dir(&arm_dir).unwrap();
        std::fs::create_dir(&gripper_dir).unwrap();

        write_cube_stl(&arm_dir.join("base.stl"), DVec3::ONE, DVec3::ZERO);
        write_cube_stl(&gripper_dir.join("hand.stl"), DVec3::ONE, DVec3::ZERO);
        write_cube_stl(
            &gripper_dir.join("finger.stl"),
            DVec3::new(1.0, 1.0, 0.5),
            DVec3::new(0.0, 0.0, 2.0),
        );

        let output = dir.path().join("out.sdf");
        let rig = Rig {
            arm: SubAssembly {
                name: "UR5".to_string(),
                mesh_dir: arm_dir,
                total_mass: 2.0,
                doubled_links: BTreeSet::new(),
            },
            gripper: SubAssembly {
                name: "RG2".to_string(),
                mesh_dir: gripper_dir,
                total_mass: 4.0,
                doubled_links: BTreeSet::from(["finger".to_string()]),
            },
            coupling: MassCoupling {
                source: "hand".to_string(),
                sink: "finger".to_string(),
                fraction: 0.5,
                offset: DVec3::ZERO,
                sink_instances: 2,
            },
            output: output.clone(),
        };

        run(&rig).unwrap();

        let xml = std::fs::read_to_string(&output).unwrap();
        assert!(xml.contains("<model name=\"UR5\">"));
        assert!(xml.contains("<model name=\"RG2\">"));
        assert!(xml.contains("<link name=\"base\">"));
        assert!(xml.contains("<link name=\"hand\">"));
        assert!(xml.contains("<link name=\"finger\">"));
        // Both sub-assemblies come out at density 2 kg/m^3: the base keeps
        // its 2 kg, the hand drops from 2 kg to 1 kg, each finger instance
        // picks up 0.5 kg on top of its 1 kg.
        assert!(xml.contains("<mass>2</mass>"));
        assert!(xml.contains("<mass>1</mass>"));
        assert!(xml.contains("<mass>1.5</mass>"));
        assert!(xml.contains("<pose>0 0 0 0 0 0</pose>"));
    }

    #[test]
    fn test_pipeline_fails_on_missing_mesh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut rig = ur5_rg2::rig();
        rig.arm.mesh_dir = dir.path().join("missing");
        rig.output = dir.path().join("out.sdf");

        let result = run(&rig);
        assert!(result.is_err());
        assert!(!rig.output.exists());
    }
}
