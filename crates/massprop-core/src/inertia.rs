//! Exact mass properties of a solid bounded by a triangle mesh.
//!
//! Volume, center of mass and inertia are computed by decomposing the
//! surface into signed tetrahedra against the origin and accumulating the
//! closed-form polynomial integrals of each tetrahedron. For a watertight,
//! outward-wound mesh this is exact up to floating-point rounding; no
//! voxelization or sampling is involved.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::mesh::TriMesh;

/// Mass properties of a homogeneous solid, in the mesh's own frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    /// Signed volume in m^3.
    pub volume: f64,
    /// Mass in kg, `density * volume`.
    pub mass: f64,
    /// Center of mass in meters.
    pub center_of_mass: DVec3,
    /// Inertia tensor in kg m^2 about the center of mass.
    pub inertia: DMat3,
}

impl MassProperties {
    /// Integrate mass properties of `mesh` filled with a uniform `density`
    /// in kg/m^3.
    pub fn from_mesh(mesh: &TriMesh, density: f64) -> Self {
        let mut volume = 0.0;
        let mut com_acc = DVec3::ZERO;
        // Second moments of volume about the origin.
        let (mut xx, mut yy, mut zz) = (0.0, 0.0, 0.0);
        let (mut xy, mut xz, mut yz) = (0.0, 0.0, 0.0);

        for &[i0, i1, i2] in &mesh.faces {
            let a = mesh.vertices[i0 as usize];
            let b = mesh.vertices[i1 as usize];
            let c = mesh.vertices[i2 as usize];

            // Six times the signed volume of the tetrahedron (origin, a, b, c).
            let det = a.dot(b.cross(c));

            volume += det / 6.0;
            com_acc += det / 24.0 * (a + b + c);

            xx += det / 60.0 * (a.x * a.x + b.x * b.x + c.x * c.x + a.x * b.x + a.x * c.x + b.x * c.x);
            yy += det / 60.0 * (a.y * a.y + b.y * b.y + c.y * c.y + a.y * b.y + a.y * c.y + b.y * c.y);
            zz += det / 60.0 * (a.z * a.z + b.z * b.z + c.z * c.z + a.z * b.z + a.z * c.z + b.z * c.z);
            xy += det / 120.0
                * (2.0 * (a.x * a.y + b.x * b.y + c.x * c.y)
                    + a.x * b.y
                    + a.y * b.x
                    + a.x * c.y
                    + a.y * c.x
                    + b.x * c.y
                    + b.y * c.x);
            xz += det / 120.0
                * (2.0 * (a.x * a.z + b.x * b.z + c.x * c.z)
                    + a.x * b.z
                    + a.z * b.x
                    + a.x * c.z
                    + a.z * c.x
                    + b.x * c.z
                    + b.z * c.x);
            yz += det / 120.0
                * (2.0 * (a.y * a.z + b.y * b.z + c.y * c.z)
                    + a.y * b.z
                    + a.z * b.y
                    + a.y * c.z
                    + a.z * c.y
                    + b.y * c.z
                    + b.z * c.y);
        }

        let center_of_mass = if volume.abs() > f64::EPSILON {
            com_acc / volume
        } else {
            DVec3::ZERO
        };

        // Inertia of the volume about the origin, still per unit density.
        let i_origin = DMat3::from_cols(
            DVec3::new(yy + zz, -xy, -xz),
            DVec3::new(-xy, xx + zz, -yz),
            DVec3::new(-xz, -yz, xx + yy),
        );

        // Parallel-axis shift to the center of mass.
        let d = center_of_mass;
        let shift = volume
            * (DMat3::IDENTITY * d.length_squared() - DMat3::from_cols(d * d.x, d * d.y, d * d.z));
        let inertia = (i_origin - shift) * density;

        Self {
            volume,
            mass: density * volume,
            center_of_mass,
            inertia,
        }
    }
}

/// The six independent components of a symmetric inertia tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaMatrix {
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyz: f64,
}

impl InertiaMatrix {
    /// Extract the six components from a symmetric tensor.
    pub fn from_matrix(m: &DMat3) -> Self {
        Self {
            ixx: m.x_axis.x,
            iyy: m.y_axis.y,
            izz: m.z_axis.z,
            ixy: m.x_axis.y,
            ixz: m.x_axis.z,
            iyz: m.y_axis.z,
        }
    }

    /// Rebuild the full symmetric tensor.
    pub fn to_matrix(&self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(self.ixx, self.ixy, self.ixz),
            DVec3::new(self.ixy, self.iyy, self.iyz),
            DVec3::new(self.ixz, self.iyz, self.izz),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::box_mesh;
    use approx::assert_relative_eq;

    /// Analytic inertia of a solid box about its center of mass.
    fn box_inertia(mass: f64, size: DVec3) -> DMat3 {
        let f = mass / 12.0;
        DMat3::from_diagonal(DVec3::new(
            f * (size.y * size.y + size.z * size.z),
            f * (size.x * size.x + size.z * size.z),
            f * (size.x * size.x + size.y * size.y),
        ))
    }

    #[test]
    fn test_box_mass_properties() {
        let size = DVec3::new(0.2, 0.4, 0.6);
        let density = 2700.0;
        let props = MassProperties::from_mesh(&box_mesh(size, DVec3::ZERO), density);

        let volume = size.x * size.y * size.z;
        assert_relative_eq!(props.volume, volume, epsilon = 1e-12);
        assert_relative_eq!(props.mass, density * volume, epsilon = 1e-9);
        assert_relative_eq!(props.center_of_mass.length(), 0.0, epsilon = 1e-12);

        let expected = box_inertia(props.mass, size);
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(
                    props.inertia.col(c)[r],
                    expected.col(c)[r],
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_translated_box_recovers_center() {
        let size = DVec3::new(0.1, 0.1, 0.3);
        let center = DVec3::new(1.0, -2.0, 0.5);
        let props = MassProperties::from_mesh(&box_mesh(size, center), 1000.0);

        assert_relative_eq!(props.center_of_mass.x, center.x, epsilon = 1e-9);
        assert_relative_eq!(props.center_of_mass.y, center.y, epsilon = 1e-9);
        assert_relative_eq!(props.center_of_mass.z, center.z, epsilon = 1e-9);

        // About the center of mass the tensor must not depend on where the
        // solid sits relative to the origin.
        let at_origin = MassProperties::from_mesh(&box_mesh(size, DVec3::ZERO), 1000.0);
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(
                    props.inertia.col(c)[r],
                    at_origin.inertia.col(c)[r],
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_density_scales_mass_and_inertia_linearly() {
        let mesh = box_mesh(DVec3::new(0.3, 0.2, 0.1), DVec3::new(0.05, 0.0, -0.02));
        let one = MassProperties::from_mesh(&mesh, 1.0);
        let heavy = MassProperties::from_mesh(&mesh, 7.5);

        assert_relative_eq!(heavy.mass, 7.5 * one.mass, epsilon = 1e-12);
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(
                    heavy.inertia.col(c)[r],
                    7.5 * one.inertia.col(c)[r],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_inertia_matrix_roundtrip() {
        let m = DMat3::from_cols(
            DVec3::new(1.0, -0.1, -0.2),
            DVec3::new(-0.1, 2.0, -0.3),
            DVec3::new(-0.2, -0.3, 3.0),
        );
        let components = InertiaMatrix::from_matrix(&m);
        assert_eq!(components.ixx, 1.0);
        assert_eq!(components.iyy, 2.0);
        assert_eq!(components.izz, 3.0);
        assert_eq!(components.ixy, -0.1);
        assert_eq!(components.ixz, -0.2);
        assert_eq!(components.iyz, -0.3);
        assert_eq!(components.to_matrix(), m);
    }
}
