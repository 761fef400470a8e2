// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of superposition (Kabsch algorithm) and RMSD calculations.

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::analysis::{select_atoms, NM_TO_ANGSTROM};
use crate::errors::{AnalysisError, RMSDError};
use crate::structures::vector3d::Vector3D;
use crate::system::System;
use crate::PANIC_MESSAGE;
use crate::trajectory::{Frame, Trajectory};

/// Structure against which the RMSD time series is calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RmsdReference {
    /// Positions from the structure file.
    #[default]
    Structure,
    /// First analyzed frame of the trajectory.
    FirstFrame,
}

/// Calculate the optimal rotation matrix and RMSD to align two sets of points (P -> Q)
/// using the Kabsch algorithm. All points have the same weight.
///
/// ## Parameters
/// - `p`: target points
/// - `q`: reference points
/// - `centroid_p`: center of geometry of points `p`
/// - `centroid_q`: center of geometry of points `q`
///
/// ## Returns
/// Rotation matrix `R` and the minimal RMSD. A point `x` of `p` is superposed onto `q` as
/// `R^T (x - centroid_p) + centroid_q`.
///
/// ## Panics
/// Panics if `p` and `q` do not have the same length.
pub fn kabsch(
    p: &[Vector3D],
    q: &[Vector3D],
    centroid_p: &Vector3D,
    centroid_q: &Vector3D,
) -> (Matrix3<f32>, f32) {
    assert_eq!(
        p.len(),
        q.len(),
        "FATAL FLEXAN ERROR | rmsd::kabsch | Number of points `p` and `q` does not match.{}",
        PANIC_MESSAGE
    );

    // center the points
    let p_centered: Vec<Vector3D> = p.iter().map(|point| point - centroid_p).collect();
    let q_centered: Vec<Vector3D> = q.iter().map(|point| point - centroid_q).collect();

    // compute the covariance matrix
    let mut h = Matrix3::zeros();
    for (p_c, q_c) in p_centered.iter().zip(q_centered.iter()) {
        h += p_c.deref() * q_c.transpose();
    }

    // perform Singular Value Decomposition (SVD)
    let svd = h.svd(true, true);
    let u = svd.u.unwrap_or_else(|| {
        panic!(
            "FATAL FLEXAN ERROR | rmsd::kabsch | Matrix U was not computed.{}",
            PANIC_MESSAGE
        )
    });
    let v_t = svd.v_t.unwrap_or_else(|| {
        panic!(
            "FATAL FLEXAN ERROR | rmsd::kabsch | Matrix V^T was not computed.{}",
            PANIC_MESSAGE
        )
    });

    let mut d = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }

    // calculate the rotation
    let r = u * d * v_t;

    // calculate RMSD of the rotated centered points
    let rmsd = (p_centered
        .iter()
        .zip(q_centered.iter())
        .map(|(p_c, q_c)| (r.transpose() * p_c.deref() - q_c.deref()).norm_squared())
        .sum::<f32>()
        / p.len().max(1) as f32)
        .sqrt();

    (r, rmsd)
}

/// Check that target and reference contain the same non-zero number of points.
fn check_consistent(target: &[Vector3D], reference: &[Vector3D]) -> Result<(), RMSDError> {
    if reference.len() != target.len() {
        return Err(RMSDError::InconsistentNumberOfAtoms(
            reference.len(),
            target.len(),
        ));
    }

    if target.is_empty() {
        return Err(RMSDError::EmptySelection);
    }

    Ok(())
}

/// Superpose the target points onto the reference points (translation and rotation).
/// Returns the RMSD (in nm) after the superposition.
///
/// ## Returns
/// - `RMSDError::InconsistentNumberOfAtoms` if the sets contain different numbers of points.
/// - `RMSDError::EmptySelection` if the sets contain no points.
///
/// In case of an error, the target is not modified.
pub fn superpose_positions(
    target: &mut [Vector3D],
    reference: &[Vector3D],
) -> Result<f32, RMSDError> {
    check_consistent(target, reference)?;

    let centroid_target = Vector3D::center(target);
    let centroid_reference = Vector3D::center(reference);

    let (rotation, rmsd) = kabsch(target, reference, &centroid_target, &centroid_reference);
    apply_fit(target, &centroid_target, &centroid_reference, &rotation);

    Ok(rmsd)
}

/// Move points by the rotation obtained from [`kabsch`].
fn apply_fit(
    points: &mut [Vector3D],
    centroid_target: &Vector3D,
    centroid_reference: &Vector3D,
    rotation: &Matrix3<f32>,
) {
    let rotation_t = rotation.transpose();
    for point in points.iter_mut() {
        let centered = *point - *centroid_target;
        *point = Vector3D::from(rotation_t * centered.deref()) + *centroid_reference;
    }
}

/// Calculate the RMSD (in nm) between two sets of points without any superposition.
pub fn rmsd_nofit(target: &[Vector3D], reference: &[Vector3D]) -> Result<f32, RMSDError> {
    check_consistent(target, reference)?;

    let sum = target
        .iter()
        .zip(reference.iter())
        .map(|(t, r)| t.distance_squared(r))
        .sum::<f32>();

    Ok((sum / target.len() as f32).sqrt())
}

/// Calculate RMSD (in Å) of every frame of a trajectory against a reference frame.
///
/// ## Parameters
/// - `fit`: if `true`, every frame is optimally superposed onto the reference before
///   the RMSD is calculated. The trajectory itself is never modified.
///
/// ## Example
/// ```no_run
/// # use flexan::prelude::*;
/// #
/// let system = System::from_file("protein.pdb").unwrap();
/// let calphas = system.select_indices("name CA").unwrap();
///
/// let trajectory = Trajectory::load("md.xtc", system.get_n_atoms(), 1)
///     .unwrap()
///     .atom_slice(&calphas);
/// let reference = Frame::from_system(&system).unwrap().slice(&calphas);
///
/// let rmsd = rmsd_series(&trajectory, &reference, true).unwrap();
/// ```
pub fn rmsd_series(
    trajectory: &Trajectory,
    reference: &Frame,
    fit: bool,
) -> Result<Vec<f32>, RMSDError> {
    let reference_positions = reference.get_positions();
    let centroid_reference = Vector3D::center(reference_positions);

    trajectory
        .get_frames()
        .iter()
        .map(|frame| {
            let positions = frame.get_positions();
            let rmsd = if fit {
                check_consistent(positions, reference_positions)?;
                let centroid = Vector3D::center(positions);
                kabsch(positions, reference_positions, &centroid, &centroid_reference).1
            } else {
                rmsd_nofit(positions, reference_positions)?
            };

            Ok(rmsd * NM_TO_ANGSTROM)
        })
        .collect()
}

/// ## Methods for calculating RMSD between structures.
impl System {
    /// Calculate the minimal RMSD (in Å) between the atoms selected by `query` in this system
    /// and the atoms selected by the same query in the reference system.
    /// Neither of the systems is modified.
    ///
    /// ## Returns
    /// - `AnalysisError::Selection` if the query is invalid.
    /// - `AnalysisError::EmptySelection` if the query selects no atoms.
    /// - `AnalysisError::Superposition` if the selections contain different numbers of atoms
    ///   or if any selected atom has no position.
    pub fn calc_rmsd(&self, reference: &System, query: &str) -> Result<f32, AnalysisError> {
        let (target, reference) = selected_positions(self, reference, query)?;

        let centroid_target = Vector3D::center(&target);
        let centroid_reference = Vector3D::center(&reference);
        let (_, rmsd) = kabsch(&target, &reference, &centroid_target, &centroid_reference);

        Ok(rmsd * NM_TO_ANGSTROM)
    }

    /// Superpose this system onto the reference system using the atoms selected by `query`.
    /// All atoms of the system are moved, not only the selected ones.
    /// Returns the RMSD (in Å) after the superposition.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let reference = System::from_file("reference.pdb").unwrap();
    /// let mut system = System::from_file("model.pdb").unwrap();
    ///
    /// let rmsd = system.calc_rmsd_and_fit(&reference, "@backbone").unwrap();
    /// println!("Backbone RMSD: {} Å", rmsd);
    /// ```
    ///
    /// ## Notes
    /// - In case of an error, the system is not modified.
    /// - Atoms without positions are left without positions.
    pub fn calc_rmsd_and_fit(
        &mut self,
        reference: &System,
        query: &str,
    ) -> Result<f32, AnalysisError> {
        let (target, reference) = selected_positions(self, reference, query)?;

        let centroid_target = Vector3D::center(&target);
        let centroid_reference = Vector3D::center(&reference);
        let (rotation, rmsd) = kabsch(&target, &reference, &centroid_target, &centroid_reference);

        self.transform_positions(|positions| {
            apply_fit(positions, &centroid_target, &centroid_reference, &rotation)
        });

        Ok(rmsd * NM_TO_ANGSTROM)
    }
}

/// Select atoms by query in both systems and extract their positions.
fn selected_positions(
    system: &System,
    reference: &System,
    query: &str,
) -> Result<(Vec<Vector3D>, Vec<Vector3D>), AnalysisError> {
    let indices = select_atoms(system, query)?;
    let reference_indices = select_atoms(reference, query)?;

    if indices.len() != reference_indices.len() {
        return Err(RMSDError::InconsistentNumberOfAtoms(
            reference_indices.len(),
            indices.len(),
        )
        .into());
    }

    let positions = |s: &System, idx: &[usize]| {
        idx.iter()
            .map(|&i| {
                s.get_atoms_as_ref()[i]
                    .get_position()
                    .copied()
                    .ok_or(RMSDError::InvalidPosition(i))
            })
            .collect::<Result<Vec<Vector3D>, RMSDError>>()
    };

    Ok((
        positions(system, &indices)?,
        positions(reference, &reference_indices)?,
    ))
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::{
        peptide_system, random_rigid_motion, rotate_z, seeded_rng,
    };
    use float_cmp::assert_approx_eq;

    fn tetrahedron() -> Vec<Vector3D> {
        vec![
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 2.0, 0.0),
            Vector3D::new(0.0, 0.0, 3.0),
            Vector3D::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn kabsch_no_rotation_no_translation() {
        let p = tetrahedron();
        let centroid = Vector3D::center(&p);
        let (rotation, rmsd) = kabsch(&p, &p, &centroid, &centroid);

        assert!(rotation.is_identity(1e-5));
        assert_approx_eq!(f32, rmsd, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn kabsch_translation() {
        let q = tetrahedron();
        let p: Vec<Vector3D> = q
            .iter()
            .map(|x| *x + Vector3D::new(1.0, -3.0, 2.5))
            .collect();

        let (rotation, rmsd) = kabsch(&p, &q, &Vector3D::center(&p), &Vector3D::center(&q));
        assert!(rotation.is_identity(1e-5));
        assert_approx_eq!(f32, rmsd, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn superpose_random_rigid_motions() {
        let reference = tetrahedron();
        let mut rng = seeded_rng(1234);

        for _ in 0..20 {
            let mut target = random_rigid_motion(&reference, &mut rng);
            let rmsd = superpose_positions(&mut target, &reference).unwrap();

            assert_approx_eq!(f32, rmsd, 0.0, epsilon = 1e-4);
            for (t, r) in target.iter().zip(reference.iter()) {
                assert_approx_eq!(f32, t.x, r.x, epsilon = 1e-4);
                assert_approx_eq!(f32, t.y, r.y, epsilon = 1e-4);
                assert_approx_eq!(f32, t.z, r.z, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn superpose_reflection_not_allowed() {
        let reference = tetrahedron();
        // mirror image can not be superposed by a proper rotation
        let mut target: Vec<Vector3D> = reference
            .iter()
            .map(|x| Vector3D::new(-x.x, x.y, x.z))
            .collect();

        let rmsd = superpose_positions(&mut target, &reference).unwrap();
        assert!(rmsd > 0.1);
    }

    #[test]
    fn superpose_errors() {
        let reference = tetrahedron();
        let mut target = reference[0..3].to_vec();
        assert_eq!(
            superpose_positions(&mut target, &reference),
            Err(RMSDError::InconsistentNumberOfAtoms(4, 3))
        );
        assert_eq!(target, reference[0..3].to_vec());

        assert_eq!(
            superpose_positions(&mut [], &[]),
            Err(RMSDError::EmptySelection)
        );
    }

    #[test]
    fn rmsd_without_fit() {
        let reference = tetrahedron();
        let target: Vec<Vector3D> = reference
            .iter()
            .map(|x| *x + Vector3D::new(0.3, 0.0, 0.4))
            .collect();

        assert_approx_eq!(f32, rmsd_nofit(&target, &reference).unwrap(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn series() {
        let reference = Frame::new(tetrahedron(), 0.0, 0, None);
        let frames = (0..5)
            .map(|i| {
                let positions = tetrahedron()
                    .iter()
                    .map(|x| rotate_z(x, 0.2 * i as f32) + Vector3D::new(0.1 * i as f32, 0.0, 0.0))
                    .collect();
                Frame::new(positions, i as f32, i as u64, None)
            })
            .collect();
        let trajectory = Trajectory::from_frames(frames).unwrap();

        let fitted = rmsd_series(&trajectory, &reference, true).unwrap();
        assert_eq!(fitted.len(), 5);
        for value in fitted {
            assert_approx_eq!(f32, value, 0.0, epsilon = 1e-3);
        }

        let unfitted = rmsd_series(&trajectory, &reference, false).unwrap();
        assert_approx_eq!(f32, unfitted[0], 0.0, epsilon = 1e-5);
        assert!(unfitted[4] > 1.0);

        // trajectory is not modified
        assert_approx_eq!(
            f32,
            trajectory.get_frames()[4].get_positions()[0].x,
            rotate_z(&tetrahedron()[0], 0.8).x + 0.4
        );
    }

    #[test]
    fn system_rmsd_and_fit() {
        let reference = peptide_system();
        let mut system = peptide_system();
        system.transform_positions(|positions| {
            for p in positions.iter_mut() {
                *p = rotate_z(p, 1.0) + Vector3D::new(2.0, 1.0, 0.0);
            }
        });

        let rmsd = system.calc_rmsd(&reference, "@backbone").unwrap();
        assert_approx_eq!(f32, rmsd, 0.0, epsilon = 1e-3);

        // the fitted atoms must not be collinear, otherwise the rotation is not unique
        let rmsd = system.calc_rmsd_and_fit(&reference, "name N or name CA").unwrap();
        assert_approx_eq!(f32, rmsd, 0.0, epsilon = 1e-3);

        // all atoms are moved back
        for (atom, ref_atom) in system
            .get_atoms_as_ref()
            .iter()
            .zip(reference.get_atoms_as_ref())
        {
            let p = atom.get_position().unwrap();
            let r = ref_atom.get_position().unwrap();
            assert_approx_eq!(f32, p.x, r.x, epsilon = 1e-4);
            assert_approx_eq!(f32, p.y, r.y, epsilon = 1e-4);
            assert_approx_eq!(f32, p.z, r.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn system_rmsd_errors() {
        let reference = peptide_system();
        let system = peptide_system();

        assert!(matches!(
            system.calc_rmsd(&reference, "resname TRP"),
            Err(AnalysisError::EmptySelection(_))
        ));
        assert!(matches!(
            system.calc_rmsd(&reference, "resname ALA and"),
            Err(AnalysisError::Selection { .. })
        ));
    }

    #[test]
    fn reference_serde() {
        let reference: RmsdReference = serde_yaml::from_str("first_frame").unwrap();
        assert_eq!(reference, RmsdReference::FirstFrame);
        let reference: RmsdReference = serde_yaml::from_str("structure").unwrap();
        assert_eq!(reference, RmsdReference::Structure);
        assert!(serde_yaml::from_str::<RmsdReference>("last_frame").is_err());
    }
}
