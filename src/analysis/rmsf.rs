// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the root mean square fluctuation calculation.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::analysis::NM_TO_ANGSTROM;
use crate::errors::RMSFError;
use crate::structures::vector3d::Vector3D;
use crate::trajectory::{Frame, Trajectory};

/// Position around which the atoms fluctuate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluctuationCenter {
    /// Time-averaged position of the atom in the trajectory.
    #[default]
    Average,
    /// Position of the atom in the reference structure.
    Reference,
}

impl Display for FluctuationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FluctuationCenter::Average => write!(f, "average"),
            FluctuationCenter::Reference => write!(f, "reference"),
        }
    }
}

/// Calculate the root mean square fluctuation of every atom of the trajectory (in Å).
///
/// RMSF of atom `i` is `sqrt( 1/T * Σ_t |x_i(t) - c_i|^2 )` where `T` is the number of frames
/// and `c_i` is either the average position of the atom in the trajectory
/// or its position in the reference frame.
///
/// No superposition is performed. Superpose the trajectory
/// (see [`Trajectory::superpose`]) before calling this function if needed.
///
/// ## Returns
/// - Vector with one value per atom, in the order of the atoms in the trajectory.
/// - `RMSFError::NoFrames` if the trajectory is empty.
/// - `RMSFError::InconsistentNumberOfAtoms` if the reference has a different number of atoms.
///
/// ## Example
/// ```
/// # use flexan::prelude::*;
/// #
/// let frames = vec![
///     Frame::new(vec![Vector3D::new(0.0, 0.1, 0.0)], 0.0, 0, None),
///     Frame::new(vec![Vector3D::new(0.0, -0.1, 0.0)], 1.0, 1, None),
/// ];
/// let reference = frames[0].clone();
/// let trajectory = Trajectory::from_frames(frames).unwrap();
///
/// let fluctuation = rmsf(&trajectory, &reference, FluctuationCenter::Average).unwrap();
/// assert!((fluctuation[0] - 1.0).abs() < 1e-5);
/// ```
pub fn rmsf(
    trajectory: &Trajectory,
    reference: &Frame,
    center: FluctuationCenter,
) -> Result<Vec<f32>, RMSFError> {
    if reference.get_n_atoms() != trajectory.n_atoms() {
        return Err(RMSFError::InconsistentNumberOfAtoms(
            reference.get_n_atoms(),
            trajectory.n_atoms(),
        ));
    }

    let centers: Vec<Vector3D> = match center {
        FluctuationCenter::Average => trajectory.average_positions().ok_or(RMSFError::NoFrames)?,
        FluctuationCenter::Reference if trajectory.is_empty() => return Err(RMSFError::NoFrames),
        FluctuationCenter::Reference => reference.get_positions().to_vec(),
    };

    let mut sums = vec![0.0f32; trajectory.n_atoms()];
    for frame in trajectory.get_frames() {
        for ((sum, position), center) in sums
            .iter_mut()
            .zip(frame.get_positions())
            .zip(centers.iter())
        {
            *sum += position.distance_squared(center);
        }
    }

    let n_frames = trajectory.n_frames() as f32;
    Ok(sums
        .into_iter()
        .map(|sum| (sum / n_frames).sqrt() * NM_TO_ANGSTROM)
        .collect())
}

/******************************/
/*         UNIT TESTS         */
/******************************/
