// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the radius of gyration calculation.

use crate::analysis::NM_TO_ANGSTROM;
use crate::structures::vector3d::Vector3D;
use crate::trajectory::Trajectory;

/// Calculate the geometric radius of gyration (all atoms have the same weight)
/// of a set of points. Returns the radius in the units of the points.
/// Returns 0 for an empty set.
pub fn radius_of_gyration(points: &[Vector3D]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }

    let center = Vector3D::center(points);
    let sum = points
        .iter()
        .map(|point| point.distance_squared(&center))
        .sum::<f32>();

    (sum / points.len() as f32).sqrt()
}

/// Calculate the geometric radius of gyration (in Å) of all atoms of the trajectory in every frame.
///
/// ## Example
/// ```no_run
/// # use flexan::prelude::*;
/// #
/// let system = System::from_file("protein.gro").unwrap();
/// let protein = system.select_indices("@protein").unwrap();
///
/// let trajectory = Trajectory::load("md.xtc", system.get_n_atoms(), 1)
///     .unwrap()
///     .atom_slice(&protein);
///
/// for (time, rg) in trajectory.times().iter().zip(gyration_series(&trajectory)) {
///     println!("{} ps: {} Å", time, rg);
/// }
/// ```
pub fn gyration_series(trajectory: &Trajectory) -> Vec<f32> {
    trajectory
        .get_frames()
        .iter()
        .map(|frame| radius_of_gyration(frame.get_positions()) * NM_TO_ANGSTROM)
        .collect()
}

/******************************/
/*         UNIT TESTS         */
/******************************/
