// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of a single trajectory frame.

use crate::errors::RMSDError;
use crate::structures::{simbox::SimBox, vector3d::Vector3D};
use crate::system::System;

/// Coordinates of all atoms at a single point of a simulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Positions of the atoms in nm.
    positions: Vec<Vector3D>,
    /// Simulation time in ps.
    time: f32,
    /// Simulation step.
    step: u64,
    /// Index of the frame in the trajectory file it was read from.
    frame_number: usize,
    /// Simulation box. (Optional.)
    simbox: Option<SimBox>,
}

impl Frame {
    /// Create a new frame. The frame number is set to 0.
    pub fn new(positions: Vec<Vector3D>, time: f32, step: u64, simbox: Option<SimBox>) -> Self {
        Frame {
            positions,
            time,
            step,
            frame_number: 0,
            simbox,
        }
    }

    /// Set the index of the frame in its source trajectory.
    pub fn with_frame_number(mut self, frame_number: usize) -> Self {
        self.frame_number = frame_number;
        self
    }

    /// Construct a frame from the positions of all atoms of a system.
    ///
    /// ## Returns
    /// `RMSDError::InvalidPosition` if any atom has no position.
    pub fn from_system(system: &System) -> Result<Self, RMSDError> {
        let positions = system
            .get_atoms_as_ref()
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                atom.get_position()
                    .copied()
                    .ok_or(RMSDError::InvalidPosition(i))
            })
            .collect::<Result<Vec<Vector3D>, RMSDError>>()?;

        Ok(Frame::new(
            positions,
            0.0,
            0,
            system.get_box_as_ref().cloned(),
        ))
    }

    /// Get the positions of the atoms.
    pub fn get_positions(&self) -> &[Vector3D] {
        &self.positions
    }

    pub(crate) fn get_positions_mut(&mut self) -> &mut [Vector3D] {
        &mut self.positions
    }

    /// Get the simulation time of the frame in ps.
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Get the simulation step of the frame.
    pub fn get_step(&self) -> u64 {
        self.step
    }

    /// Get the index of the frame in the trajectory file it was read from.
    pub fn get_frame_number(&self) -> usize {
        self.frame_number
    }

    /// Get the simulation box of the frame.
    pub fn get_box(&self) -> Option<&SimBox> {
        self.simbox.as_ref()
    }

    /// Get the number of atoms in the frame.
    pub fn get_n_atoms(&self) -> usize {
        self.positions.len()
    }

    /// Make the atoms with the given indices whole across periodic boundaries.
    ///
    /// The atoms are treated as a chain in the order of `indices`: every atom is moved
    /// to its periodic image closest to the previous atom of the chain. The first atom is moved
    /// to its image closest to `anchor` or left in place if no anchor is provided.
    /// Indices that do not correspond to any atom are skipped.
    ///
    /// ## Returns
    /// `false` if the frame has no simulation box usable for periodic boundary conditions.
    /// In such case, the frame is not modified.
    ///
    /// ## Notes
    /// - Consecutive atoms of the chain must be closer than half of the box.
    ///   This holds for the atoms of a protein ordered as in the structure file.
    pub fn make_whole(&mut self, indices: &[usize], anchor: Option<Vector3D>) -> bool {
        let simbox = match self.simbox.as_ref().filter(|simbox| simbox.is_periodic()) {
            Some(simbox) => simbox.clone(),
            None => return false,
        };

        let mut previous = anchor;
        for &index in indices {
            let Some(position) = self.positions.get_mut(index) else {
                continue;
            };

            if let Some(previous) = previous {
                *position = previous + previous.vector_to(position, &simbox);
            }

            previous = Some(*position);
        }

        true
    }

    /// Create a new frame containing only the atoms with the given indices, in the given order.
    /// Indices that do not correspond to any atom are skipped.
    pub fn slice(&self, indices: &[usize]) -> Frame {
        Frame {
            positions: indices
                .iter()
                .filter_map(|&i| self.positions.get(i).copied())
                .collect(),
            time: self.time,
            step: self.step,
            frame_number: self.frame_number,
            simbox: self.simbox.clone(),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use crate::structures::atom::Atom;
    use crate::test_utilities::utilities::peptide_system;

    #[test]
    fn from_system() {
        let system = peptide_system();
        let frame = Frame::from_system(&system).unwrap();

        assert_eq!(frame.get_n_atoms(), 12);
        assert_eq!(frame.get_positions()[5], Vector3D::new(0.5, 0.3, 0.0));
        assert_eq!(frame.get_frame_number(), 0);
        assert!(frame.get_box().is_some());
    }

    #[test]
    fn from_system_no_positions() {
        let atoms = vec![
            Atom::new(1, "ALA", 1, "N").with_position(Vector3D::new(1.0, 1.0, 1.0)),
            Atom::new(1, "ALA", 2, "CA"),
        ];
        let system = System::new("Test", atoms, None);

        assert_eq!(
            Frame::from_system(&system),
            Err(RMSDError::InvalidPosition(1))
        );
    }

    #[test]
    fn slice() {
        let frame = Frame::new(
            (0..5).map(|i| Vector3D::new(i as f32, 0.0, 0.0)).collect(),
            10.0,
            500,
            None,
        )
        .with_frame_number(7);

        let sliced = frame.slice(&[4, 1, 9]);
        assert_eq!(
            sliced.get_positions(),
            &[Vector3D::new(4.0, 0.0, 0.0), Vector3D::new(1.0, 0.0, 0.0)]
        );
        assert_eq!(sliced.get_frame_number(), 7);
        assert_eq!(sliced.get_step(), 500);
    }

    #[test]
    fn make_whole() {
        let simbox = SimBox::from([2.0, 2.0, 2.0]);
        let mut frame = Frame::new(
            vec![
                Vector3D::new(1.8, 1.0, 1.0),
                Vector3D::new(0.1, 1.0, 1.0),
                Vector3D::new(0.4, 1.0, 1.9),
                Vector3D::new(0.5, 1.0, 0.1),
            ],
            0.0,
            0,
            Some(simbox),
        );

        assert!(frame.make_whole(&[0, 1, 2, 3], None));

        let expected = [
            Vector3D::new(1.8, 1.0, 1.0),
            Vector3D::new(2.1, 1.0, 1.0),
            Vector3D::new(2.4, 1.0, 1.9),
            Vector3D::new(2.5, 1.0, 2.1),
        ];
        for (position, expected) in frame.get_positions().iter().zip(expected.iter()) {
            assert_approx_eq!(f32, position.x, expected.x, epsilon = 1e-5);
            assert_approx_eq!(f32, position.y, expected.y, epsilon = 1e-5);
            assert_approx_eq!(f32, position.z, expected.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn make_whole_anchor_and_subset() {
        let mut frame = Frame::new(
            vec![
                Vector3D::new(4.9, 0.0, 0.0),
                Vector3D::new(0.2, 3.0, 0.0),
                Vector3D::new(0.1, 0.0, 0.0),
            ],
            0.0,
            0,
            Some(SimBox::from([5.0, 5.0, 5.0])),
        );

        // atom 1 is not part of the chain
        assert!(frame.make_whole(&[0, 2, 7], Some(Vector3D::new(-0.2, 0.0, 0.0))));
        assert_approx_eq!(f32, frame.get_positions()[0].x, -0.1, epsilon = 1e-5);
        assert_approx_eq!(f32, frame.get_positions()[1].x, 0.2, epsilon = 1e-5);
        assert_approx_eq!(f32, frame.get_positions()[2].x, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn make_whole_no_box() {
        let positions = vec![Vector3D::new(4.9, 0.0, 0.0), Vector3D::new(0.1, 0.0, 0.0)];
        let mut frame = Frame::new(positions.clone(), 0.0, 0, None);
        assert!(!frame.make_whole(&[0, 1], None));
        assert_eq!(frame.get_positions(), &positions);

        let mut frame = Frame::new(positions.clone(), 0.0, 0, Some(SimBox::default()));
        assert!(!frame.make_whole(&[0, 1], None));
        assert_eq!(frame.get_positions(), &positions);
    }
}
