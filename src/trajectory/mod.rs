// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Trajectory structure: an ordered in-memory collection of frames.

use std::ops::Range;
use std::path::Path;

use crate::analysis::rmsd::superpose_positions;
use crate::errors::{RMSDError, ReadTrajError};
use crate::io::traj_io::open_trajectory;
use crate::progress::ProgressPrinter;
use crate::structures::vector3d::Vector3D;

mod frame;

pub use frame::Frame;

/// Ordered collection of frames with the same number of atoms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    frames: Vec<Frame>,
    n_atoms: usize,
}

/// Half-open range of frames `[start, stop)`.
/// Missing `start` means the first frame, missing `stop` means the end of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBounds {
    pub start: Option<usize>,
    pub stop: Option<usize>,
}

impl FrameBounds {
    pub fn new(start: Option<usize>, stop: Option<usize>) -> Self {
        FrameBounds { start, stop }
    }

    /// Bounds containing all frames.
    pub fn all() -> Self {
        FrameBounds::default()
    }

    /// Convert the bounds to a range of frame indices, clamped to a trajectory with `n_frames` frames.
    /// The range is empty if `start` is not lower than `stop`.
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// #
    /// assert_eq!(FrameBounds::new(Some(5), Some(15)).range(50), 5..15);
    /// assert_eq!(FrameBounds::new(None, Some(15)).range(10), 0..10);
    /// assert_eq!(FrameBounds::new(Some(20), None).range(10), 10..10);
    /// ```
    pub fn range(&self, n_frames: usize) -> Range<usize> {
        let stop = self.stop.unwrap_or(n_frames).min(n_frames);
        let start = self.start.unwrap_or(0).min(stop);
        start..stop
    }
}

impl Trajectory {
    /// Read a trajectory file of any supported format into memory.
    /// Only every `stride`th frame is kept, starting with the first one.
    ///
    /// ## Returns
    /// - `Trajectory` if successful.
    /// - `ReadTrajError` if the file could not be read, the stride is zero,
    ///   or any frame does not contain exactly `n_atoms` atoms.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let system = System::from_file("system.gro").unwrap();
    /// let trajectory = Trajectory::load("md.xtc", system.get_n_atoms(), 2).unwrap();
    /// println!("Read {} frames.", trajectory.n_frames());
    /// ```
    pub fn load(
        filename: impl AsRef<Path>,
        n_atoms: usize,
        stride: usize,
    ) -> Result<Trajectory, ReadTrajError> {
        let reader = open_trajectory(filename, n_atoms)?.with_step(stride)?;
        Trajectory::collect(reader, n_atoms)
    }

    /// Same as [`Trajectory::load`] but the progress of the reading is reported using the provided printer.
    pub fn load_with_progress(
        filename: impl AsRef<Path>,
        n_atoms: usize,
        stride: usize,
        printer: ProgressPrinter,
    ) -> Result<Trajectory, ReadTrajError> {
        let reader = open_trajectory(filename, n_atoms)?
            .with_step(stride)?
            .print_progress(printer);
        Trajectory::collect(reader, n_atoms)
    }

    /// Read multiple trajectory files and join them in the provided order.
    /// Stride is applied to each file separately.
    pub fn load_many(
        filenames: &[impl AsRef<Path>],
        n_atoms: usize,
        stride: usize,
    ) -> Result<Trajectory, ReadTrajError> {
        let trajectories = filenames
            .iter()
            .map(|file| Trajectory::load(file, n_atoms, stride))
            .collect::<Result<Vec<Trajectory>, ReadTrajError>>()?;

        Trajectory::empty(n_atoms).join(trajectories)
    }

    fn collect(
        frames: impl Iterator<Item = Result<Frame, ReadTrajError>>,
        n_atoms: usize,
    ) -> Result<Trajectory, ReadTrajError> {
        Ok(Trajectory {
            frames: frames.collect::<Result<Vec<Frame>, ReadTrajError>>()?,
            n_atoms,
        })
    }

    /// Create a trajectory with no frames.
    pub fn empty(n_atoms: usize) -> Trajectory {
        Trajectory {
            frames: Vec::new(),
            n_atoms,
        }
    }

    /// Create a trajectory from a vector of frames.
    ///
    /// ## Returns
    /// `ReadTrajError::IncompatibleTrajectories` if the frames do not contain the same number of atoms.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Trajectory, ReadTrajError> {
        let n_atoms = frames.first().map(Frame::get_n_atoms).unwrap_or(0);
        if let Some(frame) = frames.iter().find(|f| f.get_n_atoms() != n_atoms) {
            return Err(ReadTrajError::IncompatibleTrajectories(
                n_atoms,
                frame.get_n_atoms(),
            ));
        }

        Ok(Trajectory { frames, n_atoms })
    }

    /// Concatenate trajectories in the provided order.
    /// Frames are kept as they are, even if the trajectories overlap in time.
    ///
    /// ## Returns
    /// `ReadTrajError::IncompatibleTrajectories` if the trajectories contain different numbers of atoms.
    /// Empty trajectories are always compatible.
    pub fn join(
        mut self,
        others: impl IntoIterator<Item = Trajectory>,
    ) -> Result<Trajectory, ReadTrajError> {
        for other in others {
            if other.is_empty() {
                continue;
            }

            if self.is_empty() {
                self.n_atoms = other.n_atoms;
            } else if self.n_atoms != other.n_atoms {
                return Err(ReadTrajError::IncompatibleTrajectories(
                    self.n_atoms,
                    other.n_atoms,
                ));
            }

            self.frames.extend(other.frames);
        }

        Ok(self)
    }

    /// Get the frames of the trajectory.
    pub fn get_frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get the number of frames in the trajectory.
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get the number of atoms in each frame of the trajectory.
    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Check whether the trajectory contains no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the simulation times (in ps) of all frames.
    pub fn times(&self) -> Vec<f32> {
        self.frames.iter().map(Frame::get_time).collect()
    }

    /// Get the indices of all frames in their source trajectory files.
    pub fn frame_numbers(&self) -> Vec<usize> {
        self.frames.iter().map(Frame::get_frame_number).collect()
    }

    /// Create a new trajectory containing only the atoms with the given indices, in the given order.
    /// Indices that do not correspond to any atom are skipped.
    pub fn atom_slice(&self, indices: &[usize]) -> Trajectory {
        Trajectory {
            frames: self.frames.iter().map(|f| f.slice(indices)).collect(),
            n_atoms: indices.iter().filter(|&&i| i < self.n_atoms).count(),
        }
    }

    /// Create a new trajectory containing only the frames inside the bounds.
    /// The bounds are clamped to the length of the trajectory.
    pub fn frames_slice(&self, bounds: FrameBounds) -> Trajectory {
        Trajectory {
            frames: self.frames[bounds.range(self.n_frames())].to_vec(),
            n_atoms: self.n_atoms,
        }
    }

    /// Superpose every frame of the trajectory onto the reference frame
    /// (translation and rotation minimizing the RMSD).
    ///
    /// ## Returns
    /// - `RMSDError::InconsistentNumberOfAtoms` if the reference has a different number of atoms.
    ///   In such case, the trajectory is not modified.
    /// - `RMSDError::EmptySelection` if the trajectory contains no atoms.
    pub fn superpose(&mut self, reference: &Frame) -> Result<(), RMSDError> {
        if reference.get_n_atoms() != self.n_atoms {
            return Err(RMSDError::InconsistentNumberOfAtoms(
                reference.get_n_atoms(),
                self.n_atoms,
            ));
        }

        for frame in self.frames.iter_mut() {
            superpose_positions(frame.get_positions_mut(), reference.get_positions())?;
        }

        Ok(())
    }

    /// Make the atoms with the given indices whole in every frame of the trajectory
    /// (see [`Frame::make_whole`]).
    ///
    /// The first atom of the chain is kept continuous in time: in the first frame, it is placed
    /// at the periodic image closest to its position in `reference`, in every following frame
    /// at the image closest to its position in the previous frame. Whole molecules therefore
    /// do not jump across the box.
    ///
    /// Frames without a usable simulation box are not modified.
    /// Returns the number of frames that were made whole.
    pub fn make_whole(&mut self, indices: &[usize], reference: &Frame) -> usize {
        let first_position = |frame: &Frame| {
            indices
                .first()
                .and_then(|&i| frame.get_positions().get(i).copied())
        };

        let mut anchor = first_position(reference);
        let mut n_whole = 0;
        for frame in self.frames.iter_mut() {
            if frame.make_whole(indices, anchor) {
                anchor = first_position(&*frame);
                n_whole += 1;
            }
        }

        n_whole
    }

    /// Calculate the average position of every atom across all frames.
    /// Returns `None` if the trajectory contains no frames.
    pub fn average_positions(&self) -> Option<Vec<Vector3D>> {
        if self.is_empty() {
            return None;
        }

        let mut sums = vec![Vector3D::default(); self.n_atoms];
        for frame in self.frames.iter() {
            for (sum, position) in sums.iter_mut().zip(frame.get_positions()) {
                *sum += *position;
            }
        }

        let n_frames = self.n_frames() as f32;
        Some(sums.into_iter().map(|sum| sum / n_frames).collect())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::simbox::SimBox;
    use crate::test_utilities::utilities::{
        linear_trajectory, rotate_z, write_dcd, DcdOptions,
    };
    use float_cmp::assert_approx_eq;

    #[test]
    fn bounds_range() {
        assert_eq!(FrameBounds::all().range(50), 0..50);
        assert_eq!(FrameBounds::new(Some(5), Some(15)).range(50), 5..15);
        assert_eq!(FrameBounds::new(None, Some(15)).range(50), 0..15);
        assert_eq!(FrameBounds::new(Some(45), None).range(50), 45..50);
        assert_eq!(FrameBounds::new(Some(40), Some(100)).range(50), 40..50);
        assert!(FrameBounds::new(Some(15), Some(5)).range(50).is_empty());
        assert!(FrameBounds::new(Some(60), None).range(50).is_empty());
        assert!(FrameBounds::all().range(0).is_empty());
    }

    #[test]
    fn load_dcd_stride() {
        let file = tempfile::Builder::new().suffix(".dcd").tempfile().unwrap();
        let frames: Vec<Vec<[f32; 3]>> = (0..50)
            .map(|f| vec![[f as f32, 0.0, 0.0], [0.0, f as f32, 0.0]])
            .collect();
        write_dcd(file.path(), &frames, &DcdOptions::default());

        let trajectory = Trajectory::load(file.path(), 2, 1).unwrap();
        assert_eq!(trajectory.n_frames(), 50);
        assert_eq!(trajectory.n_atoms(), 2);

        let trajectory = Trajectory::load(file.path(), 2, 2).unwrap();
        assert_eq!(trajectory.n_frames(), 25);
        assert_eq!(
            trajectory.frame_numbers(),
            (0..50).step_by(2).collect::<Vec<usize>>()
        );
        assert_approx_eq!(f32, trajectory.get_frames()[3].get_positions()[0].x, 0.6);

        match Trajectory::load(file.path(), 3, 1) {
            Err(ReadTrajError::AtomsNumberMismatch(_, 2, 3)) => (),
            _ => panic!("Loading should fail with AtomsNumberMismatch."),
        }

        match Trajectory::load(file.path(), 2, 0) {
            Err(ReadTrajError::InvalidStep(0)) => (),
            _ => panic!("Loading should fail with InvalidStep."),
        }
    }

    #[test]
    fn load_gro() {
        let trajectory = Trajectory::load("test_files/peptide_traj.gro", 12, 1).unwrap();
        assert_eq!(trajectory.n_frames(), 3);
        assert_eq!(trajectory.times(), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn load_many() {
        let trajectory = Trajectory::load_many(
            &["test_files/peptide_traj.gro", "test_files/peptide_traj.pdb"],
            12,
            1,
        )
        .unwrap();

        assert_eq!(trajectory.n_frames(), 6);
        assert_eq!(trajectory.frame_numbers(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn join_incompatible() {
        let first = linear_trajectory(5, 4, 0.1);
        let second = linear_trajectory(5, 3, 0.1);

        assert_eq!(
            first.clone().join(vec![second]),
            Err(ReadTrajError::IncompatibleTrajectories(4, 3))
        );

        let joined = first
            .clone()
            .join(vec![Trajectory::empty(7), first.clone()])
            .unwrap();
        assert_eq!(joined.n_frames(), 10);
        assert_eq!(joined.n_atoms(), 4);

        let joined = Trajectory::empty(0).join(vec![first]).unwrap();
        assert_eq!(joined.n_atoms(), 4);
    }

    #[test]
    fn from_frames_incompatible() {
        let frames = vec![
            Frame::new(vec![Vector3D::default(); 3], 0.0, 0, None),
            Frame::new(vec![Vector3D::default(); 2], 1.0, 1, None),
        ];

        assert_eq!(
            Trajectory::from_frames(frames),
            Err(ReadTrajError::IncompatibleTrajectories(3, 2))
        );
    }

    #[test]
    fn slices() {
        let trajectory = linear_trajectory(50, 6, 0.1);

        let sliced = trajectory.frames_slice(FrameBounds::new(Some(5), Some(15)));
        assert_eq!(sliced.n_frames(), 10);
        assert_eq!(sliced.frame_numbers(), (5..15).collect::<Vec<usize>>());

        let sliced = trajectory.atom_slice(&[5, 0, 17]);
        assert_eq!(sliced.n_atoms(), 2);
        assert_eq!(sliced.n_frames(), 50);
        assert_eq!(
            sliced.get_frames()[0].get_positions()[0],
            trajectory.get_frames()[0].get_positions()[5]
        );
    }

    #[test]
    fn average_positions() {
        let trajectory = linear_trajectory(5, 2, 1.0);
        let average = trajectory.average_positions().unwrap();

        // the atoms move uniformly along x
        for (avg, initial) in average
            .iter()
            .zip(trajectory.get_frames()[0].get_positions())
        {
            assert_approx_eq!(f32, avg.x, initial.x + 2.0, epsilon = 1e-5);
            assert_approx_eq!(f32, avg.y, initial.y, epsilon = 1e-5);
        }

        assert!(Trajectory::empty(3).average_positions().is_none());
    }

    #[test]
    fn superpose_rotated() {
        let reference = Frame::new(
            vec![
                Vector3D::new(1.0, 0.0, 0.0),
                Vector3D::new(0.0, 2.0, 0.0),
                Vector3D::new(0.0, 0.0, 3.0),
                Vector3D::new(1.0, 1.0, 1.0),
            ],
            0.0,
            0,
            None,
        );

        let frames = (0..10)
            .map(|i| {
                let angle = i as f32 * 0.3;
                let positions = reference
                    .get_positions()
                    .iter()
                    .map(|p| rotate_z(p, angle) + Vector3D::new(i as f32, -2.0, 0.5))
                    .collect();
                Frame::new(positions, i as f32, i as u64, None)
            })
            .collect();

        let mut trajectory = Trajectory::from_frames(frames).unwrap();
        trajectory.superpose(&reference).unwrap();

        for frame in trajectory.get_frames() {
            for (p, r) in frame.get_positions().iter().zip(reference.get_positions()) {
                assert_approx_eq!(f32, p.x, r.x, epsilon = 1e-4);
                assert_approx_eq!(f32, p.y, r.y, epsilon = 1e-4);
                assert_approx_eq!(f32, p.z, r.z, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn superpose_inconsistent() {
        let mut trajectory = linear_trajectory(3, 4, 0.1);
        let reference = Frame::new(vec![Vector3D::default(); 3], 0.0, 0, None);
        assert_eq!(
            trajectory.superpose(&reference),
            Err(RMSDError::InconsistentNumberOfAtoms(3, 4))
        );
    }

    #[test]
    fn make_whole_continuous() {
        let simbox = SimBox::from([3.0, 3.0, 3.0]);
        let reference = Frame::new(
            vec![Vector3D::new(2.8, 1.0, 1.0), Vector3D::new(3.1, 1.0, 1.0)],
            0.0,
            0,
            None,
        );

        // the molecule drifts along x and is wrapped into the box
        let frames = (0..6)
            .map(|f| {
                let shift = 0.2 * f as f32;
                let wrap = |x: f32| x - 3.0 * (x / 3.0).floor();
                Frame::new(
                    vec![
                        Vector3D::new(wrap(2.8 + shift), 1.0, 1.0),
                        Vector3D::new(wrap(3.1 + shift), 1.0, 1.0),
                    ],
                    f as f32,
                    f as u64,
                    Some(simbox.clone()),
                )
            })
            .collect();
        let mut trajectory = Trajectory::from_frames(frames).unwrap();
        trajectory.frames.push(Frame::new(
            vec![Vector3D::new(0.5, 1.0, 1.0), Vector3D::new(0.8, 1.0, 1.0)],
            6.0,
            6,
            None,
        ));

        assert_eq!(trajectory.make_whole(&[0, 1], &reference), 6);

        for (f, frame) in trajectory.get_frames().iter().take(6).enumerate() {
            let shift = 0.2 * f as f32;
            assert_approx_eq!(f32, frame.get_positions()[0].x, 2.8 + shift, epsilon = 1e-4);
            assert_approx_eq!(f32, frame.get_positions()[1].x, 3.1 + shift, epsilon = 1e-4);
        }

        // frame without a box is not modified
        assert_approx_eq!(f32, trajectory.get_frames()[6].get_positions()[0].x, 0.5);
    }
}
