// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the domain-resolved RMSF analysis.
//!
//! The fluctuation of the selected atoms is calculated twice: once for the whole selection
//! superposed as a single rigid body, and once domain by domain, each domain superposed
//! separately. The per-domain vectors are stitched together in the declared order of the domains.

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::analysis::gyration::gyration_series;
use crate::analysis::rmsd::{rmsd_series, RmsdReference};
use crate::analysis::rmsf::{rmsf, FluctuationCenter};
use crate::analysis::select_atoms;
use crate::errors::AnalysisError;
use crate::progress::ProgressPrinter;
use crate::system::System;
use crate::trajectory::{Frame, FrameBounds, Trajectory};

/// Domain-resolved RMSF analysis.
///
/// Constructed using [`DomainRmsf::new`] and configured using the consuming `with_*` methods.
///
/// ## Example
/// ```no_run
/// # use flexan::prelude::*;
/// #
/// let results = DomainRmsf::new("protein.gro", ["md.xtc"], "@protein and name CA")
///     .with_domains(["resid 1 to 120", "resid 121 to 250"])
///     .with_bounds(FrameBounds::new(Some(100), None))
///     .with_stride(5)
///     .with_rmsd("Calpha", "@protein and name CA")
///     .with_rmsd("Heavy atoms", "@protein and not name r'^H'")
///     .with_rmsd_reference(RmsdReference::FirstFrame)
///     .run()
///     .unwrap();
///
/// println!("{:?}", results.domain_rmsf());
/// ```
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct DomainRmsf {
    /// Structure file providing the topology and the reference positions.
    #[getset(get = "pub")]
    structure: PathBuf,
    /// Trajectory files which are joined in the provided order.
    #[getset(get = "pub")]
    trajectories: Vec<PathBuf>,
    /// Optional ndx file with groups usable in the queries.
    #[getset(get = "pub")]
    ndx: Option<PathBuf>,
    /// Global selection query.
    #[getset(get = "pub")]
    selection: String,
    /// Domain queries in declaration order.
    #[getset(get = "pub")]
    domains: Vec<String>,
    #[getset(get_copy = "pub")]
    bounds: FrameBounds,
    #[getset(get_copy = "pub")]
    stride: usize,
    /// Superpose the globally selected trajectory before calculating the whole-selection RMSF.
    #[getset(get_copy = "pub")]
    superpose: bool,
    #[getset(get_copy = "pub")]
    center: FluctuationCenter,
    /// Make the analyzed atoms whole across periodic boundaries before any superposition.
    #[getset(get_copy = "pub")]
    pbc: bool,
    /// Named groups of atoms for which the RMSD time series is calculated.
    #[getset(get = "pub")]
    rmsd: IndexMap<String, String>,
    #[getset(get_copy = "pub")]
    rmsd_reference: RmsdReference,
    /// Calculate radius of gyration of the globally selected atoms in every frame.
    #[getset(get_copy = "pub")]
    gyration: bool,
    /// Print progress of trajectory reading.
    #[getset(get_copy = "pub")]
    progress: bool,
}

impl DomainRmsf {
    /// Create a new analysis of the atoms selected by `selection` with default parameters:
    /// no domains, all frames, stride 1, superposition enabled, fluctuation around the average structure,
    /// periodic boundary conditions removed, no RMSD groups.
    pub fn new(
        structure: impl AsRef<Path>,
        trajectories: impl IntoIterator<Item = impl AsRef<Path>>,
        selection: &str,
    ) -> Self {
        DomainRmsf {
            structure: structure.as_ref().to_path_buf(),
            trajectories: trajectories
                .into_iter()
                .map(|file| file.as_ref().to_path_buf())
                .collect(),
            ndx: None,
            selection: selection.to_string(),
            domains: Vec::new(),
            bounds: FrameBounds::all(),
            stride: 1,
            superpose: true,
            center: FluctuationCenter::default(),
            pbc: true,
            rmsd: IndexMap::new(),
            rmsd_reference: RmsdReference::default(),
            gyration: false,
            progress: false,
        }
    }

    /// Read groups from an ndx file before resolving the queries.
    pub fn with_ndx(mut self, ndx: impl AsRef<Path>) -> Self {
        self.ndx = Some(ndx.as_ref().to_path_buf());
        self
    }

    /// Set the domain queries. Every domain is intersected with the global selection.
    /// The domains, in the provided order, should partition the global selection.
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.domains = domains
            .into_iter()
            .map(|d| d.as_ref().to_string())
            .collect();
        self
    }

    /// Restrict the whole-selection RMSF and the returned axes to a range of (strided) frames.
    pub fn with_bounds(mut self, bounds: FrameBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Read only every `stride`th frame of each trajectory file.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_superpose(mut self, superpose: bool) -> Self {
        self.superpose = superpose;
        self
    }

    pub fn with_center(mut self, center: FluctuationCenter) -> Self {
        self.center = center;
        self
    }

    /// Make the analyzed atoms whole across periodic boundaries in every frame.
    /// Frames without a simulation box are always used as they are.
    pub fn with_pbc(mut self, pbc: bool) -> Self {
        self.pbc = pbc;
        self
    }

    /// Calculate the RMSD time series of atoms selected by `query` and report it under `name`.
    /// The group is independent of the global selection. Groups are reported in the order
    /// they were added; adding a group with an existing name replaces its query.
    pub fn with_rmsd(mut self, name: &str, query: &str) -> Self {
        self.rmsd.insert(name.to_string(), query.to_string());
        self
    }

    pub fn with_rmsd_reference(mut self, reference: RmsdReference) -> Self {
        self.rmsd_reference = reference;
        self
    }

    /// Also calculate the radius of gyration time series of the globally selected atoms.
    pub fn with_gyration(mut self, gyration: bool) -> Self {
        self.gyration = gyration;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Read the input files and run the analysis.
    ///
    /// ## Returns
    /// - `DomainRmsfResults` if successful.
    /// - `AnalysisError` describing the first failure. No partial results are returned.
    pub fn run(&self) -> Result<DomainRmsfResults, AnalysisError> {
        if self.stride == 0 {
            return Err(AnalysisError::InvalidStride);
        }

        let mut system = System::from_file(&self.structure)?;
        colog_info!(
            "Read structure '{}' containing {} atoms.",
            self.structure.display(),
            system.get_n_atoms()
        );

        if let Some(ndx) = &self.ndx {
            system.read_ndx(ndx)?;
            colog_info!("Read index file '{}'.", ndx.display());
        }

        let trajectory = self.load_trajectory(system.get_n_atoms())?;
        colog_info!(
            "Loaded {} frames (stride {}).",
            trajectory.n_frames(),
            self.stride
        );

        let reference = Frame::from_system(&system)?;
        self.analyze(&system, &trajectory, &reference)
    }

    fn load_trajectory(&self, n_atoms: usize) -> Result<Trajectory, AnalysisError> {
        let trajectories = self
            .trajectories
            .iter()
            .map(|file| {
                colog_info!("Reading trajectory '{}'...", file.display());
                if self.progress {
                    Trajectory::load_with_progress(file, n_atoms, self.stride, ProgressPrinter::new())
                } else {
                    Trajectory::load(file, n_atoms, self.stride)
                }
            })
            .collect::<Result<Vec<Trajectory>, _>>()?;

        Ok(Trajectory::empty(n_atoms).join(trajectories)?)
    }

    /// Run the analysis on an already loaded trajectory.
    /// The stride and the ndx file are not applied here: the trajectory is used as provided
    /// and the queries are resolved against the provided system.
    ///
    /// The reference frame must contain all atoms of the system.
    pub fn analyze(
        &self,
        system: &System,
        trajectory: &Trajectory,
        reference: &Frame,
    ) -> Result<DomainRmsfResults, AnalysisError> {
        // global selection
        let global = select_atoms(system, &self.selection)?;
        let rmsd_groups = self
            .rmsd
            .iter()
            .map(|(name, query)| select_atoms(system, query).map(|indices| (name, query, indices)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let (trajectory, reference) = if self.pbc {
            let mut indices: Vec<usize> = global
                .iter()
                .chain(rmsd_groups.iter().flat_map(|(_, _, group)| group.iter()))
                .copied()
                .collect();
            indices.sort_unstable();
            indices.dedup();

            let (trajectory, reference) = Self::make_whole(trajectory, reference, &indices);
            (Cow::Owned(trajectory), Cow::Owned(reference))
        } else {
            (Cow::Borrowed(trajectory), Cow::Borrowed(reference))
        };

        let global_reference = reference.slice(&global);
        let mut global_trajectory = trajectory.atom_slice(&global);

        if global_trajectory.n_atoms() != global_reference.get_n_atoms() {
            colog_warn!(
                "Selection '{}' has {} atoms in the trajectory but {} atoms in the reference. Slicing again.",
                &self.selection,
                global_trajectory.n_atoms(),
                global_reference.get_n_atoms()
            );

            let global = select_atoms(system, &self.selection)?;
            global_trajectory = trajectory.atom_slice(&global);
            if global_trajectory.n_atoms() != global_reference.get_n_atoms() {
                return Err(AnalysisError::ShapeMismatch {
                    selection: self.selection.clone(),
                    trajectory: global_trajectory.n_atoms(),
                    reference: global_reference.get_n_atoms(),
                });
            }
        }

        colog_info!("Selection '{}' contains {} atoms.", &self.selection, global.len());

        // domains are analyzed over the full (unbounded) trajectory
        let segments = self
            .domains
            .iter()
            .map(|domain| self.analyze_domain(system, &trajectory, &reference, domain))
            .collect::<Result<Vec<DomainSegment>, AnalysisError>>()?;

        if self.superpose {
            global_trajectory.superpose(&global_reference)?;
        }

        let n_frames = global_trajectory.n_frames();
        let range = self.bounds.range(n_frames);
        if range.is_empty() {
            return Err(AnalysisError::NoFrames {
                start: self.bounds.start.unwrap_or(0),
                stop: self.bounds.stop.unwrap_or(n_frames),
                n_frames,
            });
        }

        let bounded = global_trajectory.frames_slice(self.bounds);
        colog_info!(
            "Calculating RMSF of the whole selection over frames {} to {}.",
            range.start,
            range.end
        );
        let whole = rmsf(&bounded, &global_reference, self.center)?;

        let domain_rmsf = if segments.is_empty() {
            None
        } else {
            let mut stitcher = DomainStitcher::new(&self.selection, whole.len());
            for segment in segments.iter() {
                stitcher.push(segment.values())?;
            }
            Some(stitcher.finish()?)
        };

        let rmsd = rmsd_groups
            .into_iter()
            .map(|(name, query, indices)| {
                self.rmsd_group(name, query, &indices, &trajectory, &reference)
            })
            .collect::<Result<Vec<RmsdSeries>, AnalysisError>>()?;

        let gyration = if self.gyration {
            Some(gyration_series(&bounded))
        } else {
            None
        };

        Ok(DomainRmsfResults {
            selection: self.selection.clone(),
            center: self.center,
            rmsf: whole,
            domain_rmsf,
            times: bounded.times(),
            frame_numbers: bounded.frame_numbers(),
            residue_numbers: system.residue_numbers(&global),
            segments,
            rmsd,
            gyration,
        })
    }

    /// Make the atoms with the given indices whole in the reference and in every frame of the trajectory.
    fn make_whole(
        trajectory: &Trajectory,
        reference: &Frame,
        indices: &[usize],
    ) -> (Trajectory, Frame) {
        let mut reference = reference.clone();
        reference.make_whole(indices, None);

        let mut trajectory = trajectory.clone();
        let n_whole = trajectory.make_whole(indices, &reference);
        if n_whole < trajectory.n_frames() {
            colog_warn!(
                "{} of {} frames have no simulation box. Periodic boundary conditions are not removed in these frames.",
                trajectory.n_frames() - n_whole,
                trajectory.n_frames()
            );
        } else {
            colog_info!("Made {} atoms whole in {} frames.", indices.len(), n_whole);
        }

        (trajectory, reference)
    }

    /// Calculate RMSD of a named group of atoms over the bounded frames.
    fn rmsd_group(
        &self,
        name: &str,
        query: &str,
        indices: &[usize],
        trajectory: &Trajectory,
        reference: &Frame,
    ) -> Result<RmsdSeries, AnalysisError> {
        let group_trajectory = trajectory.atom_slice(indices).frames_slice(self.bounds);
        let group_reference = match self.rmsd_reference {
            RmsdReference::Structure => reference.slice(indices),
            RmsdReference::FirstFrame => match group_trajectory.get_frames().first() {
                Some(frame) => frame.clone(),
                None => {
                    return Err(AnalysisError::NoFrames {
                        start: self.bounds.start.unwrap_or(0),
                        stop: self.bounds.stop.unwrap_or(trajectory.n_frames()),
                        n_frames: trajectory.n_frames(),
                    })
                }
            },
        };

        if group_trajectory.n_atoms() != group_reference.get_n_atoms() {
            return Err(AnalysisError::ShapeMismatch {
                selection: query.to_string(),
                trajectory: group_trajectory.n_atoms(),
                reference: group_reference.get_n_atoms(),
            });
        }

        colog_info!("Calculating RMSD of group '{}' ({} atoms).", name, indices.len());

        Ok(RmsdSeries {
            name: name.to_string(),
            query: query.to_string(),
            values: rmsd_series(&group_trajectory, &group_reference, true)?,
        })
    }

    /// Superpose the atoms of a single domain and calculate their fluctuation.
    fn analyze_domain(
        &self,
        system: &System,
        trajectory: &Trajectory,
        reference: &Frame,
        domain: &str,
    ) -> Result<DomainSegment, AnalysisError> {
        let query = format!("({}) and ({})", self.selection, domain);
        let indices = select_atoms(system, &query)?;

        let mut domain_trajectory = trajectory.atom_slice(&indices);
        let domain_reference = reference.slice(&indices);
        if domain_trajectory.n_atoms() != domain_reference.get_n_atoms() {
            return Err(AnalysisError::ShapeMismatch {
                selection: query,
                trajectory: domain_trajectory.n_atoms(),
                reference: domain_reference.get_n_atoms(),
            });
        }

        domain_trajectory.superpose(&domain_reference)?;
        let values = rmsf(&domain_trajectory, &domain_reference, self.center)?;

        colog_info!("Domain '{}' contains {} atoms.", domain, indices.len());

        Ok(DomainSegment {
            query,
            n_atoms: indices.len(),
            values,
        })
    }
}

/// Accumulates per-domain fluctuation vectors into a single vector
/// with one value per atom of the global selection.
#[derive(Debug, Clone)]
pub struct DomainStitcher {
    selection: String,
    buffer: Vec<f32>,
    cursor: usize,
}

impl DomainStitcher {
    /// Create a stitcher for a global selection containing `n_atoms` atoms.
    pub fn new(selection: &str, n_atoms: usize) -> Self {
        DomainStitcher {
            selection: selection.to_string(),
            buffer: vec![0.0; n_atoms],
            cursor: 0,
        }
    }

    /// Append the values of the next domain.
    ///
    /// ## Returns
    /// `AnalysisError::Integrity` if the values do not fit into the remaining space.
    /// In such case, nothing is written.
    pub fn push(&mut self, values: &[f32]) -> Result<(), AnalysisError> {
        let end = self.cursor + values.len();
        if end > self.buffer.len() {
            return Err(AnalysisError::Integrity {
                selection: self.selection.clone(),
                expected: self.buffer.len(),
                covered: end,
            });
        }

        self.buffer[self.cursor..end].copy_from_slice(values);
        self.cursor = end;
        Ok(())
    }

    /// Number of values written so far.
    pub fn covered(&self) -> usize {
        self.cursor
    }

    /// Finish stitching.
    ///
    /// ## Returns
    /// `AnalysisError::Integrity` if the domains did not cover the whole selection.
    pub fn finish(self) -> Result<Vec<f32>, AnalysisError> {
        if self.cursor != self.buffer.len() {
            return Err(AnalysisError::Integrity {
                selection: self.selection,
                expected: self.buffer.len(),
                covered: self.cursor,
            });
        }

        Ok(self.buffer)
    }
}

/// Fluctuation of the atoms of a single domain.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct DomainSegment {
    /// Combined query `(global) and (domain)` selecting the atoms of the domain.
    #[getset(get = "pub")]
    query: String,
    #[getset(get_copy = "pub")]
    n_atoms: usize,
    /// RMSF (in Å) of the atoms of the domain.
    #[getset(get = "pub")]
    values: Vec<f32>,
}

/// RMSD time series of a named group of atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct RmsdSeries {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    query: String,
    /// RMSD (in Å) of every bounded frame from the reference.
    #[getset(get = "pub")]
    values: Vec<f32>,
}

/// Results of the domain-resolved RMSF analysis. All fluctuations are in Å.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct DomainRmsfResults {
    #[getset(get = "pub")]
    selection: String,
    #[getset(get_copy = "pub")]
    center: FluctuationCenter,
    /// RMSF of the whole selection over the bounded frames.
    #[getset(get = "pub")]
    rmsf: Vec<f32>,
    /// Per-domain RMSF stitched in declaration order. `None` if no domains were declared.
    #[getset(get = "pub")]
    domain_rmsf: Option<Vec<f32>>,
    /// Simulation times (in ps) of the bounded frames.
    #[getset(get = "pub")]
    times: Vec<f32>,
    /// Indices of the bounded frames in their source trajectory files.
    #[getset(get = "pub")]
    frame_numbers: Vec<usize>,
    /// Residue numbers of the selected atoms.
    #[getset(get = "pub")]
    residue_numbers: Vec<usize>,
    #[getset(get = "pub")]
    segments: Vec<DomainSegment>,
    /// RMSD time series of the requested groups, in the order they were requested.
    #[getset(get = "pub")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rmsd: Vec<RmsdSeries>,
    /// Radius of gyration (in Å) in every bounded frame. (Optional.)
    #[getset(get = "pub")]
    #[serde(skip_serializing_if = "Option::is_none")]
    gyration: Option<Vec<f32>>,
}

/******************************/
/*         UNIT TESTS         */
/******************************/
