// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! # flexan: Flexibility Analysis of Molecular Dynamics Trajectories
//!
//! Rust library and command line tool for analyzing the flexibility of proteins
//! in molecular dynamics simulations.
//!
//! ## Features
//! - reading structures from gro, pdb, and tpr files
//! - reading trajectories from xtc, dcd, gro, and pdb files; joining multiple trajectories
//! - selecting atoms using a VMD-like selection language and ndx groups
//! - optimal superposition of structures (Kabsch algorithm)
//! - removal of periodic boundary conditions (making the analyzed atoms whole)
//! - RMSD time series of named groups of atoms and radius of gyration time series
//! - RMSF around the average or the reference structure
//! - **domain-resolved RMSF**: every domain of a protein superposed separately
//!   and the per-domain fluctuations stitched together
//! - writing results into xvg and yaml files
//!
//! ## Units
//! Positions are internally stored in nm (pdb and dcd files are converted on reading).
//! RMSD, RMSF, and radius of gyration are reported in Å.
//!
//! ## Usage
//!
//! #### Domain-resolved RMSF
//!
//! ```no_run
//! use flexan::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let results = DomainRmsf::new("system.gro", ["md1.xtc", "md2.xtc"], "@protein and name CA")
//!         // ndx groups can be used in all queries
//!         .with_ndx("index.ndx")
//!         // every domain is intersected with the global selection
//!         .with_domains(["Domain_N", "Domain_C"])
//!         // read only every 10th frame
//!         .with_stride(10)
//!         // whole-selection RMSF is calculated from the (strided) frame 100 on
//!         .with_bounds(FrameBounds::new(Some(100), None))
//!         .run()?;
//!
//!     results.write_rmsf_xvg("rmsf.xvg", false)?;
//!     results.write_yaml("rmsf.yaml", false)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Working with trajectories directly
//!
//! ```no_run
//! use flexan::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let system = System::from_file("protein.pdb")?;
//!     let backbone = system.select_indices("@backbone")?;
//!
//!     let mut trajectory = Trajectory::load("md.dcd", system.get_n_atoms(), 1)?
//!         .atom_slice(&backbone);
//!     let reference = Frame::from_system(&system)?.slice(&backbone);
//!
//!     trajectory.superpose(&reference)?;
//!     let fluctuation = rmsf(&trajectory, &reference, FluctuationCenter::Average)?;
//!     let radius = gyration_series(&trajectory);
//!
//!     println!("{:?}\n{:?}", fluctuation, radius);
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//! Errors are described by enums in the `errors` module. All failures of the domain-resolved RMSF
//! analysis are reported as [`AnalysisError`](crate::errors::AnalysisError).
//!
//! ## License
//! This library is released under the MIT License.

/// Version of the `flexan` crate.
pub const FLEXAN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Message that should be added to every panic.
pub(crate) const PANIC_MESSAGE: &str =
    "\n\n\n            >>> THIS SHOULD NOT HAVE HAPPENED! PLEASE REPORT THIS ERROR <<<
(open an issue at 'github.com/Ladme/flexan/issues' or write an e-mail to 'ladmeb@gmail.com')\n\n";

/// Log colored info message.
#[macro_export]
macro_rules! colog_info {
    ($msg:expr) => {
        log::info!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::info!($msg, $( $arg.to_string().cyan() ),+)
    }};
}

/// Log colored warning message.
#[macro_export]
macro_rules! colog_warn {
    ($msg:expr) => {
        log::warn!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::warn!($msg, $( $arg.to_string().yellow() ),+)
    }};
}

pub mod analysis;
pub mod errors;
pub mod files;
pub mod input;
pub mod io;
pub mod presentation;
pub mod progress;
pub mod select;
pub mod structures;
pub mod system;
mod test_utilities;
pub mod trajectory;

/// Reexported basic `flexan` structures, traits, and functions.
pub mod prelude {
    pub use crate::analysis::domain::{
        DomainRmsf, DomainRmsfResults, DomainSegment, DomainStitcher, RmsdSeries,
    };
    pub use crate::analysis::gyration::{gyration_series, radius_of_gyration};
    pub use crate::analysis::rmsd::{
        kabsch, rmsd_nofit, rmsd_series, superpose_positions, RmsdReference,
    };
    pub use crate::analysis::rmsf::{rmsf, FluctuationCenter};
    pub use crate::analysis::NM_TO_ANGSTROM;
    pub use crate::errors::*;
    pub use crate::files::FileType;
    pub use crate::input::Config;
    pub use crate::io::traj_io::{open_trajectory, TrajRead, TrajReader};
    pub use crate::presentation::XvgTable;
    pub use crate::progress::{ProgressPrinter, ProgressStatus};
    pub use crate::structures::atom::Atom;
    pub use crate::structures::group::Group;
    pub use crate::structures::simbox::SimBox;
    pub use crate::structures::vector3d::Vector3D;
    pub use crate::system::System;
    pub use crate::trajectory::{Frame, FrameBounds, Trajectory};
}
