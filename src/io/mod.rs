// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Reading of structure, trajectory, and index files.

pub mod dcd_io;
pub mod gro_io;
pub mod ndx_io;
pub mod pdb_io;
pub mod tpr_io;
pub mod traj_io;
pub mod xtc_io;
