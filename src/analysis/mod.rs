// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Structural analyses of trajectories: superposition, RMSD, RMSF, radius of gyration,
//! and domain-resolved RMSF.

pub mod domain;
pub mod gyration;
pub mod rmsd;
pub mod rmsf;

use crate::errors::AnalysisError;
use crate::system::System;

/// Conversion factor from nanometers (internal unit) to Ångströms (unit of reported results).
pub const NM_TO_ANGSTROM: f32 = 10.0;

/// Select atoms using a query. A query selecting no atoms is an error.
pub(crate) fn select_atoms(system: &System, query: &str) -> Result<Vec<usize>, AnalysisError> {
    let indices = system
        .select_indices(query)
        .map_err(|source| AnalysisError::Selection {
            query: query.to_string(),
            source,
        })?;

    if indices.is_empty() {
        return Err(AnalysisError::EmptySelection(query.to_string()));
    }

    Ok(indices)
}
