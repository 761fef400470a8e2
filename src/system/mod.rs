// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the System structure and its methods.

use indexmap::IndexMap;
use std::path::Path;

use crate::errors::{ParseFileError, SelectError};
use crate::files::FileType;
use crate::io::{gro_io, pdb_io, tpr_io};
use crate::structures::{atom::Atom, group::Group, simbox::SimBox, vector3d::Vector3D};

mod groups;

pub(crate) use groups::name_is_valid;

#[derive(Debug, Clone)]
pub struct System {
    /// Name of the molecular system.
    name: String,
    /// Vector of atoms in the system.
    atoms: Vec<Atom>,
    /// Size of the simulation box. (Optional.)
    simulation_box: Option<SimBox>,
    /// Groups of atoms associated with the system.
    groups: IndexMap<String, Group>,
}

/// ## Methods for creating `System` structures and accessing their properties.
impl System {
    /// Create new System structure with a given name from the provided vector of atoms and simulation box.
    ///
    /// ## Notes
    /// - The returned `System` structure will contain two default groups "all" and "All",
    ///   each consisting of all the atoms in the system.
    /// - Residue indices of the atoms are assigned in order of appearance, starting from 0.
    ///   A new residue starts whenever the residue number, residue name, or chain changes.
    ///
    /// ## Example
    /// ```
    /// # use flexan::prelude::*;
    /// #
    /// let atoms = vec![
    ///     Atom::new(1, "ALA", 1, "N"),
    ///     Atom::new(1, "ALA", 2, "CA"),
    ///     Atom::new(2, "GLY", 3, "N"),
    /// ];
    ///
    /// let system = System::new("Peptide", atoms, Some(SimBox::from([5.0, 5.0, 5.0])));
    /// assert_eq!(system.get_n_atoms(), 3);
    /// assert!(system.group_exists("all"));
    /// assert_eq!(system.get_atoms_as_ref()[2].get_residue_index(), 1);
    /// ```
    pub fn new(name: &str, mut atoms: Vec<Atom>, simulation_box: Option<SimBox>) -> Self {
        assign_residue_indices(&mut atoms);

        let n_atoms = atoms.len();
        let mut groups = IndexMap::new();
        groups.insert("all".to_string(), Group::all(n_atoms));
        groups.insert("All".to_string(), Group::all(n_atoms));

        System {
            name: name.to_string(),
            atoms,
            simulation_box,
            groups,
        }
    }

    /// Create a new System by reading a gro, pdb, or tpr file.
    /// The file format is recognized from the file extension.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let system = match System::from_file("system.gro") {
    ///     Ok(x) => x,
    ///     Err(e) => {
    ///         eprintln!("{}", e);
    ///         return;
    ///     }
    /// };
    /// ```
    ///
    /// ## Notes
    /// - Positions read from pdb files are converted from Å to nm.
    /// - Only the first model of a multi-model pdb file is read.
    /// - Groups are not read from tpr files.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ParseFileError> {
        let format = FileType::from_name(&filename);
        Self::from_file_with_format(filename, format)
    }

    /// Create a new System by reading a file with the specified format.
    /// Same as [`System::from_file`], but no automatic recognition of the file type is performed.
    pub fn from_file_with_format(
        filename: impl AsRef<Path>,
        filetype: FileType,
    ) -> Result<Self, ParseFileError> {
        match filetype {
            FileType::GRO => Ok(gro_io::read_gro(filename)?),
            FileType::PDB => Ok(pdb_io::read_pdb(filename)?),
            FileType::TPR => Ok(tpr_io::read_tpr(filename)?),
            _ => Err(ParseFileError::UnknownExtension(Box::from(
                filename.as_ref(),
            ))),
        }
    }

    /// Get the name of the molecular system.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Get immutable reference to the atoms in the system.
    pub fn get_atoms_as_ref(&self) -> &[Atom] {
        &self.atoms
    }

    /// Get immutable reference to the groups in the system.
    pub fn get_groups_as_ref(&self) -> &IndexMap<String, Group> {
        &self.groups
    }

    pub(crate) fn get_groups_as_mut(&mut self) -> &mut IndexMap<String, Group> {
        &mut self.groups
    }

    /// Get immutable reference to the simulation box.
    pub fn get_box_as_ref(&self) -> Option<&SimBox> {
        self.simulation_box.as_ref()
    }

    /// Check whether the system has a simulation box.
    pub fn has_box(&self) -> bool {
        self.simulation_box.is_some()
    }

    /// Get the number of atoms in the system.
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Get the number of groups in the system.
    pub fn get_n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Check whether all atoms of the system have positions.
    pub fn has_positions(&self) -> bool {
        self.atoms.iter().all(|atom| atom.has_position())
    }

    /// Get indices of atoms selected by a query in VMD-like selection language.
    /// The indices are returned in ascending order, i.e. in the order in which
    /// the atoms appear in the system.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let system = System::from_file("protein.pdb").unwrap();
    /// let calphas = system.select_indices("@protein and name CA").unwrap();
    /// ```
    pub fn select_indices(&self, query: &str) -> Result<Vec<usize>, SelectError> {
        let group = Group::from_query(query, self)?;
        Ok(group.get_atoms().to_vec())
    }

    /// Get positions of atoms with the specified indices.
    ///
    /// ## Returns
    /// `None` if any of the atoms does not exist or has no position.
    pub fn get_positions(&self, indices: &[usize]) -> Option<Vec<Vector3D>> {
        indices
            .iter()
            .map(|&i| self.atoms.get(i).and_then(|atom| atom.get_position().copied()))
            .collect()
    }

    /// Get residue numbers of atoms with the specified indices.
    /// Indices that do not correspond to any atom are skipped.
    pub fn residue_numbers(&self, indices: &[usize]) -> Vec<usize> {
        indices
            .iter()
            .filter_map(|&i| self.atoms.get(i).map(|atom| atom.get_residue_number()))
            .collect()
    }

    /// Apply a transformation to the positions of all atoms that have a position.
    /// Atoms without positions are skipped.
    pub(crate) fn transform_positions(&mut self, transform: impl FnOnce(&mut [Vector3D])) {
        let mut positions: Vec<Vector3D> = self
            .atoms
            .iter()
            .filter_map(|atom| atom.get_position().copied())
            .collect();

        transform(&mut positions);

        let mut transformed = positions.into_iter();
        for atom in self.atoms.iter_mut().filter(|atom| atom.has_position()) {
            if let Some(position) = transformed.next() {
                atom.set_position(position);
            }
        }
    }
}

/// Assign residue indices to atoms in order of appearance.
fn assign_residue_indices(atoms: &mut [Atom]) {
    let mut index = 0;
    for i in 0..atoms.len() {
        if i > 0 && !atoms[i].same_residue(&atoms[i - 1]) {
            index += 1;
        }
        atoms[i].set_residue_index(index);
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
