// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Group structure and its methods.

use crate::errors::SelectError;
use crate::select::Select;
use crate::system::System;

/******************************/
/*       GROUP STRUCTURE      */
/******************************/

/// Group of atoms in target system.
/// Atom indices are always sorted in ascending order and unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    atoms: Vec<usize>,
}

impl Group {
    /// Get the indices of atoms in the group.
    pub fn get_atoms(&self) -> &[usize] {
        &self.atoms
    }

    /// Create a new valid `Group` structure from query in VMD-like selection language.
    pub fn from_query(query: &str, system: &System) -> Result<Self, SelectError> {
        // parse selection language query into binary selection tree
        let select = Select::parse_query(query)?;
        // apply the selection tree to the system
        Group::from_select(*select, system)
    }

    /// Create a new valid Group structure from atom indices.
    ///
    /// ## Parameters
    /// Expects a vector of atom indices and the total number of atoms in the system.
    /// Duplicate indices are removed and indices not smaller than `n_atoms` are ignored.
    pub fn from_indices(mut atom_indices: Vec<usize>, n_atoms: usize) -> Self {
        atom_indices.retain(|&i| i < n_atoms);
        atom_indices.sort_unstable();
        atom_indices.dedup();

        Group {
            atoms: atom_indices,
        }
    }

    /// Create a new valid Group structure containing all atoms of a system with `n_atoms` atoms.
    pub fn all(n_atoms: usize) -> Self {
        Group {
            atoms: (0..n_atoms).collect(),
        }
    }

    /// Create a new valid Group structure using Select tree.
    pub(crate) fn from_select(select: Select, system: &System) -> Result<Self, SelectError> {
        // expand regex group names
        let select = select.expand_regex_group(system)?;

        let mut indices = Vec::new();
        for i in 0..system.get_n_atoms() {
            if Group::matches_select(i, &select, system)? {
                indices.push(i);
            }
        }

        Ok(Group { atoms: indices })
    }

    /// Check whether properties of target atom match conditions prescribed by target Select tree.
    pub(crate) fn matches_select(
        atom_index: usize,
        select: &Select,
        system: &System,
    ) -> Result<bool, SelectError> {
        let atom = &system.get_atoms_as_ref()[atom_index];

        match select {
            Select::ResidueName(names) => Ok(names
                .iter()
                .any(|name| name == atom.get_residue_name())),

            Select::AtomName(names) => Ok(names.iter().any(|name| name == atom.get_atom_name())),

            Select::ResidueNumber(numbers) => {
                let resnum = atom.get_residue_number();
                Ok(numbers
                    .iter()
                    .any(|&(start, end)| resnum >= start && resnum <= end))
            }

            Select::ResidueIndex(numbers) => {
                let resindex = atom.get_residue_index();
                Ok(numbers
                    .iter()
                    .any(|&(start, end)| resindex >= start && resindex <= end))
            }

            Select::GmxAtomNumber(numbers) => Ok(numbers
                .iter()
                .any(|&(start, end)| atom_index + 1 >= start && atom_index < end)),

            Select::AtomNumber(numbers) => {
                let atomnum = atom.get_atom_number();
                Ok(numbers
                    .iter()
                    .any(|&(start, end)| atomnum >= start && atomnum <= end))
            }

            Select::Chain(identifiers) => match atom.get_chain() {
                None => Ok(false),
                Some(chain) => Ok(identifiers.iter().any(|&target| target == chain)),
            },

            Select::GroupName(names) => {
                for name in names.iter() {
                    if name.match_groups(system, atom_index)? {
                        return Ok(true);
                    }
                }

                Ok(false)
            }

            Select::And(left, right) => Ok(Group::matches_select(atom_index, left, system)?
                && Group::matches_select(atom_index, right, system)?),

            Select::Or(left, right) => Ok(Group::matches_select(atom_index, left, system)?
                || Group::matches_select(atom_index, right, system)?),

            Select::Not(operand) => Ok(!Group::matches_select(atom_index, operand, system)?),
        }
    }

    /// Get the number of atoms in the group.
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Check whether the group contains no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Check whether the atom with the given index is part of the group.
    pub fn isin(&self, index: usize) -> bool {
        self.atoms.binary_search(&index).is_ok()
    }
}

/******************************/
/*    UNIT TESTS FOR GROUP    */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices() {
        let indices = vec![11, 1, 2, 3, 20, 5, 0, 5, 4, 18, 6, 19, 1, 13, 20, 27];
        let group = Group::from_indices(indices, 20);

        assert_eq!(group.get_n_atoms(), 11);
        let expected_indices: Vec<usize> = vec![0, 1, 2, 3, 4, 5, 6, 11, 13, 18, 19];
        assert_eq!(group.get_atoms(), expected_indices.as_slice());
    }

    #[test]
    fn from_indices_empty() {
        let group = Group::from_indices(vec![25, 30], 20);
        assert!(group.is_empty());
    }

    #[test]
    fn all() {
        let group = Group::all(5);
        assert_eq!(group.get_atoms(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn isin() {
        let group = Group::from_indices(vec![3, 7, 1, 12], 20);
        assert!(group.isin(1));
        assert!(group.isin(12));
        assert!(!group.isin(0));
        assert!(!group.isin(8));
        assert!(!group.isin(25));
    }
}
