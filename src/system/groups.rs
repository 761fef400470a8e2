// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of System methods for working with groups.

use crate::errors::GroupError;
use crate::structures::group::Group;
use crate::system::System;

/// Characters that can not be part of a group name as they have a special meaning in selection queries.
const FORBIDDEN_CHARACTERS: &[char] = &['\'', '"', '&', '|', '!', '@', '(', ')', '<', '>', '='];

/// Check that the group name is not empty and contains no special characters.
pub(crate) fn name_is_valid(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(FORBIDDEN_CHARACTERS)
}

/// ## Methods for working with groups of atoms.
impl System {
    /// Make a group with a given name from the given VMD-like selection language query.
    ///
    /// ## Returns
    /// - `Ok` if the group was successfully created.
    /// - `GroupError::AlreadyExists` if a group with the same name already exists (no group created).
    /// - `GroupError::InvalidName` if the name of the group is invalid (no group created).
    /// - `GroupError::InvalidQuery` if the query could not be parsed or applied.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let mut system = System::from_file("system.gro").unwrap();
    ///
    /// if let Err(e) = system.group_create("Calpha", "@protein and name CA") {
    ///     eprintln!("{}", e);
    ///     return;
    /// }
    /// ```
    ///
    /// ## Notes
    /// - The following characters are not allowed in group names: '"&|!@()<>=
    /// - The group will be created even if the query selects no atoms.
    pub fn group_create(&mut self, name: &str, query: &str) -> Result<(), GroupError> {
        if !name_is_valid(name) {
            return Err(GroupError::InvalidName(name.to_string()));
        }

        if self.group_exists(name) {
            return Err(GroupError::AlreadyExists(name.to_string()));
        }

        let group = Group::from_query(query, self).map_err(GroupError::InvalidQuery)?;
        self.get_groups_as_mut().insert(name.to_string(), group);

        Ok(())
    }

    /// Make a group with a given name from the provided atom indices.
    /// Indices that do not correspond to any atom in the system are ignored.
    ///
    /// ## Returns
    /// Same as [`System::group_create`].
    pub fn group_create_from_indices(
        &mut self,
        name: &str,
        atom_indices: Vec<usize>,
    ) -> Result<(), GroupError> {
        if !name_is_valid(name) {
            return Err(GroupError::InvalidName(name.to_string()));
        }

        if self.group_exists(name) {
            return Err(GroupError::AlreadyExists(name.to_string()));
        }

        let group = Group::from_indices(atom_indices, self.get_n_atoms());
        self.get_groups_as_mut().insert(name.to_string(), group);

        Ok(())
    }

    /// Check whether a group with a given name exists in the system.
    pub fn group_exists(&self, name: &str) -> bool {
        self.get_groups_as_ref().contains_key(name)
    }

    /// Check whether the target group contains the atom of target index.
    ///
    /// ## Returns
    /// `true` or `false` if the atom is part of the group or not, respectively.
    /// `GroupError::NotFound` if the group does not exist.
    pub fn group_isin(&self, name: &str, index: usize) -> Result<bool, GroupError> {
        let group = self
            .get_groups_as_ref()
            .get(name)
            .ok_or(GroupError::NotFound(name.to_string()))?;

        Ok(group.isin(index))
    }

    /// Get the number of atoms in target group.
    pub fn group_get_n_atoms(&self, name: &str) -> Result<usize, GroupError> {
        let group = self
            .get_groups_as_ref()
            .get(name)
            .ok_or(GroupError::NotFound(name.to_string()))?;

        Ok(group.get_n_atoms())
    }

    /// Get the names of all groups in the system in the order of their creation.
    pub fn group_names(&self) -> Vec<String> {
        self.get_groups_as_ref().keys().cloned().collect()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SelectError;
    use crate::test_utilities::utilities::peptide_system;

    #[test]
    fn group_create() {
        let mut system = peptide_system();
        system.group_create("Calpha", "name CA").unwrap();

        assert!(system.group_exists("Calpha"));
        assert_eq!(system.group_get_n_atoms("Calpha").unwrap(), 3);
        assert!(system.group_isin("Calpha", 5).unwrap());
        assert!(!system.group_isin("Calpha", 6).unwrap());
        assert_eq!(system.group_names(), vec!["all", "All", "Calpha"]);

        // groups can be used in further queries
        assert_eq!(
            system.select_indices("Calpha and chain B").unwrap(),
            vec![9]
        );
        assert_eq!(
            system.select_indices("group r'^Cal'").unwrap(),
            vec![1, 5, 9]
        );
    }

    #[test]
    fn group_create_invalid_name() {
        let mut system = peptide_system();
        for name in ["", "Res&Name", "group(1)", "  "] {
            assert_eq!(
                system.group_create(name, "name CA"),
                Err(GroupError::InvalidName(name.to_string()))
            );
        }
    }

    #[test]
    fn group_create_duplicate() {
        let mut system = peptide_system();
        assert_eq!(
            system.group_create("all", "name CA"),
            Err(GroupError::AlreadyExists("all".to_string()))
        );
        assert_eq!(system.group_get_n_atoms("all").unwrap(), 12);
    }

    #[test]
    fn group_create_invalid_query() {
        let mut system = peptide_system();
        assert_eq!(
            system.group_create("Broken", "resid 1 &"),
            Err(GroupError::InvalidQuery(SelectError::InvalidOperator(
                "resid 1 &".to_string()
            )))
        );
        assert!(!system.group_exists("Broken"));
    }

    #[test]
    fn group_create_from_indices() {
        let mut system = peptide_system();
        system
            .group_create_from_indices("Custom", vec![7, 3, 3, 100])
            .unwrap();
        assert_eq!(system.group_get_n_atoms("Custom").unwrap(), 2);
    }

    #[test]
    fn group_not_found() {
        let system = peptide_system();
        assert_eq!(
            system.group_isin("Protein", 0),
            Err(GroupError::NotFound("Protein".to_string()))
        );
    }
}
