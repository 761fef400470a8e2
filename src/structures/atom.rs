// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the Atom structure and its methods.

use crate::structures::vector3d::Vector3D;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Number of the residue as provided in the structure file.
    residue_number: usize,
    /// Name of the residue.
    residue_name: String,
    /// Index of the residue in the system, counting from 0 in order of appearance.
    /// Assigned by `System::new`.
    residue_index: usize,
    /// Number of the atom as provided in the structure file.
    atom_number: usize,
    /// Name of the atom.
    atom_name: String,
    /// Chain identifier. (Optional.)
    chain: Option<char>,
    /// Position of the atom in nm. (Optional.)
    position: Option<Vector3D>,
}

impl Atom {
    /// Create new Atom structure with the specified properties.
    ///
    /// ## Notes
    /// - By default, `Atom` is constructed with no chain and no position.
    ///   Use `Atom::with_chain` and `Atom::with_position` to provide them.
    pub fn new(
        residue_number: usize,
        residue_name: &str,
        atom_number: usize,
        atom_name: &str,
    ) -> Self {
        Atom {
            residue_number,
            residue_name: residue_name.to_string(),
            residue_index: 0,
            atom_number,
            atom_name: atom_name.to_string(),
            chain: None,
            position: None,
        }
    }

    /// Add chain information to target atom.
    ///
    /// ## Example
    /// ```
    /// use flexan::prelude::*;
    /// let atom = Atom::new(1, "LYS", 1, "CA").with_chain('A');
    ///
    /// assert_eq!(atom.get_chain().unwrap(), 'A');
    /// ```
    pub fn with_chain(mut self, chain: char) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Add position to target atom.
    pub fn with_position(mut self, position: Vector3D) -> Self {
        self.position = Some(position);
        self
    }

    /// Get the number of the residue to which the atom belongs.
    pub fn get_residue_number(&self) -> usize {
        self.residue_number
    }

    /// Get the name of the residue to which the atom belongs.
    pub fn get_residue_name(&self) -> &str {
        &self.residue_name
    }

    /// Get the index of the residue to which the atom belongs.
    pub fn get_residue_index(&self) -> usize {
        self.residue_index
    }

    pub(crate) fn set_residue_index(&mut self, index: usize) {
        self.residue_index = index;
    }

    /// Get the number of the atom as presented in the structure file.
    pub fn get_atom_number(&self) -> usize {
        self.atom_number
    }

    /// Get the name of the atom.
    pub fn get_atom_name(&self) -> &str {
        &self.atom_name
    }

    /// Get the chain this atom is part of.
    pub fn get_chain(&self) -> Option<char> {
        self.chain
    }

    /// Get the coordinates of the atom.
    pub fn get_position(&self) -> Option<&Vector3D> {
        self.position.as_ref()
    }

    /// Set the coordinates of the atom.
    pub fn set_position(&mut self, pos: Vector3D) {
        self.position = Some(pos);
    }

    /// Check whether the atom has a position.
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Check whether this atom belongs to the same residue as `other`.
    /// Residues are distinguished by their number, name, and chain.
    pub(crate) fn same_residue(&self, other: &Atom) -> bool {
        self.residue_number == other.residue_number
            && self.residue_name == other.residue_name
            && self.chain == other.chain
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let atom = Atom::new(45, "GLY", 123, "CA");
        assert_eq!(atom.get_residue_number(), 45);
        assert_eq!(atom.get_residue_name(), "GLY");
        assert_eq!(atom.get_atom_number(), 123);
        assert_eq!(atom.get_atom_name(), "CA");
        assert_eq!(atom.get_chain(), None);
        assert!(!atom.has_position());
    }

    #[test]
    fn with_position() {
        let atom = Atom::new(1, "ALA", 1, "N").with_position(Vector3D::new(1.0, 2.0, 3.0));
        assert_eq!(atom.get_position().unwrap(), &Vector3D::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn same_residue() {
        let atom1 = Atom::new(1, "ALA", 1, "N").with_chain('A');
        let atom2 = Atom::new(1, "ALA", 2, "CA").with_chain('A');
        let atom3 = Atom::new(1, "ALA", 3, "N").with_chain('B');
        let atom4 = Atom::new(2, "ALA", 4, "N").with_chain('A');

        assert!(atom1.same_residue(&atom2));
        assert!(!atom1.same_residue(&atom3));
        assert!(!atom1.same_residue(&atom4));
    }
}
