// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading tpr files.

use std::path::Path;

use crate::{
    errors::ParseTprError,
    structures::{atom::Atom, simbox::SimBox, vector3d::Vector3D},
    system::System,
};

/// Read topology from a tpr file. Construct a system.
///
/// ## Notes
/// - Does not create groups apart from the default `all` and `All`.
/// - The atoms and residues in the tpr file are numbered sequentially,
///   no matter their original numbering in the gro/pdb file.
/// - Tpr files contain no chain identifiers.
pub fn read_tpr(filename: impl AsRef<Path>) -> Result<System, ParseTprError> {
    let tpr = match minitpr::TprFile::parse(filename) {
        Ok(x) => x,
        Err(e) => return Err(ParseTprError::CouldNotRead(format!("{}", e))),
    };

    let atoms: Vec<Atom> = tpr.topology.atoms.into_iter().map(Into::into).collect();
    let simbox = tpr
        .simbox
        .map(SimBox::from)
        .filter(|simbox| !simbox.is_zero());

    Ok(System::new(&tpr.system_name, atoms, simbox))
}

impl From<minitpr::Atom> for Atom {
    /// Convert `Atom` from `minitpr` crate to native `flexan` Atom.
    fn from(value: minitpr::Atom) -> Self {
        let atom = Self::new(
            value.residue_number as usize,
            &value.residue_name,
            value.atom_number as usize,
            &value.atom_name,
        );

        match value.position {
            Some(pos) => atom.with_position(Vector3D::new(
                pos[0] as f32,
                pos[1] as f32,
                pos[2] as f32,
            )),
            None => atom,
        }
    }
}

impl From<minitpr::SimBox> for SimBox {
    /// Convert SimBox from `minitpr` crate to native `flexan` Simbox.
    fn from(value: minitpr::SimBox) -> Self {
        Self::from([
            value.simbox[0][0] as f32,
            value.simbox[1][1] as f32,
            value.simbox[2][2] as f32,
            value.simbox[0][1] as f32,
            value.simbox[0][2] as f32,
            value.simbox[1][0] as f32,
            value.simbox[1][2] as f32,
            value.simbox[2][0] as f32,
            value.simbox[2][1] as f32,
        ])
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn convert_atoms() {
        let atom1 = minitpr::Atom {
            atom_name: String::from("CA"),
            atom_number: 2,
            residue_name: String::from("SER"),
            residue_number: 1,
            mass: 12.0,
            charge: 0.1,
            element: Some(minitpr::Element::C),
            position: Some([1.497, 2.432, 0.439]),
            velocity: None,
            force: None,
        };

        let atom2 = minitpr::Atom {
            atom_name: String::from("HA"),
            atom_number: 3,
            residue_name: String::from("SER"),
            residue_number: 1,
            mass: 1.0,
            charge: 0.0,
            element: None,
            position: None,
            velocity: Some([-1.424, 0.439, -2.432]),
            force: None,
        };

        let converted1: Atom = atom1.into();
        let converted2: Atom = atom2.into();

        assert_eq!(converted1.get_atom_name(), "CA");
        assert_eq!(converted1.get_atom_number(), 2);
        assert_eq!(converted1.get_residue_name(), "SER");
        assert_eq!(converted1.get_residue_number(), 1);
        let position = converted1.get_position().unwrap();
        assert_approx_eq!(f32, position.x, 1.497);
        assert_approx_eq!(f32, position.y, 2.432);
        assert_approx_eq!(f32, position.z, 0.439);

        assert_eq!(converted2.get_atom_name(), "HA");
        assert!(!converted2.has_position());
        assert!(converted2.get_chain().is_none());
    }

    #[test]
    fn convert_simbox() {
        let simbox = minitpr::SimBox {
            simbox: [[6.0, 0.0, 0.0], [1.0, 5.0, 0.0], [0.5, 0.5, 4.0]],
            simbox_rel: [[0.0; 3]; 3],
            simbox_v: [[0.0; 3]; 3],
        };

        let converted: SimBox = simbox.into();
        assert_approx_eq!(f32, converted.v1x, 6.0);
        assert_approx_eq!(f32, converted.v2y, 5.0);
        assert_approx_eq!(f32, converted.v3z, 4.0);
        assert_approx_eq!(f32, converted.v2x, 1.0);
        assert_approx_eq!(f32, converted.v3x, 0.5);
        assert_approx_eq!(f32, converted.v3y, 0.5);
        assert!(!converted.is_orthogonal());
    }

    #[test]
    fn read_nonexistent() {
        match read_tpr("test_files/nonexistent.tpr") {
            Err(ParseTprError::CouldNotRead(_)) => (),
            _ => panic!("Parsing should fail with CouldNotRead."),
        }
    }
}
