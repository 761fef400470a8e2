// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Enum capturing file types supported by `flexan`.

use std::path::Path;

/// Types of files supported by `flexan`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FileType {
    Unknown,
    GRO,
    PDB,
    TPR,
    XTC,
    DCD,
    NDX,
}

impl FileType {
    /// Identify file type from the name of the file (based on file extension).
    pub fn from_name(filename: impl AsRef<Path>) -> FileType {
        let extension = match filename.as_ref().extension() {
            Some(x) => x,
            None => return FileType::Unknown,
        };

        match extension.to_str() {
            Some("gro") => FileType::GRO,
            Some("pdb") => FileType::PDB,
            Some("tpr") => FileType::TPR,
            Some("xtc") => FileType::XTC,
            Some("dcd") => FileType::DCD,
            Some("ndx") => FileType::NDX,
            Some(_) | None => FileType::Unknown,
        }
    }

    /// Can a file of this type be used as a structure (topology) file?
    pub fn is_structure(&self) -> bool {
        matches!(self, FileType::GRO | FileType::PDB | FileType::TPR)
    }

    /// Can a file of this type be read as a trajectory?
    pub fn is_trajectory(&self) -> bool {
        matches!(
            self,
            FileType::GRO | FileType::PDB | FileType::XTC | FileType::DCD
        )
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_gro() {
        assert_eq!(FileType::from_name("file.gro"), FileType::GRO);
    }

    #[test]
    fn identify_pdb() {
        assert_eq!(FileType::from_name("file.pdb"), FileType::PDB);
    }

    #[test]
    fn identify_tpr() {
        assert_eq!(FileType::from_name("file.tpr"), FileType::TPR);
    }

    #[test]
    fn identify_xtc() {
        assert_eq!(FileType::from_name("file.xtc"), FileType::XTC);
    }

    #[test]
    fn identify_dcd() {
        assert_eq!(FileType::from_name("50_frame.dcd"), FileType::DCD);
    }

    #[test]
    fn identify_ndx() {
        assert_eq!(FileType::from_name("file.ndx"), FileType::NDX);
    }

    #[test]
    fn identify_unknown() {
        assert_eq!(FileType::from_name("file.txt"), FileType::Unknown);
    }

    #[test]
    fn identify_noextension() {
        assert_eq!(FileType::from_name("file"), FileType::Unknown);
    }

    #[test]
    fn structure_and_trajectory() {
        assert!(FileType::GRO.is_structure());
        assert!(FileType::GRO.is_trajectory());
        assert!(FileType::TPR.is_structure());
        assert!(!FileType::TPR.is_trajectory());
        assert!(!FileType::DCD.is_structure());
        assert!(FileType::DCD.is_trajectory());
        assert!(!FileType::NDX.is_structure());
    }
}
