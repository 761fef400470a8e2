// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading gro files and gro trajectories.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::errors::{ParseGroError, ReadTrajError};
use crate::io::traj_io::TrajRead;
use crate::structures::{atom::Atom, simbox::SimBox, vector3d::Vector3D};
use crate::system::System;
use crate::trajectory::Frame;

/// Read a gro file and construct a System structure.
///
/// ## Notes
/// - If the gro file contains multiple frames, only the first one is read.
/// - A simulation box consisting only of zeros is treated as no box.
/// - Velocities are ignored.
pub fn read_gro(filename: impl AsRef<Path>) -> Result<System, ParseGroError> {
    let file = match File::open(filename.as_ref()) {
        Ok(x) => x,
        Err(_) => return Err(ParseGroError::FileNotFound(Box::from(filename.as_ref()))),
    };

    let mut buffer = BufReader::new(file);

    // get title and number of atoms
    let title = get_title(&mut buffer, filename.as_ref())?;
    let n_atoms = get_natoms(&mut buffer, filename.as_ref())?;

    let mut atoms: Vec<Atom> = Vec::with_capacity(n_atoms);
    for _ in 0..n_atoms {
        let line = next_line(&mut buffer, filename.as_ref())?;
        atoms.push(line_as_atom(&line)?);
    }

    let line = next_line(&mut buffer, filename.as_ref())?;
    let simulation_box = Some(line_as_box(&line)?).filter(|simbox| !simbox.is_zero());

    Ok(System::new(&title, atoms, simulation_box))
}

/// Read the next line in the provided buffer, without the line terminator.
fn next_line(
    buffer: &mut impl BufRead,
    filename: impl AsRef<Path>,
) -> Result<String, ParseGroError> {
    let mut line = String::new();
    match buffer.read_line(&mut line) {
        Ok(0) | Err(_) => Err(ParseGroError::LineNotFound(Box::from(filename.as_ref()))),
        Ok(_) => Ok(line.trim_end_matches(['\n', '\r']).to_string()),
    }
}

/// Read the next line in the provided buffer and parse it as a title.
fn get_title(
    buffer: &mut impl BufRead,
    filename: impl AsRef<Path>,
) -> Result<String, ParseGroError> {
    next_line(buffer, filename).map(|title| title.trim().to_string())
}

/// Read the next line in the provided buffer and parse it as the number of atoms.
fn get_natoms(
    buffer: &mut impl BufRead,
    filename: impl AsRef<Path>,
) -> Result<usize, ParseGroError> {
    let line = next_line(buffer, filename)?;
    line.trim()
        .parse::<usize>()
        .map_err(|_| ParseGroError::ParseLineErr(line.trim().to_string()))
}

/// Parse the position of an atom from a gro line. Expects a line at least 44 characters long.
fn line_as_position(line: &str) -> Option<Vector3D> {
    let mut position = [0.0; 3];
    for (i, item) in position.iter_mut().enumerate() {
        let curr = 20 + i * 8;
        *item = line.get(curr..curr + 8)?.trim().parse::<f32>().ok()?;
    }

    Some(position.into())
}

/// Parse a line as atom.
fn line_as_atom(line: &str) -> Result<Atom, ParseGroError> {
    if line.len() < 44 || !line.is_ascii() {
        return Err(ParseGroError::ParseAtomLineErr(line.to_string()));
    }

    // parse residue number
    let resid = line[0..5]
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseGroError::ParseAtomLineErr(line.to_string()))?;

    // parse residue name
    let resname = line[5..10].trim().to_string();
    if resname.is_empty() {
        return Err(ParseGroError::ParseAtomLineErr(line.to_string()));
    }

    // parse atom name
    let atomname = line[10..15].trim().to_string();
    if atomname.is_empty() {
        return Err(ParseGroError::ParseAtomLineErr(line.to_string()));
    }

    // parse atom number
    let atomid = line[15..20]
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseGroError::ParseAtomLineErr(line.to_string()))?;

    let position =
        line_as_position(line).ok_or(ParseGroError::ParseAtomLineErr(line.to_string()))?;

    Ok(Atom::new(resid, &resname, atomid, &atomname).with_position(position))
}

/// Parse a line as simulation box dimensions.
fn line_as_box(line: &str) -> Result<SimBox, ParseGroError> {
    let values = line
        .split_whitespace()
        .map(|x| x.parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|_| ParseGroError::ParseBoxLineErr(line.to_string()))?;

    match values.len() {
        3 => Ok(SimBox::from([values[0], values[1], values[2]])),
        9 => {
            let mut array = [0.0; 9];
            array.copy_from_slice(&values);
            Ok(SimBox::from(array))
        }
        _ => Err(ParseGroError::ParseBoxLineErr(line.to_string())),
    }
}

/// Extract simulation time and step from the title of a gro frame.
/// GROMACS writes them as `t= 100.00000 step= 50000`.
fn extract_time_step(string: &str) -> Option<(f32, u64)> {
    let re = Regex::new(r"t=\s*([\d\.\-]+)\s+step=\s*(\d+)").expect(
        "FATAL FLEXAN ERROR | gro_io::extract_time_step | Could not construct regular expression.",
    );

    let caps = re.captures(string)?;
    let time = f32::from_str(caps.get(1)?.as_str()).ok()?;
    let step = u64::from_str(caps.get(2)?.as_str()).ok()?;

    Some((time, step))
}

/******************************/
/*     GRO TRAJECTORY READER  */
/******************************/

/// Reader of gro files containing multiple frames.
///
/// ## Notes
/// - Simulation time and step are read from the title of each frame, if present.
///   Otherwise, the time and step are set to the index of the frame.
/// - Atom names and residues of the individual frames are not checked.
pub struct GroReader {
    buffer: BufReader<File>,
    filename: Box<Path>,
    frame_index: usize,
}

impl GroReader {
    /// Open a gro file for reading frames.
    pub fn new(filename: impl AsRef<Path>) -> Result<GroReader, ReadTrajError> {
        let file = File::open(filename.as_ref())
            .map_err(|_| ReadTrajError::FileNotFound(Box::from(filename.as_ref())))?;

        Ok(GroReader {
            buffer: BufReader::new(file),
            filename: Box::from(filename.as_ref()),
            frame_index: 0,
        })
    }

    /// Read the title and the number of atoms of the next frame.
    /// Returns `None` if the end of the file has been reached.
    fn read_header(&mut self) -> Option<Result<(String, usize), ReadTrajError>> {
        let mut title = String::new();
        match self.buffer.read_line(&mut title) {
            Ok(0) => return None,
            Err(e) => return Some(Err(ReadTrajError::ParseFrame(e.to_string()))),
            Ok(_) => (),
        }

        // trailing empty lines at the end of the file
        if title.trim().is_empty() {
            return None;
        }

        let n_atoms = match get_natoms(&mut self.buffer, &self.filename) {
            Ok(x) => x,
            Err(e) => return Some(Err(ReadTrajError::ParseFrame(e.to_string()))),
        };

        Some(Ok((title.trim().to_string(), n_atoms)))
    }

    fn read_body(&mut self, title: &str, n_atoms: usize) -> Result<Frame, ReadTrajError> {
        let mut positions = Vec::with_capacity(n_atoms);
        for _ in 0..n_atoms {
            let line = next_line(&mut self.buffer, &self.filename)
                .map_err(|e| ReadTrajError::ParseFrame(e.to_string()))?;
            let position = line_as_position(&line)
                .ok_or(ReadTrajError::ParseFrame(format!("invalid atom line `{}`", line)))?;
            positions.push(position);
        }

        let line = next_line(&mut self.buffer, &self.filename)
            .map_err(|e| ReadTrajError::ParseFrame(e.to_string()))?;
        let simbox = line_as_box(&line)
            .map_err(|e| ReadTrajError::ParseFrame(e.to_string()))?;

        let (time, step) = extract_time_step(title)
            .unwrap_or((self.frame_index as f32, self.frame_index as u64));

        Ok(Frame::new(
            positions,
            time,
            step,
            Some(simbox).filter(|s| !s.is_zero()),
        ))
    }
}

impl TrajRead for GroReader {
    fn read_frame(&mut self) -> Option<Result<Frame, ReadTrajError>> {
        let (title, n_atoms) = match self.read_header()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };

        let result = self.read_body(&title, n_atoms);
        self.frame_index += 1;
        Some(result)
    }

    fn skip_frame(&mut self) -> Option<Result<(), ReadTrajError>> {
        let n_atoms = match self.read_header()? {
            Ok((_, n)) => n,
            Err(e) => return Some(Err(e)),
        };

        // atom lines and the box line
        for _ in 0..=n_atoms {
            if let Err(e) = next_line(&mut self.buffer, &self.filename) {
                return Some(Err(ReadTrajError::ParseFrame(e.to_string())));
            }
        }

        self.frame_index += 1;
        Some(Ok(()))
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn read_gro_peptide() {
        let system = read_gro("test_files/peptide.gro").unwrap();

        assert_eq!(system.get_name(), "Tripeptide t=   0.00000 step= 0");
        assert_eq!(system.get_n_atoms(), 12);

        let atoms = system.get_atoms_as_ref();
        assert_eq!(atoms[0].get_residue_name(), "ALA");
        assert_eq!(atoms[0].get_atom_name(), "N");
        assert_eq!(atoms[0].get_atom_number(), 1);
        assert_eq!(atoms[5].get_residue_number(), 2);
        assert_eq!(atoms[5].get_residue_index(), 1);
        assert_eq!(atoms[11].get_residue_name(), "LYS");
        assert_eq!(atoms[11].get_atom_name(), "O");
        assert!(atoms[0].get_chain().is_none());

        let position = atoms[11].get_position().unwrap();
        assert_approx_eq!(f32, position.x, 1.1);
        assert_approx_eq!(f32, position.y, 0.3);
        assert_approx_eq!(f32, position.z, 0.0);

        let simbox = system.get_box_as_ref().unwrap();
        assert_approx_eq!(f32, simbox.v1x, 5.0);
        assert_approx_eq!(f32, simbox.v2y, 5.0);
        assert_approx_eq!(f32, simbox.v3z, 5.0);
    }

    #[test]
    fn read_gro_nonexistent() {
        match read_gro("test_files/nonexistent.gro") {
            Err(ParseGroError::FileNotFound(_)) => (),
            _ => panic!("Parsing should fail with FileNotFound."),
        }
    }

    #[test]
    fn parse_atom_line_short() {
        assert_eq!(
            line_as_atom("    1ALA      N    1"),
            Err(ParseGroError::ParseAtomLineErr(
                "    1ALA      N    1".to_string()
            ))
        );
    }

    #[test]
    fn parse_box_line() {
        let simbox = line_as_box("   6.08608   6.08608   4.30347   0.00000   0.00000   0.00000   0.00000   3.04304   3.04304").unwrap();
        assert_approx_eq!(f32, simbox.v3x, 3.04304);
        assert!(!simbox.is_orthogonal());

        assert!(matches!(
            line_as_box("  6.0 6.0"),
            Err(ParseGroError::ParseBoxLineErr(_))
        ));
        assert!(matches!(
            line_as_box("  6.0 6.0 abc"),
            Err(ParseGroError::ParseBoxLineErr(_))
        ));
    }

    #[test]
    fn time_step_from_title() {
        assert_eq!(
            extract_time_step("Protein in water t= 100.00000 step= 50000"),
            Some((100.0, 50000))
        );
        assert_eq!(extract_time_step("Protein in water"), None);
    }

    #[test]
    fn gro_trajectory() {
        let mut reader = GroReader::new("test_files/peptide_traj.gro").unwrap();

        let frame = reader.read_frame().unwrap().unwrap();
        assert_eq!(frame.get_n_atoms(), 12);
        assert_eq!(frame.get_step(), 0);
        assert_approx_eq!(f32, frame.get_positions()[1].x, 0.1);

        assert!(reader.skip_frame().unwrap().is_ok());

        let frame = reader.read_frame().unwrap().unwrap();
        assert_approx_eq!(f32, frame.get_time(), 20.0);
        assert_eq!(frame.get_step(), 10000);
        assert_approx_eq!(f32, frame.get_positions()[1].x, 0.3);

        assert!(reader.read_frame().is_none());
    }
}
