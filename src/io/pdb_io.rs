// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading pdb files and multi-model pdb trajectories.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{ParsePdbError, ReadTrajError};
use crate::io::traj_io::TrajRead;
use crate::structures::{atom::Atom, simbox::SimBox, vector3d::Vector3D};
use crate::system::System;
use crate::trajectory::Frame;

/// Read a pdb file and construct a System structure.
///
/// ## Supported keywords
/// This function can handle lines starting with ATOM, HETATM, TITLE, ENDMDL, END, and CRYST1.
/// All other lines are ignored.
///
/// ## Notes
/// - Reading ends once `ENDMDL`, `END`, or the end of file is reached,
///   i.e. only the first model of a multi-model file is read.
/// - Positions and box dimensions are converted from Å to nm.
/// - In case multiple TITLE lines are provided, the **last one** is used as the
///   name of the system. If no TITLE line is provided, "Unknown" is used as the name.
/// - If no CRYST1 line is provided, the system has no simulation box.
pub fn read_pdb(filename: impl AsRef<Path>) -> Result<System, ParsePdbError> {
    let file = match File::open(filename.as_ref()) {
        Ok(x) => x,
        Err(_) => return Err(ParsePdbError::FileNotFound(Box::from(filename.as_ref()))),
    };

    let reader = BufReader::new(file);

    let mut atoms: Vec<Atom> = Vec::new();
    let mut title = "Unknown".to_string();
    let mut simbox = None;

    for raw_line in reader.lines() {
        let line = match raw_line {
            Ok(x) => x,
            Err(_) => return Err(ParsePdbError::LineNotFound(Box::from(filename.as_ref()))),
        };

        if is_atom_line(&line) {
            atoms.push(line_as_atom(&line)?);
        } else if line.starts_with("TITLE") {
            title = line_as_title(&line);
        } else if line.starts_with("CRYST1") {
            simbox = Some(line_as_box(&line)?).filter(|s: &SimBox| !s.is_zero());
        } else if line.starts_with("END") && !atoms.is_empty() {
            break;
        }
    }

    if atoms.is_empty() {
        return Err(ParsePdbError::NoAtoms(Box::from(filename.as_ref())));
    }

    Ok(System::new(&title, atoms, simbox))
}

#[inline(always)]
fn is_atom_line(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

/// Parse the position of an atom from a pdb line and convert it to nm.
fn line_as_position(line: &str) -> Option<Vector3D> {
    let mut position = [0.0; 3];
    for (i, item) in position.iter_mut().enumerate() {
        let curr = 30 + i * 8;
        *item = line.get(curr..curr + 8)?.trim().parse::<f32>().ok()? / 10.0;
    }

    Some(position.into())
}

/// Parse a line as atom.
fn line_as_atom(line: &str) -> Result<Atom, ParsePdbError> {
    // check line length
    if line.len() < 54 || !line.is_ascii() {
        return Err(ParsePdbError::ParseAtomLineErr(line.to_string()));
    }

    // parsing atom number
    let atom_number = line[6..11]
        .trim()
        .parse::<usize>()
        .map_err(|_| ParsePdbError::ParseAtomLineErr(line.to_string()))?;

    // parsing atom name
    let atom_name = line[12..16].trim().to_string();
    if atom_name.is_empty() {
        return Err(ParsePdbError::ParseAtomLineErr(line.to_string()));
    }

    // parsing residue name
    let residue_name = line[17..21].trim().to_string();
    if residue_name.is_empty() {
        return Err(ParsePdbError::ParseAtomLineErr(line.to_string()));
    }

    // parsing chain
    let chain = line.chars().nth(21).filter(|&x| !x.is_whitespace());

    // parsing residue number
    let residue_number = line[22..26]
        .trim()
        .parse::<usize>()
        .map_err(|_| ParsePdbError::ParseAtomLineErr(line.to_string()))?;

    let position =
        line_as_position(line).ok_or(ParsePdbError::ParseAtomLineErr(line.to_string()))?;

    let atom =
        Atom::new(residue_number, &residue_name, atom_number, &atom_name).with_position(position);

    // add chain information, if available
    match chain {
        Some(x) => Ok(atom.with_chain(x)),
        None => Ok(atom),
    }
}

/// Parse a CRYST1 line as simulation box. Lengths are converted to nm.
fn line_as_box(line: &str) -> Result<SimBox, ParsePdbError> {
    let error = || ParsePdbError::ParseBoxLineErr(line.to_string());

    // check line length
    if line.len() < 54 || !line.is_ascii() {
        return Err(error());
    }

    let mut lengths = [0.0f32; 3];
    for (i, dim) in lengths.iter_mut().enumerate() {
        let curr = 6 + i * 9;
        *dim = line[curr..curr + 9]
            .trim()
            .parse::<f32>()
            .map_err(|_| error())?
            / 10.0;
    }

    let mut angles = [0.0f32; 3];
    for (i, angle) in angles.iter_mut().enumerate() {
        let curr = 33 + i * 7;
        *angle = line[curr..curr + 7]
            .trim()
            .parse::<f32>()
            .map_err(|_| error())?;
    }

    Ok(SimBox::from_lengths_angles(lengths.into(), angles.into()))
}

fn line_as_title(line: &str) -> String {
    let title = line.get(5..).unwrap_or("").trim();
    if title.is_empty() {
        "Unknown".to_string()
    } else {
        title.to_string()
    }
}

/******************************/
/*    PDB TRAJECTORY READER   */
/******************************/

/// Reader of pdb files containing multiple models.
/// Each model (terminated by `ENDMDL` or `END`) is one frame.
///
/// ## Notes
/// - Pdb files carry no simulation time. The time and the step of each frame
///   are set to the index of the model in the file.
/// - The CRYST1 line preceding or inside a model is used as its simulation box.
pub struct PdbReader {
    buffer: BufReader<File>,
    frame_index: usize,
    simbox: Option<SimBox>,
}

impl PdbReader {
    /// Open a pdb file for reading models.
    pub fn new(filename: impl AsRef<Path>) -> Result<PdbReader, ReadTrajError> {
        let file = File::open(filename.as_ref())
            .map_err(|_| ReadTrajError::FileNotFound(Box::from(filename.as_ref())))?;

        Ok(PdbReader {
            buffer: BufReader::new(file),
            frame_index: 0,
            simbox: None,
        })
    }
}

impl TrajRead for PdbReader {
    fn read_frame(&mut self) -> Option<Result<Frame, ReadTrajError>> {
        let mut positions = Vec::new();

        loop {
            let mut line = String::new();
            match self.buffer.read_line(&mut line) {
                Ok(0) => break,
                Err(e) => return Some(Err(ReadTrajError::ParseFrame(e.to_string()))),
                Ok(_) => (),
            }
            let line = line.trim_end_matches(['\n', '\r']);

            if is_atom_line(line) {
                match line_as_position(line) {
                    Some(x) => positions.push(x),
                    None => {
                        return Some(Err(ReadTrajError::ParseFrame(format!(
                            "invalid atom line `{}`",
                            line
                        ))))
                    }
                }
            } else if line.starts_with("CRYST1") {
                match line_as_box(line) {
                    Ok(x) => self.simbox = Some(x).filter(|s| !s.is_zero()),
                    Err(e) => return Some(Err(ReadTrajError::ParseFrame(e.to_string()))),
                }
            } else if line.starts_with("END") && !positions.is_empty() {
                break;
            }
        }

        if positions.is_empty() {
            return None;
        }

        let frame = Frame::new(
            positions,
            self.frame_index as f32,
            self.frame_index as u64,
            self.simbox.clone(),
        );
        self.frame_index += 1;

        Some(Ok(frame))
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
