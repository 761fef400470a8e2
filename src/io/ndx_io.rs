// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading ndx files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;

use crate::errors::{GroupError, ParseNdxError};
use crate::system::System;
use crate::PANIC_MESSAGE;

/// ## Methods for reading ndx files.
impl System {
    /// Read an ndx file and create atom Groups in the System structure.
    /// The groups can then be used in selection queries.
    ///
    /// ## Returns
    /// - `Ok` if the parsing is successful.
    /// - `ParseNdxError::GroupsShareName` if the ndx file contains multiple groups with the same name
    ///   or if a group with the same name already exists in the system.
    /// - `ParseNdxError::ParseGroupNameErr` if a group name is empty or contains forbidden characters.
    /// - `ParseNdxError::InvalidAtomIndex` if the ndx file refers to an atom that does not exist.
    /// - Other `ParseNdxError` errors if the file does not exist or parsing failed.
    ///
    /// ## Example
    /// ```no_run
    /// # use flexan::prelude::*;
    /// #
    /// let mut system = System::from_file("system.gro").unwrap();
    /// system.read_ndx("index.ndx").unwrap();
    ///
    /// let atoms = system.select_indices("Protein and name CA").unwrap();
    /// ```
    ///
    /// ## Notes
    /// - If any error occurs, the system is not changed.
    /// - The indices in an ndx file do not correspond to atom numbers
    ///   from a gro file, but to actual atom numbers as used by gromacs.
    /// - Atom numbers can be in any order and will be properly reordered.
    /// - Duplicate atom numbers are ignored.
    /// - Empty lines are skipped.
    pub fn read_ndx(&mut self, filename: impl AsRef<Path>) -> Result<(), ParseNdxError> {
        let file = match File::open(filename.as_ref()) {
            Ok(x) => x,
            Err(_) => return Err(ParseNdxError::FileNotFound(Box::from(filename.as_ref()))),
        };

        let buffer = BufReader::new(file);
        let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut current_name: Option<String> = None;

        for raw_line in buffer.lines() {
            let line = match raw_line {
                Ok(x) => x,
                Err(_) => return Err(ParseNdxError::LineNotFound(Box::from(filename.as_ref()))),
            };

            // skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            if line.contains('[') && line.contains(']') {
                let name = parse_group_name(&line)?;
                if groups.contains_key(&name) || self.group_exists(&name) {
                    return Err(ParseNdxError::GroupsShareName(name));
                }

                groups.insert(name.clone(), Vec::new());
                current_name = Some(name);
            } else {
                let group = current_name
                    .as_ref()
                    .and_then(|name| groups.get_mut(name))
                    .ok_or(ParseNdxError::ParseLineErr(line.clone()))?;

                group.extend(parse_ndx_line(&line, self.get_n_atoms())?);
            }
        }

        for (name, atoms) in groups.into_iter() {
            match self.group_create_from_indices(&name, atoms) {
                Ok(_) => (),
                Err(GroupError::AlreadyExists(e)) => return Err(ParseNdxError::GroupsShareName(e)),
                Err(_) => panic!(
                    "FATAL FLEXAN ERROR | System::read_ndx | Unexpected error returned from `group_create_from_indices`.{}",
                    PANIC_MESSAGE
                ),
            }
        }

        Ok(())
    }
}

/// Parse a line of an ndx file as a group name.
fn parse_group_name(line: &str) -> Result<String, ParseNdxError> {
    let name = line.replace(['[', ']'], "").trim().to_string();

    if crate::system::name_is_valid(&name) {
        Ok(name)
    } else {
        Err(ParseNdxError::ParseGroupNameErr(line.to_string()))
    }
}

/// Parse a line of an ndx file as gmx atom numbers and convert them to atom indices.
fn parse_ndx_line(line: &str, n_atoms: usize) -> Result<Vec<usize>, ParseNdxError> {
    let mut indices = Vec::new();

    for raw_id in line.split_whitespace() {
        let id = match raw_id.parse::<usize>() {
            Ok(x) => x,
            Err(_) => return Err(ParseNdxError::ParseLineErr(line.to_string())),
        };

        if id == 0 || id > n_atoms {
            return Err(ParseNdxError::InvalidAtomIndex(id));
        }

        indices.push(id - 1);
    }

    Ok(indices)
}

/******************************/
/*         UNIT TESTS         */
/******************************/
