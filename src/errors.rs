// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Error types that can be returned by the `flexan` crate.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading a structure file of any supported format.
#[derive(Error, Debug)]
pub enum ParseFileError {
    #[error("File `{0}` has an unknown or unsupported file extension.")]
    UnknownExtension(Box<Path>),
    #[error("{0}")]
    Gro(#[from] ParseGroError),
    #[error("{0}")]
    Pdb(#[from] ParsePdbError),
    #[error("{0}")]
    Tpr(#[from] ParseTprError),
}

/// Errors that can occur when reading and parsing a gro file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseGroError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` ended unexpectedly.")]
    LineNotFound(Box<Path>),
    #[error("Could not parse line `{0}`.")]
    ParseLineErr(String),
    #[error("Could not parse line `{0}` as atom.")]
    ParseAtomLineErr(String),
    #[error("Could not parse line `{0}` as box dimensions.")]
    ParseBoxLineErr(String),
}

/// Errors that can occur when reading and parsing a pdb file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParsePdbError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read line from file `{0}`.")]
    LineNotFound(Box<Path>),
    #[error("Could not parse line `{0}` as atom.")]
    ParseAtomLineErr(String),
    #[error("Could not parse line `{0}` as box dimensions.")]
    ParseBoxLineErr(String),
    #[error("File `{0}` contains no atoms.")]
    NoAtoms(Box<Path>),
}

/// Errors that can occur when reading a tpr file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseTprError {
    #[error("Could not read tpr file: {0}")]
    CouldNotRead(String),
}

/// Errors that can occur when reading and parsing an ndx file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseNdxError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read line from file `{0}`.")]
    LineNotFound(Box<Path>),
    #[error("Could not parse line `{0}` as group name.")]
    ParseGroupNameErr(String),
    #[error("Could not parse line `{0}`.")]
    ParseLineErr(String),
    #[error("The ndx file contains multiple groups named `{0}`.")]
    GroupsShareName(String),
    #[error("Atom number `{0}` does not exist in the system.")]
    InvalidAtomIndex(usize),
}

/// Errors that can occur when working with groups of atoms.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupError {
    #[error("Group `{0}` does not exist.")]
    NotFound(String),
    #[error("Group `{0}` already exists.")]
    AlreadyExists(String),
    #[error("Name `{0}` is not a valid group name.")]
    InvalidName(String),
    #[error("{0}")]
    InvalidQuery(SelectError),
}

/// Errors that can occur when parsing or applying a selection query.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectError {
    #[error("Query is empty.")]
    EmptyQuery,
    #[error("Query `{0}` contains unbalanced parentheses.")]
    InvalidParentheses(String),
    #[error("Query `{0}` contains unbalanced quotes.")]
    InvalidQuotes(String),
    #[error("Query `{0}` contains an invalid operator.")]
    InvalidOperator(String),
    #[error("Query `{0}` is missing an argument of a binary operator.")]
    MissingArgument(String),
    #[error("Query `{0}` contains a keyword with no argument.")]
    EmptyArgument(String),
    #[error("Query `{0}` contains an invalid number or range.")]
    InvalidNumber(String),
    #[error("Query `{0}` contains an invalid chain identifier.")]
    InvalidChainId(String),
    #[error("Regular expression `{0}` is invalid.")]
    InvalidRegex(String),
    #[error("Query `{0}` contains parenthetical expressions not separated by an operator.")]
    InvalidTokenParentheses(String),
    #[error("Group `{0}` does not exist.")]
    GroupNotFound(String),
    #[error("Regular expression `{0}` matches no group.")]
    NoRegexMatch(String),
    #[error("Query `{0}` could not be parsed.")]
    UnknownError(String),
}

/// Errors that can occur when reading a trajectory file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadTrajError {
    #[error("Trajectory file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Trajectory file `{0}` has an unknown or unsupported file extension.")]
    UnsupportedFormat(Box<Path>),
    #[error("Number of atoms in the trajectory `{0}` ({1}) does not match the number of atoms in the structure ({2}).")]
    AtomsNumberMismatch(Box<Path>, usize, usize),
    #[error("Frame could not be read from the trajectory: {0}")]
    FrameNotFound(String),
    #[error("File `{0}` is not a valid xtc file.")]
    NotXtc(Box<Path>),
    #[error("Could not read xtc frame: {0}")]
    XtcError(String),
    #[error("File `{0}` is not a valid dcd file.")]
    NotDcd(Box<Path>),
    #[error("Could not read dcd frame: {0}")]
    DcdError(String),
    #[error("Could not parse frame of a structure trajectory: {0}")]
    ParseFrame(String),
    #[error("Step `{0}` is not a valid step for trajectory reading.")]
    InvalidStep(usize),
    #[error("Trajectories can not be joined: the first one contains {0} atoms, the other one contains {1} atoms.")]
    IncompatibleTrajectories(usize, usize),
}

/// Errors that can occur when superposing structures or calculating RMSD.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RMSDError {
    #[error("Reference contains {0} atoms while the target contains {1} atoms.")]
    InconsistentNumberOfAtoms(usize, usize),
    #[error("No atoms to superpose.")]
    EmptySelection,
    #[error("Atom with index `{0}` has no position.")]
    InvalidPosition(usize),
}

/// Errors that can occur when calculating RMSF.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RMSFError {
    #[error("Trajectory contains no frames.")]
    NoFrames,
    #[error("Reference contains {0} atoms while the trajectory contains {1} atoms.")]
    InconsistentNumberOfAtoms(usize, usize),
}

/// Errors that can occur when writing output files.
#[derive(Error, Debug)]
pub enum WriteOutputError {
    #[error("Output file `{0}` could not be created.")]
    CouldNotCreate(Box<Path>),
    #[error("Could not write into output file `{0}`.")]
    CouldNotWrite(Box<Path>),
    #[error("Output file `{0}` already exists. Use `--overwrite` to replace it.")]
    AlreadyExists(Box<Path>),
    #[error("Could not serialize results: {0}")]
    CouldNotSerialize(String),
    #[error("Data columns have inconsistent lengths ({0} vs {1}).")]
    InconsistentColumns(usize, usize),
}

/// Errors that can occur when reading or validating the analysis configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not parse the configuration file: {0}")]
    CouldNotParse(String),
    #[error("Stride must be at least 1, not `{0}`.")]
    InvalidStride(usize),
    #[error("Start frame `{0}` is not lower than stop frame `{1}`.")]
    InvalidFrameRange(usize, usize),
    #[error("No trajectory file was provided.")]
    NoTrajectory,
}

/// Errors that can occur during the domain-resolved RMSF analysis.
///
/// Each variant corresponds to one class of failure: input files, selections,
/// shapes of the selected data, and consistency of the domain definitions.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Could not read the structure: {0}")]
    Structure(#[from] ParseFileError),
    #[error("Could not read the trajectory: {0}")]
    Trajectory(#[from] ReadTrajError),
    #[error("Could not read the index file: {0}")]
    Index(#[from] ParseNdxError),
    #[error("Invalid selection `{query}`: {source}")]
    Selection { query: String, source: SelectError },
    #[error("Selection `{0}` matches no atoms.")]
    EmptySelection(String),
    #[error("Selection `{selection}` contains {trajectory} atoms in the trajectory but {reference} atoms in the reference.")]
    ShapeMismatch {
        selection: String,
        trajectory: usize,
        reference: usize,
    },
    #[error("Domains cover {covered} atoms but the selection `{selection}` contains {expected} atoms. Domains must partition the selection.")]
    Integrity {
        selection: String,
        expected: usize,
        covered: usize,
    },
    #[error("Frame range [{start}, {stop}) contains no frames of a trajectory with {n_frames} frames.")]
    NoFrames {
        start: usize,
        stop: usize,
        n_frames: usize,
    },
    #[error("Stride must be at least 1.")]
    InvalidStride,
    #[error("Superposition failed: {0}")]
    Superposition(#[from] RMSDError),
    #[error("Fluctuation could not be calculated: {0}")]
    Fluctuation(#[from] RMSFError),
}
