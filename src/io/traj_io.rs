// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Trait for reading trajectory files of any supported format and the iterator wrapping it.

use std::path::Path;

use crate::errors::ReadTrajError;
use crate::files::FileType;
use crate::io::{dcd_io::DcdReader, gro_io::GroReader, pdb_io::PdbReader, xtc_io::XtcReader};
use crate::progress::{ProgressPrinter, ProgressStatus};
use crate::trajectory::Frame;

/*****************************/
/*  TrajRead and TrajReader  */
/*****************************/

/// Any structure implementing `TrajRead` can be used to read frames of a trajectory file.
pub trait TrajRead {
    /// Read the next frame of the trajectory.
    ///
    /// ## Returns
    /// - `Some(Ok(Frame))` if the frame has been successfully read.
    /// - `Some(Err(ReadTrajError))` if the frame could not be read.
    /// - `None` if the end of the trajectory file has been reached.
    fn read_frame(&mut self) -> Option<Result<Frame, ReadTrajError>>;

    /// Skip the next frame of the trajectory.
    /// The default implementation reads the frame and throws it away;
    /// readers of binary formats can override this to avoid decoding the positions.
    fn skip_frame(&mut self) -> Option<Result<(), ReadTrajError>> {
        self.read_frame().map(|result| result.map(|_| ()))
    }
}

/// Wrapper for any structure implementing `TrajRead` allowing to iterate through the frames
/// of the trajectory. Only every `step`th frame is returned.
pub struct TrajReader {
    traj_reader: Box<dyn TrajRead>,
    filename: Box<Path>,
    /// Number of atoms every frame must contain.
    n_atoms: usize,
    step: usize,
    /// Index of the next frame in the trajectory file.
    frame_number: usize,
    /// Simulation step and time of the last successfully read frame.
    last: (u64, f32),
    started: bool,
    finished: bool,
    progress_printer: Option<ProgressPrinter>,
}

impl TrajReader {
    /// Wrap trajectory reader implementing `TrajRead` into `TrajReader` structure.
    /// Every frame must contain exactly `n_atoms` atoms.
    pub fn wrap_traj(
        traj_reader: Box<dyn TrajRead>,
        filename: impl AsRef<Path>,
        n_atoms: usize,
    ) -> TrajReader {
        TrajReader {
            traj_reader,
            filename: Box::from(filename.as_ref()),
            n_atoms,
            step: 1,
            frame_number: 0,
            last: (0, 0.0),
            started: false,
            finished: false,
            progress_printer: None,
        }
    }

    /// Only read every `step`th frame of the trajectory, starting with the first frame.
    /// Frames that are skipped over are not fully decoded, if the format allows it.
    ///
    /// ## Returns
    /// `ReadTrajError::InvalidStep` if the `step` is zero.
    pub fn with_step(mut self, step: usize) -> Result<TrajReader, ReadTrajError> {
        if step == 0 {
            return Err(ReadTrajError::InvalidStep(step));
        }

        self.step = step;
        Ok(self)
    }

    /// Associate a progress printer with the trajectory reader.
    pub fn print_progress(mut self, printer: ProgressPrinter) -> TrajReader {
        self.progress_printer = Some(printer);
        self
    }

    /// Mark the reading as completed and report it.
    fn finish(&mut self) -> Option<Result<Frame, ReadTrajError>> {
        self.finished = true;
        if let Some(printer) = self.progress_printer.as_mut() {
            printer.set_status(ProgressStatus::Completed);
            printer.print(self.frame_number, self.last.0, self.last.1);
        }

        None
    }

    /// Mark the reading as failed and report it.
    fn fail(&mut self, error: ReadTrajError) -> Option<Result<Frame, ReadTrajError>> {
        self.finished = true;
        if let Some(printer) = self.progress_printer.as_mut() {
            printer.set_status(ProgressStatus::Failed);
            printer.print(self.frame_number, self.last.0, self.last.1);
        }

        Some(Err(error))
    }
}

impl Iterator for TrajReader {
    type Item = Result<Frame, ReadTrajError>;

    /// Read the next frame of the trajectory.
    /// Once the end of the file is reached or an error occurs, the iterator only returns `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.started {
            for _ in 1..self.step {
                match self.traj_reader.skip_frame() {
                    None => return self.finish(),
                    Some(Err(e)) => return self.fail(e),
                    Some(Ok(())) => self.frame_number += 1,
                }
            }
        }
        self.started = true;

        match self.traj_reader.read_frame() {
            None => self.finish(),
            Some(Err(e)) => self.fail(e),
            Some(Ok(frame)) => {
                if frame.get_n_atoms() != self.n_atoms {
                    let error = ReadTrajError::AtomsNumberMismatch(
                        self.filename.clone(),
                        frame.get_n_atoms(),
                        self.n_atoms,
                    );
                    return self.fail(error);
                }

                let frame = frame.with_frame_number(self.frame_number);
                self.last = (frame.get_step(), frame.get_time());

                if let Some(printer) = self.progress_printer.as_mut() {
                    printer.print(self.frame_number, self.last.0, self.last.1);
                }

                self.frame_number += 1;
                Some(Ok(frame))
            }
        }
    }
}

/// Open a trajectory file of any supported format for reading.
/// The file format is recognized from the file extension.
///
/// ## Supported formats
/// - xtc (GROMACS compressed trajectory),
/// - dcd (CHARMM/NAMD/OpenMM binary trajectory),
/// - gro (multiple concatenated frames),
/// - pdb (multiple models).
///
/// ## Returns
/// - `TrajReader` which can be iterated to read the individual frames.
/// - `ReadTrajError::FileNotFound` if the file does not exist.
/// - `ReadTrajError::UnsupportedFormat` if the file format is not supported.
///
/// ## Example
/// ```no_run
/// # use flexan::prelude::*;
/// #
/// let system = System::from_file("system.gro").unwrap();
/// let reader = open_trajectory("md.xtc", system.get_n_atoms())
///     .unwrap()
///     .with_step(10)
///     .unwrap();
///
/// for frame in reader {
///     let frame = frame.unwrap();
///     println!("{}", frame.get_time());
/// }
/// ```
pub fn open_trajectory(
    filename: impl AsRef<Path>,
    n_atoms: usize,
) -> Result<TrajReader, ReadTrajError> {
    let path = filename.as_ref();
    if !path.is_file() {
        return Err(ReadTrajError::FileNotFound(Box::from(path)));
    }

    let reader: Box<dyn TrajRead> = match FileType::from_name(path) {
        FileType::XTC => Box::new(XtcReader::new(path)?),
        FileType::DCD => Box::new(DcdReader::new(path)?),
        FileType::GRO => Box::new(GroReader::new(path)?),
        FileType::PDB => Box::new(PdbReader::new(path)?),
        _ => return Err(ReadTrajError::UnsupportedFormat(Box::from(path))),
    };

    Ok(TrajReader::wrap_traj(reader, path, n_atoms))
}

/******************************/
/*         UNIT TESTS         */
/******************************/
