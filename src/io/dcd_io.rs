// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Reading of dcd files (CHARMM, NAMD, and OpenMM binary trajectories).
//!
//! A dcd file consists of Fortran unformatted records, each enclosed by two
//! integer markers containing the length of the record in bytes.
//! The header is followed by frames, each containing an optional unit cell record
//! and three records with the x, y, and z coordinates of all atoms (in Å).

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use crate::errors::ReadTrajError;
use crate::io::traj_io::TrajRead;
use crate::structures::{simbox::SimBox, vector3d::Vector3D};
use crate::trajectory::Frame;

/// Length of the first header record.
const HEADER_SIZE: i32 = 84;
/// AKMA time unit in ps.
const AKMA_TIME_PS: f32 = 0.048_888_21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endianness {
    Little,
    Big,
}

/// Reader of dcd files.
///
/// ## Notes
/// - Both little-endian and big-endian files are supported; the byte order is detected from the header.
/// - Files with fixed atoms are not supported.
/// - Positions and box dimensions are converted from Å to nm.
/// - Simulation time is calculated from the `ISTART`, `NSAVC`, and `DELTA` fields of the header.
pub struct DcdReader {
    file: BufReader<File>,
    endianness: Endianness,
    n_atoms: usize,
    first_step: u64,
    save_frequency: u64,
    timestep: f32,
    has_unit_cell: bool,
    has_fourth_dimension: bool,
    frame_index: u64,
}

impl DcdReader {
    /// Open a dcd file and read its header.
    ///
    /// ## Returns
    /// - `ReadTrajError::FileNotFound` if the file could not be opened.
    /// - `ReadTrajError::NotDcd` if the file does not start with a valid dcd header.
    /// - `ReadTrajError::DcdError` if the header could not be read.
    pub fn new(filename: impl AsRef<Path>) -> Result<DcdReader, ReadTrajError> {
        let file = File::open(&filename)
            .map_err(|_| ReadTrajError::FileNotFound(Box::from(filename.as_ref())))?;
        let mut file = BufReader::new(file);
        let not_dcd = || ReadTrajError::NotDcd(Box::from(filename.as_ref()));

        // detect byte order from the first record marker
        let mut buf = [0u8; 4];
        file.read_exact(&mut buf).map_err(|_| not_dcd())?;
        let endianness = if i32::from_le_bytes(buf) == HEADER_SIZE {
            Endianness::Little
        } else if i32::from_be_bytes(buf) == HEADER_SIZE {
            Endianness::Big
        } else {
            return Err(not_dcd());
        };

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic).map_err(|_| not_dcd())?;
        if &magic != b"CORD" {
            return Err(not_dcd());
        }

        let mut dcd = DcdReader {
            file,
            endianness,
            n_atoms: 0,
            first_step: 0,
            save_frequency: 1,
            timestep: 0.0,
            has_unit_cell: false,
            has_fourth_dimension: false,
            frame_index: 0,
        };

        dcd.read_header()
            .map_err(|e| ReadTrajError::DcdError(format!("could not read header: {}", e)))?;

        Ok(dcd)
    }

    /// Read the rest of the header after the `CORD` magic string.
    fn read_header(&mut self) -> Result<(), String> {
        let mut control = [0i32; 20];
        for value in control.iter_mut() {
            *value = self.read_i32().map_err(|e| e.to_string())?;
        }
        self.read_marker(HEADER_SIZE)?;

        // CHARMM-style files store DELTA as a 32-bit float and can contain extra blocks
        let charmm = control[19] != 0;

        self.first_step = control[1].max(0) as u64;
        self.save_frequency = control[2].max(1) as u64;
        self.timestep = if charmm {
            f32::from_bits(control[9] as u32)
        } else {
            0.0
        };
        self.has_unit_cell = charmm && control[10] != 0;
        self.has_fourth_dimension = charmm && control[11] != 0;

        if control[8] != 0 {
            return Err(format!("files with {} fixed atoms are not supported", control[8]));
        }

        // title record
        let title_size = self.read_i32().map_err(|e| e.to_string())?;
        if title_size < 4 {
            return Err(format!("invalid size of the title block ({})", title_size));
        }
        self.jump(title_size as i64).map_err(|e| e.to_string())?;
        self.read_marker(title_size)?;

        // number of atoms record
        self.read_marker(4)?;
        let n_atoms = self.read_i32().map_err(|e| e.to_string())?;
        self.read_marker(4)?;

        if n_atoms <= 0 {
            return Err(format!("invalid number of atoms ({})", n_atoms));
        }
        self.n_atoms = n_atoms as usize;

        Ok(())
    }

    /// Get the number of atoms in each frame of the trajectory.
    pub fn get_n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Size of a single frame in bytes.
    fn frame_size(&self) -> i64 {
        let coordinates = 8 + 4 * self.n_atoms as i64;
        let mut size = 3 * coordinates;
        if self.has_unit_cell {
            size += 8 + 48;
        }
        if self.has_fourth_dimension {
            size += coordinates;
        }

        size
    }

    #[inline(always)]
    fn read_i32(&mut self) -> std::io::Result<i32> {
        let mut buf = [0u8; 4];
        self.file.read_exact(&mut buf)?;
        Ok(match self.endianness {
            Endianness::Little => i32::from_le_bytes(buf),
            Endianness::Big => i32::from_be_bytes(buf),
        })
    }

    #[inline(always)]
    fn read_f64(&mut self) -> std::io::Result<f64> {
        let mut buf = [0u8; 8];
        self.file.read_exact(&mut buf)?;
        Ok(match self.endianness {
            Endianness::Little => f64::from_le_bytes(buf),
            Endianness::Big => f64::from_be_bytes(buf),
        })
    }

    #[inline(always)]
    fn jump(&mut self, offset: i64) -> std::io::Result<()> {
        self.file.seek_relative(offset)
    }

    /// Read a record marker and check that it has the expected value.
    fn read_marker(&mut self, expected: i32) -> Result<(), String> {
        match self.read_i32() {
            Ok(x) if x == expected => Ok(()),
            Ok(x) => Err(format!(
                "unexpected record marker (expected {}, found {})",
                expected, x
            )),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Read the unit cell record and convert it to a simulation box.
    fn read_unit_cell(&mut self) -> Result<Option<SimBox>, String> {
        self.read_marker(48)?;
        let mut cell = [0.0f64; 6];
        for value in cell.iter_mut() {
            *value = self.read_f64().map_err(|e| e.to_string())?;
        }
        self.read_marker(48)?;

        // the order is A, gamma, B, beta, alpha, C
        let lengths = Vector3D::new(cell[0] as f32, cell[2] as f32, cell[5] as f32);
        let mut angles = [cell[4], cell[3], cell[1]];

        // newer CHARMM versions store cosines of the angles
        if angles.iter().all(|a| (-1.0..=1.0).contains(a)) {
            for angle in angles.iter_mut() {
                *angle = angle.acos().to_degrees();
            }
        }

        let simbox = SimBox::from_lengths_angles(
            lengths,
            Vector3D::new(angles[0] as f32, angles[1] as f32, angles[2] as f32),
        )
        .scale(0.1);

        Ok(Some(simbox).filter(|s| !s.is_zero()))
    }

    /// Read one coordinate record (x, y, or z of all atoms) into the positions.
    fn read_coordinates(
        &mut self,
        positions: &mut [Vector3D],
        dimension: usize,
    ) -> Result<(), String> {
        let size = 4 * self.n_atoms as i32;
        self.read_marker(size)?;

        let mut buf = vec![0u8; 4 * self.n_atoms];
        self.file.read_exact(&mut buf).map_err(|e| e.to_string())?;
        for (chunk, position) in buf.chunks_exact(4).zip(positions.iter_mut()) {
            let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
            let value = match self.endianness {
                Endianness::Little => f32::from_le_bytes(bytes),
                Endianness::Big => f32::from_be_bytes(bytes),
            };
            position[dimension] = value / 10.0;
        }

        self.read_marker(size)
    }

    fn read_frame_body(&mut self) -> Result<Frame, String> {
        let simbox = if self.has_unit_cell {
            self.read_unit_cell()?
        } else {
            None
        };

        let mut positions = vec![Vector3D::default(); self.n_atoms];
        for dimension in 0..3 {
            self.read_coordinates(&mut positions, dimension)?;
        }

        if self.has_fourth_dimension {
            let size = 4 * self.n_atoms as i32;
            self.read_marker(size)?;
            self.jump(size as i64).map_err(|e| e.to_string())?;
            self.read_marker(size)?;
        }

        let step = self.first_step + self.frame_index * self.save_frequency;
        let time = step as f32 * self.timestep * AKMA_TIME_PS;

        Ok(Frame::new(positions, time, step, simbox))
    }

    /// Check whether the end of the file has been reached.
    fn at_end(&mut self) -> std::io::Result<bool> {
        Ok(self.file.fill_buf()?.is_empty())
    }
}

impl TrajRead for DcdReader {
    fn read_frame(&mut self) -> Option<Result<Frame, ReadTrajError>> {
        match self.at_end() {
            Ok(true) => return None,
            Ok(false) => (),
            Err(e) => return Some(Err(ReadTrajError::DcdError(e.to_string()))),
        }

        let result = self.read_frame_body().map_err(ReadTrajError::DcdError);
        self.frame_index += 1;
        Some(result)
    }

    /// Skip one frame of a dcd file by jumping over it.
    fn skip_frame(&mut self) -> Option<Result<(), ReadTrajError>> {
        match self.at_end() {
            Ok(true) => return None,
            Ok(false) => (),
            Err(e) => return Some(Err(ReadTrajError::DcdError(e.to_string()))),
        }

        let size = self.frame_size();
        let result = self
            .jump(size - 1)
            .and_then(|_| {
                // the last byte of the frame must exist
                let mut byte = [0u8; 1];
                self.file.read_exact(&mut byte)
            })
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => {
                    ReadTrajError::DcdError("file ended in the middle of a frame".to_string())
                }
                _ => ReadTrajError::DcdError(e.to_string()),
            });

        self.frame_index += 1;
        Some(result)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::utilities::{write_dcd, DcdOptions};
    use float_cmp::assert_approx_eq;
    use tempfile::NamedTempFile;

    fn dcd_tempfile() -> NamedTempFile {
        tempfile::Builder::new().suffix(".dcd").tempfile().unwrap()
    }

    fn frames(n_frames: usize, n_atoms: usize) -> Vec<Vec<[f32; 3]>> {
        (0..n_frames)
            .map(|f| {
                (0..n_atoms)
                    .map(|a| [a as f32, f as f32, 0.5 * a as f32])
                    .collect()
            })
            .collect()
    }

    fn check_read(options: DcdOptions) {
        let file = dcd_tempfile();
        write_dcd(file.path(), &frames(5, 4), &options);

        let mut reader = DcdReader::new(file.path()).unwrap();
        assert_eq!(reader.get_n_atoms(), 4);

        for f in 0..5 {
            let frame = reader.read_frame().unwrap().unwrap();
            assert_eq!(frame.get_n_atoms(), 4);
            assert_eq!(frame.get_step(), 10 + 100 * f as u64);
            for (a, position) in frame.get_positions().iter().enumerate() {
                assert_approx_eq!(f32, position.x, a as f32 / 10.0);
                assert_approx_eq!(f32, position.y, f as f32 / 10.0);
                assert_approx_eq!(f32, position.z, 0.05 * a as f32);
            }

            if options.unit_cell {
                let simbox = frame.get_box().unwrap();
                assert_approx_eq!(f32, simbox.v1x, 3.0, epsilon = 0.0001);
                assert_approx_eq!(f32, simbox.v2y, 4.0, epsilon = 0.0001);
                assert_approx_eq!(f32, simbox.v3z, 5.0, epsilon = 0.0001);
                assert!(simbox.v2x.abs() < 0.0001);
            } else {
                assert!(frame.get_box().is_none());
            }
        }

        assert!(reader.read_frame().is_none());
    }

    #[test]
    fn read_little_endian() {
        check_read(DcdOptions::default());
    }

    #[test]
    fn read_big_endian() {
        check_read(DcdOptions {
            big_endian: true,
            ..DcdOptions::default()
        });
    }

    #[test]
    fn read_with_unit_cell() {
        check_read(DcdOptions {
            unit_cell: true,
            ..DcdOptions::default()
        });
    }

    #[test]
    fn read_big_endian_with_unit_cell() {
        check_read(DcdOptions {
            unit_cell: true,
            big_endian: true,
            ..DcdOptions::default()
        });
    }

    #[test]
    fn time_from_header() {
        let file = dcd_tempfile();
        write_dcd(file.path(), &frames(3, 2), &DcdOptions::default());

        let mut reader = DcdReader::new(file.path()).unwrap();
        let _ = reader.read_frame().unwrap().unwrap();
        let frame = reader.read_frame().unwrap().unwrap();
        // step 110 with DELTA = 0.5 AKMA units
        assert_approx_eq!(f32, frame.get_time(), 110.0 * 0.5 * AKMA_TIME_PS, epsilon = 0.0001);
    }

    #[test]
    fn skip_frames() {
        let file = dcd_tempfile();
        write_dcd(
            file.path(),
            &frames(4, 3),
            &DcdOptions {
                unit_cell: true,
                ..DcdOptions::default()
            },
        );

        let mut reader = DcdReader::new(file.path()).unwrap();
        assert!(reader.skip_frame().unwrap().is_ok());
        assert!(reader.skip_frame().unwrap().is_ok());

        let frame = reader.read_frame().unwrap().unwrap();
        assert_approx_eq!(f32, frame.get_positions()[0].y, 0.2);
        assert_eq!(frame.get_step(), 210);

        assert!(reader.skip_frame().unwrap().is_ok());
        assert!(reader.skip_frame().is_none());
    }

    #[test]
    fn truncated_frame() {
        let file = dcd_tempfile();
        write_dcd(file.path(), &frames(2, 3), &DcdOptions::default());

        let length = std::fs::metadata(file.path()).unwrap().len();
        let handle = std::fs::OpenOptions::new()
            .write(true)
            .open(file.path())
            .unwrap();
        handle.set_len(length - 10).unwrap();

        let mut reader = DcdReader::new(file.path()).unwrap();
        assert!(reader.read_frame().unwrap().is_ok());
        assert!(matches!(
            reader.read_frame(),
            Some(Err(ReadTrajError::DcdError(_)))
        ));
    }

    #[test]
    fn not_dcd() {
        match DcdReader::new("test_files/peptide.gro") {
            Err(ReadTrajError::NotDcd(_)) => (),
            _ => panic!("Opening should fail with NotDcd."),
        }
    }
}
