// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Reading of xtc files using the `molly` crate.

use molly::selection::AtomSelection;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::errors::ReadTrajError;
use crate::io::traj_io::TrajRead;
use crate::structures::{simbox::SimBox, vector3d::Vector3D};
use crate::trajectory::Frame;

/// Wrapper around `molly`'s XTCReader.
pub struct XtcReader {
    reader: molly::XTCReader<File>,
}

impl XtcReader {
    /// Open an xtc file for reading.
    ///
    /// ## Returns
    /// - `ReadTrajError::FileNotFound` if the file could not be opened.
    /// - `ReadTrajError::NotXtc` if the file does not start with an xtc magic number.
    pub fn new(filename: impl AsRef<Path>) -> Result<XtcReader, ReadTrajError> {
        let file = File::open(&filename)
            .map_err(|_| ReadTrajError::FileNotFound(Box::from(filename.as_ref())))?;

        let mut xtc = XtcReader {
            reader: molly::XTCReader { file, step: 0 },
        };

        // check magic number
        match xtc.read_i32() {
            Ok(1995) | Ok(2023) => (),
            _ => return Err(ReadTrajError::NotXtc(Box::from(filename.as_ref()))),
        }

        // return back to the start
        xtc.reader
            .home()
            .map_err(|e| ReadTrajError::XtcError(e.to_string()))?;

        Ok(xtc)
    }

    /// Read the number of bytes allocated for the coordinates in the current frame + padding.
    /// Reads 4 bytes for magic number 1995 and 8 bytes for magic number 2023.
    #[inline]
    fn read_n_bytes(&mut self, magic: i32) -> std::io::Result<i64> {
        let bytes = match magic {
            2023 => self.read_i64()?,
            _ => self.read_i32()? as i64,
        };

        Ok(bytes + (4 - (bytes % 4)) % 4)
    }

    /// Read 32-bit integer from the xtc file.
    #[inline(always)]
    fn read_i32(&mut self) -> std::io::Result<i32> {
        let mut buf = [0u8; 4];
        self.reader.file.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Read 64-bit integer from the xtc file.
    #[inline(always)]
    fn read_i64(&mut self) -> std::io::Result<i64> {
        let mut buf = [0u8; 8];
        self.reader.file.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    /// Jump forward in the open xtc file.
    #[inline(always)]
    fn xdr_jump(&mut self, offset: i64) -> std::io::Result<()> {
        self.reader.file.seek(SeekFrom::Current(offset))?;
        Ok(())
    }
}

impl TrajRead for XtcReader {
    fn read_frame(&mut self) -> Option<Result<Frame, ReadTrajError>> {
        let mut frame = molly::Frame::default();

        match self
            .reader
            .read_frame_with_selection(&mut frame, &AtomSelection::All)
        {
            Ok(_) => (),
            // expecting that this is not an error but the end of file was just reached
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return None,
            Err(e) => return Some(Err(ReadTrajError::XtcError(e.to_string()))),
        }

        let positions = frame
            .coords()
            .map(|pos| Vector3D::new(pos.x, pos.y, pos.z))
            .collect();

        let b = frame.boxvec;
        let simbox = SimBox::from([
            b.col(0).x,
            b.col(1).y,
            b.col(2).z,
            b.col(0).y,
            b.col(0).z,
            b.col(1).x,
            b.col(1).z,
            b.col(2).x,
            b.col(2).y,
        ]);

        Some(Ok(Frame::new(
            positions,
            frame.time,
            frame.step as u64,
            Some(simbox).filter(|s| !s.is_zero()),
        )))
    }

    /// Skip one frame of an xtc file without decompressing the coordinates.
    fn skip_frame(&mut self) -> Option<Result<(), ReadTrajError>> {
        // this should only fail if we have reached the end of the file
        let magic_number = self.read_i32().ok()?;

        // check the magic number is correct (validity of the frame)
        if magic_number != 1995 && magic_number != 2023 {
            return Some(Err(ReadTrajError::XtcError(format!(
                "invalid magic number `{}`",
                magic_number
            ))));
        }

        // get the number of bytes to the next frame
        let size = match self
            .xdr_jump(84)
            .and_then(|_| self.read_n_bytes(magic_number))
        {
            Ok(x) => x,
            Err(_) => return None,
        };

        // this should only fail if we have reached the end of the file
        self.xdr_jump(size).ok()?;

        Some(Ok(()))
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
