// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Writing results of the analyses into output files: XVG files for plotting and YAML files
//! containing the complete results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::domain::DomainRmsfResults;
use crate::errors::WriteOutputError;
use crate::FLEXAN_VERSION;

/// Open an output file for writing.
/// An existing file is only replaced if `overwrite` is `true`.
fn create_output(
    filename: impl AsRef<Path>,
    overwrite: bool,
) -> Result<BufWriter<File>, WriteOutputError> {
    let path = filename.as_ref();
    if path.exists() && !overwrite {
        return Err(WriteOutputError::AlreadyExists(Box::from(path)));
    }

    let file = File::create(path).map_err(|_| WriteOutputError::CouldNotCreate(Box::from(path)))?;
    Ok(BufWriter::new(file))
}

/// Table of values written into an XVG file.
/// The first column is the x axis, every other column is one data set.
#[derive(Debug, Clone)]
pub struct XvgTable<'a> {
    title: &'a str,
    xlabel: &'a str,
    ylabel: &'a str,
    x: Vec<f32>,
    columns: Vec<(&'a str, &'a [f32])>,
}

impl<'a> XvgTable<'a> {
    pub fn new(title: &'a str, xlabel: &'a str, ylabel: &'a str, x: Vec<f32>) -> Self {
        XvgTable {
            title,
            xlabel,
            ylabel,
            x,
            columns: Vec::new(),
        }
    }

    /// Add a data set.
    ///
    /// ## Returns
    /// `WriteOutputError::InconsistentColumns` if the data set does not have the length of the x axis.
    pub fn with_column(mut self, legend: &'a str, values: &'a [f32]) -> Result<Self, WriteOutputError> {
        if values.len() != self.x.len() {
            return Err(WriteOutputError::InconsistentColumns(
                self.x.len(),
                values.len(),
            ));
        }

        self.columns.push((legend, values));
        Ok(self)
    }

    /// Write the table into an xvg file in the format used by GROMACS.
    pub fn write(&self, filename: impl AsRef<Path>, overwrite: bool) -> Result<(), WriteOutputError> {
        let path = filename.as_ref();
        let mut output = create_output(path, overwrite)?;
        self.write_to(&mut output)
            .and_then(|_| output.flush())
            .map_err(|_| WriteOutputError::CouldNotWrite(Box::from(path)))
    }

    fn write_to(&self, output: &mut impl Write) -> std::io::Result<()> {
        writeln!(output, "# Created by flexan v{}", FLEXAN_VERSION)?;
        writeln!(output, "@    title \"{}\"", self.title)?;
        writeln!(output, "@    xaxis  label \"{}\"", self.xlabel)?;
        writeln!(output, "@    yaxis  label \"{}\"", self.ylabel)?;
        writeln!(output, "@TYPE xy")?;
        writeln!(output, "@ view 0.15, 0.15, 0.75, 0.85")?;
        writeln!(output, "@ legend on")?;
        writeln!(output, "@ legend box on")?;
        writeln!(output, "@ legend loctype view")?;
        writeln!(output, "@ legend 0.78, 0.8")?;
        writeln!(output, "@ legend length 2")?;
        for (i, (legend, _)) in self.columns.iter().enumerate() {
            writeln!(output, "@ s{} legend \"{}\"", i, legend)?;
        }

        for (row, x) in self.x.iter().enumerate() {
            write!(output, "{:12.4}", x)?;
            for (_, values) in self.columns.iter() {
                write!(output, " {:12.4}", values[row])?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}

/// ## Methods for writing the results of the domain-resolved RMSF analysis.
impl DomainRmsfResults {
    /// Write the complete results into a yaml file.
    pub fn write_yaml(&self, filename: impl AsRef<Path>, overwrite: bool) -> Result<(), WriteOutputError> {
        let path = filename.as_ref();
        let mut output = create_output(path, overwrite)?;

        serde_yaml::to_writer(&mut output, self)
            .map_err(|e| WriteOutputError::CouldNotSerialize(e.to_string()))?;
        output
            .flush()
            .map_err(|_| WriteOutputError::CouldNotWrite(Box::from(path)))
    }

    /// Write RMSF of the selected atoms into an xvg file.
    /// The x axis contains the residue numbers of the atoms. The first data set is the RMSF
    /// of the whole selection, the second data set (if present) is the stitched per-domain RMSF.
    pub fn write_rmsf_xvg(
        &self,
        filename: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<(), WriteOutputError> {
        let x = self.residue_numbers().iter().map(|&r| r as f32).collect();
        let mut table = XvgTable::new("Root mean square fluctuation", "Residue", "RMSF (Å)", x)
            .with_column("whole selection", self.rmsf())?;

        if let Some(domains) = self.domain_rmsf() {
            table = table.with_column("domains", domains)?;
        }

        table.write(filename, overwrite)
    }

    /// Write the RMSD time series into an xvg file, one data set per group of atoms.
    /// Does nothing if RMSD has not been calculated.
    pub fn write_rmsd_xvg(
        &self,
        filename: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<(), WriteOutputError> {
        if self.rmsd().is_empty() {
            return Ok(());
        }

        self.rmsd()
            .iter()
            .try_fold(
                XvgTable::new("RMSD", "Time (ps)", "RMSD (Å)", self.times().clone()),
                |table, series| table.with_column(series.name(), series.values()),
            )?
            .write(filename, overwrite)
    }

    /// Write the radius of gyration time series into an xvg file.
    /// Does nothing if radius of gyration has not been calculated.
    pub fn write_gyration_xvg(
        &self,
        filename: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<(), WriteOutputError> {
        match self.gyration() {
            Some(gyration) => XvgTable::new(
                "Radius of gyration",
                "Time (ps)",
                "Rg (Å)",
                self.times().clone(),
            )
            .with_column(self.selection(), gyration)?
            .write(filename, overwrite),
            None => Ok(()),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
