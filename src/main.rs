// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Command line interface of the `flexan` program.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use flexan::prelude::*;
use flexan::{colog_info, FLEXAN_VERSION};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Calculates domain-resolved root mean square fluctuation of atoms in molecular dynamics simulations."
)]
struct Args {
    /// Yaml file specifying the parameters of the analysis.
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Do not print any log messages.
    #[arg(short, long, default_value_t = false)]
    silent: bool,

    /// Replace existing output files.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Error that terminates the program.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    Output(#[from] WriteOutputError),
}

fn run(args: &Args) -> Result<(), RunError> {
    colog_info!("Running flexan v{}.", FLEXAN_VERSION);

    let config = Config::from_file(&args.config)?;
    colog_info!("Read configuration file '{}'.", args.config.display());

    let results = DomainRmsf::from(&config)
        .with_progress(!args.silent)
        .run()?;

    results.write_yaml(config.output_yaml(), args.overwrite)?;
    colog_info!("Written results into '{}'.", config.output_yaml().display());

    if let Some(xvg) = config.output_xvg() {
        results.write_rmsf_xvg(xvg, args.overwrite)?;
        colog_info!("Written RMSF into '{}'.", xvg.display());
    }

    if let Some(xvg) = config.output_rmsd() {
        results.write_rmsd_xvg(xvg, args.overwrite)?;
        colog_info!("Written RMSD into '{}'.", xvg.display());
    }

    if let Some(xvg) = config.output_gyration() {
        results.write_gyration_xvg(xvg, args.overwrite)?;
        colog_info!("Written radius of gyration into '{}'.", xvg.display());
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    if !args.silent {
        colog::init();
    }

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        log::error!("Computation failed.");
        process::exit(1);
    }
}
