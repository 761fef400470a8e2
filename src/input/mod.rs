// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Configuration of the `flexan` program read from a yaml file.

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::analysis::domain::DomainRmsf;
use crate::analysis::rmsd::RmsdReference;
use crate::analysis::rmsf::FluctuationCenter;
use crate::errors::ConfigError;
use crate::trajectory::FrameBounds;

/// One trajectory file or a list of trajectory files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum TrajectoryInput {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
}

fn deserialize_trajectories<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match TrajectoryInput::deserialize(deserializer)? {
        TrajectoryInput::Single(file) => vec![file],
        TrajectoryInput::Multiple(files) => files,
    })
}

fn default_stride() -> usize {
    1
}

fn default_true() -> bool {
    true
}

/// Parameters of the domain-resolved RMSF analysis.
///
/// ## Example
/// ```yaml
/// structure: system.gro
/// trajectory: [md_part1.xtc, md_part2.xtc]
/// ndx: index.ndx
/// selection: "@protein and name CA"
/// domains:
///   - resid 1 to 120
///   - resid 121 to 250
/// start: 100
/// stride: 5
/// rmsd:
///   Calpha: "@protein and name CA"
///   All atoms (noH): "@protein and not name r'^H'"
/// rmsd_reference: first_frame
/// output_yaml: rmsf.yaml
/// output_xvg: rmsf.xvg
/// output_rmsd: rmsd.xvg
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Getters, CopyGetters)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Structure file (gro, pdb, tpr) providing the topology and the reference positions.
    #[getset(get = "pub")]
    structure: PathBuf,
    /// Trajectory file(s) (xtc, dcd, gro, pdb). Multiple files are joined in the provided order.
    #[serde(deserialize_with = "deserialize_trajectories")]
    #[getset(get = "pub")]
    trajectory: Vec<PathBuf>,
    /// Optional ndx file with groups usable in the queries.
    #[serde(default)]
    #[getset(get = "pub")]
    ndx: Option<PathBuf>,
    /// Global selection query.
    #[getset(get = "pub")]
    selection: String,
    /// Domain queries, in order.
    #[serde(default)]
    #[getset(get = "pub")]
    domains: Vec<String>,
    /// First frame (after applying the stride) used for the whole-selection RMSF.
    #[serde(default)]
    #[getset(get_copy = "pub")]
    start: Option<usize>,
    /// Frame (after applying the stride) at which the whole-selection RMSF stops. Not included.
    #[serde(default)]
    #[getset(get_copy = "pub")]
    stop: Option<usize>,
    #[serde(default = "default_stride")]
    #[getset(get_copy = "pub")]
    stride: usize,
    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    superpose: bool,
    #[serde(default)]
    #[getset(get_copy = "pub")]
    center: FluctuationCenter,
    /// Make the analyzed atoms whole across periodic boundaries.
    #[serde(default = "default_true")]
    #[getset(get_copy = "pub")]
    pbc: bool,
    /// Named groups of atoms for which the RMSD time series is calculated.
    /// If empty and `output_rmsd` is provided, RMSD of the global selection is calculated.
    #[serde(default)]
    #[getset(get = "pub")]
    rmsd: IndexMap<String, String>,
    #[serde(default)]
    #[getset(get_copy = "pub")]
    rmsd_reference: RmsdReference,
    /// Output yaml file with the complete results.
    #[getset(get = "pub")]
    output_yaml: PathBuf,
    /// Output xvg file with the RMSF.
    #[serde(default)]
    #[getset(get = "pub")]
    output_xvg: Option<PathBuf>,
    /// Output xvg file with the RMSD time series.
    #[serde(default)]
    #[getset(get = "pub")]
    output_rmsd: Option<PathBuf>,
    /// Output xvg file with the radius of gyration time series.
    #[serde(default)]
    #[getset(get = "pub")]
    output_gyration: Option<PathBuf>,
}

impl Config {
    /// Read and validate the configuration from a yaml file.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let content = read_to_string(filename.as_ref())
            .map_err(|_| ConfigError::FileNotFound(Box::from(filename.as_ref())))?;

        Config::from_string(&content)
    }

    /// Parse and validate the configuration from a yaml string.
    pub fn from_string(yaml: &str) -> Result<Config, ConfigError> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::CouldNotParse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trajectory.is_empty() {
            return Err(ConfigError::NoTrajectory);
        }

        if self.stride == 0 {
            return Err(ConfigError::InvalidStride(self.stride));
        }

        if let (Some(start), Some(stop)) = (self.start, self.stop) {
            if start >= stop {
                return Err(ConfigError::InvalidFrameRange(start, stop));
            }
        }

        Ok(())
    }

    pub fn bounds(&self) -> FrameBounds {
        FrameBounds::new(self.start, self.stop)
    }

    /// Get the named RMSD groups that should be analyzed.
    pub fn rmsd_groups(&self) -> Vec<(&str, &str)> {
        if self.rmsd.is_empty() && self.output_rmsd.is_some() {
            return vec![(self.selection.as_str(), self.selection.as_str())];
        }

        self.rmsd
            .iter()
            .map(|(name, query)| (name.as_str(), query.as_str()))
            .collect()
    }
}

impl From<&Config> for DomainRmsf {
    fn from(config: &Config) -> Self {
        let analysis = DomainRmsf::new(&config.structure, &config.trajectory, &config.selection)
            .with_domains(&config.domains)
            .with_bounds(config.bounds())
            .with_stride(config.stride)
            .with_superpose(config.superpose)
            .with_center(config.center)
            .with_pbc(config.pbc)
            .with_rmsd_reference(config.rmsd_reference)
            .with_gyration(config.output_gyration.is_some());

        let analysis = config
            .rmsd_groups()
            .into_iter()
            .fold(analysis, |analysis, (name, query)| analysis.with_rmsd(name, query));

        match &config.ndx {
            Some(ndx) => analysis.with_ndx(ndx),
            None => analysis,
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn minimal() {
        let config = Config::from_string(
            "structure: system.gro\ntrajectory: md.xtc\nselection: name CA\noutput_yaml: rmsf.yaml\n",
        )
        .unwrap();

        assert_eq!(config.structure(), &PathBuf::from("system.gro"));
        assert_eq!(config.trajectory(), &vec![PathBuf::from("md.xtc")]);
        assert_eq!(config.selection(), "name CA");
        assert!(config.ndx().is_none());
        assert!(config.domains().is_empty());
        assert_eq!(config.stride(), 1);
        assert!(config.superpose());
        assert_eq!(config.center(), FluctuationCenter::Average);
        assert_eq!(config.bounds(), FrameBounds::all());
        assert!(config.output_xvg().is_none());
        assert!(config.pbc());
        assert!(config.rmsd().is_empty());
        assert!(config.rmsd_groups().is_empty());
        assert_eq!(config.rmsd_reference(), RmsdReference::Structure);

        let analysis = DomainRmsf::from(&config);
        assert!(analysis.rmsd().is_empty());
        assert!(analysis.pbc());
    }

    #[test]
    fn rmsd_of_selection() {
        let config = Config::from_string(
            "structure: system.gro\ntrajectory: md.xtc\nselection: name CA\noutput_yaml: rmsf.yaml\noutput_rmsd: rmsd.xvg\n",
        )
        .unwrap();

        assert_eq!(config.rmsd_groups(), vec![("name CA", "name CA")]);
        let analysis = DomainRmsf::from(&config);
        assert_eq!(analysis.rmsd().get("name CA").map(String::as_str), Some("name CA"));
    }

    #[test]
    fn full() {
        let yaml = "
structure: system.tpr
trajectory:
  - md1.xtc
  - md2.dcd
ndx: index.ndx
selection: '@protein'
domains:
  - resid 1 to 50
  - resid 51 to 100
start: 5
stop: 15
stride: 2
superpose: false
center: reference
pbc: false
rmsd:
  Calpha: name CA
  All atoms (noH): not name r'^H'
rmsd_reference: first_frame
output_yaml: rmsf.yaml
output_xvg: rmsf.xvg
output_rmsd: rmsd.xvg
output_gyration: gyration.xvg
";
        let config = Config::from_string(yaml).unwrap();
        assert_eq!(config.trajectory().len(), 2);
        assert_eq!(config.domains()[1], "resid 51 to 100");
        assert_eq!(config.bounds(), FrameBounds::new(Some(5), Some(15)));
        assert_eq!(config.stride(), 2);
        assert!(!config.superpose());
        assert_eq!(config.center(), FluctuationCenter::Reference);

        let analysis = DomainRmsf::from(&config);
        assert_eq!(analysis.structure(), &PathBuf::from("system.tpr"));
        assert_eq!(analysis.trajectories(), config.trajectory());
        assert_eq!(analysis.ndx(), &Some(PathBuf::from("index.ndx")));
        assert_eq!(analysis.domains(), config.domains());
        assert_eq!(analysis.bounds(), config.bounds());
        assert_eq!(analysis.stride(), 2);
        assert!(!analysis.superpose());
        assert_eq!(analysis.center(), FluctuationCenter::Reference);
        assert!(!analysis.pbc());
        assert_eq!(analysis.rmsd_reference(), RmsdReference::FirstFrame);
        assert_eq!(
            analysis
                .rmsd()
                .iter()
                .map(|(name, query)| (name.as_str(), query.as_str()))
                .collect::<Vec<_>>(),
            vec![("Calpha", "name CA"), ("All atoms (noH)", "not name r'^H'")]
        );
        assert!(analysis.gyration());
    }

    #[test]
    fn invalid() {
        let base = "structure: system.gro\nselection: all\noutput_yaml: rmsf.yaml\n";

        assert!(matches!(
            Config::from_string(&format!("{}trajectory: md.xtc\nunknown: 1\n", base)),
            Err(ConfigError::CouldNotParse(_))
        ));
        assert!(matches!(
            Config::from_string(base),
            Err(ConfigError::CouldNotParse(_))
        ));
        assert_eq!(
            Config::from_string(&format!("{}trajectory: md.xtc\nstride: 0\n", base)),
            Err(ConfigError::InvalidStride(0))
        );
        assert_eq!(
            Config::from_string(&format!("{}trajectory: md.xtc\nstart: 10\nstop: 10\n", base)),
            Err(ConfigError::InvalidFrameRange(10, 10))
        );
        assert_eq!(
            Config::from_string(&format!("{}trajectory: []\n", base)),
            Err(ConfigError::NoTrajectory)
        );
        assert!(matches!(
            Config::from_string(&format!("{}trajectory: md.xtc\ncenter: median\n", base)),
            Err(ConfigError::CouldNotParse(_))
        ));
    }

    #[test]
    fn from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "structure: test_files/peptide.gro\ntrajectory: test_files/peptide_traj.gro\nselection: '@backbone'\ndomains: [Domain_1, Domain_2]\nndx: test_files/peptide.ndx\noutput_yaml: rmsf.yaml\n"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let results = DomainRmsf::from(&config).run().unwrap();
        assert_eq!(results.domain_rmsf().as_ref().unwrap().len(), 12);

        assert!(matches!(
            Config::from_file("test_files/nonexistent.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
