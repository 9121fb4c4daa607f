//! TOML job configuration.
//!
//! ```toml
//! name = "beam2dof"
//!
//! [model]
//! kind = "beam"          # or "matrices"
//! span = 1200.0          # any BeamParameters field, defaults otherwise
//!
//! [damping]
//! ratio = 0.05
//!
//! [frf]
//! start = 0.0
//! stop = 25.0
//! points = 1001
//! output_dof = 0
//! input_dof = 0
//!
//! [output]
//! directory = "results"
//! shape_scale = 1.0
//! ```
//!
//! A `matrices` model takes `mass` and `stiffness` as lists of rows and
//! optional `stations` for mode shape coordinates.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vibs_solver::{
    BeamParameters, FrequencySweep, ModeShapeGeometry, ProportionalDamping, SystemMatrices,
};

use crate::error::{IoError, Result};

/// Structural model source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelSpec {
    /// Two-DOF beam built from physical parameters
    Beam(BeamParameters),
    /// Explicit N×N mass and stiffness matrices
    Matrices {
        mass: Vec<Vec<f64>>,
        stiffness: Vec<Vec<f64>>,
        #[serde(default)]
        stations: Option<Vec<f64>>,
    },
}

impl Default for ModelSpec {
    fn default() -> Self {
        ModelSpec::Beam(BeamParameters::default())
    }
}

impl ModelSpec {
    /// Mass/stiffness matrices and DOF stations for this model.
    pub fn build(&self) -> Result<(SystemMatrices, ModeShapeGeometry)> {
        match self {
            ModelSpec::Beam(params) => {
                Ok((params.build(), ModeShapeGeometry::new(params.stations())))
            }
            ModelSpec::Matrices {
                mass,
                stiffness,
                stations,
            } => {
                let system = SystemMatrices::from_rows(mass, stiffness)?;
                let geometry = match stations {
                    Some(x) if x.len() == system.num_dofs() => ModeShapeGeometry::new(x.clone()),
                    Some(x) => {
                        return Err(IoError::InvalidData(format!(
                            "{} stations given for a {}-DOF model",
                            x.len(),
                            system.num_dofs()
                        )));
                    }
                    None => ModeShapeGeometry::uniform(system.num_dofs(), 1.0),
                };
                Ok((system, geometry))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingSection {
    pub ratio: f64,
}

impl Default for DampingSection {
    fn default() -> Self {
        Self { ratio: 0.05 }
    }
}

/// Frequency sweep and DOF pair for FRF synthesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrfSection {
    /// First sweep frequency (rad/s)
    pub start: f64,
    /// Last sweep frequency (rad/s)
    pub stop: f64,
    pub points: usize,
    pub output_dof: usize,
    pub input_dof: usize,
}

impl Default for FrfSection {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: 25.0,
            points: 1001,
            output_dof: 0,
            input_dof: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub directory: PathBuf,
    /// Multiplier applied to mode shapes in the deformed coordinates
    pub shape_scale: f64,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("results"),
            shape_scale: 1.0,
        }
    }
}

/// Complete description of one modal run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    #[serde(default = "default_job_name")]
    pub name: String,
    #[serde(default)]
    pub model: ModelSpec,
    #[serde(default)]
    pub damping: DampingSection,
    #[serde(default)]
    pub frf: FrfSection,
    #[serde(default)]
    pub output: OutputSection,
}

fn default_job_name() -> String {
    "modal".to_string()
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: default_job_name(),
            model: ModelSpec::default(),
            damping: DampingSection::default(),
            frf: FrfSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl JobConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn damping(&self) -> Result<ProportionalDamping> {
        Ok(ProportionalDamping::new(self.damping.ratio)?)
    }

    pub fn sweep(&self) -> Result<FrequencySweep> {
        Ok(FrequencySweep::linear(self.frf.start, self.frf.stop, self.frf.points)?)
    }
}

/// Read and parse a TOML job file.
pub fn load_config(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    log::info!("loading config {}", path.display());
    let raw = fs::read_to_string(path)?;
    JobConfig::from_toml_str(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_beam_defaults() {
        let config = JobConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, JobConfig::default());
        assert_eq!(config.model, ModelSpec::Beam(BeamParameters::default()));
        assert_eq!(config.damping.ratio, 0.05);
    }

    #[test]
    fn parses_partial_beam_section() {
        let raw = r#"
            name = "stiff"

            [model]
            kind = "beam"
            left_spring_scale = 0.0

            [frf]
            stop = 40.0
            points = 11
            output_dof = 1
        "#;
        let config = JobConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.name, "stiff");
        let ModelSpec::Beam(params) = config.model else {
            panic!("expected beam model");
        };
        assert_eq!(params.left_spring_scale, 0.0);
        assert_eq!(params.right_spring_scale, 300.0);
        assert_eq!(config.frf.stop, 40.0);
        assert_eq!(config.frf.start, 0.0);
        assert_eq!(config.frf.output_dof, 1);
        assert_eq!(config.sweep().unwrap().len(), 11);
    }

    #[test]
    fn parses_matrix_model() {
        let raw = r#"
            [model]
            kind = "matrices"
            mass = [[2.0, 0.0], [0.0, 1.0]]
            stiffness = [[6.0, -2.0], [-2.0, 4.0]]
            stations = [0.0, 3.5]
        "#;
        let config = JobConfig::from_toml_str(raw).unwrap();
        let (system, geometry) = config.model.build().unwrap();
        assert_eq!(system.num_dofs(), 2);
        assert_eq!(system.stiffness()[(0, 1)], -2.0);
        assert_eq!(geometry.stations(), &[0.0, 3.5]);
    }

    #[test]
    fn matrix_model_without_stations_uses_unit_spacing() {
        let spec = ModelSpec::Matrices {
            mass: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            stiffness: vec![vec![2.0, -1.0, 0.0], vec![-1.0, 2.0, -1.0], vec![0.0, -1.0, 1.0]],
            stations: None,
        };
        let (_, geometry) = spec.build().unwrap();
        assert_eq!(geometry.stations(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn station_count_mismatch_is_invalid() {
        let spec = ModelSpec::Matrices {
            mass: vec![vec![1.0]],
            stiffness: vec![vec![1.0]],
            stations: Some(vec![0.0, 1.0]),
        };
        assert!(matches!(spec.build(), Err(IoError::InvalidData(_))));
    }

    #[test]
    fn rejects_unknown_model_kind() {
        let raw = r#"
            [model]
            kind = "plate"
        "#;
        assert!(matches!(JobConfig::from_toml_str(raw), Err(IoError::Toml(_))));
    }

    #[test]
    fn negative_damping_is_a_modal_error() {
        let raw = r#"
            [damping]
            ratio = -0.2
        "#;
        let config = JobConfig::from_toml_str(raw).unwrap();
        assert!(matches!(config.damping(), Err(IoError::Modal(_))));
    }
}
