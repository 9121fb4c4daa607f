use std::fs;
use std::io;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use vibs_solver::{AnalysisResults, to_hz};

use crate::error::{IoError, Result};

/// Per-mode summary row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeRecord {
    pub mode: usize,
    pub eigenvalue: f64,
    pub natural_frequency: f64,
    pub frequency_hz: f64,
    pub damping_factor: f64,
    pub damped_frequency: f64,
    /// Pole as [re, im]
    pub pole: [f64; 2],
    pub shape: Vec<f64>,
}

/// Serializable snapshot of a modal run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModalReport {
    pub schema_version: u32,
    pub job_name: String,
    pub generated_at: String,
    pub num_dofs: usize,
    pub damping_ratio: f64,
    pub modes: Vec<ModeRecord>,
    /// Raw vᵀMv, row-major
    pub modal_mass: Vec<Vec<f64>>,
    /// Raw vᵀKv, row-major
    pub modal_stiffness: Vec<Vec<f64>>,
}

impl ModalReport {
    pub fn from_results(job_name: impl Into<String>, results: &AnalysisResults) -> Self {
        let modes = (0..results.modes.num_modes)
            .map(|r| {
                let omega = results.natural_frequencies[r];
                let pole = results.damped.poles[r];
                ModeRecord {
                    mode: r + 1,
                    eigenvalue: results.modes.eigenvalues[r],
                    natural_frequency: omega,
                    frequency_hz: to_hz(omega),
                    damping_factor: results.damped.damping_factors[r],
                    damped_frequency: results.damped.damped_frequencies[r],
                    pole: [pole.re, pole.im],
                    shape: results.modes.mode_shapes.column(r).iter().copied().collect(),
                }
            })
            .collect();

        Self {
            schema_version: 1,
            job_name: job_name.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            num_dofs: results.num_dofs,
            damping_ratio: results.damped.ratio,
            modes,
            modal_mass: matrix_rows(&results.modes.modal_mass),
            modal_stiffness: matrix_rows(&results.modes.modal_stiffness),
        }
    }

    /// Mode shapes as an `[ndof × nmodes]` matrix, for MAC comparisons.
    pub fn mode_shapes(&self) -> Result<DMatrix<f64>> {
        if let Some(bad) = self.modes.iter().find(|m| m.shape.len() != self.num_dofs) {
            return Err(IoError::InvalidData(format!(
                "mode {} has {} shape entries, expected {}",
                bad.mode,
                bad.shape.len(),
                self.num_dofs
            )));
        }
        Ok(DMatrix::from_fn(self.num_dofs, self.modes.len(), |i, j| {
            self.modes[j].shape[i]
        }))
    }
}

fn matrix_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

pub fn save_report(path: impl AsRef<Path>, report: &ModalReport) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec_pretty(report)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, bytes)
}

pub fn load_report(path: impl AsRef<Path>) -> io::Result<ModalReport> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
