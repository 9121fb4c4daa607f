//! End-to-end modal pipeline: (M, K) → modes → damping → residues → FRF.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::damping::{DampedModes, ProportionalDamping};
use crate::error::{ModalError, Result};
use crate::frf::{self, FrequencySweep};
use crate::modal::{ModalResults, ModalSolver, to_hz};
use crate::model::SystemMatrices;

/// Everything derived from one (M, K, ζ) triple
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    /// Number of degrees of freedom
    pub num_dofs: usize,
    /// Eigenpairs and modal mass/stiffness
    pub modes: ModalResults,
    /// Undamped natural frequencies ω (rad/s)
    pub natural_frequencies: DVector<f64>,
    /// Damping factors, damped frequencies and poles
    pub damped: DampedModes,
    /// Per-mode residue matrices (N × N complex)
    pub residues: Vec<DMatrix<Complex64>>,
}

impl AnalysisResults {
    /// Undamped natural frequencies in Hz.
    pub fn frequencies_hz(&self) -> Vec<f64> {
        self.natural_frequencies.iter().copied().map(to_hz).collect()
    }

    /// FRF H[output, input] summed over all modes.
    pub fn frf(
        &self,
        sweep: &FrequencySweep,
        output_dof: usize,
        input_dof: usize,
    ) -> Result<Vec<Complex64>> {
        frf::frf(&self.residues, &self.damped.poles, sweep.values(), output_dof, input_dof)
    }

    /// FRF H[output, input] of a single mode.
    pub fn frf_single_mode(
        &self,
        mode: usize,
        sweep: &FrequencySweep,
        output_dof: usize,
        input_dof: usize,
    ) -> Result<Vec<Complex64>> {
        let residue = self.residues.get(mode).ok_or(ModalError::ModeOutOfRange {
            index: mode,
            num_modes: self.residues.len(),
        })?;
        let pole = self.damped.poles[mode];
        frf::frf_single_mode(residue, pole, sweep.values(), output_dof, input_dof)
    }
}

/// Modal analysis pipeline orchestrator
pub struct ModalAnalysis {
    damping: ProportionalDamping,
}

impl Default for ModalAnalysis {
    fn default() -> Self {
        Self::new(ProportionalDamping::default())
    }
}

impl ModalAnalysis {
    pub fn new(damping: ProportionalDamping) -> Self {
        Self { damping }
    }

    /// Run the full pipeline on the given system.
    ///
    /// # Errors
    /// Propagates `SingularMassMatrix` and `ComplexFrequency` from the modal
    /// solve, and `RigidBodyMode` for unconstrained models.
    pub fn run(&self, system: &SystemMatrices) -> Result<AnalysisResults> {
        log::info!(
            "modal analysis: {} DOFs, damping ratio {}",
            system.num_dofs(),
            self.damping.ratio()
        );

        let modes = ModalSolver::new(system).solve()?;
        let natural_frequencies = modes.natural_frequencies()?;
        let damped = self.damping.apply(&natural_frequencies);
        let residues = frf::residue_matrices(&modes, &damped)?;

        for (mode, pole) in damped.poles.iter().enumerate() {
            log::debug!(
                "mode {}: d={:.6e}, omega={:.6}, pole={:.6}{:+.6}i",
                mode + 1,
                modes.eigenvalues[mode],
                natural_frequencies[mode],
                pole.re,
                pole.im
            );
        }

        Ok(AnalysisResults {
            num_dofs: system.num_dofs(),
            modes,
            natural_frequencies,
            damped,
            residues,
        })
    }
}
