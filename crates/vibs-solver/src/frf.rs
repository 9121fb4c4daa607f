//! Frequency response synthesis in pole-residue (partial-fraction) form.
//!
//! Each mode r contributes a complex-conjugate pole pair:
//!
//! ```text
//! H_oi(f) = Σ_r [ A_r[o,i] / (i·f - p_r) + conj(A_r[o,i]) / (i·f - conj(p_r)) ]
//! A_r     = v_r·v_rᵀ / (2i·Mr_rr·wn_r)
//! ```
//!
//! `f` is an angular frequency in the same units as the poles. The multi-mode
//! FRF is by construction the sum of the single-mode FRFs.
//!
//! Known singularity: with ζ = 0 the poles lie on the imaginary axis, and a
//! sweep sample equal to ±wn divides by zero. The resulting non-finite sample
//! is returned as-is.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::damping::DampedModes;
use crate::error::{ModalError, Result};
use crate::modal::ModalResults;

/// Real frequency samples for FRF evaluation.
///
/// Values may be in any order; [`FrequencySweep::linear`] gives evenly spaced
/// samples with `linspace` semantics (both endpoints included).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySweep {
    values: Vec<f64>,
}

impl FrequencySweep {
    /// `points` evenly spaced samples from `start` to `stop` inclusive.
    ///
    /// # Errors
    /// `InvalidSweep` when `points` is zero or an endpoint is not finite.
    pub fn linear(start: f64, stop: f64, points: usize) -> Result<Self> {
        if points == 0 {
            return Err(ModalError::InvalidSweep("at least one point required".to_string()));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(ModalError::InvalidSweep(format!(
                "endpoints must be finite, got [{start}, {stop}]"
            )));
        }
        if points == 1 {
            return Ok(Self { values: vec![start] });
        }
        let step = (stop - start) / (points - 1) as f64;
        let mut values: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
        values[points - 1] = stop;
        Ok(Self { values })
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index and value of the sample nearest to `target`.
    pub fn nearest(&self, target: f64) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a - target).abs().total_cmp(&(b - target).abs()))
    }
}

/// Residue matrix of a single mode: qr·v·vᵀ with qr = 1/(2i·mr·wn).
///
/// `damped_frequency` must be non-zero; a zero `wn` yields NaN entries.
pub fn residue_matrix(
    mode_shape: &DVector<f64>,
    modal_mass: f64,
    damped_frequency: f64,
) -> DMatrix<Complex64> {
    let qr = (Complex64::i() * (2.0 * modal_mass * damped_frequency)).inv();
    let outer = mode_shape * mode_shape.transpose();
    outer.map(|v| qr * v)
}

/// Residue matrices for every mode, using the raw modal mass diagonal.
///
/// # Errors
/// - `DimensionMismatch` if `modes` and `damped` disagree on the mode count
/// - `RigidBodyMode` for a zero-frequency mode, whose `wn` is zero
pub fn residue_matrices(
    modes: &ModalResults,
    damped: &DampedModes,
) -> Result<Vec<DMatrix<Complex64>>> {
    if damped.num_modes() != modes.num_modes {
        return Err(ModalError::DimensionMismatch {
            context: "damped modes vs modal results",
            expected: modes.num_modes,
            found: damped.num_modes(),
        });
    }
    if let Some(mode) = (0..modes.num_modes)
        .find(|&r| modes.is_rigid_body(r) || damped.damped_frequencies[r] == 0.0)
    {
        return Err(ModalError::RigidBodyMode { mode });
    }
    Ok((0..modes.num_modes)
        .map(|r| {
            let shape: DVector<f64> = modes.mode_shapes.column(r).into_owned();
            residue_matrix(&shape, modes.modal_mass[(r, r)], damped.damped_frequencies[r])
        })
        .collect())
}

/// Contribution of one pole pair at frequency `f`.
fn pole_pair_term(residue: Complex64, pole: Complex64, f: f64) -> Complex64 {
    let jf = Complex64::new(0.0, f);
    residue / (jf - pole) + residue.conj() / (jf - pole.conj())
}

fn check_dof(residue: &DMatrix<Complex64>, index: usize) -> Result<()> {
    let num_dofs = residue.nrows();
    if index >= num_dofs || index >= residue.ncols() {
        return Err(ModalError::DofOutOfRange { index, num_dofs });
    }
    Ok(())
}

/// FRF of a single mode for the (output, input) DOF pair.
///
/// # Errors
/// `DofOutOfRange` if either DOF index exceeds the residue matrix size.
pub fn frf_single_mode(
    residue: &DMatrix<Complex64>,
    pole: Complex64,
    sweep: &[f64],
    output_dof: usize,
    input_dof: usize,
) -> Result<Vec<Complex64>> {
    check_dof(residue, output_dof)?;
    check_dof(residue, input_dof)?;
    let a = residue[(output_dof, input_dof)];
    Ok(sweep.par_iter().map(|&f| pole_pair_term(a, pole, f)).collect())
}

/// FRF summed over all modes for the (output, input) DOF pair.
///
/// # Errors
/// - `DimensionMismatch` if residue and pole counts differ, or residue
///   matrices differ in size
/// - `DofOutOfRange` for DOF indices outside the residue matrices
pub fn frf(
    residues: &[DMatrix<Complex64>],
    poles: &[Complex64],
    sweep: &[f64],
    output_dof: usize,
    input_dof: usize,
) -> Result<Vec<Complex64>> {
    if residues.len() != poles.len() {
        return Err(ModalError::DimensionMismatch {
            context: "poles vs residue matrices",
            expected: residues.len(),
            found: poles.len(),
        });
    }
    if let Some(first) = residues.first() {
        check_dof(first, output_dof)?;
        check_dof(first, input_dof)?;
        if let Some(bad) = residues.iter().find(|a| a.shape() != first.shape()) {
            return Err(ModalError::DimensionMismatch {
                context: "residue matrix size",
                expected: first.nrows(),
                found: bad.nrows(),
            });
        }
    }

    let terms: Vec<(Complex64, Complex64)> = residues
        .iter()
        .zip(poles)
        .map(|(a, &pole)| (a[(output_dof, input_dof)], pole))
        .collect();

    let h: Vec<Complex64> = sweep
        .par_iter()
        .map(|&f| {
            terms
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &(a, pole)| acc + pole_pair_term(a, pole, f))
        })
        .collect();

    let singular = h.iter().filter(|x| !x.is_finite()).count();
    if singular > 0 {
        log::warn!(
            "FRF H[{},{}]: {} sample(s) coincide with an undamped pole",
            output_dof,
            input_dof,
            singular
        );
    }
    Ok(h)
}

/// Magnitude in decibels, 20·log10(|x|). Returns -∞ for x = 0.
pub fn mag2db(x: f64) -> f64 {
    20.0 * x.abs().log10()
}

/// Elementwise dB magnitude of a complex FRF.
pub fn magnitude_db(h: &[Complex64]) -> Vec<f64> {
    h.iter().map(|x| mag2db(x.norm())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_mode_setup() -> (Vec<DMatrix<Complex64>>, Vec<Complex64>) {
        let v1 = DVector::from_vec(vec![0.3, 0.3]);
        let v2 = DVector::from_vec(vec![0.3, -0.3]);
        let poles = vec![Complex64::new(-0.58, 11.6), Complex64::new(-0.60, 12.05)];
        let residues = vec![
            residue_matrix(&v1, 1.0, poles[0].im),
            residue_matrix(&v2, 1.0, poles[1].im),
        ];
        (residues, poles)
    }

    #[test]
    fn linear_sweep_matches_linspace() {
        let sweep = FrequencySweep::linear(0.0, 1.0, 5).unwrap();
        assert_eq!(sweep.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);

        let single = FrequencySweep::linear(3.0, 9.0, 1).unwrap();
        assert_eq!(single.values(), &[3.0]);

        assert!(FrequencySweep::linear(0.0, 1.0, 0).is_err());
        assert!(FrequencySweep::linear(0.0, f64::NAN, 10).is_err());
    }

    #[test]
    fn nearest_finds_closest_sample() {
        let sweep = FrequencySweep::from_values(vec![5.0, 1.0, 3.0, 9.0]);
        assert_eq!(sweep.nearest(2.8), Some((2, 3.0)));
        assert_eq!(sweep.nearest(100.0), Some((3, 9.0)));
        assert_eq!(FrequencySweep::from_values(Vec::new()).nearest(1.0), None);
    }

    #[test]
    fn residue_scaling() {
        let v = DVector::from_vec(vec![1.0, 2.0]);
        let a = residue_matrix(&v, 1.0, 0.5);
        // qr = 1/(2i·0.5) = -i
        assert!((a[(0, 0)] - Complex64::new(0.0, -1.0)).norm() < 1e-15);
        assert!((a[(0, 1)] - Complex64::new(0.0, -2.0)).norm() < 1e-15);
        assert!((a[(1, 1)] - Complex64::new(0.0, -4.0)).norm() < 1e-15);
        assert_eq!(a[(0, 1)], a[(1, 0)]);
    }

    #[test]
    fn multi_mode_is_sum_of_single_modes() {
        let (residues, poles) = two_mode_setup();
        let sweep = FrequencySweep::linear(0.0, 25.0, 201).unwrap();

        let total = frf(&residues, &poles, sweep.values(), 0, 1).unwrap();
        let first = frf_single_mode(&residues[0], poles[0], sweep.values(), 0, 1).unwrap();
        let second = frf_single_mode(&residues[1], poles[1], sweep.values(), 0, 1).unwrap();

        for k in 0..sweep.len() {
            let sum = first[k] + second[k];
            assert!((total[k] - sum).norm() <= 1e-12 * sum.norm().max(1.0));
        }
    }

    #[test]
    fn conjugate_symmetry_in_frequency() {
        let (residues, poles) = two_mode_setup();
        let freqs: Vec<f64> = vec![0.5, 4.0, 11.6, 12.0, 20.0];
        let negative: Vec<f64> = freqs.iter().map(|f| -f).collect();

        let h_pos = frf(&residues, &poles, &freqs, 1, 0).unwrap();
        let h_neg = frf(&residues, &poles, &negative, 1, 0).unwrap();
        for (p, n) in h_pos.iter().zip(&h_neg) {
            assert!((n - p.conj()).norm() < 1e-12 * p.norm().max(1.0));
        }
    }

    #[test]
    fn out_of_range_dof_is_rejected() {
        let (residues, poles) = two_mode_setup();
        let err = frf(&residues, &poles, &[1.0], 2, 0).expect_err("dof 2 of 2");
        assert_eq!(err, ModalError::DofOutOfRange { index: 2, num_dofs: 2 });

        let err = frf_single_mode(&residues[0], poles[0], &[1.0], 0, 5).expect_err("dof 5");
        assert_eq!(err, ModalError::DofOutOfRange { index: 5, num_dofs: 2 });
    }

    #[test]
    fn pole_count_must_match_residues() {
        let (residues, poles) = two_mode_setup();
        let err = frf(&residues, &poles[..1], &[1.0], 0, 0).expect_err("one pole short");
        assert!(matches!(err, ModalError::DimensionMismatch { .. }));
    }

    #[test]
    fn undamped_pole_on_sweep_is_singular() {
        let v = DVector::from_vec(vec![1.0]);
        let pole = Complex64::new(0.0, 2.0);
        let a = residue_matrix(&v, 1.0, 2.0);
        let h = frf(&[a], &[pole], &[1.0, 2.0], 0, 0).unwrap();
        assert!(h[0].is_finite());
        assert!(!h[1].is_finite());
    }

    #[test]
    fn free_free_system_has_no_residues() {
        use crate::damping::ProportionalDamping;
        use crate::modal::ModalSolver;
        use crate::model::SystemMatrices;

        let k = DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let system = SystemMatrices::new(DMatrix::identity(2, 2), k).unwrap();
        let modes = ModalSolver::new(&system).solve().unwrap();
        let damped = ProportionalDamping::default().apply(&modes.natural_frequencies().unwrap());

        let err = residue_matrices(&modes, &damped).expect_err("rigid-body mode");
        assert_eq!(err, ModalError::RigidBodyMode { mode: 0 });
    }

    #[test]
    fn decibel_conversion() {
        assert_eq!(mag2db(1.0), 0.0);
        assert!((mag2db(10.0) - 20.0).abs() < 1e-12);
        assert!((mag2db(0.1) + 20.0).abs() < 1e-12);
        assert_eq!(mag2db(0.0), f64::NEG_INFINITY);

        let db = magnitude_db(&[Complex64::new(3.0, 4.0)]);
        assert!((db[0] - 20.0 * 5.0_f64.log10()).abs() < 1e-12);
    }
}
