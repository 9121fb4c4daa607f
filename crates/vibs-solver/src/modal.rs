//! Modal analysis: natural frequencies and mass-normalized mode shapes.
//!
//! Solves the undamped free-vibration eigenproblem
//!
//! ```text
//! (K - λM)φ = 0
//! ```
//!
//! with λ = ω² and φ the mode shape. The pencil (K, M) is symmetric with M
//! positive definite, so it is reduced to a standard symmetric problem:
//!
//! 1. M = L·Lᵀ (Cholesky)
//! 2. K* = L⁻¹·K·L⁻ᵀ
//! 3. K*·ψ = λ·ψ (symmetric eigen-solve, real λ, orthonormal ψ)
//! 4. φ = L⁻ᵀ·ψ
//!
//! Orthonormal ψ makes φᵀMφ = I, so the modal matrix comes out mass-normalized
//! without a separate scaling pass.
//!
//! # Example
//! ```no_run
//! use vibs_solver::{BeamParameters, ModalSolver};
//!
//! let system = BeamParameters::default().build();
//! let modes = ModalSolver::new(&system).solve().expect("modal analysis failed");
//! for (i, f) in modes.frequencies_hz().unwrap().iter().enumerate() {
//!     println!("Mode {}: {:.3} Hz", i + 1, f);
//! }
//! ```

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::{ModalError, Result};
use crate::model::SystemMatrices;

/// Eigenvalues within this fraction of the largest one are treated as zero
/// when taking square roots (rigid-body modes carry tiny negative round-off).
const ZERO_EIGENVALUE_TOLERANCE: f64 = 1e-12;

/// Angular frequency (rad/s) to Hz.
pub fn to_hz(omega: f64) -> f64 {
    omega / (2.0 * std::f64::consts::PI)
}

/// Results from modal analysis
#[derive(Debug, Clone, PartialEq)]
pub struct ModalResults {
    /// Eigenvalues d = ω², sorted ascending
    pub eigenvalues: DVector<f64>,
    /// Mass-normalized mode shapes, one column per mode (N × N)
    pub mode_shapes: DMatrix<f64>,
    /// Modal mass vᵀMv, raw (identity up to round-off)
    pub modal_mass: DMatrix<f64>,
    /// Modal stiffness vᵀKv, raw (diag(d) up to round-off)
    pub modal_stiffness: DMatrix<f64>,
    /// Number of modes computed
    pub num_modes: usize,
}

impl ModalResults {
    /// Get the i-th mode shape as a vector
    pub fn mode_shape(&self, mode_index: usize) -> Option<DVector<f64>> {
        if mode_index >= self.num_modes {
            return None;
        }
        Some(self.mode_shapes.column(mode_index).into())
    }

    /// Undamped natural frequencies ω = √d (rad/s).
    ///
    /// # Errors
    /// `ComplexFrequency` if an eigenvalue is negative beyond round-off, which
    /// means K is indefinite (unstable or inadequately constrained model).
    pub fn natural_frequencies(&self) -> Result<DVector<f64>> {
        let mut omega = DVector::zeros(self.num_modes);
        for (mode, &d) in self.eigenvalues.iter().enumerate() {
            if d < 0.0 && d >= -self.zero_threshold() {
                log::warn!("mode {}: eigenvalue {:.3e} treated as zero", mode + 1, d);
            }
            omega[mode] = self
                .omega_from_eigenvalue(d)
                .ok_or(ModalError::ComplexFrequency { mode, eigenvalue: d })?;
        }
        Ok(omega)
    }

    /// Angular frequency (rad/s) of one mode, `None` for an out-of-range index
    /// or an eigenvalue negative beyond round-off.
    pub fn angular_frequency(&self, mode_index: usize) -> Option<f64> {
        self.eigenvalues
            .get(mode_index)
            .and_then(|&d| self.omega_from_eigenvalue(d))
    }

    /// True when the mode's eigenvalue is zero up to round-off.
    pub fn is_rigid_body(&self, mode_index: usize) -> bool {
        self.eigenvalues
            .get(mode_index)
            .is_some_and(|d| d.abs() <= self.zero_threshold())
    }

    /// Natural frequencies in Hz (ω / 2π)
    pub fn frequencies_hz(&self) -> Result<Vec<f64>> {
        Ok(self.natural_frequencies()?.iter().copied().map(to_hz).collect())
    }

    fn zero_threshold(&self) -> f64 {
        ZERO_EIGENVALUE_TOLERANCE * self.eigenvalues.amax().max(1.0)
    }

    fn omega_from_eigenvalue(&self, d: f64) -> Option<f64> {
        if d >= 0.0 {
            Some(d.sqrt())
        } else if d >= -self.zero_threshold() {
            Some(0.0)
        } else {
            None
        }
    }

    /// Largest off-diagonal magnitude of Kr relative to its largest diagonal
    /// entry. Zero in exact arithmetic.
    pub fn stiffness_coupling(&self) -> f64 {
        relative_off_diagonal(&self.modal_stiffness)
    }

    /// Largest deviation of Mr from the identity.
    pub fn mass_normalization_error(&self) -> f64 {
        (&self.modal_mass - DMatrix::identity(self.num_modes, self.num_modes)).amax()
    }
}

/// Modal analysis solver
pub struct ModalSolver<'a> {
    system: &'a SystemMatrices,
}

impl<'a> ModalSolver<'a> {
    /// Create a new modal solver for the given M and K.
    pub fn new(system: &'a SystemMatrices) -> Self {
        Self { system }
    }

    /// Solve the generalized eigenproblem and project M, K onto the modes.
    ///
    /// # Errors
    /// - `SingularMassMatrix` if M is not positive definite
    /// - `Decomposition` if the triangular back-substitution fails
    pub fn solve(&self) -> Result<ModalResults> {
        let m = self.system.mass();
        let k = self.system.stiffness();
        let n = self.system.num_dofs();

        let (eigenvalues, mode_shapes) = self.solve_eigenvalue_problem(k, m)?;

        let modal_mass = mode_shapes.transpose() * m * &mode_shapes;
        let modal_stiffness = mode_shapes.transpose() * k * &mode_shapes;

        log::debug!(
            "modal solve: {} modes, |Mr - I| = {:.3e}, Kr coupling = {:.3e}",
            n,
            (&modal_mass - DMatrix::identity(n, n)).amax(),
            relative_off_diagonal(&modal_stiffness)
        );

        Ok(ModalResults {
            eigenvalues,
            mode_shapes,
            modal_mass,
            modal_stiffness,
            num_modes: n,
        })
    }

    /// Solve K*φ = λ*M*φ via Cholesky reduction to a standard symmetric
    /// problem. Returns eigenvalues ascending with matching columns.
    fn solve_eigenvalue_problem(
        &self,
        k: &DMatrix<f64>,
        m: &DMatrix<f64>,
    ) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let chol_m = Cholesky::new(m.clone()).ok_or(ModalError::SingularMassMatrix)?;
        let l = chol_m.l();

        // K* = L⁻¹ K L⁻ᵀ, built from two triangular solves instead of an inverse
        let l_inv_k = l
            .solve_lower_triangular(k)
            .ok_or_else(|| ModalError::Decomposition("L⁻¹K solve failed".to_string()))?;
        let k_star = l
            .solve_lower_triangular(&l_inv_k.transpose())
            .ok_or_else(|| ModalError::Decomposition("L⁻¹KL⁻ᵀ solve failed".to_string()))?;
        let k_star = (&k_star + k_star.transpose()) * 0.5;

        let eigen = SymmetricEigen::new(k_star);

        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let eigenvalues =
            DVector::from_iterator(order.len(), order.iter().map(|&i| eigen.eigenvalues[i]));
        let psi = eigen.eigenvectors.select_columns(&order);

        // φ = L⁻ᵀ ψ
        let phi = l
            .transpose()
            .solve_upper_triangular(&psi)
            .ok_or_else(|| ModalError::Decomposition("L⁻ᵀψ solve failed".to_string()))?;

        Ok((eigenvalues, phi))
    }
}

fn relative_off_diagonal(matrix: &DMatrix<f64>) -> f64 {
    let diag_scale = matrix.diagonal().amax().max(f64::MIN_POSITIVE);
    let mut off = 0.0_f64;
    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            if i != j {
                off = off.max(matrix[(i, j)].abs());
            }
        }
    }
    off / diag_scale
}
