//! Lumped mass and stiffness matrices for the discretized beam model.
//!
//! The beam is condensed to two transverse DOFs, one at each end of a single
//! flexural element of span `l`, each end restrained by a boundary spring:
//!
//! ```text
//! I    = b·h³/12
//! mbar = b·h·density/grav
//! M    = (mbar·l/2)·I₂
//! K    = (E·I/l³)·[[12 + s₁, -12], [-12, 12 + s₂]]
//! ```
//!
//! where `s₁`, `s₂` are the boundary-spring scale factors. Any other model can
//! enter the pipeline as explicit matrices through [`SystemMatrices::new`].

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{ModalError, Result};

/// Relative tolerance used when checking that M and K are symmetric.
const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Physical and geometric inputs of the two-DOF beam model.
///
/// Units are whatever consistent system the caller picks; the defaults are the
/// inch-pound-second example (steel bar, 1 in × 12 in section, 100 ft span).
///
/// Preconditions: `width`, `height`, `span`, `elastic_modulus` and `gravity`
/// must be positive. They are not validated; non-positive values produce
/// meaningless (or non-finite) matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamParameters {
    /// Cross-section width (b)
    pub width: f64,
    /// Cross-section height (h)
    pub height: f64,
    /// Young's modulus (E)
    pub elastic_modulus: f64,
    /// Element span (l)
    pub span: f64,
    /// Gravitational constant used to turn weight density into mass
    pub gravity: f64,
    /// Weight density
    pub density: f64,
    /// Left boundary spring, as a multiple of E·I/l³
    pub left_spring_scale: f64,
    /// Right boundary spring, as a multiple of E·I/l³
    pub right_spring_scale: f64,
}

impl Default for BeamParameters {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 12.0,
            elastic_modulus: 29.0e6,
            span: 1200.0,
            gravity: 386.4,
            density: 0.29,
            left_spring_scale: 300.0,
            right_spring_scale: 300.0,
        }
    }
}

impl BeamParameters {
    /// Second moment of area of the rectangular section
    pub fn second_moment_of_area(&self) -> f64 {
        self.width * self.height.powi(3) / 12.0
    }

    /// Mass per unit length (mbar)
    pub fn mass_per_length(&self) -> f64 {
        self.width * self.height * self.density / self.gravity
    }

    /// Mass lumped at each DOF (mbar·l/2)
    pub fn lumped_mass(&self) -> f64 {
        self.mass_per_length() * self.span / 2.0
    }

    /// Flexural stiffness scale E·I/l³
    pub fn flexural_stiffness(&self) -> f64 {
        self.elastic_modulus * self.second_moment_of_area() / self.span.powi(3)
    }

    /// Boundary spring stiffnesses (k1, k2)
    pub fn spring_stiffnesses(&self) -> (f64, f64) {
        let ei_l3 = self.flexural_stiffness();
        (ei_l3 * self.left_spring_scale, ei_l3 * self.right_spring_scale)
    }

    /// DOF stations along the beam axis, used for mode shape coordinates
    pub fn stations(&self) -> Vec<f64> {
        vec![0.0, self.span]
    }

    /// Build the lumped mass and stiffness matrices.
    pub fn build(&self) -> SystemMatrices {
        let ei_l3 = self.flexural_stiffness();
        let (k1, k2) = self.spring_stiffnesses();

        let mut stiffness = DMatrix::from_row_slice(2, 2, &[12.0, -12.0, -12.0, 12.0]) * ei_l3;
        stiffness[(0, 0)] += k1;
        stiffness[(1, 1)] += k2;

        let mass = DMatrix::identity(2, 2) * self.lumped_mass();

        log::debug!(
            "beam model: I={:.6e}, mbar={:.6e}, EI/l^3={:.6e}, k1={:.6e}, k2={:.6e}",
            self.second_moment_of_area(),
            self.mass_per_length(),
            ei_l3,
            k1,
            k2
        );

        SystemMatrices { mass, stiffness }
    }
}

/// Mass and stiffness matrices of an N-DOF model.
///
/// Construction through [`SystemMatrices::new`] guarantees both matrices are
/// square, of equal size N ≥ 1 and symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrices {
    mass: DMatrix<f64>,
    stiffness: DMatrix<f64>,
}

impl SystemMatrices {
    /// Wrap explicit mass and stiffness matrices.
    ///
    /// # Errors
    /// - `NotSquare` if either matrix is not square
    /// - `DimensionMismatch` if M and K differ in size
    /// - `EmptySystem` for 0×0 matrices
    /// - `NotSymmetric` if either matrix is not symmetric
    pub fn new(mass: DMatrix<f64>, stiffness: DMatrix<f64>) -> Result<Self> {
        check_square("Mass", &mass)?;
        check_square("Stiffness", &stiffness)?;
        if mass.nrows() != stiffness.nrows() {
            return Err(ModalError::DimensionMismatch {
                context: "stiffness matrix vs mass matrix",
                expected: mass.nrows(),
                found: stiffness.nrows(),
            });
        }
        if mass.nrows() == 0 {
            return Err(ModalError::EmptySystem);
        }
        check_symmetric("Mass", &mass)?;
        check_symmetric("Stiffness", &stiffness)?;

        Ok(Self { mass, stiffness })
    }

    /// Build from row-major nested vectors, as read from a job file.
    pub fn from_rows(mass: &[Vec<f64>], stiffness: &[Vec<f64>]) -> Result<Self> {
        Self::new(
            rows_to_matrix("mass matrix row length", mass)?,
            rows_to_matrix("stiffness matrix row length", stiffness)?,
        )
    }

    pub fn mass(&self) -> &DMatrix<f64> {
        &self.mass
    }

    pub fn stiffness(&self) -> &DMatrix<f64> {
        &self.stiffness
    }

    /// Number of degrees of freedom (N)
    pub fn num_dofs(&self) -> usize {
        self.mass.nrows()
    }
}

fn check_square(matrix: &'static str, m: &DMatrix<f64>) -> Result<()> {
    if m.nrows() != m.ncols() {
        return Err(ModalError::NotSquare {
            matrix,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}

fn check_symmetric(matrix: &'static str, m: &DMatrix<f64>) -> Result<()> {
    let scale = m.amax().max(f64::MIN_POSITIVE);
    let asymmetry = (m - m.transpose()).amax();
    if !asymmetry.is_finite() || asymmetry > SYMMETRY_TOLERANCE * scale {
        return Err(ModalError::NotSymmetric { matrix, asymmetry });
    }
    Ok(())
}

fn rows_to_matrix(context: &'static str, rows: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|row| row.len() != ncols) {
        return Err(ModalError::DimensionMismatch {
            context,
            expected: ncols,
            found: bad.len(),
        });
    }
    Ok(DMatrix::from_row_iterator(
        nrows,
        ncols,
        rows.iter().flat_map(|row| row.iter().copied()),
    ))
}
