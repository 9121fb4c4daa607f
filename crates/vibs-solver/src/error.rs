//! Error types for vibs-solver

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModalError {
    #[error("Mass matrix is not positive definite (Cholesky decomposition failed)")]
    SingularMassMatrix,

    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{matrix} matrix must be square, got {rows}x{cols}")]
    NotSquare {
        matrix: &'static str,
        rows: usize,
        cols: usize,
    },

    #[error("{matrix} matrix is not symmetric (max asymmetry {asymmetry:.3e})")]
    NotSymmetric { matrix: &'static str, asymmetry: f64 },

    #[error("System has no degrees of freedom")]
    EmptySystem,

    #[error("Mode {mode} has negative eigenvalue {eigenvalue:.6e}; natural frequency is complex")]
    ComplexFrequency { mode: usize, eigenvalue: f64 },

    #[error("Damping ratio must be finite and non-negative, got {0}")]
    InvalidDampingRatio(f64),

    #[error("DOF index {index} out of range for a {num_dofs}-DOF system")]
    DofOutOfRange { index: usize, num_dofs: usize },

    #[error("Mode index {index} out of range ({num_modes} modes available)")]
    ModeOutOfRange { index: usize, num_modes: usize },

    #[error("Mode {mode} is a rigid-body mode with zero natural frequency")]
    RigidBodyMode { mode: usize },

    #[error("Point set is empty")]
    EmptyPointSet,

    #[error("Invalid frequency sweep: {0}")]
    InvalidSweep(String),

    #[error("Eigenvalue decomposition failed: {0}")]
    Decomposition(String),
}
