//! Modal analysis and frequency response synthesis for lumped structural
//! models.
//!
//! Pipeline:
//! 1. [`BeamParameters::build`] (or [`SystemMatrices::new`]) gives M and K
//! 2. [`ModalSolver`] solves K·v = d·M·v for mass-normalized modes
//! 3. [`ProportionalDamping`] turns ω into damping factors and complex poles
//! 4. [`frf()`] sums pole-residue terms over a frequency sweep
//!
//! [`ModalAnalysis`] chains steps 2–4. Mode shape coordinates for plotting come
//! from [`ModeShapeGeometry`], [`mac_matrix`] compares mode sets, and
//! [`search`] snaps measured points onto model stations.

pub mod analysis;
pub mod damping;
pub mod error;
pub mod frf;
pub mod mac;
pub mod modal;
pub mod model;
pub mod shapes;
pub mod snap;

pub use analysis::{AnalysisResults, ModalAnalysis};
pub use damping::{DampedModes, ProportionalDamping};
pub use error::{ModalError, Result};
pub use frf::{
    FrequencySweep, frf, frf_single_mode, mag2db, magnitude_db, residue_matrices, residue_matrix,
};
pub use mac::{mac_matrix, pair_modes};
pub use modal::{ModalResults, ModalSolver, to_hz};
pub use model::{BeamParameters, SystemMatrices};
pub use shapes::{ModeShapeGeometry, ShapeSink};
pub use snap::{search, search_all, snap};

pub use num_complex::Complex64;
