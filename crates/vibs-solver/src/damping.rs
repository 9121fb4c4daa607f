//! Proportional (uniform modal) damping and complex poles.
//!
//! A single damping ratio ζ is applied to every mode:
//!
//! ```text
//! dampf_r = -ζ·ω_r
//! wn_r    = √(ω_r² + dampf_r²)
//! pole_r  = dampf_r + i·wn_r
//! ```
//!
//! For ζ > 0 and ω > 0 every pole sits in the left half-plane; ζ = 0 puts the
//! poles on the imaginary axis at ±i·ω.

use nalgebra::DVector;
use num_complex::Complex64;

use crate::error::{ModalError, Result};

/// Damping ratio applied uniformly to all modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalDamping {
    ratio: f64,
}

impl Default for ProportionalDamping {
    fn default() -> Self {
        Self { ratio: 0.05 }
    }
}

impl ProportionalDamping {
    /// # Errors
    /// `InvalidDampingRatio` for negative or non-finite ratios.
    pub fn new(ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ModalError::InvalidDampingRatio(ratio));
        }
        Ok(Self { ratio })
    }

    /// Undamped model
    pub fn none() -> Self {
        Self { ratio: 0.0 }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Damping factors, damped frequencies and poles for the given undamped
    /// natural frequencies ω (rad/s).
    pub fn apply(&self, natural_frequencies: &DVector<f64>) -> DampedModes {
        let damping_factors = natural_frequencies.map(|omega| -self.ratio * omega);
        let damped_frequencies = natural_frequencies.zip_map(&damping_factors, |omega, dampf| {
            (omega * omega + dampf * dampf).sqrt()
        });
        let poles = damping_factors
            .iter()
            .zip(damped_frequencies.iter())
            .map(|(&dampf, &wn)| Complex64::new(dampf, wn))
            .collect();

        DampedModes {
            ratio: self.ratio,
            damping_factors,
            damped_frequencies,
            poles,
        }
    }
}

/// Per-mode damping quantities derived from ω and ζ
#[derive(Debug, Clone, PartialEq)]
pub struct DampedModes {
    /// Damping ratio ζ used
    pub ratio: f64,
    /// dampf = -ζ·ω
    pub damping_factors: DVector<f64>,
    /// wn = √(ω² + dampf²)
    pub damped_frequencies: DVector<f64>,
    /// pole = dampf + i·wn
    pub poles: Vec<Complex64>,
}

impl DampedModes {
    pub fn num_modes(&self) -> usize {
        self.poles.len()
    }

    /// Poles with their complex conjugates, mode by mode
    pub fn pole_pairs(&self) -> Vec<(Complex64, Complex64)> {
        self.poles.iter().map(|p| (*p, p.conj())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_percent_damping_values() {
        let omega = DVector::from_vec(vec![134.1667_f64.sqrt(), 144.9_f64.sqrt()]);
        assert!((omega[0] - 11.583).abs() < 1e-3);
        assert!((omega[1] - 12.038).abs() < 1e-3);

        let damped = ProportionalDamping::new(0.05).unwrap().apply(&omega);
        assert!((damped.damping_factors[0] + 0.5791).abs() < 1e-4);
        assert!((damped.damping_factors[1] + 0.6019).abs() < 1e-4);
        assert!((damped.damped_frequencies[0] - 11.598).abs() < 1e-3);
        assert!((damped.damped_frequencies[1] - 12.053).abs() < 1e-3);
    }

    #[test]
    fn zero_damping_gives_imaginary_poles() {
        let omega = DVector::from_vec(vec![3.0, 7.5]);
        let damped = ProportionalDamping::none().apply(&omega);
        for (mode, pole) in damped.poles.iter().enumerate() {
            assert_eq!(pole.re, 0.0);
            assert!((pole.im - omega[mode]).abs() < 1e-12);
        }
    }

    #[test]
    fn positive_damping_poles_in_left_half_plane() {
        let omega = DVector::from_vec(vec![1.0, 10.0, 100.0]);
        let damped = ProportionalDamping::new(0.02).unwrap().apply(&omega);
        assert!(damped.poles.iter().all(|p| p.re < 0.0 && p.im > 0.0));
        for (pole, conj) in damped.pole_pairs() {
            assert_eq!(pole.re, conj.re);
            assert_eq!(pole.im, -conj.im);
        }
    }

    #[test]
    fn rejects_invalid_ratios() {
        assert_eq!(
            ProportionalDamping::new(-0.1),
            Err(ModalError::InvalidDampingRatio(-0.1))
        );
        assert!(ProportionalDamping::new(f64::NAN).is_err());
        assert!(ProportionalDamping::new(f64::INFINITY).is_err());
    }
}
