//! Mode shape coordinates for plotting.
//!
//! The drawing surface is external. This module only produces `(x, y)` arrays:
//! the undeformed line (stations along the axis, y = 0) and one deformed line
//! per mode with y = scale·v[:, mode].

use nalgebra::DMatrix;

use crate::error::{ModalError, Result};
use crate::modal::ModalResults;
use crate::snap;

/// Receiver of labelled `(x, y)` coordinate arrays, e.g. a plot or CSV file.
pub trait ShapeSink {
    type Error;

    fn accept(
        &mut self,
        label: &str,
        x: &[f64],
        y: &[f64],
    ) -> std::result::Result<(), Self::Error>;
}

/// DOF stations along the structure axis
#[derive(Debug, Clone, PartialEq)]
pub struct ModeShapeGeometry {
    stations: Vec<f64>,
}

impl ModeShapeGeometry {
    pub fn new(stations: Vec<f64>) -> Self {
        Self { stations }
    }

    /// `num_dofs` stations spaced `spacing` apart, starting at 0
    pub fn uniform(num_dofs: usize, spacing: f64) -> Self {
        Self {
            stations: (0..num_dofs).map(|i| i as f64 * spacing).collect(),
        }
    }

    pub fn stations(&self) -> &[f64] {
        &self.stations
    }

    /// DOF index of the station nearest to axis position `x`.
    ///
    /// # Errors
    /// `EmptyPointSet` when there are no stations.
    pub fn nearest_station(&self, x: f64) -> Result<usize> {
        let points = DMatrix::from_column_slice(self.stations.len(), 1, &self.stations);
        snap::search(&points, &[x])
    }

    /// Undeformed coordinates (x, 0)
    pub fn undeformed(&self) -> (Vec<f64>, Vec<f64>) {
        (self.stations.clone(), vec![0.0; self.stations.len()])
    }

    /// Deformed y-coordinates of one mode: undeformed + scale·mode shape.
    ///
    /// # Errors
    /// - `ModeOutOfRange` for an unknown mode index
    /// - `DimensionMismatch` if the station count differs from the DOF count
    pub fn deformed(&self, modes: &ModalResults, mode: usize, scale: f64) -> Result<Vec<f64>> {
        let shape = modes.mode_shape(mode).ok_or(ModalError::ModeOutOfRange {
            index: mode,
            num_modes: modes.num_modes,
        })?;
        if shape.len() != self.stations.len() {
            return Err(ModalError::DimensionMismatch {
                context: "mode shape stations",
                expected: shape.len(),
                found: self.stations.len(),
            });
        }
        let (_, base) = self.undeformed();
        Ok(base.iter().zip(shape.iter()).map(|(y0, v)| y0 + scale * v).collect())
    }

    /// Send the undeformed line and every mode to `sink`.
    ///
    /// Labels are `undeformed` and `mode 1`, `mode 2`, ...
    pub fn render<S>(
        &self,
        modes: &ModalResults,
        scale: f64,
        sink: &mut S,
    ) -> std::result::Result<(), S::Error>
    where
        S: ShapeSink,
        S::Error: From<ModalError>,
    {
        let (x, y) = self.undeformed();
        sink.accept("undeformed", &x, &y)?;
        for mode in 0..modes.num_modes {
            let y = self.deformed(modes, mode, scale)?;
            sink.accept(&format!("mode {}", mode + 1), &x, &y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BeamParameters;
    use crate::modal::ModalSolver;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(String, Vec<f64>, Vec<f64>)>,
    }

    impl ShapeSink for Recorder {
        type Error = ModalError;

        fn accept(&mut self, label: &str, x: &[f64], y: &[f64]) -> Result<()> {
            self.lines.push((label.to_string(), x.to_vec(), y.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn renders_undeformed_then_each_mode() {
        let params = BeamParameters::default();
        let modes = ModalSolver::new(&params.build()).solve().unwrap();
        let geometry = ModeShapeGeometry::new(params.stations());

        let mut recorder = Recorder::default();
        geometry.render(&modes, 1.0, &mut recorder).unwrap();

        let labels: Vec<&str> = recorder.lines.iter().map(|(l, _, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["undeformed", "mode 1", "mode 2"]);
        assert_eq!(recorder.lines[0].1, vec![0.0, 1200.0]);
        assert_eq!(recorder.lines[0].2, vec![0.0, 0.0]);

        let shape = modes.mode_shape(1).unwrap();
        assert_eq!(recorder.lines[2].2, vec![shape[0], shape[1]]);
    }

    #[test]
    fn deformed_applies_scale() {
        let params = BeamParameters::default();
        let modes = ModalSolver::new(&params.build()).solve().unwrap();
        let geometry = ModeShapeGeometry::uniform(2, 1.0);

        let y = geometry.deformed(&modes, 0, 10.0).unwrap();
        let shape = modes.mode_shape(0).unwrap();
        assert!((y[0] - 10.0 * shape[0]).abs() < 1e-15);
        assert!((y[1] - 10.0 * shape[1]).abs() < 1e-15);
    }

    #[test]
    fn station_count_must_match() {
        let params = BeamParameters::default();
        let modes = ModalSolver::new(&params.build()).solve().unwrap();
        let geometry = ModeShapeGeometry::uniform(3, 1.0);

        assert!(matches!(
            geometry.deformed(&modes, 0, 1.0),
            Err(ModalError::DimensionMismatch { .. })
        ));
        assert_eq!(
            geometry.deformed(&modes, 4, 1.0),
            Err(ModalError::ModeOutOfRange { index: 4, num_modes: 2 })
        );
    }

    #[test]
    fn measured_position_snaps_to_station() {
        let geometry = ModeShapeGeometry::new(BeamParameters::default().stations());
        assert_eq!(geometry.nearest_station(100.0).unwrap(), 0);
        assert_eq!(geometry.nearest_station(1150.0).unwrap(), 1);
        assert_eq!(
            ModeShapeGeometry::new(Vec::new()).nearest_station(1.0),
            Err(ModalError::EmptyPointSet)
        );
    }
}
