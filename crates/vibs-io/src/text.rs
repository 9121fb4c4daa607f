//! Fixed-layout text summary of a modal run.
//!
//! Matrices print one row per line in `{:13.6E}` columns; per-mode tables use
//! one row per mode.

use std::io::{self, Write};

use nalgebra::DMatrix;
use vibs_solver::{AnalysisResults, SystemMatrices, to_hz};

/// Write a labelled matrix block.
pub fn write_matrix<W: Write>(out: &mut W, label: &str, matrix: &DMatrix<f64>) -> io::Result<()> {
    writeln!(out, " {} ({}x{})", label, matrix.nrows(), matrix.ncols())?;
    for row in matrix.row_iter() {
        for value in row.iter() {
            write!(out, " {:13.6E}", value)?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Write M, K, the eigen solution, modal matrices and poles.
pub fn write_summary<W: Write>(
    out: &mut W,
    job_name: &str,
    system: &SystemMatrices,
    results: &AnalysisResults,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "                        M O D A L   A N A L Y S I S")?;
    writeln!(out)?;
    writeln!(out, " job: {}", job_name)?;
    writeln!(out, " degrees of freedom: {}", results.num_dofs)?;
    writeln!(out, " damping ratio: {}", results.damped.ratio)?;
    writeln!(out)?;

    write_matrix(out, "mass matrix M", system.mass())?;
    write_matrix(out, "stiffness matrix K", system.stiffness())?;
    write_matrix(out, "mode shapes v", &results.modes.mode_shapes)?;
    write_matrix(out, "modal mass Mr", &results.modes.modal_mass)?;
    write_matrix(out, "modal stiffness Kr", &results.modes.modal_stiffness)?;

    writeln!(
        out,
        " {:>5} {:>13} {:>13} {:>13} {:>13} {:>13}",
        "MODE", "EIGENVALUE", "OMEGA", "FREQ (HZ)", "DAMPF", "WN"
    )?;
    for mode in 0..results.modes.num_modes {
        let omega = results.natural_frequencies[mode];
        writeln!(
            out,
            " {:5} {:13.6E} {:13.6E} {:13.6E} {:13.6E} {:13.6E}",
            mode + 1,
            results.modes.eigenvalues[mode],
            omega,
            to_hz(omega),
            results.damped.damping_factors[mode],
            results.damped.damped_frequencies[mode]
        )?;
    }
    writeln!(out)?;

    writeln!(out, " {:>5} {:>13} {:>13}", "MODE", "POLE RE", "POLE IM")?;
    for (mode, pole) in results.damped.poles.iter().enumerate() {
        writeln!(out, " {:5} {:13.6E} {:13.6E}", mode + 1, pole.re, pole.im)?;
    }
    writeln!(out)
}

/// Write a MAC matrix followed by one line per `(u1, u2)` mode pair.
pub fn write_mac<W: Write>(
    out: &mut W,
    mac: &DMatrix<f64>,
    pairs: &[(usize, usize)],
) -> io::Result<()> {
    writeln!(out, " MAC ({}x{})", mac.nrows(), mac.ncols())?;
    for row in mac.row_iter() {
        for value in row.iter() {
            write!(out, " {:8.5}", value)?;
        }
        writeln!(out)?;
    }
    for &(i, j) in pairs {
        writeln!(out, "mode {} -> mode {} (MAC {:.5})", i + 1, j + 1, mac[(i, j)])?;
    }
    Ok(())
}
