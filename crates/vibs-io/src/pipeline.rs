//! Config-driven modal run writing every output file.

use std::io::Write;
use std::path::{Path, PathBuf};

use vibs_solver::{AnalysisResults, ModalAnalysis, SystemMatrices, mac_matrix, pair_modes};

use crate::config::JobConfig;
use crate::csv::{CsvShapeSink, write_frf_file};
use crate::error::Result;
use crate::report::{ModalReport, load_report, save_report};
use crate::text::{write_mac, write_summary};

/// Files produced by [`run_job`]
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutputs {
    pub report: PathBuf,
    pub frf: PathBuf,
    pub shapes: PathBuf,
}

/// Solved job kept in memory
#[derive(Debug, Clone)]
pub struct JobRun {
    pub system: SystemMatrices,
    pub results: AnalysisResults,
    pub outputs: JobOutputs,
}

/// Build, solve and write `<name>.json`, `<name>_frf.csv` and
/// `<name>_shapes.csv` under `directory`. The text summary goes to `summary`.
pub fn run_job<W: Write>(config: &JobConfig, directory: &Path, summary: &mut W) -> Result<JobRun> {
    let (system, geometry) = config.model.build()?;
    let damping = config.damping()?;
    let sweep = config.sweep()?;

    let results = ModalAnalysis::new(damping).run(&system)?;
    write_summary(summary, &config.name, &system, &results)?;

    let outputs = JobOutputs {
        report: directory.join(format!("{}.json", config.name)),
        frf: directory.join(format!("{}_frf.csv", config.name)),
        shapes: directory.join(format!("{}_shapes.csv", config.name)),
    };

    save_report(&outputs.report, &ModalReport::from_results(&config.name, &results))?;
    log::info!("wrote report {}", outputs.report.display());

    let h = results.frf(&sweep, config.frf.output_dof, config.frf.input_dof)?;
    write_frf_file(&outputs.frf, sweep.values(), &h)?;

    let mut sink = CsvShapeSink::create(&outputs.shapes)?;
    geometry.render(&results.modes, config.output.shape_scale, &mut sink)?;
    log::info!("wrote {} shape rows to {}", sink.rows(), outputs.shapes.display());
    sink.finish()?;

    Ok(JobRun {
        system,
        results,
        outputs,
    })
}

/// MAC between the mode shapes of two saved reports, written to `out`.
/// Returns the `(a mode, b mode)` pairing.
pub fn compare_reports<W: Write>(
    a: &Path,
    b: &Path,
    out: &mut W,
) -> Result<Vec<(usize, usize)>> {
    let shapes_a = load_report(a)?.mode_shapes()?;
    let shapes_b = load_report(b)?.mode_shapes()?;
    let mac = mac_matrix(&shapes_a, &shapes_b)?;
    let pairs = pair_modes(&shapes_a, &shapes_b)?;
    write_mac(out, &mac, &pairs)?;
    Ok(pairs)
}
