//! File formats for modal runs: TOML job configs, JSON reports, CSV tables
//! and the fixed-layout text summary.

pub mod config;
pub mod csv;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod text;

pub use config::{DampingSection, FrfSection, JobConfig, ModelSpec, OutputSection, load_config};
pub use csv::{CsvShapeSink, write_frf, write_frf_file};
pub use error::{IoError, Result};
pub use pipeline::{JobOutputs, JobRun, compare_reports, run_job};
pub use report::{ModalReport, ModeRecord, load_report, save_report};
pub use text::{write_mac, write_matrix, write_summary};
