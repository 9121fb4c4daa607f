use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use vibs_io::{IoError, JobConfig, JobRun, compare_reports, load_config, run_job};

#[derive(Parser, Debug)]
#[command(name = "vibs", about = "Modal analysis and FRF synthesis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a TOML job file
    Run {
        #[arg(short, long)]
        config: PathBuf,

        /// Override the configured output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the built-in two-DOF beam
    Example {
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
    /// Compare mode shapes of two saved reports
    Mac { a: PathBuf, b: PathBuf },
}

fn run(config: &JobConfig, directory: &Path) -> Result<(), IoError> {
    let mut stdout = std::io::stdout().lock();
    let JobRun { results, outputs, .. } = run_job(config, directory, &mut stdout)?;

    for (mode, omega) in results.natural_frequencies.iter().enumerate() {
        log::info!("mode {}: omega = {:.4} rad/s", mode + 1, omega);
    }
    println!("report: {}", outputs.report.display());
    println!("frf: {}", outputs.frf.display());
    println!("shapes: {}", outputs.shapes.display());
    Ok(())
}

fn compare(a: &Path, b: &Path) -> Result<(), IoError> {
    let pairs = compare_reports(a, b, &mut std::io::stdout().lock())?;
    log::info!("{} mode pair(s) matched", pairs.len());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Warn
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger init failed: {err}");
    }

    let outcome = match &cli.command {
        Command::Run { config, output } => load_config(config).and_then(|config| {
            let directory = output.clone().unwrap_or_else(|| config.output.directory.clone());
            run(&config, &directory)
        }),
        Command::Example { output } => {
            let config = JobConfig {
                name: "beam2dof".to_string(),
                ..JobConfig::default()
            };
            run(&config, output)
        }
        Command::Mac { a, b } => compare(a, b),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
