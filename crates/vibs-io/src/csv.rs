//! CSV output for FRF curves and mode shape coordinates.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use num_complex::Complex64;
use vibs_solver::{ModalError, ShapeSink, mag2db};

use crate::error::{IoError, Result};

/// Write `frequency,real,imag,magnitude_db` rows.
pub fn write_frf<W: Write>(out: &mut W, frequencies: &[f64], h: &[Complex64]) -> Result<()> {
    if frequencies.len() != h.len() {
        return Err(IoError::InvalidData(format!(
            "{} frequencies for {} FRF samples",
            frequencies.len(),
            h.len()
        )));
    }
    writeln!(out, "frequency,real,imag,magnitude_db")?;
    for (f, x) in frequencies.iter().zip(h) {
        writeln!(out, "{},{},{},{}", f, x.re, x.im, mag2db(x.norm()))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_frf_file(path: impl AsRef<Path>, frequencies: &[f64], h: &[Complex64]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_frf(&mut writer, frequencies, h)?;
    log::info!("wrote {} FRF rows to {}", h.len(), path.display());
    Ok(())
}

/// Mode shape sink writing `label,station,x,y` rows.
pub struct CsvShapeSink<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> CsvShapeSink<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "label,station,x,y")?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl CsvShapeSink<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> ShapeSink for CsvShapeSink<W> {
    type Error = IoError;

    fn accept(&mut self, label: &str, x: &[f64], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(ModalError::DimensionMismatch {
                context: "shape coordinates",
                expected: x.len(),
                found: y.len(),
            }
            .into());
        }
        for (station, (xi, yi)) in x.iter().zip(y).enumerate() {
            writeln!(self.writer, "{},{},{},{}", label, station, xi, yi)?;
            self.rows += 1;
        }
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
