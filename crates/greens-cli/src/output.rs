use std::error::Error;
use std::io::Write;

use clap::ValueEnum;
use greens_spec::{to_canonical_json_bytes, SpectrumReport};

const OMEGA_HEADER: &str = "Omega";
const SPECTRUM_HEADER: &str = "Spectrum";

/// Rendering used for the curve on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Right-aligned `Omega`/`Spectrum` columns.
    Table,
    /// Comma separated `Omega,Spectrum` rows.
    Csv,
    /// The full report as canonical JSON.
    Json,
}

/// Writes the curve of `report` in the requested format.
pub fn write_curve<W: Write>(
    out: &mut W,
    report: &SpectrumReport,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Table => write_table(out, report),
        OutputFormat::Csv => write_csv(out, report),
        OutputFormat::Json => {
            out.write_all(&to_canonical_json_bytes(report)?)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_table<W: Write>(out: &mut W, report: &SpectrumReport) -> Result<(), Box<dyn Error>> {
    let rows: Vec<(String, String)> = report
        .curve
        .iter()
        .map(|point| (format!("{:.6}", point.omega), format!("{:.6}", point.intensity)))
        .collect();
    let omega_width = rows
        .iter()
        .map(|(omega, _)| omega.len())
        .fold(OMEGA_HEADER.len(), usize::max);
    let spectrum_width = rows
        .iter()
        .map(|(_, spectrum)| spectrum.len())
        .fold(SPECTRUM_HEADER.len(), usize::max);

    writeln!(
        out,
        "{:>omega_width$}  {:>spectrum_width$}",
        OMEGA_HEADER, SPECTRUM_HEADER
    )?;
    for (omega, spectrum) in rows {
        writeln!(out, "{:>omega_width$}  {:>spectrum_width$}", omega, spectrum)?;
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, report: &SpectrumReport) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([OMEGA_HEADER, SPECTRUM_HEADER])?;
    for point in report.curve.iter() {
        writer.write_record(&[point.omega.to_string(), point.intensity.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
