//! Calculate and output a spectral function from the eigenvalues and spectral
//! weights printed by a KP-FCIQMC calculation.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use greens_spec::{analyze_reports, to_canonical_json_bytes};
use log::debug;

mod config;
mod output;

use config::{resolve_opts, NormPolicyArg};
use output::{write_curve, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "greens-analysis",
    version,
    about = "Broaden KP-FCIQMC eigenvalues and spectral weights into a spectral function"
)]
pub struct Cli {
    /// KP-FCIQMC output files to read eigenvalues and overlaps from.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
    /// Include the ground state in the spectrum.
    #[arg(short = 'g', long = "inc-ground")]
    pub inc_ground: bool,
    /// The minimum omega to output results for.
    #[arg(short = 'm', long = "min-plot", allow_negative_numbers = true)]
    pub minval: Option<f64>,
    /// The maximum omega to output results for.
    #[arg(short = 'n', long = "max-plot", allow_negative_numbers = true)]
    pub maxval: Option<f64>,
    /// The resolution in omega to plot.
    #[arg(short = 'd', long = "delta-omega")]
    pub delta: Option<f64>,
    /// The broadening factor to be used.
    #[arg(short = 'b', long)]
    pub broadening: Option<f64>,
    /// The number of eigenvectors kept in the Lowdin orthogonalisation procedure.
    #[arg(short = 'l', long = "lowdin-cutoff")]
    pub cutoff: Option<u32>,
    /// The ground-state energy of the unperturbed system.
    #[arg(short = 'r', long = "ref-energy", allow_negative_numbers = true)]
    pub ref_energy: Option<f64>,
    /// YAML file with spectral parameters; flags take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// How norms from several input files are combined.
    #[arg(long, value_enum, default_value_t = NormPolicyArg::LastWins)]
    pub norm_policy: NormPolicyArg,
    /// Largest accepted norm difference under `--norm-policy consistent`.
    #[arg(long, default_value_t = 1e-9, allow_negative_numbers = true)]
    pub norm_tolerance: f64,
    /// Worker threads used for synthesis.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
    /// Also write the full JSON report to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .try_init();
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    if cli.files.is_empty() {
        let help = Cli::command().render_help();
        write!(io::stderr(), "{help}")?;
        return Ok(ExitCode::FAILURE);
    }
    run(&cli)?;
    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let opts = resolve_opts(cli)?;
    debug!("resolved options: {:?}", opts);
    let report = analyze_reports(cli.files.as_slice(), &opts)?;

    if let Some(path) = &cli.report {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, to_canonical_json_bytes(&report)?)?;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_curve(&mut handle, &report, cli.format)?;
    handle.flush()?;
    Ok(())
}
