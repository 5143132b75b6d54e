use std::error::Error;
use std::fs;

use clap::ValueEnum;
use greens_spec::{from_yaml_str, AnalysisOpts, NormPolicy, SpectralParameters};

use crate::Cli;

/// Command line spelling of [`NormPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormPolicyArg {
    /// Later files overwrite the norm of earlier ones.
    LastWins,
    /// All files must report the same norm.
    Consistent,
}

/// Layers defaults, the optional YAML file and explicit flags, in that order.
pub fn resolve_opts(cli: &Cli) -> Result<AnalysisOpts, Box<dyn Error>> {
    let mut params = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            from_yaml_str::<SpectralParameters>(&contents)?
        }
        None => SpectralParameters::default(),
    };

    if cli.inc_ground {
        params.include_ground = true;
    }
    if let Some(value) = cli.minval {
        params.min_frequency = value;
    }
    if let Some(value) = cli.maxval {
        params.max_frequency = value;
    }
    if let Some(value) = cli.delta {
        params.step = value;
    }
    if let Some(value) = cli.broadening {
        params.broadening = value;
    }
    if let Some(value) = cli.cutoff {
        params.lowdin_cutoff = value;
    }
    if let Some(value) = cli.ref_energy {
        params.reference_energy = value;
    }
    params.validate()?;

    let norm_policy = match cli.norm_policy {
        NormPolicyArg::LastWins => NormPolicy::LastWins,
        NormPolicyArg::Consistent => NormPolicy::Consistent {
            tolerance: cli.norm_tolerance,
        },
    };
    norm_policy.validate()?;

    Ok(AnalysisOpts {
        params,
        norm_policy,
        threads: cli.threads.max(1),
    })
}
