use std::f64::consts::PI;

use greens_core::{EigenPair, ErrorInfo, GreensError, PairSet, SpectrumCurve, SpectrumPoint};
use log::debug;
use rayon::prelude::*;

use crate::params::SpectralParameters;

fn synth_error(code: &str, message: impl Into<String>) -> GreensError {
    GreensError::Config(ErrorInfo::new(code, message))
}

/// Lorentzian of half-width `broadening` centred on `centre` with total area `weight`.
pub fn lorentzian(x: f64, centre: f64, broadening: f64, weight: f64) -> f64 {
    let offset = x - centre;
    (broadening * weight) / (PI * (broadening * broadening + offset * offset))
}

fn check_norm(norm: f64) -> Result<(), GreensError> {
    if !norm.is_finite() || norm == 0.0 {
        return Err(GreensError::Config(
            ErrorInfo::new(
                "invalid-norm",
                "initial wave function norm must be finite and non-zero",
            )
            .with_context("norm", norm.to_string()),
        ));
    }
    Ok(())
}

/// Validates the inputs and returns the retained pairs with the sample count.
fn prepare<'a>(
    pairs: &'a PairSet,
    norm: f64,
    params: &SpectralParameters,
) -> Result<(&'a [EigenPair], usize), GreensError> {
    params.validate()?;
    check_norm(norm)?;
    let retained = pairs.tail(params.first_retained());
    if retained.is_empty() {
        return Err(GreensError::Config(
            ErrorInfo::new("no-retained-pairs", "no eigenpairs left to broaden")
                .with_context("pairs", pairs.len().to_string())
                .with_context("include_ground", params.include_ground.to_string()),
        ));
    }
    let samples = params.sample_count()?;
    debug!(
        "synthesising {} samples over {} of {} pairs",
        samples,
        retained.len(),
        pairs.len()
    );
    Ok((retained, samples))
}

fn intensity_at(
    omega: f64,
    retained: &[EigenPair],
    norm: f64,
    params: &SpectralParameters,
) -> f64 {
    let shifted = omega + params.reference_energy;
    retained
        .iter()
        .map(|pair| {
            lorentzian(
                shifted,
                pair.eigenvalue,
                params.broadening,
                pair.normalised_weight(norm),
            )
        })
        .sum()
}

/// Broadens the discrete spectrum into a curve sampled on the frequency grid.
///
/// Each retained pair contributes a unit-area Lorentzian centred at
/// `eigenvalue - reference_energy`, scaled by `(weight / norm)^2`. The first
/// pair is skipped unless `include_ground` is set. An empty retained set is
/// rejected rather than rendered as a zero curve.
pub fn synthesise(
    pairs: &PairSet,
    norm: f64,
    params: &SpectralParameters,
) -> Result<SpectrumCurve, GreensError> {
    let (retained, samples) = prepare(pairs, norm, params)?;
    let mut points = Vec::with_capacity(samples);
    for idx in 0..samples {
        let omega = params.omega_at(idx);
        points.push(SpectrumPoint {
            omega,
            intensity: intensity_at(omega, retained, norm, params),
        });
    }
    Ok(points.into())
}

/// Same curve as [`synthesise`], with samples spread over `threads` workers.
pub fn synthesise_parallel(
    pairs: &PairSet,
    norm: f64,
    params: &SpectralParameters,
    threads: usize,
) -> Result<SpectrumCurve, GreensError> {
    if threads <= 1 {
        return synthesise(pairs, norm, params);
    }
    let (retained, samples) = prepare(pairs, norm, params)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| synth_error("thread-pool", err.to_string()))?;

    let points: Vec<SpectrumPoint> = pool.install(|| {
        (0..samples)
            .into_par_iter()
            .map(|idx| {
                let omega = params.omega_at(idx);
                SpectrumPoint {
                    omega,
                    intensity: intensity_at(omega, retained, norm, params),
                }
            })
            .collect()
    });
    Ok(points.into())
}
