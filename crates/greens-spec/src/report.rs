use std::path::Path;

use greens_core::{GreensError, RunProvenance, SpectrumCurve};
use log::info;
use serde::{Deserialize, Serialize};

use crate::extract::{extract_data, Extraction, NormPolicy, SourceSummary};
use crate::hash::stable_hash_string;
use crate::params::SpectralParameters;
use crate::synth::synthesise_parallel;

fn default_threads() -> usize {
    1
}

/// Aggregated configuration for a spectrum analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisOpts {
    /// Broadening and sampling parameters.
    #[serde(default)]
    pub params: SpectralParameters,
    /// How norms from several reports are reconciled.
    #[serde(default)]
    pub norm_policy: NormPolicy,
    /// Worker threads used for synthesis; 1 keeps everything on the caller.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for AnalysisOpts {
    fn default() -> Self {
        Self {
            params: SpectralParameters::default(),
            norm_policy: NormPolicy::default(),
            threads: default_threads(),
        }
    }
}

/// Shape diagnostics for a synthesised curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveSummary {
    /// Frequency of the highest sample (first one on ties).
    pub peak_omega: f64,
    /// Intensity of the highest sample.
    pub peak_intensity: f64,
    /// Trapezoidal integral of the curve over the sampled window.
    pub integrated_intensity: f64,
}

impl CurveSummary {
    /// Computes the summary; `None` for an empty curve.
    pub fn from_curve(curve: &SpectrumCurve) -> Option<Self> {
        let points = curve.points();
        let first = points.first()?;
        let peak = points.iter().fold(*first, |best, point| {
            if point.intensity > best.intensity {
                *point
            } else {
                best
            }
        });
        let integrated_intensity = points
            .windows(2)
            .map(|pair| {
                let width = pair[1].omega - pair[0].omega;
                width * (pair[0].intensity + pair[1].intensity) / 2.0
            })
            .sum();
        Some(Self {
            peak_omega: peak.omega,
            peak_intensity: peak.intensity,
            integrated_intensity,
        })
    }
}

/// Deterministic spectrum analysis bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrumReport {
    /// Content addressed hash of parameters, inputs and curve.
    pub analysis_hash: String,
    /// Parameters used for synthesis.
    pub params: SpectralParameters,
    /// Policy used to reconcile norms.
    pub norm_policy: NormPolicy,
    /// Norm applied to every pair.
    pub norm: f64,
    /// Pairs extracted over all reports.
    pub pair_count: usize,
    /// Pairs that contributed to the curve.
    pub retained_pairs: usize,
    /// Per-report extraction records.
    pub sources: Vec<SourceSummary>,
    /// Peak and area diagnostics.
    pub summary: CurveSummary,
    /// Sampled spectral function.
    pub curve: SpectrumCurve,
    /// Provenance information describing the run.
    pub provenance: RunProvenance,
}

/// Synthesises a report from an existing extraction.
pub fn build_report(
    extraction: Extraction,
    opts: &AnalysisOpts,
) -> Result<SpectrumReport, GreensError> {
    let curve = synthesise_parallel(
        &extraction.pairs,
        extraction.norm,
        &opts.params,
        opts.threads,
    )?;
    let summary = CurveSummary::from_curve(&curve)
        .ok_or_else(|| GreensError::config("empty-curve", "synthesis produced no samples"))?;
    let retained_pairs = extraction
        .pairs
        .len()
        .saturating_sub(opts.params.first_retained());
    let inputs = extraction
        .sources
        .iter()
        .map(|source| source.path.clone())
        .collect();

    let mut report = SpectrumReport {
        analysis_hash: String::new(),
        params: opts.params.clone(),
        norm_policy: opts.norm_policy,
        norm: extraction.norm,
        pair_count: extraction.pairs.len(),
        retained_pairs,
        sources: extraction.sources,
        summary,
        curve,
        provenance: RunProvenance::new(
            inputs,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        ),
    };
    report.analysis_hash = stable_hash_string(&(
        &report.params,
        &report.norm_policy,
        report.norm,
        &report.sources,
        &report.curve,
    ))?;
    info!(
        "spectrum: {} samples, peak {:.6} at omega {:.6}",
        report.curve.len(),
        report.summary.peak_intensity,
        report.summary.peak_omega
    );
    Ok(report)
}

/// Extracts every report and synthesises the combined spectrum.
pub fn analyze_reports<P: AsRef<Path>>(
    paths: &[P],
    opts: &AnalysisOpts,
) -> Result<SpectrumReport, GreensError> {
    let extraction = extract_data(paths, opts.params.lowdin_cutoff, opts.norm_policy)?;
    build_report(extraction, opts)
}
