//! Extraction of eigenvalue/overlap tables from KP-FCIQMC reports and
//! synthesis of Lorentzian-broadened spectral functions.

pub mod extract;
pub mod hash;
pub mod params;
pub mod report;
pub mod serde;
pub mod synth;

pub use extract::{
    combine_blocks, data_sentinel, extract_data, extract_file, extract_reader, extract_str,
    Extraction, NormPolicy, ReportBlock, SourceSummary, NORM_SENTINEL,
};
pub use hash::stable_hash_string;
pub use params::{SpectralParameters, MAX_SAMPLES};
pub use report::{analyze_reports, build_report, AnalysisOpts, CurveSummary, SpectrumReport};
pub use crate::serde::{from_json_slice, from_yaml_str, to_canonical_json_bytes, to_yaml_string};
pub use synth::{lorentzian, synthesise, synthesise_parallel};
