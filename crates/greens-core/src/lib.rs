#![deny(missing_docs)]
#![doc = "Core data types and errors shared by the greens spectral function tools."]

pub mod errors;
pub mod provenance;
mod types;

pub use errors::{ErrorInfo, GreensError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use types::{EigenPair, PairSet, SpectrumCurve, SpectrumPoint};
