use greens_core::{ErrorInfo, GreensError};
use serde::{Deserialize, Serialize};

/// Largest number of samples a single curve may hold.
pub const MAX_SAMPLES: usize = 1 << 26;

fn default_max_frequency() -> f64 {
    4.0
}

fn default_step() -> f64 {
    0.01
}

fn default_broadening() -> f64 {
    0.1
}

fn default_lowdin_cutoff() -> u32 {
    5
}

fn invalid(code: &str, message: impl Into<String>, field: &str, value: f64) -> GreensError {
    GreensError::Config(
        ErrorInfo::new(code, message)
            .with_context("field", field)
            .with_context("value", value.to_string()),
    )
}

/// Parameters controlling how the discrete spectrum is broadened and sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralParameters {
    /// First sampled frequency.
    #[serde(default, alias = "minval")]
    pub min_frequency: f64,
    /// Upper end of the sampled window.
    #[serde(default = "default_max_frequency", alias = "maxval")]
    pub max_frequency: f64,
    /// Spacing between samples.
    #[serde(default = "default_step", alias = "delta")]
    pub step: f64,
    /// Lorentzian half-width.
    #[serde(default = "default_broadening")]
    pub broadening: f64,
    /// Offset added to every sample frequency before comparing to eigenvalues.
    #[serde(default, alias = "ref_energy")]
    pub reference_energy: f64,
    /// Keep the first (ground-state) pair in the sum.
    #[serde(default, alias = "inc_ground")]
    pub include_ground: bool,
    /// Number of eigenvectors kept upstream; selects which data block to read.
    #[serde(default = "default_lowdin_cutoff", alias = "cutoff")]
    pub lowdin_cutoff: u32,
}

impl Default for SpectralParameters {
    fn default() -> Self {
        Self {
            min_frequency: 0.0,
            max_frequency: default_max_frequency(),
            step: default_step(),
            broadening: default_broadening(),
            reference_energy: 0.0,
            include_ground: false,
            lowdin_cutoff: default_lowdin_cutoff(),
        }
    }
}

impl SpectralParameters {
    /// Checks the numeric invariants required for synthesis.
    pub fn validate(&self) -> Result<(), GreensError> {
        let fields = [
            ("min_frequency", self.min_frequency),
            ("max_frequency", self.max_frequency),
            ("step", self.step),
            ("broadening", self.broadening),
            ("reference_energy", self.reference_energy),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(
                    "non-finite-parameter",
                    "spectral parameters must be finite",
                    field,
                    value,
                ));
            }
        }
        if self.step <= 0.0 {
            return Err(invalid(
                "invalid-step",
                "frequency step must be strictly positive",
                "step",
                self.step,
            ));
        }
        if self.max_frequency < self.min_frequency {
            return Err(GreensError::Config(
                ErrorInfo::new(
                    "invalid-range",
                    "maximum frequency must not be below the minimum frequency",
                )
                .with_context("min_frequency", self.min_frequency.to_string())
                .with_context("max_frequency", self.max_frequency.to_string()),
            ));
        }
        if self.broadening <= 0.0 {
            return Err(invalid(
                "invalid-broadening",
                "broadening must be strictly positive",
                "broadening",
                self.broadening,
            ));
        }
        Ok(())
    }

    /// Number of sample points, `ceil((max - min) / step) + 1`.
    pub fn sample_count(&self) -> Result<usize, GreensError> {
        self.validate()?;
        let span = ((self.max_frequency - self.min_frequency) / self.step).ceil();
        if span >= MAX_SAMPLES as f64 {
            return Err(GreensError::Config(
                ErrorInfo::new("invalid-step", "frequency window holds too many samples")
                    .with_context("step", self.step.to_string())
                    .with_context("samples", span.to_string())
                    .with_context("max_samples", MAX_SAMPLES.to_string()),
            ));
        }
        Ok(span as usize + 1)
    }

    /// Frequency of sample `index`.
    pub fn omega_at(&self, index: usize) -> f64 {
        self.min_frequency + index as f64 * self.step
    }

    /// Index of the first retained pair: 0 with the ground state, 1 without.
    pub fn first_retained(&self) -> usize {
        if self.include_ground {
            0
        } else {
            1
        }
    }
}
