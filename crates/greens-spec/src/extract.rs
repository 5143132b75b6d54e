//! Scanner for the eigenvalue/overlap tables embedded in KP-FCIQMC output.
//!
//! A report carries two tagged regions. The line after the norm sentinel
//! holds the norm of the unperturbed initial wave function; the lines after
//! the data sentinel hold `eigenvalue weight` rows until the next blank line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use greens_core::{EigenPair, ErrorInfo, GreensError, PairSet};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Marks the line preceding the initial wave function norm.
pub const NORM_SENTINEL: &str = "Norm of unperturbed initial wave function";

const DATA_SENTINEL_PREFIX: &str = "Eigenvalues and overlaps when keeping ";

fn default_norm_tolerance() -> f64 {
    1e-9
}

/// Returns the sentinel opening the data block for `cutoff` kept eigenvectors.
pub fn data_sentinel(cutoff: u32) -> String {
    format!("{DATA_SENTINEL_PREFIX}{cutoff}")
}

/// How normalisation scalars from several reports are combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum NormPolicy {
    /// Every report overwrites the previous norm; the last one is used.
    #[default]
    LastWins,
    /// All reports must agree on the norm within `tolerance`.
    Consistent {
        /// Largest accepted absolute difference between two norms.
        #[serde(default = "default_norm_tolerance")]
        tolerance: f64,
    },
}

impl NormPolicy {
    /// Rejects a negative or non-finite tolerance.
    pub fn validate(&self) -> Result<(), GreensError> {
        if let NormPolicy::Consistent { tolerance } = *self {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(GreensError::Config(
                    ErrorInfo::new(
                        "invalid-norm-tolerance",
                        "norm tolerance must be finite and non-negative",
                    )
                    .with_context("tolerance", tolerance.to_string()),
                ));
            }
        }
        Ok(())
    }
}

/// Pairs and norm read from a single report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBlock {
    /// Label of the scanned source, usually its path.
    pub source: String,
    /// Pairs in appearance order.
    pub pairs: PairSet,
    /// Norm of the unperturbed initial wave function.
    pub norm: f64,
}

/// Per-report record kept for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Label of the scanned source.
    pub path: String,
    /// Number of pairs the source contributed.
    pub pairs: usize,
    /// Norm read from the source.
    pub norm: f64,
}

/// Combined result of scanning every input report.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Pairs of all reports, concatenated in input order.
    pub pairs: PairSet,
    /// Norm selected by the [`NormPolicy`].
    pub norm: f64,
    /// One summary per scanned report.
    pub sources: Vec<SourceSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InNormLine,
    InDataBlock,
}

struct Scanner<'a> {
    source: &'a str,
    sentinel: String,
    state: ScanState,
    pairs: PairSet,
    norm: Option<f64>,
    blocks_seen: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, cutoff: u32) -> Self {
        Self {
            source,
            sentinel: data_sentinel(cutoff),
            state: ScanState::Idle,
            pairs: PairSet::new(),
            norm: None,
            blocks_seen: 0,
        }
    }

    fn line_error(&self, code: &str, message: &str, line_no: usize, line: &str) -> GreensError {
        GreensError::Parse(
            ErrorInfo::new(code, message)
                .with_context("path", self.source)
                .with_context("line", line_no.to_string())
                .with_context("text", line.trim()),
        )
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), GreensError> {
        if line.trim().is_empty() {
            self.state = ScanState::Idle;
            return Ok(());
        }
        match self.state {
            ScanState::InDataBlock => {
                let pair = self.parse_pair(line_no, line)?;
                self.pairs.push(pair);
            }
            ScanState::InNormLine => {
                let norm = line.trim().parse::<f64>().map_err(|_| {
                    self.line_error(
                        "malformed-norm-line",
                        "expected a single float after the norm sentinel",
                        line_no,
                        line,
                    )
                })?;
                self.norm = Some(norm);
                self.state = ScanState::Idle;
            }
            ScanState::Idle => {
                if self.opens_data_block(line) {
                    debug!("{}: data block opens at line {}", self.source, line_no);
                    self.blocks_seen += 1;
                    self.state = ScanState::InDataBlock;
                } else if line.contains(NORM_SENTINEL) {
                    self.state = ScanState::InNormLine;
                }
            }
        }
        Ok(())
    }

    fn parse_pair(&self, line_no: usize, line: &str) -> Result<EigenPair, GreensError> {
        let mut tokens = line.split_whitespace();
        let mut next_value = || tokens.next().and_then(|token| token.parse::<f64>().ok());
        match (next_value(), next_value()) {
            (Some(eigenvalue), Some(weight)) => Ok(EigenPair::new(eigenvalue, weight)),
            _ => Err(self.line_error(
                "malformed-data-line",
                "expected an eigenvalue and a weight",
                line_no,
                line,
            )),
        }
    }

    // The cutoff must not be the prefix of a longer number: keeping 5 is not keeping 50.
    fn opens_data_block(&self, line: &str) -> bool {
        line.match_indices(self.sentinel.as_str()).any(|(start, _)| {
            !line[start + self.sentinel.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
    }

    fn finish(self, cutoff: u32) -> Result<ReportBlock, GreensError> {
        let Some(norm) = self.norm else {
            return Err(GreensError::Parse(
                ErrorInfo::new("missing-norm", "report does not contain the initial norm")
                    .with_context("path", self.source)
                    .with_hint(format!("expected a line containing '{NORM_SENTINEL}'")),
            ));
        };
        if self.blocks_seen == 0 {
            return Err(GreensError::Parse(
                ErrorInfo::new(
                    "missing-data-block",
                    "report does not contain the eigenvalue block for this cutoff",
                )
                .with_context("path", self.source)
                .with_context("cutoff", cutoff.to_string())
                .with_hint("check that the Lowdin cutoff matches the calculation"),
            ));
        }
        debug!(
            "{}: {} pairs, norm {}",
            self.source,
            self.pairs.len(),
            norm
        );
        Ok(ReportBlock {
            source: self.source.to_string(),
            pairs: self.pairs,
            norm,
        })
    }
}

/// Scans report text held in memory. `source` labels errors and provenance.
pub fn extract_str(text: &str, cutoff: u32, source: &str) -> Result<ReportBlock, GreensError> {
    let mut scanner = Scanner::new(source, cutoff);
    for (idx, line) in text.lines().enumerate() {
        scanner.feed(idx + 1, line)?;
    }
    scanner.finish(cutoff)
}

/// Scans a report from any buffered reader.
pub fn extract_reader<R: BufRead>(
    reader: R,
    cutoff: u32,
    source: &str,
) -> Result<ReportBlock, GreensError> {
    let mut scanner = Scanner::new(source, cutoff);
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| GreensError::io("report-read", source, &err))?;
        scanner.feed(idx + 1, &line)?;
    }
    scanner.finish(cutoff)
}

/// Scans a single report file.
pub fn extract_file(path: &Path, cutoff: u32) -> Result<ReportBlock, GreensError> {
    let label = path.display().to_string();
    let file = File::open(path).map_err(|err| GreensError::io("report-open", &label, &err))?;
    extract_reader(BufReader::new(file), cutoff, &label)
}

/// Scans every report in order, concatenating their pairs.
///
/// With [`NormPolicy::LastWins`] each report overwrites the norm of the
/// previous one, so pairs from earlier reports are normalised by the last
/// report's norm.
pub fn extract_data<P: AsRef<Path>>(
    paths: &[P],
    cutoff: u32,
    policy: NormPolicy,
) -> Result<Extraction, GreensError> {
    if paths.is_empty() {
        return Err(GreensError::parse(
            "no-inputs",
            "at least one report file is required",
        ));
    }
    let blocks = paths
        .iter()
        .map(|path| extract_file(path.as_ref(), cutoff))
        .collect::<Result<Vec<_>, _>>()?;
    combine_blocks(blocks, policy)
}

/// Folds already scanned reports into one [`Extraction`].
///
/// Under [`NormPolicy::Consistent`] every norm is compared with the first
/// report's norm, so small differences cannot accumulate across files.
pub fn combine_blocks(
    blocks: Vec<ReportBlock>,
    policy: NormPolicy,
) -> Result<Extraction, GreensError> {
    policy.validate()?;
    let mut pairs = PairSet::new();
    let mut first: Option<f64> = None;
    let mut norm: Option<f64> = None;
    let mut sources = Vec::with_capacity(blocks.len());

    for block in blocks {
        match policy {
            NormPolicy::LastWins => {
                if let Some(previous) = norm.filter(|previous| *previous != block.norm) {
                    warn!(
                        "{}: norm {} replaces {} for all previously read pairs",
                        block.source, block.norm, previous
                    );
                }
            }
            NormPolicy::Consistent { tolerance } => {
                if let Some(reference) = first {
                    if (reference - block.norm).abs() > tolerance {
                        return Err(GreensError::Parse(
                            ErrorInfo::new("norm-mismatch", "reports disagree on the initial norm")
                                .with_context("path", block.source.as_str())
                                .with_context("norm", block.norm.to_string())
                                .with_context("first", reference.to_string())
                                .with_context("tolerance", tolerance.to_string()),
                        ));
                    }
                }
            }
        }
        first.get_or_insert(block.norm);
        norm = Some(block.norm);
        sources.push(SourceSummary {
            path: block.source,
            pairs: block.pairs.len(),
            norm: block.norm,
        });
        pairs.extend_from(block.pairs);
    }

    let Some(norm) = norm else {
        return Err(GreensError::parse(
            "no-inputs",
            "at least one report file is required",
        ));
    };
    info!(
        "extracted {} pairs from {} report(s), norm {}",
        pairs.len(),
        sources.len(),
        norm
    );
    Ok(Extraction {
        pairs,
        norm,
        sources,
    })
}
