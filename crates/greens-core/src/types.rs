use serde::{Deserialize, Serialize};

/// A single eigenvalue together with its unnormalised spectral weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenPair {
    /// Energy level reported by the upstream calculation.
    pub eigenvalue: f64,
    /// Overlap amplitude before division by the initial wave function norm.
    pub weight: f64,
}

impl EigenPair {
    /// Creates a new pair.
    pub const fn new(eigenvalue: f64, weight: f64) -> Self {
        Self { eigenvalue, weight }
    }

    /// Squared weight after division by `norm`.
    pub fn normalised_weight(&self, norm: f64) -> f64 {
        let ratio = self.weight / norm;
        ratio * ratio
    }
}

impl From<(f64, f64)> for EigenPair {
    fn from((eigenvalue, weight): (f64, f64)) -> Self {
        Self::new(eigenvalue, weight)
    }
}

/// Ordered collection of eigenpairs in source appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairSet(Vec<EigenPair>);

impl PairSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a pair to the end of the set.
    pub fn push(&mut self, pair: EigenPair) {
        self.0.push(pair);
    }

    /// Appends every pair of `other`, preserving order.
    pub fn extend_from(&mut self, other: PairSet) {
        self.0.extend(other.0);
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no pairs were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrowed view of the pairs.
    pub fn as_slice(&self) -> &[EigenPair] {
        &self.0
    }

    /// Pairs from `start` onwards; empty when `start` is past the end.
    pub fn tail(&self, start: usize) -> &[EigenPair] {
        self.0.get(start..).unwrap_or(&[])
    }
}

impl From<Vec<EigenPair>> for PairSet {
    fn from(pairs: Vec<EigenPair>) -> Self {
        Self(pairs)
    }
}

impl FromIterator<EigenPair> for PairSet {
    fn from_iter<I: IntoIterator<Item = EigenPair>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PairSet {
    type Item = &'a EigenPair;
    type IntoIter = std::slice::Iter<'a, EigenPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One sample of a broadened spectral function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Sample frequency.
    pub omega: f64,
    /// Spectral density at `omega`.
    pub intensity: f64,
}

/// Sampled spectral function ordered by ascending frequency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpectrumCurve(Vec<SpectrumPoint>);

impl SpectrumCurve {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a curve without samples.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrowed view of the samples.
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.0
    }

    /// Iterates over the samples in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SpectrumPoint> {
        self.0.iter()
    }
}

impl From<Vec<SpectrumPoint>> for SpectrumCurve {
    fn from(points: Vec<SpectrumPoint>) -> Self {
        Self(points)
    }
}

impl<'a> IntoIterator for &'a SpectrumCurve {
    type Item = &'a SpectrumPoint;
    type IntoIter = std::slice::Iter<'a, SpectrumPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
