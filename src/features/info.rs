//! Descriptions of bounded sensor, action and reward spaces.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    features::{Bound, FeatureVector},
};

/// Describes the legal range and discreteness of every dimension of a
/// feature vector.
///
/// The three parallel sequences (lower bounds, upper bounds and
/// discreteness flags) always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Bound>", try_from = "Vec<Bound>")]
pub struct FeatureVectorInfo {
    lower: Vec<f64>,
    upper: Vec<f64>,
    discreteness: Vec<bool>,
}

impl FeatureVectorInfo {
    /// Create an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a description of `size` continuous dimensions spanning `[0, 1]`.
    pub fn unit_continuous(size: usize) -> Self {
        Self {
            lower: vec![0.0; size],
            upper: vec![1.0; size],
            discreteness: vec![false; size],
        }
    }

    /// Build a description from a sequence of bounds.
    pub fn from_bounds<I: IntoIterator<Item = Bound>>(bounds: I) -> Result<Self> {
        let mut info = Self::new();
        for bound in bounds {
            info.add(bound)?;
        }
        Ok(info)
    }

    /// Number of dimensions.
    pub fn size(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bound of dimension `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range, like slice indexing.
    pub fn min(&self, i: usize) -> f64 {
        self.lower[i]
    }

    /// Upper bound of dimension `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range, like slice indexing.
    pub fn max(&self, i: usize) -> f64 {
        self.upper[i]
    }

    /// Whether dimension `i` is discrete.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range, like slice indexing.
    pub fn is_discrete(&self, i: usize) -> bool {
        self.discreteness[i]
    }

    /// Reconstruct the bound of dimension `i`.
    pub fn bound(&self, i: usize) -> Result<Bound> {
        self.check_index(i)?;
        Ok(Bound {
            min: self.lower[i],
            max: self.upper[i],
            discrete: self.discreteness[i],
        })
    }

    /// Iterate over all bounds in dimension order.
    pub fn bounds(&self) -> impl Iterator<Item = Bound> + '_ {
        (0..self.size()).map(|i| Bound {
            min: self.lower[i],
            max: self.upper[i],
            discrete: self.discreteness[i],
        })
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i < self.size() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: i,
                size: self.size(),
            })
        }
    }

    fn push(&mut self, bound: Bound) -> usize {
        self.lower.push(bound.min);
        self.upper.push(bound.max);
        self.discreteness.push(bound.discrete);
        self.size() - 1
    }

    fn replace(&mut self, i: usize, bound: Bound) -> Result<()> {
        self.check_index(i)?;
        self.lower[i] = bound.min;
        self.upper[i] = bound.max;
        self.discreteness[i] = bound.discrete;
        Ok(())
    }

    /// Append a continuous dimension and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] unless `min < max`.
    pub fn add_continuous(&mut self, min: f64, max: f64) -> Result<usize> {
        Ok(self.push(Bound::continuous(min, max)?))
    }

    /// Append a discrete dimension and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] unless `min < max`.
    pub fn add_discrete(&mut self, min: i64, max: i64) -> Result<usize> {
        Ok(self.push(Bound::discrete(min, max)?))
    }

    /// Append a bound, truncating the endpoints of discrete bounds to integers.
    pub fn add(&mut self, bound: Bound) -> Result<usize> {
        if bound.discrete {
            self.add_discrete(bound.min as i64, bound.max as i64)
        } else {
            self.add_continuous(bound.min, bound.max)
        }
    }

    /// Replace dimension `i` with a continuous range.
    pub fn set_continuous(&mut self, i: usize, min: f64, max: f64) -> Result<()> {
        let bound = Bound::continuous(min, max)?;
        self.replace(i, bound)
    }

    /// Replace dimension `i` with a discrete range.
    pub fn set_discrete(&mut self, i: usize, min: i64, max: i64) -> Result<()> {
        let bound = Bound::discrete(min, max)?;
        self.replace(i, bound)
    }

    /// Check a vector against these bounds, reporting the first violation.
    pub fn check(&self, vector: &FeatureVector) -> Result<()> {
        if vector.len() != self.size() {
            return Err(Error::dimension_mismatch(
                self.size(),
                vector.len(),
                "feature vector validation",
            ));
        }
        for (i, &value) in vector.iter().enumerate() {
            if value < self.lower[i] || value > self.upper[i] || value.is_nan() {
                return Err(Error::OutOfBounds {
                    index: i,
                    value,
                    min: self.lower[i],
                    max: self.upper[i],
                });
            }
        }
        Ok(())
    }

    /// True iff the length matches and every element lies within its
    /// inclusive range.
    pub fn validate(&self, vector: &FeatureVector) -> bool {
        match self.check(vector) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "feature vector failed validation");
                false
            }
        }
    }

    /// Map a valid vector from its native range into `[0, 1]`.
    ///
    /// Dimensions whose span is exactly `1` are treated as already
    /// normalized and pass through unchanged.
    pub fn normalize(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        self.check(vector)?;
        Ok(vector
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let span = self.upper[i] - self.lower[i];
                if span == 1.0 {
                    value
                } else {
                    (value - self.lower[i]) / span
                }
            })
            .collect())
    }

    /// Map a vector of `[0, 1]` values back into the native range.
    ///
    /// The values themselves are not range checked.
    pub fn denormalize(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        if vector.len() != self.size() {
            return Err(Error::dimension_mismatch(
                self.size(),
                vector.len(),
                "feature vector denormalization",
            ));
        }
        Ok(vector
            .iter()
            .enumerate()
            .map(|(i, &value)| value * (self.upper[i] - self.lower[i]) + self.lower[i])
            .collect())
    }

    /// A canonical "zero-like" instance: `0` where it is in range, the lower
    /// bound otherwise.
    pub fn instance(&self) -> FeatureVector {
        self.bounds()
            .map(|b| if b.contains(0.0) { 0.0 } else { b.min })
            .collect()
    }

    /// A uniformly random vector within the bounds.
    pub fn random(&self, rng: &mut impl Rng) -> FeatureVector {
        self.bounds()
            .map(|b| {
                if b.discrete {
                    let steps = b.span() as i64;
                    rng.random_range(0..=steps) as f64 + b.min
                } else {
                    (rng.random_range(0.0..=b.span()) + b.min).min(b.max)
                }
            })
            .collect()
    }

    /// Enumerate every integer combination, dimension 0 varying slowest and
    /// values ascending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContinuousEnumeration`] if any dimension is continuous.
    pub fn enumerate(&self) -> Result<Vec<FeatureVector>> {
        if let Some(index) = self.discreteness.iter().position(|&d| !d) {
            return Err(Error::ContinuousEnumeration { index });
        }
        let mut result = vec![self.instance()];
        for i in 0..self.size() {
            let (lo, hi) = (self.lower[i] as i64, self.upper[i] as i64);
            result = result
                .iter()
                .flat_map(|prefix| {
                    (lo..=hi).map(move |value| {
                        let mut v = prefix.clone();
                        v[i] = value as f64;
                        v
                    })
                })
                .collect();
        }
        Ok(result)
    }

    /// Parse whitespace-separated `(is_discrete, min, max)` triples and
    /// append them.
    ///
    /// Parsing is not atomic: bounds from triples before the first malformed
    /// one stay committed when an error is returned.
    pub fn extend_from_spec(&mut self, spec: &str) -> Result<()> {
        let mut tokens = spec.split_whitespace().enumerate();
        let malformed = |position: usize, token: &str| Error::BoundParse {
            position,
            token: token.to_string(),
            input: spec.to_string(),
        };

        while let Some((position, flag)) = tokens.next() {
            let discrete = match flag {
                "1" | "true" => true,
                "0" | "false" => false,
                other => return Err(malformed(position, other)),
            };
            let mut endpoint = || {
                tokens
                    .next()
                    .map(|(_, token)| token)
                    .ok_or_else(|| malformed(position, "<end of input>"))
            };
            let (min, max) = (endpoint()?, endpoint()?);
            if discrete {
                let parse = |token: &str| {
                    token
                        .parse::<i64>()
                        .map_err(|_| malformed(position, token))
                };
                self.add_discrete(parse(min)?, parse(max)?)?;
            } else {
                let parse = |token: &str| {
                    token
                        .parse::<f64>()
                        .map_err(|_| malformed(position, token))
                };
                self.add_continuous(parse(min)?, parse(max)?)?;
            }
        }
        Ok(())
    }
}

impl FromStr for FeatureVectorInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut info = Self::new();
        info.extend_from_spec(s)?;
        Ok(info)
    }
}

impl From<FeatureVectorInfo> for Vec<Bound> {
    fn from(info: FeatureVectorInfo) -> Self {
        info.bounds().collect()
    }
}

impl TryFrom<Vec<Bound>> for FeatureVectorInfo {
    type Error = Error;

    fn try_from(bounds: Vec<Bound>) -> Result<Self> {
        let mut info = Self::new();
        for bound in bounds {
            info.push(Bound::new(bound.min, bound.max, bound.discrete)?);
        }
        Ok(info)
    }
}

impl fmt::Display for FeatureVectorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bound in self.bounds() {
            let tag = if bound.discrete { 'd' } else { 'c' };
            write!(f, "{tag}[{}, {}] ", bound.min, bound.max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn mixed_info() -> FeatureVectorInfo {
        let mut info = FeatureVectorInfo::new();
        info.add_continuous(-1.0, 1.0).unwrap();
        info.add_discrete(2, 5).unwrap();
        info.add_continuous(3.0, 4.0).unwrap();
        info
    }

    #[test]
    fn test_add_and_set_reject_bad_ranges() {
        let mut info = FeatureVectorInfo::new();
        assert_eq!(info.add_continuous(0.0, 1.0).unwrap(), 0);
        assert_eq!(info.add_discrete(0, 4).unwrap(), 1);
        assert!(info.add_continuous(1.0, 1.0).is_err());
        assert!(info.set_discrete(0, 3, 2).is_err());
        assert_eq!(info.size(), 2);

        info.set_discrete(0, -2, 2).unwrap();
        assert!(info.is_discrete(0));
        assert_eq!(info.bound(0).unwrap(), Bound::discrete(-2, 2).unwrap());
        assert!(matches!(
            info.set_continuous(5, 0.0, 1.0),
            Err(Error::IndexOutOfRange { index: 5, size: 2 })
        ));
    }

    #[test]
    fn test_validate() {
        let info = mixed_info();
        assert!(info.validate(&FeatureVector::from([-1.0, 5.0, 3.5])));
        assert!(!info.validate(&FeatureVector::from([-1.0, 6.0, 3.5])));
        assert!(!info.validate(&FeatureVector::from([-1.0, 5.0])));
    }

    #[test]
    fn test_normalize_passes_unit_span_through() {
        let info = mixed_info();
        let normalized = info
            .normalize(&FeatureVector::from([0.0, 3.5, 3.25]))
            .unwrap();
        assert_eq!(normalized, FeatureVector::from([0.5, 0.5, 3.25]));
        assert!(info.normalize(&FeatureVector::from([2.0, 3.0, 3.0])).is_err());
    }

    #[test]
    fn test_denormalize() {
        let info = mixed_info();
        let restored = info
            .denormalize(&FeatureVector::from([0.5, 0.5, 0.5]))
            .unwrap();
        assert_eq!(restored, FeatureVector::from([0.0, 3.5, 3.5]));
    }

    #[test]
    fn test_instance_prefers_zero() {
        let info = mixed_info();
        assert_eq!(info.instance(), FeatureVector::from([0.0, 2.0, 3.0]));
    }

    #[test]
    fn test_random_stays_in_bounds() {
        let info = mixed_info();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let v = info.random(&mut rng);
            assert!(info.validate(&v));
            assert_eq!(v[1].fract(), 0.0);
        }
    }

    #[test]
    fn test_enumerate_all_discrete() {
        let mut info = FeatureVectorInfo::new();
        info.add_discrete(0, 1).unwrap();
        info.add_discrete(0, 2).unwrap();

        let all = info.enumerate().unwrap();
        let expected: Vec<FeatureVector> = [
            [0.0, 0.0],
            [0.0, 1.0],
            [0.0, 2.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [1.0, 2.0],
        ]
        .into_iter()
        .map(FeatureVector::from)
        .collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_enumerate_rejects_continuous() {
        let info = mixed_info();
        assert!(matches!(
            info.enumerate(),
            Err(Error::ContinuousEnumeration { index: 0 })
        ));
    }

    #[test]
    fn test_parse_spec() {
        let info: FeatureVectorInfo = "1 0 3 0 -1.5 2.5".parse().unwrap();
        assert_eq!(info.size(), 2);
        assert_eq!(info.bound(0).unwrap(), Bound::discrete(0, 3).unwrap());
        assert_eq!(info.bound(1).unwrap(), Bound::continuous(-1.5, 2.5).unwrap());
        assert_eq!(info.to_string(), "d[0, 3] c[-1.5, 2.5] ");
    }

    #[test]
    fn test_parse_is_not_atomic() {
        let mut info = FeatureVectorInfo::new();
        let err = info.extend_from_spec("0 0 1 1 0 x 0 0 1").unwrap_err();
        assert!(matches!(err, Error::BoundParse { position: 3, .. }));
        assert_eq!(info.size(), 1);

        let err = info.extend_from_spec("0 0").unwrap_err();
        assert!(matches!(err, Error::BoundParse { .. }));
        assert_eq!(info.size(), 1);
    }

    #[test]
    fn test_serde_rejects_inverted_bounds() {
        let json = serde_json::to_string(&mixed_info()).unwrap();
        let back: FeatureVectorInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mixed_info());

        let bad = r#"[{"min": 1.0, "max": 0.0, "discrete": false}]"#;
        assert!(serde_json::from_str::<FeatureVectorInfo>(bad).is_err());
    }
}
