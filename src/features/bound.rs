//! Range and discreteness descriptor for a single feature dimension.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bounds on a single feature (real or discrete).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Whether the values are integral
    pub discrete: bool,
}

impl Bound {
    /// Create a new bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBound`] unless `min < max`.
    pub fn new(min: f64, max: f64, discrete: bool) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(Error::InvalidBound { min, max });
        }
        Ok(Self { min, max, discrete })
    }

    /// Create a continuous bound spanning `[min, max]`.
    pub fn continuous(min: f64, max: f64) -> Result<Self> {
        Self::new(min, max, false)
    }

    /// Create a discrete bound over the integers in `[min, max]`.
    pub fn discrete(min: i64, max: i64) -> Result<Self> {
        Self::new(min as f64, max as f64, true)
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `value` lies within the closed range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<bound min=\"{}\" max=\"{}\" discrete=\"{}\" />",
            self.min,
            self.max,
            u8::from(self.discrete)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_range() {
        assert!(Bound::continuous(1.0, 1.0).is_err());
        assert!(Bound::continuous(2.0, 1.0).is_err());
        assert!(Bound::new(f64::NAN, 1.0, false).is_err());
        assert!(Bound::discrete(0, 1).is_ok());
    }

    #[test]
    fn test_display() {
        let bound = Bound::discrete(0, 3).unwrap();
        assert_eq!(
            bound.to_string(),
            "<bound min=\"0\" max=\"3\" discrete=\"1\" />"
        );
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bound = Bound::continuous(-1.0, 1.0).unwrap();
        assert!(bound.contains(-1.0));
        assert!(bound.contains(1.0));
        assert!(!bound.contains(1.0001));
        assert_eq!(bound.span(), 2.0);
    }
}
