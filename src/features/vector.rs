//! Fixed-length feature vectors used for sensors, actions and rewards.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered sequence of real values.
///
/// Equality and hashing are defined on the canonical bit pattern of each
/// element (`-0.0` is folded into `0.0`, every NaN into one NaN), so two
/// numerically equal vectors always hash identically and `Eq` holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

/// Observations reported by an environment
pub type Observations = FeatureVector;
/// Actions chosen by a brain
pub type Actions = FeatureVector;
/// Reward handed to a brain
pub type Reward = FeatureVector;

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// A vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    fn zip_with(&self, other: &Self, op: &str, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Error::dimension_mismatch(
                self.len(),
                other.len(),
                format!("feature vector {op}"),
            ));
        }
        Ok(Self(
            self.0.iter().zip(&other.0).map(|(&a, &b)| f(a, b)).collect(),
        ))
    }

    fn map_scalar(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&a| f(a)).collect())
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "addition", |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "subtraction", |a, b| a - b)
    }

    /// Element-wise product.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "multiplication", |a, b| a * b)
    }

    /// Element-wise quotient.
    pub fn try_div(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "division", |a, b| a / b)
    }
}

impl PartialEq for FeatureVector {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(&a, &b)| canonical_bits(a) == canonical_bits(b))
    }
}

impl Eq for FeatureVector {}

impl Hash for FeatureVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0.len());
        for &value in &self.0 {
            state.write_u64(canonical_bits(value));
        }
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for FeatureVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for FeatureVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

// Operator forms treat a length mismatch as a contract violation and panic;
// use the `try_*` methods to get a `Result` instead.
macro_rules! impl_elementwise_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $checked:ident) => {
        impl $trait<&FeatureVector> for &FeatureVector {
            type Output = FeatureVector;

            fn $method(self, rhs: &FeatureVector) -> FeatureVector {
                match self.$checked(rhs) {
                    Ok(result) => result,
                    Err(err) => panic!("{err}"),
                }
            }
        }

        impl $trait for FeatureVector {
            type Output = FeatureVector;

            fn $method(self, rhs: FeatureVector) -> FeatureVector {
                (&self).$method(&rhs)
            }
        }

        impl $trait<f64> for &FeatureVector {
            type Output = FeatureVector;

            fn $method(self, rhs: f64) -> FeatureVector {
                self.map_scalar(|a| a.$method(rhs))
            }
        }

        impl $trait<f64> for FeatureVector {
            type Output = FeatureVector;

            fn $method(self, rhs: f64) -> FeatureVector {
                (&self).$method(rhs)
            }
        }

        impl $assign_trait<&FeatureVector> for FeatureVector {
            fn $assign_method(&mut self, rhs: &FeatureVector) {
                *self = (&*self).$method(rhs);
            }
        }

        impl $assign_trait<f64> for FeatureVector {
            fn $assign_method(&mut self, rhs: f64) {
                for value in &mut self.0 {
                    value.$assign_method(rhs);
                }
            }
        }
    };
}

impl_elementwise_op!(Add, add, AddAssign, add_assign, try_add);
impl_elementwise_op!(Sub, sub, SubAssign, sub_assign, try_sub);
impl_elementwise_op!(Mul, mul, MulAssign, mul_assign, try_mul);
impl_elementwise_op!(Div, div, DivAssign, div_assign, try_div);

/// A quantized (state, action) pair used as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateActionPair {
    pub state: FeatureVector,
    pub action: FeatureVector,
}

impl StateActionPair {
    pub fn new(state: FeatureVector, action: FeatureVector) -> Self {
        Self { state, action }
    }
}
