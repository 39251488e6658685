//! Quantization of continuous feature vectors into evenly spaced bins
//!
//! A continuous dimension spanning `[lo, hi]` is split into `bins`
//! representative values `lo, lo + inc, ..., hi` with
//! `inc = (hi - lo) / (bins - 1)`. Each value snaps to the nearest
//! representative: the bin boundaries sit halfway between neighbouring
//! centers, so for `[-1, 1]` with five bins `0.3` lands on `0.5` and `0.2`
//! lands on `0`.
//!
//! Discrete dimensions are truncated to integers. A bin count of `0` means
//! "do not discretize" and returns the input unchanged.

use crate::{
    error::{Error, Result},
    features::{FeatureVector, FeatureVectorInfo},
};

/// Bin count that disables quantization.
pub const NO_QUANTIZATION: usize = 0;

fn check_bins(info: &FeatureVectorInfo, bins: usize, what: &str) -> Result<()> {
    let has_continuous = (0..info.size()).any(|i| !info.is_discrete(i));
    if has_continuous && bins < 2 {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "{what} needs at least 2 bins for continuous dimensions, got {bins}"
            ),
        });
    }
    Ok(())
}

/// Snap `value` to the nearest of `bins` evenly spaced centers in `[lo, hi]`.
fn snap(value: f64, lo: f64, hi: f64, bins: usize) -> f64 {
    let span = hi - lo;
    let steps = (bins - 1) as f64;
    let inc = span / steps;
    let interp = (value - (lo - inc / 2.0)) / span;
    lo + inc * (steps * interp).floor()
}

/// Quantize `continuous` against `info` using `bins` bins per continuous
/// dimension.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the vector does not match the
/// space and [`Error::InvalidConfiguration`] if a continuous dimension is
/// quantized with fewer than two bins.
pub fn quantize(
    continuous: &FeatureVector,
    info: &FeatureVectorInfo,
    bins: usize,
) -> Result<FeatureVector> {
    if bins == NO_QUANTIZATION {
        return Ok(continuous.clone());
    }
    if continuous.len() != info.size() {
        return Err(Error::dimension_mismatch(
            info.size(),
            continuous.len(),
            "quantization",
        ));
    }
    check_bins(info, bins, "quantization")?;

    Ok(continuous
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if info.is_discrete(i) {
                value.trunc()
            } else {
                snap(value, info.min(i), info.max(i), bins)
            }
        })
        .collect())
}

/// Enumerate a discretized action space.
///
/// Discrete dimensions contribute every integer in range; continuous ones
/// contribute `bins` evenly spaced samples from `lo` to `hi` inclusive. The
/// samples are exactly the values [`quantize`] snaps to, so every entry is a
/// fixed point of quantization. Dimension 0 varies slowest.
pub fn discretize_actions(info: &FeatureVectorInfo, bins: usize) -> Result<Vec<FeatureVector>> {
    check_bins(info, bins, "action enumeration")?;

    let mut actions = vec![info.instance()];
    for i in 0..info.size() {
        let (lo, hi) = (info.min(i), info.max(i));
        let values: Vec<f64> = if info.is_discrete(i) {
            (lo as i64..=hi as i64).map(|v| v as f64).collect()
        } else {
            let inc = (hi - lo) / (bins - 1) as f64;
            (0..bins).map(|k| lo + inc * k as f64).collect()
        };
        actions = actions
            .iter()
            .flat_map(|prefix| {
                values.iter().map(move |&value| {
                    let mut action = prefix.clone();
                    action[i] = value;
                    action
                })
            })
            .collect();
    }
    Ok(actions)
}
