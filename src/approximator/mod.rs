//! Value function approximators
//!
//! An approximator maps a (state, action) pair to an estimated value and can
//! be nudged towards a target. Two implementations exist: an exact lookup
//! [`TableApproximator`] over quantized pairs and a generalizing
//! [`TilesApproximator`] based on CMAC tile coding. [`Approximator`] closes
//! over both so a brain can own, clone and persist either one.

pub mod table;
pub mod tile_coding;
pub mod tiles;

use serde::{Deserialize, Serialize};

pub use table::TableApproximator;
pub use tiles::TilesApproximator;

use crate::{
    error::Result,
    features::{AgentInitInfo, FeatureVector},
};

/// Shared contract of every value approximator.
///
/// Cloning (the `copy` operation) is provided through [`Clone`] on the
/// concrete types and must yield a fully independent approximator.
pub trait ValueApproximator {
    /// Spaces the approximator was built for.
    fn info(&self) -> &AgentInitInfo;

    /// Estimated value of taking `action` in `state`.
    fn predict(&self, state: &FeatureVector, action: &FeatureVector) -> Result<f64>;

    /// Move the estimate for `(state, action)` towards `target`.
    fn update(&mut self, state: &FeatureVector, action: &FeatureVector, target: f64) -> Result<()>;
}

/// Either approximator, persisted with an explicit `kind` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Approximator {
    Table(TableApproximator),
    Tiles(TilesApproximator),
}

impl Approximator {
    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Approximator::Table(_) => "table",
            Approximator::Tiles(_) => "tiles",
        }
    }

    pub fn as_table(&self) -> Option<&TableApproximator> {
        match self {
            Approximator::Table(table) => Some(table),
            Approximator::Tiles(_) => None,
        }
    }

    pub fn as_tiles(&self) -> Option<&TilesApproximator> {
        match self {
            Approximator::Tiles(tiles) => Some(tiles),
            Approximator::Table(_) => None,
        }
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        match self {
            Approximator::Table(_) => Ok(()),
            Approximator::Tiles(tiles) => tiles.check_consistency(),
        }
    }
}

impl ValueApproximator for Approximator {
    fn info(&self) -> &AgentInitInfo {
        match self {
            Approximator::Table(table) => table.info(),
            Approximator::Tiles(tiles) => tiles.info(),
        }
    }

    fn predict(&self, state: &FeatureVector, action: &FeatureVector) -> Result<f64> {
        match self {
            Approximator::Table(table) => table.predict(state, action),
            Approximator::Tiles(tiles) => tiles.predict(state, action),
        }
    }

    fn update(&mut self, state: &FeatureVector, action: &FeatureVector, target: f64) -> Result<()> {
        match self {
            Approximator::Table(table) => table.update(state, action, target),
            Approximator::Tiles(tiles) => tiles.update(state, action, target),
        }
    }
}

impl From<TableApproximator> for Approximator {
    fn from(table: TableApproximator) -> Self {
        Approximator::Table(table)
    }
}

impl From<TilesApproximator> for Approximator {
    fn from(tiles: TilesApproximator) -> Self {
        Approximator::Tiles(tiles)
    }
}
