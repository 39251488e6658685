//! Exact table-based value approximator over quantized state-action pairs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    approximator::ValueApproximator,
    error::{Error, Result},
    features::{AgentInitInfo, FeatureVector, FeatureVectorInfo, StateActionPair},
    quantize::quantize,
};

/// Stores one value per quantized (state, action) pair.
///
/// Unseen pairs predict `0.0`. The table grows lazily and is never evicted;
/// once every dimension is quantized or discrete the key space is finite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableApproximator {
    info: AgentInitInfo,
    action_bins: usize,
    state_bins: usize,
    #[serde(with = "table_entries")]
    table: HashMap<StateActionPair, f64>,
}

fn check_bins(space: &FeatureVectorInfo, bins: usize, name: &str) -> Result<()> {
    let has_continuous = (0..space.size()).any(|i| !space.is_discrete(i));
    if has_continuous && bins == 1 {
        return Err(Error::InvalidConfiguration {
            message: format!("{name} must be 0 (no quantization) or at least 2"),
        });
    }
    Ok(())
}

impl TableApproximator {
    /// Create an empty table.
    ///
    /// `action_bins` and `state_bins` give the number of bins used for
    /// continuous action and sensor dimensions; `0` disables quantization.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a bin count of `1` on a
    /// space with continuous dimensions.
    pub fn new(info: AgentInitInfo, action_bins: usize, state_bins: usize) -> Result<Self> {
        check_bins(&info.actions, action_bins, "action_bins")?;
        check_bins(&info.sensors, state_bins, "state_bins")?;
        Ok(Self {
            info,
            action_bins,
            state_bins,
            table: HashMap::new(),
        })
    }

    pub fn action_bins(&self) -> usize {
        self.action_bins
    }

    pub fn state_bins(&self) -> usize {
        self.state_bins
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn quantize_state(&self, state: &FeatureVector) -> Result<FeatureVector> {
        quantize(state, &self.info.sensors, self.state_bins)
    }

    pub fn quantize_action(&self, action: &FeatureVector) -> Result<FeatureVector> {
        quantize(action, &self.info.actions, self.action_bins)
    }

    fn key(&self, state: &FeatureVector, action: &FeatureVector) -> Result<StateActionPair> {
        Ok(StateActionPair::new(
            self.quantize_state(state)?,
            self.quantize_action(action)?,
        ))
    }
}

impl ValueApproximator for TableApproximator {
    fn info(&self) -> &AgentInitInfo {
        &self.info
    }

    fn predict(&self, state: &FeatureVector, action: &FeatureVector) -> Result<f64> {
        let key = self.key(state, action)?;
        Ok(self.table.get(&key).copied().unwrap_or(0.0))
    }

    fn update(&mut self, state: &FeatureVector, action: &FeatureVector, target: f64) -> Result<()> {
        let key = self.key(state, action)?;
        self.table.insert(key, target);
        Ok(())
    }
}

/// Serializes the table as a list of `(pair, value)` entries so that
/// formats with string-only map keys can hold it.
mod table_entries {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::features::StateActionPair;

    pub fn serialize<S: Serializer>(
        table: &HashMap<StateActionPair, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(table.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<StateActionPair, f64>, D::Error> {
        let entries: Vec<(StateActionPair, f64)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
