//! Epsilon-greedy action selection over an enumerated action list.

use rand::{Rng, seq::SliceRandom};

use crate::{
    approximator::ValueApproximator,
    error::Result,
    features::{Actions, FeatureVectorInfo, Observations},
};

/// Outcome of one epsilon-greedy decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub action: Actions,
    /// Predicted value of `action` in the state it was selected for
    pub value: f64,
    /// Whether the action was drawn at random rather than greedily
    pub explored: bool,
}

/// Pick an action for `state`.
///
/// With probability `epsilon` a uniformly random action is drawn from
/// `action_space`. Otherwise the action list is visited in a freshly shuffled
/// order and the first action with the strictly greatest prediction wins, so
/// ties are broken at random.
pub fn epsilon_greedy<A>(
    approximator: &A,
    state: &Observations,
    action_list: &[Actions],
    action_space: &FeatureVectorInfo,
    epsilon: f64,
    rng: &mut impl Rng,
) -> Result<Selection>
where
    A: ValueApproximator + ?Sized,
{
    if rng.random::<f64>() < epsilon {
        let action = action_space.random(rng);
        let value = approximator.predict(state, &action)?;
        return Ok(Selection {
            action,
            value,
            explored: true,
        });
    }
    greedy(approximator, state, action_list, action_space, rng)
}

/// Greedy choice with a random tie-break.
pub fn greedy<A>(
    approximator: &A,
    state: &Observations,
    action_list: &[Actions],
    action_space: &FeatureVectorInfo,
    rng: &mut impl Rng,
) -> Result<Selection>
where
    A: ValueApproximator + ?Sized,
{
    if action_list.is_empty() {
        let action = action_space.instance();
        let value = approximator.predict(state, &action)?;
        return Ok(Selection {
            action,
            value,
            explored: false,
        });
    }

    let mut order: Vec<usize> = (0..action_list.len()).collect();
    order.shuffle(rng);

    let mut best = order[0];
    let mut best_value = f64::NEG_INFINITY;
    for index in order {
        let value = approximator.predict(state, &action_list[index])?;
        if value > best_value {
            best_value = value;
            best = index;
        }
    }
    Ok(Selection {
        action: action_list[best].clone(),
        value: best_value,
        explored: false,
    })
}

/// Highest predicted value over the action list.
///
/// Returns negative infinity for an empty list.
pub fn best_value<A>(approximator: &A, state: &Observations, action_list: &[Actions]) -> Result<f64>
where
    A: ValueApproximator + ?Sized,
{
    action_list.iter().try_fold(f64::NEG_INFINITY, |best, action| {
        Ok(best.max(approximator.predict(state, action)?))
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        approximator::TableApproximator,
        features::{AgentInitInfo, FeatureVector},
    };

    fn setup() -> (TableApproximator, Vec<Actions>, FeatureVectorInfo) {
        let mut sensors = FeatureVectorInfo::new();
        sensors.add_discrete(0, 3).unwrap();
        let mut actions = FeatureVectorInfo::new();
        actions.add_discrete(0, 2).unwrap();
        let info = AgentInitInfo::new(sensors, actions.clone(), FeatureVectorInfo::unit_continuous(1));
        let table = TableApproximator::new(info, 0, 0).unwrap();
        let list = actions.enumerate().unwrap();
        (table, list, actions)
    }

    #[test]
    fn test_greedy_picks_highest_value() {
        let (mut table, list, space) = setup();
        let state = FeatureVector::from([1.0]);
        table.update(&state, &list[2], 3.0).unwrap();
        table.update(&state, &list[0], -1.0).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let choice = epsilon_greedy(&table, &state, &list, &space, 0.0, &mut rng).unwrap();
            assert_eq!(choice.action, list[2]);
            assert_eq!(choice.value, 3.0);
            assert!(!choice.explored);
        }
    }

    #[test]
    fn test_ties_are_broken_at_random() {
        let (table, list, space) = setup();
        let state = FeatureVector::from([0.0]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let choice = greedy(&table, &state, &list, &space, &mut rng).unwrap();
            assert_eq!(choice.value, 0.0);
            seen.insert(choice.action);
        }
        assert_eq!(seen.len(), list.len());
    }

    #[test]
    fn test_full_exploration_draws_from_space() {
        let (table, list, space) = setup();
        let state = FeatureVector::from([0.0]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let choice = epsilon_greedy(&table, &state, &list, &space, 1.0, &mut rng).unwrap();
            assert!(choice.explored);
            assert!(space.validate(&choice.action));
        }
    }

    #[test]
    fn test_best_value_and_single_action() {
        let (mut table, list, space) = setup();
        let state = FeatureVector::from([2.0]);
        table.update(&state, &list[1], 0.5).unwrap();
        assert_eq!(best_value(&table, &state, &list).unwrap(), 0.5);
        assert_eq!(best_value(&table, &state, &[]).unwrap(), f64::NEG_INFINITY);

        let mut rng = StdRng::seed_from_u64(1);
        let only = greedy(&table, &state, &list[1..2], &space, &mut rng).unwrap();
        assert_eq!(only.action, list[1]);
        let fallback = greedy(&table, &state, &[], &space, &mut rng).unwrap();
        assert_eq!(fallback.action, space.instance());
    }
}
