//! Behaviour of the table and tile-coding approximators through the shared
//! trait

mod common;

use rand::{SeedableRng, rngs::StdRng};
use tdlearn::{
    AgentInitInfo, Approximator, FeatureVector, FeatureVectorInfo, TableApproximator,
    TilesApproximator, ValueApproximator,
};

fn wide_info() -> AgentInitInfo {
    let mut sensors = FeatureVectorInfo::new();
    sensors.add_continuous(0.0, 10.0).unwrap();
    let mut actions = FeatureVectorInfo::new();
    actions.add_discrete(0, 1).unwrap();
    let mut reward = FeatureVectorInfo::new();
    reward.add_continuous(-10.0, 10.0).unwrap();
    AgentInitInfo::new(sensors, actions, reward)
}

fn s(v: f64) -> FeatureVector {
    FeatureVector::from([v])
}

#[test]
fn table_defaults_unseen_pairs_to_zero() {
    let table = TableApproximator::new(common::unit_info(), 3, 3).unwrap();
    assert_eq!(table.predict(&s(0.4), &s(0.9)).unwrap(), 0.0);
    assert!(table.is_empty());
}

#[test]
fn table_update_sets_the_bucket_value() {
    let mut table = TableApproximator::new(common::unit_info(), 3, 5).unwrap();
    table.update(&s(0.3), &s(1.0), 2.5).unwrap();

    // 0.3 and 0.2 both snap to 0.25 with five state bins in [0, 1]
    assert_eq!(table.predict(&s(0.2), &s(1.0)).unwrap(), 2.5);
    assert_eq!(table.predict(&s(0.3), &s(0.9)).unwrap(), 2.5);
    assert_eq!(table.predict(&s(0.6), &s(1.0)).unwrap(), 0.0);

    table.update(&s(0.25), &s(1.0), -1.0).unwrap();
    assert_eq!(table.predict(&s(0.3), &s(1.0)).unwrap(), -1.0);
    assert_eq!(table.len(), 1);
}

#[test]
fn table_rejects_wrong_dimensions() {
    let mut table = TableApproximator::new(common::unit_info(), 3, 3).unwrap();
    let too_long = FeatureVector::from([0.1, 0.2]);
    assert!(table.predict(&too_long, &s(0.0)).is_err());
    assert!(table.update(&s(0.1), &too_long, 1.0).is_err());
}

#[test]
fn tiles_converge_on_a_trained_pair() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tiles = TilesApproximator::new(wide_info(), 32, 4096, 0.1, &mut rng).unwrap();
    let (state, action) = (s(2.0), s(1.0));

    let before = (tiles.predict(&state, &action).unwrap() - 10.0).abs();
    for _ in 0..60 {
        tiles.update(&state, &action, 10.0).unwrap();
    }
    let after = (tiles.predict(&state, &action).unwrap() - 10.0).abs();
    assert!(after < 0.05 * before + 1e-3, "before {before}, after {after}");
}

#[test]
fn tiles_generalize_to_nearby_states_only() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut tiles = TilesApproximator::new(wide_info(), 32, 65_536, 0.5, &mut rng).unwrap();
    let action = s(0.0);

    let near_before = tiles.predict(&s(1.05), &action).unwrap();
    let far_before = tiles.predict(&s(8.0), &action).unwrap();
    for _ in 0..20 {
        tiles.update(&s(1.0), &action, 50.0).unwrap();
    }
    let near_shift = (tiles.predict(&s(1.05), &action).unwrap() - near_before).abs();
    let far_shift = (tiles.predict(&s(8.0), &action).unwrap() - far_before).abs();

    assert!(near_shift > 10.0, "near state moved by {near_shift}");
    assert!(far_shift < near_shift / 4.0, "far state moved by {far_shift}");
}

#[test]
fn tiles_keep_discrete_actions_apart() {
    let mut rng = StdRng::seed_from_u64(5);
    let tiles = TilesApproximator::new(wide_info(), 16, 65_536, 0.1, &mut rng).unwrap();
    let left = tiles.active_tiles(&s(3.0), &s(0.0)).unwrap();
    let right = tiles.active_tiles(&s(3.0), &s(1.0)).unwrap();
    assert_eq!(left.len(), 16);
    assert_ne!(left, right);
}

#[test]
fn cloned_approximators_learn_independently() {
    let mut rng = StdRng::seed_from_u64(8);
    let approximators: Vec<Approximator> = vec![
        TableApproximator::new(wide_info(), 0, 5).unwrap().into(),
        TilesApproximator::with_defaults(wide_info(), &mut rng)
            .unwrap()
            .into(),
    ];

    for original in approximators {
        let mut copy = original.clone();
        let before = original.predict(&s(4.0), &s(1.0)).unwrap();
        copy.update(&s(4.0), &s(1.0), before + 5.0).unwrap();

        assert_eq!(original.predict(&s(4.0), &s(1.0)).unwrap(), before);
        assert_ne!(copy.predict(&s(4.0), &s(1.0)).unwrap(), before);
    }
}

#[test]
fn serialized_approximators_predict_identically() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut tiles = TilesApproximator::with_defaults(wide_info(), &mut rng).unwrap();
    tiles.update(&s(6.5), &s(1.0), 3.0).unwrap();
    let mut table = TableApproximator::new(wide_info(), 0, 4).unwrap();
    table.update(&s(6.5), &s(1.0), 3.0).unwrap();

    for approximator in [Approximator::from(tiles), Approximator::from(table)] {
        let json = serde_json::to_string(&approximator).unwrap();
        let restored: Approximator = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.kind(), approximator.kind());
        for x in [0.0, 2.2, 6.5, 9.9] {
            assert_eq!(
                restored.predict(&s(x), &s(1.0)).unwrap(),
                approximator.predict(&s(x), &s(1.0)).unwrap()
            );
        }
    }
}

#[test]
fn tiles_handle_sensors_far_from_the_origin() {
    let mut sensors = FeatureVectorInfo::new();
    sensors.add_continuous(-1e20, 1e20).unwrap();
    let mut actions = FeatureVectorInfo::new();
    actions.add_continuous(0.0, 1.0).unwrap();
    let mut reward = FeatureVectorInfo::new();
    reward.add_continuous(-1.0, 1.0).unwrap();
    let info = AgentInitInfo::new(sensors, actions, reward);

    let mut rng = StdRng::seed_from_u64(13);
    let mut tiles = TilesApproximator::new(info, 8, 256, 0.5, &mut rng).unwrap();
    for x in [-1e20, -1e19, 1e19, 1e20] {
        let before = tiles.predict(&s(x), &s(0.5)).unwrap();
        assert!(before.is_finite());
        tiles.update(&s(x), &s(0.5), 1.0).unwrap();
        assert!(tiles.active_tiles(&s(x), &s(0.5)).unwrap().iter().all(|&t| t < 256));
    }
}
