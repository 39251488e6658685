//! Property tests for feature spaces and quantization

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use tdlearn::{
    Bound, Error, FeatureVector, FeatureVectorInfo,
    quantize::{discretize_actions, quantize},
};

/// Strategy for a single bound with `min < max`.
fn bound_strategy() -> impl Strategy<Value = Bound> {
    prop_oneof![
        (-50i64..50, 1i64..20).prop_map(|(lo, span)| Bound::discrete(lo, lo + span).unwrap()),
        (-100.0f64..100.0, 0.01f64..50.0)
            .prop_map(|(lo, span)| Bound::continuous(lo, lo + span).unwrap()),
    ]
}

fn info_strategy() -> impl Strategy<Value = FeatureVectorInfo> {
    prop::collection::vec(bound_strategy(), 1..6)
        .prop_map(|bounds| FeatureVectorInfo::from_bounds(bounds).unwrap())
}

proptest! {
    #[test]
    fn validate_matches_length_and_bounds(
        info in info_strategy(),
        values in prop::collection::vec(-200.0f64..200.0, 0..7),
    ) {
        let vector = FeatureVector::from(values.clone());
        let expected = values.len() == info.size()
            && info.bounds().zip(&values).all(|(b, &v)| v >= b.min && v <= b.max);
        prop_assert_eq!(info.validate(&vector), expected);
    }

    #[test]
    fn random_instances_are_valid(info in info_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            let sample = info.random(&mut rng);
            prop_assert!(info.validate(&sample));
            for (bound, value) in info.bounds().zip(sample.iter()) {
                if bound.discrete {
                    prop_assert_eq!(value.fract(), 0.0);
                }
            }
        }
        prop_assert!(info.validate(&info.instance()));
    }

    #[test]
    fn normalize_round_trips(
        lo in -100.0f64..100.0,
        span in 0.01f64..100.0,
        t in 0.0f64..=1.0,
    ) {
        prop_assume!(span != 1.0);
        let mut info = FeatureVectorInfo::new();
        info.add_continuous(lo, lo + span).unwrap();
        let value = FeatureVector::from([lo + t * span]);

        let normalized = info.normalize(&value).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&normalized[0]));
        let restored = info.denormalize(&normalized).unwrap();
        let tolerance = 1e-9 * value[0].abs().max(1.0);
        prop_assert!((restored[0] - value[0]).abs() <= tolerance);
    }

    #[test]
    fn quantization_is_idempotent(
        lo in -10.0f64..10.0,
        span in 0.5f64..20.0,
        t in 0.0f64..=1.0,
        bins in 2usize..12,
    ) {
        let mut info = FeatureVectorInfo::new();
        info.add_continuous(lo, lo + span).unwrap();
        let value = FeatureVector::from([lo + t * span]);

        let once = quantize(&value, &info, bins).unwrap();
        let twice = quantize(&once, &info, bins).unwrap();
        prop_assert_eq!(&once, &twice);
    }
}

#[test]
fn quantization_snaps_to_nearest_bin() {
    let info: FeatureVectorInfo = "0 -1 1".parse().unwrap();
    let snap = |v: f64| quantize(&FeatureVector::from([v]), &info, 5).unwrap()[0];
    assert_eq!(snap(0.3), 0.5);
    assert_eq!(snap(0.2), 0.0);
}

#[test]
fn enumeration_orders_first_dimension_slowest() {
    let info: FeatureVectorInfo = "1 0 1 1 0 2".parse().unwrap();
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
    assert_eq!(discretize_actions(&info, 3).unwrap(), expected);
}

#[test]
fn enumeration_rejects_continuous_spaces() {
    let info: FeatureVectorInfo = "1 0 1 0 0 1".parse().unwrap();
    assert!(matches!(
        info.enumerate(),
        Err(Error::ContinuousEnumeration { index: 1 })
    ));
}

#[test]
fn display_formats() {
    let info: FeatureVectorInfo = "1 0 3 0 -1.5 2.5".parse().unwrap();
    assert_eq!(info.to_string(), "d[0, 3] c[-1.5, 2.5] ");
    assert_eq!(
        info.bound(1).unwrap().to_string(),
        "<bound min=\"-1.5\" max=\"2.5\" discrete=\"0\" />"
    );
}

#[test]
fn parsing_keeps_triples_before_the_error() {
    let mut info = FeatureVectorInfo::new();
    let err = info.extend_from_spec("true 0 4 false 0 1 maybe 0 1").unwrap_err();
    assert!(matches!(err, Error::BoundParse { position: 6, .. }));
    assert_eq!(info.size(), 2);
    assert!(info.is_discrete(0));
    assert!(!info.is_discrete(1));

    let err = "0 2 1".parse::<FeatureVectorInfo>().unwrap_err();
    assert!(matches!(err, Error::InvalidBound { .. }));
}
