use greens_core::{EigenPair, PairSet};
use greens_spec::{synthesise, SpectralParameters};
use proptest::prelude::*;

fn pair_strategy() -> impl Strategy<Value = Vec<EigenPair>> {
    prop::collection::vec((-5.0f64..5.0, -3.0f64..3.0), 2..12).prop_map(|raw| {
        raw.into_iter()
            .map(|(eigenvalue, weight)| EigenPair::new(eigenvalue, weight))
            .collect()
    })
}

fn params_strategy() -> impl Strategy<Value = SpectralParameters> {
    (
        -2.0f64..2.0,
        0.0f64..3.0,
        0.05f64..0.5,
        0.01f64..1.0,
        -1.0f64..1.0,
        any::<bool>(),
    )
        .prop_map(|(min, span, step, broadening, reference, include_ground)| {
            SpectralParameters {
                min_frequency: min,
                max_frequency: min + span,
                step,
                broadening,
                reference_energy: reference,
                include_ground,
                lowdin_cutoff: 5,
            }
        })
}

proptest! {
    #[test]
    fn grid_has_expected_length_and_spacing(
        pairs in pair_strategy(),
        params in params_strategy(),
        norm in 0.5f64..4.0,
    ) {
        let pairs = PairSet::from(pairs);
        let curve = synthesise(&pairs, norm, &params).unwrap();
        let expected = ((params.max_frequency - params.min_frequency) / params.step).ceil() as usize + 1;
        prop_assert_eq!(curve.len(), expected);
        for (idx, point) in curve.iter().enumerate() {
            prop_assert_eq!(point.omega, params.min_frequency + idx as f64 * params.step);
        }
    }

    #[test]
    fn intensity_is_non_negative(
        pairs in pair_strategy(),
        params in params_strategy(),
        norm in -4.0f64..-0.5,
    ) {
        let pairs = PairSet::from(pairs);
        let curve = synthesise(&pairs, norm, &params).unwrap();
        prop_assert!(curve.iter().all(|point| point.intensity >= 0.0));
    }

    #[test]
    fn ground_state_skip_removes_exactly_first_pair(
        pairs in pair_strategy(),
        mut params in params_strategy(),
        norm in 0.5f64..4.0,
    ) {
        let full_set = PairSet::from(pairs.clone());
        let without_first = PairSet::from(pairs[1..].to_vec());

        params.include_ground = false;
        let skipped = synthesise(&full_set, norm, &params).unwrap();
        params.include_ground = true;
        let trimmed = synthesise(&without_first, norm, &params).unwrap();
        prop_assert_eq!(skipped, trimmed);
    }
}
