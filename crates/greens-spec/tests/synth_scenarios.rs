use std::f64::consts::PI;

use greens_core::{EigenPair, PairSet};
use greens_spec::{
    lorentzian, synthesise, synthesise_parallel, SpectralParameters, MAX_SAMPLES,
};

fn two_pairs() -> PairSet {
    vec![EigenPair::new(0.0, 2.0), EigenPair::new(1.0, 1.0)].into()
}

fn unit_window() -> SpectralParameters {
    SpectralParameters {
        min_frequency: 0.0,
        max_frequency: 1.0,
        step: 1.0,
        broadening: 0.1,
        reference_energy: 0.0,
        include_ground: true,
        lowdin_cutoff: 5,
    }
}

#[test]
fn two_pair_scenario_matches_hand_computation() {
    let curve = synthesise(&two_pairs(), 2.0, &unit_window()).expect("curve");
    assert_eq!(curve.len(), 2);

    let at_zero = 0.1 * 1.0 / (PI * 0.01) + 0.1 * 0.25 / (PI * 1.01);
    let at_one = 0.1 * 1.0 / (PI * 1.01) + 0.1 * 0.25 / (PI * 0.01);
    let points = curve.points();
    assert_eq!(points[0].omega, 0.0);
    assert_eq!(points[1].omega, 1.0);
    assert!((points[0].intensity - at_zero).abs() < 1e-12);
    assert!((points[1].intensity - at_one).abs() < 1e-12);
    assert!((points[0].intensity - 3.191).abs() < 1e-3);
}

#[test]
fn skipping_ground_removes_first_contribution() {
    let mut params = unit_window();
    params.max_frequency = 2.0;
    params.step = 0.25;
    let with_ground = synthesise(&two_pairs(), 2.0, &params).expect("with ground");
    params.include_ground = false;
    let without_ground = synthesise(&two_pairs(), 2.0, &params).expect("without ground");

    for (full, partial) in with_ground.iter().zip(without_ground.iter()) {
        let ground = lorentzian(full.omega, 0.0, 0.1, 1.0);
        assert_eq!(full.omega, partial.omega);
        assert!((full.intensity - ground - partial.intensity).abs() < 1e-12);
    }
}

#[test]
fn reference_energy_shifts_peaks() {
    let pairs: PairSet = vec![EigenPair::new(0.0, 1.0), EigenPair::new(-1.5, 1.0)].into();
    let params = SpectralParameters {
        min_frequency: 0.0,
        max_frequency: 3.0,
        step: 0.5,
        reference_energy: -3.0,
        ..SpectralParameters::default()
    };
    let curve = synthesise(&pairs, 1.0, &params).expect("curve");
    let peak = curve
        .iter()
        .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
        .expect("non-empty");
    assert_eq!(peak.omega, 1.5);
}

#[test]
fn sample_count_uses_ceiling() {
    let params = SpectralParameters {
        min_frequency: 0.0,
        max_frequency: 1.0,
        step: 0.3,
        include_ground: true,
        ..SpectralParameters::default()
    };
    let curve = synthesise(&two_pairs(), 2.0, &params).expect("curve");
    assert_eq!(curve.len(), 5);
    let last = curve.points()[4].omega;
    assert!((last - 1.2).abs() < 1e-12);
}

#[test]
fn default_window_has_four_hundred_and_one_samples() {
    let params = SpectralParameters::default();
    assert_eq!(params.sample_count().expect("count"), 401);
}

#[test]
fn degenerate_window_has_single_sample() {
    let mut params = unit_window();
    params.max_frequency = params.min_frequency;
    let curve = synthesise(&two_pairs(), 2.0, &params).expect("curve");
    assert_eq!(curve.len(), 1);
}

#[test]
fn inverted_range_is_a_config_error() {
    let mut params = unit_window();
    params.max_frequency = -1.0;
    let err = synthesise(&two_pairs(), 2.0, &params).expect_err("inverted");
    assert!(err.is_config());
    assert_eq!(err.info().code, "invalid-range");
}

#[test]
fn non_positive_step_is_a_config_error() {
    let mut params = unit_window();
    params.step = 0.0;
    let err = synthesise(&two_pairs(), 2.0, &params).expect_err("zero step");
    assert_eq!(err.info().code, "invalid-step");
    params.step = -0.1;
    let err = synthesise(&two_pairs(), 2.0, &params).expect_err("negative step");
    assert_eq!(err.info().code, "invalid-step");
}

#[test]
fn oversized_window_is_rejected_before_allocation() {
    let params = SpectralParameters {
        step: 1e-18,
        ..unit_window()
    };
    let err = params.sample_count().expect_err("too many samples");
    assert!(err.is_config());
    assert_eq!(err.info().code, "invalid-step");

    let err = synthesise(&two_pairs(), 1.0, &params).expect_err("too many samples");
    assert_eq!(err.info().code, "invalid-step");
    let err = synthesise_parallel(&two_pairs(), 1.0, &params, 2).expect_err("too many samples");
    assert_eq!(err.info().code, "invalid-step");
}

#[test]
fn largest_window_stays_within_sample_ceiling() {
    let params = SpectralParameters {
        max_frequency: (MAX_SAMPLES - 1) as f64,
        ..unit_window()
    };
    assert_eq!(params.sample_count().expect("count"), MAX_SAMPLES);

    let params = SpectralParameters {
        max_frequency: MAX_SAMPLES as f64,
        ..unit_window()
    };
    assert!(params.sample_count().is_err());
}

#[test]
fn non_positive_broadening_is_a_config_error() {
    let mut params = unit_window();
    params.broadening = 0.0;
    let err = synthesise(&two_pairs(), 2.0, &params).expect_err("zero broadening");
    assert_eq!(err.info().code, "invalid-broadening");
}

#[test]
fn non_finite_parameters_are_rejected() {
    let mut params = unit_window();
    params.reference_energy = f64::NAN;
    let err = synthesise(&two_pairs(), 2.0, &params).expect_err("nan");
    assert_eq!(err.info().code, "non-finite-parameter");
}

#[test]
fn empty_pair_set_is_an_error() {
    let err = synthesise(&PairSet::new(), 1.0, &unit_window()).expect_err("empty");
    assert!(err.is_config());
    assert_eq!(err.info().code, "no-retained-pairs");
}

#[test]
fn ground_only_pair_set_is_an_error_without_ground() {
    let pairs: PairSet = vec![EigenPair::new(0.0, 1.0)].into();
    let mut params = unit_window();
    params.include_ground = false;
    let err = synthesise(&pairs, 1.0, &params).expect_err("nothing retained");
    assert_eq!(err.info().code, "no-retained-pairs");
    params.include_ground = true;
    assert!(synthesise(&pairs, 1.0, &params).is_ok());
}

#[test]
fn zero_norm_is_rejected() {
    let err = synthesise(&two_pairs(), 0.0, &unit_window()).expect_err("zero norm");
    assert_eq!(err.info().code, "invalid-norm");
}

#[test]
fn repeated_synthesis_is_bit_identical() {
    let params = SpectralParameters {
        include_ground: true,
        ..SpectralParameters::default()
    };
    let first = synthesise(&two_pairs(), 2.0, &params).expect("first");
    let second = synthesise(&two_pairs(), 2.0, &params).expect("second");
    assert_eq!(first, second);
}

#[test]
fn parallel_matches_sequential() {
    let pairs: PairSet = (0..40)
        .map(|idx| EigenPair::new(idx as f64 * 0.1, 1.0 / (idx as f64 + 1.0)))
        .collect();
    let params = SpectralParameters::default();
    let sequential = synthesise(&pairs, 1.3, &params).expect("sequential");
    let parallel = synthesise_parallel(&pairs, 1.3, &params, 4).expect("parallel");
    assert_eq!(sequential, parallel);
}

#[test]
fn lorentzian_has_unit_area() {
    let broadening = 0.1;
    let step = 0.001;
    let area: f64 = (0..200_000)
        .map(|idx| -100.0 + idx as f64 * step)
        .map(|x| lorentzian(x, 0.0, broadening, 1.0) * step)
        .sum();
    assert!((area - 1.0).abs() < 1e-3, "area = {area}");
}
