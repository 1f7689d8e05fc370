//! Integration tests for the effsize pipeline
//!
//! These exercise the end-to-end flow on simulated within-subjects
//! experiments: aggregation, the repeated-measures estimator, the
//! subject-level bootstrap, and the merged report.

use effsize::prelude::*;
use effsize::{DataError, aggregate, fit_anova};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Simulate the reference scenario: 6 subjects, layout in {0,1},
/// size in {0,1,2}, color in {0,1,2,3}, 20 repetitions per cell.
///
/// Response model: `30 + 2*handicap + handicap*(0.4*layout + 0.2*size
/// + 0.6*layout*size + noise)`. Color never enters the response.
fn simulate_scenario(noise_sd: f64, rng_seed: u64) -> Vec<Trial> {
    let mut rng = StdRng::seed_from_u64(rng_seed);
    let noise = Normal::new(0.0, noise_sd.max(f64::MIN_POSITIVE)).unwrap();
    let mut trials = Vec::new();

    for subject in 0..6 {
        let handicap = 0.5 + subject as f64 * 0.3;
        for layout in 0..2 {
            for size in 0..3 {
                for color in 0..4 {
                    for repetition in 0..20 {
                        let e = if noise_sd > 0.0 {
                            noise.sample(&mut rng)
                        } else {
                            0.0
                        };
                        let response = 30.0
                            + 2.0 * handicap
                            + handicap
                                * (0.4 * layout as f64
                                    + 0.2 * size as f64
                                    + 0.6 * (layout * size) as f64
                                    + e);
                        trials.push(Trial::new(
                            format!("p{subject}"),
                            &[
                                &layout.to_string(),
                                &size.to_string(),
                                &color.to_string(),
                            ],
                            repetition,
                            response,
                        ));
                    }
                }
            }
        }
    }
    trials
}

fn scenario_config(replicates: usize) -> AnalysisConfig {
    AnalysisConfig {
        factors: vec!["layout".into(), "size".into(), "color".into()],
        replicates,
        ..Default::default()
    }
}

fn ges_of(report: &EffectSizeReport, effect: &str) -> f64 {
    report
        .effects
        .iter()
        .find(|row| row.effect == effect)
        .unwrap_or_else(|| panic!("missing effect {effect}"))
        .ges
}

#[test]
fn test_scenario_ranks_signal_effects_above_color() {
    let trials = simulate_scenario(0.2, 9);
    let report = analyze(&trials, &scenario_config(200)).unwrap();

    let layout = ges_of(&report, "layout");
    let size = ges_of(&report, "size");
    let interaction = ges_of(&report, "layout:size");
    let color = ges_of(&report, "color");

    for signal in [layout, size, interaction] {
        assert!(signal > 0.02, "signal effect too small: {signal}");
        assert!(signal > 4.0 * color, "signal {signal} not above color {color}");
    }

    // color and everything involving color carry no injected signal
    for row in &report.effects {
        if row.effect.contains("color") {
            assert!(
                row.ges < 0.005,
                "{} should be near zero, got {}",
                row.effect,
                row.ges
            );
        }
    }
}

#[test]
fn test_zero_noise_signal_beats_null() {
    let trials = simulate_scenario(0.0, 0);
    let data = aggregate(
        &["layout".into(), "size".into(), "color".into()],
        &trials,
    )
    .unwrap();
    let rows = fit_anova(&data, &[]).unwrap();

    let layout = rows.iter().find(|r| r.effect == "layout").unwrap();
    let color = rows.iter().find(|r| r.effect == "color").unwrap();
    assert!(layout.ges > color.ges);
    assert!(color.ges < 1e-9);
}

#[test]
fn test_report_intervals_are_ordered() {
    let trials = simulate_scenario(0.2, 5);
    let report = analyze(&trials, &scenario_config(120)).unwrap();

    assert_eq!(report.effects.len(), 7);
    for row in &report.effects {
        assert!(
            row.ges_conf_low <= row.ges_conf_high,
            "{}: [{}, {}]",
            row.effect,
            row.ges_conf_low,
            row.ges_conf_high
        );
    }
}

#[test]
fn test_missing_cell_aborts_before_analysis() {
    let trials: Vec<Trial> = simulate_scenario(0.2, 3)
        .into_iter()
        .filter(|t| !(t.subject == "p2" && t.levels == ["1", "2", "3"]))
        .collect();

    let err = analyze(&trials, &scenario_config(50)).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Data(DataError::MissingCell { ref subject, .. }) if subject == "p2"
    ));
}

#[test]
fn test_analysis_is_deterministic_for_fixed_seed() {
    let trials = simulate_scenario(0.2, 11);
    let config = scenario_config(100);

    let first = analyze(&trials, &config).unwrap();
    let second = analyze(&trials, &config).unwrap();
    assert_eq!(first.effects, second.effects);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_interval_width_converges_with_replicates() {
    let trials = simulate_scenario(0.2, 17);

    let width = |replicates: usize| {
        let report = analyze(&trials, &scenario_config(replicates)).unwrap();
        let row = report
            .effects
            .iter()
            .find(|r| r.effect == "layout")
            .unwrap();
        row.ges_conf_high - row.ges_conf_low
    };

    let w800 = width(800);
    let w3200 = width(3200);
    assert!(w800 > 0.0 && w3200 > 0.0);
    // widths stabilize: large-N estimates agree within a modest margin
    assert!(
        (w800 - w3200).abs() / w3200 < 0.3,
        "widths diverge: {w800} vs {w3200}"
    );
}

#[test]
fn test_small_replicate_count_degrades_with_warning_not_failure() {
    let trials = simulate_scenario(0.2, 21);
    let report = analyze(&trials, &scenario_config(20)).unwrap();

    // point estimates available, intervals degraded and flagged
    assert_eq!(report.effects.len(), 7);
    assert!(!report.warnings.is_empty());
    for row in &report.effects {
        assert!(row.ges.is_finite());
        assert!(row.ges_conf_low <= row.ges_conf_high);
    }
}

#[test]
fn test_observed_factor_must_be_a_factor() {
    let trials = simulate_scenario(0.2, 2);
    let config = AnalysisConfig {
        observed: vec!["not_a_factor".into()],
        ..scenario_config(50)
    };

    let err = analyze(&trials, &config).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Data(DataError::UnknownFactor { .. })
    ));
}

#[test]
fn test_report_serializes_to_json() {
    let trials = simulate_scenario(0.2, 13);
    let report = analyze(&trials, &scenario_config(60)).unwrap();

    let json = generate_json_report(&report).unwrap();
    let parsed: EffectSizeReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.effects, report.effects);

    let csv = generate_csv_report(&report);
    assert_eq!(csv.lines().count(), 8);

    let table = format_human_output(&report);
    assert!(table.contains("layout:size:color"));
}
