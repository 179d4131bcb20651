//! Analyzer tests for scenario validation

use physim_core::{
    analyze_scenario, build_simulation_context_from_source, parse_scenario, RuntimeError,
};

fn analyze(source: &str) -> physim_core::Diagnostics {
    let scenario = parse_scenario(source).expect("Failed to parse");
    analyze_scenario(&scenario)
}

#[test]
fn test_valid_scenario_has_no_diagnostics() {
    let diagnostics = analyze(
        r#"
simulate dims = 3 t_max = 1
physics dynamics, gravity, electric
body a at (0, 0, 0) mass 1 charge 1e-6
body b at (1, 0, 0) mass 1 charge -1e-6
"#,
    );
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {}", diagnostics);
}

#[test]
fn test_duplicate_names_only_warn() {
    let diagnostics = analyze(
        r#"
simulate dims = 2 t_max = 1
physics dynamics, gravity
body rock at (0, 0) mass 1
body rock at (1, 0) mass 1
"#,
    );
    assert!(!diagnostics.has_errors());
    assert!(diagnostics
        .warnings()
        .any(|w| w.message.contains("'rock' is used more than once")));
}

#[test]
fn test_non_positive_mass_is_an_error() {
    let diagnostics = analyze(
        r#"
simulate dims = 2 t_max = 1
physics dynamics, gravity
body ghost at (0, 0) mass 0
body anti at (1, 0) mass -2
"#,
    );
    assert_eq!(diagnostics.errors().count(), 2);
}

#[test]
fn test_dimension_mismatch_is_an_error() {
    let diagnostics = analyze(
        r#"
simulate dims = 3 t_max = 1
physics dynamics
body flat at (0, 0) mass 1 velocity (1, 0, 0, 0)
"#,
    );
    let errors: Vec<_> = diagnostics.errors().map(|e| e.message.clone()).collect();
    assert_eq!(errors.len(), 2, "{:?}", errors);
    assert!(errors[0].contains("position has 2 components, expected 3"));
    assert!(errors[1].contains("velocity has 4 components, expected 3"));
}

#[test]
fn test_bad_simulate_settings() {
    let diagnostics = analyze("simulate dims = 4 t_max = 0 samples = 1\nphysics dynamics\n");
    let errors: Vec<_> = diagnostics.errors().map(|e| e.message.clone()).collect();
    assert_eq!(errors.len(), 3, "{:?}", errors);
}

#[test]
fn test_coincident_bodies_with_force_law() {
    let source = r#"
simulate dims = 2 t_max = 1
physics dynamics, electric
body a at (1, 1) mass 1 charge 1e-6
body b at (1, 1) mass 1 charge 1e-6
"#;
    let diagnostics = analyze(source);
    assert!(diagnostics
        .errors()
        .any(|e| e.message.contains("start at the same position")));

    // Without a force law the pair never interacts
    let free = source.replace("physics dynamics, electric", "physics dynamics");
    assert!(!analyze(&free).has_errors());
}

#[test]
fn test_physics_warnings() {
    let no_laws = analyze("simulate dims = 2 t_max = 1\nphysics dynamics\nbody a at (0, 0) mass 1\n");
    assert!(no_laws.warnings().any(|w| w.message.contains("without gravity or electric")));

    let no_dynamics = analyze("simulate dims = 2 t_max = 1\nphysics gravity\nbody a at (0, 0) mass 1\n");
    assert!(no_dynamics.warnings().any(|w| w.message.contains("dynamics is not enabled")));

    let neutral = analyze(
        "simulate dims = 2 t_max = 1\nphysics dynamics electric\nbody a at (0, 0) mass 1\nbody b at (1, 0) mass 1\n",
    );
    assert!(neutral.warnings().any(|w| w.message.contains("every body is neutral")));
}

#[test]
fn test_analysis_errors_abort_build() {
    let err = build_simulation_context_from_source(
        "simulate dims = 2 t_max = 1\nphysics dynamics\nbody a at (0, 0) mass 0\n",
    )
    .unwrap_err();
    match err {
        RuntimeError::Analysis(diagnostics) => assert_eq!(diagnostics.errors().count(), 1),
        other => panic!("expected analysis error, got {other}"),
    }
}

#[test]
fn test_oversized_sample_count_is_rejected() {
    let source = "simulate dims = 2 t_max = 1 samples = 18446744073709551615\nphysics gravity\nbody a at (0, 0) mass 1\n";
    let diagnostics = analyze(source);
    assert!(diagnostics
        .errors()
        .any(|e| e.message.contains("samples must be at most")));

    let err = physim_core::run_scenario(source).unwrap_err();
    assert!(matches!(err, RuntimeError::Analysis(_)), "got {err}");
}
