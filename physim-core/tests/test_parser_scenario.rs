//! Parser tests for scenario files

use physim_core::{parse_scenario, BodyKind, Physics, UpdateOrder, DEFAULT_SAMPLES};

#[test]
fn test_parse_minimal_scenario() {
    let source = r#"
simulate dims = 3 t_max = 100
physics dynamics, gravity
body earth at (0.0, 0.0, 0.0) mass 5.97e24
"#;

    let scenario = parse_scenario(source).expect("Failed to parse");
    assert_eq!(scenario.simulate.dims, 3);
    assert_eq!(scenario.simulate.t_max, 100.0);
    assert_eq!(scenario.simulate.samples, DEFAULT_SAMPLES);
    assert_eq!(scenario.simulate.order, UpdateOrder::Snapshot);
    assert!(scenario.physics.dynamics());
    assert!(scenario.physics.contains(Physics::Gravity));
    assert!(!scenario.physics.contains(Physics::Electric));

    assert_eq!(scenario.bodies.len(), 1);
    let earth = &scenario.bodies[0];
    assert_eq!(earth.name, "earth");
    assert_eq!(earth.mass, 5.97e24);
    assert_eq!(earth.charge, 0.0);
    assert_eq!(earth.kind, BodyKind::Point);
    assert_eq!(earth.position, vec![0.0, 0.0, 0.0]);
    assert!(earth.velocity.is_none());
}

#[test]
fn test_parse_body_attributes_in_any_order() {
    let source = r#"
simulate dims = 2 t_max = 1.0 samples = 50 order = sequential
physics electric
physics dynamics
body ion at (1, -2) charge -1.6e-19 velocity (0.5, 0) mass 2.0 kind point force (0, 0) acceleration (1, 1)
"#;

    let scenario = parse_scenario(source).expect("Failed to parse");
    assert_eq!(scenario.simulate.samples, 50);
    assert_eq!(scenario.simulate.order, UpdateOrder::Sequential);
    assert!(scenario.physics.dynamics());
    assert!(scenario.physics.contains(Physics::Electric));

    let ion = &scenario.bodies[0];
    assert_eq!(ion.mass, 2.0);
    assert_eq!(ion.charge, -1.6e-19);
    assert_eq!(ion.position, vec![1.0, -2.0]);
    assert_eq!(ion.velocity, Some(vec![0.5, 0.0]));
    assert_eq!(ion.acceleration, Some(vec![1.0, 1.0]));
    assert_eq!(ion.force, Some(vec![0.0, 0.0]));
}

#[test]
fn test_parse_keeps_declaration_order() {
    let source = r#"
# bodies are simulated in the order they are declared
body c at (0, 0) mass 1
body a at (1, 0) mass 1
simulate dims = 2 t_max = 1
body b at (2, 0) mass 1
"#;

    let scenario = parse_scenario(source).expect("Failed to parse");
    let names: Vec<_> = scenario.bodies.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn test_vector_length_is_not_checked_by_parser() {
    let source = "simulate dims = 3 t_max = 1\nbody flat at (1, 2) mass 1\n";
    let scenario = parse_scenario(source).expect("Failed to parse");
    assert_eq!(scenario.bodies[0].position.len(), 2);
}

#[test]
fn test_parse_errors() {
    let cases = [
        ("body a at (0, 0) mass 1\n", "Missing 'simulate'"),
        ("simulate dims = 2\n", "Expected 't_max'"),
        ("simulate t_max = 1\n", "Expected 'dims'"),
        ("simulate dims = 2 t_max = 1\nsimulate dims = 3 t_max = 1\n", "Duplicate 'simulate'"),
        ("simulate dims = 2 t_max = 1 speed = 3\n", "Unknown simulate setting"),
        ("simulate dims = 2 t_max = 1 order = leapfrog\n", "unknown update order"),
        ("simulate dims = 2.5 t_max = 1\n", "non-negative integer"),
        ("simulate dims = 2 t_max = 1\nphysics dynamics magnetism\n", "unknown physics 'magnetism'"),
        ("simulate dims = 2 t_max = 1\nbody a (0, 0) mass 1\n", "Expected 'at'"),
        ("simulate dims = 2 t_max = 1\nbody a at (0, 0)\n", "Expected 'mass'"),
        ("simulate dims = 2 t_max = 1\nbody a at (0, zero) mass 1\n", "Invalid number 'zero'"),
        ("simulate dims = 2 t_max = 1\nbody a at 0, 0 mass 1\n", "Expected '('"),
        ("simulate dims = 2 t_max = 1\nbody a at (0, 0) mass 1 mass 2\n", "Duplicate attribute 'mass'"),
        ("simulate dims = 2 t_max = 1\nbody a at (0, 0) mass 1 spin 3\n", "Unknown body attribute 'spin'"),
        ("simulate dims = 2 t_max = 1\nbody a at (0, 0) mass 1 kind rigid\n", "unknown body kind"),
        ("simulate dims = 2 t_max = 1\nparticle a at (0, 0) mass 1\n", "Unexpected token: particle"),
    ];

    for (source, expected) in cases {
        let err = parse_scenario(source).expect_err(source);
        assert!(
            err.to_string().contains(expected),
            "Error for {:?} should mention {:?}, got {:?}",
            source,
            expected,
            err.to_string()
        );
    }
}

#[test]
fn test_parse_error_span_points_at_line() {
    let source = "simulate dims = 2 t_max = 1\nbody a at (0, 0) mass oops\n";
    let err = parse_scenario(source).unwrap_err();
    let span = err.span().expect("span should be set");
    assert_eq!(span.location(source).line, 2);
}
