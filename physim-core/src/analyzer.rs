//! Static checks on parsed scenarios
//!
//! Catches inputs the engine would reject or fault on before any
//! integration happens, and warns about configurations that are legal but
//! probably not what was meant.

use crate::ast::Scenario;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::MAX_SAMPLES;
use crate::physics::Physics;
use std::collections::HashMap;

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let simulate = &scenario.simulate;
    let physics = &scenario.physics;

    if simulate.dims != 2 && simulate.dims != 3 {
        diagnostics.push(Diagnostic::error(
            format!("dims must be 2 or 3, got {}", simulate.dims),
            simulate.span,
        ));
    }
    if simulate.t_max <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("t_max must be positive, got {}", simulate.t_max),
            simulate.span,
        ));
    }
    if simulate.samples < 2 {
        diagnostics.push(Diagnostic::error(
            format!("samples must be at least 2, got {}", simulate.samples),
            simulate.span,
        ));
    } else if simulate.samples > MAX_SAMPLES {
        diagnostics.push(Diagnostic::error(
            format!("samples must be at most {}, got {}", MAX_SAMPLES, simulate.samples),
            simulate.span,
        ));
    }

    // Names are display labels, so duplicates only warn
    let mut seen = HashMap::new();
    for (idx, body) in scenario.bodies.iter().enumerate() {
        if let Some(first) = seen.insert(body.name.as_str(), idx) {
            diagnostics.push(Diagnostic::warning(
                format!(
                    "body name '{}' is used more than once (bodies #{} and #{})",
                    body.name,
                    first + 1,
                    idx + 1
                ),
                body.span,
            ));
        }

        if body.mass <= 0.0 {
            diagnostics.push(Diagnostic::error(
                format!("body '{}' has mass {}; mass must be positive", body.name, body.mass),
                body.span,
            ));
        }

        for (field, components) in body.vectors() {
            if components.len() != simulate.dims {
                diagnostics.push(Diagnostic::error(
                    format!(
                        "body '{}' {} has {} components, expected {}",
                        body.name,
                        field,
                        components.len(),
                        simulate.dims
                    ),
                    body.span,
                ));
            }
        }
    }

    if physics.has_force_law() {
        for (i, a) in scenario.bodies.iter().enumerate() {
            for b in &scenario.bodies[i + 1..] {
                if a.position == b.position {
                    diagnostics.push(Diagnostic::error(
                        format!("bodies '{}' and '{}' start at the same position", a.name, b.name),
                        b.span,
                    ));
                }
            }
        }
    }

    if physics.dynamics() && !physics.has_force_law() {
        diagnostics.push(Diagnostic::warning(
            "dynamics enabled without gravity or electric; bodies will move freely",
            None,
        ));
    }
    if !physics.dynamics() {
        diagnostics.push(Diagnostic::warning(
            "dynamics is not enabled; no trajectories will be recorded",
            None,
        ));
    }
    if physics.contains(Physics::Electric) && scenario.bodies.iter().all(|b| b.charge == 0.0) {
        diagnostics.push(Diagnostic::warning(
            "electric enabled but every body is neutral",
            None,
        ));
    }

    diagnostics
}
