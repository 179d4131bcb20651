//! Discrete-time N-body simulation of point masses and charges.
//!
//! [`Engine`] integrates [`Body`] trajectories under gravity and
//! electrostatics on a fixed time grid and hands the recorded histories to a
//! [`Renderer`]. Scenario files are parsed by [`parse_scenario`] and run
//! through [`run_scenario`].

pub mod analyzer;
pub mod ast;
pub mod body;
pub mod diagnostics;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod parser;
pub mod physics;
pub mod render;
pub mod runtime;
pub mod vector;

pub use analyzer::analyze_scenario;
pub use body::{Body, BodyKind, History};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::{Engine, EngineError, DEFAULT_SAMPLES, MAX_SAMPLES};
pub use forces::{f_electric, f_gravity, G, K};
pub use integrator::UpdateOrder;
pub use parser::{parse_scenario, ParseError};
pub use physics::{ForceLaw, Physics, PhysicsSet, UnknownPhysics};
pub use render::{NullRenderer, RenderError, Renderer};
pub use runtime::{
    build_simulation_context, build_simulation_context_from_source, run_scenario,
    run_scenario_with, BodySummary, RuntimeError, SimulationContext, SimulationResult,
};
pub use vector::Vector;
