use crate::analyzer::analyze_scenario;
use crate::ast::{BodyDecl, Scenario};
use crate::body::Body;
use crate::diagnostics::Diagnostics;
use crate::engine::{Engine, EngineError};
use crate::parser::{parse_scenario, ParseError};
use crate::render::Renderer;
use crate::vector::Vector;
use glam::{DVec2, DVec3};
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("scenario has errors:\n{0}")]
    Analysis(Diagnostics),
    #[error("body '{body}' {field} has {found} components, expected {expected}")]
    DimensionMismatch {
        body: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("unsupported dimension {0}; expected 2 or 3")]
    UnsupportedDimension(usize),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Final state of one body after a run
#[derive(Debug, Clone, PartialEq)]
pub struct BodySummary {
    pub name: String,
    pub samples: usize,
    pub final_time: Option<f64>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
}

/// Outcome of running a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub dims: usize,
    pub bodies: Vec<BodySummary>,
    pub kinetic_energy: f64,
    pub momentum: Vec<f64>,
}

/// An engine whose dimension was chosen at runtime
#[derive(Debug, Clone)]
pub enum SimulationContext {
    Planar(Engine<DVec2>),
    Spatial(Engine<DVec3>),
}

impl SimulationContext {
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Planar(engine) => engine.dimensions(),
            Self::Spatial(engine) => engine.dimensions(),
        }
    }

    pub fn body_count(&self) -> usize {
        match self {
            Self::Planar(engine) => engine.bodies().len(),
            Self::Spatial(engine) => engine.bodies().len(),
        }
    }

    pub fn run(&mut self) -> Result<(), EngineError> {
        match self {
            Self::Planar(engine) => engine.run(),
            Self::Spatial(engine) => engine.run(),
        }
    }

    pub fn run_with<R>(&mut self, renderer: &mut R) -> Result<(), EngineError>
    where
        R: Renderer<DVec2> + Renderer<DVec3>,
    {
        match self {
            Self::Planar(engine) => engine.run_with(renderer),
            Self::Spatial(engine) => engine.run_with(renderer),
        }
    }

    pub fn result(&self) -> SimulationResult {
        match self {
            Self::Planar(engine) => summarize(engine),
            Self::Spatial(engine) => summarize(engine),
        }
    }
}

fn summarize<V: Vector>(engine: &Engine<V>) -> SimulationResult {
    let bodies = engine
        .bodies()
        .iter()
        .map(|body| BodySummary {
            name: body.name.clone(),
            samples: body.history().len(),
            final_time: body.history().time().last().copied(),
            position: body.position.to_vec(),
            velocity: body.velocity.to_vec(),
        })
        .collect();

    SimulationResult {
        dims: engine.dimensions(),
        bodies,
        kinetic_energy: engine.kinetic_energy(),
        momentum: engine.total_momentum().to_vec(),
    }
}

/// Build an engine of the scenario's dimension
pub fn build_simulation_context(scenario: &Scenario) -> Result<SimulationContext, RuntimeError> {
    match scenario.simulate.dims {
        2 => Ok(SimulationContext::Planar(build_engine(scenario)?)),
        3 => Ok(SimulationContext::Spatial(build_engine(scenario)?)),
        other => Err(RuntimeError::UnsupportedDimension(other)),
    }
}

fn build_engine<V: Vector>(scenario: &Scenario) -> Result<Engine<V>, RuntimeError> {
    let bodies = scenario
        .bodies
        .iter()
        .map(build_body)
        .collect::<Result<Vec<Body<V>>, _>>()?;

    let simulate = &scenario.simulate;
    let engine = Engine::with_samples(bodies, scenario.physics, simulate.t_max, simulate.samples)?
        .with_order(simulate.order);
    Ok(engine)
}

fn build_body<V: Vector>(decl: &BodyDecl) -> Result<Body<V>, RuntimeError> {
    let vector = |field: &'static str, components: &[f64]| {
        V::from_slice(components).ok_or_else(|| RuntimeError::DimensionMismatch {
            body: decl.name.clone(),
            field,
            expected: V::DIM,
            found: components.len(),
        })
    };

    let mut body = Body::new(decl.name.clone(), decl.mass)
        .with_kind(decl.kind)
        .with_charge(decl.charge)
        .at(vector("position", decl.position.as_slice())?);
    if let Some(velocity) = &decl.velocity {
        body = body.with_velocity(vector("velocity", velocity.as_slice())?);
    }
    if let Some(acceleration) = &decl.acceleration {
        body = body.with_acceleration(vector("acceleration", acceleration.as_slice())?);
    }
    if let Some(force) = &decl.force {
        body = body.with_force(vector("force", force.as_slice())?);
    }
    Ok(body)
}

/// Parse, analyze and build a scenario. Analysis errors abort; warnings are
/// logged and returned alongside the context.
pub fn build_simulation_context_from_source(
    source: &str,
) -> Result<(SimulationContext, Diagnostics), RuntimeError> {
    let scenario = parse_scenario(source)?;
    let diagnostics = analyze_scenario(&scenario);
    if diagnostics.has_errors() {
        return Err(RuntimeError::Analysis(diagnostics));
    }
    for warning in diagnostics.warnings() {
        warn!("{}", warning.render(source));
    }

    let ctx = build_simulation_context(&scenario)?;
    Ok((ctx, diagnostics))
}

/// Main entry point: parse and run a scenario
pub fn run_scenario(source: &str) -> Result<SimulationResult, RuntimeError> {
    let (mut ctx, _diagnostics) = build_simulation_context_from_source(source)?;
    ctx.run()?;
    Ok(ctx.result())
}

/// Run a scenario and hand its trajectories to `renderer`
pub fn run_scenario_with<R>(source: &str, renderer: &mut R) -> Result<SimulationResult, RuntimeError>
where
    R: Renderer<DVec2> + Renderer<DVec3>,
{
    let (mut ctx, _diagnostics) = build_simulation_context_from_source(source)?;
    ctx.run_with(renderer)?;
    Ok(ctx.result())
}
