use crate::body::BodyKind;
use crate::diagnostics::Span;
use crate::integrator::UpdateOrder;
use crate::physics::PhysicsSet;

/// A parsed scenario file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub simulate: SimulateDecl,
    pub physics: PhysicsSet,
    pub bodies: Vec<BodyDecl>,
}

/// Simulation settings: `simulate dims = 3 t_max = 1.0 [samples = n] [order = ..]`
#[derive(Debug, Clone)]
pub struct SimulateDecl {
    pub dims: usize,
    pub t_max: f64,
    pub samples: usize,
    pub order: UpdateOrder,
    pub span: Option<Span>,
}

/// Body declaration: `body name at (..) mass m [charge q] [kind point] [velocity (..)] ...`
///
/// Vector literals keep their parsed length; checking them against `dims`
/// is left to the analyzer and the runtime.
#[derive(Debug, Clone)]
pub struct BodyDecl {
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64,
    pub charge: f64,
    pub position: Vec<f64>,
    pub velocity: Option<Vec<f64>>,
    pub acceleration: Option<Vec<f64>>,
    pub force: Option<Vec<f64>>,
    pub span: Option<Span>,
}

impl BodyDecl {
    /// Named vector fields present on this declaration
    pub fn vectors(&self) -> impl Iterator<Item = (&'static str, &[f64])> {
        [
            ("position", Some(self.position.as_slice())),
            ("velocity", self.velocity.as_deref()),
            ("acceleration", self.acceleration.as_deref()),
            ("force", self.force.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}
