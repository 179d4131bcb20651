use crate::vector::Vector;
use std::fmt;
use std::str::FromStr;

/// Shape tag of a body. Only point bodies are simulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyKind {
    #[default]
    Point,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyKind::Point => write!(f, "point"),
        }
    }
}

impl FromStr for BodyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "point" => Ok(BodyKind::Point),
            other => Err(format!("unknown body kind '{}'", other)),
        }
    }
}

/// Append-only record of a body's state, one entry per logged time sample.
///
/// The five sequences are private and only grow together through
/// [`Body::log`], so entry `i` of each always belongs to `time()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct History<V: Vector> {
    time: Vec<f64>,
    position: Vec<V>,
    velocity: Vec<V>,
    acceleration: Vec<V>,
    force: Vec<V>,
}

impl<V: Vector> History<V> {
    pub fn new() -> Self {
        Self {
            time: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
            acceleration: Vec::new(),
            force: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn position(&self) -> &[V] {
        &self.position
    }

    pub fn velocity(&self) -> &[V] {
        &self.velocity
    }

    pub fn acceleration(&self) -> &[V] {
        &self.acceleration
    }

    pub fn force(&self) -> &[V] {
        &self.force
    }

    pub fn last_position(&self) -> Option<V> {
        self.position.last().copied()
    }

    fn push(&mut self, time: f64, position: V, velocity: V, acceleration: V, force: V) {
        self.time.push(time);
        self.position.push(position);
        self.velocity.push(velocity);
        self.acceleration.push(acceleration);
        self.force.push(force);
    }
}

impl<V: Vector> Default for History<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A simulated point mass/charge
///
/// The kinematic fields are read and written directly by the engine between
/// steps; the body itself performs no physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Body<V: Vector> {
    pub name: String,
    pub kind: BodyKind,
    pub mass: f64,
    pub charge: f64,
    pub position: V,
    pub velocity: V,
    pub acceleration: V,
    pub force: V,
    history: History<V>,
}

impl<V: Vector> Body<V> {
    /// Create a neutral body at rest at the origin
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Point,
            mass,
            charge: 0.0,
            position: V::ZERO,
            velocity: V::ZERO,
            acceleration: V::ZERO,
            force: V::ZERO,
            history: History::new(),
        }
    }

    pub fn at(mut self, position: V) -> Self {
        self.position = position;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_velocity(mut self, velocity: V) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: V) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_force(mut self, force: V) -> Self {
        self.force = force;
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Append the current state, tagged with `time`, to the history
    pub fn log(&mut self, time: f64) {
        self.history.push(
            time,
            self.position,
            self.velocity,
            self.acceleration,
            self.force,
        );
    }

    pub fn history(&self) -> &History<V> {
        &self.history
    }

    /// True when every state vector and scalar is finite
    pub fn is_finite(&self) -> bool {
        self.mass.is_finite()
            && self.charge.is_finite()
            && self.position.is_finite()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
            && self.force.is_finite()
    }
}
