//! Enabled-physics capabilities
//!
//! A run is configured with a small set of tags drawn from
//! `dynamics`, `gravity` and `electric`. They are stored as bit flags so the
//! per-step membership checks are constant time.

use crate::body::Body;
use crate::forces::{f_electric, f_gravity};
use crate::vector::Vector;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Physics {
    /// Integration of motion; without it `run()` leaves histories empty
    Dynamics,
    Gravity,
    Electric,
}

impl Physics {
    pub const ALL: [Physics; 3] = [Physics::Dynamics, Physics::Gravity, Physics::Electric];

    fn bit(self) -> u8 {
        match self {
            Physics::Dynamics => 1 << 0,
            Physics::Gravity => 1 << 1,
            Physics::Electric => 1 << 2,
        }
    }

    /// The pairwise force law behind this tag, if any
    pub fn force_law(self) -> Option<ForceLaw> {
        match self {
            Physics::Dynamics => None,
            Physics::Gravity => Some(ForceLaw::Gravity),
            Physics::Electric => Some(ForceLaw::Electric),
        }
    }
}

impl fmt::Display for Physics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Physics::Dynamics => "dynamics",
            Physics::Gravity => "gravity",
            Physics::Electric => "electric",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown physics '{0}' (expected one of: dynamics, gravity, electric)")]
pub struct UnknownPhysics(pub String);

impl FromStr for Physics {
    type Err = UnknownPhysics;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dynamics" => Ok(Physics::Dynamics),
            "gravity" => Ok(Physics::Gravity),
            "electric" => Ok(Physics::Electric),
            other => Err(UnknownPhysics(other.to_string())),
        }
    }
}

/// A pairwise force law: the force on the first body due to the second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceLaw {
    Gravity,
    Electric,
}

impl ForceLaw {
    pub fn evaluate<V: Vector>(self, a: &Body<V>, b: &Body<V>) -> V {
        match self {
            ForceLaw::Gravity => f_gravity(a, b),
            ForceLaw::Electric => f_electric(a, b),
        }
    }
}

/// Set of enabled physics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsSet {
    bits: u8,
}

impl PhysicsSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn with(mut self, physics: Physics) -> Self {
        self.insert(physics);
        self
    }

    pub fn insert(&mut self, physics: Physics) {
        self.bits |= physics.bit();
    }

    pub fn contains(&self, physics: Physics) -> bool {
        self.bits & physics.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn dynamics(&self) -> bool {
        self.contains(Physics::Dynamics)
    }

    /// Enabled force laws, gravity before electric
    pub fn force_laws(&self) -> impl Iterator<Item = ForceLaw> + '_ {
        Physics::ALL
            .into_iter()
            .filter(move |p| self.contains(*p))
            .filter_map(Physics::force_law)
    }

    pub fn has_force_law(&self) -> bool {
        self.force_laws().next().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = Physics> + '_ {
        Physics::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Physics> for PhysicsSet {
    fn from_iter<I: IntoIterator<Item = Physics>>(iter: I) -> Self {
        let mut set = PhysicsSet::empty();
        for physics in iter {
            set.insert(physics);
        }
        set
    }
}

impl FromStr for PhysicsSet {
    type Err = UnknownPhysics;

    /// Parse a comma and/or whitespace separated list of tags
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tag| !tag.is_empty())
            .map(str::parse::<Physics>)
            .collect()
    }
}

impl fmt::Display for PhysicsSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", tags.join(", "))
    }
}
