//! Pairwise force laws
//!
//! Both laws return the force acting on `a` due to `b`. Neither guards
//! against coincident bodies: at zero separation the result is non-finite,
//! and the engine refuses to evaluate such a pair.

use crate::body::Body;
use crate::vector::Vector;

/// Gravitational constant (m^3 kg^-1 s^-2)
pub const G: f64 = 6.67430e-11;

/// Coulomb's constant (N m^2 C^-2)
pub const K: f64 = 8.9875517923e9;

/// Newtonian gravity on `a` due to `b`.
///
/// The scalar `-G m_a m_b / r^2` is applied along the unit vector from `b`
/// to `a`. The negative coefficient flips that direction, so the result
/// points from `a` toward `b`: gravity attracts.
pub fn f_gravity<V: Vector>(a: &Body<V>, b: &Body<V>) -> V {
    let separation = a.position - b.position;
    let distance = separation.length();
    let magnitude = -G * a.mass * b.mass / (distance * distance);
    separation * (magnitude / distance)
}

/// Coulomb force on `a` due to `b`, `k q_a q_b / r^2` along the unit vector
/// from `b` to `a`. Like charges repel, opposite charges attract.
pub fn f_electric<V: Vector>(a: &Body<V>, b: &Body<V>) -> V {
    let separation = a.position - b.position;
    let distance = separation.length();
    let magnitude = K * a.charge * b.charge / (distance * distance);
    separation * (magnitude / distance)
}
