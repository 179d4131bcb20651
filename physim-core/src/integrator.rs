use crate::body::Body;
use crate::vector::Vector;

/// How the bodies of one time sample see each other while they are advanced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateOrder {
    /// Compute every body's force from the pre-step state, then advance all
    /// bodies. The result does not depend on collection order.
    #[default]
    Snapshot,
    /// Compute and apply one body at a time in collection order; later
    /// bodies see earlier ones already advanced within the same step.
    Sequential,
}

impl std::str::FromStr for UpdateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snapshot" => Ok(UpdateOrder::Snapshot),
            "sequential" => Ok(UpdateOrder::Sequential),
            other => Err(format!(
                "unknown update order '{}' (expected snapshot or sequential)",
                other
            )),
        }
    }
}

/// Advance one body by `dt` under `force` with semi-implicit Euler.
///
/// Acceleration accumulates (`a += F/m`) and is never reset between steps.
/// Velocity is then updated from the new acceleration and position from the
/// new velocity, in that order.
pub fn advance<V: Vector>(body: &mut Body<V>, force: V, dt: f64) {
    body.force = force;
    body.acceleration += force / body.mass;
    body.velocity += body.acceleration * dt;
    body.position += body.velocity * dt;
}
