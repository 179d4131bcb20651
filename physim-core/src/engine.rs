use crate::body::Body;
use crate::integrator::{advance, UpdateOrder};
use crate::physics::PhysicsSet;
use crate::render::{RenderError, Renderer};
use crate::vector::Vector;
use log::{debug, info, trace, warn};
use thiserror::Error;

/// Number of samples in the time grid
pub const DEFAULT_SAMPLES: usize = 1000;

/// Largest time grid an engine will allocate
pub const MAX_SAMPLES: usize = 10_000_000;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("body '{body}' has mass {mass}; mass must be positive and finite")]
    InvalidMass { body: String, mass: f64 },
    #[error("body '{body}' has a non-finite initial state")]
    NonFiniteState { body: String },
    #[error("maximum time must be positive and finite, got {0}")]
    InvalidTimeHorizon(f64),
    #[error("time grid needs between 2 and {max} samples, got {0}", max = MAX_SAMPLES)]
    InvalidSampleCount(usize),
    #[error("bodies '{first}' and '{second}' coincide at t = {time}")]
    CoincidentBodies {
        first: String,
        second: String,
        time: f64,
    },
    /// Raised after the step at `time` has been applied but before it is
    /// logged. Under [`UpdateOrder::Sequential`] only the bodies up to and
    /// including `body` have moved; under [`UpdateOrder::Snapshot`] all have.
    #[error("state of body '{body}' became non-finite at t = {time}")]
    Diverged { body: String, time: f64 },
    #[error("no body at index {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Fixed-grid N-body simulation over bodies of dimension `V::DIM`
#[derive(Debug, Clone)]
pub struct Engine<V: Vector> {
    bodies: Vec<Body<V>>,
    physics: PhysicsSet,
    order: UpdateOrder,
    t_max: f64,
    time: Vec<f64>,
    time_step: f64,
    now: f64,
}

impl<V: Vector> Engine<V> {
    /// Build an engine over a uniform grid of [`DEFAULT_SAMPLES`] samples on `[0, t_max]`
    pub fn new(bodies: Vec<Body<V>>, physics: PhysicsSet, t_max: f64) -> Result<Self, EngineError> {
        Self::with_samples(bodies, physics, t_max, DEFAULT_SAMPLES)
    }

    pub fn with_samples(
        bodies: Vec<Body<V>>,
        physics: PhysicsSet,
        t_max: f64,
        samples: usize,
    ) -> Result<Self, EngineError> {
        if !t_max.is_finite() || t_max <= 0.0 {
            return Err(EngineError::InvalidTimeHorizon(t_max));
        }
        if !(2..=MAX_SAMPLES).contains(&samples) {
            return Err(EngineError::InvalidSampleCount(samples));
        }
        for body in &bodies {
            if !body.mass.is_finite() || body.mass <= 0.0 {
                return Err(EngineError::InvalidMass {
                    body: body.name.clone(),
                    mass: body.mass,
                });
            }
            if !body.is_finite() {
                return Err(EngineError::NonFiniteState {
                    body: body.name.clone(),
                });
            }
        }

        let time = time_grid(t_max, samples);
        let time_step = time[1] - time[0];

        debug!(
            "engine: {} bodies, D = {}, physics [{}], {} samples, time_step = {:e}",
            bodies.len(),
            V::DIM,
            physics,
            samples,
            time_step
        );

        Ok(Self {
            bodies,
            physics,
            order: UpdateOrder::default(),
            t_max,
            time,
            time_step,
            now: 0.0,
        })
    }

    pub fn with_order(mut self, order: UpdateOrder) -> Self {
        self.order = order;
        self
    }

    pub fn dimensions(&self) -> usize {
        V::DIM
    }

    pub fn physics(&self) -> PhysicsSet {
        self.physics
    }

    pub fn order(&self) -> UpdateOrder {
        self.order
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn bodies(&self) -> &[Body<V>] {
        &self.bodies
    }

    pub fn into_bodies(self) -> Vec<Body<V>> {
        self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body<V>> {
        self.bodies.get(index)
    }

    /// Integrate over the whole time grid.
    ///
    /// Does nothing unless dynamics is enabled. Each call appends one history
    /// entry per sample to every body.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if !self.physics.dynamics() {
            warn!("dynamics disabled; skipping integration");
            return Ok(());
        }
        if self.bodies.is_empty() {
            debug!("no bodies to integrate");
            return Ok(());
        }

        info!(
            "integrating {} bodies over {} samples up to t = {}",
            self.bodies.len(),
            self.time.len(),
            self.t_max
        );
        for sample in 0..self.time.len() {
            let t = self.time[sample];
            self.step(t)?;
        }
        info!("run finished at t = {}", self.now);
        Ok(())
    }

    /// [`run`](Self::run), then hand the bodies to `renderer`.
    ///
    /// An empty collection is not handed off.
    pub fn run_with<R>(&mut self, renderer: &mut R) -> Result<(), EngineError>
    where
        R: Renderer<V> + ?Sized,
    {
        self.run()?;
        if self.bodies.is_empty() {
            return Ok(());
        }
        renderer.render(V::DIM, &self.bodies)?;
        Ok(())
    }

    /// Advance every body once and log the new state at `t`
    pub fn step(&mut self, t: f64) -> Result<(), EngineError> {
        self.now = t;
        trace!("step t = {}", t);

        match self.order {
            UpdateOrder::Snapshot => {
                let forces = (0..self.bodies.len())
                    .map(|index| self.forces(index))
                    .collect::<Result<Vec<_>, _>>()?;
                for (body, force) in self.bodies.iter_mut().zip(forces) {
                    advance(body, force, self.time_step);
                }
                for index in 0..self.bodies.len() {
                    self.check_finite(index)?;
                }
            }
            UpdateOrder::Sequential => {
                for index in 0..self.bodies.len() {
                    self.motion(index)?;
                }
            }
        }

        for body in &mut self.bodies {
            body.log(t);
        }
        Ok(())
    }

    /// Net force on the body at `index` from every other body, summed over
    /// the enabled force laws. Zero when no law is enabled or the body is alone.
    pub fn forces(&self, index: usize) -> Result<V, EngineError> {
        let body = self.checked(index)?;
        let mut total = V::ZERO;

        for law in self.physics.force_laws() {
            for (other_index, other) in self.bodies.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                if (body.position - other.position).length() == 0.0 {
                    return Err(EngineError::CoincidentBodies {
                        first: body.name.clone(),
                        second: other.name.clone(),
                        time: self.now,
                    });
                }
                total += law.evaluate(body, other);
            }
        }

        Ok(total)
    }

    /// Integrate the body at `index` by one time step against the current
    /// state of the others
    pub fn motion(&mut self, index: usize) -> Result<(), EngineError> {
        let force = self.forces(index)?;
        advance(&mut self.bodies[index], force, self.time_step);
        self.check_finite(index)
    }

    pub fn total_momentum(&self) -> V {
        self.bodies
            .iter()
            .fold(V::ZERO, |acc, body| acc + body.velocity * body.mass)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|body| {
                let speed = body.velocity.length();
                0.5 * body.mass * speed * speed
            })
            .sum()
    }

    fn checked(&self, index: usize) -> Result<&Body<V>, EngineError> {
        self.bodies.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.bodies.len(),
        })
    }

    fn check_finite(&self, index: usize) -> Result<(), EngineError> {
        let body = &self.bodies[index];
        if body.is_finite() {
            Ok(())
        } else {
            Err(EngineError::Diverged {
                body: body.name.clone(),
                time: self.now,
            })
        }
    }
}

/// `samples` evenly spaced points from 0 to `t_max` inclusive
fn time_grid(t_max: f64, samples: usize) -> Vec<f64> {
    let spacing = t_max / (samples - 1) as f64;
    let mut grid: Vec<f64> = (0..samples).map(|i| i as f64 * spacing).collect();
    grid[samples - 1] = t_max;
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Physics;
    use glam::DVec2;

    fn gravity() -> PhysicsSet {
        PhysicsSet::empty().with(Physics::Dynamics).with(Physics::Gravity)
    }

    #[test]
    fn time_grid_is_uniform_and_inclusive() {
        let grid = time_grid(2.0, 5);
        assert_eq!(grid, vec![0.0, 0.5, 1.0, 1.5, 2.0]);

        let engine: Engine<DVec2> = Engine::new(Vec::new(), gravity(), 999.0).unwrap();
        assert_eq!(engine.time().len(), DEFAULT_SAMPLES);
        assert_eq!(engine.time_step(), 1.0);
        assert_eq!(engine.time()[DEFAULT_SAMPLES - 1], 999.0);
    }

    #[test]
    fn rejects_bad_construction() {
        let massless = vec![Body::<DVec2>::new("ghost", 0.0)];
        assert!(matches!(
            Engine::new(massless, gravity(), 1.0),
            Err(EngineError::InvalidMass { .. })
        ));

        let nan = vec![Body::<DVec2>::new("nan", 1.0).at(DVec2::new(f64::NAN, 0.0))];
        assert!(matches!(
            Engine::new(nan, gravity(), 1.0),
            Err(EngineError::NonFiniteState { .. })
        ));

        assert!(matches!(
            Engine::<DVec2>::new(Vec::new(), gravity(), 0.0),
            Err(EngineError::InvalidTimeHorizon(_))
        ));
        assert!(matches!(
            Engine::<DVec2>::with_samples(Vec::new(), gravity(), 1.0, 1),
            Err(EngineError::InvalidSampleCount(1))
        ));
    }

    #[test]
    fn rejects_oversized_grid() {
        assert!(matches!(
            Engine::<DVec2>::with_samples(Vec::new(), gravity(), 1.0, usize::MAX),
            Err(EngineError::InvalidSampleCount(usize::MAX))
        ));
        assert!(matches!(
            Engine::<DVec2>::with_samples(Vec::new(), gravity(), 1.0, MAX_SAMPLES + 1),
            Err(EngineError::InvalidSampleCount(_))
        ));
    }

    fn runaway_pair() -> Vec<Body<DVec2>> {
        // The light body's acceleration overflows on the first step
        vec![
            Body::new("tiny", 1e-300),
            Body::new("huge", 1e300).at(DVec2::new(1e-10, 0.0)),
        ]
    }

    #[test]
    fn overflow_aborts_with_diverged() {
        let mut engine = Engine::new(runaway_pair(), gravity(), 1.0).unwrap();
        let err = engine.run().unwrap_err();
        match err {
            EngineError::Diverged { body, time } => {
                assert_eq!(body, "tiny");
                assert_eq!(time, 0.0);
            }
            other => panic!("expected Diverged, got {other:?}"),
        }
        let lengths: Vec<usize> = engine.bodies().iter().map(|b| b.history().len()).collect();
        assert_eq!(lengths, vec![0, 0]);
    }

    #[test]
    fn snapshot_divergence_leaves_every_body_advanced() {
        let mut engine = Engine::new(runaway_pair(), gravity(), 1.0).unwrap();
        assert!(engine.run().is_err());

        // Both bodies took the step that faulted, so neither is at rest
        let huge = &engine.bodies()[1];
        assert!(huge.velocity.x < 0.0);
        assert!(!engine.bodies()[0].is_finite());
    }

    #[test]
    fn sequential_divergence_stops_at_the_faulting_body() {
        let mut engine = Engine::new(runaway_pair(), gravity(), 1.0)
            .unwrap()
            .with_order(UpdateOrder::Sequential);
        assert!(matches!(engine.run(), Err(EngineError::Diverged { .. })));
        assert_eq!(engine.bodies()[1].velocity, DVec2::ZERO);
    }

    #[test]
    fn forces_exclude_self() {
        let bodies = vec![Body::<DVec2>::new("solo", 5.0)];
        let engine = Engine::new(bodies, gravity(), 1.0).unwrap();
        assert_eq!(engine.forces(0).unwrap(), DVec2::ZERO);
    }

    #[test]
    fn forces_reject_bad_index() {
        let engine: Engine<DVec2> = Engine::new(Vec::new(), gravity(), 1.0).unwrap();
        assert!(matches!(
            engine.forces(3),
            Err(EngineError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[test]
    fn coincident_bodies_abort() {
        let bodies = vec![Body::<DVec2>::new("a", 1.0), Body::new("b", 1.0)];
        let mut engine = Engine::new(bodies, gravity(), 1.0).unwrap();
        let err = engine.run().unwrap_err();
        assert!(matches!(err, EngineError::CoincidentBodies { .. }));
    }

    #[test]
    fn coincident_bodies_are_fine_without_force_laws() {
        let bodies = vec![Body::<DVec2>::new("a", 1.0), Body::new("b", 1.0)];
        let physics = PhysicsSet::empty().with(Physics::Dynamics);
        let mut engine = Engine::new(bodies, physics, 1.0).unwrap();
        engine.run().unwrap();
        assert_eq!(engine.bodies()[0].history().len(), DEFAULT_SAMPLES);
    }

    #[test]
    fn motion_advances_only_the_given_body() {
        let bodies = vec![
            Body::<DVec2>::new("a", 1.0),
            Body::new("b", 1.0).at(DVec2::new(1.0, 0.0)),
        ];
        let mut engine = Engine::with_samples(bodies, gravity(), 1.0, 2).unwrap();
        engine.motion(0).unwrap();

        let a = &engine.bodies()[0];
        let b = &engine.bodies()[1];
        assert!(a.force.x > 0.0);
        assert!(a.position.x > 0.0);
        assert_eq!(b.position, DVec2::new(1.0, 0.0));
        assert_eq!(b.force, DVec2::ZERO);
        assert!(a.history().is_empty());
    }

    #[test]
    fn momentum_and_energy_of_state() {
        let bodies = vec![
            Body::<DVec2>::new("a", 2.0).with_velocity(DVec2::new(3.0, 0.0)),
            Body::new("b", 1.0)
                .at(DVec2::new(5.0, 0.0))
                .with_velocity(DVec2::new(0.0, -4.0)),
        ];
        let engine = Engine::new(bodies, gravity(), 1.0).unwrap();
        assert_eq!(engine.total_momentum(), DVec2::new(6.0, -4.0));
        assert_eq!(engine.kinetic_energy(), 9.0 + 8.0);
    }
}
