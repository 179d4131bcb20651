//! Dimension abstraction over glam's f64 vectors
//!
//! The engine is generic over [`Vector`] so that the dimensionality of a run
//! is fixed by the type: an `Engine<DVec2>` only ever holds planar bodies.

use glam::{DVec2, DVec3};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A fixed-length state vector (position, velocity, acceleration, force)
pub trait Vector:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
{
    /// Number of components (D)
    const DIM: usize;
    const ZERO: Self;

    fn length(self) -> f64;

    fn is_finite(self) -> bool;

    /// Build a vector from exactly `DIM` components, `None` otherwise
    fn from_slice(components: &[f64]) -> Option<Self>;

    fn to_vec(self) -> Vec<f64>;

    /// Embed into 3D space, padding missing components with zero
    fn to_xyz(self) -> DVec3;
}

impl Vector for DVec2 {
    const DIM: usize = 2;
    const ZERO: Self = DVec2::ZERO;

    fn length(self) -> f64 {
        DVec2::length(self)
    }

    fn is_finite(self) -> bool {
        DVec2::is_finite(self)
    }

    fn from_slice(components: &[f64]) -> Option<Self> {
        match components {
            [x, y] => Some(DVec2::new(*x, *y)),
            _ => None,
        }
    }

    fn to_vec(self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn to_xyz(self) -> DVec3 {
        self.extend(0.0)
    }
}

impl Vector for DVec3 {
    const DIM: usize = 3;
    const ZERO: Self = DVec3::ZERO;

    fn length(self) -> f64 {
        DVec3::length(self)
    }

    fn is_finite(self) -> bool {
        DVec3::is_finite(self)
    }

    fn from_slice(components: &[f64]) -> Option<Self> {
        match components {
            [x, y, z] => Some(DVec3::new(*x, *y, *z)),
            _ => None,
        }
    }

    fn to_vec(self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn to_xyz(self) -> DVec3 {
        self
    }
}
