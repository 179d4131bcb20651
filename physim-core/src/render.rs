//! Handoff of finished trajectories to a rendering collaborator

use crate::body::Body;
use crate::vector::Vector;
use thiserror::Error;

/// Failure reported by a renderer
#[derive(Debug, Error)]
#[error("renderer failed: {0}")]
pub struct RenderError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl RenderError {
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// Consumer of the per-body histories recorded by a run.
///
/// Called once after the time grid is exhausted. `dims` is the engine's
/// dimensionality; the bodies are read-only.
pub trait Renderer<V: Vector> {
    fn render(&mut self, dims: usize, bodies: &[Body<V>]) -> Result<(), RenderError>;
}

/// Renderer that discards the handoff
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl<V: Vector> Renderer<V> for NullRenderer {
    fn render(&mut self, _dims: usize, _bodies: &[Body<V>]) -> Result<(), RenderError> {
        Ok(())
    }
}
