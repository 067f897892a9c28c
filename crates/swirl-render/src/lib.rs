//! Swirl Render - wgpu-based renderer for the particle simulation
//!
//! Owns the device/surface bring-up, the orbit camera, and the
//! billboarded particle pipeline that consumes the simulation's flat
//! buffer mirrors.

mod camera;
mod context;
mod particle_pipeline;

pub use camera::Camera;
pub use context::{RenderContext, RenderError};
pub use particle_pipeline::{ParticleRenderer, ParticleUniforms};
