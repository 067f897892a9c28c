//! Swirl Sim - CPU-side vortex particle simulation
//!
//! Provides a pooled particle simulation with:
//! - Per-particle kinematic integration under a vortex-and-gravity field
//! - Lifecycle respawn from immutable per-particle templates
//! - Staggered spawn scheduling with deterministic cancellation
//! - Flat position/color/scale buffer mirrors for GPU upload
//!
//! The crate knows nothing about the GPU; the `BufferSink` trait is the
//! seam a renderer implements to receive the flat buffers.

pub mod field;
pub mod particle;
pub mod rand;
pub mod schedule;
pub mod settings;
pub mod system;

pub use field::ForceField;
pub use particle::{Particle, ParticleTemplate};
pub use rand::SimRng;
pub use schedule::SpawnSchedule;
pub use settings::{load_settings, SimulationSettings};
pub use system::{BufferSink, ParticleSystem};
