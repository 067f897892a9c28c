//! Runs the simulation without a GPU, printing a per-frame summary.
//!
//! Demonstrates the `BufferSink` seam: anything that can receive the
//! flat buffers can stand in for the renderer.

use swirl_sim::{BufferSink, ParticleSystem, SimulationSettings};

struct StdoutSink;

impl BufferSink for StdoutSink {
    fn allocate(&mut self, positions: &[f32], colors: &[f32], scales: &[f32]) {
        println!(
            "allocated buffers: {} position floats, {} color floats, {} scales",
            positions.len(),
            colors.len(),
            scales.len()
        );
    }

    fn upload(&mut self, positions: &[f32], _colors: &[f32]) {
        let first = &positions[..3.min(positions.len())];
        println!("uploaded; first particle at {:?}", first);
    }
}

fn main() {
    let settings = SimulationSettings {
        num_particles: 8,
        spawn_interval: 0.05,
        ..Default::default()
    };

    let mut sink = StdoutSink;
    let mut system = ParticleSystem::new();
    system
        .refresh(0.0, &settings, &mut sink)
        .expect("default settings are valid");

    // Sixty simulated frames at ~16ms each
    for frame in 1..=60 {
        let now = frame as f64 * 16.0;
        system.update(now, &mut sink);
        println!(
            "frame {:2}: {}/{} particles active",
            frame,
            system.spawn_bound(),
            system.len()
        );
    }
}
