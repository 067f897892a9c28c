//! Pool orchestration and the CPU-side buffer mirror
//!
//! `ParticleSystem` owns the particle pool, the force field, the spawn
//! schedule, and three flat arrays mirroring per-particle state in the
//! layout the renderer consumes (position x3, color x4, scale x1 per
//! slot, indexed identically to the pool).

use crate::field::ForceField;
use crate::particle::{Particle, ParticleTemplate};
use crate::rand::SimRng;
use crate::schedule::SpawnSchedule;
use crate::settings::SimulationSettings;
use swirl_core::{hsl_to_rgb, rgb_to_hsl, Color, Result, Vec3};

/// World-space attractor center
const FIELD_CENTER: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Spawn positions are jittered by this much on x and z
const SPAWN_JITTER: f32 = 5.0;

/// Mass never samples below this
const MASS_FLOOR: f32 = 0.1;

/// The renderer-facing seam: receives the flat buffers.
///
/// `allocate` is called once per refresh with buffers sized for the new
/// pool; `upload` once per frame with the position/color mirrors. Scale
/// is fixed per generation and never re-uploaded.
pub trait BufferSink {
    fn allocate(&mut self, positions: &[f32], colors: &[f32], scales: &[f32]);
    fn upload(&mut self, positions: &[f32], colors: &[f32]);
}

/// The particle simulation: fixed pool, force field, spawn schedule, and
/// buffer mirrors, rebuilt wholesale on every settings change.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    schedule: SpawnSchedule,
    field: ForceField,
    settings: SimulationSettings,
    positions: Vec<f32>,
    colors: Vec<f32>,
    scales: Vec<f32>,
}

impl ParticleSystem {
    /// An empty system; call `refresh` to build the first generation.
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            schedule: SpawnSchedule::immediate(0),
            field: ForceField::new(FIELD_CENTER, Vec3::ZERO, 0.0),
            settings: SimulationSettings::default(),
            positions: Vec::new(),
            colors: Vec::new(),
            scales: Vec::new(),
        }
    }

    /// Rebuild the pool, buffers, and schedule from a new settings
    /// snapshot.
    ///
    /// Replacing the schedule cancels any in-flight stagger from the
    /// previous generation. Each particle's template is sampled
    /// independently from the seeded RNG, so identical settings produce
    /// an identical pool.
    pub fn refresh(
        &mut self,
        now: f64,
        settings: &SimulationSettings,
        sink: &mut impl BufferSink,
    ) -> Result<()> {
        let settings = settings.sanitized()?;
        let base = settings.base_color_rgb()?;
        let (base_h, base_s, base_l) = rgb_to_hsl(base.r, base.g, base.b);

        let count = settings.num_particles;
        let mut rng = SimRng::new(settings.seed);

        self.particles = Vec::with_capacity(count);
        self.positions = vec![0.0; count * 3];
        self.colors = vec![0.0; count * 4];
        self.scales = vec![0.0; count];

        for i in 0..count {
            let h = rng.jitter(base_h, settings.d_hue).clamp(0.0, 360.0);
            let s = rng.jitter(base_s, settings.d_saturation).clamp(0.0, 100.0);
            let l = rng.jitter(base_l, settings.d_brightness).clamp(0.0, 100.0);
            let (r, g, b) = hsl_to_rgb(h, s, l);

            let scale = rng.jitter(settings.base_scale, settings.d_scale).max(0.0);
            let position = Vec3::new(
                rng.jitter(0.0, SPAWN_JITTER),
                0.0,
                rng.jitter(0.0, SPAWN_JITTER),
            );
            let mass = rng.jitter(settings.base_mass, settings.d_mass).max(MASS_FLOOR);
            let lifespan = rng.jitter(settings.lifespan, settings.d_lifespan).max(0.0);

            let template = ParticleTemplate {
                position,
                mass,
                damping: settings.damping,
                lifespan,
                scale,
                color: Color::new(r, g, b, 1.0),
            };
            self.particles.push(Particle::new(template, now));
            self.scales[i] = scale;
        }

        let gravity = Vec3::new(0.0, settings.gravity, 0.0);
        self.field = ForceField::new(FIELD_CENTER, gravity, settings.curl);

        self.schedule = if settings.gradually_spawn {
            SpawnSchedule::staggered(count, f64::from(settings.spawn_interval) * 1000.0, now)
        } else {
            SpawnSchedule::immediate(count)
        };

        sink.allocate(&self.positions, &self.colors, &self.scales);
        self.settings = settings;
        Ok(())
    }

    /// Advance one frame: admit newly due particles, integrate every
    /// slot below the spawn bound, mirror its state into the flat
    /// buffers, and hand them to the sink. Slots at or above the bound
    /// are neither integrated nor written.
    pub fn update(&mut self, now: f64, sink: &mut impl BufferSink) {
        // Invariant breaches here mean a broken refresh/schedule
        // sequence; they are fatal, not clamped.
        assert!(
            self.schedule.bound() <= self.particles.len(),
            "spawn bound {} exceeds pool size {}",
            self.schedule.bound(),
            self.particles.len()
        );
        assert_eq!(self.positions.len(), self.particles.len() * 3);
        assert_eq!(self.colors.len(), self.particles.len() * 4);
        assert_eq!(self.scales.len(), self.particles.len());

        self.schedule.advance(now);
        let bound = self.schedule.bound();
        let field = self.field;

        for particle in &mut self.particles[..bound] {
            let force = field.at(particle.position);
            particle.update(now, force);
        }

        for (i, particle) in self.particles[..bound].iter().enumerate() {
            let pos = particle.position;
            let color = particle.color;
            self.positions[i * 3] = pos.x;
            self.positions[i * 3 + 1] = pos.y;
            self.positions[i * 3 + 2] = pos.z;
            self.colors[i * 4] = color.r;
            self.colors[i * 4 + 1] = color.g;
            self.colors[i * 4 + 2] = color.b;
            self.colors[i * 4 + 3] = color.a;
        }

        sink.upload(&self.positions, &self.colors);
    }

    pub fn spawn_bound(&self) -> usize {
        self.schedule.bound()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn position_data(&self) -> &[f32] {
        &self.positions
    }

    pub fn color_data(&self) -> &[f32] {
        &self.colors
    }

    pub fn scale_data(&self) -> &[f32] {
        &self.scales
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ForceField;

    /// Test sink that records every call it receives
    #[derive(Default)]
    struct RecordingSink {
        allocations: usize,
        uploads: usize,
        positions: Vec<f32>,
        colors: Vec<f32>,
        scales: Vec<f32>,
    }

    impl BufferSink for RecordingSink {
        fn allocate(&mut self, positions: &[f32], colors: &[f32], scales: &[f32]) {
            self.allocations += 1;
            self.positions = positions.to_vec();
            self.colors = colors.to_vec();
            self.scales = scales.to_vec();
        }

        fn upload(&mut self, positions: &[f32], colors: &[f32]) {
            self.uploads += 1;
            self.positions = positions.to_vec();
            self.colors = colors.to_vec();
        }
    }

    fn immediate_settings(count: usize) -> SimulationSettings {
        SimulationSettings {
            num_particles: count,
            gradually_spawn: false,
            ..Default::default()
        }
    }

    fn staggered_settings(count: usize, interval_s: f32) -> SimulationSettings {
        SimulationSettings {
            num_particles: count,
            gradually_spawn: true,
            spawn_interval: interval_s,
            ..Default::default()
        }
    }

    #[test]
    fn refresh_sets_bound_per_mode() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();

        system.refresh(0.0, &immediate_settings(10), &mut sink).unwrap();
        assert_eq!(system.spawn_bound(), 10);
        assert_eq!(system.len(), 10);

        system
            .refresh(0.0, &staggered_settings(10, 0.1), &mut sink)
            .unwrap();
        assert_eq!(system.spawn_bound(), 0);
        assert_eq!(sink.allocations, 2);
    }

    #[test]
    fn refresh_allocates_zeroed_position_and_color_buffers() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();
        system.refresh(0.0, &immediate_settings(5), &mut sink).unwrap();

        assert_eq!(sink.positions.len(), 15);
        assert_eq!(sink.colors.len(), 20);
        assert_eq!(sink.scales.len(), 5);
        assert!(sink.positions.iter().all(|&v| v == 0.0));
        assert!(sink.colors.iter().all(|&v| v == 0.0));
        // Scales are populated at build time and within the jitter range
        for &s in &sink.scales {
            assert!(s >= 16.0 && s < 32.0);
        }
    }

    #[test]
    fn buffers_mirror_particles_below_bound() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();
        system.refresh(0.0, &immediate_settings(8), &mut sink).unwrap();

        system.update(16.0, &mut sink);
        assert_eq!(sink.uploads, 1);

        for (i, p) in system.particles().iter().enumerate() {
            assert_eq!(system.position_data()[i * 3], p.position.x);
            assert_eq!(system.position_data()[i * 3 + 1], p.position.y);
            assert_eq!(system.position_data()[i * 3 + 2], p.position.z);
            assert_eq!(system.color_data()[i * 4], p.color.r);
            assert_eq!(system.color_data()[i * 4 + 1], p.color.g);
            assert_eq!(system.color_data()[i * 4 + 2], p.color.b);
            assert_eq!(system.color_data()[i * 4 + 3], p.color.a);
        }
        assert_eq!(sink.positions, system.position_data());
        assert_eq!(sink.colors, system.color_data());
    }

    #[test]
    fn slots_at_or_above_bound_stay_untouched() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();
        // 100ms interval: after 250ms only 2 of 6 slots are admitted
        system
            .refresh(0.0, &staggered_settings(6, 0.1), &mut sink)
            .unwrap();
        system.update(250.0, &mut sink);
        assert_eq!(system.spawn_bound(), 2);

        for i in 2..6 {
            for k in 0..3 {
                assert_eq!(system.position_data()[i * 3 + k], 0.0);
            }
            for k in 0..4 {
                assert_eq!(system.color_data()[i * 4 + k], 0.0);
            }
        }
    }

    #[test]
    fn staggered_bound_grows_monotonically() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();
        system
            .refresh(0.0, &staggered_settings(5, 0.1), &mut sink)
            .unwrap();

        let mut last = 0;
        for frame in 1..40 {
            system.update(frame as f64 * 16.0, &mut sink);
            assert!(system.spawn_bound() >= last);
            last = system.spawn_bound();
        }
        // 40 frames * 16ms > 5 * 100ms: the pool must be full
        assert_eq!(system.spawn_bound(), 5);
    }

    #[test]
    fn same_seed_reproduces_pool() {
        let mut sink = RecordingSink::default();
        let settings = immediate_settings(20);

        let mut a = ParticleSystem::new();
        a.refresh(0.0, &settings, &mut sink).unwrap();
        let mut b = ParticleSystem::new();
        b.refresh(0.0, &settings, &mut sink).unwrap();

        assert_eq!(a.scale_data(), b.scale_data());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.mass, pb.mass);
            assert_eq!(pa.lifespan, pb.lifespan);
            assert_eq!(pa.color, pb.color);
        }
    }

    #[test]
    fn different_seed_changes_pool() {
        let mut sink = RecordingSink::default();
        let mut a = ParticleSystem::new();
        a.refresh(0.0, &immediate_settings(20), &mut sink).unwrap();

        let other = SimulationSettings {
            seed: 12345,
            ..immediate_settings(20)
        };
        let mut b = ParticleSystem::new();
        b.refresh(0.0, &other, &mut sink).unwrap();
        assert_ne!(a.scale_data(), b.scale_data());
    }

    #[test]
    fn sampled_templates_respect_floors() {
        let mut sink = RecordingSink::default();
        let settings = SimulationSettings {
            base_mass: 0.0,
            d_mass: 0.05,
            base_scale: 0.5,
            d_scale: 3.0,
            lifespan: 100.0,
            d_lifespan: 500.0,
            ..immediate_settings(50)
        };
        let mut system = ParticleSystem::new();
        system.refresh(0.0, &settings, &mut sink).unwrap();

        for p in system.particles() {
            assert!(p.template().mass >= 0.1);
            assert!(p.template().scale >= 0.0);
            assert!(p.template().lifespan >= 0.0);
        }
    }

    #[test]
    fn degenerate_lifespan_config_stays_finite() {
        // d_lifespan >= lifespan makes zero-lifespan samples reachable;
        // those particles must revive with the default lifespan instead
        // of respawning forever with NaN alpha.
        let mut sink = RecordingSink::default();
        let settings = SimulationSettings {
            lifespan: 100.0,
            d_lifespan: 500.0,
            ..immediate_settings(30)
        };
        let mut system = ParticleSystem::new();
        system.refresh(0.0, &settings, &mut sink).unwrap();

        for p in system.particles() {
            assert!(p.lifespan > 0.0);
        }

        for frame in 1..=20 {
            system.update(frame as f64 * 16.0, &mut sink);
            for &v in system.color_data() {
                assert!(v.is_finite());
            }
        }
        for p in system.particles() {
            assert!(p.color.a >= 0.0 && p.color.a <= 1.0);
        }
    }

    #[test]
    fn refresh_cancels_prior_stagger() {
        let mut sink = RecordingSink::default();
        let mut system = ParticleSystem::new();
        system
            .refresh(0.0, &staggered_settings(10, 0.1), &mut sink)
            .unwrap();
        system.update(450.0, &mut sink);
        assert_eq!(system.spawn_bound(), 4);

        // New generation starts its stagger from scratch at the refresh time
        system
            .refresh(450.0, &staggered_settings(10, 0.1), &mut sink)
            .unwrap();
        assert_eq!(system.spawn_bound(), 0);
        system.update(460.0, &mut sink);
        assert_eq!(system.spawn_bound(), 0);
        system.update(560.0, &mut sink);
        assert_eq!(system.spawn_bound(), 1);
    }

    #[test]
    fn radial_only_motion_without_curl_or_gravity() {
        // Pool of one, immediate spawn, zero gravity, zero curl: a
        // particle at (1, 0, 0) with the center at the origin must move
        // strictly along the outward radial.
        let template = ParticleTemplate {
            position: Vec3::new(1.0, 0.0, 0.0),
            mass: 1.0,
            damping: 0.0,
            lifespan: 1000.0,
            ..Default::default()
        };
        let mut p = Particle::new(template, 0.0);
        let field = ForceField::new(Vec3::ZERO, Vec3::ZERO, 0.0);

        let before = p.position;
        let force = field.at(p.position);
        p.update(1.0, force);

        let displacement = p.position - before;
        assert!(displacement.length() > 0.0);
        let radial = before.normalized();
        let tangential = displacement - radial * displacement.dot(&radial);
        assert!(tangential.length() < 1e-6);
        assert!(displacement.dot(&radial) > 0.0);
    }
}
