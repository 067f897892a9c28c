//! Particle state, lifecycle, and per-step integration

use swirl_core::{Color, Vec3};

/// Lifespan a particle falls back to when its template's is not positive
const DEFAULT_LIFESPAN: f32 = 1000.0;

/// Immutable parameters a particle resets to on every (re)birth.
///
/// Captured once at pool-construction time and never mutated; a refresh
/// builds brand-new templates instead of migrating old ones.
#[derive(Clone, Copy, Debug)]
pub struct ParticleTemplate {
    pub position: Vec3,
    pub mass: f32,
    pub damping: f32,
    /// Lifespan in milliseconds
    pub lifespan: f32,
    pub scale: f32,
    pub color: Color,
}

impl Default for ParticleTemplate {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            mass: 1.0,
            damping: 0.0,
            lifespan: DEFAULT_LIFESPAN,
            scale: 1.0,
            color: Color::GRAY,
        }
    }
}

/// One simulated point particle.
///
/// Mutated in place every frame while active; expiry resets it from its
/// template rather than deallocating (object pooling, no churn).
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub mass: f32,
    pub damping: f32,
    pub lifespan: f32,
    pub color: Color,
    /// Timestamp (ms) at which this particle dies and respawns
    pub end_time: f64,
    template: ParticleTemplate,
}

impl Particle {
    /// Build a particle from its template.
    ///
    /// Freshly constructed particles start fully transparent so a pool
    /// appearing all at once does not pop in. Lifecycle respawns restore
    /// the template alpha — the asymmetry is deliberate.
    pub fn new(template: ParticleTemplate, now: f64) -> Self {
        let mut p = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            mass: template.mass,
            damping: template.damping,
            lifespan: template.lifespan,
            color: template.color,
            end_time: 0.0,
            template,
        };
        p.restart(now);
        p.color.a = 0.0;
        p
    }

    pub fn template(&self) -> &ParticleTemplate {
        &self.template
    }

    /// Reset all kinematic and visual state from the template.
    /// Always succeeds; `end_time` becomes `now + lifespan`.
    pub fn restart(&mut self, now: f64) {
        self.position = self.template.position;
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.mass = self.template.mass;
        self.damping = self.template.damping;
        // A non-positive lifespan would respawn the particle every frame
        // with undefined alpha; treat it like an unset field instead.
        self.lifespan = if self.template.lifespan > 0.0 {
            self.template.lifespan
        } else {
            DEFAULT_LIFESPAN
        };
        self.color = self.template.color;
        self.end_time = now + f64::from(self.lifespan);
    }

    /// Integrate one step under the given instantaneous force.
    ///
    /// A particle past its death timestamp restarts instead of
    /// integrating; the respawned state is not advanced this step.
    /// Integration uses a unit time step: velocities accumulate straight
    /// into positions with no dt scaling.
    pub fn update(&mut self, now: f64, force: Vec3) {
        if now > self.end_time {
            self.restart(now);
            return;
        }

        self.acceleration = force / self.mass;
        self.velocity = self.velocity + self.acceleration;
        // Discrete per-step drag, applied after the physical acceleration
        let drag = -self.velocity * self.damping;
        self.velocity = self.velocity + drag;
        self.position = self.position + self.velocity;

        self.color.a = ((self.end_time - now) / f64::from(self.lifespan)) as f32;
    }
}
