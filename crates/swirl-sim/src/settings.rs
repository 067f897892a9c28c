//! The settings snapshot: every tunable of the simulation
//!
//! Loaded from TOML; every field carries a default so a partial file
//! works. Out-of-range numeric values are clamped rather than rejected —
//! the file is live-editable and a bad slider value must never take the
//! frame loop down. Only a malformed base color is a hard error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use swirl_core::{parse_hex_color, Color, Result};

/// Immutable-per-generation configuration record.
///
/// A refresh replaces the whole snapshot; particles are rebuilt from the
/// new one, never migrated. Durations are milliseconds except
/// `spawn_interval`, which is seconds (matching the control-panel units).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_num_particles")]
    pub num_particles: usize,

    /// Base particle color as a `#rrggbb` hex string
    #[serde(default = "default_base_color")]
    pub base_color: String,
    /// Hue jitter in degrees
    #[serde(default = "default_d_hue")]
    pub d_hue: f32,
    /// Saturation jitter in percent
    #[serde(default = "default_d_color")]
    pub d_saturation: f32,
    /// Brightness jitter in percent
    #[serde(default = "default_d_color")]
    pub d_brightness: f32,

    #[serde(default = "default_lifespan")]
    pub lifespan: f32,
    #[serde(default = "default_d_lifespan")]
    pub d_lifespan: f32,

    /// Velocity decay per step, 0 (none) through 1 inclusive (full
    /// stop, the top of the control-panel range)
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_base_mass")]
    pub base_mass: f32,
    #[serde(default)]
    pub d_mass: f32,

    #[serde(default = "default_base_scale")]
    pub base_scale: f32,
    #[serde(default = "default_d_scale")]
    pub d_scale: f32,

    #[serde(default = "default_curl")]
    pub curl: f32,
    /// Gravity magnitude, applied along +Y (positive values push up)
    #[serde(default)]
    pub gravity: f32,

    #[serde(default = "default_gradually_spawn")]
    pub gradually_spawn: bool,
    /// Interval between staggered admissions, in seconds
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval: f32,

    /// PRNG seed for template sampling; same seed, same pool
    #[serde(default = "default_seed")]
    pub seed: u32,
}

fn default_num_particles() -> usize {
    40
}
fn default_base_color() -> String {
    "#a6ed8f".to_string()
}
fn default_d_hue() -> f32 {
    15.0
}
fn default_d_color() -> f32 {
    15.0
}
fn default_lifespan() -> f32 {
    4000.0
}
fn default_d_lifespan() -> f32 {
    500.0
}
fn default_damping() -> f32 {
    0.9
}
fn default_base_mass() -> f32 {
    1.2
}
fn default_base_scale() -> f32 {
    24.0
}
fn default_d_scale() -> f32 {
    8.0
}
fn default_curl() -> f32 {
    1.0
}
fn default_gradually_spawn() -> bool {
    true
}
fn default_spawn_interval() -> f32 {
    0.2
}
fn default_seed() -> u32 {
    0xDEAD_BEEF
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_particles: default_num_particles(),
            base_color: default_base_color(),
            d_hue: default_d_hue(),
            d_saturation: default_d_color(),
            d_brightness: default_d_color(),
            lifespan: default_lifespan(),
            d_lifespan: default_d_lifespan(),
            damping: default_damping(),
            base_mass: default_base_mass(),
            d_mass: 0.0,
            base_scale: default_base_scale(),
            d_scale: default_d_scale(),
            curl: default_curl(),
            gravity: 0.0,
            gradually_spawn: default_gradually_spawn(),
            spawn_interval: default_spawn_interval(),
            seed: default_seed(),
        }
    }
}

impl SimulationSettings {
    /// Clamped copy with the base color validated.
    ///
    /// Numeric fields are floored/clamped into sane ranges instead of
    /// erroring; an unparseable `base_color` is the one hard failure.
    pub fn sanitized(&self) -> Result<Self> {
        parse_hex_color(&self.base_color)?;
        Ok(Self {
            num_particles: self.num_particles.max(1),
            d_hue: self.d_hue.max(0.0),
            d_saturation: self.d_saturation.max(0.0),
            d_brightness: self.d_brightness.max(0.0),
            lifespan: self.lifespan.max(0.0),
            d_lifespan: self.d_lifespan.max(0.0),
            damping: self.damping.clamp(0.0, 1.0),
            base_mass: self.base_mass,
            d_mass: self.d_mass.max(0.0),
            base_scale: self.base_scale,
            d_scale: self.d_scale.max(0.0),
            spawn_interval: self.spawn_interval.max(0.0),
            ..self.clone()
        })
    }

    /// The parsed base color. Call on sanitized settings.
    pub fn base_color_rgb(&self) -> Result<Color> {
        parse_hex_color(&self.base_color)
    }
}

/// Load settings from a TOML file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<SimulationSettings> {
    let content = fs::read_to_string(path)?;
    let settings: SimulationSettings = toml::from_str(&content)?;
    Ok(settings)
}
