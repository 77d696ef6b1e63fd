use crate::color::Rgb;
use serde::{Deserialize, Serialize};

/// Particle display radius bounds (dots)
pub const PARTICLE_RADIUS_RANGE: (u8, u8) = (1, 10);
/// Emitter display radius bounds (dots)
pub const EMITTER_RADIUS_RANGE: (u8, u8) = (5, 30);
/// Density control bounds; spacing = SPACING_BASE - density
pub const DENSITY_RANGE: (u8, u8) = (5, 30);
const SPACING_BASE: u8 = 34;

/// Emitters seeded on startup and after every viewport resize
pub const DEFAULT_EMITTER_COUNT: usize = 3;
/// Bounds on the number of seeded emitters
pub const EMITTER_COUNT_RANGE: (usize, usize) = (0, 64);

/// Global field parameters edited from the sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Surface backdrop; display only
    pub background: Rgb,
    /// Particle display radius (1-10)
    pub particle_radius: u8,
    /// Emitter display and hit-test radius (5-30)
    pub emitter_radius: u8,
    /// Grid density control (5-30), higher = tighter grid
    pub density: u8,
    /// Emitters created on (re)initialization (0-64)
    pub initial_emitters: usize,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            particle_radius: 2,
            emitter_radius: 10,
            // Spacing of 20 dots
            density: 14,
            initial_emitters: DEFAULT_EMITTER_COUNT,
        }
    }
}

impl FieldSettings {
    /// Grid sampling interval derived from the density control
    pub fn spacing(&self) -> f32 {
        (SPACING_BASE - self.density) as f32
    }

    /// Clamp every field into its documented range
    pub fn clamped(mut self) -> Self {
        self.particle_radius = self.particle_radius.clamp(PARTICLE_RADIUS_RANGE.0, PARTICLE_RADIUS_RANGE.1);
        self.emitter_radius = self.emitter_radius.clamp(EMITTER_RADIUS_RANGE.0, EMITTER_RADIUS_RANGE.1);
        self.density = self.density.clamp(DENSITY_RANGE.0, DENSITY_RANGE.1);
        self.initial_emitters = self
            .initial_emitters
            .clamp(EMITTER_COUNT_RANGE.0, EMITTER_COUNT_RANGE.1);
        self
    }

    /// Adjust particle radius within bounds
    pub fn adjust_particle_radius(&mut self, delta: i32) {
        self.particle_radius = adjust(self.particle_radius, delta, PARTICLE_RADIUS_RANGE);
    }

    /// Adjust emitter radius within bounds
    pub fn adjust_emitter_radius(&mut self, delta: i32) {
        self.emitter_radius = adjust(self.emitter_radius, delta, EMITTER_RADIUS_RANGE);
    }

    /// Adjust density within bounds
    pub fn adjust_density(&mut self, delta: i32) {
        self.density = adjust(self.density, delta, DENSITY_RANGE);
    }

    pub fn next_background(&mut self) {
        self.background = self.background.next_background();
    }

    pub fn prev_background(&mut self) {
        self.background = self.background.prev_background();
    }
}

fn adjust(value: u8, delta: i32, (min, max): (u8, u8)) -> u8 {
    (value as i32 + delta).clamp(min as i32, max as i32) as u8
}
