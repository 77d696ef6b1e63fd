use crate::color::Rgb;
use crate::emitter::EmitterRegistry;
use crate::grid::ParticleGrid;
use crate::settings::FieldSettings;
use crate::surface::{FrameScheduler, Surface};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Render loop lifecycle. `Running` is terminal; there is no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Before the first viewport sizing and grid generation
    #[default]
    Idle,
    Running,
}

impl LoopState {
    pub fn name(&self) -> &str {
        match self {
            LoopState::Idle => "IDLE",
            LoopState::Running => "RUNNING",
        }
    }
}

/// Everything the loop and the interaction handlers share
pub struct SimulationContext {
    pub settings: FieldSettings,
    pub emitters: EmitterRegistry,
    pub grid: ParticleGrid,
    /// Pointer in surface coordinates; None until the first move event
    pub pointer: Option<(f32, f32)>,
    /// Current viewport (surface) size
    pub width: f32,
    pub height: f32,
    pub state: LoopState,
    pub frames: u64,
    pub rng: StdRng,
}

impl SimulationContext {
    pub fn new(settings: FieldSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            emitters: EmitterRegistry::new(settings.emitter_radius as f32),
            grid: ParticleGrid::new(settings.particle_radius as f32),
            settings,
            pointer: None,
            width: 0.0,
            height: 0.0,
            state: LoopState::Idle,
            frames: 0,
            rng,
        }
    }

    /// Rebuild the whole particle grid from the viewport, spacing and emitters
    pub fn regenerate(&mut self) {
        self.grid.regenerate(
            self.width,
            self.height,
            self.settings.spacing(),
            &self.emitters,
            &mut self.rng,
        );
        tracing::debug!(
            particles = self.grid.len(),
            emitters = self.emitters.len(),
            spacing = self.settings.spacing(),
            "grid regenerated"
        );
    }

    /// Outline color for emitters against the current backdrop
    pub fn outline_color(&self) -> Rgb {
        self.settings.background.contrasting()
    }

    /// Mark the loop as running. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            tracing::info!(
                width = self.width,
                height = self.height,
                particles = self.grid.len(),
                "render loop running"
            );
        }
    }
}

/// Run one display frame: clear, draw+advance every particle, draw every
/// emitter, then ask the scheduler for the next frame.
///
/// Does nothing while the loop is still idle.
pub fn frame<S, F>(ctx: &mut SimulationContext, surface: &mut S, scheduler: &mut F)
where
    S: Surface + ?Sized,
    F: FrameScheduler + ?Sized,
{
    if ctx.state == LoopState::Idle {
        return;
    }

    surface.clear();

    let pointer = ctx.pointer;
    for particle in ctx.grid.iter_mut() {
        surface.fill_circle(particle.x, particle.y, particle.radius, particle.color);
        particle.update(pointer);
    }

    let outline = ctx.outline_color();
    for emitter in ctx.emitters.iter() {
        surface.fill_circle(emitter.x, emitter.y, emitter.radius, emitter.color);
        surface.stroke_circle(emitter.x, emitter.y, emitter.radius, outline);
    }

    ctx.frames += 1;
    scheduler.request_frame();
}
