//! Translates input events into emitter/grid mutations.
//!
//! Handlers take the [`SimulationContext`] by reference; the only state kept
//! here is the transient per-emitter action menu.

use crate::color::Rgb;
use crate::emitter::EmitterId;
use crate::simulation::SimulationContext;
use crate::surface::Surface;

/// Share of the available viewport the surface occupies, per dimension
pub const SURFACE_FRACTION: f32 = 0.9;

/// Surface extent for an available viewport extent
pub fn surface_extent(available: u16) -> u16 {
    (available as f32 * SURFACE_FRACTION).floor() as u16
}

/// Entries of the per-emitter action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChangeColor,
    Delete,
}

impl MenuAction {
    pub const ALL: [MenuAction; 2] = [MenuAction::ChangeColor, MenuAction::Delete];

    pub fn label(&self) -> &str {
        match self {
            MenuAction::ChangeColor => "Change Color",
            MenuAction::Delete => "Delete",
        }
    }
}

/// Open action menu for one emitter, anchored at a screen cell
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMenu {
    pub target: EmitterId,
    pub anchor: (u16, u16),
    pub selected: usize,
}

impl ActionMenu {
    pub fn selected_action(&self) -> MenuAction {
        MenuAction::ALL[self.selected.min(MenuAction::ALL.len() - 1)]
    }
}

#[derive(Debug, Default)]
pub struct InteractionController {
    menu: Option<ActionMenu>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(&self) -> Option<&ActionMenu> {
        self.menu.as_ref()
    }

    /// Pointer moved to surface-local (x, y). Picked up by the next frame.
    pub fn pointer_move(&self, ctx: &mut SimulationContext, x: f32, y: f32) {
        ctx.pointer = Some((x, y));
    }

    /// Viewport changed: resize the surface, reseed emitters from scratch
    /// and regenerate the grid. Any existing emitters are discarded.
    pub fn resize<S: Surface + ?Sized>(
        &mut self,
        ctx: &mut SimulationContext,
        surface: &mut S,
        width: f32,
        height: f32,
    ) {
        surface.resize(width, height);
        ctx.width = surface.width();
        ctx.height = surface.height();

        let discarded = ctx.emitters.len();
        ctx.emitters.clear();
        for _ in 0..ctx.settings.initial_emitters {
            ctx.emitters.place_random(ctx.width, ctx.height, &mut ctx.rng);
        }
        // The menu's target was just discarded
        self.menu = None;
        ctx.regenerate();

        tracing::info!(
            width = ctx.width,
            height = ctx.height,
            discarded,
            emitters = ctx.emitters.len(),
            "viewport reinitialized"
        );
    }

    /// Place an emitter at surface-local (x, y) and regenerate
    pub fn primary_click(&mut self, ctx: &mut SimulationContext, x: f32, y: f32) {
        let emitter = ctx.emitters.place(x, y, &mut ctx.rng);
        tracing::debug!(x, y, color = %emitter.color.to_hex(), "emitter placed");
        ctx.regenerate();
    }

    /// Open the action menu for the emitter under (x, y), if any.
    /// Replaces any menu already open. Returns whether a menu is now open.
    pub fn secondary_click(
        &mut self,
        ctx: &SimulationContext,
        x: f32,
        y: f32,
        screen: (u16, u16),
    ) -> bool {
        match ctx.emitters.hit_test(x, y) {
            Some(emitter) => {
                self.menu = Some(ActionMenu {
                    target: emitter.id,
                    anchor: screen,
                    selected: 0,
                });
                true
            }
            None => false,
        }
    }

    /// Close the menu without acting
    pub fn dismiss_menu(&mut self) {
        self.menu = None;
    }

    pub fn menu_nav_up(&mut self) {
        if let Some(menu) = &mut self.menu {
            if menu.selected > 0 {
                menu.selected -= 1;
            } else {
                menu.selected = MenuAction::ALL.len() - 1;
            }
        }
    }

    pub fn menu_nav_down(&mut self) {
        if let Some(menu) = &mut self.menu {
            menu.selected = (menu.selected + 1) % MenuAction::ALL.len();
        }
    }

    /// Run the highlighted menu entry
    pub fn confirm_menu(&mut self, ctx: &mut SimulationContext) {
        if let Some(action) = self.menu.as_ref().map(|m| m.selected_action()) {
            self.select(ctx, action);
        }
    }

    /// Apply `action` to the menu's target and close the menu.
    /// A target that no longer exists makes this a silent no-op.
    pub fn select(&mut self, ctx: &mut SimulationContext, action: MenuAction) {
        let Some(menu) = self.menu.take() else {
            return;
        };

        let applied = match action {
            MenuAction::ChangeColor => ctx.emitters.recolor(menu.target, &mut ctx.rng),
            MenuAction::Delete => ctx.emitters.remove(menu.target),
        };

        if applied {
            tracing::debug!(?action, target = ?menu.target, "menu action applied");
            ctx.regenerate();
        } else {
            tracing::debug!(?action, target = ?menu.target, "menu target gone, ignoring");
        }
    }

    /// Backdrop only; the simulation is unaffected
    pub fn set_background(&self, ctx: &mut SimulationContext, color: Rgb) {
        ctx.settings.background = color;
    }

    /// Visual-only: resize existing particles in place
    pub fn set_particle_radius(&self, ctx: &mut SimulationContext, radius: u8) {
        ctx.settings.particle_radius = radius;
        ctx.settings = ctx.settings.clone().clamped();
        ctx.grid.set_particle_radius(ctx.settings.particle_radius as f32);
    }

    /// Resize existing emitters in place; no regeneration
    pub fn set_emitter_radius(&self, ctx: &mut SimulationContext, radius: u8) {
        ctx.settings.emitter_radius = radius;
        ctx.settings = ctx.settings.clone().clamped();
        ctx.emitters.set_radius(ctx.settings.emitter_radius as f32);
    }

    /// New grid spacing: full regeneration
    pub fn set_density(&self, ctx: &mut SimulationContext, density: u8) {
        let before = ctx.settings.spacing();
        ctx.settings.density = density;
        ctx.settings = ctx.settings.clone().clamped();
        if ctx.settings.spacing() != before {
            ctx.regenerate();
        }
    }
}
