use crate::controller::{InteractionController, MenuAction};
use crate::settings::FieldSettings;
use crate::simulation::{self, SimulationContext};
use crate::surface::{DotSurface, FrameScheduler, DOTS_PER_CELL_X, DOTS_PER_CELL_Y};
use crate::ui;
use ratatui::layout::Rect;

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Background,
    ParticleSize,
    EmitterSize,
    Density,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in panel order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Background,
            Focus::Background => Focus::ParticleSize,
            Focus::ParticleSize => Focus::EmitterSize,
            Focus::EmitterSize => Focus::Density,
            Focus::Density => Focus::Background, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Density,
            Focus::Background => Focus::Density, // Loop back
            Focus::ParticleSize => Focus::Background,
            Focus::EmitterSize => Focus::ParticleSize,
            Focus::Density => Focus::EmitterSize,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub ctx: SimulationContext,
    pub controller: InteractionController,
    pub surface: DotSurface,
    /// Screen rect the surface is drawn into
    pub surface_area: Rect,
    /// Whole terminal area, used to place the action menu
    pub screen: Rect,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
}

impl App {
    pub fn new(settings: FieldSettings, seed: Option<u64>) -> Self {
        Self {
            ctx: SimulationContext::new(settings, seed),
            controller: InteractionController::new(),
            surface: DotSurface::new(0, 0),
            surface_area: Rect::default(),
            screen: Rect::default(),
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
        }
    }

    /// Size the surface for the terminal, seed the field and start the loop
    pub fn start(&mut self, screen: Rect) {
        self.resize(screen);
        self.ctx.start();
    }

    /// Terminal (or layout) size changed: fully reinitialize the field
    pub fn resize(&mut self, screen: Rect) {
        self.screen = screen;
        self.surface_area = ui::surface_area(screen, self.fullscreen_mode);
        let (width, height) = DotSurface::size_for_cells(self.surface_area.width, self.surface_area.height);
        self.controller
            .resize(&mut self.ctx, &mut self.surface, width as f32, height as f32);
    }

    /// Draw and advance one frame into the dot surface
    pub fn advance_frame<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        simulation::frame(&mut self.ctx, &mut self.surface, scheduler);
    }

    /// Map a screen cell to surface coordinates (center of the cell's dots)
    pub fn to_surface(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let area = self.surface_area;
        if column < area.x || row < area.y || column >= area.x + area.width || row >= area.y + area.height {
            return None;
        }
        let x = (column - area.x) as f32 * DOTS_PER_CELL_X as f32 + DOTS_PER_CELL_X as f32 / 2.0;
        let y = (row - area.y) as f32 * DOTS_PER_CELL_Y as f32 + DOTS_PER_CELL_Y as f32 / 2.0;
        Some((x, y))
    }

    /// Mouse moved (or dragged) over the terminal
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        if let Some((x, y)) = self.to_surface(column, row) {
            self.controller.pointer_move(&mut self.ctx, x, y);
        }
    }

    /// Left click: menu item, menu dismissal, or emitter placement
    pub fn primary_click(&mut self, column: u16, row: u16) {
        if let Some(menu) = self.controller.menu() {
            let rect = ui::action_menu_rect(menu.anchor, self.screen);
            match ui::menu_item_at(rect, column, row) {
                Some(idx) => self.controller.select(&mut self.ctx, MenuAction::ALL[idx]),
                None => self.controller.dismiss_menu(),
            }
            return;
        }

        if let Some((x, y)) = self.to_surface(column, row) {
            self.controller.primary_click(&mut self.ctx, x, y);
        }
    }

    /// Right click: open the action menu on a hit emitter
    pub fn secondary_click(&mut self, column: u16, row: u16) {
        match self.to_surface(column, row) {
            Some((x, y)) => {
                if !self.controller.secondary_click(&self.ctx, x, y, (column, row)) {
                    self.controller.dismiss_menu();
                }
            }
            None => self.controller.dismiss_menu(),
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        self.adjust_focused(1);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        self.adjust_focused(-1);
    }

    fn adjust_focused(&mut self, delta: i32) {
        let mut edited = self.ctx.settings.clone();
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Background => {
                if delta > 0 {
                    edited.next_background();
                } else {
                    edited.prev_background();
                }
                self.controller.set_background(&mut self.ctx, edited.background);
            }
            Focus::ParticleSize => {
                edited.adjust_particle_radius(delta);
                self.controller.set_particle_radius(&mut self.ctx, edited.particle_radius);
            }
            Focus::EmitterSize => {
                edited.adjust_emitter_radius(delta);
                self.controller.set_emitter_radius(&mut self.ctx, edited.emitter_radius);
            }
            Focus::Density => {
                edited.adjust_density(delta);
                self.controller.set_density(&mut self.ctx, edited.density);
            }
        }
    }

    /// Cycle the backdrop color (B key)
    pub fn cycle_background(&mut self) {
        let next = self.ctx.settings.background.next_background();
        self.controller.set_background(&mut self.ctx, next);
        self.focus = Focus::Background;
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle fullscreen mode; the surface size changes, so the field is reinitialized
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
        self.resize(self.screen);
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::simulation::tests::CountingScheduler;
    use crate::simulation::LoopState;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 40,
    };

    fn started_app() -> App {
        let mut app = App::new(FieldSettings::default(), Some(5));
        app.start(SCREEN);
        app
    }

    fn surface_center(app: &App) -> (u16, u16) {
        let area = app.surface_area;
        (area.x + area.width / 2, area.y + area.height / 2)
    }

    #[test]
    fn test_focus_cycle_round_trips() {
        let mut focus = Focus::Background;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Background);
        assert_eq!(Focus::Background.prev(), Focus::Density);
        assert!(!Focus::Controls.is_param());
    }

    #[test]
    fn test_start_sizes_surface_and_runs() {
        let app = started_app();
        assert_eq!(app.ctx.state, LoopState::Running);
        assert_eq!(app.ctx.emitters.len(), 3);
        assert_eq!(app.ctx.width, app.surface_area.width as f32 * 2.0);
        assert_eq!(app.ctx.height, app.surface_area.height as f32 * 4.0);
        assert!(!app.ctx.grid.is_empty());
    }

    #[test]
    fn test_to_surface_maps_cells_to_dot_centers() {
        let app = started_app();
        let area = app.surface_area;
        assert_eq!(app.to_surface(area.x, area.y), Some((1.0, 2.0)));
        assert_eq!(app.to_surface(area.x + 3, area.y + 2), Some((7.0, 10.0)));
        assert_eq!(app.to_surface(0, 0), None);
        assert_eq!(app.to_surface(area.x + area.width, area.y), None);
    }

    #[test]
    fn test_pointer_outside_surface_is_ignored() {
        let mut app = started_app();
        app.pointer_moved(0, 0);
        assert_eq!(app.ctx.pointer, None);
        let (col, row) = surface_center(&app);
        app.pointer_moved(col, row);
        assert!(app.ctx.pointer.is_some());
    }

    #[test]
    fn test_click_places_emitter() {
        let mut app = started_app();
        let (col, row) = surface_center(&app);
        app.primary_click(col, row);
        assert_eq!(app.ctx.emitters.len(), 4);
    }

    #[test]
    fn test_right_click_menu_then_delete_by_mouse() {
        let mut app = started_app();
        let (col, row) = surface_center(&app);
        app.primary_click(col, row);
        assert_eq!(app.ctx.emitters.len(), 4);

        app.secondary_click(col, row);
        let menu = app.controller.menu().cloned().unwrap();
        let rect = ui::action_menu_rect(menu.anchor, app.screen);
        // Second row inside the border is "Delete"
        app.primary_click(rect.x + 2, rect.y + 2);

        assert!(app.controller.menu().is_none());
        assert_eq!(app.ctx.emitters.len(), 3);
    }

    #[test]
    fn test_click_outside_menu_only_closes_it() {
        let mut app = started_app();
        let (col, row) = surface_center(&app);
        app.primary_click(col, row);
        app.secondary_click(col, row);
        assert!(app.controller.menu().is_some());

        let area = app.surface_area;
        app.primary_click(area.x, area.y);
        assert!(app.controller.menu().is_none());
        assert_eq!(app.ctx.emitters.len(), 4);
    }

    #[test]
    fn test_resize_reseeds_three_emitters() {
        let mut app = started_app();
        let (col, row) = surface_center(&app);
        app.primary_click(col, row);
        app.primary_click(col, row);
        app.resize(Rect {
            width: 80,
            height: 30,
            ..SCREEN
        });
        assert_eq!(app.ctx.emitters.len(), 3);
    }

    #[test]
    fn test_fullscreen_grows_surface() {
        let mut app = started_app();
        let before = app.surface_area.width;
        app.toggle_fullscreen();
        assert!(app.surface_area.width > before);
        assert_eq!(app.ctx.emitters.len(), 3);
    }

    #[test]
    fn test_focused_adjustments_route_through_controller() {
        let mut app = started_app();
        let count = app.ctx.grid.len();

        app.focus = Focus::Density;
        app.adjust_focused_up();
        assert_eq!(app.ctx.settings.density, 15);
        assert!(app.ctx.grid.len() >= count);

        app.focus = Focus::ParticleSize;
        app.adjust_focused_down();
        assert!(app.ctx.grid.iter().all(|p| p.radius == 1.0));

        app.focus = Focus::EmitterSize;
        app.adjust_focused_up();
        assert!(app.ctx.emitters.iter().all(|e| e.radius == 11.0));

        app.focus = Focus::Background;
        app.adjust_focused_up();
        assert_ne!(app.ctx.settings.background, Rgb::WHITE);
    }

    #[test]
    fn test_tiny_terminal_runs_with_empty_grid() {
        let mut app = App::new(FieldSettings::default(), Some(5));
        app.start(Rect::new(0, 0, 24, 4));
        assert!(app.ctx.grid.is_empty());
        assert_eq!(app.ctx.emitters.len(), 3);

        let mut scheduler = CountingScheduler::default();
        app.advance_frame(&mut scheduler);
        assert_eq!(scheduler.requests, 1);
        assert!(app.surface.to_braille().is_empty());
    }

    #[test]
    fn test_frames_draw_into_surface() {
        let mut app = started_app();
        let mut scheduler = CountingScheduler::default();
        app.advance_frame(&mut scheduler);
        assert_eq!(scheduler.requests, 1);
        assert!(!app.surface.to_braille().is_empty());
    }
}
