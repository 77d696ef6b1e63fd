use crate::app::{App, Focus};
use crate::controller::{self, ActionMenu, MenuAction};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 22;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 9;

/// Action menu size including borders
const MENU_WIDTH: u16 = 18;
const MENU_HEIGHT: u16 = MenuAction::ALL.len() as u16 + 2;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if let Some(menu) = app.controller.menu() {
        render_action_menu(frame, area, app, menu);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas panel interior (excluding borders)
fn canvas_inner(frame_area: Rect, fullscreen: bool) -> Rect {
    let panel_x = if fullscreen {
        frame_area.x
    } else {
        frame_area.x + SIDEBAR_WIDTH.min(frame_area.width)
    };
    let panel_width = if fullscreen {
        frame_area.width
    } else {
        frame_area.width.saturating_sub(SIDEBAR_WIDTH)
    };
    Rect {
        x: panel_x + 1,
        y: frame_area.y + 1,
        width: panel_width.saturating_sub(2),
        height: frame_area.height.saturating_sub(2),
    }
}

/// Screen rect of the drawable surface: 90% of the canvas interior, centered
pub fn surface_area(frame_area: Rect, fullscreen: bool) -> Rect {
    let inner = canvas_inner(frame_area, fullscreen);
    let width = controller::surface_extent(inner.width);
    let height = controller::surface_extent(inner.height);
    Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    }
}

/// Visible lines in the controls box for a terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    // Status (6) and parameters (6) boxes sit above; minus borders
    terminal_height.saturating_sub(12).saturating_sub(2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Status
            Constraint::Length(6), // Parameters
            Constraint::Min(4),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Field ");
    let ctx = &app.ctx;

    let pointer = match ctx.pointer {
        Some((x, y)) => format!("{:.0},{:.0}", x, y),
        None => "-".to_string(),
    };

    let particles = if ctx.grid.is_empty() {
        "Particles: none".to_string()
    } else {
        format!("Particles: {}", ctx.grid.len())
    };

    let content = vec![
        Line::from(Span::styled(ctx.state.name(), Style::default().fg(BORDER_COLOR))),
        Line::from(Span::styled(particles, Style::default().fg(TEXT_COLOR))),
        Line::from(Span::styled(
            format!("Emitters: {}", ctx.emitters.len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Pointer: {}", pointer),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.ctx.settings;

    let content = vec![
        make_line(
            "Background",
            settings.background.display_name(),
            app.focus == Focus::Background,
        ),
        make_line(
            "Particle Size",
            format!("{}", settings.particle_radius),
            app.focus == Focus::ParticleSize,
        ),
        make_line(
            "Emitter Size",
            format!("{}", settings.emitter_radius),
            app.focus == Focus::EmitterSize,
        ),
        make_line(
            "Density",
            format!("{} ({})", settings.density, settings.spacing()),
            app.focus == Focus::Density,
        ),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Click", "place emitter"),
        make_control("RClick", "emitter menu"),
        make_control("Tab", "next param"),
        make_control("↑/↓", "adjust param"),
        make_control("B", "background"),
        make_control("H", "help"),
        make_control("V", "fullscreen"),
        make_control("Esc", "close menu"),
        make_control("Q", "quit"),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");
    frame.render_widget(block, area);

    let surface_rect = app.surface_area;
    let background = app.ctx.settings.background.to_color();

    // Background fill behind the dots
    frame.render_widget(
        Block::default().style(Style::default().bg(background)),
        surface_rect,
    );

    for cell in app.surface.to_braille() {
        let x = surface_rect.x + cell.x;
        let y = surface_rect.y + cell.y;

        if x < surface_rect.x + surface_rect.width && y < surface_rect.y + surface_rect.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(
                cell.char.to_string(),
                Style::default().fg(cell.color.to_color()).bg(background),
            );
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

/// Screen rect of the action menu anchored at `anchor`, kept on screen
pub fn action_menu_rect(anchor: (u16, u16), screen: Rect) -> Rect {
    let width = MENU_WIDTH.min(screen.width);
    let height = MENU_HEIGHT.min(screen.height);
    let max_x = (screen.x + screen.width).saturating_sub(width);
    let max_y = (screen.y + screen.height).saturating_sub(height);
    Rect {
        x: anchor.0.clamp(screen.x, max_x.max(screen.x)),
        y: anchor.1.clamp(screen.y, max_y.max(screen.y)),
        width,
        height,
    }
}

/// Index of the menu entry at a screen cell, if any
pub fn menu_item_at(menu_rect: Rect, column: u16, row: u16) -> Option<usize> {
    let inside_x = column > menu_rect.x && column + 1 < menu_rect.x + menu_rect.width;
    if !inside_x || row <= menu_rect.y {
        return None;
    }
    let idx = (row - menu_rect.y - 1) as usize;
    (idx < MenuAction::ALL.len()).then_some(idx)
}

fn render_action_menu(frame: &mut Frame, area: Rect, app: &App, menu: &ActionMenu) {
    let rect = action_menu_rect(menu.anchor, area);
    frame.render_widget(Clear, rect);

    let content: Vec<Line> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            if i == menu.selected {
                Line::from(Span::styled(
                    format!("> {}", action.label()),
                    Style::default().fg(HIGHLIGHT_COLOR),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", action.label()),
                    Style::default().fg(TEXT_COLOR),
                ))
            }
        })
        .collect();

    // Title shows the target's color; blank if it vanished meanwhile
    let title = app
        .ctx
        .emitters
        .get(menu.target)
        .map(|emitter| format!(" {} ", emitter.color.to_hex()))
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    frame.render_widget(Paragraph::new(content).block(block), rect);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Particles flee the mouse pointer and drift back home. Each one takes the color of the emitter nearest to it when the grid was built."),
        Line::from(""),
        Line::from(Span::styled("MOUSE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Left click places an emitter. Right click an emitter to change its color or delete it."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS (Tab, ↑/↓):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Background - surface color"),
        Line::from("Particle Size - particle radius (1-10)"),
        Line::from("Emitter Size - emitter radius (5-30)"),
        Line::from("Density - grid density (5-30), rebuilds the grid"),
        Line::from(""),
        Line::from(Span::styled("NOTE:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Each terminal cell holds 2x4 dots and the pointer pushes within 100 dots. Enlarge the terminal or raise Density for a fuller field."),
        Line::from("Resizing the terminal or toggling fullscreen reseeds the emitters."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("B=Background, V=Fullscreen, H=Help, Esc=Close menu, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    #[test]
    fn test_surface_area_is_ninety_percent_of_canvas() {
        let area = surface_area(SCREEN, false);
        // Canvas interior: 100 - 22 - 2 = 76 wide, 38 tall
        assert_eq!((area.width, area.height), (68, 34));
        assert!(area.x >= SIDEBAR_WIDTH + 1);

        let full = surface_area(SCREEN, true);
        assert_eq!((full.width, full.height), (88, 34));
    }

    #[test]
    fn test_surface_area_on_tiny_terminal() {
        let area = surface_area(Rect::new(0, 0, 10, 2), false);
        assert_eq!((area.width, area.height), (0, 0));
    }

    #[test]
    fn test_menu_rect_stays_on_screen() {
        let rect = action_menu_rect((99, 39), SCREEN);
        assert!(rect.x + rect.width <= SCREEN.width);
        assert!(rect.y + rect.height <= SCREEN.height);

        let rect = action_menu_rect((10, 5), SCREEN);
        assert_eq!((rect.x, rect.y), (10, 5));
    }

    #[test]
    fn test_menu_item_hit_testing() {
        let rect = action_menu_rect((10, 5), SCREEN);
        assert_eq!(menu_item_at(rect, 12, 6), Some(0));
        assert_eq!(menu_item_at(rect, 12, 7), Some(1));
        // Borders and outside
        assert_eq!(menu_item_at(rect, 12, 5), None);
        assert_eq!(menu_item_at(rect, 12, 8), None);
        assert_eq!(menu_item_at(rect, 10, 6), None);
        assert_eq!(menu_item_at(rect, 50, 6), None);
    }

    #[test]
    fn test_controls_visible_lines() {
        assert_eq!(get_controls_visible_lines(40), 26);
        assert_eq!(get_controls_visible_lines(5), 0);
    }
}
