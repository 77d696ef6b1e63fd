mod app;
mod color;
mod config;
mod controller;
mod emitter;
mod force;
mod grid;
mod settings;
mod simulation;
mod surface;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::Rgb;
use config::FieldConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use surface::FrameScheduler;

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Interactive particle field that flees the mouse, colored by emitters")]
struct Args {
    /// Particle radius in dots (1-10)
    #[arg(long = "particle-size")]
    particle_size: Option<u8>,

    /// Emitter radius in dots (5-30)
    #[arg(long = "emitter-size")]
    emitter_size: Option<u8>,

    /// Grid density (5-30); spacing between particles is 34 - density
    #[arg(long)]
    density: Option<u8>,

    /// Background color: #rgb, #rrggbb or a color name
    #[arg(long, value_parser = Rgb::parse_css)]
    background: Option<Rgb>,

    /// Number of emitters placed on startup and on every resize (0-64)
    #[arg(long)]
    emitters: Option<usize>,

    /// RNG seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// JSON parameter file applied before the other flags
    #[arg(long)]
    params: Option<PathBuf>,

    /// Write debug logs to this file
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

/// Paces the render loop at ~60fps. A frame is due only after the loop
/// asked for one.
struct FramePacer {
    due: Option<Instant>,
}

impl FramePacer {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);
    // Poll interval while no frame is pending
    const IDLE_POLL: Duration = Duration::from_millis(100);

    fn new() -> Self {
        Self { due: None }
    }

    /// Time left until the pending frame, or the idle poll interval
    fn timeout(&self) -> Duration {
        match self.due {
            Some(due) => due.saturating_duration_since(Instant::now()),
            None => Self::IDLE_POLL,
        }
    }

    /// Consume the pending frame if its time has come
    fn take_due(&mut self) -> bool {
        match self.due {
            Some(due) if Instant::now() >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl FrameScheduler for FramePacer {
    fn request_frame(&mut self) {
        self.due = Some(Instant::now() + Self::FRAME_DURATION);
    }
}

fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    // Params file first, then individual flags on top
    let config = match &args.params {
        Some(path) => FieldConfig::load_from_file(path)?,
        None => FieldConfig::default(),
    };
    let mut settings = config.settings;
    if let Some(size) = args.particle_size {
        settings.particle_radius = size;
    }
    if let Some(size) = args.emitter_size {
        settings.emitter_radius = size;
    }
    if let Some(density) = args.density {
        settings.density = density;
    }
    if let Some(background) = args.background {
        settings.background = background;
    }
    if let Some(count) = args.emitters {
        settings.initial_emitters = count;
    }
    let settings = settings.clamped();
    let seed = args.seed.or(config.seed);

    tracing::info!(?settings, ?seed, "starting particle field");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(settings, seed);
    let mut pacer = FramePacer::new();
    app.start(Rect::new(0, 0, size.width, size.height));
    pacer.request_frame();

    // Run the app
    let res = run_app(&mut terminal, &mut app, &mut pacer);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!(frames = app.ctx.frames, "exiting");

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    pacer: &mut FramePacer,
) -> io::Result<()> {
    loop {
        if pacer.take_due() {
            app.advance_frame(pacer);
            terminal.draw(|frame| ui::render(frame, app))?;
        }

        // Poll for events until the next frame is due
        if !event::poll(pacer.timeout())? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Handle Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // === Handle action menu keys first (if the menu is open) ===
                if app.controller.menu().is_some() {
                    match key.code {
                        KeyCode::Up => app.controller.menu_nav_up(),
                        KeyCode::Down => app.controller.menu_nav_down(),
                        KeyCode::Enter => app.controller.confirm_menu(&mut app.ctx),
                        KeyCode::Esc => app.controller.dismiss_menu(),
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    // System controls
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_help(),
                    KeyCode::Char('b') | KeyCode::Char('B') => app.cycle_background(),

                    // Navigation
                    KeyCode::Tab => app.next_focus(),
                    KeyCode::BackTab => app.prev_focus(),
                    KeyCode::Up => {
                        if !app.show_help {
                            if app.focus.is_param() {
                                app.adjust_focused_up();
                            } else {
                                app.scroll_controls_up();
                            }
                        }
                    }
                    KeyCode::Down => {
                        if !app.show_help {
                            if app.focus.is_param() {
                                app.adjust_focused_down();
                            } else {
                                let term_size = terminal.size().unwrap_or_default();
                                let visible = ui::get_controls_visible_lines(term_size.height);
                                app.scroll_controls_down(
                                    ui::CONTROLS_CONTENT_LINES.saturating_sub(visible),
                                );
                            }
                        }
                    }
                    KeyCode::Esc => {
                        if app.show_help {
                            app.toggle_help();
                        } else if app.focus.is_param() {
                            app.focus = Focus::Controls;
                        }
                    }
                    KeyCode::Char('j') | KeyCode::Char('J') => {
                        if app.show_help {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') => {
                        if app.show_help {
                            app.scroll_help_up();
                        }
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    app.pointer_moved(mouse.column, mouse.row)
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    app.primary_click(mouse.column, mouse.row)
                }
                MouseEventKind::Down(MouseButton::Right) => {
                    app.secondary_click(mouse.column, mouse.row)
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                app.resize(Rect::new(0, 0, width, height));
            }
            _ => {}
        }
    }
}
