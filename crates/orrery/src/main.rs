use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use directories::ProjectDirs;
use log::{info, warn};
use orrery_anim::{AsteroidBelt, FrameScheduler, FrameToken, Scheduler, Stage, TransformSupport};
use orrery_config::Config;
use orrery_core::{Preset, Viewport};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Size},
    style::Stylize,
    text::Line,
};

/// How long to wait for input when there is no belt to animate.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// An animated asteroid belt for your terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Belt layout preset: adaptive or fixed.
    #[arg(long, value_name = "PRESET")]
    preset: Option<Preset>,

    /// Display refresh rate. Frames are paced by a timer when unknown.
    #[arg(long, value_name = "HZ")]
    refresh_hz: Option<f64>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_overrides(cli.preset, cli.refresh_hz);

    if cli.write_config {
        let Some(path) = cli.config.or_else(Config::path) else {
            color_eyre::eyre::bail!("no config directory on this platform; pass --config");
        };
        config.save_to(&path)?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal);
    ratatui::restore();
    result
}

/// Send log output to a file in the cache directory; stdout belongs to the UI.
fn init_logging() {
    let Some(dirs) = ProjectDirs::from("", "", "orrery") else {
        return;
    };
    let dir = dirs.cache_dir();
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("orrery.log")) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

/// Milliseconds since the Unix epoch.
fn wall_clock_ms() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Current viewport in pixels; unknown dimensions fall back to defaults.
fn query_viewport() -> Viewport {
    match terminal::window_size() {
        Ok(size) => Viewport::new(size.width as f64, size.height as f64),
        Err(err) => {
            warn!("could not read window size: {err}");
            Viewport::default()
        }
    }
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Preset to build the belt with.
    preset: Preset,
    /// What the terminal can render, probed once.
    support: TransformSupport,
    /// The belt, once set up. Stays `None` if it cannot run here.
    belt: Option<AsteroidBelt>,
    /// Frame pacing.
    scheduler: Scheduler,
    /// Frame requested but not yet drawn.
    pending: Option<FrameToken>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        Self {
            running: false,
            preset: config.preset,
            support: TransformSupport::detect(),
            belt: None,
            scheduler: Scheduler::resolve(config.refresh_hz, config.fallback_interval_ms as f64),
            pending: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.set_up_belt(terminal.size()?);
        info!("starting with {} preset", self.preset);

        while self.running {
            if self.belt.is_none() {
                terminal.draw(|frame| self.render(frame))?;
                self.handle_crossterm_events(IDLE_POLL)?;
                continue;
            }

            let request = self.scheduler.request(wall_clock_ms());
            self.pending = Some(request.token);
            self.handle_crossterm_events(request.delay)?;

            if self.scheduler.take(request.token) {
                self.pending = None;
                if let Some(belt) = self.belt.as_mut() {
                    belt.step(wall_clock_ms());
                }
                terminal.draw(|frame| self.render(frame))?;
            }
        }
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Belt
            Constraint::Length(1), // Help text
        ])
        .split(frame.area());

        if let Some(belt) = &self.belt {
            frame.render_widget(belt.stage(), chunks[0]);
        }

        let help = Line::from(vec![
            "q".bold(),
            " quit  ".dark_gray(),
            "p".bold(),
            format!(" preset: {}", self.preset).dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events until `timeout` has passed and updates
    /// the state of [`App`].
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        let deadline = Instant::now().checked_add(timeout);
        while self.running {
            let remaining =
                deadline.map_or(timeout, |d| d.saturating_duration_since(Instant::now()));
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(columns, rows) => self.on_resize(Size::new(columns, rows)),
                _ => {}
            }
            if remaining.is_zero() {
                break;
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('p')) => self.toggle_preset(),
            _ => {}
        }
    }

    /// Build the belt on a terminal of `size`. Stays `None` when it cannot run.
    fn set_up_belt(&mut self, size: Size) {
        self.belt = AsteroidBelt::setup(
            self.support,
            Stage::anchor(size),
            query_viewport(),
            self.preset,
        );
    }

    /// Re-derive the belt layout for the new terminal size, or start the
    /// belt if the terminal was too small for it before.
    fn on_resize(&mut self, size: Size) {
        match self.belt.as_mut() {
            Some(belt) => belt.relayout(query_viewport()),
            None => self.set_up_belt(size),
        }
    }

    /// Switch between the adaptive and fixed presets.
    fn toggle_preset(&mut self) {
        self.preset = self.preset.toggle();
        if let Some(belt) = self.belt.as_mut() {
            belt.set_preset(self.preset);
        }
        info!("preset switched to {}", self.preset);
    }

    /// Set running to false and drop any pending frame.
    fn quit(&mut self) {
        self.running = false;
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use orrery_anim::TransformProperty;

    use super::*;

    fn app() -> App {
        let mut app = App::new(&Config::default());
        app.support = TransformSupport::SupportedAs(TransformProperty::Ansi16);
        app
    }

    #[test]
    fn test_resize_starts_belt_after_empty_terminal() {
        let mut app = app();
        app.set_up_belt(Size::new(0, 0));
        assert!(app.belt.is_none());

        app.on_resize(Size::new(0, 0));
        assert!(app.belt.is_none());

        app.on_resize(Size::new(80, 24));
        let belt = app.belt.as_ref().unwrap();
        assert_eq!(belt.elements().len(), 12);
    }

    #[test]
    fn test_resize_keeps_existing_belt() {
        let mut app = app();
        app.set_up_belt(Size::new(80, 24));
        app.on_resize(Size::new(100, 30));
        assert_eq!(app.belt.as_ref().unwrap().stage().len(), 12);
    }

    #[test]
    fn test_unsupported_terminal_never_starts_belt() {
        let mut app = app();
        app.support = TransformSupport::Unsupported;
        app.on_resize(Size::new(80, 24));
        assert!(app.belt.is_none());
    }

    #[test]
    fn test_quit_cancels_pending_frame() {
        let mut app = app();
        app.running = true;
        let token = app.scheduler.request(0.0).token;
        app.pending = Some(token);
        app.quit();
        assert!(!app.running);
        assert!(app.pending.is_none());
        assert!(!app.scheduler.take(token));
    }
}
