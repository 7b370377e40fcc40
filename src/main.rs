mod app;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::{App, SelectionCallback};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use province_map::config::Config;
use province_map::data;
use ratatui::DefaultTerminal;
use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let config = Config::load();
    init_logging(&config)?;
    config.report();

    let entities = data::load_entities(&config.entities_path)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &config, entities);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

/// The terminal belongs to the map, so logs go to a file
fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("opening log file {}", config.log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Selection is accepted as-is; persisting it belongs to the profile store
fn selection_logger() -> SelectionCallback {
    Box::new(|province: &str| {
        info!(province, "selection requested");
        true
    })
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.hover_at(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => {
            if app.end_drag() {
                app.click_at(mouse.column, mouse.row);
            }
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &Config, entities: Vec<province_map::region::Entity>) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, entities, selection_logger());
    app.begin_load(data::spawn_fetch(config.dataset.clone()));

    loop {
        app.poll_dataset();

        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('L') => {
                        let settings = &mut app.map_renderer.settings;
                        settings.show_labels = !settings.show_labels;
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        let settings = &mut app.map_renderer.settings;
                        settings.show_markers = !settings.show_markers;
                    }

                    // Reset is the fitted view of the whole dataset
                    KeyCode::Char('f') | KeyCode::Char('r') | KeyCode::Char('0') => app.fit_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                    app.fit_view();
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
