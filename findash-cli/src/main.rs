// findash-cli/src/main.rs
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, sync::Arc, time::Duration};

use findash_core::{Dashboard, FileStorage, Settings, StorageKeys};
use findash_widgets::builtin_catalog;

mod app;
mod commands;
mod logging;
mod ui;

use app::{App, Flow};
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "findash", version, about = "Personal finance dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn run_tui(dashboard: Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dashboard);
    let result = event_loop(&mut terminal, &mut app);

    // Cleanup runs even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.into_dashboard().dispose();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(250);

    loop {
        app.drain_events();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            // Only handle key press events, not key release
            CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
            }
            CEvent::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load settings: {}. Using defaults.", e);
        Settings::default()
    });
    let dir = settings.storage.resolve_dir()?;

    if let Err(e) = logging::init(&settings.log, &dir) {
        eprintln!("Warning: Failed to open log file: {}. Logging disabled.", e);
    }

    let catalog = builtin_catalog()?;
    let storage = Arc::new(FileStorage::new(&dir));
    let mut dashboard =
        Dashboard::load_with_keys(catalog, storage, &StorageKeys::from(&settings.storage));
    tracing::info!(dir = %dir.display(), "dashboard loaded");

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(dashboard),
        command => {
            commands::run(command, &mut dashboard, &mut io::stdout().lock())?;
            dashboard.dispose();
            Ok(())
        }
    }
}
