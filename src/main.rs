mod audio;
mod catalog;
mod cli;
mod controller;
mod logging;
mod metadata;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use audio::RodioEngine;
use catalog::Catalog;
use cli::Cli;
use controller::AppController;
use metadata::{LoftyTagReader, MetadataLoader};
use model::{AppModel, TimeDisplay};
use view::AppView;

/// Redraw cadence while a cover crossfade is running
const ANIMATION_FRAME: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init_logging(&cli.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== dashtune starting ===");

    let catalog = Catalog::discover(&cli.music_dir)
        .with_context(|| format!("Could not load tracks from {}", cli.music_dir.display()))?;

    let mut app_model = AppModel::new(catalog, cli.volume);
    if cli.show_total {
        app_model.set_time_display(TimeDisplay::Total);
    }

    let engine = RodioEngine::new(app_model.playback().volume)?;
    let loader = MetadataLoader::new(Arc::new(LoftyTagReader));

    // Key release events need the terminal's keyboard enhancement protocol
    let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
    tracing::info!(release_events, "Keyboard capabilities detected");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut controller = AppController::new(app_model, engine, loader, release_events);
    controller.start();

    let res = run_app(&mut terminal, &mut controller);

    controller.shutdown();

    // Restore terminal
    if release_events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("dashtune shutting down");
    Ok(())
}

fn run_app<E: audio::PlaybackEngine>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut AppController<E>,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        controller.update(now);

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, controller.model(), now);
        })?;

        if controller.model().should_quit() {
            break;
        }

        let mut timeout = controller.poll_timeout(Instant::now());
        if AppView::is_animating(controller.model(), Instant::now()) {
            timeout = timeout.min(ANIMATION_FRAME);
        }

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => controller.handle_key_event(key, Instant::now()),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    controller.handle_mouse_event(mouse, Rect::new(0, 0, size.width, size.height));
                }
                _ => {}
            }
        }
    }

    Ok(())
}
