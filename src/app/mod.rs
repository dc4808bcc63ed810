//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::{AppState, DetailState, Mode, View};

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;

use crate::api::{CharacterSource, RickAndMortyClient};
use crate::config::Config;
use crate::db::Database;
use crate::sync::FavoriteSync;

use async_ops::Screens;

/// Run the TUI application
pub fn run() -> Result<()> {
    let rt = Runtime::new()?;
    // View models spawn onto this runtime from the UI thread
    let _guard = rt.enter();

    let config = Config::load()?;
    let db = Database::open()?.shared();
    let client = Arc::new(RickAndMortyClient::from_config(&config)?);

    let mut screens = Screens::new(
        client,
        FavoriteSync::new(db),
        config.episode_concurrency(),
    );
    let mut state = AppState::new(config);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut state, &mut screens);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: CharacterSource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    screens: &mut Screens<S>,
) -> Result<()> {
    loop {
        // Apply whatever the screens published since the last frame
        screens.drain(state);

        terminal.draw(|frame| ui::render(frame, state))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Some(command) = events::handle_key(state, key)
        {
            screens.dispatch(state, command);
        }

        // Tick for animations
        state.tick();

        if state.should_quit {
            break;
        }
    }

    // Save config on exit
    state.config.save()?;

    Ok(())
}
