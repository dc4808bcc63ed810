//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Mode, View};
use crate::theme::Theme;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    // Handle mode-specific input first
    match state.mode {
        Mode::ThemePicker => {
            handle_theme_picker_key(state, key);
            return None;
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::About => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
            ) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::Normal => {}
    }

    // Global shortcuts
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            return None;
        }
        (_, KeyCode::Char('?') | KeyCode::F(1)) => {
            state.mode = Mode::Help;
            return None;
        }
        (_, KeyCode::Tab | KeyCode::BackTab) => {
            state.next_view();
            return Some(AsyncCommand::ShowView(state.view));
        }
        (_, KeyCode::Char('1')) if state.view != View::Characters => {
            state.next_view();
            return Some(AsyncCommand::ShowView(state.view));
        }
        (_, KeyCode::Char('2')) if state.view != View::Favorites => {
            state.next_view();
            return Some(AsyncCommand::ShowView(state.view));
        }
        (_, KeyCode::Char('t')) => {
            state.theme_picker_index = Theme::all()
                .iter()
                .position(|t| *t == state.theme.inner())
                .unwrap_or(0);
            state.mode = Mode::ThemePicker;
            return None;
        }
        (_, KeyCode::Char('T')) => {
            state.next_theme();
            state.set_status(format!("Theme: {}", state.theme.name()));
            return None;
        }
        (KeyModifiers::SHIFT, KeyCode::Char('A')) => {
            state.mode = Mode::About;
            return None;
        }
        _ => {}
    }

    let vim = state.config.vim_mode;
    match key.code {
        KeyCode::Down => move_down(state),
        KeyCode::Char('j') if vim => move_down(state),
        KeyCode::Up => move_up(state),
        KeyCode::Char('k') if vim => move_up(state),
        KeyCode::Home => {
            state.select_first();
            None
        }
        KeyCode::Char('g') if vim => {
            state.select_first();
            None
        }
        KeyCode::End => move_last(state),
        KeyCode::Char('G') if vim => move_last(state),

        // Detail panel scrolling
        KeyCode::PageDown | KeyCode::Char('J') => {
            if let Some(detail) = state.detail.as_mut() {
                detail.scroll = detail.scroll.saturating_add(3);
            }
            None
        }
        KeyCode::PageUp | KeyCode::Char('K') => {
            if let Some(detail) = state.detail.as_mut() {
                detail.scroll = detail.scroll.saturating_sub(3);
            }
            None
        }

        KeyCode::Enter => state.selected_character().map(AsyncCommand::OpenDetail),
        KeyCode::Esc => {
            if state.detail.is_some() {
                Some(AsyncCommand::CloseDetail)
            } else {
                state.clear_status();
                None
            }
        }
        KeyCode::Char('f') => Some(AsyncCommand::ToggleFavorite),
        KeyCode::Char('r') => match state.view {
            View::Characters if state.characters_loading => None,
            View::Characters => {
                state.set_status("Retrying...");
                Some(AsyncCommand::Retry {
                    current_item_count: state.characters.len(),
                })
            }
            View::Favorites => Some(AsyncCommand::RefreshFavorites),
        },
        KeyCode::Char('o') => {
            open_image(state);
            None
        }
        _ => None,
    }
}

fn move_down(state: &mut AppState) -> Option<AsyncCommand> {
    state.select_next();
    load_more(state)
}

fn move_up(state: &mut AppState) -> Option<AsyncCommand> {
    state.select_prev();
    None
}

fn move_last(state: &mut AppState) -> Option<AsyncCommand> {
    state.select_last();
    load_more(state)
}

/// Ask the list for the next page; the view model decides if it is due
fn load_more(state: &AppState) -> Option<AsyncCommand> {
    if state.view != View::Characters {
        return None;
    }

    let (visible_count, first_visible_position) = state.character_window();
    Some(AsyncCommand::LoadMore {
        visible_count,
        first_visible_position,
        total_count: state.characters.len(),
    })
}

fn open_image(state: &mut AppState) {
    let character = state
        .detail
        .as_ref()
        .map(|detail| detail.character.clone())
        .or_else(|| state.selected_character());

    let Some(character) = character else {
        return;
    };
    if character.image.is_empty() {
        state.set_status("⚠ No image for this character");
        return;
    }

    match open::that(&character.image) {
        Ok(()) => state.set_status("✓ Opened in browser"),
        Err(e) => {
            tracing::warn!(url = %character.image, error = %e, "Could not open browser");
            state.set_status(format!("❌ Could not open browser: {e}"));
        }
    }
}

fn handle_theme_picker_key(state: &mut AppState, key: KeyEvent) {
    let themes = Theme::all();
    let len = themes.len();

    match key.code {
        KeyCode::Esc => {
            // Restore the saved theme
            state.theme = state.config.theme;
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            let selected_theme = Theme::from(themes[state.theme_picker_index]);
            state.theme = selected_theme;
            state.config.theme = selected_theme;

            state.mode = Mode::Normal;
            state.set_status(format!("✓ Theme set to {}", selected_theme.name()));
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.theme_picker_index = (state.theme_picker_index + 1) % len;
            // Preview
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.theme_picker_index = state.theme_picker_index.checked_sub(1).unwrap_or(len - 1);
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.theme_picker_index = 0;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.theme_picker_index = len - 1;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        _ => {}
    }
}
