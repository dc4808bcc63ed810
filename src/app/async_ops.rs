//! Bridge between the synchronous TUI loop and the screen view models
//!
//! Key handlers produce [`AsyncCommand`]s; [`Screens`] hands them to the
//! view models, whose work runs on the tokio runtime. Each tick the loop
//! calls [`Screens::drain`], which applies every event not yet handled to
//! the [`AppState`].

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::CharacterSource;
use crate::models::Character;
use crate::presentation::{
    CharacterDetailNavigation, CharacterDetailViewModel, CharacterListNavigation,
    CharacterListViewModel, Event, EventReceiver, FavoriteListNavigation, FavoriteListViewModel,
};
use crate::sync::FavoriteSync;

use super::state::{AppState, DetailState, View};

/// Commands sent from the key handlers to the screens
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// The character list was scrolled
    LoadMore {
        /// Rows the list can show
        visible_count: usize,
        /// Index of the top row, if laid out
        first_visible_position: Option<usize>,
        /// Characters loaded so far
        total_count: usize,
    },
    /// Retry after a failed page
    Retry {
        /// Characters already on screen
        current_item_count: usize,
    },
    /// Open the detail panel for a character
    OpenDetail(Character),
    /// Close the detail panel
    CloseDetail,
    /// Flip the favorite flag of the character in the detail panel
    ToggleFavorite,
    /// Re-read the favorites list
    RefreshFavorites,
    /// A view became visible again
    ShowView(View),
}

struct DetailScreen<S> {
    view_model: CharacterDetailViewModel<S>,
    events: EventReceiver<CharacterDetailNavigation>,
    is_favorite: watch::Receiver<Option<bool>>,
}

/// Every live screen and the receivers of its events
pub struct Screens<S> {
    source: Arc<S>,
    favorites: FavoriteSync,
    concurrency: usize,

    list: CharacterListViewModel<S>,
    list_events: EventReceiver<CharacterListNavigation>,

    favorite_list: FavoriteListViewModel,
    favorite_events: EventReceiver<FavoriteListNavigation>,

    detail: Option<DetailScreen<S>>,
}

impl<S: CharacterSource> Screens<S> {
    /// Create the screens and request the first page
    ///
    /// Must be called inside a tokio runtime context.
    pub fn new(source: Arc<S>, favorites: FavoriteSync, concurrency: usize) -> Self {
        let (list, list_events) = CharacterListViewModel::new(Arc::clone(&source));
        let (favorite_list, favorite_events) = FavoriteListViewModel::new(favorites.clone());

        list.fetch_current_page();

        Self {
            source,
            favorites,
            concurrency,
            list,
            list_events,
            favorite_list,
            favorite_events,
            detail: None,
        }
    }

    /// Hand a command to the screen it belongs to
    pub fn dispatch(&mut self, state: &mut AppState, command: AsyncCommand) {
        match command {
            AsyncCommand::LoadMore {
                visible_count,
                first_visible_position,
                total_count,
            } => self
                .list
                .load_more(visible_count, first_visible_position, total_count),
            AsyncCommand::Retry { current_item_count } => {
                state.characters_error = None;
                self.list.retry(current_item_count);
            }
            AsyncCommand::OpenDetail(character) => self.open_detail(state, character),
            AsyncCommand::CloseDetail => self.close_detail(state),
            AsyncCommand::ToggleFavorite => match &self.detail {
                Some(detail) => detail.view_model.on_update_favorite_status(),
                None => state.set_status("Open a character first (Enter)"),
            },
            AsyncCommand::RefreshFavorites => self.favorite_list.refresh(),
            AsyncCommand::ShowView(view) => {
                self.close_detail(state);
                match view {
                    View::Characters => {
                        // Already handled events come back empty
                        if let Some(event) = self.list.events().replay() {
                            apply_list_event(state, &event);
                        }
                    }
                    View::Favorites => self.favorite_list.refresh(),
                }
            }
        }
    }

    /// Apply every pending event to the state
    pub fn drain(&mut self, state: &mut AppState) {
        while let Ok(event) = self.list_events.try_recv() {
            apply_list_event(state, &event);
        }

        while let Ok(event) = self.favorite_events.try_recv() {
            match event.content_if_not_handled() {
                Some(FavoriteListNavigation::ShowCharacterList(list)) => {
                    state.set_favorites(list.clone());
                }
                Some(FavoriteListNavigation::ShowEmptyListMessage) => {
                    state.set_favorites(Vec::new());
                }
                None => {}
            }
        }

        self.drain_detail(state);
    }

    fn drain_detail(&mut self, state: &mut AppState) {
        let Some(detail) = &mut self.detail else {
            return;
        };

        let mut close = false;
        while let Ok(event) = detail.events.try_recv() {
            let Some(content) = event.content_if_not_handled() else {
                continue;
            };
            if matches!(content, CharacterDetailNavigation::CloseScreen) {
                close = true;
                continue;
            }
            let Some(panel) = state.detail.as_mut() else {
                continue;
            };

            match content {
                CharacterDetailNavigation::ShowEpisodeListLoading => {
                    panel.episodes_loading = true;
                    panel.episode_error = None;
                }
                CharacterDetailNavigation::HideEpisodeListLoading => {
                    panel.episodes_loading = false;
                }
                CharacterDetailNavigation::ShowEpisodeList(episodes) => {
                    panel.episodes.clone_from(episodes);
                }
                CharacterDetailNavigation::ShowEpisodeError(error) => {
                    panel.episode_error = Some(error.to_string());
                }
                CharacterDetailNavigation::CloseScreen => {}
            }
        }

        if detail.is_favorite.has_changed().unwrap_or(false) {
            let flag = *detail.is_favorite.borrow_and_update();
            let previous = state.detail.as_ref().and_then(|panel| panel.is_favorite);

            if let Some(panel) = state.detail.as_mut() {
                panel.is_favorite = flag;
            }
            // A flip (not the first read) changes the favorites list
            if let (Some(before), Some(after)) = (previous, flag)
                && before != after
            {
                state.set_status(if after {
                    "★ Added to favorites"
                } else {
                    "☆ Removed from favorites"
                });
                self.favorite_list.refresh();
            }
        }

        if close {
            self.close_detail(state);
        }
    }

    fn open_detail(&mut self, state: &mut AppState, character: Character) {
        self.close_detail(state);

        let (view_model, events) = CharacterDetailViewModel::new(
            Some(character.clone()),
            Arc::clone(&self.source),
            self.favorites.clone(),
            self.concurrency,
        );
        let is_favorite = view_model.is_favorite();

        state.detail = Some(DetailState::new(character));
        view_model.on_character_validation();

        self.detail = Some(DetailScreen {
            view_model,
            events,
            is_favorite,
        });
    }

    fn close_detail(&mut self, state: &mut AppState) {
        if let Some(detail) = self.detail.take() {
            detail.view_model.clear();
        }
        state.detail = None;
    }
}

fn apply_list_event(state: &mut AppState, event: &Event<CharacterListNavigation>) {
    match event.content_if_not_handled() {
        Some(CharacterListNavigation::ShowLoading) => {
            state.characters_loading = true;
        }
        Some(CharacterListNavigation::HideLoading) => {
            state.characters_loading = false;
        }
        Some(CharacterListNavigation::ShowCharacterList(page)) => {
            state.append_characters(page);
            state.characters_error = None;
        }
        Some(CharacterListNavigation::ShowCharacterError(error)) => {
            state.characters_error = Some(error.to_string());
            state.set_status(format!("❌ {error}"));
        }
        None => {}
    }
}
