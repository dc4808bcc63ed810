//! Character list screen: page-by-page loading

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::{ApiError, CharacterSource};
use crate::models::Character;

use super::event::{self, EventEmitter, EventReceiver};
use super::scope::ScreenScope;

/// Number of characters the catalog returns per page
pub const PAGE_SIZE: usize = 20;

/// Pagination bookkeeping for one list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// Page to fetch next (starts at 1, never decreases)
    pub current_page: u32,
    /// Set once a short page or a failure was seen; never reset
    pub is_last_page: bool,
    /// A page request is in flight
    pub is_loading: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            is_last_page: false,
            is_loading: false,
        }
    }
}

/// Outcomes published by the list screen
#[derive(Debug)]
pub enum CharacterListNavigation {
    /// A page request failed; paging is over for this screen
    ShowCharacterError(Arc<ApiError>),
    /// A page arrived; append it to what is shown
    ShowCharacterList(Vec<Character>),
    /// Hide the loading indicator
    HideLoading,
    /// Show the loading indicator
    ShowLoading,
}

/// Drives pagination for the character list
pub struct CharacterListViewModel<S> {
    source: Arc<S>,
    state: Arc<Mutex<PageState>>,
    events: EventEmitter<CharacterListNavigation>,
    scope: ScreenScope,
}

impl<S: CharacterSource> CharacterListViewModel<S> {
    /// Create the screen and the receiver for its events
    ///
    /// Must be called inside a tokio runtime context.
    pub fn new(source: Arc<S>) -> (Self, EventReceiver<CharacterListNavigation>) {
        let (events, rx) = event::channel();
        let view_model = Self {
            source,
            state: Arc::new(Mutex::new(PageState::default())),
            events,
            scope: ScreenScope::new(),
        };
        (view_model, rx)
    }

    /// Snapshot of the pagination state
    pub fn page_state(&self) -> PageState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The event emitter, for replaying the last event on re-attach
    pub const fn events(&self) -> &EventEmitter<CharacterListNavigation> {
        &self.events
    }

    /// Scroll callback: fetch the next page when the end of the list shows
    ///
    /// Does nothing while a request is in flight, after the last page, or
    /// when the visible window is not at the end of the list.
    pub fn load_more(
        &self,
        visible_count: usize,
        first_visible_position: Option<usize>,
        total_count: usize,
    ) {
        let page = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.is_loading
                || state.is_last_page
                || !is_in_footer(visible_count, first_visible_position, total_count)
            {
                return;
            }

            state.current_page += 1;
            state.is_loading = true;
            state.current_page
        };

        tracing::debug!(page, "Loading more characters");
        self.spawn_fetch(page);
    }

    /// Request the current page
    ///
    /// Does nothing while a request is in flight.
    pub fn fetch_current_page(&self) {
        let page = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.is_loading {
                return;
            }
            state.is_loading = true;
            state.current_page
        };

        self.spawn_fetch(page);
    }

    /// User-triggered retry
    ///
    /// With items already on screen this only hides the loading indicator;
    /// with an empty screen it requests the current page again.
    pub fn retry(&self, current_item_count: usize) {
        if current_item_count > 0 {
            self.events.emit(CharacterListNavigation::HideLoading);
            return;
        }

        self.fetch_current_page();
    }

    /// Abort outstanding requests
    ///
    /// An aborted page is not counted as loaded, so a later
    /// [`fetch_current_page`](Self::fetch_current_page) requests it again.
    pub fn clear(&self) {
        self.scope.clear();
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading = false;
    }

    fn spawn_fetch(&self, page: u32) {
        self.events.emit(CharacterListNavigation::ShowLoading);

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let events = self.events.clone();

        self.scope.spawn(async move {
            let result = source.fetch_page(page).await;

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.is_loading = false;

            match result {
                Ok(characters) => {
                    if characters.len() < PAGE_SIZE {
                        state.is_last_page = true;
                    }
                    drop(state);

                    tracing::debug!(page, count = characters.len(), "Character page loaded");
                    events.emit(CharacterListNavigation::HideLoading);
                    events.emit(CharacterListNavigation::ShowCharacterList(characters));
                }
                Err(e) => {
                    state.is_last_page = true;
                    drop(state);

                    tracing::warn!(page, error = %e, "Character page failed");
                    events.emit(CharacterListNavigation::HideLoading);
                    events.emit(CharacterListNavigation::ShowCharacterError(Arc::new(e)));
                }
            }
        });
    }
}

/// The visible window reaches the end of a list holding at least one page
fn is_in_footer(
    visible_count: usize,
    first_visible_position: Option<usize>,
    total_count: usize,
) -> bool {
    first_visible_position.is_some_and(|first| visible_count + first >= total_count)
        && total_count >= PAGE_SIZE
}
