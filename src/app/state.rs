//! Application state

use ratatui::widgets::ListState;

use crate::config::Config;
use crate::models::{Character, Episode, FavoriteRecord};
use crate::theme::Theme;

/// Current view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Paged catalog
    #[default]
    Characters,
    /// Locally stored favorites
    Favorites,
}

impl View {
    /// The other view
    pub const fn next(self) -> Self {
        match self {
            Self::Characters => Self::Favorites,
            Self::Favorites => Self::Characters,
        }
    }

    /// Tab label
    pub const fn name(self) -> &'static str {
        match self {
            Self::Characters => "Characters",
            Self::Favorites => "Favorites",
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Browsing lists
    #[default]
    Normal,
    /// Key reference overlay
    Help,
    /// Theme selection popup
    ThemePicker,
    /// About popup
    About,
}

/// The character shown in the detail panel
#[derive(Debug, Clone)]
pub struct DetailState {
    /// Character being shown
    pub character: Character,
    /// Episodes, once loaded
    pub episodes: Vec<Episode>,
    /// Episode batch in flight
    pub episodes_loading: bool,
    /// Why the episode batch failed
    pub episode_error: Option<String>,
    /// Favorite flag, `None` until read from the store
    pub is_favorite: Option<bool>,
    /// Scroll offset of the panel
    pub scroll: u16,
}

impl DetailState {
    /// Panel for `character`, before anything is loaded
    pub const fn new(character: Character) -> Self {
        Self {
            character,
            episodes: Vec::new(),
            episodes_loading: false,
            episode_error: None,
            is_favorite: None,
            scroll: 0,
        }
    }
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Current view
    pub view: View,
    /// Current mode
    pub mode: Mode,
    /// Highlighted entry of the theme picker
    pub theme_picker_index: usize,

    /// Characters loaded so far, in page order
    pub characters: Vec<Character>,
    /// Selection and scroll of the character list
    pub character_list: ListState,
    /// A page request is in flight
    pub characters_loading: bool,
    /// Last page error
    pub characters_error: Option<String>,

    /// Characters marked as favorite
    pub favorites: Vec<FavoriteRecord>,
    /// Selection and scroll of the favorites list
    pub favorite_list: ListState,
    /// The store holds no favorites
    pub favorites_empty: bool,

    /// Open detail panel
    pub detail: Option<DetailState>,

    /// Rows available to the list widget (set while rendering)
    pub list_height: usize,

    /// Status message (bottom bar)
    pub status: String,

    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config) -> Self {
        let theme = config.theme;

        Self {
            config,
            should_quit: false,
            theme,
            view: View::Characters,
            mode: Mode::Normal,
            theme_picker_index: 0,
            characters: Vec::new(),
            character_list: ListState::default(),
            characters_loading: false,
            characters_error: None,
            favorites: Vec::new(),
            favorite_list: ListState::default(),
            favorites_empty: false,
            detail: None,
            list_height: 0,
            status: String::new(),
            tick: 0,
        }
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Animation tick counter
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Whether any request of the visible screen is in flight
    pub fn is_loading(&self) -> bool {
        self.characters_loading
            || self
                .detail
                .as_ref()
                .is_some_and(|detail| detail.episodes_loading)
    }

    /// Append a page to the character list
    pub fn append_characters(&mut self, page: &[Character]) {
        self.characters.extend_from_slice(page);
        if self.character_list.selected().is_none() && !self.characters.is_empty() {
            self.character_list.select(Some(0));
        }
    }

    /// Replace the favorites list
    pub fn set_favorites(&mut self, favorites: Vec<FavoriteRecord>) {
        self.favorites_empty = favorites.is_empty();
        self.favorites = favorites;

        let selected = match self.favorite_list.selected() {
            _ if self.favorites.is_empty() => None,
            Some(i) => Some(i.min(self.favorites.len() - 1)),
            None => Some(0),
        };
        self.favorite_list.select(selected);
    }

    /// Character under the cursor of the current view
    pub fn selected_character(&self) -> Option<Character> {
        match self.view {
            View::Characters => self
                .character_list
                .selected()
                .and_then(|i| self.characters.get(i))
                .cloned(),
            View::Favorites => self
                .favorite_list
                .selected()
                .and_then(|i| self.favorites.get(i))
                .map(FavoriteRecord::to_character),
        }
    }

    fn current_list(&mut self) -> (&mut ListState, usize) {
        match self.view {
            View::Characters => (&mut self.character_list, self.characters.len()),
            View::Favorites => (&mut self.favorite_list, self.favorites.len()),
        }
    }

    /// Move the selection down
    pub fn select_next(&mut self) {
        let (list, len) = self.current_list();
        if len > 0 {
            let next = list.selected().map_or(0, |i| (i + 1).min(len - 1));
            list.select(Some(next));
        }
    }

    /// Move the selection up
    pub fn select_prev(&mut self) {
        let (list, len) = self.current_list();
        if len > 0 {
            let prev = list.selected().map_or(0, |i| i.saturating_sub(1));
            list.select(Some(prev));
        }
    }

    /// Move the selection to the top
    pub fn select_first(&mut self) {
        let (list, len) = self.current_list();
        if len > 0 {
            list.select(Some(0));
        }
    }

    /// Move the selection to the bottom
    pub fn select_last(&mut self) {
        let (list, len) = self.current_list();
        if len > 0 {
            list.select(Some(len - 1));
        }
    }

    /// Visible window of the character list: `(visible rows, first row)`
    ///
    /// The first row anticipates the scroll the next render will apply to
    /// keep the selection on screen.
    pub fn character_window(&self) -> (usize, Option<usize>) {
        let Some(selected) = self.character_list.selected() else {
            return (self.list_height, None);
        };

        let offset = self.character_list.offset();
        let first = if selected < offset {
            selected
        } else {
            offset.max((selected + 1).saturating_sub(self.list_height))
        };
        (self.list_height, Some(first))
    }

    /// Switch to the other view
    pub fn next_view(&mut self) {
        self.view = self.view.next();
        self.detail = None;
    }

    /// Cycle through themes
    pub fn next_theme(&mut self) {
        self.theme = self.theme.next();
        self.config.theme = self.theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(count: i64) -> AppState {
        let mut state = AppState::new(Config::default());
        let page: Vec<Character> = (1..=count)
            .map(|id| Character::new(id, &format!("Character {id}")))
            .collect();
        state.append_characters(&page);
        state
    }

    #[test]
    fn test_first_page_selects_first_character() {
        let state = state_with(20);
        assert_eq!(state.character_list.selected(), Some(0));
        assert_eq!(state.selected_character().unwrap().id, 1);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = state_with(3);
        state.select_prev();
        assert_eq!(state.character_list.selected(), Some(0));

        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.character_list.selected(), Some(2));

        state.select_first();
        assert_eq!(state.character_list.selected(), Some(0));
        state.select_last();
        assert_eq!(state.character_list.selected(), Some(2));
    }

    #[test]
    fn test_character_window_follows_selection() {
        let mut state = state_with(20);
        state.list_height = 10;
        assert_eq!(state.character_window(), (10, Some(0)));

        state.select_last();
        assert_eq!(state.character_window(), (10, Some(10)));
    }

    #[test]
    fn test_empty_list_has_no_window() {
        let mut state = AppState::new(Config::default());
        state.list_height = 10;
        assert_eq!(state.character_window(), (10, None));
    }

    #[test]
    fn test_favorites_selection() {
        let mut state = AppState::new(Config::default());
        state.view = View::Favorites;

        let rick = FavoriteRecord::from(&Character::new(1, "Rick Sanchez"));
        let morty = FavoriteRecord::from(&Character::new(2, "Morty Smith"));
        state.set_favorites(vec![rick.clone(), morty]);
        state.select_next();
        assert_eq!(state.selected_character().unwrap().id, 2);

        // The list shrinks under the cursor
        state.set_favorites(vec![rick]);
        assert_eq!(state.favorite_list.selected(), Some(0));
        assert!(!state.favorites_empty);

        state.set_favorites(Vec::new());
        assert!(state.favorites_empty);
        assert!(state.selected_character().is_none());
    }

    #[test]
    fn test_switching_view_closes_detail() {
        let mut state = state_with(1);
        state.detail = Some(DetailState::new(Character::new(1, "Rick Sanchez")));

        state.next_view();
        assert_eq!(state.view, View::Favorites);
        assert!(state.detail.is_none());
    }
}
