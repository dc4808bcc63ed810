//! Character detail screen: snapshot, favorite flag and episodes

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{self, ApiError, CharacterSource};
use crate::models::{Character, Episode};
use crate::sync::FavoriteSync;

use super::event::{self, EventEmitter, EventReceiver};
use super::scope::ScreenScope;

/// Outcomes published by the detail screen
#[derive(Debug)]
pub enum CharacterDetailNavigation {
    /// The episode batch failed; nothing partial is shown
    ShowEpisodeError(Arc<ApiError>),
    /// Every episode of the character, in broadcast order
    ShowEpisodeList(Vec<Episode>),
    /// The screen has nothing to show and should go away
    CloseScreen,
    /// Hide the episode loading indicator
    HideEpisodeListLoading,
    /// Show the episode loading indicator
    ShowEpisodeListLoading,
}

/// Drives the detail screen of one character
pub struct CharacterDetailViewModel<S> {
    character: Option<Character>,
    source: Arc<S>,
    favorites: FavoriteSync,
    concurrency: usize,
    character_values: Arc<watch::Sender<Option<Character>>>,
    is_favorite: Arc<watch::Sender<Option<bool>>>,
    events: EventEmitter<CharacterDetailNavigation>,
    scope: ScreenScope,
}

impl<S: CharacterSource> CharacterDetailViewModel<S> {
    /// Create the screen for `character` (which may be missing)
    ///
    /// `concurrency` bounds the episode requests in flight. Must be called
    /// inside a tokio runtime context.
    pub fn new(
        character: Option<Character>,
        source: Arc<S>,
        favorites: FavoriteSync,
        concurrency: usize,
    ) -> (Self, EventReceiver<CharacterDetailNavigation>) {
        let (events, rx) = event::channel();
        let view_model = Self {
            character,
            source,
            favorites,
            concurrency,
            character_values: Arc::new(watch::Sender::new(None)),
            is_favorite: Arc::new(watch::Sender::new(None)),
            events,
            scope: ScreenScope::new(),
        };
        (view_model, rx)
    }

    /// Snapshot of the character, `None` until validation publishes it
    pub fn character_values(&self) -> watch::Receiver<Option<Character>> {
        self.character_values.subscribe()
    }

    /// Favorite flag, `None` until the store has been read
    pub fn is_favorite(&self) -> watch::Receiver<Option<bool>> {
        self.is_favorite.subscribe()
    }

    /// The event emitter, for replaying the last event on re-attach
    pub const fn events(&self) -> &EventEmitter<CharacterDetailNavigation> {
        &self.events
    }

    /// Start the screen
    ///
    /// Without a character only [`CharacterDetailNavigation::CloseScreen`]
    /// is emitted. Otherwise the snapshot is published, the favorite flag
    /// is read and the episode batch is started.
    pub fn on_character_validation(&self) {
        let Some(character) = self.character.clone() else {
            tracing::debug!("Detail screen opened without a character");
            self.events.emit(CharacterDetailNavigation::CloseScreen);
            return;
        };

        self.character_values.send_replace(Some(character.clone()));
        self.load_favorite_status(character.id);
        self.load_episodes(character.episode);
    }

    /// Flip the favorite flag of the shown character
    pub fn on_update_favorite_status(&self) {
        let Some(character) = self.character.clone() else {
            tracing::warn!("Favorite toggle without a character");
            return;
        };

        let favorites = self.favorites.clone();
        let is_favorite = Arc::clone(&self.is_favorite);

        self.scope.spawn(async move {
            match favorites.toggle(&character).await {
                Ok(flag) => {
                    is_favorite.send_replace(Some(flag));
                }
                Err(e) => {
                    tracing::warn!(
                        character_id = character.id,
                        error = %e,
                        "Favorite toggle failed"
                    );
                }
            }
        });
    }

    /// Abort outstanding requests
    pub fn clear(&self) {
        self.scope.clear();
    }

    fn load_favorite_status(&self, character_id: i64) {
        let favorites = self.favorites.clone();
        let is_favorite = Arc::clone(&self.is_favorite);

        self.scope.spawn(async move {
            let flag = favorites.status(character_id).await.unwrap_or_else(|e| {
                tracing::warn!(character_id, error = %e, "Could not read favorite status");
                false
            });
            is_favorite.send_replace(Some(flag));
        });
    }

    fn load_episodes(&self, urls: Vec<String>) {
        self.events
            .emit(CharacterDetailNavigation::ShowEpisodeListLoading);

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let concurrency = self.concurrency;

        self.scope.spawn(async move {
            let result = api::load_episodes(source.as_ref(), &urls, concurrency).await;

            events.emit(CharacterDetailNavigation::HideEpisodeListLoading);
            match result {
                Ok(episodes) => {
                    events.emit(CharacterDetailNavigation::ShowEpisodeList(episodes));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Episode list failed");
                    events.emit(CharacterDetailNavigation::ShowEpisodeError(Arc::new(e)));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeSource, episode_url};
    use crate::db::Database;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    fn favorites(dir: &TempDir) -> FavoriteSync {
        let db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();
        FavoriteSync::new(db.shared())
    }

    fn screen(
        character: Option<Character>,
        source: FakeSource,
        favorites: FavoriteSync,
    ) -> (
        CharacterDetailViewModel<FakeSource>,
        EventReceiver<CharacterDetailNavigation>,
    ) {
        CharacterDetailViewModel::new(character, Arc::new(source), favorites, 4)
    }

    async fn drain(
        rx: &mut EventReceiver<CharacterDetailNavigation>,
        count: usize,
    ) -> Vec<Arc<event::Event<CharacterDetailNavigation>>> {
        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            events.push(rx.recv().await.unwrap());
        }
        events
    }

    #[tokio::test]
    async fn test_missing_character_only_closes() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new();
        let (vm, mut rx) = screen(None, source, favorites(&dir));
        let values = vm.character_values();
        let flag = vm.is_favorite();

        vm.on_character_validation();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let event = rx.try_recv().unwrap();
        assert!(matches!(
            event.content_if_not_handled(),
            Some(CharacterDetailNavigation::CloseScreen)
        ));
        assert!(rx.try_recv().is_err());

        assert!(!values.has_changed().unwrap());
        assert!(values.borrow().is_none());
        assert!(flag.borrow().is_none());
    }

    #[tokio::test]
    async fn test_toggle_without_character_is_ignored() {
        let dir = tempdir().unwrap();
        let favorites = favorites(&dir);
        let (vm, mut rx) = screen(None, FakeSource::new(), favorites.clone());

        vm.on_update_favorite_status();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(rx.try_recv().is_err());
        assert!(vm.is_favorite().borrow().is_none());
        assert!(favorites.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_loads_everything() {
        let dir = tempdir().unwrap();
        // Later episodes answer first; order must still follow the URLs
        let source = FakeSource::new()
            .with_episode_delay(|id| Duration::from_millis(u64::try_from(40 - id * 10).unwrap()));
        let rick = FakeSource::character(1);
        let (vm, mut rx) = screen(Some(rick.clone()), source, favorites(&dir));
        let mut flag = vm.is_favorite();

        vm.on_character_validation();
        assert_eq!(vm.character_values().borrow().as_ref(), Some(&rick));

        let events = drain(&mut rx, 3).await;
        assert!(matches!(
            events[0].peek_content(),
            CharacterDetailNavigation::ShowEpisodeListLoading
        ));
        assert!(matches!(
            events[1].peek_content(),
            CharacterDetailNavigation::HideEpisodeListLoading
        ));
        match events[2].peek_content() {
            CharacterDetailNavigation::ShowEpisodeList(episodes) => {
                let ids: Vec<i64> = episodes.iter().map(|e| e.id).collect();
                assert_eq!(ids, vec![1, 2, 3]);
            }
            other => panic!("expected episodes, got {other:?}"),
        }

        let read = flag.wait_for(Option::is_some).await.unwrap();
        assert_eq!(*read, Some(false));
    }

    #[tokio::test]
    async fn test_failing_episode_gives_single_error() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new().with_failing_episode(2);
        let (vm, mut rx) = screen(Some(FakeSource::character(1)), source, favorites(&dir));

        vm.on_character_validation();

        let events = drain(&mut rx, 3).await;
        match events[2].peek_content() {
            CharacterDetailNavigation::ShowEpisodeError(error) => match error.as_ref() {
                ApiError::Episode { url, .. } => assert_eq!(url, &episode_url(2)),
                other => panic!("expected an episode error, got {other:?}"),
            },
            other => panic!("expected an error, got {other:?}"),
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_character_without_episodes() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new();
        let mut summer = FakeSource::character(3);
        summer.episode.clear();
        let (vm, mut rx) = screen(Some(summer), source, favorites(&dir));

        vm.on_character_validation();

        let events = drain(&mut rx, 3).await;
        assert!(matches!(
            events[2].peek_content(),
            CharacterDetailNavigation::ShowEpisodeList(list) if list.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_favorite_toggle_round_trip() {
        let dir = tempdir().unwrap();
        let favorites = favorites(&dir);
        let rick = FakeSource::character(1);
        let (vm, _rx) = screen(Some(rick), FakeSource::new(), favorites.clone());
        let mut flag = vm.is_favorite();

        vm.on_update_favorite_status();
        assert_eq!(*flag.wait_for(Option::is_some).await.unwrap(), Some(true));
        assert!(favorites.status(1).await.unwrap());

        vm.on_update_favorite_status();
        assert_eq!(*flag.wait_for(|f| *f == Some(false)).await.unwrap(), Some(false));
        assert!(!favorites.status(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_stored_flag_is_shown() {
        let dir = tempdir().unwrap();
        let favorites = favorites(&dir);
        let rick = FakeSource::character(1);
        favorites.toggle(&rick).await.unwrap();

        let (vm, _rx) = screen(Some(rick), FakeSource::new(), favorites);
        let mut flag = vm.is_favorite();
        vm.on_character_validation();

        assert_eq!(*flag.wait_for(Option::is_some).await.unwrap(), Some(true));
    }
}
