//! Favorites screen

use crate::models::FavoriteRecord;
use crate::sync::FavoriteSync;

use super::event::{self, EventEmitter, EventReceiver};
use super::scope::ScreenScope;

/// Outcomes published by the favorites screen
#[derive(Debug)]
pub enum FavoriteListNavigation {
    /// Favorites, most recently changed first
    ShowCharacterList(Vec<FavoriteRecord>),
    /// Nothing is marked as favorite
    ShowEmptyListMessage,
}

/// Lists the characters marked as favorite in the local store
pub struct FavoriteListViewModel {
    favorites: FavoriteSync,
    events: EventEmitter<FavoriteListNavigation>,
    scope: ScreenScope,
}

impl FavoriteListViewModel {
    /// Create the screen and the receiver for its events
    ///
    /// Must be called inside a tokio runtime context.
    pub fn new(favorites: FavoriteSync) -> (Self, EventReceiver<FavoriteListNavigation>) {
        let (events, rx) = event::channel();
        let view_model = Self {
            favorites,
            events,
            scope: ScreenScope::new(),
        };
        (view_model, rx)
    }

    /// The event emitter, for replaying the last event on re-attach
    pub const fn events(&self) -> &EventEmitter<FavoriteListNavigation> {
        &self.events
    }

    /// Re-read the store and publish the result
    pub fn refresh(&self) {
        let favorites = self.favorites.clone();
        let events = self.events.clone();

        self.scope.spawn(async move {
            let list = favorites.all().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read favorites");
                Vec::new()
            });
            Self::publish(&events, list);
        });
    }

    /// Decide what the screen shows for `list`
    pub fn on_favorite_character_list(&self, list: Vec<FavoriteRecord>) {
        Self::publish(&self.events, list);
    }

    /// Abort outstanding reads
    pub fn clear(&self) {
        self.scope.clear();
    }

    fn publish(events: &EventEmitter<FavoriteListNavigation>, list: Vec<FavoriteRecord>) {
        if list.is_empty() {
            events.emit(FavoriteListNavigation::ShowEmptyListMessage);
        } else {
            events.emit(FavoriteListNavigation::ShowCharacterList(list));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Character;
    use tempfile::{TempDir, tempdir};

    fn favorites(dir: &TempDir) -> FavoriteSync {
        let db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();
        FavoriteSync::new(db.shared())
    }

    #[tokio::test]
    async fn test_empty_store_shows_message() {
        let dir = tempdir().unwrap();
        let (vm, mut rx) = FavoriteListViewModel::new(favorites(&dir));

        vm.refresh();

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event.content_if_not_handled(),
            Some(FavoriteListNavigation::ShowEmptyListMessage)
        ));
    }

    #[tokio::test]
    async fn test_refresh_lists_only_favorites() {
        let dir = tempdir().unwrap();
        let favorites = favorites(&dir);
        let rick = Character::new(1, "Rick Sanchez");
        let morty = Character::new(2, "Morty Smith");
        favorites.toggle(&rick).await.unwrap();
        favorites.toggle(&morty).await.unwrap();
        favorites.toggle(&morty).await.unwrap();

        let (vm, mut rx) = FavoriteListViewModel::new(favorites);
        vm.refresh();

        let event = rx.recv().await.unwrap();
        match event.content_if_not_handled() {
            Some(FavoriteListNavigation::ShowCharacterList(list)) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].name, "Rick Sanchez");
            }
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_on_favorite_character_list() {
        let dir = tempdir().unwrap();
        let (vm, mut rx) = FavoriteListViewModel::new(favorites(&dir));

        vm.on_favorite_character_list(Vec::new());
        vm.on_favorite_character_list(vec![FavoriteRecord::from(&Character::new(
            5,
            "Jerry Smith",
        ))]);

        assert!(matches!(
            rx.try_recv().unwrap().peek_content(),
            FavoriteListNavigation::ShowEmptyListMessage
        ));
        assert!(matches!(
            rx.try_recv().unwrap().peek_content(),
            FavoriteListNavigation::ShowCharacterList(list) if list[0].character_id == 5
        ));
    }
}
