//! Favorite-status synchronization with the local store

use anyhow::Result;

use crate::db::SharedDatabase;
use crate::models::{Character, FavoriteRecord};

/// Reads and toggles favorite flags in the shared database
///
/// Every screen holds a clone; they all point at the same connection, so
/// toggles from different screens are applied one after another.
#[derive(Clone)]
pub struct FavoriteSync {
    db: SharedDatabase,
}

impl FavoriteSync {
    /// Create a synchronizer over the shared database
    pub const fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Current favorite flag for a character (no record means not favorite)
    pub async fn status(&self, character_id: i64) -> Result<bool> {
        let db = self.db.lock().await;
        Ok(db.read_favorite(character_id)?.unwrap_or(false))
    }

    /// Write the character's record and flip its flag, returning the new flag
    pub async fn toggle(&self, character: &Character) -> Result<bool> {
        let record = FavoriteRecord::from(character);
        let mut db = self.db.lock().await;
        let is_favorite = db.upsert_favorite(&record)?;

        tracing::info!(
            character_id = character.id,
            name = %character.name,
            is_favorite,
            "Favorite toggled"
        );
        Ok(is_favorite)
    }

    /// Every character currently marked as favorite
    pub async fn all(&self) -> Result<Vec<FavoriteRecord>> {
        let db = self.db.lock().await;
        db.read_all_favorites()
    }
}
