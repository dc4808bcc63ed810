//! Database module for `SQLite` storage (local favorites)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::FavoriteRecord;
use crate::paths;

/// Database handle shared by every screen
pub type SharedDatabase = Arc<Mutex<Database>>;

const FAVORITE_COLUMNS: &str = "character_id, is_favorite, name, species, status, gender, \
                                origin_name, location_name, image, updated_at";

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the default location
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_path(&path)
    }

    /// Open or create the database at a specific path
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let conn = Connection::open(path).context("Failed to open database")?;

        let db = Self { conn };
        db.init()?;

        Ok(db)
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        paths::database_path()
    }

    /// Wrap the connection for sharing across screens and tasks
    pub fn shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS favorites (
                character_id INTEGER PRIMARY KEY,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                name TEXT NOT NULL,
                species TEXT NOT NULL,
                status TEXT NOT NULL,
                gender TEXT NOT NULL,
                origin_name TEXT NOT NULL,
                location_name TEXT NOT NULL,
                image TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_favorites_flag ON favorites(is_favorite);
            ",
        )?;

        Ok(())
    }

    // ==================== Favorites ====================

    /// Read the favorite flag for a character (`None` when never toggled)
    pub fn read_favorite(&self, character_id: i64) -> Result<Option<bool>> {
        let result = self.conn.query_row(
            "SELECT is_favorite FROM favorites WHERE character_id = ?1",
            params![character_id],
            |row| row.get::<_, i32>(0),
        );

        match result {
            Ok(flag) => Ok(Some(flag != 0)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the stored record for a character, whatever its flag
    pub fn get_favorite(&self, character_id: i64) -> Result<Option<FavoriteRecord>> {
        let sql = format!("SELECT {FAVORITE_COLUMNS} FROM favorites WHERE character_id = ?1");
        let result = self
            .conn
            .query_row(&sql, params![character_id], Self::row_to_favorite);

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get every character currently marked as favorite (latest toggle first)
    pub fn read_all_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        let sql = format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites
             WHERE is_favorite = 1
             ORDER BY updated_at DESC, character_id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let records = stmt.query_map([], Self::row_to_favorite)?;
        records.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Write a character's record, flipping its favorite flag
    ///
    /// The read of the current flag and the write happen in one transaction.
    /// Returns the flag now stored. The `is_favorite` field of `record` is
    /// ignored.
    pub fn upsert_favorite(&mut self, record: &FavoriteRecord) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let current = match tx.query_row(
            "SELECT is_favorite FROM favorites WHERE character_id = ?1",
            params![record.character_id],
            |row| row.get::<_, i32>(0),
        ) {
            Ok(flag) => flag != 0,
            Err(rusqlite::Error::QueryReturnedNoRows) => false,
            Err(e) => return Err(e.into()),
        };
        let is_favorite = !current;

        tx.execute(
            r"INSERT INTO favorites (character_id, is_favorite, name, species, status, gender,
                                     origin_name, location_name, image, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
               ON CONFLICT(character_id) DO UPDATE SET
                   is_favorite = excluded.is_favorite,
                   name = excluded.name,
                   species = excluded.species,
                   status = excluded.status,
                   gender = excluded.gender,
                   origin_name = excluded.origin_name,
                   location_name = excluded.location_name,
                   image = excluded.image,
                   updated_at = excluded.updated_at",
            params![
                record.character_id,
                i32::from(is_favorite),
                record.name,
                record.species,
                record.status,
                record.gender,
                record.origin_name,
                record.location_name,
                record.image,
                Utc::now().to_rfc3339(),
            ],
        )?;
        tx.commit().context("Failed to commit favorite update")?;

        tracing::debug!(
            character_id = record.character_id,
            is_favorite,
            "Favorite flag written"
        );
        Ok(is_favorite)
    }

    /// Helper to convert a row to `FavoriteRecord`
    fn row_to_favorite(row: &rusqlite::Row<'_>) -> rusqlite::Result<FavoriteRecord> {
        let updated_at: String = row.get(9)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    9,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?
            .with_timezone(&Utc);

        Ok(FavoriteRecord {
            character_id: row.get(0)?,
            is_favorite: row.get::<_, i32>(1)? != 0,
            name: row.get(2)?,
            species: row.get(3)?,
            status: row.get(4)?,
            gender: row.get(5)?,
            origin_name: row.get(6)?,
            location_name: row.get(7)?,
            image: row.get(8)?,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Character;
    use tempfile::tempdir;

    fn rick() -> Character {
        Character {
            id: 1,
            name: "Rick Sanchez".to_string(),
            species: "Human".to_string(),
            status: "Alive".to_string(),
            gender: "Male".to_string(),
            origin_name: "Earth (C-137)".to_string(),
            location_name: "Citadel of Ricks".to_string(),
            image: "https://rickandmortyapi.com/api/character/avatar/1.jpeg".to_string(),
            episode: vec!["https://rickandmortyapi.com/api/episode/1".to_string()],
        }
    }

    #[test]
    fn test_database_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let _db = Database::open_path(&path).unwrap();
        // Reopening must not fail on the existing schema
        let _db = Database::open_path(&path).unwrap();
    }

    #[test]
    fn test_read_missing_favorite() {
        let dir = tempdir().unwrap();
        let db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();

        assert_eq!(db.read_favorite(42).unwrap(), None);
        assert!(db.get_favorite(42).unwrap().is_none());
        assert!(db.read_all_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_flips_flag() {
        let dir = tempdir().unwrap();
        let mut db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();
        let record = FavoriteRecord::from(&rick());

        assert!(db.upsert_favorite(&record).unwrap());
        assert_eq!(db.read_favorite(1).unwrap(), Some(true));

        assert!(!db.upsert_favorite(&record).unwrap());
        assert_eq!(db.read_favorite(1).unwrap(), Some(false));

        // The row is kept when unfavorited
        let stored = db.get_favorite(1).unwrap().unwrap();
        assert!(!stored.is_favorite);
        assert_eq!(stored.name, "Rick Sanchez");
        assert_eq!(stored.location_name, "Citadel of Ricks");
    }

    #[test]
    fn test_upsert_refreshes_denormalized_fields() {
        let dir = tempdir().unwrap();
        let mut db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();

        let mut character = rick();
        db.upsert_favorite(&FavoriteRecord::from(&character)).unwrap();

        character.status = "Dead".to_string();
        db.upsert_favorite(&FavoriteRecord::from(&character)).unwrap();

        let stored = db.get_favorite(1).unwrap().unwrap();
        assert_eq!(stored.status, "Dead");
    }

    #[test]
    fn test_read_all_favorites_only_flagged() {
        let dir = tempdir().unwrap();
        let mut db = Database::open_path(&dir.path().join("test.sqlite")).unwrap();

        let rick = rick();
        let morty = Character::new(2, "Morty Smith");
        let summer = Character::new(3, "Summer Smith");

        db.upsert_favorite(&FavoriteRecord::from(&rick)).unwrap();
        db.upsert_favorite(&FavoriteRecord::from(&morty)).unwrap();
        db.upsert_favorite(&FavoriteRecord::from(&summer)).unwrap();
        // Unfavorite Morty again
        db.upsert_favorite(&FavoriteRecord::from(&morty)).unwrap();

        let favorites = db.read_all_favorites().unwrap();
        let mut ids: Vec<_> = favorites.iter().map(|f| f.character_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
        assert!(favorites.iter().all(|f| f.is_favorite));
    }
}
