//! Favorite record (local, denormalized copy of a character)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Character;

/// A row of the local favorites table
///
/// Carries the display fields of the character so the favorites list works
/// without the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Character identifier (primary key)
    pub character_id: i64,
    /// Current favorite flag
    pub is_favorite: bool,
    /// Character name
    pub name: String,
    /// Species
    pub species: String,
    /// Life status
    pub status: String,
    /// Gender
    pub gender: String,
    /// Name of the origin location
    pub origin_name: String,
    /// Name of the last known location
    pub location_name: String,
    /// Avatar image URL
    pub image: String,
    /// When the flag was last written
    pub updated_at: DateTime<Utc>,
}

impl FavoriteRecord {
    /// Convert a fetched character into a record to be written
    ///
    /// The flag is left `false`; the store decides the resulting value when
    /// the record is upserted.
    pub fn from_character(character: &Character) -> Self {
        Self {
            character_id: character.id,
            is_favorite: false,
            name: character.name.clone(),
            species: character.species.clone(),
            status: character.status.clone(),
            gender: character.gender.clone(),
            origin_name: character.origin_name.clone(),
            location_name: character.location_name.clone(),
            image: character.image.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Rebuild a character from the stored fields (episodes are not stored)
    pub fn to_character(&self) -> Character {
        Character {
            id: self.character_id,
            name: self.name.clone(),
            species: self.species.clone(),
            status: self.status.clone(),
            gender: self.gender.clone(),
            origin_name: self.origin_name.clone(),
            location_name: self.location_name.clone(),
            image: self.image.clone(),
            episode: Vec::new(),
        }
    }
}

impl From<&Character> for FavoriteRecord {
    fn from(character: &Character) -> Self {
        Self::from_character(character)
    }
}
