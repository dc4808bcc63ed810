//! Character model (as fetched from the remote catalog)

use serde::{Deserialize, Serialize};

/// A character from the remote catalog
///
/// Immutable once fetched; the detail screen receives a clone of the value
/// the list screen holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Catalog identifier (unique)
    pub id: i64,
    /// Character name
    pub name: String,
    /// Species (e.g. "Human", "Alien")
    pub species: String,
    /// Life status ("Alive", "Dead" or "unknown")
    pub status: String,
    /// Gender ("Female", "Male", "Genderless" or "unknown")
    pub gender: String,
    /// Name of the origin location
    pub origin_name: String,
    /// Name of the last known location
    pub location_name: String,
    /// Avatar image URL
    pub image: String,
    /// Episode URLs, in catalog order
    pub episode: Vec<String>,
}

impl Character {
    /// Create a character with only an id and a name set
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            species: String::new(),
            status: String::new(),
            gender: String::new(),
            origin_name: String::new(),
            location_name: String::new(),
            image: String::new(),
            episode: Vec::new(),
        }
    }

    /// Get the emoji for the life status
    pub fn status_emoji(&self) -> &'static str {
        status_emoji(&self.status)
    }

    /// One-line summary for list display (e.g. "Alive · Human")
    pub fn summary(&self) -> String {
        match (self.status.is_empty(), self.species.is_empty()) {
            (false, false) => format!("{} · {}", self.status, self.species),
            (false, true) => self.status.clone(),
            (true, false) => self.species.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Map a life status string to an emoji
pub fn status_emoji(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "alive" => "🟢",
        "dead" => "💀",
        _ => "❔",
    }
}
