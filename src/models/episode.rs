//! Episode model

use serde::{Deserialize, Serialize};

/// An episode, fetched lazily for one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Catalog identifier
    pub id: i64,
    /// Episode title
    pub name: String,
    /// Air date as published by the catalog (e.g. "December 2, 2013")
    pub air_date: String,
    /// Episode code (e.g. "S01E01")
    pub episode: String,
}

impl Episode {
    /// Season number parsed from the episode code
    pub fn season(&self) -> Option<u32> {
        let rest = self.episode.strip_prefix('S')?;
        let end = rest.find('E')?;
        rest[..end].parse().ok()
    }
}
