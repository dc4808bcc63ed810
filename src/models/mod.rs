//! Data models for rickdex

mod character;
mod episode;
mod favorite;

pub use character::{Character, status_emoji};
pub use episode::Episode;
pub use favorite::FavoriteRecord;
