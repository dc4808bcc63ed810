//! Screen logic, independent of how the screens are drawn
//!
//! Each view model owns a [`ScreenScope`] for its requests and publishes
//! one-shot [`Event`]s plus `watch` snapshots. The TUI in [`crate::app`]
//! and the CLI in `main.rs` are the two presenters.

pub mod character_detail;
pub mod character_list;
pub mod event;
pub mod favorite_list;
pub mod scope;

pub use character_detail::{CharacterDetailNavigation, CharacterDetailViewModel};
pub use character_list::{CharacterListNavigation, CharacterListViewModel, PAGE_SIZE, PageState};
pub use event::{Event, EventEmitter, EventReceiver};
pub use favorite_list::{FavoriteListNavigation, FavoriteListViewModel};
pub use scope::ScreenScope;
