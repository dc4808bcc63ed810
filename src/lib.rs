//! # rickdex 🧪
//!
//! A terminal browser for the Rick and Morty character catalog, with local
//! favorites.
//!
//! ## Overview
//!
//! rickdex pages through the public catalog, shows each character with the
//! episodes they appear in, and keeps a local list of favorite characters
//! that works offline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     App (TUI) / CLI                         │
//! │   Draws state, turns keys into commands, drains events      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Presentation                           │
//! │  • Character list (pagination)  • Detail (episodes, flag)   │
//! │  • Favorites list               • One-shot events, scopes   │
//! └─────────────────────────────────────────────────────────────┘
//!          │                   │                   │
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │       API       │ │      Sync       │ │     Config      │
//! │                 │ │                 │ │                 │
//! │ • Catalog client│ │ • Favorite flag │ │ • Load/Save     │
//! │ • Episode loader│ │ • Toggle        │ │ • Theme         │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │
//!          ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐
//! │     Models      │ │    Database     │
//! │                 │ │                 │
//! │ • Character     │ │ • Favorites     │
//! │ • Episode       │ │   (SQLite)      │
//! └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Catalog client and episode loader
//! - [`app`] — TUI application state and event loop
//! - [`config`] — Configuration management
//! - [`db`] — `SQLite` database for favorites
//! - [`models`] — Data models (Character, Episode, `FavoriteRecord`)
//! - [`presentation`] — Screen logic: pagination, detail, favorites, events
//! - [`sync`] — Favorite-status synchronization
//! - [`theme`] — Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use rickdex::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_const_for_fn)]

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod models;
pub mod paths;
pub mod presentation;
pub mod sync;
pub mod theme;

// Re-export main types for convenience
pub use app::AppState;
pub use config::Config;
pub use db::Database;
pub use models::{Character, Episode, FavoriteRecord};
pub use theme::{Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// ASCII logo for the application
pub const LOGO: &str = r"
       _        _         _
 _ __ (_)  ___ | | __  __| |  ___ __  __
| '__|| | / __|| |/ / / _` | / _ \\ \/ /
| |   | || (__ |   < | (_| ||  __/ >  <
|_|   |_| \___||_|\_\ \__,_| \___|/_/\_\
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
