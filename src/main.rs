//! rickdex - A terminal browser for the Rick and Morty character catalog

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use rickdex::api::{CharacterSource, RickAndMortyClient};
use rickdex::presentation::{
    CharacterDetailNavigation, CharacterDetailViewModel, FavoriteListNavigation,
    FavoriteListViewModel,
};
use rickdex::sync::FavoriteSync;
use rickdex::{Character, Config, Database};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Run => rickdex::app::run(),
        Command::Characters { page } => block_on(characters_cli(page)),
        Command::Character { id } => block_on(character_cli(id)),
        Command::Favorite { id } => block_on(favorite_cli(id)),
        Command::Favorites => block_on(favorites_cli()),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    Characters { page: u32 },
    Character { id: i64 },
    Favorite { id: i64 },
    Favorites,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Run);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "characters" | "ls" => {
            let page = match args.iter().position(|a| a == "--page" || a == "-p") {
                Some(i) => args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("Missing value for --page"))?
                    .parse()
                    .context("Page must be a positive number")?,
                None => 1,
            };
            if page == 0 {
                anyhow::bail!("Pages start at 1");
            }
            Ok(Command::Characters { page })
        }

        "character" | "show" => Ok(Command::Character {
            id: parse_id(args.get(2))?,
        }),

        "favorite" | "fav" => Ok(Command::Favorite {
            id: parse_id(args.get(2))?,
        }),

        "favorites" | "favs" => Ok(Command::Favorites),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'rickdex --help' for usage"
        )),
    }
}

fn parse_id(arg: Option<&String>) -> Result<i64> {
    arg.ok_or_else(|| anyhow::anyhow!("Missing character id"))?
        .parse()
        .context("Character id must be a number")
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
🧪 rickdex - Rick and Morty characters in your terminal

USAGE:
    rickdex                            Launch TUI
    rickdex [COMMAND]

COMMANDS:
    characters [OPTIONS]               List one page of characters
      Options:
        -p, --page <n>                 Page number (default: 1)

    character <id>                     Show a character with its episodes
    favorite <id>                      Toggle a character as favorite
    favorites                          List favorite characters

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    Navigation
      j/↓           Move down (loads more at the bottom)
      k/↑           Move up
      Tab           Switch Characters/Favorites
      g/G           Jump to top/bottom

    Actions
      Enter         Open detail
      f             Toggle favorite
      r             Retry
      o             Open image in browser

    View
      t             Change theme
      ?             Help

CONFIG:
    {}
"#,
        rickdex::LOGO,
        config_path
    );
}

fn print_version() {
    println!("rickdex {}", rickdex::VERSION);
}

/// Run one command on a fresh runtime
fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    Runtime::new()?.block_on(future)
}

fn client() -> Result<Arc<RickAndMortyClient>> {
    let config = Config::load()?;
    Ok(Arc::new(RickAndMortyClient::from_config(&config)?))
}

fn favorites() -> Result<FavoriteSync> {
    Ok(FavoriteSync::new(Database::open()?.shared()))
}

async fn characters_cli(page: u32) -> Result<()> {
    let client = client()?;
    let favorites = favorites()?;

    let characters = client.fetch_page(page).await?;
    let starred: HashSet<i64> = favorites
        .all()
        .await?
        .iter()
        .map(|record| record.character_id)
        .collect();

    println!("Characters, page {page}");
    println!("{}", "─".repeat(60));
    for character in &characters {
        let star = if starred.contains(&character.id) { "★" } else { " " };
        println!(
            "{star} {:>4}  {} {}  ({})",
            character.id,
            character.status_emoji(),
            character.name,
            character.summary()
        );
    }

    if characters.len() < rickdex::presentation::PAGE_SIZE {
        println!("\n(last page)");
    }

    Ok(())
}

async fn character_cli(id: i64) -> Result<()> {
    let client = client()?;
    let config = Config::load()?;

    let character = match client.fetch_character(id).await {
        Ok(character) => Some(character),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    let (detail, mut events) = CharacterDetailViewModel::new(
        character,
        client,
        favorites()?,
        config.episode_concurrency(),
    );
    let mut is_favorite = detail.is_favorite();
    detail.on_character_validation();

    while let Some(event) = events.recv().await {
        match event.content_if_not_handled() {
            Some(CharacterDetailNavigation::CloseScreen) => {
                println!("No character with id {id}");
                return Ok(());
            }
            Some(CharacterDetailNavigation::ShowEpisodeList(episodes)) => {
                let values = detail.character_values();
                let Some(character) = values.borrow().clone() else {
                    return Ok(());
                };
                let flag = is_favorite.wait_for(Option::is_some).await?.unwrap_or(false);
                print_character(&character, flag);

                println!("\nEpisodes ({})", episodes.len());
                for episode in episodes {
                    println!("  {:<8} {}  ({})", episode.episode, episode.name, episode.air_date);
                }
                return Ok(());
            }
            Some(CharacterDetailNavigation::ShowEpisodeError(error)) => {
                return Err(anyhow::anyhow!("{error}"));
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_character(character: &Character, is_favorite: bool) {
    let star = if is_favorite { " ★" } else { "" };
    println!("{} {}{star}", character.status_emoji(), character.name);
    println!("{}", "─".repeat(60));
    println!("  Status    {}", character.status);
    println!("  Species   {}", character.species);
    println!("  Gender    {}", character.gender);
    println!("  Origin    {}", character.origin_name);
    println!("  Location  {}", character.location_name);
    println!("  Image     {}", character.image);
}

async fn favorite_cli(id: i64) -> Result<()> {
    let db = Database::open()?.shared();

    // Offline, a stored record is enough to flip the flag
    let character = match client()?.fetch_character(id).await {
        Ok(character) => character,
        Err(e) => {
            let stored = db.lock().await.get_favorite(id)?;
            let Some(record) = stored else {
                return Err(e).context(format!("Could not fetch character {id}"));
            };
            tracing::warn!(id, error = %e, "Using the stored record");
            record.to_character()
        }
    };

    if FavoriteSync::new(db).toggle(&character).await? {
        println!("★ {} added to favorites", character.name);
    } else {
        println!("☆ {} removed from favorites", character.name);
    }

    Ok(())
}

async fn favorites_cli() -> Result<()> {
    let (screen, mut events) = FavoriteListViewModel::new(favorites()?);
    screen.refresh();

    let Some(event) = events.recv().await else {
        return Ok(());
    };

    match event.content_if_not_handled() {
        Some(FavoriteListNavigation::ShowCharacterList(records)) => {
            println!("Favorites:\n");
            for record in records {
                println!(
                    "  ★ {:>4}  {}  ({}, {})",
                    record.character_id,
                    record.name,
                    record.species,
                    record.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Some(FavoriteListNavigation::ShowEmptyListMessage) => {
            println!("No favorites yet.");
            println!("\nAdd one with:");
            println!("  rickdex favorite <id>");
        }
        None => {}
    }

    Ok(())
}
