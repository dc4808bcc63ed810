//! Rick and Morty API client

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{Character, Episode};

use super::{ApiError, ApiResult, CharacterSource};

/// Client for the public Rick and Morty REST API
#[derive(Debug, Clone)]
pub struct RickAndMortyClient {
    client: Client,
    base_url: String,
}

impl RickAndMortyClient {
    /// Create a client with default HTTP settings
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the user configuration (base URL and timeout)
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("rickdex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        tracing::debug!(%url, "GET");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl CharacterSource for RickAndMortyClient {
    async fn fetch_page(&self, page: u32) -> ApiResult<Vec<Character>> {
        let url = self.api_url(&format!("/character?page={page}"));
        let response: PageResponse = self.get_json(&url).await?;

        tracing::debug!(
            page,
            pages = response.info.pages,
            total = response.info.count,
            received = response.results.len(),
            "Fetched character page"
        );

        Ok(response
            .results
            .into_iter()
            .map(CharacterDto::into_character)
            .collect())
    }

    async fn fetch_episode(&self, url: &str) -> ApiResult<Episode> {
        let episode: EpisodeDto = self.get_json(url).await?;
        Ok(episode.into_episode())
    }

    async fn fetch_character(&self, id: i64) -> ApiResult<Character> {
        let url = self.api_url(&format!("/character/{id}"));
        let character: CharacterDto = self.get_json(&url).await?;
        Ok(character.into_character())
    }
}

// ==================== Wire types ====================

/// `GET /character?page=N`
#[derive(Debug, Deserialize)]
struct PageResponse {
    info: PageInfo,
    results: Vec<CharacterDto>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PageInfo {
    count: u32,
    pages: u32,
    next: Option<String>,
    prev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CharacterDto {
    id: i64,
    name: String,
    status: String,
    species: String,
    gender: String,
    origin: LocationRef,
    location: LocationRef,
    image: String,
    #[serde(default)]
    episode: Vec<String>,
}

impl CharacterDto {
    fn into_character(self) -> Character {
        Character {
            id: self.id,
            name: self.name,
            species: self.species,
            status: self.status,
            gender: self.gender,
            origin_name: self.origin.name,
            location_name: self.location.name,
            image: self.image,
            episode: self.episode,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeDto {
    id: i64,
    name: String,
    air_date: String,
    episode: String,
}

impl EpisodeDto {
    fn into_episode(self) -> Episode {
        Episode {
            id: self.id,
            name: self.name,
            air_date: self.air_date,
            episode: self.episode,
        }
    }
}
