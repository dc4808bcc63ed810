//! In-memory `CharacterSource` for tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::StatusCode;

use crate::api::{ApiError, ApiResult, CharacterSource};
use crate::models::{Character, Episode};

const BASE: &str = "https://example.test/api";

pub fn episode_url(id: i64) -> String {
    format!("{BASE}/episode/{id}")
}

type DelayFn = Box<dyn Fn(i64) -> Duration + Send + Sync>;

/// Scripted catalog: pages have fixed sizes, unknown pages answer 404
#[derive(Default)]
pub struct FakeSource {
    page_sizes: HashMap<u32, usize>,
    page_delay: Option<Duration>,
    episode_delay: Option<DelayFn>,
    failing_episodes: HashSet<i64>,
    page_requests: Mutex<Vec<u32>>,
    episode_requests: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, size: usize) -> Self {
        self.page_sizes.insert(page, size);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn with_episode_delay(
        mut self,
        delay: impl Fn(i64) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.episode_delay = Some(Box::new(delay));
        self
    }

    pub fn with_failing_episode(mut self, id: i64) -> Self {
        self.failing_episodes.insert(id);
        self
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn episode_requests(&self) -> usize {
        self.episode_requests.load(Ordering::SeqCst)
    }

    pub fn character(id: i64) -> Character {
        Character {
            id,
            name: format!("Character {id}"),
            species: "Human".to_string(),
            status: "Alive".to_string(),
            gender: "unknown".to_string(),
            origin_name: "Earth (C-137)".to_string(),
            location_name: "Earth (Replacement Dimension)".to_string(),
            image: format!("{BASE}/character/avatar/{id}.jpeg"),
            episode: (1..=3).map(episode_url).collect(),
        }
    }
}

fn not_found(url: String) -> ApiError {
    ApiError::Status {
        status: StatusCode::NOT_FOUND,
        url,
    }
}

impl CharacterSource for FakeSource {
    async fn fetch_page(&self, page: u32) -> ApiResult<Vec<Character>> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(page);

        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }

        let size = self
            .page_sizes
            .get(&page)
            .copied()
            .ok_or_else(|| not_found(format!("{BASE}/character?page={page}")))?;

        let first = i64::from(page - 1) * 20 + 1;
        Ok((first..first + size as i64).map(Self::character).collect())
    }

    async fn fetch_episode(&self, url: &str) -> ApiResult<Episode> {
        self.episode_requests.fetch_add(1, Ordering::SeqCst);

        let id: i64 = url
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| not_found(url.to_string()))?;

        if let Some(delay) = &self.episode_delay {
            tokio::time::sleep(delay(id)).await;
        }

        if self.failing_episodes.contains(&id) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: url.to_string(),
            });
        }

        Ok(Episode {
            id,
            name: format!("Episode {id}"),
            air_date: "December 2, 2013".to_string(),
            episode: format!("S01E{id:02}"),
        })
    }

    async fn fetch_character(&self, id: i64) -> ApiResult<Character> {
        if id <= 0 {
            return Err(not_found(format!("{BASE}/character/{id}")));
        }
        Ok(Self::character(id))
    }
}

