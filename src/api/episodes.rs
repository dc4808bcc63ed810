//! Episode loader: fetch every episode of one character

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::models::Episode;

use super::{ApiError, ApiResult, CharacterSource};

/// Fetch the episodes behind `urls`, preserving their order
///
/// At most `concurrency` requests are in flight. The result is
/// all-or-nothing: the first failing URL (in list order) aborts the batch
/// and is reported as [`ApiError::Episode`].
pub async fn load_episodes<S: CharacterSource>(
    source: &S,
    urls: &[String],
    concurrency: usize,
) -> ApiResult<Vec<Episode>> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(count = urls.len(), concurrency, "Loading episodes");

    stream::iter(urls.iter().cloned())
        .map(|url| async move {
            match source.fetch_episode(&url).await {
                Ok(episode) => Ok(episode),
                Err(e) => Err(ApiError::Episode {
                    url,
                    source: Box::new(e),
                }),
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
