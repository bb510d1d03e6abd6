use std::sync::Arc;

use article_store::ReactionState;
use error_types::AppResult;
use kv_store::KeyValueStore;
use tracing::warn;

const LIKED_KEY_PREFIX: &str = "likedArticles_";
const DISLIKED_KEY_PREFIX: &str = "dislikedArticles_";

/// Per-user, on-device mirror of which articles are liked and disliked.
///
/// Backing storage is two JSON-encoded id lists per user. Writes strip the
/// article id from both lists before re-appending it to the target one, so the
/// lists behave as disjoint sets despite being stored as lists. The mirror
/// only exists to render button state before the live subscription has
/// round-tripped; reads of missing or corrupt values degrade to empty.
#[derive(Clone)]
pub struct ReactionCache {
    kv: Arc<dyn KeyValueStore>,
}

fn liked_key(user_id: &str) -> String {
    format!("{LIKED_KEY_PREFIX}{user_id}")
}

fn disliked_key(user_id: &str) -> String {
    format!("{DISLIKED_KEY_PREFIX}{user_id}")
}

impl ReactionCache {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn read_list(&self, key: &str) -> Vec<String> {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "reaction record unreadable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(key, error = %e, "reaction record corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    async fn write_list(&self, key: &str, ids: &[String]) -> AppResult<()> {
        let raw = serde_json::to_string(ids)
            .map_err(|e| error_types::AppError::Storage(e.to_string()))?;
        self.kv.set(key, &raw).await?;
        Ok(())
    }

    /// Article ids the user has liked, in recording order.
    pub async fn liked(&self, user_id: &str) -> Vec<String> {
        self.read_list(&liked_key(user_id)).await
    }

    /// Article ids the user has disliked, in recording order.
    pub async fn disliked(&self, user_id: &str) -> Vec<String> {
        self.read_list(&disliked_key(user_id)).await
    }

    /// Last recorded reaction of the user on the article.
    pub async fn state_for(&self, user_id: &str, article_id: &str) -> ReactionState {
        if self.liked(user_id).await.iter().any(|id| id == article_id) {
            ReactionState::Liked
        } else if self
            .disliked(user_id)
            .await
            .iter()
            .any(|id| id == article_id)
        {
            ReactionState::Disliked
        } else {
            ReactionState::Neutral
        }
    }

    /// Records the user's reaction, keeping the two lists disjoint and
    /// duplicate-free.
    pub async fn record(
        &self,
        user_id: &str,
        article_id: &str,
        state: ReactionState,
    ) -> AppResult<()> {
        let mut liked = self.liked(user_id).await;
        let mut disliked = self.disliked(user_id).await;
        liked.retain(|id| id != article_id);
        disliked.retain(|id| id != article_id);

        match state {
            ReactionState::Liked => liked.push(article_id.to_string()),
            ReactionState::Disliked => disliked.push(article_id.to_string()),
            ReactionState::Neutral => {}
        }

        self.write_list(&liked_key(user_id), &liked).await?;
        self.write_list(&disliked_key(user_id), &disliked).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv_store::MemoryKvStore;

    fn cache() -> ReactionCache {
        ReactionCache::new(Arc::new(MemoryKvStore::new()))
    }

    #[tokio::test]
    async fn empty_cache_is_neutral() {
        let cache = cache();
        assert_eq!(cache.state_for("u1", "a1").await, ReactionState::Neutral);
        assert!(cache.liked("u1").await.is_empty());
        assert!(cache.disliked("u1").await.is_empty());
    }

    #[tokio::test]
    async fn record_keeps_lists_disjoint() {
        let cache = cache();

        cache.record("u1", "a1", ReactionState::Liked).await.unwrap();
        assert_eq!(cache.state_for("u1", "a1").await, ReactionState::Liked);

        cache
            .record("u1", "a1", ReactionState::Disliked)
            .await
            .unwrap();
        assert_eq!(cache.state_for("u1", "a1").await, ReactionState::Disliked);
        assert!(cache.liked("u1").await.is_empty());
        assert_eq!(cache.disliked("u1").await, vec!["a1".to_string()]);

        cache
            .record("u1", "a1", ReactionState::Neutral)
            .await
            .unwrap();
        assert_eq!(cache.state_for("u1", "a1").await, ReactionState::Neutral);
        assert!(cache.disliked("u1").await.is_empty());
    }

    #[tokio::test]
    async fn repeated_record_does_not_duplicate() {
        let cache = cache();
        cache.record("u1", "a1", ReactionState::Liked).await.unwrap();
        cache.record("u1", "a1", ReactionState::Liked).await.unwrap();
        assert_eq!(cache.liked("u1").await, vec!["a1".to_string()]);
    }

    #[tokio::test]
    async fn records_are_namespaced_per_user() {
        let cache = cache();
        cache.record("u1", "a1", ReactionState::Liked).await.unwrap();
        assert_eq!(cache.state_for("u2", "a1").await, ReactionState::Neutral);
    }

    #[tokio::test]
    async fn corrupt_record_degrades_to_empty() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set("likedArticles_u1", "not json").await.unwrap();

        let cache = ReactionCache::new(kv);
        assert!(cache.liked("u1").await.is_empty());
        assert_eq!(cache.state_for("u1", "a1").await, ReactionState::Neutral);
    }
}
