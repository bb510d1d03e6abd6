use std::collections::HashSet;
use std::sync::Mutex;

use article_store::{ArticleStore, ReactionState};
use error_types::{AppError, AppResult};
use tracing::{debug, warn};

use crate::cache::ReactionCache;

/// Which reaction button the user pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pressed {
    Like,
    Dislike,
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The remote mutation succeeded; the pair is now in this state.
    Applied(ReactionState),
    /// Another toggle for the same (article, user) pair was still in flight;
    /// this one was ignored.
    Dropped,
}

/// Toggle transition table: from the current state and the pressed button,
/// the target state and the signed deltas for the two counters.
fn transition(current: ReactionState, pressed: Pressed) -> (ReactionState, i64, i64) {
    match (pressed, current) {
        (Pressed::Like, ReactionState::Liked) => (ReactionState::Neutral, -1, 0),
        (Pressed::Like, ReactionState::Neutral) => (ReactionState::Liked, 1, 0),
        (Pressed::Like, ReactionState::Disliked) => (ReactionState::Liked, 1, -1),
        (Pressed::Dislike, ReactionState::Disliked) => (ReactionState::Neutral, 0, -1),
        (Pressed::Dislike, ReactionState::Neutral) => (ReactionState::Disliked, 0, 1),
        (Pressed::Dislike, ReactionState::Liked) => (ReactionState::Disliked, -1, 1),
    }
}

type FlightKey = (String, String);

/// Reconciles like/dislike toggles against the remote store and the local
/// reaction record.
///
/// Per (article, user) pair at most one toggle is in flight; a second request
/// arriving meanwhile is dropped, which keeps rapid double-taps from issuing
/// duplicate remote mutations. The local record is written only after the
/// remote mutation succeeds; on failure it is left untouched and the live
/// subscription remains the source of truth.
pub struct ReactionSynchronizer {
    store: ArticleStore,
    cache: ReactionCache,
    in_flight: Mutex<HashSet<FlightKey>>,
}

impl ReactionSynchronizer {
    pub fn new(store: ArticleStore, cache: ReactionCache) -> Self {
        Self {
            store,
            cache,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn cache(&self) -> &ReactionCache {
        &self.cache
    }

    pub async fn toggle_like(&self, user_id: &str, article_id: &str) -> AppResult<ToggleOutcome> {
        self.toggle(user_id, article_id, Pressed::Like).await
    }

    pub async fn toggle_dislike(
        &self,
        user_id: &str,
        article_id: &str,
    ) -> AppResult<ToggleOutcome> {
        self.toggle(user_id, article_id, Pressed::Dislike).await
    }

    async fn toggle(
        &self,
        user_id: &str,
        article_id: &str,
        pressed: Pressed,
    ) -> AppResult<ToggleOutcome> {
        if user_id.is_empty() {
            return Err(AppError::Validation("reaction requires a signed-in user".into()));
        }

        let key: FlightKey = (article_id.to_string(), user_id.to_string());
        if !self.begin(&key) {
            debug!(article_id, user_id, "toggle dropped, another is in flight");
            return Ok(ToggleOutcome::Dropped);
        }

        let result = self.toggle_locked(user_id, article_id, pressed).await;
        self.finish(&key);
        result
    }

    async fn toggle_locked(
        &self,
        user_id: &str,
        article_id: &str,
        pressed: Pressed,
    ) -> AppResult<ToggleOutcome> {
        let current = self.cache.state_for(user_id, article_id).await;
        let (target, like_delta, dislike_delta) = transition(current, pressed);

        match self
            .store
            .apply_reaction(article_id, user_id, target, like_delta, dislike_delta)
            .await
        {
            Ok(()) => {
                if let Err(e) = self.cache.record(user_id, article_id, target).await {
                    // The remote document already holds the truth; the stale
                    // local record will be corrected on the next toggle read.
                    warn!(article_id, user_id, error = %e, "reaction record update failed");
                }
                Ok(ToggleOutcome::Applied(target))
            }
            Err(e) => {
                warn!(article_id, user_id, error = %e, "reaction toggle failed, local state unchanged");
                Err(e)
            }
        }
    }

    /// Marks the pair in flight. Returns false if it already was.
    fn begin(&self, key: &FlightKey) -> bool {
        let mut set = match self.in_flight.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.insert(key.clone())
    }

    fn finish(&self, key: &FlightKey) {
        let mut set = match self.in_flight.lock() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.remove(key);
    }
}
