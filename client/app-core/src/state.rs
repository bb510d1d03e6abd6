use std::sync::Arc;

use article_store::{Article, ArticleBackend, ArticleStore, Comment, LocalizedText};
use error_types::AppResult;
use kv_store::FileKvStore;
use reaction_sync::{ReactionCache, ReactionSynchronizer, ToggleOutcome};
use tracing::info;

use crate::config::Config;
use crate::session::AuthSession;

/// Composition root the screens consume.
///
/// Wires the device key-value store into the reaction cache and the document
/// backend into the article store and synchronizer. Session-aware wrappers
/// here are the only place ambient-looking state (the signed-in viewer) meets
/// the core; everything below takes the user id explicitly.
#[derive(Clone)]
pub struct AppState {
    store: ArticleStore,
    reactions: Arc<ReactionSynchronizer>,
    default_locale: String,
}

impl AppState {
    pub async fn init(config: &Config, backend: Arc<dyn ArticleBackend>) -> AppResult<Self> {
        let kv = FileKvStore::open(&config.kv_dir).await?;
        let cache = ReactionCache::new(Arc::new(kv));
        let store = ArticleStore::new(backend);
        let reactions = Arc::new(ReactionSynchronizer::new(store.clone(), cache));

        info!(kv_dir = %config.kv_dir.display(), "client core initialized");
        Ok(Self {
            store,
            reactions,
            default_locale: config.default_locale.clone(),
        })
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    /// Resolves per-locale text against the configured viewer locale.
    pub fn localize<'a>(&self, text: &'a LocalizedText) -> &'a str {
        text.resolve(&self.default_locale)
    }

    pub fn reactions(&self) -> &ReactionSynchronizer {
        &self.reactions
    }

    pub async fn toggle_like(
        &self,
        session: &AuthSession,
        article_id: &str,
    ) -> AppResult<ToggleOutcome> {
        let user_id = session.require_user()?;
        self.reactions.toggle_like(user_id, article_id).await
    }

    pub async fn toggle_dislike(
        &self,
        session: &AuthSession,
        article_id: &str,
    ) -> AppResult<ToggleOutcome> {
        let user_id = session.require_user()?;
        self.reactions.toggle_dislike(user_id, article_id).await
    }

    pub async fn add_comment(
        &self,
        session: &AuthSession,
        article_id: &str,
        text: &str,
    ) -> AppResult<Comment> {
        let user_id = session.require_user()?;
        self.store
            .add_comment(article_id, user_id, &session.display_name, text)
            .await
    }

    /// Articles the viewer has liked, for the favorites screen.
    pub async fn favorite_articles(&self, session: &AuthSession) -> AppResult<Vec<Article>> {
        let user_id = session.require_user()?;
        self.store.fetch_liked_by(user_id).await
    }
}
