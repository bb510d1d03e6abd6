//! Client for the remote article collection.
//!
//! The hosted document database sits behind the [`backend::ArticleBackend`]
//! seam; [`store::ArticleStore`] turns reader intents (view, react, comment)
//! into atomic field mutations and exposes one-shot and live reads. Live
//! subscriptions push the full current state on every change and degrade to
//! empty/absent results on failure rather than raising.

pub mod backend;
pub mod models;
pub mod store;

pub use backend::{ArticleBackend, ChangeEvent, CounterField, FieldOp, MemberField, MemoryBackend};
pub use models::{
    Article, ArticleFilter, Comment, LocalizedText, PublicationStatus, ReactionState,
};
pub use store::{ArticleStore, CollectionSubscription, DocumentSubscription, SubscriptionGuard};
