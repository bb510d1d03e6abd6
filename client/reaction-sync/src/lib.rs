//! Like/dislike toggle synchronization.
//!
//! [`ReactionSynchronizer`] reconciles user toggles against the remote article
//! store and the on-device [`ReactionCache`], keeping both consistent under
//! rapid repeated taps from the same user on one device. The remote document
//! stays authoritative throughout; the local record only pre-renders button
//! state until the live subscription catches up.

mod cache;
mod sync;

pub use cache::ReactionCache;
pub use sync::{ReactionSynchronizer, ToggleOutcome};
