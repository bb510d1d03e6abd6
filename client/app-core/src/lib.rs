//! Application wiring for the client core.
//!
//! Holds what the screens need but the lower layers must not know about: the
//! explicit viewer session, notification routing, configuration, logging setup
//! and the [`state::AppState`] composition root.

pub mod config;
pub mod logging;
pub mod models;
pub mod routing;
pub mod session;
pub mod state;

pub use config::Config;
pub use models::Notification;
pub use routing::{NotificationPayload, NotificationRoute};
pub use session::AuthSession;
pub use state::AppState;
