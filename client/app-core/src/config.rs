use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

/// Client core configuration, read from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the on-device key-value store.
    pub kv_dir: PathBuf,
    /// Locale used when a document has no text for the viewer's locale.
    pub default_locale: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let kv_dir = env::var("APP_KV_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".hemma"));
        let default_locale =
            env::var("APP_DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string());

        Self {
            kv_dir,
            default_locale,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kv_dir: PathBuf::from(".hemma"),
            default_locale: "en".to_string(),
        }
    }
}
