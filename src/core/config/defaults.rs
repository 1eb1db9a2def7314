use crate::core::config::data::{Config, KeyConfig, RootConfig, VersionConfig};

pub const KEY_SEPARATOR: &str = "__";
pub const ENCODED_KEY_SEPARATOR: &str = "%5F%5F";
pub const EMPTY_MODEL_ID: &str = "empty";
pub const REPLAY_MODEL_ID: &str = "replay";
pub const PLAYBACK_MODEL_ID: &str = "playback";
pub const PUBLIC_URL_PREFIX: &str = "public";
pub const NA_VERSION: &str = "N/A";

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            separator: KEY_SEPARATOR.to_string(),
            encoded_separator: ENCODED_KEY_SEPARATOR.to_string(),
            empty_model_id: EMPTY_MODEL_ID.to_string(),
            replay_model_id: REPLAY_MODEL_ID.to_string(),
            playback_model_id: PLAYBACK_MODEL_ID.to_string(),
        }
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            files: "files".to_string(),
            conversations: "conversations".to_string(),
            prompts: "prompts".to_string(),
            applications: "applications".to_string(),
            public_prefix: PUBLIC_URL_PREFIX.to_string(),
        }
    }
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            na_version: NA_VERSION.to_string(),
            revision_prefix: "v".to_string(),
        }
    }
}

impl Config {
    /// Bucket used for private ids, falling back to `default`.
    pub fn bucket_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.default_bucket
            .as_deref()
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or(default)
    }

    pub fn set_default_bucket(&mut self, bucket: Option<String>) {
        self.default_bucket = bucket.filter(|b| !b.trim().is_empty());
    }
}
