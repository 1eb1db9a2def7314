use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Separators and sentinel ids used by entity keys.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct KeyConfig {
    /// Boundary between the encoded model id and the display name.
    pub separator: String,
    /// Replacement for `separator` inside an encoded model id.
    pub encoded_separator: String,
    /// Model id of entities not tied to a model; such keys are the bare name.
    pub empty_model_id: String,
    pub replay_model_id: String,
    pub playback_model_id: String,
}

/// Root segments per entity kind.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RootConfig {
    pub files: String,
    pub conversations: String,
    pub prompts: String,
    pub applications: String,
    /// Bucket segment of the shared namespace (e.g. `prompts/public/...`)
    pub public_prefix: String,
}

/// Rules for recognizing version tokens in published ids.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct VersionConfig {
    /// Placeholder version of entities published without one
    pub na_version: String,
    /// Prefix of revision leaf segments such as `v2` or `v1.0.3`
    pub revision_prefix: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub roots: RootConfig,
    #[serde(default)]
    pub versions: VersionConfig,
    /// Bucket used for private ids when the CLI is not given one
    pub default_bucket: Option<String>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/keyway/config.toml` → `~/.config/keyway/config.toml`
/// - Windows: `C:\\Users\\user\\AppData\\Roaming\\keyway` → unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
