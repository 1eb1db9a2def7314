//! Entity keys: `{encodedModelId}__{name}`
//!
//! The leaf segment of a conversation id pairs the model the conversation was
//! started with and its display name. Keys written before model prefixes
//! existed are the bare name and parse back with the empty model id.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::{Config, KeyConfig};
use crate::core::error::AddressError;
use crate::core::path::decode_segment;

/// A key split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntityKey {
    pub model_id: String,
    pub name: String,
    pub is_replay: bool,
    pub is_playback: bool,
}

/// What a conversation key is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationKeySource {
    pub name: String,
    pub model_id: String,
    #[serde(default)]
    pub is_replay: Option<bool>,
    #[serde(default)]
    pub is_playback: Option<bool>,
}

/// Builds and parses entity keys with an injected separator table.
#[derive(Debug, Clone, Default)]
pub struct EntityKeyCodec {
    config: KeyConfig,
}

impl EntityKeyCodec {
    pub fn new(config: KeyConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.keys.clone())
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    /// Encode a model id so that no character of the key separator survives
    /// unescaped; with the default `__` this escapes every `_`.
    pub fn encode_model_id(&self, model_id: &str) -> String {
        model_id
            .split(self.config.separator.as_str())
            .map(|part| self.escape_separator_chars(&urlencoding::encode(part)))
            .collect::<Vec<_>>()
            .join(&self.config.encoded_separator)
    }

    fn escape_separator_chars(&self, encoded: &str) -> String {
        let separator = self.config.separator.as_str();
        encoded
            .chars()
            .map(|c| {
                if c.is_ascii() && c != '%' && separator.contains(c) {
                    format!("%{:02X}", c as u32)
                } else {
                    c.to_string()
                }
            })
            .collect()
    }

    pub fn decode_model_id(&self, encoded: &str) -> Result<String, AddressError> {
        let parts = encoded
            .split(self.config.encoded_separator.as_str())
            .map(decode_segment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(&self.config.separator))
    }

    /// Join parts with the key separator.
    pub fn combine_key<I, S>(&self, parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parts
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&self.config.separator)
    }

    pub fn build_entity_key(&self, model_id: &str, name: &str) -> String {
        if model_id == self.config.empty_model_id {
            if let Some(ambiguity) = self.key_ambiguity(model_id, name) {
                warn!(name = %name, "{ambiguity}");
            }
            return name.to_string();
        }
        self.combine_key([self.encode_model_id(model_id).as_str(), name])
    }

    /// Reports when a key built from these inputs would not parse back to
    /// them. Only bare-name keys can be misread: a model-prefixed key always
    /// splits at the end of the encoded model id.
    pub fn key_ambiguity(&self, model_id: &str, name: &str) -> Option<AddressError> {
        (model_id == self.config.empty_model_id && name.contains(self.config.separator.as_str()))
            .then(|| AddressError::AmbiguousEntityKey {
                name: name.to_string(),
                separator: self.config.separator.clone(),
            })
    }

    pub fn parse_entity_key(&self, key: &str) -> Result<ParsedEntityKey, AddressError> {
        let (model_id, name) = match key.split_once(self.config.separator.as_str()) {
            None => (self.config.empty_model_id.clone(), key.to_string()),
            Some((encoded_model, name)) => {
                (self.decode_model_id(encoded_model)?, name.to_string())
            }
        };

        Ok(ParsedEntityKey {
            is_replay: model_id == self.config.replay_model_id,
            is_playback: model_id == self.config.playback_model_id,
            model_id,
            name,
        })
    }

    /// Key of a conversation; replay and playback sessions are stored under
    /// their pseudo model ids instead of the model they were recorded with.
    pub fn conversation_key(&self, source: &ConversationKeySource) -> String {
        if source.model_id == self.config.empty_model_id {
            return self.build_entity_key(&source.model_id, &source.name);
        }
        let model_id = if source.is_replay.unwrap_or(false) {
            &self.config.replay_model_id
        } else if source.is_playback.unwrap_or(false) {
            &self.config.playback_model_id
        } else {
            &source.model_id
        };
        self.build_entity_key(model_id, &source.name)
    }

    pub fn prompt_key(&self, name: &str) -> String {
        name.to_string()
    }

    pub fn application_key(&self, name: &str, version: Option<&str>) -> String {
        match version.filter(|v| !v.is_empty()) {
            Some(version) => self.combine_key([name, version]),
            None => name.to_string(),
        }
    }
}
