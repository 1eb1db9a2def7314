//! Publication version groups
//!
//! Every publish event produces a new id for the same logical entity. Ids are
//! grouped by stripping their version token, and each group tracks which
//! revision is selected and whether the entity has been unpublished.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use crate::core::config::{Config, KeyConfig, RootConfig, VersionConfig};
use crate::core::error::AddressError;
use crate::core::path::{join_path, PATH_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PublicationAction {
    Add,
    Delete,
}

/// A published entity as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedResource {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub action: Option<PublicationAction>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl VersionedResource {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
            action: None,
            published_at: None,
        }
    }

    pub fn with_action(mut self, action: PublicationAction) -> Self {
        self.action = Some(action);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupState {
    Active,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionGroup {
    pub all_versions: Vec<VersionEntry>,
    pub selected_version: VersionEntry,
    pub state: GroupState,
    /// Latest DELETE entry; the only entry shown once the group is deleted.
    pub terminal: Option<VersionEntry>,
}

impl VersionGroup {
    fn new(first: VersionEntry) -> Self {
        Self {
            all_versions: Vec::new(),
            selected_version: first,
            state: GroupState::Active,
            terminal: None,
        }
    }

    fn append(&mut self, entry: VersionEntry, action: Option<PublicationAction>) {
        // A repeated id keeps its first entry so selections always point at a member.
        let stored = match self.all_versions.iter().find(|e| e.id == entry.id) {
            Some(existing) => existing.clone(),
            None => {
                self.all_versions.push(entry.clone());
                entry
            }
        };
        // One-way latch: a later ADD never reactivates the group.
        if action == Some(PublicationAction::Delete) {
            self.state = GroupState::Deleted;
            self.selected_version = stored.clone();
            self.terminal = Some(stored);
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.state == GroupState::Deleted
    }

    /// Versions offered for navigation.
    ///
    /// A deleted group shows only its terminal entry. With `group_versions`,
    /// entries whose display versions match (`1.0` and `v1.0`) collapse to the
    /// first one.
    pub fn display_versions(&self, group_versions: bool) -> Vec<&VersionEntry> {
        if let Some(terminal) = self.terminal.as_ref().filter(|_| self.is_deleted()) {
            return vec![terminal];
        }
        if !group_versions {
            return self.all_versions.iter().collect();
        }
        let mut seen = HashSet::new();
        self.all_versions
            .iter()
            .filter(|entry| seen.insert(display_version(&entry.version)))
            .collect()
    }
}

fn display_version(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed)
}

/// Groups keyed by version-agnostic id, plus the records that were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionGroups {
    pub groups: BTreeMap<String, VersionGroup>,
    pub warnings: Vec<AddressError>,
}

impl VersionGroups {
    pub fn get(&self, group_id: &str) -> Option<&VersionGroup> {
        self.groups.get(group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Point a group at another of its versions.
    pub fn select(&mut self, group_id: &str, id: &str) -> Result<(), AddressError> {
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or_else(|| AddressError::integrity(group_id, "unknown version group"))?;
        if group.is_deleted() {
            return Err(AddressError::integrity(
                group_id,
                "version group is deleted",
            ));
        }
        let entry = group
            .all_versions
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| AddressError::integrity(id, "not a member of the version group"))?;
        group.selected_version = entry;
        Ok(())
    }

    /// Apply the versions the caller currently has open, keyed by group id.
    pub fn with_selection(mut self, selections: &HashMap<String, String>) -> Self {
        for (group_id, id) in selections {
            if let Err(err) = self.select(group_id, id) {
                debug!(group_id = %group_id, id = %id, "Ignoring selection: {err}");
            }
        }
        self
    }
}

/// Stable sort putting the most recently published resources first; resources
/// without a timestamp go last.
pub fn sort_by_recency(resources: &mut [VersionedResource]) {
    resources.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

#[derive(Debug, Clone, Default)]
pub struct VersionGroupResolver {
    keys: KeyConfig,
    versions: VersionConfig,
    roots: RootConfig,
}

impl VersionGroupResolver {
    pub fn new(keys: KeyConfig, versions: VersionConfig, roots: RootConfig) -> Self {
        Self {
            keys,
            versions,
            roots,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.keys.clone(),
            config.versions.clone(),
            config.roots.clone(),
        )
    }

    fn effective_version<'a>(&self, version: Option<&'a str>) -> Option<&'a str> {
        version
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != self.versions.na_version)
    }

    /// `leaf` is a revision token naming `version`: `v1` and `v1.0` both
    /// name `1.0.0`, `v2` does not.
    fn is_revision_token(&self, leaf: &str, version: &str) -> bool {
        let Some(rest) = leaf.strip_prefix(self.versions.revision_prefix.as_str()) else {
            return false;
        };
        if !rest.starts_with(|c: char| c.is_ascii_digit())
            || !rest.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return false;
        }
        let version = display_version(version);
        version == rest
            || version
                .strip_prefix(rest)
                .is_some_and(|tail| tail.starts_with('.'))
    }

    /// Version-agnostic id of a published resource.
    pub fn strip_version_token(&self, id: &str, version: Option<&str>) -> Result<String, AddressError> {
        if id.is_empty() {
            return Err(AddressError::integrity(id, "empty id"));
        }
        if id.starts_with(PATH_SEPARATOR)
            || id.ends_with(PATH_SEPARATOR)
            || id.split(PATH_SEPARATOR).any(str::is_empty)
        {
            return Err(AddressError::integrity(id, "id contains an empty segment"));
        }

        let Some(version) = self.effective_version(version) else {
            return Ok(id.to_string());
        };

        let (folder, leaf) = match id.rsplit_once(PATH_SEPARATOR) {
            Some((folder, leaf)) => (Some(folder), leaf),
            None => (None, id),
        };

        let suffix = format!("{}{}", self.keys.separator, version);
        if let Some(stripped) = leaf.strip_suffix(suffix.as_str()) {
            if stripped.is_empty() {
                return Err(AddressError::integrity(id, "leaf holds only a version token"));
            }
            return Ok(join_path(folder.into_iter().chain([stripped])));
        }

        if leaf == version || self.is_revision_token(leaf, version) {
            return folder
                .map(str::to_string)
                .ok_or_else(|| AddressError::integrity(id, "nothing left after removing version"));
        }

        Ok(id.to_string())
    }

    /// Rebuild version groups from a flat list of published resources.
    ///
    /// Input order is kept inside each group; callers wanting "latest first"
    /// sort with [`sort_by_recency`] beforehand.
    pub fn resolve(&self, resources: &[VersionedResource]) -> VersionGroups {
        let mut result = VersionGroups::default();

        for resource in resources {
            let group_id = match self.strip_version_token(&resource.id, resource.version.as_deref()) {
                Ok(group_id) => group_id,
                Err(err) => {
                    warn!(id = %resource.id, "Skipping resource: {err}");
                    result.warnings.push(err);
                    continue;
                }
            };

            let entry = VersionEntry {
                version: self
                    .effective_version(resource.version.as_deref())
                    .unwrap_or(self.versions.na_version.as_str())
                    .to_string(),
                id: resource.id.clone(),
            };

            result
                .groups
                .entry(group_id)
                .or_insert_with(|| VersionGroup::new(entry.clone()))
                .append(entry, resource.action);
        }

        debug!(
            groups = result.groups.len(),
            skipped = result.warnings.len(),
            "Resolved version groups"
        );
        result
    }

    /// Group id for an entity that is still under review.
    ///
    /// The entity's id is rebuilt under the public prefix of its kind root,
    /// inside the publication's target folder unless the action is a delete,
    /// then stripped of its version token.
    pub fn review_group_id(
        &self,
        entity_id: &str,
        version: Option<&str>,
        target_folder: Option<&str>,
        action: Option<PublicationAction>,
    ) -> Result<String, AddressError> {
        let mut segments = entity_id.split(PATH_SEPARATOR);
        let kind_root = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AddressError::integrity(entity_id, "id has no root segment"))?;
        let rest = segments.skip(1);

        let target = match (target_folder, action) {
            (Some(folder), Some(PublicationAction::Add) | None) => Some(folder),
            _ => None,
        };
        let target_segments = target
            .into_iter()
            .flat_map(|folder| folder.split(PATH_SEPARATOR).skip(1));

        let public_id = join_path(
            [kind_root, self.roots.public_prefix.as_str()]
                .into_iter()
                .chain(target_segments)
                .chain(rest),
        );
        self.strip_version_token(&public_id, version)
    }
}

/// [`VersionGroupResolver::resolve`] with the default lookup tables.
pub fn resolve_version_groups(resources: &[VersionedResource]) -> VersionGroups {
    VersionGroupResolver::default().resolve(resources)
}
