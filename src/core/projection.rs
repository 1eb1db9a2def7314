//! Review-session view of pending publication changes
//!
//! A reviewer sees only the entities a publication touches, nested inside
//! every folder needed to reach them. The projection is computed from
//! borrowed snapshots and never modifies them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::error::AddressError;
use crate::core::path::{decode_segment, leaf_segment, parent_path};
use crate::core::versions::PublicationAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FolderStatus {
    Loaded,
    Loading,
    Failed,
    #[default]
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    /// Parent folder id; a value that is not a known folder marks the root.
    pub folder_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: FolderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationInfo {
    pub action: PublicationAction,
    #[serde(default)]
    pub version: Option<String>,
}

/// A file, conversation, prompt or application shown as a tree leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafEntity {
    pub id: String,
    pub folder_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publication_info: Option<PublicationInfo>,
}

/// One pending change to the public namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResource {
    pub review_url: String,
    #[serde(default)]
    pub target_url: String,
    pub action: PublicationAction,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub root_folders: Vec<FolderNode>,
    pub folders_to_display: Vec<FolderNode>,
    /// Every entity touched by the publication.
    pub items_to_display: Vec<LeafEntity>,
    /// Touched entities nested inside a displayed folder.
    pub folder_items_to_display: Vec<LeafEntity>,
    /// Touched entities whose parent is not a displayed folder.
    pub root_items: Vec<LeafEntity>,
    #[serde(skip)]
    pub warnings: Vec<AddressError>,
}

impl Projection {
    /// Displayed folders and entities directly under `folder_id`.
    pub fn children_of(&self, folder_id: &str) -> (Vec<&FolderNode>, Vec<&LeafEntity>) {
        let folders = self
            .folders_to_display
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .collect();
        let items = self
            .folder_items_to_display
            .iter()
            .filter(|i| i.folder_id == folder_id)
            .collect();
        (folders, items)
    }
}

fn materialize(resource: &PublicationResource) -> Result<LeafEntity, AddressError> {
    let id = resource.review_url.as_str();
    let name = decode_segment(leaf_segment(id))?;
    Ok(LeafEntity {
        id: id.to_string(),
        folder_id: parent_path(id).unwrap_or_default().to_string(),
        name,
        publication_info: Some(PublicationInfo {
            action: resource.action,
            version: resource.version.clone(),
        }),
    })
}

/// Build the review view for `resources` over the known folder tree and
/// entity list.
pub fn project_publication_resources(
    folders: &[FolderNode],
    resources: &[PublicationResource],
    leaves: &[LeafEntity],
) -> Projection {
    let index: HashMap<&str, &FolderNode> =
        folders.iter().map(|f| (f.id.as_str(), f)).collect();
    let affected: HashSet<&str> = resources.iter().map(|r| r.review_url.as_str()).collect();
    let mut warnings = Vec::new();

    let mut seen_leaves = HashSet::new();
    let mut items: Vec<LeafEntity> = leaves
        .iter()
        .filter(|leaf| affected.contains(leaf.id.as_str()) && seen_leaves.insert(leaf.id.as_str()))
        .cloned()
        .collect();

    for resource in resources {
        if !seen_leaves.insert(resource.review_url.as_str()) {
            continue;
        }
        match resource.action {
            PublicationAction::Add => match materialize(resource) {
                Ok(leaf) => items.push(leaf),
                Err(err) => {
                    debug!(review_url = %resource.review_url, "Skipping resource: {err}");
                    warnings.push(AddressError::integrity(
                        &resource.review_url,
                        err.to_string(),
                    ));
                }
            },
            PublicationAction::Delete => {
                debug!(review_url = %resource.review_url, "Delete targets no known entity");
            }
        }
    }

    let mut included: HashSet<&str> = HashSet::new();
    let mut cyclic: HashSet<&str> = HashSet::new();
    for item in &items {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = item.folder_id.as_str();
        while let Some(folder) = index.get(current) {
            let id = folder.id.as_str();
            if let Some(start) = chain.iter().position(|visited| *visited == id) {
                // Only the loop itself is cut; folders leading into it stay.
                if cyclic.insert(id) {
                    warnings.push(AddressError::integrity(id, "folder chain forms a cycle"));
                }
                cyclic.extend(chain[start..].iter().copied());
                break;
            }
            chain.push(id);
            included.insert(id);
            current = folder.folder_id.as_str();
        }
    }

    let mut seen_folders = HashSet::new();
    let folders_to_display: Vec<FolderNode> = folders
        .iter()
        .filter(|f| {
            let id = f.id.as_str();
            included.contains(id) && !cyclic.contains(id) && seen_folders.insert(id)
        })
        .cloned()
        .collect();
    let displayed: HashSet<&str> = folders_to_display.iter().map(|f| f.id.as_str()).collect();
    let is_root = |parent: &str| !displayed.contains(parent);

    let root_folders = folders_to_display
        .iter()
        .filter(|f| is_root(f.folder_id.as_str()))
        .cloned()
        .collect();
    let folder_items_to_display = items
        .iter()
        .filter(|i| displayed.contains(i.folder_id.as_str()))
        .cloned()
        .collect();
    let root_items = items
        .iter()
        .filter(|i| is_root(i.folder_id.as_str()))
        .cloned()
        .collect();

    Projection {
        root_folders,
        folders_to_display,
        items_to_display: items,
        folder_items_to_display,
        root_items,
        warnings,
    }
}
