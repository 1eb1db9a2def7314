//! Root-scoped resource ids
//!
//! An id is `{kindRoot}/{bucket}/{...folders}/{leaf}`. The first two segments
//! form the root: the entity kind plus either the owner's bucket or the shared
//! `public` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::{Config, RootConfig};
use crate::core::path::{encode_segment, join_path, parent_path, split_path, PATH_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    File,
    Conversation,
    Prompt,
    Application,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::File,
        FeatureKind::Conversation,
        FeatureKind::Prompt,
        FeatureKind::Application,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "file" | "files" => Some(FeatureKind::File),
            "conversation" | "conversations" | "chat" => Some(FeatureKind::Conversation),
            "prompt" | "prompts" => Some(FeatureKind::Prompt),
            "application" | "applications" | "app" => Some(FeatureKind::Application),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::File => "file",
            FeatureKind::Conversation => "conversation",
            FeatureKind::Prompt => "prompt",
            FeatureKind::Application => "application",
        };
        f.write_str(name)
    }
}

/// Ownership scope of an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Private { bucket: String },
    Public,
}

/// Result of renaming: the entity's content moves from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceIdBuilder {
    roots: RootConfig,
}

impl ResourceIdBuilder {
    pub fn new(roots: RootConfig) -> Self {
        Self { roots }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.roots.clone())
    }

    pub fn roots(&self) -> &RootConfig {
        &self.roots
    }

    pub fn kind_root(&self, kind: FeatureKind) -> &str {
        match kind {
            FeatureKind::File => &self.roots.files,
            FeatureKind::Conversation => &self.roots.conversations,
            FeatureKind::Prompt => &self.roots.prompts,
            FeatureKind::Application => &self.roots.applications,
        }
    }

    pub fn root_segment(&self, kind: FeatureKind, scope: &Scope) -> String {
        let bucket = match scope {
            Scope::Private { bucket } => bucket.as_str(),
            Scope::Public => self.roots.public_prefix.as_str(),
        };
        join_path([self.kind_root(kind), bucket])
    }

    /// `root/folder_path/encode(leaf_name)`; `folder_path` is taken as
    /// already encoded.
    pub fn build_id(&self, root: &str, folder_path: Option<&str>, leaf_name: Option<&str>) -> String {
        let leaf = leaf_name.map(encode_segment);
        join_path(
            [root]
                .into_iter()
                .chain(folder_path)
                .chain(leaf.as_deref()),
        )
    }

    pub fn build_entity_id(
        &self,
        kind: FeatureKind,
        scope: &Scope,
        folder_path: Option<&str>,
        leaf_name: &str,
    ) -> String {
        let root = self.root_segment(kind, scope);
        self.build_id(&root, folder_path, Some(leaf_name))
    }

    /// Drops the first `count` segments, e.g. to show a bucket-relative path.
    pub fn strip_root_segments(&self, id: &str, count: usize) -> String {
        join_path(id.split(PATH_SEPARATOR).skip(count))
    }

    pub fn is_under_folder(&self, id: &str, folder_id: &str) -> bool {
        id.strip_prefix(folder_id)
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }

    pub fn folder_of<'a>(&self, id: &'a str) -> Option<&'a str> {
        parent_path(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<FeatureKind> {
        let first = split_path(id).next()?;
        FeatureKind::ALL
            .into_iter()
            .find(|kind| self.kind_root(*kind) == first)
    }

    pub fn is_public(&self, id: &str) -> bool {
        split_path(id).nth(1) == Some(self.roots.public_prefix.as_str())
    }

    /// Plans the copy/delete pair for giving an entity a new leaf name.
    /// `None` when the id would not change.
    pub fn plan_rename(&self, old_id: &str, new_leaf_name: &str) -> Option<RenamePlan> {
        let folder = parent_path(old_id)?;
        let new_id = self.build_id(folder, None, Some(new_leaf_name));
        (new_id != old_id).then(|| RenamePlan {
            from: old_id.to_string(),
            to: new_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ResourceIdBuilder {
        ResourceIdBuilder::default()
    }

    #[test]
    fn build_and_folder_membership() {
        let b = builder();
        let id = b.build_id("files", Some("folderA"), Some("x.txt"));
        assert_eq!(id, "files/folderA/x.txt");
        assert!(b.is_under_folder(&id, "files/folderA"));
        assert!(!b.is_under_folder(&id, "files/folderB"));
        assert!(!b.is_under_folder("files/folderAB/x", "files/folderA"));
        assert!(!b.is_under_folder("files/folderA", "files/folderA"));
        assert!(b.is_under_folder("files/folderA/", "files/folderA"));
        assert!(b.is_under_folder(&id, b.folder_of(&id).unwrap()));
    }

    #[test]
    fn leaf_names_are_encoded() {
        let b = builder();
        let id = b.build_id("files/bucket", Some("docs"), Some("a/b c.txt"));
        assert_eq!(id, "files/bucket/docs/a%2Fb%20c.txt");
        assert_eq!(b.folder_of(&id), Some("files/bucket/docs"));
    }

    #[test]
    fn optional_parts_are_skipped() {
        let b = builder();
        assert_eq!(b.build_id("prompts/bucket", None, None), "prompts/bucket");
        assert_eq!(b.build_id("prompts/bucket", Some(""), Some("p")), "prompts/bucket/p");
    }

    #[test]
    fn building_is_stable() {
        let b = builder();
        let scope = Scope::Private {
            bucket: "b1".into(),
        };
        let first = b.build_entity_id(FeatureKind::Conversation, &scope, Some("work"), "gpt-4__Chat");
        let second = b.build_entity_id(FeatureKind::Conversation, &scope, Some("work"), "gpt-4__Chat");
        assert_eq!(first, second);
        assert_eq!(first, "conversations/b1/work/gpt-4__Chat");
    }

    #[test]
    fn roots_by_kind_and_scope() {
        let b = builder();
        assert_eq!(b.root_segment(FeatureKind::Prompt, &Scope::Public), "prompts/public");
        assert_eq!(
            b.root_segment(
                FeatureKind::Application,
                &Scope::Private {
                    bucket: "xyz".into()
                }
            ),
            "applications/xyz"
        );
        assert_eq!(b.kind_of("files/public/a"), Some(FeatureKind::File));
        assert_eq!(b.kind_of("unknown/x"), None);
        assert!(b.is_public("files/public/a"));
        assert!(!b.is_public("files/bucket/a"));
    }

    #[test]
    fn strips_root_segments() {
        let b = builder();
        assert_eq!(b.strip_root_segments("files/bucket/docs/a.txt", 2), "docs/a.txt");
        assert_eq!(b.strip_root_segments("files/bucket", 2), "");
        assert_eq!(b.strip_root_segments("files/bucket", 5), "");
        assert_eq!(b.strip_root_segments("a/b", 0), "a/b");
    }

    #[test]
    fn rename_plans() {
        let b = builder();
        let plan = b.plan_rename("prompts/b/folder/Old", "New name").unwrap();
        assert_eq!(plan.from, "prompts/b/folder/Old");
        assert_eq!(plan.to, "prompts/b/folder/New%20name");
        assert_eq!(b.plan_rename("prompts/b/folder/Same", "Same"), None);
        assert_eq!(b.plan_rename("orphan", "x"), None);
    }

    #[test]
    fn feature_kind_parsing() {
        assert_eq!(FeatureKind::parse("Files"), Some(FeatureKind::File));
        assert_eq!(FeatureKind::parse("chat"), Some(FeatureKind::Conversation));
        assert_eq!(FeatureKind::parse("nope"), None);
        assert_eq!(FeatureKind::Prompt.to_string(), "prompt");
    }
}
