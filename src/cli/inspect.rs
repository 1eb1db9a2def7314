//! `versions` and `project` commands: read JSON snapshots, print JSON views.

use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::error::AddressError;
use crate::core::projection::{
    project_publication_resources, FolderNode, LeafEntity, PublicationResource,
};
use crate::core::versions::{GroupState, VersionEntry, VersionGroupResolver, VersionedResource};

/// Input of the `project` command.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectionInput {
    pub folders: Vec<FolderNode>,
    pub resources: Vec<PublicationResource>,
    pub leaves: Vec<LeafEntity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupView<'a> {
    all_versions: &'a [VersionEntry],
    selected_version: &'a VersionEntry,
    state: GroupState,
    display_versions: Vec<&'a VersionEntry>,
}

fn read_input(path: &Path) -> Result<String, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path_display(path)).into())
}

fn report_warnings(warnings: &[AddressError]) {
    for warning in warnings {
        eprintln!("⚠️  {warning}");
    }
}

/// Parse `GROUP_ID=ID` selection arguments.
pub fn parse_selections(raw: &[String]) -> Result<HashMap<String, String>, Box<dyn Error>> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .filter(|(group, id)| !group.is_empty() && !id.is_empty())
                .map(|(group, id)| (group.to_string(), id.to_string()))
                .ok_or_else(|| -> Box<dyn Error> {
                    format!("Invalid selection '{item}'. Expected GROUP_ID=ID.").into()
                })
        })
        .collect()
}

pub fn render_version_groups(
    config: &Config,
    input: &str,
    group_versions: bool,
    selections: &[String],
) -> Result<String, Box<dyn Error>> {
    let resources: Vec<VersionedResource> = serde_json::from_str(input)?;
    let selections = parse_selections(selections)?;
    let groups = VersionGroupResolver::from_config(config)
        .resolve(&resources)
        .with_selection(&selections);
    report_warnings(&groups.warnings);

    let view: BTreeMap<&str, GroupView<'_>> = groups
        .groups
        .iter()
        .map(|(group_id, group)| {
            (
                group_id.as_str(),
                GroupView {
                    all_versions: &group.all_versions,
                    selected_version: &group.selected_version,
                    state: group.state,
                    display_versions: group.display_versions(group_versions),
                },
            )
        })
        .collect();
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn print_version_groups(
    config: &Config,
    file: &Path,
    group_versions: bool,
    selections: &[String],
) -> Result<String, Box<dyn Error>> {
    let input = read_input(file)?;
    render_version_groups(config, &input, group_versions, selections)
}

pub fn render_projection(input: &str) -> Result<String, Box<dyn Error>> {
    let input: ProjectionInput = serde_json::from_str(input)?;
    let projection = project_publication_resources(&input.folders, &input.resources, &input.leaves);
    report_warnings(&projection.warnings);
    Ok(serde_json::to_string_pretty(&projection)?)
}

pub fn print_projection(file: &Path) -> Result<String, Box<dyn Error>> {
    let input = read_input(file)?;
    render_projection(&input)
}
