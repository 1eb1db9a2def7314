//! Keyway derives storage ids for chat entities and groups their published
//! revisions.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core::path`] encodes and joins `/`-delimited path segments.
//! - [`core::entity_key`] builds and parses `{model}__{name}` leaf keys for
//!   conversations, prompts and applications.
//! - [`core::resource_id`] composes root-scoped ids from an entity kind, an
//!   ownership scope, a folder path and a leaf name.
//! - [`core::versions`] rebuilds publication version groups from flat
//!   resource lists.
//! - [`core::projection`] decides which folders and entities a publication
//!   review shows.
//! - [`core::config`] holds the separator and root tables the codecs are
//!   built from.
//!
//! Everything in [`core`] is pure and synchronous: inputs are borrowed
//! snapshots and results are recomputed on every call. The binary crate
//! (`src/main.rs`) routes through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod utils;
