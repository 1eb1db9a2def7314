//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod inspect;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};

use crate::cli::inspect::{print_projection, print_version_groups};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::entity_key::{ConversationKeySource, EntityKeyCodec};
use crate::core::path::{decode_segment, encode_segment};
use crate::core::resource_id::{FeatureKind, ResourceIdBuilder, Scope};
use crate::utils::logging;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "keyway")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Storage ids, entity keys and publication version groups for chat entities")]
#[command(
    long_about = "Keyway derives the storage ids used for conversations, prompts, files and \
applications, and groups published revisions of the same entity.\n\n\
Environment Variables:\n\
  KEYWAY_LOG        Log filter directive (e.g. 'debug'); overrides -v\n\n\
Examples:\n\
  keyway key build --model gpt-4 \"My chat\"\n\
  keyway id conversations --bucket b1 --folder work \"gpt-4__My chat\"\n\
  keyway versions published.json --group-versions\n\
  keyway project review.json\n\
  keyway config set-bucket b1"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Use an alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CodecOp {
    /// Encode a value
    Encode { value: String },
    /// Decode a previously encoded value
    Decode { value: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum KeyCommands {
    /// Build an entity key from a model id and a name
    Build {
        /// Model id; omit for entities not tied to a model
        #[arg(short = 'm', long)]
        model: Option<String>,
        /// Store as a replay session
        #[arg(long)]
        replay: bool,
        /// Store as a playback session
        #[arg(long)]
        playback: bool,
        name: String,
    },
    /// Split an entity key into model id and name
    Parse { key: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Encode or decode a single path segment
    Segment {
        #[command(subcommand)]
        op: CodecOp,
    },
    /// Encode or decode a model id for use inside an entity key
    Model {
        #[command(subcommand)]
        op: CodecOp,
    },
    /// Build or parse entity keys
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
    /// Build a resource id
    Id {
        /// Entity kind: files, conversations, prompts or applications
        kind: String,
        /// Owner bucket (defaults to the configured default-bucket)
        #[arg(long, conflicts_with = "public")]
        bucket: Option<String>,
        /// Address the shared namespace instead of a bucket
        #[arg(long)]
        public: bool,
        /// Encoded folder path below the root
        #[arg(long)]
        folder: Option<String>,
        /// Leaf name (encoded into the id)
        name: Option<String>,
    },
    /// Resolve version groups from a JSON array of published resources
    Versions {
        /// JSON file, or '-' for stdin
        file: PathBuf,
        /// Collapse versions with the same display label
        #[arg(long)]
        group_versions: bool,
        /// Select a version: GROUP_ID=ID (repeatable)
        #[arg(long = "select", value_name = "GROUP_ID=ID")]
        selections: Vec<String>,
    },
    /// Project pending publication resources onto a folder tree
    Project {
        /// JSON file with folders, resources and leaves, or '-' for stdin
        file: PathBuf,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
        /// Print only the configuration file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set the bucket used when `id` gets no --bucket
    SetBucket { bucket: String },
    /// Clear the default bucket
    UnsetBucket,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(Config::get_config_path()?),
    }
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = resolve_config_path(args.config)?;
    let config = Config::load_from_path(&config_path)?;

    match args.command {
        Commands::Config {
            action: Some(action),
            ..
        } => {
            println!("{}", update_config(config, &config_path, action)?);
            Ok(())
        }
        Commands::Config { action: None, path } => {
            if path {
                println!("{}", path_display(&config_path));
            } else {
                config.print_all();
            }
            Ok(())
        }
        command => {
            let output = execute(&config, command)?;
            println!("{output}");
            Ok(())
        }
    }
}

/// Apply a config change and write it back to `config_path`.
pub fn update_config(
    mut config: Config,
    config_path: &Path,
    action: ConfigCommands,
) -> Result<String, Box<dyn Error>> {
    let message = match action {
        ConfigCommands::SetBucket { bucket } => {
            config.set_default_bucket(Some(bucket));
            match config.default_bucket.as_deref() {
                Some(bucket) => format!("✅ Set default-bucket to: {bucket}"),
                None => return Err("Bucket name cannot be empty".into()),
            }
        }
        ConfigCommands::UnsetBucket => {
            config.set_default_bucket(None);
            "✅ Unset default-bucket".to_string()
        }
    };
    config.save_to_path(config_path)?;
    Ok(message)
}

/// Run a command against `config`, returning what would be printed.
pub fn execute(config: &Config, command: Commands) -> Result<String, Box<dyn Error>> {
    let codec = EntityKeyCodec::from_config(config);

    match command {
        Commands::Segment { op } => match op {
            CodecOp::Encode { value } => Ok(encode_segment(&value)),
            CodecOp::Decode { value } => Ok(decode_segment(&value)?),
        },
        Commands::Model { op } => match op {
            CodecOp::Encode { value } => Ok(codec.encode_model_id(&value)),
            CodecOp::Decode { value } => Ok(codec.decode_model_id(&value)?),
        },
        Commands::Key { command } => match command {
            KeyCommands::Build {
                model,
                replay,
                playback,
                name,
            } => {
                let source = ConversationKeySource {
                    name,
                    model_id: model.unwrap_or_else(|| config.keys.empty_model_id.clone()),
                    is_replay: Some(replay),
                    is_playback: Some(playback),
                };
                Ok(codec.conversation_key(&source))
            }
            KeyCommands::Parse { key } => {
                let parsed = codec.parse_entity_key(&key)?;
                Ok(serde_json::to_string_pretty(&parsed)?)
            }
        },
        Commands::Id {
            kind,
            bucket,
            public,
            folder,
            name,
        } => {
            let kind = FeatureKind::parse(&kind).ok_or_else(|| {
                format!("Unknown entity kind: {kind}. Use files, conversations, prompts or applications.")
            })?;
            let builder = ResourceIdBuilder::from_config(config);
            let scope = if public {
                Scope::Public
            } else {
                Scope::Private {
                    bucket: bucket.unwrap_or_else(|| config.bucket_or("").to_string()),
                }
            };
            let root = builder.root_segment(kind, &scope);
            Ok(builder.build_id(&root, folder.as_deref(), name.as_deref()))
        }
        Commands::Versions {
            file,
            group_versions,
            selections,
        } => print_version_groups(config, &file, group_versions, &selections),
        Commands::Project { file } => print_projection(&file),
        Commands::Config { .. } => Ok(toml::to_string_pretty(config)?),
    }
}

#[cfg(test)]
mod tests;
