use super::inspect::{parse_selections, render_projection, render_version_groups};
use super::*;
use serde_json::Value;
use tempfile::TempDir;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn exec(argv: &[&str]) -> String {
        let args = parse_args(argv);
        execute(&Config::default(), args.command)
            .unwrap_or_else(|err| panic!("argv={argv:?} should execute: {err}"))
    }
}

use test_helpers::{exec, parse_args};

#[test]
fn global_flags_parse_anywhere() {
    let args = parse_args(&["keyway", "-vv", "segment", "encode", "a b", "--config", "/tmp/x.toml"]);
    assert_eq!(args.verbose, 2);
    assert_eq!(args.config, Some(PathBuf::from("/tmp/x.toml")));
    assert_eq!(
        args.command,
        Commands::Segment {
            op: CodecOp::Encode {
                value: "a b".to_string()
            }
        }
    );
}

#[test]
fn bucket_and_public_conflict() {
    assert!(Args::try_parse_from(["keyway", "id", "files", "--bucket", "b", "--public"]).is_err());
}

#[test]
fn segment_and_model_codecs() {
    assert_eq!(exec(&["keyway", "segment", "encode", "a/b c"]), "a%2Fb%20c");
    assert_eq!(exec(&["keyway", "segment", "decode", "a%2Fb%20c"]), "a/b c");
    assert_eq!(exec(&["keyway", "model", "encode", "a__b"]), "a%5F%5Fb");
    assert_eq!(exec(&["keyway", "model", "decode", "a%5F%5Fb"]), "a__b");

    let args = parse_args(&["keyway", "segment", "decode", "%zz"]);
    let err = execute(&Config::default(), args.command).expect_err("decode should fail");
    assert!(err.to_string().contains("Malformed path segment"));
}

#[test]
fn key_build_and_parse() {
    assert_eq!(exec(&["keyway", "key", "build", "My Chat"]), "My Chat");
    assert_eq!(
        exec(&["keyway", "key", "build", "-m", "gpt-4", "My Chat"]),
        "gpt-4__My Chat"
    );
    assert_eq!(
        exec(&["keyway", "key", "build", "-m", "gpt-4", "--replay", "My Chat"]),
        "replay__My Chat"
    );

    let parsed: Value =
        serde_json::from_str(&exec(&["keyway", "key", "parse", "playback__Demo"])).unwrap();
    assert_eq!(parsed["model_id"], "playback");
    assert_eq!(parsed["name"], "Demo");
    assert_eq!(parsed["is_playback"], true);
    assert_eq!(parsed["is_replay"], false);
}

#[test]
fn id_command_uses_scope() {
    assert_eq!(
        exec(&["keyway", "id", "files", "--folder", "folderA", "x.txt"]),
        "files/folderA/x.txt"
    );
    assert_eq!(
        exec(&["keyway", "id", "prompts", "--public", "--folder", "team", "Summary"]),
        "prompts/public/team/Summary"
    );
    assert_eq!(
        exec(&["keyway", "id", "conversations", "--bucket", "b1", "gpt-4__My chat"]),
        "conversations/b1/gpt-4__My%20chat"
    );

    let config = Config {
        default_bucket: Some("home".to_string()),
        ..Default::default()
    };
    let args = parse_args(&["keyway", "id", "app", "Echo__1.0"]);
    assert_eq!(
        execute(&config, args.command).unwrap(),
        "applications/home/Echo__1.0"
    );

    let args = parse_args(&["keyway", "id", "widgets", "x"]);
    let err = execute(&Config::default(), args.command).expect_err("unknown kind");
    assert!(err.to_string().contains("Unknown entity kind"));
}

#[test]
fn versions_render_groups() {
    let input = r#"[
        {"id": "prompts/public/Summary__1.0", "version": "1.0"},
        {"id": "prompts/public/Summary__v1.0", "version": "v1.0"},
        {"id": "prompts/public/Summary__2.0", "version": "2.0"},
        {"id": "prompts/public//broken", "version": "1.0"},
        {"id": "files/public/old.txt", "version": "1.0", "action": "DELETE"}
    ]"#;
    let out = render_version_groups(
        &Config::default(),
        input,
        true,
        &["prompts/public/Summary=prompts/public/Summary__2.0".to_string()],
    )
    .unwrap();
    let view: Value = serde_json::from_str(&out).unwrap();

    let summary = &view["prompts/public/Summary"];
    assert_eq!(summary["allVersions"].as_array().unwrap().len(), 3);
    assert_eq!(summary["displayVersions"].as_array().unwrap().len(), 2);
    assert_eq!(summary["selectedVersion"]["version"], "2.0");
    assert_eq!(summary["state"], "ACTIVE");

    let deleted = &view["files/public/old.txt"];
    assert_eq!(deleted["state"], "DELETED");
    assert_eq!(deleted["displayVersions"].as_array().unwrap().len(), 1);

    assert!(view.get("prompts/public//broken").is_none());
}

#[test]
fn selections_must_be_pairs() {
    assert!(parse_selections(&["a=b".to_string()]).is_ok());
    assert!(parse_selections(&["a".to_string()]).is_err());
    assert!(parse_selections(&["=b".to_string()]).is_err());
}

#[test]
fn project_renders_review_view() {
    let input = r#"{
        "folders": [{"id": "files/docs", "folderId": "files", "name": "docs", "status": "LOADED"}],
        "leaves": [{"id": "files/docs/readme.md", "folderId": "files/docs", "name": "readme.md"}],
        "resources": [{"reviewUrl": "files/docs/readme.md", "targetUrl": "files/public/docs/readme.md", "action": "ADD", "version": "1.0"}]
    }"#;
    let first = render_projection(input).unwrap();
    let second = render_projection(input).unwrap();
    assert_eq!(first, second);

    let view: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(view["rootFolders"][0]["id"], "files/docs");
    assert_eq!(view["itemsToDisplay"][0]["id"], "files/docs/readme.md");
    assert!(view.get("warnings").is_none());
}

#[test]
fn run_reads_config_file_and_versions_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let data_path = temp_dir.path().join("published.json");
    std::fs::write(&data_path, r#"[{"id": "a/v1", "version": "1.0.0"}]"#).unwrap();

    let config_arg = config_path.to_string_lossy().to_string();
    let data_arg = data_path.to_string_lossy().to_string();
    let args = parse_args(&["keyway", "--config", &config_arg, "versions", &data_arg]);
    run(args).expect("versions command should succeed");

    let missing = temp_dir.path().join("missing.json");
    let missing_arg = missing.to_string_lossy().to_string();
    let args = parse_args(&["keyway", "--config", &config_arg, "project", &missing_arg]);
    let err = run(args).expect_err("missing input should fail");
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn config_bucket_commands_persist() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let config_arg = config_path.to_string_lossy().to_string();

    let args = parse_args(&["keyway", "--config", &config_arg, "config", "set-bucket", "b1"]);
    run(args).expect("set-bucket should succeed");
    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.default_bucket.as_deref(), Some("b1"));

    let args = parse_args(&["keyway", "id", "files", "x.txt"]);
    assert_eq!(execute(&config, args.command).unwrap(), "files/b1/x.txt");

    let blank = ConfigCommands::SetBucket {
        bucket: "  ".to_string(),
    };
    let err = update_config(config.clone(), &config_path, blank)
        .expect_err("blank bucket should be rejected");
    assert!(err.to_string().contains("cannot be empty"));

    let message = update_config(config, &config_path, ConfigCommands::UnsetBucket).unwrap();
    assert_eq!(message, "✅ Unset default-bucket");
    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.default_bucket, None);
}
