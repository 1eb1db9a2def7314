use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_bucket {
            Some(bucket) => println!("  default-bucket: {bucket}"),
            None => println!("  default-bucket: (unset)"),
        }
        println!("  keys:");
        println!("    separator: {}", self.keys.separator);
        println!("    encoded-separator: {}", self.keys.encoded_separator);
        println!("    empty-model-id: {}", self.keys.empty_model_id);
        println!("    replay-model-id: {}", self.keys.replay_model_id);
        println!("    playback-model-id: {}", self.keys.playback_model_id);
        println!("  roots:");
        println!("    files: {}", self.roots.files);
        println!("    conversations: {}", self.roots.conversations);
        println!("    prompts: {}", self.roots.prompts);
        println!("    applications: {}", self.roots.applications);
        println!("    public-prefix: {}", self.roots.public_prefix);
        println!("  versions:");
        println!("    na-version: {}", self.versions.na_version);
        println!("    revision-prefix: {}", self.versions.revision_prefix);
    }
}
