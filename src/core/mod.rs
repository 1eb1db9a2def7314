pub mod config;
pub mod entity_key;
pub mod error;
pub mod path;
pub mod projection;
pub mod resource_id;
pub mod versions;
