//! Deploy configuration
//!
//! Settings come from three layers, later ones winning:
//! - Built-in defaults (`dist/src` and `~/.n8n-dev/.n8n/custom`)
//! - An optional `ndeploy.toml` in the project root
//! - Explicit overrides passed by the frontend

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_deploy_toml, parse_deploy_toml_str};
pub use paths::{
    CONFIG_FILE_NAME, DEFAULT_SOURCE_ROOT, default_destination_root, default_source_root,
    expand_home, home_dir,
};
pub use schema::DeployConfig;
pub use store::ConfigStore;
