//! ndeploy Core Library
//!
//! Synchronizes built n8n credentials and nodes into a local development
//! instance's custom extension directory.

pub mod config;
pub mod context;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod tree;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DeployConfig};
    pub use crate::context::DeployContext;

    // Deploy
    pub use crate::deploy::{
        ActionOutcome, Category, DeployAction, DeployObserver, DeployPlan, DeployReport,
        NoopObserver, VerifyOutcome, deploy, execute, plan, verify,
    };

    // Errors
    pub use crate::error::{DeployError, DeployResult};

    // Rendering
    pub use crate::tree::render_tree;
}
