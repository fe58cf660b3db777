//! Deploy coordination: planning, execution and verification.
//!
//! A run is split in two so callers can preview it:
//! [`plan`] reads the source tree and decides what to do, and
//! [`execute`] mutates the destination. [`deploy`] does both.

pub mod executor;
pub mod plan;
pub mod verify;

pub use executor::{ActionOutcome, DeployObserver, DeployReport, NoopObserver, deploy, execute};
pub use plan::{Category, DeployAction, DeployPlan, SkipReason, plan};
pub use verify::{VerifyOutcome, verify};
