//! Credentials module: per-agent platform logins on disk.
//!
//! This module provides:
//! - The `Platform` identifiers (`platform`)
//! - Agent name and username checks (`validate`)
//! - `AgentCredentials`, encrypting passwords through a `Vault` (`agent`)
//! - `CredentialStore`, one JSON file per agent (`store`)

pub mod agent;
pub mod platform;
pub mod store;
pub mod validate;

pub use agent::{AgentCredentials, CredentialMetadata, PlatformCredential};
pub use platform::Platform;
pub use store::CredentialStore;
pub use validate::{validate_agent_name, validate_username};
