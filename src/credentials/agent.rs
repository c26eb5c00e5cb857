//! `AgentCredentials`: one agent's platform logins.
//!
//! Usernames are stored in clear so credentials can be listed without
//! the master password.  Each password is an `EncryptedRecord` bound
//! to `"<agent>/<platform>"`, so a token pasted into another slot
//! fails authentication instead of silently logging in elsewhere.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::platform::Platform;
use super::validate::{validate_agent_name, validate_username};
use crate::errors::{Result, VaultError};
use crate::vault::{SealedCredentials, Vault};

/// A stored login for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCredential {
    #[serde(flatten)]
    pub sealed: SealedCredentials,
    pub updated_at: DateTime<Utc>,
}

/// What `platforms()` returns: no ciphertext, no decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialMetadata {
    pub platform: Platform,
    pub username: String,
    pub updated_at: DateTime<Utc>,
}

/// Everything credvault persists for a single agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCredentials {
    pub agent: String,

    #[serde(default)]
    pub platforms: BTreeMap<Platform, PlatformCredential>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentCredentials {
    /// Start an empty credential set for `agent`.
    pub fn new(agent: &str) -> Result<Self> {
        validate_agent_name(agent)?;
        let now = Utc::now();
        Ok(Self {
            agent: agent.to_string(),
            platforms: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Associated data binding a password to this agent and platform.
    fn context(&self, platform: Platform) -> String {
        format!("{}/{}", self.agent, platform)
    }

    /// Encrypt and store a login, replacing any previous one.
    pub fn set_credential(
        &mut self,
        vault: &Vault,
        platform: Platform,
        username: &str,
        password: &str,
    ) -> Result<()> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(VaultError::Validation("password cannot be empty".into()));
        }

        let sealed =
            vault.encrypt_credentials_with_context(username, password, &self.context(platform))?;

        let now = Utc::now();
        self.platforms.insert(
            platform,
            PlatformCredential {
                sealed,
                updated_at: now,
            },
        );
        self.updated_at = now;
        Ok(())
    }

    /// Decrypt the login for `platform`, returning `(username, password)`.
    pub fn credential(
        &self,
        vault: &Vault,
        platform: Platform,
    ) -> Result<(String, Zeroizing<String>)> {
        let stored = self
            .platforms
            .get(&platform)
            .ok_or_else(|| VaultError::CredentialNotFound {
                agent: self.agent.clone(),
                platform: platform.to_string(),
            })?;
        vault.decrypt_credentials_with_context(&stored.sealed, &self.context(platform))
    }

    /// Drop the login for `platform`.  Returns `false` if there was none.
    pub fn remove_platform(&mut self, platform: Platform) -> bool {
        let removed = self.platforms.remove(&platform).is_some();
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// List stored logins, ordered by platform.
    pub fn platforms(&self) -> Vec<CredentialMetadata> {
        self.platforms
            .iter()
            .map(|(platform, stored)| CredentialMetadata {
                platform: *platform,
                username: stored.sealed.username.clone(),
                updated_at: stored.updated_at,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}
