//! `CredentialStore`: one JSON file per agent under a directory.
//!
//! ```text
//! <data_dir>/agents/<agent>.json
//! ```
//!
//! The store only moves bytes; it never needs the master password.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::agent::AgentCredentials;
use super::validate::validate_agent_name;
use crate::errors::{Result, VaultError};
use crate::vault::keystore::write_private_file;

const FILE_EXT: &str = "json";

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the credential file for `agent`.
    pub fn agent_path(&self, agent: &str) -> Result<PathBuf> {
        validate_agent_name(agent)?;
        Ok(self.dir.join(format!("{agent}.{FILE_EXT}")))
    }

    /// Whether `agent` has a credential file.
    pub fn contains(&self, agent: &str) -> Result<bool> {
        Ok(self.agent_path(agent)?.exists())
    }

    /// Load an agent's credentials, or an empty set if none are stored.
    pub fn load(&self, agent: &str) -> Result<AgentCredentials> {
        let path = self.agent_path(agent)?;
        if !path.exists() {
            return AgentCredentials::new(agent);
        }

        let data = fs::read(&path)?;
        let creds: AgentCredentials = serde_json::from_slice(&data).map_err(|e| {
            VaultError::InvalidFormat(format!("{}: {e}", path.display()))
        })?;

        if creds.agent != agent {
            return Err(VaultError::InvalidFormat(format!(
                "{} belongs to agent '{}'",
                path.display(),
                creds.agent
            )));
        }

        Ok(creds)
    }

    /// Write an agent's credentials atomically.
    pub fn save(&self, creds: &AgentCredentials) -> Result<()> {
        let path = self.agent_path(&creds.agent)?;
        let bytes = serde_json::to_vec_pretty(creds)
            .map_err(|e| VaultError::SerializationError(format!("agent credentials: {e}")))?;
        write_private_file(&path, &bytes)?;
        info!(agent = %creds.agent, platforms = creds.platforms.len(), "credentials saved");
        Ok(())
    }

    /// Delete an agent's credential file.  Returns `false` if none existed.
    pub fn delete_agent(&self, agent: &str) -> Result<bool> {
        let path = self.agent_path(agent)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!(agent, "credentials deleted");
        Ok(true)
    }

    /// Names of all agents with a credential file, sorted.
    pub fn list_agents(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut agents = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_agent_name(stem).is_ok() {
                    agents.push(stem.to_string());
                }
            }
        }

        agents.sort();
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Platform;
    use crate::crypto::kdf::{Pbkdf2Params, MIN_ITERATIONS};
    use crate::vault::{Vault, VaultConfig};
    use tempfile::TempDir;

    fn vault() -> Vault {
        let vault = Vault::new(VaultConfig {
            kdf: Pbkdf2Params {
                iterations: MIN_ITERATIONS,
            },
            ..VaultConfig::default()
        });
        vault
            .initialize("store-test-master-password", &[0x24u8; 32])
            .unwrap();
        vault
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path().join("agents"));
        let vault = vault();

        let mut creds = store.load("reels").unwrap();
        assert!(creds.is_empty());
        creds
            .set_credential(&vault, Platform::Instagram, "techie", "p@ss1")
            .unwrap();
        store.save(&creds).unwrap();

        let loaded = store.load("reels").unwrap();
        let (user, pw) = loaded.credential(&vault, Platform::Instagram).unwrap();
        assert_eq!(user, "techie");
        assert_eq!(pw.as_str(), "p@ss1");
    }

    #[test]
    fn list_and_delete_agents() {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path());
        assert!(store.list_agents().unwrap().is_empty());

        for name in ["zeta", "alpha"] {
            store.save(&AgentCredentials::new(name).unwrap()).unwrap();
        }
        fs::write(tmp.path().join("notes.txt"), "ignore me").unwrap();

        assert_eq!(store.list_agents().unwrap(), vec!["alpha", "zeta"]);
        assert!(store.contains("alpha").unwrap());
        assert!(!store.contains("omega").unwrap());
        assert!(store.delete_agent("alpha").unwrap());
        assert!(!store.contains("alpha").unwrap());
        assert!(!store.delete_agent("alpha").unwrap());
        assert_eq!(store.list_agents().unwrap(), vec!["zeta"]);
    }

    #[test]
    fn rejects_path_traversal() {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path());
        assert!(store.load("../escape").is_err());
    }

    #[test]
    fn corrupt_file_is_format_error() {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path());
        fs::write(tmp.path().join("broken.json"), "{").unwrap();
        assert!(matches!(
            store.load("broken"),
            Err(VaultError::InvalidFormat(_))
        ));
    }

    #[test]
    fn renamed_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = CredentialStore::new(tmp.path());
        store.save(&AgentCredentials::new("alice").unwrap()).unwrap();
        fs::rename(tmp.path().join("alice.json"), tmp.path().join("bob.json")).unwrap();

        assert!(matches!(
            store.load("bob"),
            Err(VaultError::InvalidFormat(_))
        ));
    }
}
