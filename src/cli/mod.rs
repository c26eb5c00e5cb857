//! CLI module: Clap argument parser, output helpers, and command implementations.
//!
//! This is the only place that reads the process environment: the
//! master password comes from `CREDVAULT_MASTER_PASSWORD` or an
//! interactive prompt, never from a command-line argument.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{complexity_report, Keystore, PasswordPolicy, Vault};

/// Environment variable holding the master password.
pub const MASTER_PASSWORD_ENV: &str = "CREDVAULT_MASTER_PASSWORD";

/// credvault CLI: encrypted agent credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted credential vault for automation agents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding the keystore and agent files (default: .credvault)
    #[arg(long, default_value = ".credvault", global = true, env = "CREDVAULT_DATA_DIR")]
    pub data_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the keystore for this installation
    Init,

    /// Check the master password against the keystore
    Unlock,

    /// Store a platform login for an agent (password read from stdin or prompt)
    Set {
        /// Agent name
        agent: String,
        /// Platform (instagram, tiktok, youtube, linkedin)
        platform: String,
        /// Platform username
        #[arg(short, long)]
        username: String,
    },

    /// Print a stored platform password
    Get {
        /// Agent name
        agent: String,
        /// Platform
        platform: String,
    },

    /// List stored logins (usernames only)
    List {
        /// Only show this agent
        agent: Option<String>,
    },

    /// Remove a platform login, or every login of an agent
    Remove {
        /// Agent name
        agent: String,
        /// Platform (omit to remove the whole agent)
        platform: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    GeneratePassword {
        /// Number of characters
        #[arg(short, long, default_value_t = crate::crypto::password::GENERATED_PASSWORD_LENGTH)]
        length: usize,
    },

    /// Check a candidate master password against the policy
    CheckPassword,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the data directory from the CLI arguments.
pub fn data_dir(cli: &Cli) -> Result<PathBuf> {
    let dir = PathBuf::from(&cli.data_dir);
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

/// Get the master password, trying in order:
/// 1. `CREDVAULT_MASTER_PASSWORD` env var (containers, CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `CREDVAULT_MASTER_PASSWORD` for scripted usage, in which
/// case a policy failure is an error instead of a retry.
pub fn prompt_new_master_password(policy: &PasswordPolicy) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(MASTER_PASSWORD_ENV) {
        if !pw.is_empty() {
            crate::vault::validate_master_secret(&pw, policy)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
        let password = Zeroizing::new(password);

        let issues = complexity_report(&password, policy);
        if issues.is_empty() && !password.is_empty() {
            return Ok(password);
        }
        for issue in issues {
            output::warning(&format!("Master password {issue}."));
        }
        output::tip("Try again, or run `credvault generate-password` for a strong one.");
    }
}

/// Load settings and keystore, ask for the master password, and unlock.
pub fn open_vault(cli: &Cli) -> Result<(Settings, Vault)> {
    let dir = data_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let keystore = Keystore::load(&settings.keystore_path(&dir))?;
    let password = prompt_master_password()?;
    let vault = keystore.unlock(&password)?;
    Ok((settings, vault))
}

/// Build the credential store for this data directory.
pub fn credential_store(cli: &Cli, settings: &Settings) -> Result<crate::credentials::CredentialStore> {
    let dir = data_dir(cli)?;
    Ok(crate::credentials::CredentialStore::new(
        settings.agents_dir(&dir),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_command() {
        let cli = Cli::try_parse_from([
            "credvault",
            "--data-dir",
            "/tmp/cv",
            "set",
            "reels",
            "instagram",
            "--username",
            "techie",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, "/tmp/cv");
        match cli.command {
            Commands::Set {
                agent,
                platform,
                username,
            } => {
                assert_eq!(agent, "reels");
                assert_eq!(platform, "instagram");
                assert_eq!(username, "techie");
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn absolute_data_dir_is_kept() {
        let cli = Cli::try_parse_from(["credvault", "--data-dir", "/srv/cv", "list"]).unwrap();
        assert_eq!(data_dir(&cli).unwrap(), PathBuf::from("/srv/cv"));
    }
}
