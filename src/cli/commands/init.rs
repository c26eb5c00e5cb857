//! `credvault init`: create the keystore for this installation.

use std::fs;

use crate::cli::output;
use crate::cli::{data_dir, prompt_new_master_password, Cli, MASTER_PASSWORD_ENV};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::Keystore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = data_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let keystore_path = settings.keystore_path(&dir);

    if keystore_path.exists() {
        output::tip("Use `credvault set` to add credentials with the existing keystore.");
        return Err(VaultError::KeystoreAlreadyExists(keystore_path));
    }

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        output::info(&format!("Created data directory: {}", dir.display()));
    }

    let password = prompt_new_master_password(&settings.password_policy())?;

    output::info(&format!(
        "Hashing master password and generating salt ({} PBKDF2 rounds per unlock)...",
        settings.kdf_iterations
    ));
    let keystore = Keystore::create(&keystore_path, &password, &settings)?;

    output::success(&format!(
        "Keystore created at {}",
        keystore.path().display()
    ));
    output::tip(&format!(
        "Export {MASTER_PASSWORD_ENV} in the agent's environment to skip the prompt."
    ));
    output::tip("Run `credvault set <AGENT> <PLATFORM> --username <NAME>` to add a login.");

    Ok(())
}
