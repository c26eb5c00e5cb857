//! `credvault unlock`: check the master password without decrypting anything.

use crate::cli::output;
use crate::cli::{data_dir, prompt_master_password, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::Keystore;

/// Execute the `unlock` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = data_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let keystore = Keystore::load(&settings.keystore_path(&dir))?;

    let password = prompt_master_password()?;
    if !keystore.verify(&password)? {
        return Err(VaultError::AuthenticationFailed);
    }

    output::success(&format!(
        "Master password accepted (keystore created {})",
        keystore.created_at().format("%Y-%m-%d %H:%M:%S")
    ));
    Ok(())
}
