//! `credvault generate-password`: print a random password.

use crate::cli::output;
use crate::cli::{data_dir, Cli};
use crate::config::Settings;
use crate::crypto::password::generate_password;
use crate::errors::{Result, VaultError};

/// Execute the `generate-password` command.
///
/// Lengths below the configured master password minimum are refused,
/// so the output is always usable as a master password.
pub fn execute(cli: &Cli, length: usize) -> Result<()> {
    let settings = Settings::load(&data_dir(cli)?)?;
    if length < settings.min_secret_length {
        return Err(VaultError::Validation(format!(
            "length must be at least {} (got {length})",
            settings.min_secret_length
        )));
    }

    let password = generate_password(length);
    output::secret(&password);
    Ok(())
}
