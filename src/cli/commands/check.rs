//! `credvault check-password`: run the master password policy on a candidate.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{data_dir, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::complexity_report;

/// Execute the `check-password` command.
///
/// The candidate is read from stdin when piped, else from a hidden prompt.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&data_dir(cli)?)?;

    let candidate = if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        let pw = dialoguer::Password::new()
            .with_prompt("Candidate master password")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    let issues = complexity_report(&candidate, &settings.password_policy());
    if issues.is_empty() && !candidate.is_empty() {
        output::success("Password meets the master password policy.");
        return Ok(());
    }

    for issue in &issues {
        output::warning(&format!("Password {issue}."));
    }
    Err(VaultError::Validation(format!(
        "{} policy rule(s) failed",
        issues.len().max(1)
    )))
}
