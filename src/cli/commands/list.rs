//! `credvault list`: show stored logins without decrypting them.

use crate::cli::output;
use crate::cli::{credential_store, data_dir, Cli};
use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Execute the `list` command.  No master password is needed.
pub fn execute(cli: &Cli, agent: Option<&str>) -> Result<()> {
    let dir = data_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let store = credential_store(cli, &settings)?;

    let agents = match agent {
        Some(name) if !store.contains(name)? => {
            return Err(VaultError::CommandFailed(format!(
                "no credentials stored for agent '{name}'"
            )));
        }
        Some(name) => vec![name.to_string()],
        None => store.list_agents()?,
    };

    let mut rows = Vec::new();
    for name in &agents {
        let creds = store.load(name)?;
        rows.extend(
            creds
                .platforms()
                .into_iter()
                .map(|meta| (name.clone(), meta)),
        );
    }

    output::info(&format!(
        "{} agent(s) — {} login(s)",
        agents.len(),
        rows.len()
    ));
    output::print_credentials_table(&rows);

    Ok(())
}
