//! `credvault remove`: drop one platform login or a whole agent.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{credential_store, data_dir, Cli};
use crate::config::Settings;
use crate::credentials::Platform;
use crate::errors::{Result, VaultError};

/// Execute the `remove` command.
///
/// Removal needs no master password: it deletes ciphertext, it never
/// reads it.
pub fn execute(cli: &Cli, agent: &str, platform: Option<&str>, force: bool) -> Result<()> {
    let platform = platform.map(str::parse::<Platform>).transpose()?;

    let target = match platform {
        Some(p) => format!("{p} login of agent '{agent}'"),
        None => format!("all logins of agent '{agent}'"),
    };

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {target}?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let dir = data_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let store = credential_store(cli, &settings)?;

    match platform {
        Some(p) => {
            let mut creds = store.load(agent)?;
            if !creds.remove_platform(p) {
                return Err(VaultError::CredentialNotFound {
                    agent: agent.to_string(),
                    platform: p.to_string(),
                });
            }
            store.save(&creds)?;
        }
        None => {
            if !store.delete_agent(agent)? {
                return Err(VaultError::CommandFailed(format!(
                    "no credentials stored for agent '{agent}'"
                )));
            }
        }
    }

    output::success(&format!("Removed {target}"));
    Ok(())
}
