//! `credvault set`: add or replace an agent's platform login.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{credential_store, open_vault, Cli};
use crate::credentials::Platform;
use crate::errors::{Result, VaultError};

/// Execute the `set` command.
pub fn execute(cli: &Cli, agent: &str, platform: &str, username: &str) -> Result<()> {
    let platform: Platform = platform.parse()?;

    // Unlock first so a wrong master password fails before we ask for more input.
    let (settings, vault) = open_vault(cli)?;

    let password = if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        let pw = dialoguer::Password::new()
            .with_prompt(format!("Enter {platform} password for {username}"))
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
        Zeroizing::new(pw)
    };

    let store = credential_store(cli, &settings)?;
    let mut creds = store.load(agent)?;
    let existed = creds.platforms.contains_key(&platform);
    creds.set_credential(&vault, platform, username, &password)?;
    store.save(&creds)?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "{platform} login for '{agent}' {verb} ({} platform(s) total)",
        creds.platforms.len()
    ));

    Ok(())
}
