//! `credvault get`: decrypt and print one platform password.

use crate::cli::output;
use crate::cli::{credential_store, open_vault, Cli};
use crate::credentials::Platform;
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(cli: &Cli, agent: &str, platform: &str) -> Result<()> {
    let platform: Platform = platform.parse()?;
    let (settings, vault) = open_vault(cli)?;

    let store = credential_store(cli, &settings)?;
    let creds = store.load(agent)?;
    let (_, password) = creds.credential(&vault, platform)?;
    output::secret(&password);

    Ok(())
}
