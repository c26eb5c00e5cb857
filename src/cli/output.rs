//! Terminal output for credvault commands.
//!
//! Status lines are prefixed with a colored marker.  Errors and
//! warnings go to stderr so stdout stays clean for `get` and
//! `generate-password`, whose output is meant to be piped.

use comfy_table::{ContentArrangement, Table};
use console::{style, StyledObject};

use crate::credentials::CredentialMetadata;
use crate::errors::VaultError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn line(stream: Stream, marker: StyledObject<&str>, msg: &str) {
    match stream {
        Stream::Stdout => println!("{marker} {msg}"),
        Stream::Stderr => eprintln!("{marker} {msg}"),
    }
}

pub fn success(msg: &str) {
    line(Stream::Stdout, style("\u{2713}").green().bold(), msg);
}

pub fn info(msg: &str) {
    line(Stream::Stdout, style("\u{2139}").blue().bold(), msg);
}

/// Dim hint, printed after the main message.
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

pub fn warning(msg: &str) {
    line(Stream::Stderr, style("\u{26a0}").yellow().bold(), msg);
}

pub fn error(msg: &str) {
    line(Stream::Stderr, style("\u{2717}").red().bold(), msg);
}

/// Print a secret value bare on stdout, with no marker or color.
pub fn secret(value: &str) {
    println!("{value}");
}

/// Print a failed command's error, plus a hint for the common cases.
pub fn report(err: &VaultError) {
    error(&err.to_string());

    let hint = match err {
        VaultError::KeystoreNotFound(_) => Some("Run `credvault init` to create the keystore."),
        VaultError::AuthenticationFailed => {
            Some("Check CREDVAULT_MASTER_PASSWORD, or run `credvault unlock` to test it.")
        }
        VaultError::ConfigError(_) => Some("Fix or remove credvault.toml in the data directory."),
        _ => None,
    };
    if let Some(hint) = hint {
        eprintln!("{} {}", style("\u{2192}").dim(), style(hint).dim());
    }
}

/// Print a table of stored logins (Agent, Platform, Username, Updated).
pub fn print_credentials_table(rows: &[(String, CredentialMetadata)]) {
    if rows.is_empty() {
        info("No credentials stored yet.");
        tip("Run `credvault set <AGENT> <PLATFORM> --username <NAME>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Agent", "Platform", "Username", "Updated"]);

    for (agent, meta) in rows {
        table.add_row(vec![
            agent.clone(),
            meta.platform.to_string(),
            meta.username.clone(),
            meta.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}
