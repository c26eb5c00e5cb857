//! Name checks for agents and platform usernames.
//!
//! Agent names become file names, so they must be filesystem-safe.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{Result, VaultError};

const AGENT_NAME_MAX_LEN: usize = 100;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._]{1,30}$").expect("static regex is valid"))
}

fn forbidden_agent_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("static regex is valid"))
}

/// Validate an agent name.
///
/// 1–100 characters, none of `< > : " / \ | ? *` or control
/// characters, and no leading/trailing dot or space.
pub fn validate_agent_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::Validation("agent name cannot be empty".into()));
    }

    if name.chars().count() > AGENT_NAME_MAX_LEN {
        return Err(VaultError::Validation(format!(
            "agent name cannot exceed {AGENT_NAME_MAX_LEN} characters"
        )));
    }

    if forbidden_agent_chars().is_match(name) {
        return Err(VaultError::Validation(format!(
            "agent name '{name}' contains invalid characters — cannot contain < > : \" / \\ | ? * or control characters"
        )));
    }

    if name.starts_with(['.', ' ']) || name.ends_with(['.', ' ']) {
        return Err(VaultError::Validation(format!(
            "agent name '{name}' cannot start or end with dots or spaces"
        )));
    }

    Ok(())
}

/// Validate a platform username: letters, digits, dots, underscores; 1–30.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(VaultError::Validation("username cannot be empty".into()));
    }

    if !username_pattern().is_match(username) {
        return Err(VaultError::Validation(format!(
            "invalid username '{username}' — only letters, numbers, dots, and underscores are allowed (max 30)"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_agent_names() {
        assert!(validate_agent_name("my-agent").is_ok());
        assert!(validate_agent_name("agent_123").is_ok());
        assert!(validate_agent_name("reels bot").is_ok());
    }

    #[test]
    fn rejects_unsafe_agent_names() {
        assert!(validate_agent_name("").is_err());
        assert!(validate_agent_name("../etc").is_err());
        assert!(validate_agent_name("a/b").is_err());
        assert!(validate_agent_name("what?").is_err());
        assert!(validate_agent_name("tab\there").is_err());
        assert!(validate_agent_name(".hidden").is_err());
        assert!(validate_agent_name("trailing ").is_err());
        assert!(validate_agent_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn valid_usernames() {
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("test_user").is_ok());
        assert!(validate_username("user.name").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("user@name").is_err());
        assert!(validate_username("with space").is_err());
        assert!(validate_username(&"u".repeat(31)).is_err());
    }
}
