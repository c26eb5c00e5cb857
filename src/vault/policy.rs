//! Master password policy checks.
//!
//! These are advisory gates run before key derivation.  They do not
//! add any cryptographic strength; they keep operators from picking a
//! passphrase that PBKDF2 cannot save.

use crate::errors::{Result, VaultError};

/// Minimum master password length.
pub const PASSWORD_MIN_LENGTH: usize = 20;

/// Rules a candidate master password must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters (not bytes).
    pub min_length: usize,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digit: bool,
    /// Anything that is neither alphanumeric nor whitespace counts.
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: PASSWORD_MIN_LENGTH,
            require_lowercase: false,
            require_uppercase: false,
            require_digit: false,
            require_symbol: false,
        }
    }
}

impl PasswordPolicy {
    /// Length check plus every complexity rule switched on.
    pub fn strict(min_length: usize) -> Self {
        Self {
            min_length,
            require_lowercase: true,
            require_uppercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

/// Return every rule `candidate` breaks, in a fixed order.
///
/// An empty list means the password passes.
pub fn complexity_report(candidate: &str, policy: &PasswordPolicy) -> Vec<String> {
    let mut issues = Vec::new();

    let len = candidate.chars().count();
    if len < policy.min_length {
        issues.push(format!(
            "must be at least {} characters (got {len})",
            policy.min_length
        ));
    }
    if policy.require_lowercase && !candidate.chars().any(|c| c.is_lowercase()) {
        issues.push("must contain a lowercase letter".to_string());
    }
    if policy.require_uppercase && !candidate.chars().any(|c| c.is_uppercase()) {
        issues.push("must contain an uppercase letter".to_string());
    }
    if policy.require_digit && !candidate.chars().any(|c| c.is_ascii_digit()) {
        issues.push("must contain a digit".to_string());
    }
    if policy.require_symbol
        && !candidate
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        issues.push("must contain a symbol".to_string());
    }

    issues
}

/// Validate a candidate master password against `policy`.
///
/// Fails with the first broken rule.
pub fn validate_master_secret(candidate: &str, policy: &PasswordPolicy) -> Result<()> {
    if candidate.is_empty() {
        return Err(VaultError::Validation(
            "master password cannot be empty".into(),
        ));
    }

    match complexity_report(candidate, policy).into_iter().next() {
        Some(issue) => Err(VaultError::Validation(format!("master password {issue}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_length_only() {
        let policy = PasswordPolicy::default();
        assert!(validate_master_secret(&"a".repeat(20), &policy).is_ok());
        assert!(validate_master_secret(&"a".repeat(19), &policy).is_err());
    }

    #[test]
    fn empty_is_rejected() {
        let err = validate_master_secret("", &PasswordPolicy::default()).unwrap_err();
        assert!(matches!(err, VaultError::Validation(_)));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let policy = PasswordPolicy {
            min_length: 4,
            ..PasswordPolicy::default()
        };
        // 4 characters, 8 bytes.
        assert!(validate_master_secret("éééé", &policy).is_ok());
    }

    #[test]
    fn strict_policy_lists_every_failure() {
        let policy = PasswordPolicy::strict(20);
        let issues = complexity_report("short", &policy);
        assert_eq!(issues.len(), 4);
        assert!(issues[0].contains("at least 20"));
    }

    #[test]
    fn strict_policy_accepts_complex_password() {
        let policy = PasswordPolicy::strict(20);
        assert!(validate_master_secret("Tr0ub4dor&3-LongEnoughPass!", &policy).is_ok());
    }
}
