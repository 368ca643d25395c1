//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty (after trimming).
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty or has no dot.
    #[error("email domain must contain a dot")]
    InvalidDomain,
}

/// An email address for a dashboard user.
///
/// Surrounding whitespace is trimmed before validation, so values pasted
/// into the create-user form are accepted as typed.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - No inner whitespace
/// - Exactly one @ symbol with a non-empty local part
/// - A domain containing at least one dot, not at either end
///
/// ## Examples
///
/// ```
/// use prifam_core::Email;
///
/// assert!(Email::parse("john.smith@company.com").is_ok());
/// assert!(Email::parse("  alex.chen@company.com ").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("user@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first constraint violated.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_addresses() {
        for addr in [
            "john.smith@company.com",
            "sarah.johnson@company.com",
            "emily.davis@company.com",
        ] {
            assert!(Email::parse(addr).is_ok(), "{addr}");
        }
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let email = Email::parse("  a@b.co\n").unwrap();
        assert_eq!(email.as_str(), "a@b.co");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert_eq!(Email::parse("john smith@x.com"), Err(EmailError::Whitespace));
    }

    #[test]
    fn test_parse_at_symbol_count() {
        assert_eq!(Email::parse("no-at-symbol"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.com"), Err(EmailError::AtSymbol));
    }

    #[test]
    fn test_parse_empty_local_part() {
        assert_eq!(Email::parse("@domain.com"), Err(EmailError::EmptyLocalPart));
    }

    #[test]
    fn test_parse_domain_needs_dot() {
        assert_eq!(Email::parse("user@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@.com"), Err(EmailError::InvalidDomain));
    }

    #[test]
    fn test_domain() {
        let email = Email::parse("mike.wilson@company.com").unwrap();
        assert_eq!(email.domain(), "company.com");
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");
    }
}
