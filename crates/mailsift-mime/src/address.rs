//! Sender and recipient header helpers.

use std::fmt;

/// Mailbox (optional display name + address) read from a decoded header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: String,
}

impl Mailbox {
    /// Extracts a mailbox from `Name <user@example.com>` or a bare address.
    ///
    /// The display name is only taken from text before an angle bracket.
    /// Returns `None` if the value holds nothing that looks like an address.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (name, candidate) = match value.split_once('<') {
            Some((name, rest)) => {
                let inner = rest.split_once('>').map_or(rest, |(inner, _)| inner);
                (clean_name(name), inner)
            }
            None => (None, value),
        };

        let address = candidate
            .split(|c: char| c.is_whitespace() || "<>,;()\"".contains(c))
            .find(|token| is_address(token))?;

        Some(Self {
            name,
            address: address.to_string(),
        })
    }

    /// Returns true for automated senders such as `noreply@` and `no-reply@`.
    #[must_use]
    pub fn is_no_reply(&self) -> bool {
        let automated = |s: &str| {
            let lower = s.to_ascii_lowercase();
            lower.contains("noreply") || lower.contains("no-reply")
        };
        automated(&self.address) || self.name.as_deref().is_some_and(automated)
    }
}

fn clean_name(name: &str) -> Option<String> {
    let name = name.trim().trim_matches('"').trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn is_address(token: &str) -> bool {
    let Some((local, domain)) = token.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !local.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "\"{name}\" <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_address() {
        let mailbox = Mailbox::parse("John Doe <john@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("John Doe"));
        assert_eq!(mailbox.address, "john@example.com");
    }

    #[test]
    fn test_parse_quoted_name() {
        let mailbox = Mailbox::parse("\"Doe, John\" <john@example.com>").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Doe, John"));
    }

    #[test]
    fn test_parse_bare_address() {
        let mailbox = Mailbox::parse("  user@example.com ").unwrap();
        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.address, "user@example.com");
    }

    #[test]
    fn test_parse_angle_only() {
        let mailbox = Mailbox::parse("<user@example.com>").unwrap();
        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.address, "user@example.com");
    }

    #[test]
    fn test_parse_no_address() {
        assert!(Mailbox::parse("Undisclosed recipients").is_none());
        assert!(Mailbox::parse("user@localhost").is_none());
        assert!(Mailbox::parse("").is_none());
    }

    #[test]
    fn test_is_no_reply() {
        let github = Mailbox::parse("GitHub <noreply@github.com>").unwrap();
        assert!(github.is_no_reply());

        let bank = Mailbox::parse("No-Reply <alerts@bank.example>").unwrap();
        assert!(bank.is_no_reply());

        let alice = Mailbox::parse("Alice <alice@example.com>").unwrap();
        assert!(!alice.is_no_reply());
    }

    #[test]
    fn test_display() {
        let mailbox = Mailbox::parse("John Doe <john@example.com>").unwrap();
        assert_eq!(mailbox.to_string(), "\"John Doe\" <john@example.com>");
    }
}
