use crate::domain::{sanitize_input, validate_email};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, sanitize and validate a raw address.
    pub fn parse(s: String) -> Result<Self, String> {
        let candidate = sanitize_input(&s);

        if candidate.is_empty() || !validate_email(&candidate) {
            Err(format!("{s} is not a valid email"))
        } else {
            Ok(Self(candidate))
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
