//! Secret redaction for logged command lines
//!
//! Secrets are held as [`SecretString`] so they never show up through
//! `Debug`, and are only exposed at the moment a text is scrubbed.

use secrecy::{ExposeSecret, SecretString};

/// Placeholder written in place of a secret
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Replaces known secret values with [`REDACTION_MARKER`]
///
/// # Examples
///
/// ```
/// use expo_eject_step::security::SecretRedactor;
/// use secrecy::SecretString;
///
/// let mut redactor = SecretRedactor::new();
/// redactor.register(&SecretString::new("s3cret".into()));
/// assert_eq!(redactor.redact("expo login -p s3cret"), "expo login -p [REDACTED]");
/// ```
#[derive(Debug, Default)]
pub struct SecretRedactor {
    secrets: Vec<SecretString>,
}

impl SecretRedactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a secret; empty values are ignored
    pub fn register(&mut self, secret: &SecretString) {
        let value = secret.expose_secret();
        if value.is_empty() {
            return;
        }
        self.secrets.push(SecretString::new(value.into()));
        // Longest first, so a secret containing another is replaced whole.
        self.secrets
            .sort_by_key(|s| std::cmp::Reverse(s.expose_secret().len()));
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    /// Returns `text` with every registered secret replaced
    pub fn redact(&self, text: &str) -> String {
        let mut redacted = text.to_string();

        for secret in &self.secrets {
            redacted = redacted.replace(secret.expose_secret(), REDACTION_MARKER);
        }

        redacted
    }
}

/// Masks a value for display, keeping only whether it was set
pub fn mask(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "****" }
}
