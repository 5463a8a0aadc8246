use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tourbook_shared::Masked;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Loose syntax check for an address: something@something.tld, no spaces
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// The authenticated actor behind a request. Decoded from the identity
/// provider's token and passed explicitly into handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    /// Profile email address, if the provider has one on file
    pub email: Option<Masked<String>>,
    pub display_name: Option<String>,
}

impl Requester {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(Masked(email.into()));
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Profile email, ignoring blank or malformed values
    pub fn profile_email(&self) -> Option<&str> {
        self.email
            .as_ref()
            .map(|e| e.expose().trim())
            .filter(|e| is_valid_email(e))
    }
}
