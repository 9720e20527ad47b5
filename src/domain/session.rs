//! Signed-in owner as supplied by the auth collaborator

use serde::Deserialize;

const FALLBACK_HEADER_NAME: &str = "Admin";
const FALLBACK_LAST_NAME: &str = "BlueDrinkingWater";
const FALLBACK_INITIAL: char = 'B';
const FALLBACK_EMAIL: &str = "admin@dorayd.com";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Display accessors tolerate a missing user or missing fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    pub fn new(user: Option<UserProfile>) -> Self {
        Self { user }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Short name for the top bar
    pub fn header_name(&self) -> String {
        self.first_name()
            .unwrap_or(FALLBACK_HEADER_NAME)
            .to_string()
    }

    /// Full name for the sidebar footer
    pub fn display_name(&self) -> String {
        let first = self.first_name().unwrap_or_default();
        let last = self
            .user
            .as_ref()
            .and_then(|user| non_empty(user.last_name.as_deref()))
            .unwrap_or(FALLBACK_LAST_NAME);
        format!("{first} {last}").trim().to_string()
    }

    pub fn initial(&self) -> char {
        self.first_name()
            .and_then(|name| name.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or(FALLBACK_INITIAL)
    }

    pub fn email(&self) -> String {
        self.user
            .as_ref()
            .and_then(|user| non_empty(user.email.as_deref()))
            .unwrap_or(FALLBACK_EMAIL)
            .to_string()
    }

    pub fn role_label(&self) -> &'static str {
        "Administrator"
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    fn first_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| non_empty(user.first_name.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
