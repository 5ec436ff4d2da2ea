//! User profile types
//!
//! Profile shape returned by the streaming provider's `/me` endpoint and
//! persisted (in reduced form) by the user repository.

use serde::{Deserialize, Serialize};

/// Current user's profile as reported by the streaming provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned stable user id
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default)]
    pub images: Vec<ProfileImage>,
}

impl UserProfile {
    /// Display name with the provider id as fallback
    #[must_use]
    pub fn name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Avatar image attached to a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}
