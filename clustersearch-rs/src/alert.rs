//! Inline alerts shown for search service failures.

use serde::{Deserialize, Serialize};

/// Marker the search service uses when search is switched off.
const NOT_ENABLED: &str = "not enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertVariant {
    Info,
    Danger,
}

/// A banner with a title and the raw service message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub variant: AlertVariant,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl Alert {
    pub fn danger(title: impl Into<String>) -> Self {
        Self {
            variant: AlertVariant::Danger,
            title: title.into(),
            subtitle: None,
        }
    }

    /// Classify an error reported by the search service.
    ///
    /// A disabled search service is informational, anything else is a danger.
    pub fn from_service_error(message: &str) -> Self {
        let (variant, title) = if message.contains(NOT_ENABLED) {
            (AlertVariant::Info, "Search is not enabled")
        } else {
            (
                AlertVariant::Danger,
                "Error occurred while contacting the search service",
            )
        };
        Self {
            variant,
            title: title.to_string(),
            subtitle: Some(message.to_string()),
        }
    }
}
