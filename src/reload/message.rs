//! Live Reload Message Protocol
//!
//! JSON messages pushed from the reload hub to browser clients.
//!
//! # Message Types
//!
//! - `reload`: reload the page
//! - `css`: re-fetch stylesheets without reloading
//! - `connected`: sent once after the handshake

use serde::{Deserialize, Serialize};

use crate::core::AssetCategory;

/// Message sent over the live-reload WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload
    Reload {
        /// Category that triggered the reload
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Stylesheets changed; clients swap `<link>` hrefs in place
    Css {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },
}

impl ReloadMessage {
    /// Message for a finished run of `category`.
    ///
    /// Categories that only write stylesheets get the `css` fast path.
    pub fn for_category(category: AssetCategory) -> Self {
        let reason = Some(category.name().to_string());
        match category {
            AssetCategory::Styles | AssetCategory::CssLibs => Self::Css { reason },
            _ => Self::Reload { reason },
        }
    }

    /// Create a connected message
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
