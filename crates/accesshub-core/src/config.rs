// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};
use crate::types::AccessibilityState;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the conversion service (no trailing slash needed).
    pub api_base_url: String,
    /// Upper bound on one upload round trip. Conversions of long documents
    /// include speech synthesis, so this is generous.
    pub request_timeout_secs: u64,
    /// Largest file accepted for upload, in bytes.
    pub max_upload_bytes: u64,
    /// Last selected UI and conversion language.
    pub language: String,
    /// Last chosen display adaptations.
    pub accessibility: AccessibilityState,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 300,
            max_upload_bytes: 50 * 1024 * 1024,
            language: crate::locale::BASE_LANGUAGE.into(),
            accessibility: AccessibilityState::default(),
        }
    }
}

impl AppConfig {
    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(HubError::Config("api_base_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(HubError::Config(format!(
                "api_base_url must start with http:// or https://, got '{base}'"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(HubError::Config("request_timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_base_url() {
        let config = AppConfig {
            api_base_url: "ftp://example.org".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(HubError::Config(_))));

        let config = AppConfig {
            api_base_url: "   ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"language": "es"}"#).expect("deserialize");
        assert_eq!(config.language, "es");
        assert_eq!(config.api_base_url, AppConfig::default().api_base_url);
        assert!(!config.accessibility.dyslexic_font_enabled);
    }
}
