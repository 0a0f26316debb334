//! Access-control policy for the public read API.

use serde::{Deserialize, Serialize};

/// Allowed-origin entry meaning "any origin".
pub const WILDCARD_ORIGIN: &str = "*";

/// API key and CORS settings. Exactly one exists per data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub allowed_origins: Vec<String>,
    pub enable_cors: bool,
    pub api_key: String,
}

impl ApiConfig {
    /// Default policy: CORS on, every origin allowed, the given key.
    #[must_use]
    pub fn with_key(api_key: String) -> Self {
        Self {
            allowed_origins: vec![WILDCARD_ORIGIN.to_owned()],
            enable_cors: true,
            api_key,
        }
    }

    /// Whether `key` matches the configured API key.
    #[must_use]
    pub fn validate_key(&self, key: &str) -> bool {
        self.api_key == key
    }

    /// Whether the allow-list contains the wildcard.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == WILDCARD_ORIGIN)
    }

    /// Whether a cross-origin read from `origin` is permitted.
    ///
    /// Always false while CORS is disabled.
    #[must_use]
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if !self.enable_cors {
            return false;
        }
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Value for `Access-Control-Allow-Origin`, if any should be sent.
    ///
    /// `*` when the wildcard is configured, the request origin verbatim when
    /// it is listed, otherwise `None`.
    #[must_use]
    pub fn cors_allow_origin(&self, request_origin: Option<&str>) -> Option<String> {
        if !self.enable_cors {
            return None;
        }
        if self.allows_any_origin() {
            return Some(WILDCARD_ORIGIN.to_owned());
        }
        request_origin
            .filter(|origin| self.is_origin_allowed(origin))
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed() -> ApiConfig {
        ApiConfig {
            allowed_origins: vec!["https://blog.example".to_owned()],
            enable_cors: true,
            api_key: "k".to_owned(),
        }
    }

    #[test]
    fn test_with_key_defaults() {
        let config = ApiConfig::with_key("abc".to_owned());
        assert!(config.enable_cors);
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert!(config.validate_key("abc"));
    }

    #[test]
    fn test_validate_key() {
        let config = listed();
        assert!(config.validate_key("k"));
        assert!(!config.validate_key("K"));
        assert!(!config.validate_key(""));
    }

    #[test]
    fn test_origin_disabled_cors() {
        let config = ApiConfig {
            enable_cors: false,
            ..ApiConfig::with_key("k".to_owned())
        };
        assert!(!config.is_origin_allowed("https://blog.example"));
        assert_eq!(config.cors_allow_origin(Some("https://blog.example")), None);
    }

    #[test]
    fn test_origin_wildcard() {
        let config = ApiConfig::with_key("k".to_owned());
        assert!(config.is_origin_allowed("https://anything.example"));
        assert_eq!(config.cors_allow_origin(None).as_deref(), Some("*"));
        assert_eq!(
            config.cors_allow_origin(Some("https://anything.example")).as_deref(),
            Some("*")
        );
    }

    #[test]
    fn test_origin_allow_list() {
        let config = listed();
        assert!(config.is_origin_allowed("https://blog.example"));
        assert!(!config.is_origin_allowed("https://evil.example"));
        assert_eq!(
            config.cors_allow_origin(Some("https://blog.example")).as_deref(),
            Some("https://blog.example")
        );
        assert_eq!(config.cors_allow_origin(Some("https://evil.example")), None);
        assert_eq!(config.cors_allow_origin(None), None);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(listed()).unwrap_or_default();
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["enableCors"], true);
        assert_eq!(json["allowedOrigins"][0], "https://blog.example");
    }
}
