//! Adapter configuration.

use std::path::Path;

use edge_cache::{header_names, CacheHeaderMode, CacheHeaderInjector};
use edge_observability::LogFormat;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration for [`LambdaAdapter`](crate::LambdaAdapter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Name of the provider cache-control header.
    pub provider_cache_header: String,
    /// Whether synthesized cache headers replace handler-set ones.
    pub cache_header_mode: CacheHeaderMode,
    /// Method used when the event carries none.
    pub default_method: String,
    /// Keep `set-cookie` out of the flat header map.
    pub strip_cookies: bool,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            provider_cache_header: header_names::NETLIFY_CDN_CACHE_CONTROL.to_string(),
            cache_header_mode: CacheHeaderMode::Overwrite,
            default_method: "get".to_string(),
            strip_cookies: true,
            log_format: LogFormat::Json,
        }
    }
}

impl AdapterConfig {
    /// Parse from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.toml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that would produce an invalid response.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if http::HeaderName::from_bytes(self.provider_cache_header.as_bytes()).is_err() {
            return Err(ConfigError::Invalid {
                field: "provider_cache_header",
                reason: format!("'{}' is not a valid header name", self.provider_cache_header),
            });
        }

        if http::Method::from_bytes(self.default_method.as_bytes()).is_err() {
            return Err(ConfigError::Invalid {
                field: "default_method",
                reason: format!("'{}' is not a valid HTTP method", self.default_method),
            });
        }

        Ok(())
    }

    /// Build the cache header injector for this configuration.
    pub fn cache_header_injector(&self) -> CacheHeaderInjector {
        CacheHeaderInjector::new()
            .with_provider_header(self.provider_cache_header.clone())
            .with_mode(self.cache_header_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdapterConfig::default();

        assert_eq!(config.provider_cache_header, "Netlify-CDN-Cache-Control");
        assert_eq!(config.cache_header_mode, CacheHeaderMode::Overwrite);
        assert_eq!(config.default_method, "get");
        assert!(config.strip_cookies);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AdapterConfig::from_toml_str(
            r#"
            provider_cache_header = "CDN-Cache-Control"
            cache_header_mode = "preserve-existing"
            log_format = "human"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider_cache_header, "CDN-Cache-Control");
        assert_eq!(config.cache_header_mode, CacheHeaderMode::PreserveExisting);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.default_method, "get");
    }

    #[test]
    fn test_from_json() {
        let config = AdapterConfig::from_json_str(r#"{"strip_cookies": false}"#).unwrap();
        assert!(!config.strip_cookies);
    }

    #[test]
    fn test_from_toml_rejects_unknown_mode() {
        assert!(AdapterConfig::from_toml_str(r#"cache_header_mode = "sometimes""#).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_header_name() {
        let config = AdapterConfig {
            provider_cache_header: "Bad Header".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("provider_cache_header"));
    }

    #[test]
    fn test_validate_rejects_bad_method() {
        let config = AdapterConfig {
            default_method: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AdapterConfig::load("/nonexistent/edge-adapter.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_injector_from_config() {
        let config = AdapterConfig {
            cache_header_mode: CacheHeaderMode::PreserveExisting,
            ..Default::default()
        };
        let injector = config.cache_header_injector();
        assert_eq!(injector.provider_header(), "Netlify-CDN-Cache-Control");
        assert_eq!(injector.mode(), CacheHeaderMode::PreserveExisting);
    }
}
