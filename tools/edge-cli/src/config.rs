//! CLI configuration.

use anyhow::{Context, Result};
use edge_cache::{IsrPolicy, RouteRule, RouteRuleTable};
use edge_lambda::AdapterConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Adapter settings.
    #[serde(default)]
    pub adapter: AdapterConfig,

    /// Static route rules used by `edge invoke`.
    #[serde(default)]
    pub route_rules: Vec<RouteRuleConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Build the exact-path rule table for the adapter.
    pub fn route_table(&self) -> RouteRuleTable {
        self.route_rules
            .iter()
            .map(|r| (r.path.clone(), RouteRule::new(r.isr)))
            .collect()
    }
}

/// One `[[route_rules]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRuleConfig {
    /// Exact request path.
    pub path: String,

    /// `false`, `true` or revalidation seconds.
    #[serde(default)]
    pub isr: IsrPolicy,
}

/// Generate a default edge.toml config file.
pub fn generate_default_config() -> String {
    r#"# Edge adapter configuration

[adapter]
provider_cache_header = "Netlify-CDN-Cache-Control"
# "overwrite" or "preserve-existing"
cache_header_mode = "overwrite"
default_method = "get"
strip_cookies = true
# "json" or "human"
log_format = "json"

[[route_rules]]
path = "/"
isr = false

[[route_rules]]
path = "/blog"
isr = 60

[[route_rules]]
path = "/about"
isr = true
"#
    .to_string()
}
