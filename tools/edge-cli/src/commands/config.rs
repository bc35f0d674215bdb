//! Configuration management commands.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use edge_cache::CacheHeaderMode;
use edge_observability::LogFormat;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_FILE_NAMES};
use crate::output::format_isr;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let adapter = &ctx.config.adapter;
    ctx.output.info("");
    ctx.output.info("[adapter]");
    ctx.output.kv("provider_cache_header", &adapter.provider_cache_header);
    ctx.output
        .kv("cache_header_mode", mode_name(adapter.cache_header_mode));
    ctx.output.kv("default_method", &adapter.default_method);
    ctx.output
        .kv("strip_cookies", &adapter.strip_cookies.to_string());
    ctx.output.kv("log_format", format_name(adapter.log_format));

    if !ctx.config.route_rules.is_empty() {
        ctx.output.info("");
        ctx.output.info("[[route_rules]]");
        for rule in &ctx.config.route_rules {
            ctx.output
                .list_item(&format!("{} (isr = {})", rule.path, format_isr(&rule.isr)));
        }
    }

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => find_config_file(&ctx.cwd)?,
    };
    let config_path = config_path
        .to_str()
        .context("Config path is not valid UTF-8")?;

    let mut config = CliConfig::load(config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("edge.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect errors and warnings for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if let Err(e) = config.adapter.validate() {
        errors.push(format!("adapter: {}", e));
    }

    if !config.adapter.strip_cookies {
        warnings.push(
            "adapter.strip_cookies = false sends set-cookie in both header maps".to_string(),
        );
    }

    let mut seen = HashSet::new();
    for (i, rule) in config.route_rules.iter().enumerate() {
        if !rule.path.starts_with('/') {
            errors.push(format!("route_rules[{}].path must start with '/'", i));
        }
        if rule.path.contains(['?', '#']) {
            errors.push(format!(
                "route_rules[{}].path must not contain a query or fragment",
                i
            ));
        }
        if !seen.insert(rule.path.as_str()) {
            warnings.push(format!(
                "route_rules[{}] duplicates path '{}'; the last entry wins",
                i, rule.path
            ));
        }
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();
    let adapter = &config.adapter;

    match parts.as_slice() {
        ["adapter", "provider_cache_header"] => {
            Ok(format!("\"{}\"", adapter.provider_cache_header))
        }
        ["adapter", "cache_header_mode"] => {
            Ok(format!("\"{}\"", mode_name(adapter.cache_header_mode)))
        }
        ["adapter", "default_method"] => Ok(format!("\"{}\"", adapter.default_method)),
        ["adapter", "strip_cookies"] => Ok(adapter.strip_cookies.to_string()),
        ["adapter", "log_format"] => Ok(format!("\"{}\"", format_name(adapter.log_format))),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let adapter = &mut config.adapter;

    match parts.as_slice() {
        ["adapter", "provider_cache_header"] => {
            adapter.provider_cache_header = value.to_string()
        }
        ["adapter", "cache_header_mode"] => {
            adapter.cache_header_mode = match value {
                "overwrite" => CacheHeaderMode::Overwrite,
                "preserve-existing" => CacheHeaderMode::PreserveExisting,
                _ => bail!("cache_header_mode must be 'overwrite' or 'preserve-existing'"),
            }
        }
        ["adapter", "default_method"] => adapter.default_method = value.to_string(),
        ["adapter", "strip_cookies"] => adapter.strip_cookies = value.parse()?,
        ["adapter", "log_format"] => {
            adapter.log_format = match value {
                "json" => LogFormat::Json,
                "human" => LogFormat::Human,
                _ => bail!("log_format must be 'json' or 'human'"),
            }
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    adapter.validate()?;
    Ok(())
}

fn mode_name(mode: CacheHeaderMode) -> &'static str {
    match mode {
        CacheHeaderMode::Overwrite => "overwrite",
        CacheHeaderMode::PreserveExisting => "preserve-existing",
    }
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Json => "json",
        LogFormat::Human => "human",
    }
}

fn find_config_file(cwd: &Path) -> Result<PathBuf> {
    for name in &CONFIG_FILE_NAMES {
        let path = cwd.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    bail!("No config file found. Run `edge config init` to create one.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteRuleConfig;
    use edge_cache::IsrPolicy;

    fn rule(path: &str) -> RouteRuleConfig {
        RouteRuleConfig {
            path: path.to_string(),
            isr: IsrPolicy::Revalidate(60),
        }
    }

    // === Validation Tests ===

    #[test]
    fn test_check_default_template() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let (errors, warnings) = check_config(&config);
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_check_rule_paths() {
        let config = CliConfig {
            route_rules: vec![rule("blog"), rule("/a?x=1"), rule("/ok"), rule("/ok")],
            ..Default::default()
        };

        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("/ok"));
    }

    #[test]
    fn test_check_invalid_adapter() {
        let mut config = CliConfig::default();
        config.adapter.provider_cache_header = "not a header".to_string();

        let (errors, _) = check_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("adapter:"));
    }

    // === Get/Set Tests ===

    #[test]
    fn test_get_values() {
        let config = CliConfig::default();
        assert_eq!(
            get_config_value(&config, "adapter.cache_header_mode").unwrap(),
            "\"overwrite\""
        );
        assert_eq!(
            get_config_value(&config, "adapter.strip_cookies").unwrap(),
            "true"
        );
        assert!(get_config_value(&config, "adapter.nope").is_err());
    }

    #[test]
    fn test_set_values() {
        let mut config = CliConfig::default();

        set_config_value(&mut config, "adapter.cache_header_mode", "preserve-existing").unwrap();
        set_config_value(&mut config, "adapter.log_format", "human").unwrap();
        set_config_value(&mut config, "adapter.strip_cookies", "false").unwrap();

        assert_eq!(
            config.adapter.cache_header_mode,
            CacheHeaderMode::PreserveExisting
        );
        assert_eq!(config.adapter.log_format, LogFormat::Human);
        assert!(!config.adapter.strip_cookies);
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = CliConfig::default();
        assert!(set_config_value(&mut config, "adapter.cache_header_mode", "sometimes").is_err());
        assert!(set_config_value(&mut config, "adapter.provider_cache_header", "bad name").is_err());
        assert!(set_config_value(&mut config, "adapter.strip_cookies", "maybe").is_err());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config_file(dir.path()).is_err());

        std::fs::write(dir.path().join(".edge.toml"), "").unwrap();
        assert_eq!(
            find_config_file(dir.path()).unwrap(),
            dir.path().join(".edge.toml")
        );
    }
}
